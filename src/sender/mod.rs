//! The sender/receiver protocol.
//!
//! Building a chain is two-phase: senders describe work and are connected to a
//! receiver, producing an operation state; nothing runs until the pinned
//! operation state is started.

/// Type-erased senders.
pub mod boxed;
pub(crate) mod lifecycle;
mod traits;

pub use boxed::{BoxOperation, BoxReceiver, BoxSender};
pub use traits::{Completion, OperationState, Receiver, Sender};
