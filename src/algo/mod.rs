//! Combinators building senders out of senders.

mod bulk;
mod ext;
mod just;
mod let_value;
/// Partially applied combinators for pipe-style composition.
pub mod pipe;
mod then;
mod transfer;
mod upon_error;

use std::panic::{self, AssertUnwindSafe};

use crate::error::{Error, Result};

pub use bulk::{Bulk, BulkReceiver, bulk};
pub use ext::SenderExt;
pub use just::{Just, JustOperation, just, just_error, just_stopped};
pub use let_value::{LetPredReceiver, LetValue, LetValueOperation, let_value};
pub use pipe::Adaptor;
pub use then::{Then, ThenReceiver, TryThen, TryThenReceiver, then, try_then};
pub use transfer::{Transfer, TransferHop, transfer};
pub use upon_error::{UponError, UponErrorReceiver, upon_error};

/// Run user code, turning a panic into [`Error::Panicked`].
///
/// Continuations run inside another operation's completion; unwinding out of
/// them would cross the run loop.
pub(crate) fn guarded<T>(f: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(Error::from_panic)
}
