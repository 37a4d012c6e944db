#![forbid(unsafe_op_in_unsafe_fn)]
#![deny(missing_docs)]

//! Sender/receiver composition executed on single-threaded cooperative run
//! loops: describe a chain, connect it to a receiver, start it, and let the
//! loop it was scheduled on drive it to one tagged completion. `sync_wait`
//! blocks the caller on a private loop until the chain completes.
//!
//! ```
//! use pex::prelude::*;
//!
//! fn main() -> pex::Result<()> {
//!     let context = Context::new()?;
//!     let scheduler = context.scheduler();
//!     let chain = scheduler.schedule()
//!         | pipe::then(|()| 0)
//!         | pipe::then(|n: i32| n + 1)
//!         | pipe::then(|n: i32| n + 2);
//!     assert_eq!(sync_wait(chain)?, Some(3));
//!     Ok(())
//! }
//! ```
//!
//! No cancellation, timers or thread pools: each context owns exactly one
//! loop and one thread.

mod algo;
mod context;
mod error;
mod run_loop;
mod sender;
mod sync_wait;
mod trace;
/// Thread helpers: pinning and run-loop membership.
pub mod util;

pub use algo::*;
pub use context::config::{ENV_PIN_CORE, ENV_THREAD_NAME, ENV_THREAD_STACK_SIZE};
pub use context::{
    Context, ContextConfig, Schedule, ScheduleOperation, Scheduler, make_context, schedule,
};
pub use error::{Error, Result};
pub use run_loop::{RunLoop, RunLoopHandle, TaskNode};
pub use sender::{
    BoxOperation, BoxReceiver, BoxSender, Completion, OperationState, Receiver, Sender,
};
pub use sync_wait::sync_wait;
pub use util::{PinConfig, in_run_loop};

/// Everything needed to build and run chains.
pub mod prelude {
    pub use crate::algo::pipe;
    pub use crate::sync_wait::sync_wait;
    pub use crate::{
        Completion, Context, ContextConfig, Error, OperationState, PinConfig, Receiver,
        Scheduler, Sender, SenderExt, bulk, just, just_error, just_stopped, let_value,
        make_context, schedule, then, transfer, try_then, upon_error,
    };
}
