//! Blocking bridge from a sender chain to a plain return value.

use std::pin::pin;
use std::sync::Arc;

use crossbeam_queue::ArrayQueue;

use crate::error::{Error, Result};
use crate::run_loop::{RunLoop, RunLoopHandle};
use crate::sender::{Completion, OperationState, Receiver, Sender};
use crate::trace::{self, TraceScope};
use crate::util::in_run_loop;

/// Start `sender` and block the calling thread until it completes.
///
/// The calling thread drives a private [`RunLoop`] while it waits, so work
/// scheduled onto that loop runs here; work scheduled onto other contexts runs
/// on their threads. Returns `Ok(Some(value))` on success, `Ok(None)` if the
/// chain was stopped, and the propagated error otherwise.
pub fn sync_wait<S: Sender>(sender: S) -> Result<Option<S::Value>> {
    let _trace = TraceScope::enter("sync_wait", trace::subject::<S>());
    if in_run_loop() {
        tracing::warn!("sync_wait called on a run loop thread; that loop is blocked until it returns");
    }

    let run_loop = RunLoop::new();
    let slot = Arc::new(ArrayQueue::new(1));
    let receiver = SyncWaitReceiver {
        slot: slot.clone(),
        stop: run_loop.handle(),
    };
    let op = pin!(sender.connect(receiver));
    // SAFETY: `op` stays pinned in this frame until `run` returns, and `run`
    // returns only after the receiver completed or was dropped.
    unsafe { op.start() };
    let executed = run_loop.run();
    tracing::trace!(executed, "sync_wait completed");

    match slot.pop() {
        Some(completion) => completion.into_result(),
        None => Err(Error::Abandoned),
    }
}

/// Terminal receiver: parks the completion and stops the waiting loop.
struct SyncWaitReceiver<V> {
    slot: Arc<ArrayQueue<Completion<V>>>,
    stop: RunLoopHandle,
}

impl<V: Send + 'static> Receiver<V> for SyncWaitReceiver<V> {
    fn complete(self, completion: Completion<V>) {
        let _trace = TraceScope::enter("complete", "SyncWait");
        if self.slot.push(completion).is_err() {
            panic!("contract violation: sync_wait received two completions");
        }
        // Dropping `self` stops the loop.
    }
}

impl<V> Drop for SyncWaitReceiver<V> {
    fn drop(&mut self) {
        self.stop.stop();
    }
}
