//! Marks the threads that are currently draining a run loop.

use core::cell::Cell;

thread_local! {
    static LOOP_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Returns true if the current thread is inside [`RunLoop::run`](crate::RunLoop::run).
pub fn in_run_loop() -> bool {
    LOOP_DEPTH.with(|d| d.get() > 0)
}

/// Guard held for the duration of one `run` call.
///
/// Counts rather than flags: a `sync_wait` issued from a task drives a nested
/// loop on the same thread.
pub(crate) struct RunLoopScope {
    _not_send: core::marker::PhantomData<*const ()>,
}

impl RunLoopScope {
    pub(crate) fn enter() -> Self {
        LOOP_DEPTH.with(|d| d.set(d.get() + 1));
        Self {
            _not_send: core::marker::PhantomData,
        }
    }
}

impl Drop for RunLoopScope {
    fn drop(&mut self) {
        LOOP_DEPTH.with(|d| d.set(d.get() - 1));
    }
}
