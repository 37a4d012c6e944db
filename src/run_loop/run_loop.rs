use core::ptr::NonNull;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::context::Scheduler;
use crate::error::{Error, Result};
use crate::run_loop::task::{TaskNode, TaskQueue};
use crate::util::scope::RunLoopScope;

struct State {
    queue: TaskQueue,
    stop: bool,
    running: bool,
    finished: bool,
}

/// State shared between a loop, its schedulers and its stop handles.
pub(crate) struct Shared {
    state: Mutex<State>,
    ready: Condvar,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: Mutex::new(State {
                queue: TaskQueue::new(),
                stop: false,
                running: false,
                finished: false,
            }),
            ready: Condvar::new(),
        }
    }

    /// Append `node` and wake the consumer.
    ///
    /// # Safety
    /// `node` must be pinned, unlinked, and stay valid until it has executed.
    pub(crate) unsafe fn enqueue(&self, node: NonNull<TaskNode>) -> Result<()> {
        let mut state = self.state.lock();
        if state.finished {
            return Err(Error::LoopClosed);
        }
        unsafe { state.queue.push(node) };
        drop(state);
        self.ready.notify_one();
        Ok(())
    }

    pub(crate) fn stop(&self) {
        self.state.lock().stop = true;
        self.ready.notify_all();
    }

    pub(crate) fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub(crate) fn run(&self) -> usize {
        let _scope = RunLoopScope::enter();
        let mut state = self.state.lock();
        assert!(
            !state.running,
            "RunLoop::run called while another thread is draining the loop"
        );
        state.running = true;

        let mut executed = 0usize;
        loop {
            if let Some(node) = state.queue.pop() {
                // Tasks run without the lock so they can enqueue onto this loop.
                MutexGuard::unlocked(&mut state, || {
                    // SAFETY: enqueue's contract keeps the node alive until now.
                    unsafe { TaskNode::execute(node) }
                });
                executed += 1;
            } else if state.stop {
                state.finished = true;
                break;
            } else {
                self.ready.wait(&mut state);
            }
        }
        state.running = false;
        drop(state);

        tracing::trace!(executed, "run loop drained");
        executed
    }

    /// Close a loop that nobody will run again.
    ///
    /// Work already queued executes on the calling thread; anything it
    /// schedules onto this loop is rejected with [`Error::LoopClosed`]. A loop
    /// that is being run is only asked to stop.
    pub(crate) fn close(&self) -> usize {
        let mut state = self.state.lock();
        state.stop = true;
        if state.running {
            drop(state);
            self.ready.notify_all();
            return 0;
        }
        state.finished = true;

        let _scope = RunLoopScope::enter();
        let mut executed = 0usize;
        while let Some(node) = state.queue.pop() {
            MutexGuard::unlocked(&mut state, || {
                // SAFETY: enqueue's contract keeps the node alive until now.
                unsafe { TaskNode::execute(node) }
            });
            executed += 1;
        }
        drop(state);

        if executed > 0 {
            tracing::debug!(executed, "run loop closed with queued work");
        }
        executed
    }
}

/// Single-consumer FIFO run loop.
///
/// Any thread may enqueue; only the thread calling [`run`](Self::run) executes.
/// Tasks run one at a time, each to completion, in submission order.
///
/// Dropping a loop that was never run (or still has queued work) executes the
/// remaining tasks on the dropping thread, so every started operation is
/// completed.
pub struct RunLoop {
    shared: Arc<Shared>,
}

impl RunLoop {
    /// Create an idle loop with an empty queue.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::new()),
        }
    }

    /// A scheduler whose senders complete on this loop.
    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(Arc::downgrade(&self.shared))
    }

    /// A cloneable handle that can stop this loop from any thread.
    pub fn handle(&self) -> RunLoopHandle {
        RunLoopHandle {
            shared: self.shared.clone(),
        }
    }

    /// Drain the queue until it is empty and [`stop`](Self::stop) was called.
    ///
    /// Parks on a condition variable while idle. Returns the number of tasks
    /// executed. Once it returns the loop is finished and rejects new work.
    pub fn run(&self) -> usize {
        self.shared.run()
    }

    /// Request the loop to return once its queue is empty.
    pub fn stop(&self) {
        self.shared.stop();
    }

    /// Number of tasks waiting to be executed.
    pub fn pending(&self) -> usize {
        self.shared.pending()
    }

    /// Append `node` at the tail of the queue.
    ///
    /// Fails with [`Error::LoopClosed`] once the loop has finished running.
    ///
    /// # Safety
    /// `node` must not move, must not be linked into any queue, and must stay
    /// valid until its execute callback has been invoked.
    pub unsafe fn enqueue(&self, node: NonNull<TaskNode>) -> Result<()> {
        unsafe { self.shared.enqueue(node) }
    }

    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }
}

impl Drop for RunLoop {
    fn drop(&mut self) {
        self.shared.close();
    }
}

impl Default for RunLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Stop capability for a [`RunLoop`].
#[derive(Clone)]
pub struct RunLoopHandle {
    shared: Arc<Shared>,
}

impl RunLoopHandle {
    /// Same as [`RunLoop::stop`].
    pub fn stop(&self) {
        self.shared.stop();
    }
}
