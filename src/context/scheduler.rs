use core::fmt;
use core::marker::PhantomPinned;
use core::pin::Pin;
use core::ptr::NonNull;
use std::sync::Weak;

use crate::error::Error;
use crate::run_loop::run_loop::Shared;
use crate::run_loop::TaskNode;
use crate::sender::lifecycle::{self, Lifecycle};
use crate::sender::{OperationState, Receiver, Sender};
use crate::trace::TraceScope;

const SUBJECT: &str = "Schedule";

/// Handle producing senders that complete on one run loop.
///
/// Cheap to clone and never keeps the loop alive; scheduling onto a loop that
/// is gone completes with [`Error::LoopClosed`].
#[derive(Clone)]
pub struct Scheduler {
    shared: Weak<Shared>,
}

impl Scheduler {
    pub(crate) fn new(shared: Weak<Shared>) -> Self {
        Self { shared }
    }

    /// A sender completing with `()` on the scheduler's loop.
    pub fn schedule(&self) -> Schedule<()> {
        self.schedule_value(())
    }

    /// A sender completing with `value` on the scheduler's loop.
    pub fn schedule_value<V: Send + 'static>(&self, value: V) -> Schedule<V> {
        Schedule {
            shared: self.shared.clone(),
            value,
        }
    }

    /// Whether the loop still exists.
    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl PartialEq for Scheduler {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.shared, &other.shared)
    }
}

impl Eq for Scheduler {}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Free-function form of [`Scheduler::schedule`].
pub fn schedule(scheduler: &Scheduler) -> Schedule<()> {
    scheduler.schedule()
}

/// Sender returned by [`Scheduler::schedule`] and [`Scheduler::schedule_value`].
pub struct Schedule<V> {
    shared: Weak<Shared>,
    value: V,
}

impl<V: Send + 'static> Sender for Schedule<V> {
    type Value = V;
    type Operation<R: Receiver<V>> = ScheduleOperation<V, R>;

    fn connect<R: Receiver<V>>(self, receiver: R) -> ScheduleOperation<V, R> {
        let _trace = TraceScope::enter("connect", SUBJECT);
        ScheduleOperation {
            node: TaskNode::new(ScheduleOperation::<V, R>::execute),
            shared: self.shared,
            payload: Some((self.value, receiver)),
            lifecycle: Lifecycle::new(),
            _pin: PhantomPinned,
        }
    }
}

/// Started form of [`Schedule`]: a task node that completes the receiver when
/// the loop executes it.
#[repr(C)]
pub struct ScheduleOperation<V, R> {
    // Must stay the first field: the loop hands back a pointer to it.
    node: TaskNode,
    shared: Weak<Shared>,
    payload: Option<(V, R)>,
    lifecycle: Lifecycle,
    _pin: PhantomPinned,
}

impl<V: Send + 'static, R: Receiver<V>> ScheduleOperation<V, R> {
    unsafe fn execute(node: NonNull<TaskNode>) {
        let _trace = TraceScope::enter("execute", SUBJECT);
        let op = node.cast::<Self>().as_ptr();
        // SAFETY: `node` is the first field of a live, pinned ScheduleOperation.
        let payload = unsafe { (*op).payload.take() };
        unsafe { (*op).lifecycle.complete(SUBJECT) };
        // `op` may be freed as soon as the receiver completes; do not touch it.
        if let Some((value, receiver)) = payload {
            receiver.set_value(value);
        }
    }
}

impl<V: Send + 'static, R: Receiver<V>> OperationState for ScheduleOperation<V, R> {
    unsafe fn start(self: Pin<&mut Self>) {
        let _trace = TraceScope::enter("start", SUBJECT);
        // SAFETY: nothing is moved out of the pinned operation.
        let this = unsafe { self.get_unchecked_mut() };
        this.lifecycle.start(SUBJECT);

        let node = NonNull::from(&mut *this).cast::<TaskNode>();
        let enqueued = match this.shared.upgrade() {
            // SAFETY: the caller keeps the pinned operation alive until the
            // receiver completes, which happens when the node executes.
            Some(shared) => unsafe { shared.enqueue(node) },
            None => Err(Error::LoopClosed),
        };
        if let Err(error) = enqueued {
            tracing::debug!(%error, "schedule rejected");
            let payload = this.payload.take();
            this.lifecycle.complete(SUBJECT);
            if let Some((_, receiver)) = payload {
                receiver.set_error(error);
            }
        }
    }
}

impl<V, R> Drop for ScheduleOperation<V, R> {
    fn drop(&mut self) {
        lifecycle::abort_if_in_flight(&self.lifecycle, SUBJECT);
    }
}
