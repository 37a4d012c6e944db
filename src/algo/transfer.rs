use crate::algo::let_value::{LetValueOperation, let_value};
use crate::context::{Schedule, Scheduler};
use crate::sender::{Receiver, Sender};
use crate::trace::TraceScope;

/// Successor factory used by [`Transfer`]: re-schedules the value.
pub type TransferHop<V> = Box<dyn FnOnce(V) -> Schedule<V> + Send>;

/// Sender returned by [`transfer`].
pub struct Transfer<S> {
    pred: S,
    scheduler: Scheduler,
}

/// Deliver the value of `sender` on the loop of `scheduler`.
///
/// Downstream continuations then run on that loop's thread. Error and stopped
/// signals are forwarded where they occur, without a hop.
pub fn transfer<S: Sender>(sender: S, scheduler: &Scheduler) -> Transfer<S> {
    Transfer {
        pred: sender,
        scheduler: scheduler.clone(),
    }
}

impl<S: Sender> Sender for Transfer<S> {
    type Value = S::Value;
    type Operation<R: Receiver<S::Value>> =
        LetValueOperation<S, TransferHop<S::Value>, Schedule<S::Value>, R>;

    fn connect<R: Receiver<S::Value>>(self, receiver: R) -> Self::Operation<R> {
        let _trace = TraceScope::enter("connect", "Transfer");
        let scheduler = self.scheduler;
        let hop: TransferHop<S::Value> = Box::new(move |value| scheduler.schedule_value(value));
        let_value(self.pred, hop).connect(receiver)
    }
}
