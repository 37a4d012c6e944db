use crate::algo::guarded;
use crate::error::Error;
use crate::sender::{Completion, Receiver, Sender};
use crate::trace::TraceScope;

/// Sender returned by [`then`].
pub struct Then<S, F> {
    pred: S,
    f: F,
}

/// Transform the value of `sender` with `f`.
///
/// `f` runs synchronously inside the upstream completion, on whichever thread
/// completes it. A panic in `f` becomes [`Error::Panicked`]; error and stopped
/// signals pass through without calling `f`.
pub fn then<S, F, U>(sender: S, f: F) -> Then<S, F>
where
    S: Sender,
    F: FnOnce(S::Value) -> U + Send + 'static,
    U: Send + 'static,
{
    Then { pred: sender, f }
}

impl<S, F, U> Sender for Then<S, F>
where
    S: Sender,
    F: FnOnce(S::Value) -> U + Send + 'static,
    U: Send + 'static,
{
    type Value = U;
    type Operation<R: Receiver<U>> = S::Operation<ThenReceiver<F, R>>;

    fn connect<R: Receiver<U>>(self, receiver: R) -> Self::Operation<R> {
        let _trace = TraceScope::enter("connect", "Then");
        self.pred.connect(ThenReceiver { f: self.f, receiver })
    }
}

/// Receiver that applies a [`then`] transform before forwarding.
pub struct ThenReceiver<F, R> {
    f: F,
    receiver: R,
}

impl<V, U, F, R> Receiver<V> for ThenReceiver<F, R>
where
    F: FnOnce(V) -> U + Send + 'static,
    R: Receiver<U>,
{
    fn complete(self, completion: Completion<V>) {
        let _trace = TraceScope::enter("complete", "Then");
        let ThenReceiver { f, receiver } = self;
        match completion {
            Completion::Value(value) => match guarded(move || f(value)) {
                Ok(out) => receiver.set_value(out),
                Err(error) => receiver.set_error(error),
            },
            Completion::Error(error) => receiver.set_error(error),
            Completion::Stopped => receiver.set_stopped(),
        }
    }
}

/// Sender returned by [`try_then`].
pub struct TryThen<S, F> {
    pred: S,
    f: F,
}

/// Like [`then`], but `f` may fail; `Err(e)` is delivered as [`Error::Failed`].
pub fn try_then<S, F, U, E>(sender: S, f: F) -> TryThen<S, F>
where
    S: Sender,
    F: FnOnce(S::Value) -> Result<U, E> + Send + 'static,
    U: Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    TryThen { pred: sender, f }
}

impl<S, F, U, E> Sender for TryThen<S, F>
where
    S: Sender,
    F: FnOnce(S::Value) -> Result<U, E> + Send + 'static,
    U: Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    type Value = U;
    type Operation<R: Receiver<U>> = S::Operation<TryThenReceiver<F, R>>;

    fn connect<R: Receiver<U>>(self, receiver: R) -> Self::Operation<R> {
        let _trace = TraceScope::enter("connect", "TryThen");
        self.pred.connect(TryThenReceiver { f: self.f, receiver })
    }
}

/// Receiver that applies a [`try_then`] transform before forwarding.
pub struct TryThenReceiver<F, R> {
    f: F,
    receiver: R,
}

impl<V, U, E, F, R> Receiver<V> for TryThenReceiver<F, R>
where
    F: FnOnce(V) -> Result<U, E> + Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    R: Receiver<U>,
{
    fn complete(self, completion: Completion<V>) {
        let _trace = TraceScope::enter("complete", "TryThen");
        let TryThenReceiver { f, receiver } = self;
        match completion {
            Completion::Value(value) => match guarded(move || f(value)) {
                Ok(Ok(out)) => receiver.set_value(out),
                Ok(Err(error)) => receiver.set_error(Error::failed(error)),
                Err(error) => receiver.set_error(error),
            },
            Completion::Error(error) => receiver.set_error(error),
            Completion::Stopped => receiver.set_stopped(),
        }
    }
}
