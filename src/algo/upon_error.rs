use crate::algo::guarded;
use crate::error::Error;
use crate::sender::{Completion, Receiver, Sender};
use crate::trace::TraceScope;

/// Sender returned by [`upon_error`].
pub struct UponError<S, F> {
    pred: S,
    f: F,
}

/// Recover from the error signal of `sender` by mapping the error to a value.
pub fn upon_error<S, F>(sender: S, f: F) -> UponError<S, F>
where
    S: Sender,
    F: FnOnce(Error) -> S::Value + Send + 'static,
{
    UponError { pred: sender, f }
}

impl<S, F> Sender for UponError<S, F>
where
    S: Sender,
    F: FnOnce(Error) -> S::Value + Send + 'static,
{
    type Value = S::Value;
    type Operation<R: Receiver<S::Value>> = S::Operation<UponErrorReceiver<F, R>>;

    fn connect<R: Receiver<S::Value>>(self, receiver: R) -> Self::Operation<R> {
        let _trace = TraceScope::enter("connect", "UponError");
        self.pred.connect(UponErrorReceiver { f: self.f, receiver })
    }
}

/// Receiver that turns an error into a value via [`upon_error`].
pub struct UponErrorReceiver<F, R> {
    f: F,
    receiver: R,
}

impl<V, F, R> Receiver<V> for UponErrorReceiver<F, R>
where
    F: FnOnce(Error) -> V + Send + 'static,
    R: Receiver<V>,
{
    fn complete(self, completion: Completion<V>) {
        let _trace = TraceScope::enter("complete", "UponError");
        let UponErrorReceiver { f, receiver } = self;
        match completion {
            Completion::Value(value) => receiver.set_value(value),
            Completion::Error(error) => match guarded(move || f(error)) {
                Ok(value) => receiver.set_value(value),
                Err(error) => receiver.set_error(error),
            },
            Completion::Stopped => receiver.set_stopped(),
        }
    }
}
