use crate::algo::guarded;
use crate::sender::{Completion, Receiver, Sender};
use crate::trace::TraceScope;

/// Sender returned by [`bulk`].
pub struct Bulk<S, F> {
    pred: S,
    shape: usize,
    f: F,
}

/// Call `f(i, &mut value)` for every `i` in `0..shape`, in order, on the
/// completing thread, then forward the value.
pub fn bulk<S, F>(sender: S, shape: usize, f: F) -> Bulk<S, F>
where
    S: Sender,
    F: FnMut(usize, &mut S::Value) + Send + 'static,
{
    Bulk {
        pred: sender,
        shape,
        f,
    }
}

impl<S, F> Sender for Bulk<S, F>
where
    S: Sender,
    F: FnMut(usize, &mut S::Value) + Send + 'static,
{
    type Value = S::Value;
    type Operation<R: Receiver<S::Value>> = S::Operation<BulkReceiver<F, R>>;

    fn connect<R: Receiver<S::Value>>(self, receiver: R) -> Self::Operation<R> {
        let _trace = TraceScope::enter("connect", "Bulk");
        self.pred.connect(BulkReceiver {
            shape: self.shape,
            f: self.f,
            receiver,
        })
    }
}

/// Receiver running the [`bulk`] loop before forwarding.
pub struct BulkReceiver<F, R> {
    shape: usize,
    f: F,
    receiver: R,
}

impl<V, F, R> Receiver<V> for BulkReceiver<F, R>
where
    F: FnMut(usize, &mut V) + Send + 'static,
    R: Receiver<V>,
{
    fn complete(self, completion: Completion<V>) {
        let _trace = TraceScope::enter("complete", "Bulk");
        let BulkReceiver {
            shape,
            mut f,
            receiver,
        } = self;
        match completion {
            Completion::Value(mut value) => {
                let outcome = guarded(move || {
                    for i in 0..shape {
                        f(i, &mut value);
                    }
                    value
                });
                match outcome {
                    Ok(value) => receiver.set_value(value),
                    Err(error) => receiver.set_error(error),
                }
            }
            Completion::Error(error) => receiver.set_error(error),
            Completion::Stopped => receiver.set_stopped(),
        }
    }
}
