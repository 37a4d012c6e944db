use core::pin::Pin;

use crate::error::Error;
use crate::sender::lifecycle::Lifecycle;
use crate::sender::{Completion, OperationState, Receiver, Sender};
use crate::trace::TraceScope;

const SUBJECT: &str = "Just";

/// Sender that completes inline, on the thread calling `start`.
pub struct Just<V> {
    completion: Completion<V>,
}

/// Complete with `value` as soon as started.
pub fn just<V: Send + 'static>(value: V) -> Just<V> {
    Just {
        completion: Completion::Value(value),
    }
}

/// Complete with `error` as soon as started.
pub fn just_error<V: Send + 'static>(error: Error) -> Just<V> {
    Just {
        completion: Completion::Error(error),
    }
}

/// Complete with the stopped signal as soon as started.
pub fn just_stopped<V: Send + 'static>() -> Just<V> {
    Just {
        completion: Completion::Stopped,
    }
}

impl<V: Send + 'static> Sender for Just<V> {
    type Value = V;
    type Operation<R: Receiver<V>> = JustOperation<V, R>;

    fn connect<R: Receiver<V>>(self, receiver: R) -> JustOperation<V, R> {
        let _trace = TraceScope::enter("connect", SUBJECT);
        JustOperation {
            payload: Some((self.completion, receiver)),
            lifecycle: Lifecycle::new(),
        }
    }
}

/// Operation state of [`Just`].
pub struct JustOperation<V, R> {
    payload: Option<(Completion<V>, R)>,
    lifecycle: Lifecycle,
}

impl<V: Send + 'static, R: Receiver<V>> OperationState for JustOperation<V, R> {
    unsafe fn start(self: Pin<&mut Self>) {
        let _trace = TraceScope::enter("start", SUBJECT);
        // SAFETY: only the payload is taken out; the operation is not moved.
        let this = unsafe { self.get_unchecked_mut() };
        this.lifecycle.start(SUBJECT);
        let payload = this.payload.take();
        this.lifecycle.complete(SUBJECT);
        if let Some((completion, receiver)) = payload {
            receiver.complete(completion);
        }
    }
}
