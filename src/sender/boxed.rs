//! Type-erased senders.
//!
//! `let_value` factories that pick between differently shaped chains return a
//! [`BoxSender`], so one operation slot can hold whichever chain was chosen.

use core::pin::Pin;

use crate::sender::traits::{Completion, OperationState, Receiver, Sender};

trait ErasedReceiver<V>: Send {
    fn complete_boxed(self: Box<Self>, completion: Completion<V>);
}

impl<V, R: Receiver<V>> ErasedReceiver<V> for R {
    fn complete_boxed(self: Box<Self>, completion: Completion<V>) {
        (*self).complete(completion);
    }
}

/// A heap-allocated receiver of `V`.
pub struct BoxReceiver<V> {
    inner: Box<dyn ErasedReceiver<V>>,
}

impl<V: 'static> BoxReceiver<V> {
    /// Erase the type of `receiver`.
    pub fn new<R: Receiver<V>>(receiver: R) -> Self {
        Self {
            inner: Box::new(receiver),
        }
    }
}

impl<V: 'static> Receiver<V> for BoxReceiver<V> {
    fn complete(self, completion: Completion<V>) {
        self.inner.complete_boxed(completion);
    }
}

trait ErasedSender<V>: Send {
    fn connect_boxed(self: Box<Self>, receiver: BoxReceiver<V>) -> BoxOperation;
}

impl<S> ErasedSender<S::Value> for S
where
    S: Sender + 'static,
    S::Operation<BoxReceiver<S::Value>>: 'static,
{
    fn connect_boxed(self: Box<Self>, receiver: BoxReceiver<S::Value>) -> BoxOperation {
        BoxOperation {
            inner: Box::pin((*self).connect(receiver)),
        }
    }
}

/// A heap-allocated sender completing with `V`.
pub struct BoxSender<V> {
    inner: Box<dyn ErasedSender<V>>,
}

impl<V: Send + 'static> BoxSender<V> {
    /// Erase the type of `sender`.
    pub fn new<S>(sender: S) -> Self
    where
        S: Sender<Value = V> + 'static,
        S::Operation<BoxReceiver<V>>: 'static,
    {
        Self {
            inner: Box::new(sender),
        }
    }
}

impl<V: Send + 'static> Sender for BoxSender<V> {
    type Value = V;
    type Operation<R: Receiver<V>> = BoxOperation;

    fn connect<R: Receiver<V>>(self, receiver: R) -> BoxOperation {
        let _trace = crate::trace::TraceScope::enter("connect", "BoxSender");
        self.inner.connect_boxed(BoxReceiver::new(receiver))
    }
}

/// Operation state of a [`BoxSender`].
pub struct BoxOperation {
    inner: Pin<Box<dyn OperationState>>,
}

impl OperationState for BoxOperation {
    unsafe fn start(self: Pin<&mut Self>) {
        // SAFETY: the boxed state never moves; the caller upholds the liveness
        // contract for the box owner, which we forward.
        unsafe { self.get_mut().inner.as_mut().start() }
    }
}
