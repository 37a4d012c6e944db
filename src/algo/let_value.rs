//! `let_value`: continue with a sender chosen from the predecessor's value.
//!
//! The successor's type is fixed by the factory's return type; factories that
//! choose between differently shaped chains return a
//! [`BoxSender`](crate::BoxSender). The successor operation lives in a heap
//! slot owned by the composite operation, so it never moves once started.

use core::marker::PhantomPinned;
use core::pin::Pin;
use core::ptr::NonNull;

use crate::algo::guarded;
use crate::sender::{Completion, OperationState, Receiver, Sender};
use crate::trace::TraceScope;

/// Sender returned by [`let_value`].
pub struct LetValue<S, F> {
    pred: S,
    factory: F,
}

/// On success of `sender`, call `factory(value)`, then connect and start the
/// sender it returns; its completion is the completion of the whole chain.
///
/// A panic in `factory` becomes [`Error::Panicked`](crate::Error::Panicked).
pub fn let_value<S, F, S2>(sender: S, factory: F) -> LetValue<S, F>
where
    S: Sender,
    F: FnOnce(S::Value) -> S2 + Send + 'static,
    S2: Sender + 'static,
{
    LetValue {
        pred: sender,
        factory,
    }
}

impl<S, F, S2> Sender for LetValue<S, F>
where
    S: Sender,
    F: FnOnce(S::Value) -> S2 + Send + 'static,
    S2: Sender + 'static,
{
    type Value = S2::Value;
    type Operation<R: Receiver<S2::Value>> = LetValueOperation<S, F, S2, R>;

    fn connect<R: Receiver<S2::Value>>(self, receiver: R) -> LetValueOperation<S, F, S2, R> {
        let _trace = TraceScope::enter("connect", "LetValue");
        let state = Box::new(LetState {
            factory: Some(self.factory),
            receiver: Some(receiver),
            successor: None,
        });
        let state = NonNull::from(Box::leak(state));
        LetValueOperation {
            pred: self.pred.connect(LetPredReceiver { state }),
            state,
            _pin: PhantomPinned,
        }
    }
}

struct LetState<F, S2: Sender, R: Receiver<S2::Value>> {
    factory: Option<F>,
    receiver: Option<R>,
    successor: Option<S2::Operation<R>>,
}

/// Operation state of [`LetValue`]: the predecessor operation plus the slot
/// the successor operation is built into.
pub struct LetValueOperation<S, F, S2, R>
where
    S: Sender,
    F: FnOnce(S::Value) -> S2 + Send + 'static,
    S2: Sender + 'static,
    R: Receiver<S2::Value>,
{
    pred: S::Operation<LetPredReceiver<F, S2, R>>,
    state: NonNull<LetState<F, S2, R>>,
    _pin: PhantomPinned,
}

impl<S, F, S2, R> OperationState for LetValueOperation<S, F, S2, R>
where
    S: Sender,
    F: FnOnce(S::Value) -> S2 + Send + 'static,
    S2: Sender + 'static,
    R: Receiver<S2::Value>,
{
    unsafe fn start(self: Pin<&mut Self>) {
        let _trace = TraceScope::enter("start", "LetValue");
        // SAFETY: structural projection; `pred` is never moved out.
        let pred = unsafe { self.map_unchecked_mut(|op| &mut op.pred) };
        unsafe { pred.start() }
    }
}

impl<S, F, S2, R> Drop for LetValueOperation<S, F, S2, R>
where
    S: Sender,
    F: FnOnce(S::Value) -> S2 + Send + 'static,
    S2: Sender + 'static,
    R: Receiver<S2::Value>,
{
    fn drop(&mut self) {
        // SAFETY: allocated in `connect` and owned exclusively by this operation.
        drop(unsafe { Box::from_raw(self.state.as_ptr()) });
    }
}

/// Receiver connected to the predecessor of a [`LetValue`].
pub struct LetPredReceiver<F, S2: Sender, R: Receiver<S2::Value>> {
    state: NonNull<LetState<F, S2, R>>,
}

// SAFETY: the state is touched only by the thread delivering the predecessor's
// completion, and the owning operation outlives that completion. Everything the
// state holds is `Send`, so it may be freed on another thread.
unsafe impl<F, S2, R> Send for LetPredReceiver<F, S2, R>
where
    F: Send,
    S2: Sender,
    R: Receiver<S2::Value>,
    S2::Operation<R>: Send,
{
}

// SAFETY: `state` is uniquely owned by this operation and every part of it is
// `Send`; see `LetPredReceiver`.
unsafe impl<S, F, S2, R> Send for LetValueOperation<S, F, S2, R>
where
    S: Sender,
    F: FnOnce(S::Value) -> S2 + Send + 'static,
    S2: Sender + 'static,
    R: Receiver<S2::Value>,
    S2::Operation<R>: Send,
{
}

impl<V, F, S2, R> Receiver<V> for LetPredReceiver<F, S2, R>
where
    F: FnOnce(V) -> S2 + Send + 'static,
    S2: Sender + 'static,
    R: Receiver<S2::Value>,
{
    fn complete(self, completion: Completion<V>) {
        let _trace = TraceScope::enter("complete", "LetValue");
        // SAFETY: see the Send impl above.
        let state = unsafe { &mut *self.state.as_ptr() };
        let (Some(factory), Some(receiver)) = (state.factory.take(), state.receiver.take()) else {
            panic!("contract violation: LetValue predecessor completed twice");
        };
        match completion {
            Completion::Value(value) => match guarded(move || factory(value)) {
                Ok(successor) => {
                    let op = state.successor.insert(successor.connect(receiver));
                    // SAFETY: the slot sits in a heap allocation that stays put
                    // until the composite operation is dropped, which happens
                    // only after this successor completes.
                    unsafe { Pin::new_unchecked(op).start() }
                }
                Err(error) => receiver.set_error(error),
            },
            Completion::Error(error) => receiver.set_error(error),
            Completion::Stopped => receiver.set_stopped(),
        }
    }
}
