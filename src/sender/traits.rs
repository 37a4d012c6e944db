use core::pin::Pin;

use crate::error::Error;

/// The single completion signal of an operation.
///
/// Exactly one of these is delivered per operation state.
#[derive(Debug)]
pub enum Completion<V> {
    /// Success with the value pack produced at this point of the chain.
    Value(V),
    /// Failure.
    Error(Error),
    /// The work was stopped before producing a value.
    Stopped,
}

impl<V> Completion<V> {
    /// Map the value channel, leaving error and stopped untouched.
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Completion<U> {
        match self {
            Completion::Value(v) => Completion::Value(f(v)),
            Completion::Error(e) => Completion::Error(e),
            Completion::Stopped => Completion::Stopped,
        }
    }

    /// `Value(v)` becomes `Ok(Some(v))`, `Stopped` becomes `Ok(None)`.
    pub fn into_result(self) -> crate::Result<Option<V>> {
        match self {
            Completion::Value(v) => Ok(Some(v)),
            Completion::Error(e) => Err(e),
            Completion::Stopped => Ok(None),
        }
    }
}

/// Completion sink.
///
/// Completing consumes the receiver, so a receiver is completed at most once.
/// Receivers travel to whichever loop thread completes them, hence
/// `Send + 'static`.
pub trait Receiver<V>: Send + 'static {
    /// Deliver the completion.
    fn complete(self, completion: Completion<V>);

    /// Shorthand for `complete(Completion::Value(value))`.
    #[inline]
    fn set_value(self, value: V)
    where
        Self: Sized,
    {
        self.complete(Completion::Value(value));
    }

    /// Shorthand for `complete(Completion::Error(error))`.
    #[inline]
    fn set_error(self, error: Error)
    where
        Self: Sized,
    {
        self.complete(Completion::Error(error));
    }

    /// Shorthand for `complete(Completion::Stopped)`.
    #[inline]
    fn set_stopped(self)
    where
        Self: Sized,
    {
        self.complete(Completion::Stopped);
    }
}

/// A connected sender/receiver pair, ready to be started.
///
/// Operation states are `Send`: a `let_value` successor is built on the thread
/// completing its predecessor and may be dropped on another one. State that is
/// tied to one thread is rejected:
///
/// ```compile_fail
/// use std::pin::Pin;
/// use std::rc::Rc;
///
/// use pex::OperationState;
///
/// struct ThreadBound(Rc<()>);
///
/// impl OperationState for ThreadBound {
///     unsafe fn start(self: Pin<&mut Self>) {}
/// }
/// ```
pub trait OperationState: Send {
    /// Begin execution. Nothing observable happens before this call.
    ///
    /// Starting twice is a contract violation and panics.
    ///
    /// # Safety
    /// The operation must stay alive (it is already pinned) until its receiver
    /// has been completed. Dropping it earlier may leave a dangling task in a
    /// run loop queue.
    unsafe fn start(self: Pin<&mut Self>);
}

/// Inert description of asynchronous work.
///
/// `connect` consumes the sender, so a sender is connected at most once, and
/// it must not start anything: only [`OperationState::start`] does.
pub trait Sender: Send + Sized {
    /// Value pack delivered on success.
    type Value: Send + 'static;

    /// Operation state produced by connecting to a receiver of type `R`.
    type Operation<R: Receiver<Self::Value>>: OperationState;

    /// Pair this sender with `receiver`.
    fn connect<R: Receiver<Self::Value>>(self, receiver: R) -> Self::Operation<R>;
}
