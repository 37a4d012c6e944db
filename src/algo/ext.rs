use crate::algo::bulk::{Bulk, bulk};
use crate::algo::let_value::{LetValue, let_value};
use crate::algo::pipe::Adaptor;
use crate::algo::then::{Then, TryThen, then, try_then};
use crate::algo::transfer::{Transfer, transfer};
use crate::algo::upon_error::{UponError, upon_error};
use crate::context::Scheduler;
use crate::error::{Error, Result};
use crate::sender::{BoxReceiver, BoxSender, Sender};

/// Method-chaining form of the combinators, available on every [`Sender`].
///
/// `s.then(f).then(g)` builds exactly the same chain as `then(then(s, f), g)`.
pub trait SenderExt: Sender {
    /// See [`then`](crate::then).
    fn then<F, U>(self, f: F) -> Then<Self, F>
    where
        F: FnOnce(Self::Value) -> U + Send + 'static,
        U: Send + 'static,
    {
        then(self, f)
    }

    /// See [`try_then`](crate::try_then).
    fn try_then<F, U, E>(self, f: F) -> TryThen<Self, F>
    where
        F: FnOnce(Self::Value) -> std::result::Result<U, E> + Send + 'static,
        U: Send + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        try_then(self, f)
    }

    /// See [`let_value`](crate::let_value).
    fn let_value<F, S2>(self, factory: F) -> LetValue<Self, F>
    where
        F: FnOnce(Self::Value) -> S2 + Send + 'static,
        S2: Sender + 'static,
    {
        let_value(self, factory)
    }

    /// See [`upon_error`](crate::upon_error).
    fn upon_error<F>(self, f: F) -> UponError<Self, F>
    where
        F: FnOnce(Error) -> Self::Value + Send + 'static,
    {
        upon_error(self, f)
    }

    /// See [`bulk`](crate::bulk).
    fn bulk<F>(self, shape: usize, f: F) -> Bulk<Self, F>
    where
        F: FnMut(usize, &mut Self::Value) + Send + 'static,
    {
        bulk(self, shape, f)
    }

    /// See [`transfer`](crate::transfer).
    fn transfer(self, scheduler: &Scheduler) -> Transfer<Self> {
        transfer(self, scheduler)
    }

    /// Apply a partially applied combinator from [`pipe`](crate::pipe).
    fn pipe<A: Adaptor<Self>>(self, adaptor: A) -> A::Output {
        adaptor.apply(self)
    }

    /// Erase the sender's type.
    fn boxed(self) -> BoxSender<Self::Value>
    where
        Self: 'static,
        Self::Operation<BoxReceiver<Self::Value>>: 'static,
    {
        BoxSender::new(self)
    }

    /// See [`sync_wait`](crate::sync_wait()).
    fn sync_wait(self) -> Result<Option<Self::Value>> {
        crate::sync_wait::sync_wait(self)
    }
}

impl<S: Sender> SenderExt for S {}
