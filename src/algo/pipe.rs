//! Partial application of combinators for pipe-style composition.
//!
//! Each function here captures the combinator's arguments without a sender;
//! the returned [`Adaptor`] is applied with [`SenderExt::pipe`](crate::SenderExt::pipe)
//! or the `|` operator:
//!
//! ```
//! use pex::prelude::*;
//!
//! let chain = just(1) | pipe::then(|n: i32| n + 1) | pipe::bulk(2, |i: usize, n: &mut i32| *n += i as i32);
//! assert_eq!(sync_wait(chain).unwrap(), Some(3));
//! ```

use core::ops::BitOr;

use crate::algo::bulk::{Bulk, bulk as bulk_sender};
use crate::algo::just::Just;
use crate::algo::let_value::{LetValue, let_value as let_value_sender};
use crate::algo::then::{Then, TryThen, then as then_sender, try_then as try_then_sender};
use crate::algo::transfer::{Transfer, transfer as transfer_sender};
use crate::algo::upon_error::{UponError, upon_error as upon_error_sender};
use crate::context::{Schedule, Scheduler};
use crate::error::Error;
use crate::sender::{BoxSender, Sender};

/// A combinator waiting for the sender it applies to.
pub trait Adaptor<S: Sender> {
    /// Sender produced by the application.
    type Output: Sender;

    /// Apply to `sender`.
    fn apply(self, sender: S) -> Self::Output;
}

/// Partial [`then`](crate::then).
pub struct ThenAdaptor<F>(F);

/// `then` without its sender.
pub fn then<F>(f: F) -> ThenAdaptor<F> {
    ThenAdaptor(f)
}

impl<S, F, U> Adaptor<S> for ThenAdaptor<F>
where
    S: Sender,
    F: FnOnce(S::Value) -> U + Send + 'static,
    U: Send + 'static,
{
    type Output = Then<S, F>;

    fn apply(self, sender: S) -> Then<S, F> {
        then_sender(sender, self.0)
    }
}

/// Partial [`try_then`](crate::try_then).
pub struct TryThenAdaptor<F>(F);

/// `try_then` without its sender.
pub fn try_then<F>(f: F) -> TryThenAdaptor<F> {
    TryThenAdaptor(f)
}

impl<S, F, U, E> Adaptor<S> for TryThenAdaptor<F>
where
    S: Sender,
    F: FnOnce(S::Value) -> Result<U, E> + Send + 'static,
    U: Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    type Output = TryThen<S, F>;

    fn apply(self, sender: S) -> TryThen<S, F> {
        try_then_sender(sender, self.0)
    }
}

/// Partial [`let_value`](crate::let_value).
pub struct LetValueAdaptor<F>(F);

/// `let_value` without its sender.
pub fn let_value<F>(factory: F) -> LetValueAdaptor<F> {
    LetValueAdaptor(factory)
}

impl<S, F, S2> Adaptor<S> for LetValueAdaptor<F>
where
    S: Sender,
    F: FnOnce(S::Value) -> S2 + Send + 'static,
    S2: Sender + 'static,
{
    type Output = LetValue<S, F>;

    fn apply(self, sender: S) -> LetValue<S, F> {
        let_value_sender(sender, self.0)
    }
}

/// Partial [`upon_error`](crate::upon_error).
pub struct UponErrorAdaptor<F>(F);

/// `upon_error` without its sender.
pub fn upon_error<F>(f: F) -> UponErrorAdaptor<F> {
    UponErrorAdaptor(f)
}

impl<S, F> Adaptor<S> for UponErrorAdaptor<F>
where
    S: Sender,
    F: FnOnce(Error) -> S::Value + Send + 'static,
{
    type Output = UponError<S, F>;

    fn apply(self, sender: S) -> UponError<S, F> {
        upon_error_sender(sender, self.0)
    }
}

/// Partial [`bulk`](crate::bulk).
pub struct BulkAdaptor<F> {
    shape: usize,
    f: F,
}

/// `bulk` without its sender.
pub fn bulk<F>(shape: usize, f: F) -> BulkAdaptor<F> {
    BulkAdaptor { shape, f }
}

impl<S, F> Adaptor<S> for BulkAdaptor<F>
where
    S: Sender,
    F: FnMut(usize, &mut S::Value) + Send + 'static,
{
    type Output = Bulk<S, F>;

    fn apply(self, sender: S) -> Bulk<S, F> {
        bulk_sender(sender, self.shape, self.f)
    }
}

/// Partial [`transfer`](crate::transfer).
pub struct TransferAdaptor(Scheduler);

/// `transfer` without its sender.
pub fn transfer(scheduler: &Scheduler) -> TransferAdaptor {
    TransferAdaptor(scheduler.clone())
}

impl<S: Sender> Adaptor<S> for TransferAdaptor {
    type Output = Transfer<S>;

    fn apply(self, sender: S) -> Transfer<S> {
        transfer_sender(sender, &self.0)
    }
}

macro_rules! impl_pipe {
    ($($ty:ident<$($p:ident),+>),+ $(,)?) => {$(
        impl<$($p,)+ A> BitOr<A> for $ty<$($p),+>
        where
            $ty<$($p),+>: Sender,
            A: Adaptor<$ty<$($p),+>>,
        {
            type Output = A::Output;

            fn bitor(self, adaptor: A) -> A::Output {
                adaptor.apply(self)
            }
        }
    )+};
}

impl_pipe!(
    Schedule<V>,
    Just<V>,
    BoxSender<V>,
    Then<S, F>,
    TryThen<S, F>,
    LetValue<S, F>,
    UponError<S, F>,
    Bulk<S, F>,
    Transfer<S>,
);
