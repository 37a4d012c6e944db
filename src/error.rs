//! Error type delivered on the error channel of a [`Completion`](crate::Completion).
//!
//! Failures raised while evaluating a continuation never unwind past an
//! operation state: panics are caught and turned into [`Error::Panicked`],
//! user errors are boxed into [`Error::Failed`]. Contract violations (starting
//! an operation twice, completing it twice) are not errors; they panic.

use std::any::Any;
use std::fmt;

/// Errors surfaced by senders, contexts and [`sync_wait`](crate::sync_wait).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A continuation or successor factory panicked.
    #[error("continuation panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text, when it was a string.
        message: String,
    },
    /// A continuation returned an error.
    #[error(transparent)]
    Failed(Box<dyn std::error::Error + Send + Sync + 'static>),
    /// Work was scheduled onto a run loop that has finished or was dropped.
    #[error("run loop is closed")]
    LoopClosed,
    /// An operation dropped its receiver without completing it.
    #[error("operation was dropped before completing")]
    Abandoned,
    /// The dedicated context thread could not be spawned.
    #[error("failed to spawn context thread")]
    Spawn(#[source] std::io::Error),
    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    InvalidConfig {
        /// Environment variable name.
        var: &'static str,
        /// Raw value found in the environment.
        value: String,
    },
}

impl Error {
    /// Wrap any error type as [`Error::Failed`].
    pub fn failed<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Error::Failed(error.into())
    }

    /// Build an [`Error::Failed`] from a plain message.
    pub fn msg(message: impl fmt::Display) -> Self {
        Error::Failed(message.to_string().into())
    }

    /// Convert a panic payload caught with `catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "<non-string panic payload>".to_owned()
        };
        Error::Panicked { message }
    }

    /// Whether this error came from a caught panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, Error::Panicked { .. })
    }
}

/// Crate result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
