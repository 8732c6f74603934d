//! Deadline race outcomes

use std::any::Any;

use thiserror::Error;

/// How a guarded handler run ended
///
/// Produced once per request by [`LifecycleGuard::race`](super::LifecycleGuard::race)
/// and consumed once when the guard settles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The handler finished before the deadline
    Completed(T),
    /// The deadline elapsed first
    TimedOut,
    /// The handler panicked before the deadline; carries the panic value
    Panicked(String),
}

impl<T> Outcome<T> {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

impl<T, E> Outcome<Result<T, E>> {
    /// Collapse the outcome into the guarded result
    ///
    /// `deadline_passed` is whether the deadline had elapsed when the handler
    /// finished. A failed or panicked handler that finished past its deadline
    /// is reported as a timeout, not as its own failure.
    pub fn settle(self, deadline_passed: bool) -> Result<T, GuardError<E>> {
        match self {
            Self::Completed(Ok(value)) => Ok(value),
            Self::TimedOut => Err(GuardError::Timeout),
            Self::Completed(Err(_)) | Self::Panicked(_) if deadline_passed => {
                Err(GuardError::Timeout)
            }
            Self::Completed(Err(err)) => Err(GuardError::Handler(err)),
            Self::Panicked(value) => Err(GuardError::Panic(value)),
        }
    }
}

/// Failure of a guarded handler run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError<E> {
    #[error("request timed out")]
    Timeout,

    #[error("panic: {0}")]
    Panic(String),

    #[error("{0}")]
    Handler(E),
}

impl<E> GuardError<E> {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// Render a recovered panic payload
pub(crate) fn panic_value(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
