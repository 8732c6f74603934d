//! Per-request deadline
//!
//! The deadline is advisory. The guard answers with a timeout once it passes
//! and cancels the token, but the handler keeps running until it notices.
//! Handlers cooperate by wrapping their service calls in [`Deadline::bound`].

use std::future::Future;
use std::time::Duration;

use axum::{extract::FromRequestParts, http::request::Parts};
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::classify::{ApiError, ServiceError};

/// Raised by [`Deadline::bound`] when the deadline passes first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request deadline exceeded")]
pub struct DeadlineExceeded;

impl From<DeadlineExceeded> for ServiceError {
    fn from(err: DeadlineExceeded) -> Self {
        ServiceError::Other(err.into())
    }
}

/// Point in time by which a request must be answered, plus its cancellation signal
#[derive(Debug, Clone)]
pub struct Deadline {
    at: Instant,
    token: CancellationToken,
}

impl Deadline {
    /// Deadline `max_duration` from now
    pub fn after(max_duration: Duration) -> Self {
        Self {
            at: Instant::now() + max_duration,
            token: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn at(&self) -> Instant {
        self.at
    }

    /// Time left, zero once expired
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// Whether the deadline has passed or the request was cancelled
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.token.is_cancelled() || Instant::now() >= self.at
    }

    /// Signal every holder of this deadline that the request is over
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Token for code that wants to observe cancellation directly
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Resolves when the deadline passes or the request is cancelled
    pub async fn expired(&self) {
        tokio::select! {
            _ = tokio::time::sleep_until(self.at) => {}
            _ = self.token.cancelled() => {}
        }
    }

    /// Run `work` until it completes or the deadline passes
    pub async fn bound<F, T, E>(&self, work: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<DeadlineExceeded>,
    {
        tokio::select! {
            biased;
            result = work => result,
            _ = self.expired() => Err(DeadlineExceeded.into()),
        }
    }
}

impl<S> FromRequestParts<S> for Deadline
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Deadline>().cloned().ok_or_else(|| {
            tracing::error!("Handler requested a deadline outside the lifecycle guard");
            ApiError::internal()
        })
    }
}
