//! Request lifecycle guard
//!
//! Every request runs its handler chain in a task of its own, racing a fixed
//! deadline. Whichever finishes first answers the request:
//!
//! - handler first: its response goes out untouched, unless it failed after
//!   the deadline had already elapsed, in which case the timeout answer goes out
//! - deadline first: the canonical timeout answer goes out immediately and the
//!   deadline's token is cancelled; the handler task is left to finish on its
//!   own and whatever it produces is dropped
//!
//! Panics in the handler chain are caught here and nowhere else.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use axum::{middleware, routing::get, Router};
//! use ledger_delivery::guard::LifecycleGuard;
//!
//! let guard = LifecycleGuard::new(Duration::from_secs(30));
//! let app: Router = Router::new()
//!     .route("/slow", get(|| async { "done" }))
//!     .layer(middleware::from_fn_with_state(guard, LifecycleGuard::middleware));
//! ```

pub mod deadline;
pub mod outcome;

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use tokio::sync::oneshot;
use tracing::{error, warn};

use crate::classify::{ApiError, Failure};
use crate::config::Config;

pub use deadline::{Deadline, DeadlineExceeded};
pub use outcome::{GuardError, Outcome};

/// Deadline race and panic isolation around a handler chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleGuard {
    max_duration: Duration,
}

impl LifecycleGuard {
    pub fn new(max_duration: Duration) -> Self {
        Self { max_duration }
    }

    /// Guard using the process-wide request timeout
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.request_timeout())
    }

    #[must_use]
    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// Fresh deadline for a request starting now
    #[must_use]
    pub fn deadline(&self) -> Deadline {
        Deadline::after(self.max_duration)
    }

    /// Race `work` against `deadline`
    ///
    /// `work` is spawned and reports through a one-shot channel. Only the
    /// first signal is consumed: a completion that arrives after the deadline
    /// finds the receiver gone and is dropped.
    pub async fn race<F>(&self, deadline: &Deadline, work: F) -> Outcome<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let result = AssertUnwindSafe(work).catch_unwind().await;
            // Err means the deadline already answered
            let _ = tx.send(result);
        });

        tokio::select! {
            biased;
            received = rx => match received {
                Ok(Ok(output)) => Outcome::Completed(output),
                Ok(Err(payload)) => Outcome::Panicked(outcome::panic_value(payload.as_ref())),
                Err(_) => Outcome::Panicked("handler task was dropped".to_string()),
            },
            _ = deadline.expired() => {
                deadline.cancel();
                Outcome::TimedOut
            }
        }
    }

    /// Run a fallible handler under a fresh deadline
    ///
    /// The handler receives the deadline so it can bound its own service
    /// calls or watch the cancellation token.
    pub async fn run<H, F, T, E>(&self, handler: H) -> Result<T, GuardError<E>>
    where
        H: FnOnce(Deadline) -> F,
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let deadline = self.deadline();
        let outcome = self.race(&deadline, handler(deadline.clone())).await;
        outcome.settle(deadline.is_expired())
    }

    /// Axum middleware guarding the rest of the chain
    ///
    /// A response carrying the [`Failure`] marker counts as a failed result.
    /// The request's [`Deadline`] is placed in its extensions for handlers to
    /// extract.
    pub async fn middleware(
        State(guard): State<Self>,
        mut request: Request,
        next: Next,
    ) -> Response {
        let method = request.method().clone();
        let path = request.uri().path().to_owned();

        let deadline = guard.deadline();
        request.extensions_mut().insert(deadline.clone());

        let chain = async move {
            let response = next.run(request).await;
            if response.extensions().get::<Failure>().is_some() {
                Err(response)
            } else {
                Ok(response)
            }
        };

        let outcome = guard.race(&deadline, chain).await;
        match outcome.settle(deadline.is_expired()) {
            Ok(response) | Err(GuardError::Handler(response)) => response,
            Err(GuardError::Timeout) => {
                warn!(
                    %method,
                    %path,
                    max_duration = ?guard.max_duration,
                    "Request exceeded its deadline"
                );
                ApiError::timeout().into_response()
            }
            Err(GuardError::Panic(value)) => {
                error!(%method, %path, "Handler panicked: {}", value);
                ApiError::internal().into_response()
            }
        }
    }
}
