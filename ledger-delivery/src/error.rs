//! Error types and HTTP response conversion

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::classify::ApiError;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Process-level errors: start-up, configuration and server failures
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tracing subscriber could not be installed
    #[error("Tracing error: {0}")]
    Tracing(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Internal error: {}", self);
        ApiError::internal().into_response()
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
