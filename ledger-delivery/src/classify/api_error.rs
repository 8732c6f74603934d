//! Classified API errors
//!
//! An [`ApiError`] is the result of classifying a failure: an HTTP status, a
//! rendered body and the taxonomy class it belongs to. Endpoints build one from
//! their own decision table:
//!
//! ```rust
//! use axum::http::StatusCode;
//! use ledger_delivery::classify::{ApiError, DomainError, ServiceError};
//!
//! fn get_account_error(err: ServiceError) -> ApiError {
//!     match err.domain() {
//!         Some(DomainError::AccountNotFound) => {
//!             ApiError::domain(StatusCode::NOT_FOUND, DomainError::AccountNotFound)
//!         }
//!         _ => ApiError::unclassified(&err),
//!     }
//! }
//!
//! let err = get_account_error(DomainError::AccountNotFound.into());
//! assert_eq!(err.status(), StatusCode::NOT_FOUND);
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::body::{ErrorBody, ErrorCode, FieldViolation, FlatErrorBody, ValidationErrorBody};
use super::domain::DomainError;

/// Machine code of the canonical timeout failure
pub const TIMEOUT_CODE: &str = "REQUEST_TIMEOUT";

/// Message of the canonical timeout failure
pub const TIMEOUT_MESSAGE: &str = "request timed out";

const INTERNAL_MESSAGE: &str = "internal server error";

/// Taxonomy class of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Deadline exceeded, or a failure racing the deadline
    Timeout,
    /// Malformed body, unsupported content type, malformed query
    Transport,
    /// Field-level rule violations
    Validation,
    /// Registered business-rule failure matched by an endpoint
    Domain,
    /// Anything else
    Unclassified,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Transport => write!(f, "transport"),
            Self::Validation => write!(f, "validation"),
            Self::Domain => write!(f, "domain"),
            Self::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// Response extension marking a response produced from an [`ApiError`]
///
/// The lifecycle guard uses it to tell failed results from successful ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failure(pub ErrorClass);

/// A classified failure, ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    class: ErrorClass,
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// A domain error matched by an endpoint's decision table
    pub fn domain(status: StatusCode, err: DomainError) -> Self {
        Self {
            class: ErrorClass::Domain,
            status,
            body: ErrorBody::Flat(FlatErrorBody::new(
                ErrorCode::Named(err.code().to_string()),
                err.message(),
            )),
        }
    }

    /// Any error no decision table entry matched: 500 with the error's own message
    pub fn unclassified(err: &dyn fmt::Display) -> Self {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        Self {
            class: ErrorClass::Unclassified,
            status,
            body: ErrorBody::Flat(FlatErrorBody::new(
                ErrorCode::Status(status.as_u16()),
                err.to_string(),
            )),
        }
    }

    /// An internal failure whose cause must not reach the client
    pub fn internal() -> Self {
        Self::unclassified(&INTERNAL_MESSAGE)
    }

    /// The canonical timeout failure
    pub fn timeout() -> Self {
        Self {
            class: ErrorClass::Timeout,
            status: StatusCode::GATEWAY_TIMEOUT,
            body: ErrorBody::Flat(FlatErrorBody::new(
                ErrorCode::Named(TIMEOUT_CODE.to_string()),
                TIMEOUT_MESSAGE,
            )),
        }
    }

    /// A request rejected before reaching any service
    pub fn transport(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            class: ErrorClass::Transport,
            status,
            body: ErrorBody::Flat(FlatErrorBody::new(
                ErrorCode::Status(status.as_u16()),
                message,
            )),
        }
    }

    /// A validation error list
    pub fn validation(errors: Vec<FieldViolation>) -> Self {
        Self {
            class: ErrorClass::Validation,
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorBody::Validation(ValidationErrorBody::new(errors)),
        }
    }

    #[must_use]
    pub fn class(&self) -> ErrorClass {
        self.class
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn body(&self) -> &ErrorBody {
        &self.body
    }

    /// Status and rendered body
    #[must_use]
    pub fn classify(self) -> (StatusCode, ErrorBody) {
        (self.status, self.body)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            ErrorBody::Flat(body) => write!(f, "{} error ({}): {}", self.class, self.status, body.message),
            ErrorBody::Validation(body) => write!(
                f,
                "{} error ({}): {} violation(s)",
                self.class,
                self.status,
                body.errors.len()
            ),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.class == ErrorClass::Unclassified {
            tracing::error!(status = %self.status, "Unclassified error: {}", self);
        } else {
            tracing::debug!(class = %self.class, status = %self.status, "API error: {}", self);
        }

        let failure = Failure(self.class);
        let mut response = (self.status, Json(self.body)).into_response();
        response.extensions_mut().insert(failure);
        response
    }
}
