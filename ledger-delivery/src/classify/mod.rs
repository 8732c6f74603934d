//! Error classification
//!
//! Shared pieces only: the two rendered body shapes, the domain error
//! registry and [`ApiError`]. Mapping a service error to a status code is the
//! job of each endpoint's own decision table (see [`crate::handlers`]).

pub mod api_error;
pub mod body;
pub mod domain;

pub use api_error::{ApiError, ErrorClass, Failure, TIMEOUT_CODE, TIMEOUT_MESSAGE};
pub use body::{
    ErrorBody, ErrorCode, FieldViolation, FlatErrorBody, ValidationErrorBody, ERROR_STATUS,
    VALIDATION_FAILED,
};
pub use domain::{DomainError, ServiceError};
