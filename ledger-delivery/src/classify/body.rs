//! Rendered error bodies
//!
//! Two shapes exist and every error response uses one of them:
//!
//! ```json
//! {"status": "error", "code": "ACCOUNT_NOT_FOUND", "message": "account not found"}
//! {"status": "error", "message": "validation failed", "errors": [{"code": "REQUIRED", "field": "name", "message": "name is required"}]}
//! ```

use serde::{Deserialize, Serialize};

/// Value of the `status` member of every error body
pub const ERROR_STATUS: &str = "error";

/// Message of every validation error body
pub const VALIDATION_FAILED: &str = "validation failed";

/// `code` member of a flat error: a domain code or the numeric HTTP status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    /// Stable machine code of a registered error
    Named(String),
    /// HTTP status for errors without a registered identity
    Status(u16),
}

/// `{status, code, message}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatErrorBody {
    pub status: String,
    pub code: ErrorCode,
    pub message: String,
}

impl FlatErrorBody {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: ERROR_STATUS.to_string(),
            code,
            message: message.into(),
        }
    }
}

/// One entry of a validation error list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Error code (e.g. "REQUIRED", "MIN", "UNKNOWN")
    pub code: String,
    /// Offending field
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl FieldViolation {
    pub fn new(
        code: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// `{status, message: "validation failed", errors: [...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    pub status: String,
    pub message: String,
    pub errors: Vec<FieldViolation>,
}

impl ValidationErrorBody {
    pub fn new(errors: Vec<FieldViolation>) -> Self {
        Self {
            status: ERROR_STATUS.to_string(),
            message: VALIDATION_FAILED.to_string(),
            errors,
        }
    }
}

/// Either error rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Validation(ValidationErrorBody),
    Flat(FlatErrorBody),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_body_with_named_code() {
        let body = FlatErrorBody::new(ErrorCode::Named("PERIOD_CLOSED".into()), "closed");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"status": "error", "code": "PERIOD_CLOSED", "message": "closed"})
        );
    }

    #[test]
    fn test_flat_body_with_numeric_code() {
        let body = FlatErrorBody::new(ErrorCode::Status(500), "boom");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"status": "error", "code": 500, "message": "boom"})
        );
    }

    #[test]
    fn test_validation_body_shape() {
        let body = ValidationErrorBody::new(vec![FieldViolation::new(
            "REQUIRED",
            "name",
            "name is required",
        )]);
        assert_eq!(
            serde_json::to_value(ErrorBody::Validation(body)).unwrap(),
            json!({
                "status": "error",
                "message": "validation failed",
                "errors": [{"code": "REQUIRED", "field": "name", "message": "name is required"}]
            })
        );
    }

    #[test]
    fn test_error_body_deserializes_both_shapes() {
        let flat: ErrorBody =
            serde_json::from_value(json!({"status": "error", "code": 404, "message": "x"})).unwrap();
        assert!(matches!(flat, ErrorBody::Flat(FlatErrorBody { code: ErrorCode::Status(404), .. })));

        let validation: ErrorBody = serde_json::from_value(
            json!({"status": "error", "message": "validation failed", "errors": []}),
        )
        .unwrap();
        assert!(matches!(validation, ErrorBody::Validation(_)));
    }
}
