//! Translation of structural rule violations into a validation error list
//!
//! Request types report violations as `(field, rule, param)` triples through
//! [`Validate`]. Known rules get a code and message from a static table;
//! unknown rules are never dropped and become a generic `UNKNOWN` entry
//! whose message is `"<rule> <param>"` (just `"<rule>"` for parameterless rules).

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::classify::{ApiError, FieldViolation};

/// Code used for rules missing from the message table
pub const UNKNOWN_RULE_CODE: &str = "UNKNOWN";

/// A single rule a field failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    /// Field name as seen by the client
    pub field: String,
    /// Rule name (e.g. "required", "min")
    pub rule: String,
    /// Rule parameter, empty when the rule takes none
    pub param: String,
}

impl RuleViolation {
    pub fn new(field: impl Into<String>, rule: impl Into<String>, param: impl ToString) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            param: param.to_string(),
        }
    }

    /// A parameterless violation
    pub fn rule(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self::new(field, rule, "")
    }
}

/// Structural validation of a request value
pub trait Validate {
    /// All violations, in field order. Empty when the value is valid.
    fn validate(&self) -> Vec<RuleViolation>;
}

struct RuleMessage {
    code: &'static str,
    render: fn(&RuleViolation) -> String,
}

static KNOWN_RULES: LazyLock<HashMap<&'static str, RuleMessage>> = LazyLock::new(|| {
    let rules: [(&'static str, RuleMessage); 9] = [
        (
            "required",
            RuleMessage {
                code: "REQUIRED",
                render: |v| format!("{} is required", v.field),
            },
        ),
        (
            "min",
            RuleMessage {
                code: "MIN",
                render: |v| format!("{} must be at least {}", v.field, v.param),
            },
        ),
        (
            "max",
            RuleMessage {
                code: "MAX",
                render: |v| format!("{} must be at most {}", v.field, v.param),
            },
        ),
        (
            "len",
            RuleMessage {
                code: "LEN",
                render: |v| format!("{} must be exactly {} characters", v.field, v.param),
            },
        ),
        (
            "oneof",
            RuleMessage {
                code: "ONE_OF",
                render: |v| format!("{} must be one of [{}]", v.field, v.param),
            },
        ),
        (
            "gt",
            RuleMessage {
                code: "GREATER_THAN",
                render: |v| format!("{} must be greater than {}", v.field, v.param),
            },
        ),
        (
            "gte",
            RuleMessage {
                code: "GREATER_THAN_OR_EQUAL",
                render: |v| format!("{} must be greater than or equal to {}", v.field, v.param),
            },
        ),
        (
            "alphanum",
            RuleMessage {
                code: "ALPHANUMERIC",
                render: |v| format!("{} must contain only letters and digits", v.field),
            },
        ),
        (
            "uppercase",
            RuleMessage {
                code: "UPPERCASE",
                render: |v| format!("{} must be uppercase", v.field),
            },
        ),
    ];
    rules.into_iter().collect()
});

fn translate_one(violation: &RuleViolation) -> FieldViolation {
    match KNOWN_RULES.get(violation.rule.as_str()) {
        Some(known) => FieldViolation::new(known.code, &violation.field, (known.render)(violation)),
        None => FieldViolation::new(
            UNKNOWN_RULE_CODE,
            &violation.field,
            format!("{} {}", violation.rule, violation.param)
                .trim_end()
                .to_string(),
        ),
    }
}

/// Translate violations into the rendered list
///
/// Keeps the first occurrence of each distinct `(field, rule)` pair, in order.
pub fn translate(violations: &[RuleViolation]) -> Vec<FieldViolation> {
    let mut seen = HashSet::new();
    violations
        .iter()
        .filter(|v| seen.insert((v.field.as_str(), v.rule.as_str())))
        .map(translate_one)
        .collect()
}

/// Validate a request value, classifying any violation as a validation error
pub fn check<T: Validate + ?Sized>(value: &T) -> Result<(), ApiError> {
    let violations = value.validate();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(translate(&violations)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ErrorBody, ErrorClass};

    struct Payload {
        name: String,
        amount: i64,
    }

    impl Validate for Payload {
        fn validate(&self) -> Vec<RuleViolation> {
            let mut out = Vec::new();
            if self.name.is_empty() {
                out.push(RuleViolation::rule("name", "required"));
                out.push(RuleViolation::rule("name", "slug"));
            }
            if self.amount < 1 {
                out.push(RuleViolation::new("amount", "min", 1));
            }
            out
        }
    }

    #[test]
    fn test_known_rules_use_table() {
        let list = translate(&[RuleViolation::new("limit", "max", 100)]);
        assert_eq!(
            list,
            vec![FieldViolation::new("MAX", "limit", "limit must be at most 100")]
        );
    }

    #[test]
    fn test_unknown_rule_degrades_to_generic_entry() {
        let list = translate(&[RuleViolation::new("code", "iban", "DE")]);
        assert_eq!(list, vec![FieldViolation::new("UNKNOWN", "code", "iban DE")]);
    }

    #[test]
    fn test_length_equals_distinct_violations() {
        let violations = vec![
            RuleViolation::rule("name", "required"),
            RuleViolation::rule("name", "required"),
            RuleViolation::new("name", "min", 3),
            RuleViolation::new("amount", "gt", 0),
            RuleViolation::rule("amount", "custom_rule"),
        ];
        let list = translate(&violations);
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].code, "REQUIRED");
        assert_eq!(list[1].code, "MIN");
        assert_eq!(list[2].code, "GREATER_THAN");
        assert_eq!(list[3].code, "UNKNOWN");
    }

    #[test]
    fn test_check_passes_valid_value() {
        let payload = Payload {
            name: "cash".to_string(),
            amount: 10,
        };
        assert!(check(&payload).is_ok());
    }

    #[test]
    fn test_check_reports_every_violation() {
        let payload = Payload {
            name: String::new(),
            amount: 0,
        };
        let err = check(&payload).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation);
        match err.body() {
            ErrorBody::Validation(body) => {
                assert_eq!(body.errors.len(), 3);
                assert_eq!(body.errors[1], FieldViolation::new("UNKNOWN", "name", "slug"));
            }
            ErrorBody::Flat(_) => panic!("expected a validation body"),
        }
    }
}
