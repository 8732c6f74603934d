//! Domain error identities
//!
//! Every business-rule failure a ledger service can report has a stable
//! identity here. Endpoints compare identities with `==` / `match`, never by
//! inspecting message text. The code and message of each identity live in a
//! single static table that is indexed once on first use and read-only after.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use thiserror::Error;

/// Stable identity of a business-rule failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainError {
    /// No account with the given code
    AccountNotFound,
    /// An account with the given code already exists
    AccountAlreadyExists,
    /// The account is closed to new postings
    AccountInactive,
    /// No journal entry with the given id
    JournalNotFound,
    /// Debits and credits of a journal entry differ
    JournalUnbalanced,
    /// A journal entry carries no lines
    JournalEmpty,
    /// The accounting period of the posting date is closed
    PeriodClosed,
    /// A journal line is in a different currency than its account
    CurrencyMismatch,
    /// Journal or book totals would not fit the amount type
    AmountOutOfRange,
}

struct DomainErrorEntry {
    error: DomainError,
    code: &'static str,
    message: &'static str,
}

const DOMAIN_ERRORS: &[DomainErrorEntry] = &[
    DomainErrorEntry {
        error: DomainError::AccountNotFound,
        code: "ACCOUNT_NOT_FOUND",
        message: "account not found",
    },
    DomainErrorEntry {
        error: DomainError::AccountAlreadyExists,
        code: "ACCOUNT_ALREADY_EXISTS",
        message: "account already exists",
    },
    DomainErrorEntry {
        error: DomainError::AccountInactive,
        code: "ACCOUNT_INACTIVE",
        message: "account is inactive",
    },
    DomainErrorEntry {
        error: DomainError::JournalNotFound,
        code: "JOURNAL_NOT_FOUND",
        message: "journal entry not found",
    },
    DomainErrorEntry {
        error: DomainError::JournalUnbalanced,
        code: "JOURNAL_UNBALANCED",
        message: "journal entry debits and credits do not balance",
    },
    DomainErrorEntry {
        error: DomainError::JournalEmpty,
        code: "JOURNAL_EMPTY",
        message: "journal entry has no lines",
    },
    DomainErrorEntry {
        error: DomainError::PeriodClosed,
        code: "PERIOD_CLOSED",
        message: "accounting period is closed",
    },
    DomainErrorEntry {
        error: DomainError::CurrencyMismatch,
        code: "CURRENCY_MISMATCH",
        message: "line currency does not match account currency",
    },
    DomainErrorEntry {
        error: DomainError::AmountOutOfRange,
        code: "AMOUNT_OUT_OF_RANGE",
        message: "journal amounts exceed the supported range",
    },
];

static REGISTRY: LazyLock<HashMap<DomainError, &'static DomainErrorEntry>> =
    LazyLock::new(|| DOMAIN_ERRORS.iter().map(|entry| (entry.error, entry)).collect());

impl DomainError {
    /// Stable machine code rendered to clients
    #[must_use]
    pub fn code(&self) -> &'static str {
        REGISTRY.get(self).map_or("UNKNOWN", |entry| entry.code)
    }

    /// Human-readable message
    #[must_use]
    pub fn message(&self) -> &'static str {
        REGISTRY.get(self).map_or("unknown domain error", |entry| entry.message)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for DomainError {}

/// Error returned by value from ledger services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A registered business-rule failure
    #[error("{0}")]
    Domain(DomainError),

    /// Anything else: storage failures, deadline expiry, bugs
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ServiceError {
    /// The domain identity, if this is a domain error
    #[must_use]
    pub fn domain(&self) -> Option<DomainError> {
        match self {
            Self::Domain(err) => Some(*err),
            Self::Other(_) => None,
        }
    }

    /// Whether this error carries the given domain identity
    #[must_use]
    pub fn is(&self, identity: DomainError) -> bool {
        self.domain() == Some(identity)
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_identity_is_registered() {
        assert_eq!(REGISTRY.len(), DOMAIN_ERRORS.len());
        for entry in DOMAIN_ERRORS {
            assert_ne!(entry.error.code(), "UNKNOWN");
        }
    }

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = DOMAIN_ERRORS.iter().map(|e| e.code).collect();
        assert_eq!(codes.len(), DOMAIN_ERRORS.len());
    }

    #[test]
    fn test_code_and_message_lookup() {
        assert_eq!(DomainError::AccountNotFound.code(), "ACCOUNT_NOT_FOUND");
        assert_eq!(DomainError::AccountNotFound.message(), "account not found");
        assert_eq!(DomainError::PeriodClosed.to_string(), "accounting period is closed");
    }

    #[test]
    fn test_service_error_identity() {
        let err = ServiceError::from(DomainError::JournalUnbalanced);
        assert!(err.is(DomainError::JournalUnbalanced));
        assert!(!err.is(DomainError::JournalEmpty));
        assert_eq!(err.to_string(), DomainError::JournalUnbalanced.message());

        let other = ServiceError::from(anyhow::anyhow!("connection reset"));
        assert_eq!(other.domain(), None);
        assert_eq!(other.to_string(), "connection reset");
    }
}
