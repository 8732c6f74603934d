//! Inbound pagination markers and the fetch window derived from them
//!
//! # Example
//!
//! ```rust
//! use ledger_delivery::config::PaginationConfig;
//! use ledger_delivery::pagination::{Direction, PageQuery};
//!
//! let query = PageQuery {
//!     next_cursor: Some("ACC-1010".to_string()),
//!     prev_cursor: None,
//!     limit: Some(2),
//! };
//! assert_eq!(query.direction(), Direction::Forward);
//!
//! let window = query.window(&PaginationConfig::default()).unwrap();
//! assert_eq!(window.limit().get(), 2);
//! assert_eq!(window.fetch_size(), 3);
//! assert_eq!(window.cursor(), Some("ACC-1010"));
//! ```

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::classify::ApiError;
use crate::config::PaginationConfig;
use crate::validation::{self, RuleViolation, Validate};

/// Which way the current request pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// A next-cursor was supplied
    Forward,
    /// Only a prev-cursor was supplied
    Backward,
    /// No cursor: the first page
    First,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
            Self::First => write!(f, "first"),
        }
    }
}

/// `?nextCursor=..&prevCursor=..&limit=..`
///
/// `limit` is signed so that zero and negative values reach validation
/// instead of failing query parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

fn present(marker: &Option<String>) -> Option<&str> {
    marker.as_deref().filter(|value| !value.is_empty())
}

impl PageQuery {
    /// Direction signal; a non-empty next-cursor takes precedence
    #[must_use]
    pub fn direction(&self) -> Direction {
        if present(&self.next_cursor).is_some() {
            Direction::Forward
        } else if present(&self.prev_cursor).is_some() {
            Direction::Backward
        } else {
            Direction::First
        }
    }

    /// The cursor that positions this request, if any
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        match self.direction() {
            Direction::Forward => present(&self.next_cursor),
            Direction::Backward => present(&self.prev_cursor),
            Direction::First => None,
        }
    }

    fn limit_violations(&self, config: &PaginationConfig) -> Vec<RuleViolation> {
        match self.limit {
            Some(limit) if limit < 1 => vec![RuleViolation::new("limit", "min", 1)],
            Some(limit) if limit > i64::from(config.max_limit) => {
                vec![RuleViolation::new("limit", "max", config.max_limit)]
            }
            _ => Vec::new(),
        }
    }

    /// Validate the limit and build the fetch window for the upstream query
    pub fn window(&self, config: &PaginationConfig) -> Result<FetchWindow, ApiError> {
        validation::check(&BoundedPageQuery {
            query: self,
            config,
        })?;

        let requested = self
            .limit
            .and_then(|limit| u32::try_from(limit).ok())
            .unwrap_or(config.default_limit);
        let limit = NonZeroU32::new(requested)
            .or_else(|| NonZeroU32::new(config.default_limit))
            .unwrap_or(NonZeroU32::MIN);

        Ok(FetchWindow::new(
            limit,
            self.direction(),
            self.cursor().map(str::to_owned),
        ))
    }
}

struct BoundedPageQuery<'a> {
    query: &'a PageQuery,
    config: &'a PaginationConfig,
}

impl Validate for BoundedPageQuery<'_> {
    fn validate(&self) -> Vec<RuleViolation> {
        self.query.limit_violations(self.config)
    }
}

/// What the upstream query must fetch for one page
///
/// The probe row is part of the window: collaborators fetch
/// [`fetch_size`](Self::fetch_size) rows, never the raw limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchWindow {
    limit: NonZeroU32,
    direction: Direction,
    cursor: Option<String>,
}

impl FetchWindow {
    pub fn new(limit: NonZeroU32, direction: Direction, cursor: Option<String>) -> Self {
        Self {
            limit,
            direction,
            cursor,
        }
    }

    /// Window for the first page
    pub fn first(limit: NonZeroU32) -> Self {
        Self::new(limit, Direction::First, None)
    }

    /// Page size requested by the client
    #[must_use]
    pub fn limit(&self) -> NonZeroU32 {
        self.limit
    }

    /// Rows to fetch: the page plus one probe row
    #[must_use]
    pub fn fetch_size(&self) -> usize {
        self.limit.get() as usize + 1
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Keyset position to resume after (forward) or before (backward)
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Backward pages are fetched in descending key order
    #[must_use]
    pub fn descending(&self) -> bool {
        self.direction == Direction::Backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ErrorBody, ErrorClass};

    fn query(next: Option<&str>, prev: Option<&str>, limit: Option<i64>) -> PageQuery {
        PageQuery {
            next_cursor: next.map(str::to_owned),
            prev_cursor: prev.map(str::to_owned),
            limit,
        }
    }

    #[test]
    fn test_direction_signal() {
        assert_eq!(query(None, None, None).direction(), Direction::First);
        assert_eq!(query(Some("a"), None, None).direction(), Direction::Forward);
        assert_eq!(query(None, Some("a"), None).direction(), Direction::Backward);
        assert_eq!(query(Some("a"), Some("b"), None).direction(), Direction::Forward);
        assert_eq!(query(Some(""), Some("b"), None).direction(), Direction::Backward);
        assert_eq!(query(Some(""), Some(""), None).direction(), Direction::First);
    }

    #[test]
    fn test_cursor_follows_direction() {
        assert_eq!(query(Some("n"), Some("p"), None).cursor(), Some("n"));
        assert_eq!(query(Some(""), Some("p"), None).cursor(), Some("p"));
        assert_eq!(query(None, None, None).cursor(), None);
    }

    #[test]
    fn test_query_string_names() {
        let parsed: PageQuery =
            serde_json::from_value(serde_json::json!({"nextCursor": "x", "limit": 5})).unwrap();
        assert_eq!(parsed, query(Some("x"), None, Some(5)));
    }

    #[test]
    fn test_window_defaults_limit() {
        let window = query(None, None, None)
            .window(&PaginationConfig::default())
            .unwrap();
        assert_eq!(window.limit().get(), 20);
        assert_eq!(window.fetch_size(), 21);
        assert_eq!(window.direction(), Direction::First);
        assert!(!window.descending());
    }

    #[test]
    fn test_backward_window_is_descending() {
        let window = query(None, Some("p"), Some(2))
            .window(&PaginationConfig::default())
            .unwrap();
        assert!(window.descending());
        assert_eq!(window.cursor(), Some("p"));
    }

    #[test]
    fn test_non_positive_limit_is_rejected() {
        for limit in [0, -3] {
            let err = query(None, None, Some(limit))
                .window(&PaginationConfig::default())
                .unwrap_err();
            assert_eq!(err.class(), ErrorClass::Validation);
            match err.body() {
                ErrorBody::Validation(body) => {
                    assert_eq!(body.errors.len(), 1);
                    assert_eq!(body.errors[0].field, "limit");
                    assert_eq!(body.errors[0].code, "MIN");
                }
                ErrorBody::Flat(_) => panic!("expected a validation body"),
            }
        }
    }

    #[test]
    fn test_limit_above_maximum_is_rejected() {
        let config = PaginationConfig {
            default_limit: 10,
            max_limit: 50,
        };
        let err = query(None, None, Some(51)).window(&config).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation);
        assert!(query(None, None, Some(50)).window(&config).is_ok());
    }
}
