//! Response envelopes for list endpoints
//!
//! ```json
//! {"kind": "accounts", "contents": [...], "pagination": {"prev": "", "next": "c2", "totalEntries": 7}}
//! {"kind": "ledger_entries", "contents": [...], "total_rows": 7}
//! {"kind": "trial_balance", "contents": [...], "summary": {...}}
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Cursors of the neighbouring pages; empty string means "no such page"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPair {
    pub prev: String,
    pub next: String,
}

impl CursorPair {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prev.is_empty() && self.next.is_empty()
    }
}

/// `pagination` member of a paginated envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(flatten)]
    pub cursors: CursorPair,
    pub total_entries: u64,
}

/// Cursor-paginated list envelope
///
/// `D` is the type of the optional `details` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T, D = ()> {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<D>,
    pub contents: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    pub fn new(kind: impl Into<String>, contents: Vec<T>, pagination: PageInfo) -> Self {
        Self {
            kind: kind.into(),
            details: None,
            contents,
            pagination,
        }
    }
}

impl<T, D> Page<T, D> {
    /// Attach a `details` object
    #[must_use]
    pub fn with_details<E>(self, details: E) -> Page<T, E> {
        Page {
            kind: self.kind,
            details: Some(details),
            contents: self.contents,
            pagination: self.pagination,
        }
    }

    #[must_use]
    pub fn cursors(&self) -> &CursorPair {
        &self.pagination.cursors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl<T: Serialize, D: Serialize> IntoResponse for Page<T, D> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// List envelope carrying a total row count and no cursors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountedList<T> {
    pub kind: String,
    pub contents: Vec<T>,
    pub total_rows: u64,
}

impl<T> CountedList<T> {
    pub fn new(kind: impl Into<String>, contents: Vec<T>, total_rows: u64) -> Self {
        Self {
            kind: kind.into(),
            contents,
            total_rows,
        }
    }

    /// Map each item to its public shape
    pub fn map<U, F>(self, f: F) -> CountedList<U>
    where
        F: FnMut(T) -> U,
    {
        CountedList {
            kind: self.kind,
            contents: self.contents.into_iter().map(f).collect(),
            total_rows: self.total_rows,
        }
    }
}

impl<T: Serialize> IntoResponse for CountedList<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// List envelope carrying a summary object and no cursors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizedList<T, S> {
    pub kind: String,
    pub contents: Vec<T>,
    pub summary: S,
}

impl<T, S> SummarizedList<T, S> {
    pub fn new(kind: impl Into<String>, contents: Vec<T>, summary: S) -> Self {
        Self {
            kind: kind.into(),
            contents,
            summary,
        }
    }
}

impl<T: Serialize, S: Serialize> IntoResponse for SummarizedList<T, S> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
