//! Bidirectional keyset pagination
//!
//! Request side: [`PageQuery`] carries the `nextCursor` / `prevCursor` /
//! `limit` markers and yields a [`FetchWindow`] for the upstream query.
//! Response side: [`build_page`] turns the fetched rows into a [`Page`].
//!
//! # Example
//!
//! ```rust
//! use std::num::NonZeroU32;
//! use ledger_delivery::pagination::{build_page, Direction, Paginate};
//!
//! struct Entry(u64);
//!
//! impl Paginate for Entry {
//!     type Response = u64;
//!     fn cursor(&self) -> String { self.0.to_string() }
//!     fn to_response(self) -> u64 { self.0 }
//! }
//!
//! // limit = 2, three rows fetched: the third is the probe row
//! let rows = vec![Entry(11), Entry(12), Entry(13)];
//! let page = build_page("entries", rows, NonZeroU32::new(2).unwrap(), Direction::Forward, 40);
//!
//! assert_eq!(page.contents, vec![11, 12]);
//! assert_eq!(page.pagination.cursors.prev, "11");
//! assert_eq!(page.pagination.cursors.next, "12");
//! ```

pub mod builder;
pub mod envelope;
pub mod query;

pub use builder::{build_page, Listed, Paginate};
pub use envelope::{CountedList, CursorPair, Page, PageInfo, SummarizedList};
pub use query::{Direction, FetchWindow, PageQuery};
