//! Page envelope builder
//!
//! Turns an over-fetched, ordered slice into a [`Page`]. The slice must have
//! been fetched through a [`FetchWindow`]: at most `limit + 1` rows, ascending
//! for forward and first pages, descending for backward pages.

use std::num::NonZeroU32;

use serde::Serialize;

use super::envelope::{CursorPair, Page, PageInfo};
use super::query::{Direction, FetchWindow};

/// Capability every paginated item provides
pub trait Paginate {
    /// Public shape of the item
    type Response: Serialize;

    /// Opaque position of the item in the upstream ordering
    fn cursor(&self) -> String;

    /// Transform into the public shape
    fn to_response(self) -> Self::Response;
}

/// Rows returned by an upstream list query together with the total match count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listed<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Listed<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

impl<T: Paginate> Listed<T> {
    /// Build the page for the window these rows were fetched with
    pub fn into_page(self, kind: impl Into<String>, window: &FetchWindow) -> Page<T::Response> {
        build_page(kind, self.items, window.limit(), window.direction(), self.total)
    }
}

/// Build a cursor-paginated envelope
///
/// Receiving `limit` rows or more means the probe row is present: it is
/// dropped and never shown. Backward pages are reversed so contents are
/// always in ascending order. `next` is set on every backward page and
/// whenever more rows exist; `prev` on every forward page and on backward
/// pages with more rows. The first page never has a `prev`.
pub fn build_page<T: Paginate>(
    kind: impl Into<String>,
    mut data: Vec<T>,
    limit: NonZeroU32,
    direction: Direction,
    total_entries: u64,
) -> Page<T::Response> {
    let has_more = data.len() >= limit.get() as usize;

    if !data.is_empty() {
        if has_more {
            data.pop();
        }
        if direction == Direction::Backward {
            data.reverse();
        }
    }

    let mut cursors = CursorPair::default();
    if let (Some(first), Some(last)) = (data.first(), data.last()) {
        if direction == Direction::Backward || has_more {
            cursors.next = last.cursor();
        }
        if direction == Direction::Forward || (has_more && direction == Direction::Backward) {
            cursors.prev = first.cursor();
        }
    }

    let contents = data.into_iter().map(Paginate::to_response).collect();

    Page::new(
        kind,
        contents,
        PageInfo {
            cursors,
            total_entries,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(&'static str);

    impl Paginate for Row {
        type Response = String;

        fn cursor(&self) -> String {
            format!("c({})", self.0)
        }

        fn to_response(self) -> String {
            self.0.to_string()
        }
    }

    fn rows(ids: &[&'static str]) -> Vec<Row> {
        ids.iter().copied().map(Row).collect()
    }

    fn limit(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_first_page_without_probe() {
        let page = build_page("rows", rows(&["x1"]), limit(2), Direction::First, 1);
        assert_eq!(page.contents, vec!["x1"]);
        assert_eq!(page.cursors(), &CursorPair::default());
        assert_eq!(page.pagination.total_entries, 1);
    }

    #[test]
    fn test_forward_page_with_probe() {
        let page = build_page("rows", rows(&["x1", "x2", "x3"]), limit(2), Direction::Forward, 9);
        assert_eq!(page.contents, vec!["x1", "x2"]);
        assert_eq!(page.cursors().prev, "c(x1)");
        assert_eq!(page.cursors().next, "c(x2)");
    }

    #[test]
    fn test_backward_page_with_probe() {
        let page = build_page("rows", rows(&["y3", "y2", "y1"]), limit(2), Direction::Backward, 9);
        assert_eq!(page.contents, vec!["y2", "y3"]);
        assert_eq!(page.cursors().prev, "c(y2)");
        assert_eq!(page.cursors().next, "c(y3)");
    }

    #[test]
    fn test_empty_data_has_no_cursors() {
        for direction in [Direction::First, Direction::Forward, Direction::Backward] {
            for n in [1, 2, 50] {
                let page = build_page("rows", Vec::<Row>::new(), limit(n), direction, 0);
                assert!(page.is_empty());
                assert!(page.cursors().is_empty());
                assert_eq!(page.pagination.total_entries, 0);
            }
        }
    }

    #[test]
    fn test_short_page_is_untouched() {
        for direction in [Direction::First, Direction::Forward, Direction::Backward] {
            let page = build_page("rows", rows(&["a", "b"]), limit(5), direction, 2);
            assert_eq!(page.len(), 2);
            if direction == Direction::Backward {
                assert_eq!(page.contents, vec!["b", "a"]);
                assert_eq!(page.cursors().next, "c(a)");
                assert_eq!(page.cursors().prev, "");
            } else {
                assert_eq!(page.contents, vec!["a", "b"]);
                assert_eq!(page.cursors().next, "");
            }
        }
    }

    #[test]
    fn test_forward_short_page_keeps_prev() {
        let page = build_page("rows", rows(&["a"]), limit(3), Direction::Forward, 4);
        assert_eq!(page.cursors().prev, "c(a)");
        assert_eq!(page.cursors().next, "");
    }

    #[test]
    fn test_probe_is_trimmed_in_every_direction() {
        for direction in [Direction::First, Direction::Forward, Direction::Backward] {
            let data = rows(&["a", "b", "c", "d"]);
            let fetched = data.len();
            let page = build_page("rows", data, limit(3), direction, 10);
            assert_eq!(page.len(), fetched - 1);
            assert!(!page.cursors().next.is_empty());
        }
    }

    #[test]
    fn test_first_page_with_probe_has_no_prev() {
        let page = build_page("rows", rows(&["a", "b", "c"]), limit(2), Direction::First, 3);
        assert_eq!(page.cursors().prev, "");
        assert_eq!(page.cursors().next, "c(b)");
    }

    #[test]
    fn test_exactly_limit_rows_counts_as_probe() {
        let page = build_page("rows", rows(&["a", "b"]), limit(2), Direction::First, 2);
        assert_eq!(page.contents, vec!["a"]);
        assert_eq!(page.cursors().next, "c(a)");
    }

    #[test]
    fn test_build_page_is_pure() {
        let render = || {
            let page = build_page("rows", rows(&["y3", "y2", "y1"]), limit(2), Direction::Backward, 3);
            serde_json::to_vec(&page).unwrap()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_listed_into_page_uses_window() {
        let window = FetchWindow::new(limit(2), Direction::Forward, Some("c(x0)".into()));
        let page = Listed::new(rows(&["x1", "x2", "x3"]), 5).into_page("rows", &window);
        assert_eq!(page.kind, "rows");
        assert_eq!(page.contents, vec!["x1", "x2"]);
        assert_eq!(page.pagination.total_entries, 5);
    }
}
