//! Ledger REST endpoints
//!
//! Each endpoint owns its decision table: a private `*_error` function that
//! matches the domain identities it knows into a status code. Anything it
//! does not match is rendered as an unclassified 500.
//!
//! | endpoint | domain identity | status |
//! |---|---|---|
//! | `GET /accounts/{code}` | `ACCOUNT_NOT_FOUND` | 404 |
//! | `POST /accounts` | `ACCOUNT_ALREADY_EXISTS` | 409 |
//! | `GET /accounts/{code}/entries` | `ACCOUNT_NOT_FOUND` | 404 |
//! | `GET /journals` | `ACCOUNT_NOT_FOUND` | 200, empty page |
//! | `GET /journals/{seq}` | `JOURNAL_NOT_FOUND` | 404 |
//! | `POST /journals` | unbalanced, empty, inactive account, currency mismatch | 422 |
//! | `POST /journals` | `ACCOUNT_NOT_FOUND` | 404 |
//! | `POST /journals` | `PERIOD_CLOSED` | 409 |

pub mod accounts;
pub mod journals;
pub mod reports;

pub use accounts::{account_entries, create_account, get_account, list_accounts};
pub use journals::{get_journal, list_journals, post_journal, JournalListDetails};
pub use reports::trial_balance;
