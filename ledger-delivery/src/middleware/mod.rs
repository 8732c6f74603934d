//! Middleware layers wrapped around the ledger router
//!
//! The lifecycle guard lives in [`crate::guard`]; this module holds the
//! request tracking layers applied outside it.

pub mod request_tracking;

pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer, MakeLedgerRequestId,
    REQUEST_ID_PREFIX, SENSITIVE_HEADERS,
};
