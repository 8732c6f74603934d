//! # ledger-delivery
//!
//! Transport-facing delivery pipeline of a financial-ledger REST backend.
//!
//! Every request passes through the same three stages:
//!
//! - **Lifecycle guard**: the handler chain runs in its own task, racing a
//!   fixed deadline, with panics contained
//! - **Page envelope builder**: list results are fetched with one probe row
//!   and wrapped in a bidirectional cursor envelope
//! - **Error classifier**: failures become either a flat error body or a
//!   validation error list, with each endpoint deciding its own status codes
//!
//! ## Example
//!
//! ```rust,no_run
//! use ledger_delivery::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::in_memory(config.clone(), InMemoryLedger::seeded());
//!
//!     Server::new(config).serve(router(state)).await
//! }
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod guard;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod observability;
pub mod pagination;
pub mod server;
pub mod services;
pub mod state;
pub mod validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::classify::{
        ApiError, DomainError, ErrorBody, ErrorClass, FieldViolation, FlatErrorBody,
        ServiceError, ValidationErrorBody,
    };
    pub use crate::config::{Config, PaginationConfig};
    pub use crate::error::{Error, Result};
    pub use crate::extract::{ApiJson, ApiPath, ApiQuery};
    pub use crate::guard::{Deadline, GuardError, LifecycleGuard, Outcome};
    pub use crate::health::health;
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{
        build_page, CountedList, Direction, FetchWindow, Listed, Page, PageQuery, Paginate,
        SummarizedList,
    };
    pub use crate::server::{router, Server};
    pub use crate::services::{
        AccountService, InMemoryLedger, JournalService, TrialBalanceService,
    };
    pub use crate::state::{AppState, AppStateBuilder};
    pub use crate::validation::{RuleViolation, Validate};

    pub use axum::{
        extract::State,
        routing::{get, post},
        Json, Router,
    };
}
