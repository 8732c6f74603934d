//! Ledger service collaborators
//!
//! The accounting computation sits behind these traits. Services return
//! results by value: a [`ServiceError::Domain`] for business-rule failures,
//! [`ServiceError::Other`] for everything else. List operations honor the
//! [`FetchWindow`] they are given, including its probe row.

pub mod memory;
pub mod models;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::classify::ServiceError;
use crate::pagination::{FetchWindow, Listed};

pub use memory::InMemoryLedger;
pub use models::{
    Account, AccountKind, AccountResponse, JournalEntry, JournalFilter, JournalLine,
    JournalResponse, LedgerEntry, NewAccount, NewJournal, TrialBalance, TrialBalanceQuery,
    TrialBalanceRow, TrialBalanceSummary,
};

/// Chart of accounts
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Accounts in code order, windowed
    async fn list_accounts(&self, window: &FetchWindow) -> Result<Listed<Account>, ServiceError>;

    async fn get_account(&self, code: &str) -> Result<Account, ServiceError>;

    /// Open a new account
    ///
    /// Fails with `AccountAlreadyExists` when the code is taken.
    async fn create_account(&self, account: NewAccount) -> Result<Account, ServiceError>;

    /// Every ledger line of an account, oldest first, with the total count
    async fn account_entries(&self, code: &str) -> Result<Listed<LedgerEntry>, ServiceError>;
}

/// Journal postings
#[async_trait]
pub trait JournalService: Send + Sync {
    /// Journals in posting order, filtered then windowed
    ///
    /// Fails with `AccountNotFound` when the filter names an unknown account.
    async fn list_journals(
        &self,
        filter: &JournalFilter,
        window: &FetchWindow,
    ) -> Result<Listed<JournalEntry>, ServiceError>;

    async fn get_journal(&self, seq: u64) -> Result<JournalEntry, ServiceError>;

    /// Post a balanced journal
    async fn post_journal(&self, journal: NewJournal) -> Result<JournalEntry, ServiceError>;
}

/// Trial balance computation
#[async_trait]
pub trait TrialBalanceService: Send + Sync {
    /// Balances of every account over postings up to `as_of` (inclusive)
    async fn trial_balance(&self, as_of: Option<NaiveDate>) -> Result<TrialBalance, ServiceError>;
}
