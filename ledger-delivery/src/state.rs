//! Application state shared across handlers

use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::{AccountService, InMemoryLedger, JournalService, TrialBalanceService};

/// Application state shared across handlers
///
/// Cloning is cheap: every member is reference counted.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    accounts: Arc<dyn AccountService>,
    journals: Arc<dyn JournalService>,
    trial_balance: Arc<dyn TrialBalanceService>,
}

impl AppState {
    /// Create a new builder for AppState
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// State backed by a single in-memory ledger
    pub fn in_memory(config: Config, ledger: InMemoryLedger) -> Self {
        let ledger = Arc::new(ledger);
        Self {
            config: Arc::new(config),
            accounts: ledger.clone(),
            journals: ledger.clone(),
            trial_balance: ledger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn accounts(&self) -> &dyn AccountService {
        self.accounts.as_ref()
    }

    pub fn journals(&self) -> &dyn JournalService {
        self.journals.as_ref()
    }

    pub fn trial_balance(&self) -> &dyn TrialBalanceService {
        self.trial_balance.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for AppState
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    accounts: Option<Arc<dyn AccountService>>,
    journals: Option<Arc<dyn JournalService>>,
    trial_balance: Option<Arc<dyn TrialBalanceService>>,
}

impl AppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn accounts(mut self, service: Arc<dyn AccountService>) -> Self {
        self.accounts = Some(service);
        self
    }

    #[must_use]
    pub fn journals(mut self, service: Arc<dyn JournalService>) -> Self {
        self.journals = Some(service);
        self
    }

    #[must_use]
    pub fn trial_balance(mut self, service: Arc<dyn TrialBalanceService>) -> Self {
        self.trial_balance = Some(service);
        self
    }

    /// Use one backend for every service
    #[must_use]
    pub fn ledger<L>(self, ledger: Arc<L>) -> Self
    where
        L: AccountService + JournalService + TrialBalanceService + 'static,
    {
        self.accounts(ledger.clone())
            .journals(ledger.clone())
            .trial_balance(ledger)
    }

    /// Build the AppState
    ///
    /// Config falls back to `Config::default()`; every service must be set.
    pub fn build(self) -> Result<AppState> {
        let missing = |name: &str| Error::Internal(format!("{name} service not configured"));

        Ok(AppState {
            config: Arc::new(self.config.unwrap_or_default()),
            accounts: self.accounts.ok_or_else(|| missing("account"))?,
            journals: self.journals.ok_or_else(|| missing("journal"))?,
            trial_balance: self.trial_balance.ok_or_else(|| missing("trial balance"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_services() {
        let err = AppState::builder().build().unwrap_err();
        assert_eq!(err.to_string(), "Internal server error: account service not configured");
    }

    #[test]
    fn test_builder_with_shared_ledger() {
        let state = AppState::builder()
            .ledger(Arc::new(InMemoryLedger::seeded()))
            .build()
            .unwrap();
        assert_eq!(state.config().pagination.default_limit, 20);
    }
}
