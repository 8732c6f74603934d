//! In-memory ledger
//!
//! Implements every service trait over a single lock-protected book. Used by
//! the binary and by router tests; a persistent backend plugs in through the
//! same traits.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{
    Account, AccountKind, JournalEntry, JournalFilter, LedgerEntry, NewAccount, NewJournal,
    TrialBalance, TrialBalanceRow,
};
use super::{AccountService, JournalService, TrialBalanceService};
use crate::classify::{DomainError, ServiceError};
use crate::pagination::{Direction, FetchWindow, Listed, Paginate};

#[derive(Debug, Default)]
struct Book {
    accounts: BTreeMap<String, Account>,
    journals: Vec<JournalEntry>,
    closed_through: Option<NaiveDate>,
    /// Sum of every posted debit. Kept within `i64`, which bounds every
    /// running balance and trial balance total derived from the journals.
    posted_debits: i64,
}

impl Book {
    fn open(&mut self, code: &str, name: &str, kind: AccountKind, currency: &str) {
        self.accounts.insert(
            code.to_string(),
            Account {
                code: code.to_string(),
                name: name.to_string(),
                kind,
                currency: currency.to_string(),
                active: true,
                created_at: Utc::now(),
            },
        );
    }

    fn account(&self, code: &str) -> Result<&Account, ServiceError> {
        self.accounts
            .get(code)
            .ok_or(ServiceError::Domain(DomainError::AccountNotFound))
    }

    /// Check the posting rules, returning the posting date and the debit total
    fn check_postable(&self, journal: &NewJournal) -> Result<(NaiveDate, i64), ServiceError> {
        let posted_on = journal
            .posted_on
            .ok_or_else(|| anyhow::anyhow!("unvalidated journal without posting date"))?;
        if journal.lines.is_empty() {
            return Err(DomainError::JournalEmpty.into());
        }
        let (Some(debit), Some(credit)) = (journal.total_debit(), journal.total_credit()) else {
            return Err(DomainError::AmountOutOfRange.into());
        };
        if debit == 0 {
            return Err(DomainError::JournalEmpty.into());
        }
        if debit != credit {
            return Err(DomainError::JournalUnbalanced.into());
        }
        if self.posted_debits.checked_add(debit).is_none() {
            return Err(DomainError::AmountOutOfRange.into());
        }
        if self.closed_through.is_some_and(|closed| posted_on <= closed) {
            return Err(DomainError::PeriodClosed.into());
        }
        for line in &journal.lines {
            let account = self.account(&line.account)?;
            if !account.active {
                return Err(DomainError::AccountInactive.into());
            }
            if account.currency != journal.currency {
                return Err(DomainError::CurrencyMismatch.into());
            }
        }
        Ok((posted_on, debit))
    }
}

/// Take one window out of rows sorted ascending by cursor
///
/// Forward resumes strictly after the cursor, backward strictly before it and
/// in descending order. At most `fetch_size` rows are returned.
fn apply_window<'a, T, I>(ascending: I, window: &FetchWindow) -> Vec<T>
where
    T: Paginate + Clone + 'a,
    I: DoubleEndedIterator<Item = &'a T>,
{
    let take = window.fetch_size();
    match (window.direction(), window.cursor()) {
        (Direction::Backward, Some(cursor)) => ascending
            .rev()
            .filter(|item| item.cursor().as_str() < cursor)
            .take(take)
            .cloned()
            .collect(),
        (Direction::Forward, Some(cursor)) => ascending
            .filter(|item| item.cursor().as_str() > cursor)
            .take(take)
            .cloned()
            .collect(),
        _ => ascending.take(take).cloned().collect(),
    }
}

/// Lock-protected in-memory implementation of the ledger services
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    book: RwLock<Book>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger with a small EUR chart of accounts
    pub fn seeded() -> Self {
        let mut book = Book::default();
        book.open("1000", "Cash", AccountKind::Asset, "EUR");
        book.open("1100", "Receivables", AccountKind::Asset, "EUR");
        book.open("2000", "Payables", AccountKind::Liability, "EUR");
        book.open("3000", "Owner capital", AccountKind::Equity, "EUR");
        book.open("4000", "Sales", AccountKind::Revenue, "EUR");
        book.open("6100", "Rent", AccountKind::Expense, "EUR");
        Self {
            book: RwLock::new(book),
        }
    }

    /// Reject postings dated on or before `through`
    pub async fn close_period(&self, through: NaiveDate) {
        self.book.write().await.closed_through = Some(through);
    }

    /// Stop an account from receiving postings
    pub async fn deactivate(&self, code: &str) -> Result<(), ServiceError> {
        let mut book = self.book.write().await;
        let account = book
            .accounts
            .get_mut(code)
            .ok_or(ServiceError::Domain(DomainError::AccountNotFound))?;
        account.active = false;
        Ok(())
    }
}

#[async_trait]
impl AccountService for InMemoryLedger {
    async fn list_accounts(&self, window: &FetchWindow) -> Result<Listed<Account>, ServiceError> {
        let book = self.book.read().await;
        let items = apply_window(book.accounts.values(), window);
        Ok(Listed::new(items, book.accounts.len() as u64))
    }

    async fn get_account(&self, code: &str) -> Result<Account, ServiceError> {
        let book = self.book.read().await;
        book.account(code).cloned()
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, ServiceError> {
        let kind = account
            .account_kind()
            .ok_or_else(|| anyhow::anyhow!("unvalidated account kind: {}", account.kind))?;

        let mut book = self.book.write().await;
        if book.accounts.contains_key(&account.code) {
            return Err(DomainError::AccountAlreadyExists.into());
        }
        book.open(&account.code, &account.name, kind, &account.currency);
        tracing::info!(code = %account.code, %kind, "Account opened");
        book.account(&account.code).cloned()
    }

    async fn account_entries(&self, code: &str) -> Result<Listed<LedgerEntry>, ServiceError> {
        let book = self.book.read().await;
        let debit_normal = book.account(code)?.kind.debit_normal();

        let mut balance = 0;
        let entries: Vec<LedgerEntry> = book
            .journals
            .iter()
            .flat_map(|journal| {
                journal
                    .lines
                    .iter()
                    .filter(move |line| line.account == code)
                    .map(move |line| (journal, line))
            })
            .map(|(journal, line)| {
                balance += if debit_normal {
                    line.debit - line.credit
                } else {
                    line.credit - line.debit
                };
                LedgerEntry {
                    journal_seq: journal.seq,
                    posted_on: journal.posted_on,
                    memo: journal.memo.clone(),
                    debit: line.debit,
                    credit: line.credit,
                    balance,
                }
            })
            .collect();

        let total = entries.len() as u64;
        Ok(Listed::new(entries, total))
    }
}

#[async_trait]
impl JournalService for InMemoryLedger {
    async fn list_journals(
        &self,
        filter: &JournalFilter,
        window: &FetchWindow,
    ) -> Result<Listed<JournalEntry>, ServiceError> {
        let book = self.book.read().await;
        if let Some(account) = &filter.account {
            book.account(account)?;
        }

        let matching: Vec<&JournalEntry> = book
            .journals
            .iter()
            .filter(|journal| filter.matches(journal))
            .collect();
        let total = matching.len() as u64;
        Ok(Listed::new(apply_window(matching.into_iter(), window), total))
    }

    async fn get_journal(&self, seq: u64) -> Result<JournalEntry, ServiceError> {
        let book = self.book.read().await;
        book.journals
            .iter()
            .find(|journal| journal.seq == seq)
            .cloned()
            .ok_or(ServiceError::Domain(DomainError::JournalNotFound))
    }

    async fn post_journal(&self, journal: NewJournal) -> Result<JournalEntry, ServiceError> {
        let mut book = self.book.write().await;
        let (posted_on, debit) = book.check_postable(&journal)?;

        let entry = JournalEntry {
            seq: book.journals.len() as u64 + 1,
            id: Uuid::now_v7(),
            posted_on,
            memo: journal.memo,
            currency: journal.currency,
            lines: journal.lines,
        };
        book.journals.push(entry.clone());
        book.posted_debits += debit;
        tracing::info!(seq = entry.seq, amount = entry.amount(), "Journal posted");
        Ok(entry)
    }
}

#[async_trait]
impl TrialBalanceService for InMemoryLedger {
    async fn trial_balance(&self, as_of: Option<NaiveDate>) -> Result<TrialBalance, ServiceError> {
        let book = self.book.read().await;

        let mut totals: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
        for journal in &book.journals {
            if as_of.is_some_and(|as_of| journal.posted_on > as_of) {
                continue;
            }
            for line in &journal.lines {
                let total = totals.entry(line.account.as_str()).or_default();
                total.0 += line.debit;
                total.1 += line.credit;
            }
        }

        let rows = book
            .accounts
            .values()
            .map(|account| {
                let (debit, credit) = totals.get(account.code.as_str()).copied().unwrap_or_default();
                let net = debit - credit;
                TrialBalanceRow {
                    code: account.code.clone(),
                    name: account.name.clone(),
                    kind: account.kind,
                    debit: net.max(0),
                    credit: (-net).max(0),
                }
            })
            .collect();

        Ok(TrialBalance::from_rows(rows, as_of))
    }
}
