//! Ledger models exchanged with the services
//!
//! Amounts are integers in the minor unit of the account currency.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pagination::Paginate;
use crate::validation::{RuleViolation, Validate};

/// Width of a journal cursor; keeps lexical and numeric order aligned
const JOURNAL_CURSOR_WIDTH: usize = 12;

/// Account classification in the chart of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountKind {
    pub const ALL: [AccountKind; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Parse the wire name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }

    /// Whether the balance normally sits on the debit side
    #[must_use]
    pub fn debit_normal(&self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account of the chart of accounts, keyed by its code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
    /// ISO 4217 currency code
    pub currency: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Public shape of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
    pub currency: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            code: account.code,
            name: account.name,
            kind: account.kind,
            currency: account.currency,
            active: account.active,
            created_at: account.created_at,
        }
    }
}

impl Paginate for Account {
    type Response = AccountResponse;

    fn cursor(&self) -> String {
        self.code.clone()
    }

    fn to_response(self) -> AccountResponse {
        self.into()
    }
}

/// `POST /accounts` body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub currency: String,
}

impl NewAccount {
    /// Parsed kind; `None` if the body did not pass validation
    pub fn account_kind(&self) -> Option<AccountKind> {
        AccountKind::parse(&self.kind)
    }
}

impl Validate for NewAccount {
    fn validate(&self) -> Vec<RuleViolation> {
        let mut violations = Vec::new();

        if self.code.is_empty() {
            violations.push(RuleViolation::rule("code", "required"));
        } else {
            if self.code.len() > 10 {
                violations.push(RuleViolation::new("code", "max", 10));
            }
            if !self.code.chars().all(|c| c.is_ascii_alphanumeric()) {
                violations.push(RuleViolation::rule("code", "alphanum"));
            }
        }

        if self.name.trim().is_empty() {
            violations.push(RuleViolation::rule("name", "required"));
        } else if self.name.chars().count() > 100 {
            violations.push(RuleViolation::new("name", "max", 100));
        }

        if self.kind.is_empty() {
            violations.push(RuleViolation::rule("kind", "required"));
        } else if self.account_kind().is_none() {
            let names: Vec<&str> = AccountKind::ALL.iter().map(AccountKind::as_str).collect();
            violations.push(RuleViolation::new("kind", "oneof", names.join(" ")));
        }

        if self.currency.is_empty() {
            violations.push(RuleViolation::rule("currency", "required"));
        } else {
            if self.currency.chars().count() != 3 {
                violations.push(RuleViolation::new("currency", "len", 3));
            }
            if !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
                violations.push(RuleViolation::rule("currency", "uppercase"));
            }
        }

        violations
    }
}

/// One side of a journal posting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalLine {
    pub account: String,
    #[serde(default)]
    pub debit: i64,
    #[serde(default)]
    pub credit: i64,
}

/// A posted journal entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    /// Posting sequence, strictly increasing
    pub seq: u64,
    pub id: Uuid,
    pub posted_on: NaiveDate,
    pub memo: String,
    pub currency: String,
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Cursor for a posting sequence
    pub fn cursor_for(seq: u64) -> String {
        format!("{seq:0width$}", width = JOURNAL_CURSOR_WIDTH)
    }

    /// Sum of debits (equal to the sum of credits for a posted entry)
    #[must_use]
    pub fn amount(&self) -> i64 {
        self.lines.iter().map(|line| line.debit).sum()
    }

    /// Whether any line touches `account`
    #[must_use]
    pub fn touches(&self, account: &str) -> bool {
        self.lines.iter().any(|line| line.account == account)
    }
}

/// Public shape of a journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalResponse {
    pub seq: u64,
    pub id: Uuid,
    pub posted_on: NaiveDate,
    pub memo: String,
    pub currency: String,
    pub amount: i64,
    pub lines: Vec<JournalLine>,
}

impl From<JournalEntry> for JournalResponse {
    fn from(entry: JournalEntry) -> Self {
        Self {
            amount: entry.amount(),
            seq: entry.seq,
            id: entry.id,
            posted_on: entry.posted_on,
            memo: entry.memo,
            currency: entry.currency,
            lines: entry.lines,
        }
    }
}

impl Paginate for JournalEntry {
    type Response = JournalResponse;

    fn cursor(&self) -> String {
        Self::cursor_for(self.seq)
    }

    fn to_response(self) -> JournalResponse {
        self.into()
    }
}

/// `POST /journals` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJournal {
    #[serde(default)]
    pub posted_on: Option<NaiveDate>,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub lines: Vec<JournalLine>,
}

impl NewJournal {
    /// Sum of debits, `None` on overflow
    #[must_use]
    pub fn total_debit(&self) -> Option<i64> {
        self.lines.iter().try_fold(0i64, |sum, line| sum.checked_add(line.debit))
    }

    /// Sum of credits, `None` on overflow
    #[must_use]
    pub fn total_credit(&self) -> Option<i64> {
        self.lines.iter().try_fold(0i64, |sum, line| sum.checked_add(line.credit))
    }
}

impl Validate for NewJournal {
    fn validate(&self) -> Vec<RuleViolation> {
        let mut violations = Vec::new();

        if self.posted_on.is_none() {
            violations.push(RuleViolation::rule("postedOn", "required"));
        }

        if self.memo.trim().is_empty() {
            violations.push(RuleViolation::rule("memo", "required"));
        } else if self.memo.chars().count() > 200 {
            violations.push(RuleViolation::new("memo", "max", 200));
        }

        if self.currency.is_empty() {
            violations.push(RuleViolation::rule("currency", "required"));
        } else if self.currency.chars().count() != 3 {
            violations.push(RuleViolation::new("currency", "len", 3));
        }

        if self.lines.is_empty() {
            violations.push(RuleViolation::rule("lines", "required"));
        }

        for (index, line) in self.lines.iter().enumerate() {
            if line.account.is_empty() {
                violations.push(RuleViolation::rule(format!("lines[{index}].account"), "required"));
            }
            if line.debit < 0 {
                violations.push(RuleViolation::new(format!("lines[{index}].debit"), "gte", 0));
            }
            if line.credit < 0 {
                violations.push(RuleViolation::new(format!("lines[{index}].credit"), "gte", 0));
            }
        }

        violations
    }
}

/// `GET /journals` filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

impl JournalFilter {
    /// Whether `entry` passes every set criterion
    #[must_use]
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        self.account.as_deref().is_none_or(|account| entry.touches(account))
            && self.from.is_none_or(|from| entry.posted_on >= from)
            && self.to.is_none_or(|to| entry.posted_on <= to)
    }
}

/// One line of an account's ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub journal_seq: u64,
    pub posted_on: NaiveDate,
    pub memo: String,
    pub debit: i64,
    pub credit: i64,
    /// Running balance on the account's normal side
    pub balance: i64,
}

/// Trial balance row for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceRow {
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
    pub debit: i64,
    pub credit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceSummary {
    pub total_debit: i64,
    pub total_credit: i64,
    pub balanced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

/// Rows plus summary, as computed by the trial balance service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub summary: TrialBalanceSummary,
}

impl TrialBalance {
    /// Build from rows, computing the summary
    pub fn from_rows(rows: Vec<TrialBalanceRow>, as_of: Option<NaiveDate>) -> Self {
        let total_debit = rows.iter().map(|row| row.debit).sum();
        let total_credit = rows.iter().map(|row| row.credit).sum();
        Self {
            rows,
            summary: TrialBalanceSummary {
                total_debit,
                total_credit,
                balanced: total_debit == total_credit,
                as_of,
            },
        }
    }
}

/// `GET /trial-balance` query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceQuery {
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::translate;

    fn new_account() -> NewAccount {
        NewAccount {
            code: "1000".into(),
            name: "Cash".into(),
            kind: "asset".into(),
            currency: "EUR".into(),
        }
    }

    fn line(account: &str, debit: i64, credit: i64) -> JournalLine {
        JournalLine {
            account: account.into(),
            debit,
            credit,
        }
    }

    #[test]
    fn test_valid_account_has_no_violations() {
        assert!(new_account().validate().is_empty());
        assert_eq!(new_account().account_kind(), Some(AccountKind::Asset));
    }

    #[test]
    fn test_account_violations() {
        let body = NewAccount {
            code: "10-00".into(),
            name: String::new(),
            kind: "income".into(),
            currency: "eur".into(),
        };
        let rendered = translate(&body.validate());
        let codes: Vec<(&str, &str)> = rendered
            .iter()
            .map(|v| (v.field.as_str(), v.code.as_str()))
            .collect();
        assert_eq!(
            codes,
            vec![
                ("code", "ALPHANUMERIC"),
                ("name", "REQUIRED"),
                ("kind", "ONE_OF"),
                ("currency", "UPPERCASE"),
            ]
        );
        assert_eq!(
            rendered[2].message,
            "kind must be one of [asset liability equity revenue expense]"
        );
    }

    #[test]
    fn test_journal_line_violations_name_the_line() {
        let body = NewJournal {
            posted_on: NaiveDate::from_ymd_opt(2024, 3, 1),
            memo: "rent".into(),
            currency: "EUR".into(),
            lines: vec![line("6100", 500, 0), line("", 0, -500)],
        };
        let fields: Vec<String> = body.validate().into_iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["lines[1].account", "lines[1].credit"]);
    }

    #[test]
    fn test_missing_posting_date_is_required() {
        let body: NewJournal = serde_json::from_value(serde_json::json!({
            "memo": "rent",
            "currency": "EUR",
            "lines": [{"account": "6100", "debit": 500, "credit": 0}],
        }))
        .unwrap();
        let violations = body.validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "postedOn");
    }

    #[test]
    fn test_journal_totals_detect_overflow() {
        let body = NewJournal {
            posted_on: None,
            memo: "huge".into(),
            currency: "EUR".into(),
            lines: vec![line("6100", i64::MAX, 0), line("6100", 1, 0), line("1000", 0, 7)],
        };
        assert_eq!(body.total_debit(), None);
        assert_eq!(body.total_credit(), Some(7));
    }

    #[test]
    fn test_journal_cursor_orders_lexically() {
        assert!(JournalEntry::cursor_for(9) < JournalEntry::cursor_for(10));
        assert_eq!(JournalEntry::cursor_for(42), "000000000042");
    }

    #[test]
    fn test_filter_matches() {
        let entry = JournalEntry {
            seq: 1,
            id: Uuid::nil(),
            posted_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            memo: "rent".into(),
            currency: "EUR".into(),
            lines: vec![line("6100", 500, 0), line("1000", 0, 500)],
        };
        assert!(JournalFilter::default().matches(&entry));
        assert!(JournalFilter {
            account: Some("6100".into()),
            ..Default::default()
        }
        .matches(&entry));
        assert!(!JournalFilter {
            from: NaiveDate::from_ymd_opt(2024, 4, 1),
            ..Default::default()
        }
        .matches(&entry));
        assert_eq!(entry.amount(), 500);
    }

    #[test]
    fn test_trial_balance_summary() {
        let rows = vec![
            TrialBalanceRow {
                code: "1000".into(),
                name: "Cash".into(),
                kind: AccountKind::Asset,
                debit: 700,
                credit: 0,
            },
            TrialBalanceRow {
                code: "3000".into(),
                name: "Capital".into(),
                kind: AccountKind::Equity,
                debit: 0,
                credit: 700,
            },
        ];
        let balance = TrialBalance::from_rows(rows, None);
        assert!(balance.summary.balanced);
        assert_eq!(balance.summary.total_debit, 700);
    }
}
