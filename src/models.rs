// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            "transfer" => Ok(TransactionKind::Transfer),
            other => Err(format!(
                "Unknown transaction type '{}' (use income|expense|transfer)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }

    /// Whether a transaction of `kind` may be filed under this category.
    pub fn accepts(&self, kind: TransactionKind) -> bool {
        matches!(
            (self, kind),
            (CategoryKind::Income, TransactionKind::Income)
                | (CategoryKind::Expense, TransactionKind::Expense)
        )
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            other => Err(format!(
                "Unknown category type '{}' (use income|expense)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    Cash,
    Bank,
    Ewallet,
    Savings,
    Investment,
}

impl WalletKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletKind::Cash => "cash",
            WalletKind::Bank => "bank",
            WalletKind::Ewallet => "ewallet",
            WalletKind::Savings => "savings",
            WalletKind::Investment => "investment",
        }
    }
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(WalletKind::Cash),
            "bank" => Ok(WalletKind::Bank),
            "ewallet" | "e-wallet" | "digital" => Ok(WalletKind::Ewallet),
            "savings" => Ok(WalletKind::Savings),
            "investment" => Ok(WalletKind::Investment),
            other => Err(format!(
                "Unknown wallet type '{}' (use cash|bank|ewallet|savings|investment)",
                other
            )),
        }
    }
}

/// Largest amount, balance or budget accepted (10^18). Keeps sums over any
/// realistic number of records inside the `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_808_348_672, 232_830_643, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    /// Raw persisted date; see [`Transaction::occurred_at`].
    pub date: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub wallet_id: i64,
    #[serde(default)]
    pub to_wallet_id: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Parses the stored date. Records whose date cannot be read return `None`
    /// and are skipped by every date-based computation.
    pub fn occurred_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.date)
    }

    pub fn occurred_on(&self) -> Option<NaiveDate> {
        self.occurred_at().map(|dt| dt.date())
    }

    /// True when the transaction falls within the given calendar month.
    pub fn in_month(&self, month: u32, year: i32) -> bool {
        self.occurred_at()
            .map(|dt| dt.month() == month && dt.year() == year)
            .unwrap_or(false)
    }

    /// Signed balance changes this transaction applies, per wallet.
    pub fn balance_effects(&self) -> Vec<(i64, Decimal)> {
        match self.kind {
            TransactionKind::Income => vec![(self.wallet_id, self.amount)],
            TransactionKind::Expense => vec![(self.wallet_id, -self.amount)],
            TransactionKind::Transfer => {
                let mut effects = vec![(self.wallet_id, -self.amount)];
                if let Some(to) = self.to_wallet_id {
                    effects.push((to, self.amount));
                }
                effects
            }
        }
    }

    pub fn touches_wallet(&self, wallet_id: i64) -> bool {
        self.wallet_id == wallet_id || self.to_wallet_id == Some(wallet_id)
    }
}

/// Accepts the date shapes the tracker has written over time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_time(NaiveTime::MIN));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WalletKind,
    pub balance: Decimal,
    #[serde(default)]
    pub color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub month: u32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

impl Budget {
    pub fn is_for(&self, month: u32, year: i32) -> bool {
        self.month == month && self.year == year
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub currency: String,
    pub locale: String,
    pub first_day_of_week: u32,
    pub decimal_places: u32,
    pub refresh_interval_secs: u64,
    pub hide_balance: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency: "IDR".into(),
            locale: "id-ID".into(),
            first_day_of_week: 0,
            decimal_places: 0,
            refresh_interval_secs: 30,
            hide_balance: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme '{}' (use light|dark)", other)),
        }
    }
}

/// Last issued id per entity; ids are never handed out twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sequences {
    pub transaction: i64,
    pub wallet: i64,
    pub category: i64,
    pub budget: i64,
}
