// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Entity collections and their persistence.
//!
//! Mutations are staged on a copy of the snapshot, validated, written with a
//! single `set_many`, and only then swapped in. A failed write leaves both the
//! store and the in-memory records untouched.

use crate::aggregate::{self, monthly_total};
use crate::db::{KeyValueStore, keys};
use crate::error::{StoreError, TrackerError, TrackerResult};
use crate::models::{
    Budget, Category, CategoryKind, MAX_AMOUNT, Sequences, Settings, Theme, Transaction,
    TransactionKind, Wallet, WalletKind,
};
use crate::query;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const BACKUP_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Records {
    pub transactions: Vec<Transaction>,
    pub wallets: Vec<Wallet>,
    pub categories: Vec<Category>,
    pub budgets: Vec<Budget>,
    pub sequences: Sequences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Transactions,
    Wallets,
    Categories,
    Budgets,
}

impl Collection {
    const ALL: [Collection; 4] = [
        Collection::Transactions,
        Collection::Wallets,
        Collection::Categories,
        Collection::Budgets,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: Option<i64>,
    pub wallet_id: i64,
    pub to_wallet_id: Option<i64>,
    pub description: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWallet {
    pub name: String,
    pub kind: WalletKind,
    pub balance: Decimal,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletUpdate {
    pub name: Option<String>,
    pub kind: Option<WalletKind>,
    pub balance: Option<Decimal>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_transactions: usize,
    pub total_categories: usize,
    pub total_wallets: usize,
    pub total_balance: Decimal,
    pub monthly_income: Decimal,
    pub monthly_expense: Decimal,
    pub last_updated: chrono::DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Backup {
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    wallets: Vec<Wallet>,
    #[serde(default)]
    budgets: Vec<Budget>,
    #[serde(default)]
    settings: Option<Settings>,
    export_date: chrono::DateTime<Utc>,
    version: String,
}

pub struct RecordStore<S: KeyValueStore> {
    store: S,
    records: Records,
    settings: Settings,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Loads every collection and seeds defaults into empty ones.
    pub fn open(store: S) -> TrackerResult<Self> {
        let mut records = Records {
            transactions: load_collection(&store, keys::TRANSACTIONS)?,
            wallets: load_collection(&store, keys::WALLETS)?,
            categories: load_collection(&store, keys::CATEGORIES)?,
            budgets: load_collection(&store, keys::BUDGETS)?,
            sequences: Sequences::default(),
        };
        records.sequences = match store.get(keys::SEQUENCES)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(%err, "unreadable id sequences, rebuilding from records");
                Sequences::default()
            }),
            None => Sequences::default(),
        };
        rebuild_sequences(&mut records);

        let stored_settings = match store.get(keys::SETTINGS)? {
            Some(raw) => match serde_json::from_str::<Settings>(&raw) {
                Ok(s) => Some(s),
                Err(err) => {
                    tracing::warn!(%err, "unreadable settings, using defaults");
                    None
                }
            },
            None => None,
        };

        let mut seeded = Vec::new();
        if records.categories.is_empty() {
            seed_categories(&mut records);
            seeded.push(Collection::Categories);
        }
        if records.wallets.is_empty() {
            seed_wallets(&mut records);
            seeded.push(Collection::Wallets);
        }

        let missing_settings = stored_settings.is_none();
        let mut tracker = RecordStore {
            store,
            records: records.clone(),
            settings: stored_settings.unwrap_or_default(),
        };
        if !seeded.is_empty() || missing_settings {
            let settings = missing_settings.then(Settings::default);
            tracker.commit_with(records, &seeded, settings)?;
            if !seeded.is_empty() {
                tracing::info!(?seeded, "seeded default records");
            }
        }
        Ok(tracker)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.records.transactions
    }

    pub fn wallets(&self) -> &[Wallet] {
        &self.records.wallets
    }

    pub fn categories(&self) -> &[Category] {
        &self.records.categories
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.records.budgets
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn transaction(&self, id: i64) -> TrackerResult<&Transaction> {
        self.records
            .transactions
            .iter()
            .find(|t| t.id == id)
            .ok_or(TrackerError::NotFound {
                entity: "transaction",
                id,
            })
    }

    pub fn wallet(&self, id: i64) -> TrackerResult<&Wallet> {
        find_wallet(&self.records.wallets, id)
    }

    pub fn wallet_by_name(&self, name: &str) -> Option<&Wallet> {
        let name = name.trim();
        self.records
            .wallets
            .iter()
            .find(|w| same_name(&w.name, name))
    }

    pub fn category(&self, id: i64) -> TrackerResult<&Category> {
        self.records
            .categories
            .iter()
            .find(|c| c.id == id)
            .ok_or(TrackerError::NotFound {
                entity: "category",
                id,
            })
    }

    /// Looks a category up by name, narrowed by type when names repeat.
    pub fn category_by_name(&self, name: &str, kind: Option<CategoryKind>) -> Option<&Category> {
        let name = name.trim();
        self.records.categories.iter().find(|c| {
            same_name(&c.name, name) && kind.is_none_or(|k| k == c.kind)
        })
    }

    pub fn total_balance(&self) -> Decimal {
        aggregate::total_balance(&self.records.wallets)
    }

    pub fn recent_transactions(&self, limit: usize) -> Vec<Transaction> {
        query::recent(&self.records.transactions, limit)
    }

    pub fn statistics(&self, now: NaiveDateTime) -> Statistics {
        let (month, year) = (now.month(), now.year());
        Statistics {
            total_transactions: self.records.transactions.len(),
            total_categories: self.records.categories.len(),
            total_wallets: self.records.wallets.len(),
            total_balance: self.total_balance(),
            monthly_income: monthly_total(
                &self.records.transactions,
                TransactionKind::Income,
                month,
                year,
            ),
            monthly_expense: monthly_total(
                &self.records.transactions,
                TransactionKind::Expense,
                month,
                year,
            ),
            last_updated: Utc::now(),
        }
    }

    // Transactions

    pub fn add_transaction(&mut self, input: NewTransaction) -> TrackerResult<Transaction> {
        let mut next = self.records.clone();
        next.sequences.transaction += 1;
        let txn = build_transaction(&next, next.sequences.transaction, input, Utc::now())?;
        apply_effects(&mut next.wallets, &txn, Direction::Apply)?;
        next.transactions.insert(0, txn.clone());
        self.commit(next, &[Collection::Transactions, Collection::Wallets])?;
        tracing::debug!(id = txn.id, kind = %txn.kind, amount = %txn.amount, "transaction added");
        Ok(txn)
    }

    /// Adds several transactions in one write. Nothing is stored unless every
    /// entry is valid; the error names the zero-based index of the first bad one.
    pub fn add_transactions(
        &mut self,
        inputs: Vec<NewTransaction>,
    ) -> TrackerResult<Vec<Transaction>> {
        let mut next = self.records.clone();
        let mut added = Vec::with_capacity(inputs.len());
        let now = Utc::now();
        for (index, input) in inputs.into_iter().enumerate() {
            let id = next.sequences.transaction + 1;
            let staged = build_transaction(&next, id, input, now).and_then(|txn| {
                apply_effects(&mut next.wallets, &txn, Direction::Apply).map(|_| txn)
            });
            let txn = staged.map_err(|err| TrackerError::Batch {
                index,
                source: Box::new(err),
            })?;
            next.sequences.transaction = txn.id;
            next.transactions.insert(0, txn.clone());
            added.push(txn);
        }
        self.commit(next, &[Collection::Transactions, Collection::Wallets])?;
        tracing::info!(count = added.len(), "transactions imported");
        Ok(added)
    }

    pub fn update_transaction(&mut self, id: i64, input: NewTransaction) -> TrackerResult<Transaction> {
        let mut next = self.records.clone();
        let idx = next
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(TrackerError::NotFound {
                entity: "transaction",
                id,
            })?;
        let old = next.transactions[idx].clone();
        apply_effects(&mut next.wallets, &old, Direction::Revert)?;
        let txn = build_transaction(&next, id, input, old.created_at)?;
        apply_effects(&mut next.wallets, &txn, Direction::Apply)?;
        next.transactions[idx] = txn.clone();
        self.commit(next, &[Collection::Transactions, Collection::Wallets])?;
        tracing::debug!(id, "transaction updated");
        Ok(txn)
    }

    pub fn delete_transaction(&mut self, id: i64) -> TrackerResult<Transaction> {
        let mut next = self.records.clone();
        let idx = next
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or(TrackerError::NotFound {
                entity: "transaction",
                id,
            })?;
        let old = next.transactions.remove(idx);
        apply_effects(&mut next.wallets, &old, Direction::Revert)?;
        self.commit(next, &[Collection::Transactions, Collection::Wallets])?;
        tracing::debug!(id, "transaction deleted");
        Ok(old)
    }

    // Wallets

    pub fn add_wallet(&mut self, input: NewWallet) -> TrackerResult<Wallet> {
        let name = input.name.trim().to_string();
        validate_wallet(&self.records.wallets, None, &name, input.balance)?;
        let mut next = self.records.clone();
        next.sequences.wallet += 1;
        let wallet = Wallet {
            id: next.sequences.wallet,
            name,
            kind: input.kind,
            balance: input.balance,
            color: input.color,
            created_at: Utc::now(),
        };
        next.wallets.push(wallet.clone());
        self.commit(next, &[Collection::Wallets])?;
        tracing::debug!(id = wallet.id, name = %wallet.name, "wallet added");
        Ok(wallet)
    }

    pub fn update_wallet(&mut self, id: i64, update: WalletUpdate) -> TrackerResult<Wallet> {
        let current = self.wallet(id)?.clone();
        let name = update
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or(current.name.clone());
        let balance = update.balance.unwrap_or(current.balance);
        validate_wallet(&self.records.wallets, Some(id), &name, balance)?;

        let mut next = self.records.clone();
        let wallet = next
            .wallets
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(TrackerError::NotFound { entity: "wallet", id })?;
        wallet.name = name;
        wallet.balance = balance;
        if let Some(kind) = update.kind {
            wallet.kind = kind;
        }
        if let Some(color) = update.color {
            wallet.color = color;
        }
        let updated = wallet.clone();
        self.commit(next, &[Collection::Wallets])?;
        Ok(updated)
    }

    /// Removes the wallet and every transaction that moves money in or out of
    /// it. Transfers involving surviving wallets are unwound on those wallets.
    pub fn delete_wallet(&mut self, id: i64) -> TrackerResult<usize> {
        self.wallet(id)?;
        let mut next = self.records.clone();
        let (gone, kept): (Vec<Transaction>, Vec<Transaction>) = next
            .transactions
            .into_iter()
            .partition(|t| t.touches_wallet(id));
        next.transactions = kept;
        next.wallets.retain(|w| w.id != id);
        for t in &gone {
            for (wallet_id, delta) in t.balance_effects() {
                if let Some(w) = next.wallets.iter_mut().find(|w| w.id == wallet_id) {
                    w.balance = w
                        .balance
                        .checked_sub(delta)
                        .ok_or_else(|| too_large(&w.name))?;
                }
            }
        }
        self.commit(next, &[Collection::Transactions, Collection::Wallets])?;
        tracing::debug!(id, removed = gone.len(), "wallet deleted");
        Ok(gone.len())
    }

    /// Moves money between two wallets and records it as a transfer.
    pub fn transfer(
        &mut self,
        from: i64,
        to: i64,
        amount: Decimal,
        date: NaiveDate,
        note: &str,
    ) -> TrackerResult<Transaction> {
        self.add_transaction(NewTransaction {
            kind: TransactionKind::Transfer,
            amount,
            date,
            category_id: None,
            wallet_id: from,
            to_wallet_id: Some(to),
            description: note.trim().to_string(),
            notes: String::new(),
        })
    }

    // Categories

    pub fn add_category(
        &mut self,
        name: &str,
        kind: CategoryKind,
        color: &str,
    ) -> TrackerResult<Category> {
        let name = name.trim().to_string();
        validate_category_name(&self.records.categories, None, &name, kind)?;
        let mut next = self.records.clone();
        next.sequences.category += 1;
        let category = Category {
            id: next.sequences.category,
            name,
            kind,
            color: color.to_string(),
        };
        next.categories.push(category.clone());
        self.commit(next, &[Collection::Categories])?;
        Ok(category)
    }

    /// Renames or recolours a category. Its type never changes.
    pub fn update_category(&mut self, id: i64, update: CategoryUpdate) -> TrackerResult<Category> {
        let current = self.category(id)?.clone();
        let name = update
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or(current.name.clone());
        validate_category_name(&self.records.categories, Some(id), &name, current.kind)?;
        let mut next = self.records.clone();
        let category = next
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(TrackerError::NotFound {
                entity: "category",
                id,
            })?;
        category.name = name;
        if let Some(color) = update.color {
            category.color = color;
        }
        let updated = category.clone();
        self.commit(next, &[Collection::Categories])?;
        Ok(updated)
    }

    /// Deletes the category and its budgets; transactions lose the link.
    pub fn delete_category(&mut self, id: i64) -> TrackerResult<Category> {
        let removed = self.category(id)?.clone();
        let mut next = self.records.clone();
        next.categories.retain(|c| c.id != id);
        next.budgets.retain(|b| b.category_id != id);
        for t in next.transactions.iter_mut() {
            if t.category_id == Some(id) {
                t.category_id = None;
            }
        }
        self.commit(
            next,
            &[
                Collection::Categories,
                Collection::Budgets,
                Collection::Transactions,
            ],
        )?;
        Ok(removed)
    }

    // Budgets

    /// Creates or replaces the budget for (category, month, year).
    pub fn set_budget(
        &mut self,
        category_id: i64,
        month: u32,
        year: i32,
        amount: Decimal,
    ) -> TrackerResult<Budget> {
        let category = self.category(category_id)?;
        if category.kind != CategoryKind::Expense {
            return Err(TrackerError::invalid(format!(
                "Budgets apply to expense categories; '{}' is an income category",
                category.name
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(TrackerError::invalid(format!("Invalid month {}", month)));
        }
        if amount <= Decimal::ZERO {
            return Err(TrackerError::invalid("Budget amount must be greater than zero"));
        }
        if amount > MAX_AMOUNT {
            return Err(TrackerError::invalid("Budget amount is too large"));
        }

        let mut next = self.records.clone();
        let budget = match next
            .budgets
            .iter_mut()
            .find(|b| b.category_id == category_id && b.is_for(month, year))
        {
            Some(existing) => {
                existing.amount = amount;
                existing.clone()
            }
            None => {
                next.sequences.budget += 1;
                let budget = Budget {
                    id: next.sequences.budget,
                    category_id,
                    amount,
                    month,
                    year,
                    created_at: Utc::now(),
                };
                next.budgets.push(budget.clone());
                budget
            }
        };
        self.commit(next, &[Collection::Budgets])?;
        Ok(budget)
    }

    pub fn delete_budget(&mut self, id: i64) -> TrackerResult<Budget> {
        let mut next = self.records.clone();
        let idx = next
            .budgets
            .iter()
            .position(|b| b.id == id)
            .ok_or(TrackerError::NotFound { entity: "budget", id })?;
        let removed = next.budgets.remove(idx);
        self.commit(next, &[Collection::Budgets])?;
        Ok(removed)
    }

    // Settings

    pub fn update_settings(&mut self, settings: Settings) -> TrackerResult<()> {
        let raw = serde_json::to_string(&settings).map_err(StoreError::from)?;
        self.store.set(keys::SETTINGS, &raw).map_err(|err| {
            tracing::error!(%err, key = keys::SETTINGS, "failed to save settings");
            err
        })?;
        self.settings = settings;
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        match self.store.get(keys::THEME) {
            Ok(Some(raw)) => raw.parse().unwrap_or_default(),
            Ok(None) => Theme::default(),
            Err(err) => {
                tracing::warn!(%err, "could not read theme");
                Theme::default()
            }
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> TrackerResult<()> {
        self.store.set(keys::THEME, theme.as_str()).map_err(|err| {
            tracing::error!(%err, key = keys::THEME, "failed to save theme");
            err
        })?;
        Ok(())
    }

    // Backup

    pub fn export_data(&self) -> TrackerResult<String> {
        let backup = Backup {
            transactions: self.records.transactions.clone(),
            categories: self.records.categories.clone(),
            wallets: self.records.wallets.clone(),
            budgets: self.records.budgets.clone(),
            settings: Some(self.settings.clone()),
            export_date: Utc::now(),
            version: BACKUP_VERSION.to_string(),
        };
        Ok(serde_json::to_string_pretty(&backup).map_err(StoreError::from)?)
    }

    /// Replaces every collection with the backup's contents in one write.
    pub fn import_data(&mut self, json: &str) -> TrackerResult<()> {
        let value: Value = serde_json::from_str(json)
            .map_err(|err| TrackerError::InvalidBackup(err.to_string()))?;
        for required in ["transactions", "categories", "wallets"] {
            if !value.get(required).is_some_and(Value::is_array) {
                return Err(TrackerError::InvalidBackup(format!(
                    "missing '{}' collection",
                    required
                )));
            }
        }
        let backup: Backup = serde_json::from_value(with_backup_defaults(value))
            .map_err(|err| TrackerError::InvalidBackup(err.to_string()))?;
        let oversized = backup
            .transactions
            .iter()
            .map(|t| t.amount)
            .chain(backup.wallets.iter().map(|w| w.balance))
            .chain(backup.budgets.iter().map(|b| b.amount))
            .any(|v| v.abs() > MAX_AMOUNT);
        if oversized {
            return Err(TrackerError::InvalidBackup(
                "an amount is out of range".to_string(),
            ));
        }

        let mut next = Records {
            transactions: backup.transactions,
            wallets: backup.wallets,
            categories: backup.categories,
            budgets: backup.budgets,
            sequences: self.records.sequences,
        };
        rebuild_sequences(&mut next);
        self.commit_with(next, &Collection::ALL, backup.settings)?;
        tracing::info!(
            transactions = self.records.transactions.len(),
            wallets = self.records.wallets.len(),
            "backup imported"
        );
        Ok(())
    }

    /// Wipes every collection and reseeds the defaults. Ids keep counting
    /// from where they were.
    pub fn clear_all_data(&mut self) -> TrackerResult<()> {
        let mut next = Records {
            sequences: self.records.sequences,
            ..Records::default()
        };
        seed_categories(&mut next);
        seed_wallets(&mut next);
        self.commit_with(next, &Collection::ALL, Some(Settings::default()))?;
        if let Err(err) = self.store.remove(keys::THEME) {
            tracing::warn!(%err, "could not reset theme");
        }
        tracing::info!("all data cleared");
        Ok(())
    }

    fn commit(&mut self, next: Records, touched: &[Collection]) -> TrackerResult<()> {
        self.commit_with(next, touched, None)
    }

    /// Like `commit`, also replacing the settings in the same write.
    fn commit_with(
        &mut self,
        next: Records,
        touched: &[Collection],
        settings: Option<Settings>,
    ) -> TrackerResult<()> {
        let mut entries: Vec<(&str, String)> = Vec::with_capacity(touched.len() + 2);
        for c in touched {
            let (key, raw) = match c {
                Collection::Transactions => (
                    keys::TRANSACTIONS,
                    serde_json::to_string(&next.transactions),
                ),
                Collection::Wallets => (keys::WALLETS, serde_json::to_string(&next.wallets)),
                Collection::Categories => {
                    (keys::CATEGORIES, serde_json::to_string(&next.categories))
                }
                Collection::Budgets => (keys::BUDGETS, serde_json::to_string(&next.budgets)),
            };
            entries.push((key, raw.map_err(StoreError::from)?));
        }
        let seq = serde_json::to_string(&next.sequences).map_err(StoreError::from)?;
        entries.push((keys::SEQUENCES, seq));
        if let Some(settings) = &settings {
            let raw = serde_json::to_string(settings).map_err(StoreError::from)?;
            entries.push((keys::SETTINGS, raw));
        }

        if let Err(err) = self.store.set_many(&entries) {
            tracing::error!(%err, ?touched, "failed to persist records");
            return Err(err.into());
        }
        self.records = next;
        if let Some(settings) = settings {
            self.settings = settings;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Apply,
    Revert,
}

fn apply_effects(wallets: &mut [Wallet], txn: &Transaction, dir: Direction) -> TrackerResult<()> {
    for (wallet_id, delta) in txn.balance_effects() {
        let wallet = wallets
            .iter_mut()
            .find(|w| w.id == wallet_id)
            .ok_or(TrackerError::NotFound {
                entity: "wallet",
                id: wallet_id,
            })?;
        let next = match dir {
            Direction::Apply => wallet.balance.checked_add(delta),
            Direction::Revert => wallet.balance.checked_sub(delta),
        };
        wallet.balance = next.ok_or_else(|| too_large(&wallet.name))?;
    }
    Ok(())
}

fn too_large(wallet: &str) -> TrackerError {
    TrackerError::invalid(format!("Amount is too large for the balance of '{}'", wallet))
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn find_wallet(wallets: &[Wallet], id: i64) -> TrackerResult<&Wallet> {
    wallets
        .iter()
        .find(|w| w.id == id)
        .ok_or(TrackerError::NotFound { entity: "wallet", id })
}

/// Validates `input` against `records` (whose wallet balances must already
/// exclude any transaction being replaced) and builds the record.
fn build_transaction(
    records: &Records,
    id: i64,
    input: NewTransaction,
    created_at: chrono::DateTime<Utc>,
) -> TrackerResult<Transaction> {
    if input.amount < Decimal::ZERO {
        return Err(TrackerError::invalid("Amount cannot be negative"));
    }
    if input.amount > MAX_AMOUNT {
        return Err(TrackerError::invalid("Amount is too large"));
    }
    let wallet = find_wallet(&records.wallets, input.wallet_id)?;

    let (category_id, to_wallet_id, description) = match input.kind {
        TransactionKind::Transfer => {
            let to_id = input
                .to_wallet_id
                .ok_or_else(|| TrackerError::invalid("Choose a destination wallet"))?;
            if to_id == input.wallet_id {
                return Err(TrackerError::invalid("Cannot transfer to the same wallet"));
            }
            let to = find_wallet(&records.wallets, to_id)?;
            if input.amount <= Decimal::ZERO {
                return Err(TrackerError::invalid(
                    "Transfer amount must be greater than zero",
                ));
            }
            if wallet.balance < input.amount {
                return Err(TrackerError::invalid(format!(
                    "Insufficient balance in '{}'",
                    wallet.name
                )));
            }
            let description = if input.description.trim().is_empty() {
                format!("Transfer from {} to {}", wallet.name, to.name)
            } else {
                input.description.trim().to_string()
            };
            (None, Some(to_id), description)
        }
        kind => {
            let cid = input
                .category_id
                .ok_or_else(|| TrackerError::invalid("Choose a category"))?;
            let category = records
                .categories
                .iter()
                .find(|c| c.id == cid)
                .ok_or(TrackerError::NotFound {
                    entity: "category",
                    id: cid,
                })?;
            if !category.kind.accepts(kind) {
                return Err(TrackerError::invalid(format!(
                    "Category '{}' is for {} transactions",
                    category.name, category.kind
                )));
            }
            let description = input.description.trim();
            if description.is_empty() {
                return Err(TrackerError::invalid("Description cannot be empty"));
            }
            (Some(cid), None, description.to_string())
        }
    };

    Ok(Transaction {
        id,
        kind: input.kind,
        amount: input.amount,
        date: input.date.format("%Y-%m-%d").to_string(),
        category_id,
        wallet_id: input.wallet_id,
        to_wallet_id,
        description,
        notes: input.notes.trim().to_string(),
        created_at,
    })
}

fn validate_wallet(
    wallets: &[Wallet],
    editing: Option<i64>,
    name: &str,
    balance: Decimal,
) -> TrackerResult<()> {
    if name.is_empty() {
        return Err(TrackerError::invalid("Wallet name cannot be empty"));
    }
    if balance < Decimal::ZERO {
        return Err(TrackerError::invalid("Balance cannot be negative"));
    }
    if balance > MAX_AMOUNT {
        return Err(TrackerError::invalid("Balance is too large"));
    }
    if wallets
        .iter()
        .any(|w| Some(w.id) != editing && same_name(&w.name, name))
    {
        return Err(TrackerError::invalid(format!(
            "A wallet named '{}' already exists",
            name
        )));
    }
    Ok(())
}

fn validate_category_name(
    categories: &[Category],
    editing: Option<i64>,
    name: &str,
    kind: CategoryKind,
) -> TrackerResult<()> {
    if name.is_empty() {
        return Err(TrackerError::invalid("Category name cannot be empty"));
    }
    if categories
        .iter()
        .any(|c| Some(c.id) != editing && c.kind == kind && same_name(&c.name, name))
    {
        return Err(TrackerError::invalid(format!(
            "An {} category named '{}' already exists",
            kind, name
        )));
    }
    Ok(())
}

/// Reads a JSON array, keeping the elements that decode and skipping the rest.
fn load_collection<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> TrackerResult<Vec<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };
    let items = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!(key, "stored value is not a list, ignoring it");
            return Ok(Vec::new());
        }
        Err(err) => {
            tracing::warn!(key, %err, "stored value is not valid JSON, ignoring it");
            return Ok(Vec::new());
        }
    };
    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(key, index = idx, %err, "skipping malformed record");
                None
            }
        })
        .collect();
    if parsed.len() != total {
        tracing::warn!(key, kept = parsed.len(), total, "some records were skipped");
    }
    Ok(parsed)
}

fn with_backup_defaults(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        map.entry("exportDate")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        map.entry("version")
            .or_insert_with(|| Value::String(BACKUP_VERSION.to_string()));
    }
    value
}

fn rebuild_sequences(records: &mut Records) {
    let seq = &mut records.sequences;
    let max_t = records.transactions.iter().map(|t| t.id).max().unwrap_or(0);
    let max_w = records.wallets.iter().map(|w| w.id).max().unwrap_or(0);
    let max_c = records.categories.iter().map(|c| c.id).max().unwrap_or(0);
    let max_b = records.budgets.iter().map(|b| b.id).max().unwrap_or(0);
    seq.transaction = seq.transaction.max(max_t);
    seq.wallet = seq.wallet.max(max_w);
    seq.category = seq.category.max(max_c);
    seq.budget = seq.budget.max(max_b);
}

fn seed_categories(records: &mut Records) {
    const DEFAULTS: [(&str, CategoryKind, &str); 12] = [
        ("Salary", CategoryKind::Income, "#10b981"),
        ("Investment", CategoryKind::Income, "#06b6d4"),
        ("Bonus", CategoryKind::Income, "#f59e0b"),
        ("Other", CategoryKind::Income, "#8b5cf6"),
        ("Food & Drinks", CategoryKind::Expense, "#ef4444"),
        ("Transportation", CategoryKind::Expense, "#8b5cf6"),
        ("Shopping", CategoryKind::Expense, "#ec4899"),
        ("Entertainment", CategoryKind::Expense, "#f97316"),
        ("Health", CategoryKind::Expense, "#14b8a6"),
        ("Education", CategoryKind::Expense, "#84cc16"),
        ("Bills", CategoryKind::Expense, "#06b6d4"),
        ("Other", CategoryKind::Expense, "#64748b"),
    ];
    for (name, kind, color) in DEFAULTS {
        records.sequences.category += 1;
        records.categories.push(Category {
            id: records.sequences.category,
            name: name.to_string(),
            kind,
            color: color.to_string(),
        });
    }
}

fn seed_wallets(records: &mut Records) {
    let defaults: [(&str, WalletKind, i64, &str); 3] = [
        ("Main Wallet", WalletKind::Cash, 1_000_000, "#4f46e5"),
        ("Bank Account", WalletKind::Bank, 5_000_000, "#10b981"),
        ("E-Wallet", WalletKind::Ewallet, 500_000, "#f59e0b"),
    ];
    let now = Utc::now();
    for (name, kind, balance, color) in defaults {
        records.sequences.wallet += 1;
        records.wallets.push(Wallet {
            id: records.sequences.wallet,
            name: name.to_string(),
            kind,
            balance: Decimal::from(balance),
            color: color.to_string(),
            created_at: now,
        });
    }
}
