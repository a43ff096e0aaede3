// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::error::TrackerError;
use crate::models::{CategoryKind, TransactionKind};
use crate::records::{NewTransaction, RecordStore};
use crate::utils::{id_for_category, id_for_wallet, parse_date, parse_decimal};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use std::collections::{HashMap, hash_map::Entry};

pub fn handle<S: KeyValueStore>(store: &mut RecordStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("backup", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let json =
                std::fs::read_to_string(path).with_context(|| format!("Read backup {}", path))?;
            store.import_data(&json)?;
            println!(
                "Restored {} transactions, {} wallets, {} categories from {}",
                store.transactions().len(),
                store.wallets().len(),
                store.categories().len(),
                path
            );
            Ok(())
        }
        Some(("transactions", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let count = import_transactions(store, path)?;
            println!("Imported {} transactions from {}", count, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Reads `date,type,amount,category,wallet,description,notes` rows and adds
/// them in one write. Transfer rows name both wallets as `From -> To` and
/// leave the category empty. Any bad row rejects the whole file.
pub fn import_transactions<S: KeyValueStore>(
    store: &mut RecordStore<S>,
    path: &str,
) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let mut wallet_cache: HashMap<String, i64> = HashMap::new();
    let mut batch = Vec::new();
    let mut lines = Vec::new();
    for result in rdr.records() {
        let rec = result?;
        let line = rec.position().map(|p| p.line()).unwrap_or(0);
        let parsed = parse_row(store, &rec, &mut wallet_cache)
            .with_context(|| format!("line {}", line))?;
        batch.push(parsed);
        lines.push(line);
    }

    let count = batch.len();
    match store.add_transactions(batch) {
        Ok(_) => Ok(count),
        Err(TrackerError::Batch { index, source }) => Err(anyhow!(
            "line {}: {}",
            lines.get(index).copied().unwrap_or(0),
            source
        )),
        Err(err) => Err(err.into()),
    }
}

fn parse_row<S: KeyValueStore>(
    store: &RecordStore<S>,
    rec: &csv::StringRecord,
    wallet_cache: &mut HashMap<String, i64>,
) -> Result<NewTransaction> {
    let date_raw = rec.get(0).context("date missing")?;
    let kind: TransactionKind = rec
        .get(1)
        .context("type missing")?
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let amount_raw = rec.get(2).context("amount missing")?;
    let category = rec.get(3).unwrap_or("");
    let wallet = rec.get(4).context("wallet missing")?;

    let date = parse_date(date_raw)?;
    let amount = parse_decimal(amount_raw)?;
    let (wallet_id, to_wallet_id, category_id) = match kind {
        TransactionKind::Transfer => {
            let (from, to) = wallet
                .split_once("->")
                .with_context(|| format!("Transfer wallet '{}' must be 'From -> To'", wallet))?;
            (
                cached_wallet(store, wallet_cache, from)?,
                Some(cached_wallet(store, wallet_cache, to)?),
                None,
            )
        }
        TransactionKind::Income => (
            cached_wallet(store, wallet_cache, wallet)?,
            None,
            Some(id_for_category(store, category, Some(CategoryKind::Income))?),
        ),
        TransactionKind::Expense => (
            cached_wallet(store, wallet_cache, wallet)?,
            None,
            Some(id_for_category(store, category, Some(CategoryKind::Expense))?),
        ),
    };

    Ok(NewTransaction {
        kind,
        amount,
        date,
        category_id,
        wallet_id,
        to_wallet_id,
        description: rec.get(5).unwrap_or("").to_string(),
        notes: rec.get(6).unwrap_or("").to_string(),
    })
}

fn cached_wallet<S: KeyValueStore>(
    store: &RecordStore<S>,
    cache: &mut HashMap<String, i64>,
    name: &str,
) -> Result<i64> {
    let name = name.trim();
    match cache.entry(name.to_lowercase()) {
        Entry::Occupied(entry) => Ok(*entry.get()),
        Entry::Vacant(entry) => Ok(*entry.insert(id_for_wallet(store, name)?)),
    }
}
