// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::models::{CategoryKind, TransactionKind};
use crate::query::{DateSpan, FilterSpec, RelativePeriod, filter_transactions};
use crate::records::{NewTransaction, RecordStore};
use crate::report::{UNCATEGORIZED, UNKNOWN_WALLET};
use crate::utils::{
    date_or_today, fmt_money, id_for_category, id_for_wallet, maybe_print_json, now, parse_date,
    parse_decimal, pretty_table,
};
use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle<S: KeyValueStore>(store: &mut RecordStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let removed = store.delete_transaction(id)?;
            println!("Removed transaction #{} ({})", removed.id, removed.description);
        }
        _ => {}
    }
    Ok(())
}

fn parse_kind(raw: &str) -> Result<TransactionKind> {
    raw.parse::<TransactionKind>().map_err(|e| anyhow!(e))
}

fn category_kind_for(kind: TransactionKind) -> Option<CategoryKind> {
    match kind {
        TransactionKind::Income => Some(CategoryKind::Income),
        TransactionKind::Expense => Some(CategoryKind::Expense),
        TransactionKind::Transfer => None,
    }
}

fn add<S: KeyValueStore>(store: &mut RecordStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let kind = parse_kind(sub.get_one::<String>("type").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = date_or_today(sub.get_one::<String>("date"))?;
    let wallet_id = id_for_wallet(store, sub.get_one::<String>("wallet").unwrap())?;
    let category_id = id_for_category(
        store,
        sub.get_one::<String>("category").unwrap(),
        category_kind_for(kind),
    )?;
    let description = sub
        .get_one::<String>("description")
        .cloned()
        .unwrap_or_default();
    let notes = sub.get_one::<String>("note").cloned().unwrap_or_default();

    let txn = store.add_transaction(NewTransaction {
        kind,
        amount,
        date,
        category_id: Some(category_id),
        wallet_id,
        to_wallet_id: None,
        description,
        notes,
    })?;
    println!(
        "Recorded {} {} on {} '{}' (#{})",
        txn.kind,
        fmt_money(&txn.amount, store.settings()),
        txn.date,
        txn.description,
        txn.id
    );
    Ok(())
}

/// Starts from the stored record and overrides whatever flags were given.
fn edit<S: KeyValueStore>(store: &mut RecordStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let current = store.transaction(id)?.clone();

    let kind = match sub.get_one::<String>("type") {
        Some(t) => parse_kind(t)?,
        None => current.kind,
    };
    let amount = match sub.get_one::<String>("amount") {
        Some(a) => parse_decimal(a)?,
        None => current.amount,
    };
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => current.occurred_on().unwrap_or_else(|| now().date()),
    };
    let wallet_id = match sub.get_one::<String>("wallet") {
        Some(w) => id_for_wallet(store, w)?,
        None => current.wallet_id,
    };
    let category_id = match sub.get_one::<String>("category") {
        Some(c) => Some(id_for_category(store, c, category_kind_for(kind))?),
        None => current.category_id,
    };

    let txn = store.update_transaction(
        id,
        NewTransaction {
            kind,
            amount,
            date,
            category_id,
            wallet_id,
            to_wallet_id: current.to_wallet_id,
            description: sub
                .get_one::<String>("description")
                .cloned()
                .unwrap_or(current.description),
            notes: sub.get_one::<String>("note").cloned().unwrap_or(current.notes),
        },
    )?;
    println!("Updated transaction #{}", txn.id);
    Ok(())
}

fn list<S: KeyValueStore>(store: &RecordStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub, now())?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let settings = store.settings();
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.to_string(),
                    r.description.clone(),
                    r.category.clone(),
                    r.wallet.clone(),
                    fmt_money(&r.amount, settings),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Description", "Category", "Wallet", "Amount"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: TransactionKind,
    pub description: String,
    pub category: String,
    pub wallet: String,
    pub amount: Decimal,
    pub notes: String,
}

/// Applies the `tx list` filters, newest first, resolved against `now`.
pub fn query_rows<S: KeyValueStore>(
    store: &RecordStore<S>,
    sub: &clap::ArgMatches,
    now: NaiveDateTime,
) -> Result<Vec<TransactionRow>> {
    let mut spec = FilterSpec::default();
    if let Some(t) = sub.get_one::<String>("type") {
        spec.kind = Some(parse_kind(t)?);
    }
    if let Some(c) = sub.get_one::<String>("category") {
        spec.category_id = Some(id_for_category(store, c, None)?);
    }
    if let Some(w) = sub.get_one::<String>("wallet") {
        spec.wallet_id = Some(id_for_wallet(store, w)?);
    }
    if let Some(p) = sub.get_one::<String>("period") {
        spec.period = Some(p.parse::<RelativePeriod>().map_err(|e| anyhow!(e))?);
    }
    if let (Some(from), Some(to)) = (sub.get_one::<String>("from"), sub.get_one::<String>("to")) {
        spec.range = Some(DateSpan {
            start: parse_date(from)?,
            end: parse_date(to)?,
        });
    }

    let mut matched = filter_transactions(store.transactions(), &spec, now);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        matched.truncate(*limit);
    }

    let rows = matched
        .into_iter()
        .map(|t| {
            let category = match t.kind {
                TransactionKind::Transfer => String::new(),
                _ => t
                    .category_id
                    .and_then(|id| store.category(id).ok())
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            };
            let wallet_name = |id: i64| {
                store
                    .wallet(id)
                    .map(|w| w.name.clone())
                    .unwrap_or_else(|_| UNKNOWN_WALLET.to_string())
            };
            let wallet = match t.to_wallet_id {
                Some(to) => format!("{} -> {}", wallet_name(t.wallet_id), wallet_name(to)),
                None => wallet_name(t.wallet_id),
            };
            TransactionRow {
                id: t.id,
                date: t.date,
                kind: t.kind,
                description: t.description,
                category,
                wallet,
                amount: t.amount,
                notes: t.notes,
            }
        })
        .collect();
    Ok(rows)
}
