// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::models::TransactionKind;
use crate::records::{RecordStore, Records};
use crate::utils::pretty_table;
use anyhow::Result;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

pub fn handle<S: KeyValueStore>(store: &RecordStore<S>) -> Result<()> {
    let rows = diagnose(store.records());
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Consistency problems in the loaded records as (issue, detail) rows.
pub fn diagnose(records: &Records) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let wallet_ids: HashSet<i64> = records.wallets.iter().map(|w| w.id).collect();
    let categories: HashMap<i64, _> = records.categories.iter().map(|c| (c.id, c)).collect();

    for t in &records.transactions {
        if t.occurred_at().is_none() {
            rows.push(vec![
                "unreadable_date".into(),
                format!("transaction #{} date '{}'", t.id, t.date),
            ]);
        }
        for wid in std::iter::once(t.wallet_id).chain(t.to_wallet_id) {
            if !wallet_ids.contains(&wid) {
                rows.push(vec![
                    "dangling_wallet".into(),
                    format!("transaction #{} -> wallet #{}", t.id, wid),
                ]);
            }
        }
        match t.kind {
            TransactionKind::Transfer => match t.to_wallet_id {
                None => rows.push(vec![
                    "transfer_without_destination".into(),
                    format!("transaction #{}", t.id),
                ]),
                Some(to) if to == t.wallet_id => rows.push(vec![
                    "self_transfer".into(),
                    format!("transaction #{} on wallet #{}", t.id, to),
                ]),
                Some(_) => {}
            },
            kind => match t.category_id.map(|cid| (cid, categories.get(&cid))) {
                Some((cid, None)) => rows.push(vec![
                    "dangling_category".into(),
                    format!("transaction #{} -> category #{}", t.id, cid),
                ]),
                Some((_, Some(c))) if !c.kind.accepts(kind) => rows.push(vec![
                    "category_type_mismatch".into(),
                    format!("transaction #{} ({}) in '{}' ({})", t.id, kind, c.name, c.kind),
                ]),
                _ => {}
            },
        }
    }

    let mut seen = HashSet::new();
    for b in &records.budgets {
        if !categories.contains_key(&b.category_id) {
            rows.push(vec![
                "dangling_budget".into(),
                format!("budget #{} -> category #{}", b.id, b.category_id),
            ]);
        }
        if !seen.insert((b.category_id, b.month, b.year)) {
            rows.push(vec![
                "duplicate_budget".into(),
                format!(
                    "budget #{} for category #{} in {}-{:02}",
                    b.id, b.category_id, b.year, b.month
                ),
            ]);
        }
    }

    for w in &records.wallets {
        if w.balance < Decimal::ZERO {
            rows.push(vec![
                "negative_balance".into(),
                format!("wallet '{}' at {}", w.name, w.balance),
            ]);
        }
    }
    rows
}
