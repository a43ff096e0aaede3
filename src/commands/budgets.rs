// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::budget_utilization;
use crate::db::KeyValueStore;
use crate::models::CategoryKind;
use crate::records::RecordStore;
use crate::utils::{
    fmt_money, fmt_percent, id_for_category, maybe_print_json, month_or_current, parse_decimal,
    pretty_table,
};
use anyhow::Result;

pub fn handle<S: KeyValueStore>(store: &mut RecordStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("status", sub)) => status(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let removed = store.delete_budget(id)?;
            println!(
                "Removed budget #{} for {:02}/{}",
                removed.id, removed.month, removed.year
            );
        }
        _ => {}
    }
    Ok(())
}

fn category_name<S: KeyValueStore>(store: &RecordStore<S>, id: i64) -> String {
    store
        .category(id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|_| format!("#{}", id))
}

fn set<S: KeyValueStore>(store: &mut RecordStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (month, year) = month_or_current(sub.get_one::<String>("month"))?;
    let cat = sub.get_one::<String>("category").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category_id = id_for_category(store, cat, Some(CategoryKind::Expense))?;
    let budget = store.set_budget(category_id, month, year, amount)?;
    println!(
        "Budget set for {:02}/{} / {} = {}",
        month,
        year,
        category_name(store, budget.category_id),
        fmt_money(&budget.amount, store.settings())
    );
    Ok(())
}

fn list<S: KeyValueStore>(store: &RecordStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (month, year) = month_or_current(sub.get_one::<String>("month"))?;
    let budgets: Vec<_> = store
        .budgets()
        .iter()
        .filter(|b| b.is_for(month, year))
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budgets)? {
        let data = budgets
            .iter()
            .map(|b| {
                vec![
                    b.id.to_string(),
                    format!("{}-{:02}", b.year, b.month),
                    category_name(store, b.category_id),
                    fmt_money(&b.amount, store.settings()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Month", "Category", "Budget"], data)
        );
    }
    Ok(())
}

fn status<S: KeyValueStore>(store: &RecordStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (month, year) = month_or_current(sub.get_one::<String>("month"))?;
    let usage = budget_utilization(store.transactions(), store.budgets(), month, year);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &usage)? {
        let settings = store.settings();
        let data = usage
            .iter()
            .map(|u| {
                vec![
                    category_name(store, u.budget.category_id),
                    fmt_money(&u.budget.amount, settings),
                    fmt_money(&u.spent, settings),
                    fmt_money(&(u.budget.amount - u.spent), settings),
                    fmt_percent(&u.percentage),
                    u.status.label().to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Budget", "Spent", "Remaining", "Used", "Status"],
                data
            )
        );
    }
    Ok(())
}
