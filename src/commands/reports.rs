// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{
    Change, CategoryTotal, DashboardSummary, MonthlyAggregates, MonthlyCashflow, Trend,
    cashflow_series,
};
use crate::db::KeyValueStore;
use crate::insights::{Insight, candidate_insights, generate_insights};
use crate::models::Transaction;
use crate::records::{RecordStore, Statistics};
use crate::report::{ReportKind, ReportRequest, compile_report};
use crate::utils::{
    date_or_today, fmt_balance, fmt_money, fmt_percent, id_for_category, id_for_wallet,
    maybe_print_json, month_or_current, now, pretty_table,
};
use anyhow::{Result, anyhow};
use serde::Serialize;
use std::time::Duration;

const RECENT_ON_DASHBOARD: usize = 5;

#[derive(Debug, Serialize)]
struct DashboardView {
    summary: DashboardSummary,
    statistics: Statistics,
    cashflow: Vec<MonthlyCashflow>,
    categories: Vec<CategoryTotal>,
    recent: Vec<Transaction>,
}

fn fmt_change(change: &Change) -> String {
    let arrow = match change.trend {
        Trend::Positive => "▲",
        Trend::Negative => "▼",
        Trend::Neutral => "=",
    };
    format!("{} {}", arrow, fmt_percent(&change.percentage))
}

pub fn dashboard<S: KeyValueStore>(store: &RecordStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (month, year) = month_or_current(sub.get_one::<String>("month"))?;
    let months = *sub.get_one::<usize>("months").unwrap_or(&6);
    let aggregates = MonthlyAggregates::compute(
        store.transactions(),
        store.categories(),
        store.budgets(),
        month,
        year,
    );
    let summary = DashboardSummary::compute(&aggregates, store.wallets());
    let mut categories: Vec<CategoryTotal> = aggregates.categories.values().cloned().collect();
    categories.sort_by(|a, b| b.total.cmp(&a.total));
    let view = DashboardView {
        summary,
        statistics: store.statistics(now()),
        cashflow: cashflow_series(store.transactions(), month, year, months),
        categories,
        recent: store.recent_transactions(RECENT_ON_DASHBOARD),
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        return Ok(());
    }

    let settings = store.settings();
    let s = &view.summary;
    println!("Dashboard {}-{:02}", s.year, s.month);
    println!(
        "{}",
        pretty_table(
            &["Metric", "Value", "vs last month"],
            vec![
                vec![
                    "Total balance".into(),
                    fmt_balance(&s.total_balance, settings),
                    String::new(),
                ],
                vec![
                    "Income".into(),
                    fmt_money(&s.income, settings),
                    fmt_change(&s.income_change),
                ],
                vec![
                    "Expense".into(),
                    fmt_money(&s.expense, settings),
                    fmt_change(&s.expense_change),
                ],
                vec!["Net".into(), fmt_money(&s.net, settings), String::new()],
                vec![
                    "Savings rate".into(),
                    fmt_percent(&s.savings_rate),
                    String::new(),
                ],
                vec![
                    "Budget left".into(),
                    format!(
                        "{} of {} ({})",
                        fmt_money(&s.budget.remaining, settings),
                        fmt_money(&s.budget.total_budget, settings),
                        fmt_percent(&s.budget.remaining_percentage)
                    ),
                    s.budget.status.label().to_string(),
                ],
            ],
        )
    );

    let flow = view
        .cashflow
        .iter()
        .map(|c| {
            vec![
                format!("{}-{:02}", c.year, c.month),
                fmt_money(&c.income, settings),
                fmt_money(&c.expense, settings),
                fmt_money(&c.net, settings),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Net"], flow)
    );

    if !view.categories.is_empty() {
        let spend = view
            .categories
            .iter()
            .map(|c| vec![c.name.clone(), fmt_money(&c.total, settings)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], spend));
    }

    let recent = view
        .recent
        .iter()
        .map(|t| {
            vec![
                t.date.clone(),
                t.kind.to_string(),
                t.description.clone(),
                fmt_money(&t.amount, settings),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Type", "Description", "Amount"], recent)
    );
    Ok(())
}

/// Re-reads the store and redraws the dashboard on the configured interval.
pub fn watch_dashboard<S, F>(mut reload: F, sub: &clap::ArgMatches) -> Result<()>
where
    S: KeyValueStore,
    F: FnMut() -> Result<RecordStore<S>>,
{
    loop {
        let store = reload()?;
        print!("\x1b[2J\x1b[H");
        dashboard(&store, sub)?;
        let secs = store.settings().refresh_interval_secs.max(1);
        tracing::debug!(secs, "waiting for next dashboard refresh");
        std::thread::sleep(Duration::from_secs(secs));
    }
}

pub fn insights<S: KeyValueStore>(store: &RecordStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let (month, year) = month_or_current(sub.get_one::<String>("month"))?;
    let aggregates = MonthlyAggregates::compute(
        store.transactions(),
        store.categories(),
        store.budgets(),
        month,
        year,
    );
    let list: Vec<Insight> = if sub.get_flag("all") {
        candidate_insights(&aggregates)
    } else {
        generate_insights(&aggregates)
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &list)? {
        let data = list
            .iter()
            .map(|i| vec![i.title.clone(), i.message.clone()])
            .collect();
        println!("{}", pretty_table(&["Insight", "Detail"], data));
    }
    Ok(())
}

/// Builds a report request from `--kind`, `--date`, `--category`, `--wallet`.
pub fn report_request<S: KeyValueStore>(
    store: &RecordStore<S>,
    sub: &clap::ArgMatches,
) -> Result<ReportRequest> {
    let kind: ReportKind = sub
        .get_one::<String>("kind")
        .map(String::as_str)
        .unwrap_or("monthly")
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let date = date_or_today(sub.get_one::<String>("date"))?;
    let category_id = match sub.get_one::<String>("category") {
        Some(c) => Some(id_for_category(store, c, None)?),
        None => None,
    };
    let wallet_id = match sub.get_one::<String>("wallet") {
        Some(w) => Some(id_for_wallet(store, w)?),
        None => None,
    };
    Ok(ReportRequest {
        kind,
        date,
        category_id,
        wallet_id,
    })
}

pub fn report<S: KeyValueStore>(store: &RecordStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let request = report_request(store, sub)?;
    let doc = compile_report(
        store.transactions(),
        store.categories(),
        store.wallets(),
        &request,
    );
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &doc)? {
        return Ok(());
    }

    let settings = store.settings();
    println!("{} ({} to {})", doc.title, doc.start, doc.end);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Net", "Transactions", "Net/Income", "Average", "Largest"],
            vec![vec![
                fmt_money(&doc.totals.income, settings),
                fmt_money(&doc.totals.expense, settings),
                fmt_money(&doc.totals.net, settings),
                doc.transaction_count.to_string(),
                fmt_percent(&doc.summary.income_percentage),
                fmt_money(&doc.summary.average_transaction_amount, settings),
                fmt_money(&doc.summary.largest_transaction_amount, settings),
            ]],
        )
    );

    if !doc.by_category.is_empty() {
        let data = doc
            .by_category
            .iter()
            .map(|(name, a)| {
                vec![
                    name.clone(),
                    fmt_money(&a.income, settings),
                    fmt_money(&a.expense, settings),
                    a.count.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Income", "Expense", "Count"], data)
        );
    }

    if !doc.by_day.is_empty() {
        let data = doc
            .by_day
            .iter()
            .map(|(day, a)| {
                vec![
                    day.to_string(),
                    fmt_money(&a.income, settings),
                    fmt_money(&a.expense, settings),
                    a.count.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Day", "Income", "Expense", "Count"], data)
        );
    }

    let lines = doc
        .lines
        .iter()
        .map(|l| {
            vec![
                l.date.clone(),
                l.description.clone(),
                l.category.clone(),
                l.kind.to_string(),
                l.wallet.clone(),
                fmt_money(&l.amount, settings),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Description", "Category", "Type", "Wallet", "Amount"],
            lines
        )
    );
    Ok(())
}
