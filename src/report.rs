// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::percent_of;
use crate::models::{Category, Transaction, TransactionKind, Wallet};
use crate::query::{DateSpan, FilterSpec, filter_transactions};
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const UNKNOWN_WALLET: &str = "Unknown wallet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Daily,
    Weekly,
    Monthly,
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(ReportKind::Daily),
            "weekly" => Ok(ReportKind::Weekly),
            "monthly" => Ok(ReportKind::Monthly),
            other => Err(format!(
                "Unknown report kind '{}' (use daily|weekly|monthly)",
                other
            )),
        }
    }
}

/// Calendar days covered by a report anchored at `date`. Weeks run Monday
/// through Sunday.
pub fn report_window(kind: ReportKind, date: NaiveDate) -> DateSpan {
    match kind {
        ReportKind::Daily => DateSpan {
            start: date,
            end: date,
        },
        ReportKind::Weekly => {
            let back = (date.weekday().num_days_from_sunday() + 6) % 7;
            let start = date - Duration::days(back as i64);
            DateSpan {
                start,
                end: start + Duration::days(6),
            }
        }
        ReportKind::Monthly => {
            let start = date.with_day(1).unwrap_or(date);
            let next = if date.month() == 12 {
                NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
            };
            let end = next.and_then(|d| d.pred_opt()).unwrap_or(date);
            DateSpan { start, end }
        }
    }
}

pub fn report_title(kind: ReportKind, date: NaiveDate) -> String {
    let span = report_window(kind, date);
    match kind {
        ReportKind::Daily => format!("Daily Report - {}", date.format("%-d %B %Y")),
        ReportKind::Weekly => format!(
            "Weekly Report - {} - {}",
            span.start.format("%-d %b"),
            span.end.format("%-d %b %Y")
        ),
        ReportKind::Monthly => format!("Monthly Report - {}", date.format("%B %Y")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub date: NaiveDate,
    pub category_id: Option<i64>,
    pub wallet_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub income: Decimal,
    pub expense: Decimal,
    pub count: usize,
}

impl Activity {
    fn record(&mut self, t: &Transaction) {
        match t.kind {
            TransactionKind::Income => self.income += t.amount,
            TransactionKind::Expense => self.expense += t.amount,
            TransactionKind::Transfer => {}
        }
        self.count += 1;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Net as a share of income, one decimal place.
    pub income_percentage: Decimal,
    /// Whole units.
    pub average_transaction_amount: Decimal,
    pub largest_transaction_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub category: String,
    pub kind: TransactionKind,
    pub wallet: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub kind: ReportKind,
    pub title: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub totals: Totals,
    pub transaction_count: usize,
    pub by_category: BTreeMap<String, Activity>,
    /// Only filled for daily and weekly reports.
    pub by_day: BTreeMap<NaiveDate, Activity>,
    pub summary: ReportSummary,
    pub lines: Vec<ReportLine>,
    pub transactions: Vec<Transaction>,
}

pub fn compile_report(
    records: &[Transaction],
    categories: &[Category],
    wallets: &[Wallet],
    request: &ReportRequest,
) -> ReportDocument {
    let span = report_window(request.kind, request.date);
    let spec = FilterSpec {
        category_id: request.category_id,
        wallet_id: request.wallet_id,
        range: Some(span),
        ..FilterSpec::default()
    };
    let transactions = filter_transactions(records, &spec, span.window().end);

    let category_names: HashMap<i64, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();
    let wallet_names: HashMap<i64, &str> =
        wallets.iter().map(|w| (w.id, w.name.as_str())).collect();

    let mut totals = Totals::default();
    let mut by_category: BTreeMap<String, Activity> = BTreeMap::new();
    let mut by_day: BTreeMap<NaiveDate, Activity> = BTreeMap::new();
    let group_by_day = matches!(request.kind, ReportKind::Daily | ReportKind::Weekly);

    for t in &transactions {
        match t.kind {
            TransactionKind::Income => totals.income += t.amount,
            TransactionKind::Expense => totals.expense += t.amount,
            TransactionKind::Transfer => {}
        }
        if let Some(cid) = t.category_id {
            let name = category_names.get(&cid).copied().unwrap_or(UNCATEGORIZED);
            by_category.entry(name.to_string()).or_default().record(t);
        }
        if group_by_day {
            if let Some(day) = t.occurred_on() {
                by_day.entry(day).or_default().record(t);
            }
        }
    }
    totals.net = totals.income - totals.expense;

    let count = transactions.len();
    let summary = ReportSummary {
        income_percentage: if totals.income > Decimal::ZERO {
            percent_of(totals.net, totals.income)
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        },
        average_transaction_amount: if count > 0 {
            ((totals.income + totals.expense) / Decimal::from(count))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        } else {
            Decimal::ZERO
        },
        largest_transaction_amount: transactions
            .iter()
            .map(|t| t.amount)
            .max()
            .unwrap_or(Decimal::ZERO),
    };

    let lines = transactions
        .iter()
        .map(|t| ReportLine {
            id: t.id,
            date: t
                .occurred_on()
                .map(|d| d.to_string())
                .unwrap_or_else(|| t.date.clone()),
            description: t.description.clone(),
            category: t
                .category_id
                .and_then(|cid| category_names.get(&cid).copied())
                .unwrap_or(UNCATEGORIZED)
                .to_string(),
            kind: t.kind,
            wallet: wallet_names
                .get(&t.wallet_id)
                .copied()
                .unwrap_or(UNKNOWN_WALLET)
                .to_string(),
            amount: t.amount,
        })
        .collect();

    ReportDocument {
        kind: request.kind,
        title: report_title(request.kind, request.date),
        start: span.start,
        end: span.end,
        totals,
        transaction_count: count,
        by_category,
        by_day,
        summary,
        lines,
        transactions,
    }
}
