// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly sums, category breakdowns, budget usage and period deltas.
//!
//! Every function here is a pure read over the slices it is given.

use crate::models::{Budget, Category, CategoryKind, Transaction, TransactionKind, Wallet};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Utilisation strictly above this is near the limit.
pub const NEAR_LIMIT_PERCENT: Decimal = Decimal::from_parts(90, 0, 0, false, 0);
/// Utilisation strictly above this is over the limit.
pub const OVER_LIMIT_PERCENT: Decimal = Decimal::ONE_HUNDRED;
/// Dashboard overview: remaining share below this is running low.
pub const LOW_REMAINING_PERCENT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

pub fn monthly_total(
    records: &[Transaction],
    kind: TransactionKind,
    month: u32,
    year: i32,
) -> Decimal {
    if kind == TransactionKind::Transfer {
        return Decimal::ZERO;
    }
    records
        .iter()
        .filter(|t| t.kind == kind && t.in_month(month, year))
        .map(|t| t.amount)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub color: String,
    pub total: Decimal,
}

/// Expense totals per expense category for the month. Categories that saw no
/// spending are left out.
pub fn category_breakdown(
    records: &[Transaction],
    categories: &[Category],
    month: u32,
    year: i32,
) -> BTreeMap<i64, CategoryTotal> {
    let mut totals: BTreeMap<i64, CategoryTotal> = categories
        .iter()
        .filter(|c| c.kind == CategoryKind::Expense)
        .map(|c| {
            (
                c.id,
                CategoryTotal {
                    name: c.name.clone(),
                    color: c.color.clone(),
                    total: Decimal::ZERO,
                },
            )
        })
        .collect();

    for t in records
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense && t.in_month(month, year))
    {
        if let Some(entry) = t.category_id.and_then(|id| totals.get_mut(&id)) {
            entry.total += t.amount;
        }
    }

    totals.retain(|_, c| c.total > Decimal::ZERO);
    totals
}

/// Highest-spending category; the lowest id wins a tie.
pub fn top_category(breakdown: &BTreeMap<i64, CategoryTotal>) -> Option<(i64, &CategoryTotal)> {
    let mut best: Option<(i64, &CategoryTotal)> = None;
    for (id, total) in breakdown {
        if best.is_none_or(|(_, b)| total.total > b.total) {
            best = Some((*id, total));
        }
    }
    best
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Change {
    /// Magnitude of the change relative to `previous`, never negative.
    pub percentage: Decimal,
    pub trend: Trend,
    /// `current - previous`.
    pub amount: Decimal,
}

/// `part / whole` as a percentage. A quotient past the `Decimal` range
/// saturates at `Decimal::MAX` (or `MIN` when the signs differ).
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if part.is_sign_negative() != whole.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

pub fn percent_change(current: Decimal, previous: Decimal) -> Change {
    let amount = current - previous;
    if previous.is_zero() {
        let positive = current > Decimal::ZERO;
        return Change {
            percentage: if positive { Decimal::ONE_HUNDRED } else { Decimal::ZERO },
            trend: if positive { Trend::Positive } else { Trend::Neutral },
            amount,
        };
    }
    let trend = if amount > Decimal::ZERO {
        Trend::Positive
    } else if amount < Decimal::ZERO {
        Trend::Negative
    } else {
        Trend::Neutral
    };
    Change {
        percentage: percent_of(amount.abs(), previous.abs()),
        trend,
        amount,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    Safe,
    NearLimit,
    OverLimit,
}

impl BudgetStatus {
    pub fn classify(percentage: Decimal) -> Self {
        if percentage > OVER_LIMIT_PERCENT {
            BudgetStatus::OverLimit
        } else if percentage > NEAR_LIMIT_PERCENT {
            BudgetStatus::NearLimit
        } else {
            BudgetStatus::Safe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::Safe => "safe",
            BudgetStatus::NearLimit => "near limit",
            BudgetStatus::OverLimit => "over limit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetUsage {
    pub budget: Budget,
    pub spent: Decimal,
    pub percentage: Decimal,
    pub status: BudgetStatus,
}

/// Usage of every budget set for the month. A budget with a zero amount is
/// reported at 100% and counted as over the limit.
pub fn budget_utilization(
    records: &[Transaction],
    budgets: &[Budget],
    month: u32,
    year: i32,
) -> Vec<BudgetUsage> {
    budgets
        .iter()
        .filter(|b| b.is_for(month, year))
        .map(|b| {
            let spent: Decimal = records
                .iter()
                .filter(|t| {
                    t.kind == TransactionKind::Expense
                        && t.category_id == Some(b.category_id)
                        && t.in_month(month, year)
                })
                .map(|t| t.amount)
                .sum();
            let (percentage, status) = if b.amount <= Decimal::ZERO {
                (Decimal::ONE_HUNDRED, BudgetStatus::OverLimit)
            } else {
                let pct = percent_of(spent, b.amount);
                (pct, BudgetStatus::classify(pct))
            };
            BudgetUsage {
                budget: b.clone(),
                spent,
                percentage,
                status,
            }
        })
        .collect()
}

/// Share of income kept. Zero when there is no income, even if money was spent.
pub fn savings_rate(income: Decimal, expense: Decimal) -> Decimal {
    if income > Decimal::ZERO {
        percent_of(income - expense, income)
    } else {
        Decimal::ZERO
    }
}

pub fn previous_month(month: u32, year: i32) -> (u32, i32) {
    if month <= 1 { (12, year - 1) } else { (month - 1, year) }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAggregates {
    pub month: u32,
    pub year: i32,
    pub income: Decimal,
    pub expense: Decimal,
    pub previous_income: Decimal,
    pub previous_expense: Decimal,
    pub categories: BTreeMap<i64, CategoryTotal>,
    pub budgets: Vec<BudgetUsage>,
}

impl MonthlyAggregates {
    pub fn compute(
        records: &[Transaction],
        categories: &[Category],
        budgets: &[Budget],
        month: u32,
        year: i32,
    ) -> Self {
        let (pm, py) = previous_month(month, year);
        MonthlyAggregates {
            month,
            year,
            income: monthly_total(records, TransactionKind::Income, month, year),
            expense: monthly_total(records, TransactionKind::Expense, month, year),
            previous_income: monthly_total(records, TransactionKind::Income, pm, py),
            previous_expense: monthly_total(records, TransactionKind::Expense, pm, py),
            categories: category_breakdown(records, categories, month, year),
            budgets: budget_utilization(records, budgets, month, year),
        }
    }

    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }

    pub fn savings_rate(&self) -> Decimal {
        savings_rate(self.income, self.expense)
    }

    pub fn income_change(&self) -> Change {
        percent_change(self.income, self.previous_income)
    }

    pub fn expense_change(&self) -> Change {
        percent_change(self.expense, self.previous_expense)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyCashflow {
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// The trailing `months` months ending at (month, year), oldest first.
pub fn cashflow_series(
    records: &[Transaction],
    month: u32,
    year: i32,
    months: usize,
) -> Vec<MonthlyCashflow> {
    let mut out = Vec::with_capacity(months);
    let (mut m, mut y) = (month, year);
    for _ in 0..months {
        let income = monthly_total(records, TransactionKind::Income, m, y);
        let expense = monthly_total(records, TransactionKind::Expense, m, y);
        out.push(MonthlyCashflow {
            year: y,
            month: m,
            income,
            expense,
            net: income - expense,
        });
        (m, y) = previous_month(m, y);
    }
    out.reverse();
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetOverview {
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub remaining: Decimal,
    pub remaining_percentage: Decimal,
    pub status: BudgetStatus,
}

pub fn budget_overview(usages: &[BudgetUsage]) -> BudgetOverview {
    let total_budget: Decimal = usages.iter().map(|u| u.budget.amount).sum();
    let total_spent: Decimal = usages.iter().map(|u| u.spent).sum();
    let remaining = total_budget - total_spent;
    let remaining_percentage = if total_budget > Decimal::ZERO {
        percent_of(remaining, total_budget)
    } else {
        Decimal::ONE_HUNDRED
    };
    let status = if remaining < Decimal::ZERO {
        BudgetStatus::OverLimit
    } else if remaining_percentage < LOW_REMAINING_PERCENT {
        BudgetStatus::NearLimit
    } else {
        BudgetStatus::Safe
    };
    BudgetOverview {
        total_budget,
        total_spent,
        remaining,
        remaining_percentage,
        status,
    }
}

pub fn total_balance(wallets: &[Wallet]) -> Decimal {
    wallets.iter().map(|w| w.balance).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub month: u32,
    pub year: i32,
    pub total_balance: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub savings_rate: Decimal,
    pub income_change: Change,
    pub expense_change: Change,
    pub budget: BudgetOverview,
}

impl DashboardSummary {
    pub fn compute(aggregates: &MonthlyAggregates, wallets: &[Wallet]) -> Self {
        DashboardSummary {
            month: aggregates.month,
            year: aggregates.year,
            total_balance: total_balance(wallets),
            income: aggregates.income,
            expense: aggregates.expense,
            net: aggregates.net(),
            savings_rate: aggregates.savings_rate(),
            income_change: aggregates.income_change(),
            expense_change: aggregates.expense_change(),
            budget: budget_overview(&aggregates.budgets),
        }
    }
}
