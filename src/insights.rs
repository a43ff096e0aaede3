// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rule-based findings over a month of aggregates.
//!
//! Every rule runs and contributes at most one entry; the order rules run in
//! is also the display priority.

use crate::aggregate::{BudgetStatus, MonthlyAggregates, Trend, percent_of, top_category};
use rust_decimal::Decimal;
use serde::Serialize;

pub const MAX_DISPLAYED_INSIGHTS: usize = 4;
/// Below this many rule hits a generic entry is appended.
pub const MIN_INSIGHTS: usize = 3;

const EXCELLENT_SAVINGS: Decimal = Decimal::from_parts(30, 0, 0, false, 0);
const GOOD_SAVINGS: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
const DOMINANT_SHARE: Decimal = Decimal::from_parts(40, 0, 0, false, 0);
const SWING_PERCENT: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub title: String,
    pub message: String,
}

impl Insight {
    fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Insight {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Insights in priority order, cut to what a dashboard shows.
pub fn generate_insights(aggregates: &MonthlyAggregates) -> Vec<Insight> {
    let mut all = candidate_insights(aggregates);
    all.truncate(MAX_DISPLAYED_INSIGHTS);
    all
}

/// Every insight the rules produce, untruncated.
pub fn candidate_insights(aggregates: &MonthlyAggregates) -> Vec<Insight> {
    let mut insights = Vec::new();
    insights.push(savings_tier(aggregates.savings_rate()));
    insights.extend(dominant_category(aggregates));
    insights.extend(expense_swing(aggregates));
    insights.extend(income_swing(aggregates));
    insights.extend(budget_rollup(aggregates));
    insights.extend(positive_cashflow(aggregates));

    if insights.len() < MIN_INSIGHTS {
        insights.push(Insight::new(
            "Financial analysis",
            "Still learning your spending patterns. Add more transactions for sharper insights.",
        ));
    }
    insights
}

fn savings_tier(rate: Decimal) -> Insight {
    if rate > EXCELLENT_SAVINGS {
        Insight::new(
            "Excellent savings",
            format!(
                "Your savings rate of {:.1}% is outstanding. You are keeping more than 30% of your income.",
                rate
            ),
        )
    } else if rate > GOOD_SAVINGS {
        Insight::new(
            "Healthy savings",
            format!(
                "Your savings rate of {:.1}% is very good. Keep up the healthy habits.",
                rate
            ),
        )
    } else if rate > Decimal::ZERO {
        Insight::new(
            "Improve your savings",
            format!(
                "Your savings rate of {:.1}% is still low. Try trimming non-essential spending.",
                rate
            ),
        )
    } else if rate.is_zero() {
        Insight::new(
            "Break even",
            "Income and expenses are balanced this month. Try setting a little aside.",
        )
    } else {
        Insight::new(
            "Deficit warning",
            "You spent more than you earned this month. Review your expenses and look for costs to cut.",
        )
    }
}

fn dominant_category(aggregates: &MonthlyAggregates) -> Option<Insight> {
    if aggregates.expense <= Decimal::ZERO {
        return None;
    }
    let (_, top) = top_category(&aggregates.categories)?;
    let share = percent_of(top.total, aggregates.expense);
    (share > DOMINANT_SHARE).then(|| {
        Insight::new(
            format!("Focus on {}", top.name),
            format!(
                "{} makes up {:.1}% of your total spending. Consider cutting back here.",
                top.name, share
            ),
        )
    })
}

fn expense_swing(aggregates: &MonthlyAggregates) -> Option<Insight> {
    let change = aggregates.expense_change();
    (change.percentage > SWING_PERCENT).then(|| {
        let up = change.trend == Trend::Positive;
        Insight::new(
            if up { "Spending is up" } else { "Spending is down" },
            format!(
                "Your expenses {} {:.1}% compared to last month.",
                if up { "rose" } else { "fell" },
                change.percentage
            ),
        )
    })
}

fn income_swing(aggregates: &MonthlyAggregates) -> Option<Insight> {
    let change = aggregates.income_change();
    (change.percentage > SWING_PERCENT).then(|| {
        let up = change.trend == Trend::Positive;
        Insight::new(
            if up { "Income is up" } else { "Income is down" },
            format!(
                "Your income {} {:.1}% compared to last month.",
                if up { "rose" } else { "fell" },
                change.percentage
            ),
        )
    })
}

fn budget_rollup(aggregates: &MonthlyAggregates) -> Option<Insight> {
    if aggregates.budgets.is_empty() {
        return None;
    }
    let over = aggregates
        .budgets
        .iter()
        .filter(|u| u.status == BudgetStatus::OverLimit)
        .count();
    let near = aggregates
        .budgets
        .iter()
        .filter(|u| u.status == BudgetStatus::NearLimit)
        .count();

    Some(if over > 0 {
        Insight::new(
            "Budget exceeded",
            format!(
                "{} budget categor{} went over the limit. Review your spending right away.",
                over,
                if over == 1 { "y" } else { "ies" }
            ),
        )
    } else if near > 0 {
        Insight::new(
            "Budget almost used up",
            format!(
                "{} budget categor{} close to the limit. Watch your next expenses.",
                near,
                if near == 1 { "y is" } else { "ies are" }
            ),
        )
    } else {
        Insight::new(
            "Budgets under control",
            "All of your budgets are within their limits. Keep it up.",
        )
    })
}

fn positive_cashflow(aggregates: &MonthlyAggregates) -> Option<Insight> {
    let net = aggregates.net();
    (net > Decimal::ZERO).then(|| {
        Insight::new(
            "Positive cash flow",
            format!(
                "Your cash flow is positive by {}. Consider investing the surplus.",
                net.round_dp(2).normalize()
            ),
        )
    })
}
