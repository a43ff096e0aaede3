// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use fintrack::aggregate::{
    BudgetStatus, MonthlyAggregates, Trend, budget_overview, budget_utilization,
    cashflow_series, category_breakdown, monthly_total, percent_change, savings_rate,
    top_category,
};
use fintrack::models::{Budget, Category, CategoryKind, Transaction, TransactionKind};
use rust_decimal::Decimal;

fn txn(id: i64, kind: TransactionKind, amount: i64, date: &str, category: Option<i64>) -> Transaction {
    Transaction {
        id,
        kind,
        amount: Decimal::from(amount),
        date: date.to_string(),
        category_id: category,
        wallet_id: 1,
        to_wallet_id: None,
        description: String::new(),
        notes: String::new(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn category(id: i64, name: &str, kind: CategoryKind) -> Category {
    Category {
        id,
        name: name.into(),
        kind,
        color: "#000".into(),
    }
}

fn budget(id: i64, category_id: i64, amount: i64, month: u32, year: i32) -> Budget {
    Budget {
        id,
        category_id,
        amount: Decimal::from(amount),
        month,
        year,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn setup() -> (Vec<Transaction>, Vec<Category>) {
    let categories = vec![
        category(1, "Salary", CategoryKind::Income),
        category(5, "Food", CategoryKind::Expense),
        category(6, "Transport", CategoryKind::Expense),
        category(7, "Shopping", CategoryKind::Expense),
    ];
    let records = vec![
        txn(1, TransactionKind::Income, 1_000_000, "2025-03-01", Some(1)),
        txn(2, TransactionKind::Expense, 200_000, "2025-03-05", Some(5)),
        txn(3, TransactionKind::Expense, 100_000, "2025-03-20T18:30:00", Some(6)),
        txn(4, TransactionKind::Transfer, 400_000, "2025-03-21", None),
        txn(5, TransactionKind::Expense, 50_000, "2025-02-14", Some(5)),
        txn(6, TransactionKind::Income, 800_000, "2025-02-01", Some(1)),
    ];
    (records, categories)
}

#[test]
fn month_boundary_is_exact() {
    let records = vec![
        txn(1, TransactionKind::Expense, 10, "2025-01-31T23:59:59", Some(5)),
        txn(2, TransactionKind::Expense, 20, "2025-02-01T00:00:00", Some(5)),
    ];
    assert_eq!(
        monthly_total(&records, TransactionKind::Expense, 1, 2025),
        Decimal::from(10)
    );
    assert_eq!(
        monthly_total(&records, TransactionKind::Expense, 2, 2025),
        Decimal::from(20)
    );
}

#[test]
fn transfers_never_count_as_income_or_expense() {
    let (records, _) = setup();
    assert_eq!(
        monthly_total(&records, TransactionKind::Income, 3, 2025),
        Decimal::from(1_000_000)
    );
    assert_eq!(
        monthly_total(&records, TransactionKind::Expense, 3, 2025),
        Decimal::from(300_000)
    );
    assert_eq!(
        monthly_total(&records, TransactionKind::Transfer, 3, 2025),
        Decimal::ZERO
    );
}

#[test]
fn unreadable_dates_are_left_out() {
    let mut records = setup().0;
    records.push(txn(9, TransactionKind::Expense, 999, "31/03/2025", Some(5)));
    assert_eq!(
        monthly_total(&records, TransactionKind::Expense, 3, 2025),
        Decimal::from(300_000)
    );
}

#[test]
fn savings_rate_for_the_reference_month() {
    let (records, categories) = setup();
    let agg = MonthlyAggregates::compute(&records, &categories, &[], 3, 2025);
    assert_eq!(agg.income, Decimal::from(1_000_000));
    assert_eq!(agg.expense, Decimal::from(300_000));
    assert_eq!(agg.net(), Decimal::from(700_000));
    assert_eq!(agg.savings_rate(), Decimal::from(70));
    assert_eq!(savings_rate(Decimal::ZERO, Decimal::from(5)), Decimal::ZERO);
}

#[test]
fn breakdown_only_lists_spending_categories() {
    let (records, categories) = setup();
    let breakdown = category_breakdown(&records, &categories, 3, 2025);
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[&5].total, Decimal::from(200_000));
    assert_eq!(breakdown[&6].total, Decimal::from(100_000));
    assert!(!breakdown.contains_key(&7));
    assert!(!breakdown.contains_key(&1));

    let (id, top) = top_category(&breakdown).unwrap();
    assert_eq!((id, top.name.as_str()), (5, "Food"));
}

#[test]
fn top_category_tie_goes_to_lowest_id() {
    let categories = vec![
        category(6, "Transport", CategoryKind::Expense),
        category(5, "Food", CategoryKind::Expense),
    ];
    let records = vec![
        txn(1, TransactionKind::Expense, 100, "2025-03-02", Some(6)),
        txn(2, TransactionKind::Expense, 100, "2025-03-03", Some(5)),
    ];
    let breakdown = category_breakdown(&records, &categories, 3, 2025);
    assert_eq!(top_category(&breakdown).unwrap().0, 5);
}

#[test]
fn percent_change_cases() {
    let up = percent_change(Decimal::from(150), Decimal::from(100));
    assert_eq!((up.percentage, up.trend), (Decimal::from(50), Trend::Positive));
    assert_eq!(up.amount, Decimal::from(50));

    let down = percent_change(Decimal::from(50), Decimal::from(100));
    assert_eq!((down.percentage, down.trend), (Decimal::from(50), Trend::Negative));

    let flat = percent_change(Decimal::from(100), Decimal::from(100));
    assert_eq!((flat.percentage, flat.trend), (Decimal::ZERO, Trend::Neutral));

    let from_zero = percent_change(Decimal::from(100), Decimal::ZERO);
    assert_eq!(
        (from_zero.percentage, from_zero.trend),
        (Decimal::ONE_HUNDRED, Trend::Positive)
    );

    let both_zero = percent_change(Decimal::ZERO, Decimal::ZERO);
    assert_eq!(
        (both_zero.percentage, both_zero.trend),
        (Decimal::ZERO, Trend::Neutral)
    );
}

#[test]
fn budget_status_thresholds() {
    assert_eq!(BudgetStatus::classify(Decimal::from(90)), BudgetStatus::Safe);
    assert_eq!(BudgetStatus::classify(Decimal::new(9001, 2)), BudgetStatus::NearLimit);
    assert_eq!(BudgetStatus::classify(Decimal::from(100)), BudgetStatus::NearLimit);
    assert_eq!(BudgetStatus::classify(Decimal::new(10001, 2)), BudgetStatus::OverLimit);
}

#[test]
fn budget_utilization_per_month() {
    let records = vec![
        txn(1, TransactionKind::Expense, 450_000, "2025-03-10", Some(5)),
        txn(2, TransactionKind::Expense, 120_000, "2025-03-11", Some(6)),
        txn(3, TransactionKind::Expense, 999_999, "2025-04-01", Some(5)),
    ];
    let budgets = vec![
        budget(1, 5, 500_000, 3, 2025),
        budget(2, 6, 100_000, 3, 2025),
        budget(3, 7, 0, 3, 2025),
        budget(4, 5, 10, 4, 2024),
    ];
    let usage = budget_utilization(&records, &budgets, 3, 2025);
    assert_eq!(usage.len(), 3);

    assert_eq!(usage[0].spent, Decimal::from(450_000));
    assert_eq!(usage[0].percentage, Decimal::from(90));
    assert_eq!(usage[0].status, BudgetStatus::Safe);

    assert_eq!(usage[1].percentage, Decimal::from(120));
    assert_eq!(usage[1].status, BudgetStatus::OverLimit);

    assert_eq!(usage[2].percentage, Decimal::ONE_HUNDRED);
    assert_eq!(usage[2].status, BudgetStatus::OverLimit);
}

#[test]
fn budget_overview_status() {
    let none = budget_overview(&[]);
    assert_eq!(none.remaining_percentage, Decimal::ONE_HUNDRED);
    assert_eq!(none.status, BudgetStatus::Safe);

    let records = vec![txn(1, TransactionKind::Expense, 85, "2025-03-10", Some(5))];
    let low = budget_overview(&budget_utilization(
        &records,
        &[budget(1, 5, 100, 3, 2025)],
        3,
        2025,
    ));
    assert_eq!(low.remaining, Decimal::from(15));
    assert_eq!(low.status, BudgetStatus::NearLimit);

    let records = vec![txn(1, TransactionKind::Expense, 101, "2025-03-10", Some(5))];
    let over = budget_overview(&budget_utilization(
        &records,
        &[budget(1, 5, 100, 3, 2025)],
        3,
        2025,
    ));
    assert_eq!(over.status, BudgetStatus::OverLimit);
}

#[test]
fn cashflow_series_wraps_years_oldest_first() {
    let records = vec![
        txn(1, TransactionKind::Income, 500, "2024-12-05", Some(1)),
        txn(2, TransactionKind::Expense, 200, "2025-01-05", Some(5)),
    ];
    let series = cashflow_series(&records, 2, 2025, 6);
    let months: Vec<(i32, u32)> = series.iter().map(|c| (c.year, c.month)).collect();
    assert_eq!(
        months,
        vec![(2024, 9), (2024, 10), (2024, 11), (2024, 12), (2025, 1), (2025, 2)]
    );
    assert_eq!(series[3].net, Decimal::from(500));
    assert_eq!(series[4].net, Decimal::from(-200));
}

#[test]
fn aggregates_are_idempotent_and_see_previous_month() {
    let (records, categories) = setup();
    let budgets = vec![budget(1, 5, 250_000, 3, 2025)];
    let first = MonthlyAggregates::compute(&records, &categories, &budgets, 3, 2025);
    let second = MonthlyAggregates::compute(&records, &categories, &budgets, 3, 2025);
    assert_eq!(first, second);
    assert_eq!(first.previous_income, Decimal::from(800_000));
    assert_eq!(first.previous_expense, Decimal::from(50_000));
    assert_eq!(first.income_change().percentage, Decimal::from(25));
    assert_eq!(first.expense_change().trend, Trend::Positive);
    assert_eq!(first.budgets[0].percentage, Decimal::from(80));
}

#[test]
fn tiny_denominators_saturate_instead_of_overflowing() {
    let records = vec![txn(1, TransactionKind::Expense, 1_000_000, "2025-03-10", Some(5))];
    let mut tiny = budget(1, 5, 0, 3, 2025);
    tiny.amount = Decimal::new(1, 28);
    let usage = budget_utilization(&records, &[tiny], 3, 2025);
    assert_eq!(usage[0].percentage, Decimal::MAX);
    assert_eq!(usage[0].status, BudgetStatus::OverLimit);
    assert_eq!(budget_overview(&usage).status, BudgetStatus::OverLimit);

    let change = percent_change(Decimal::from(1_000_000), Decimal::new(1, 28));
    assert_eq!(change.percentage, Decimal::MAX);
    assert_eq!(change.trend, Trend::Positive);

    let rate = savings_rate(Decimal::new(1, 28), Decimal::from(1_000_000));
    assert_eq!(rate, Decimal::MIN);
}
