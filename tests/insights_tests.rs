// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use fintrack::aggregate::MonthlyAggregates;
use fintrack::insights::{MAX_DISPLAYED_INSIGHTS, candidate_insights, generate_insights};
use fintrack::models::{Budget, Category, CategoryKind, Transaction, TransactionKind};
use rust_decimal::Decimal;

fn txn(id: i64, kind: TransactionKind, amount: i64, date: &str, category: i64) -> Transaction {
    Transaction {
        id,
        kind,
        amount: Decimal::from(amount),
        date: date.to_string(),
        category_id: Some(category),
        wallet_id: 1,
        to_wallet_id: None,
        description: String::new(),
        notes: String::new(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn setup() -> Vec<Category> {
    vec![
        Category {
            id: 1,
            name: "Salary".into(),
            kind: CategoryKind::Income,
            color: String::new(),
        },
        Category {
            id: 5,
            name: "Food".into(),
            kind: CategoryKind::Expense,
            color: String::new(),
        },
        Category {
            id: 6,
            name: "Transport".into(),
            kind: CategoryKind::Expense,
            color: String::new(),
        },
        Category {
            id: 7,
            name: "Bills".into(),
            kind: CategoryKind::Expense,
            color: String::new(),
        },
    ]
}

/// Same income and spread-out spending in February and March.
fn steady_months() -> Vec<Transaction> {
    let mut records = Vec::new();
    for (offset, month) in [(0, "02"), (10, "03")] {
        records.push(txn(offset + 1, TransactionKind::Income, 1_000_000, &format!("2025-{}-01", month), 1));
        records.push(txn(offset + 2, TransactionKind::Expense, 250_000, &format!("2025-{}-03", month), 5));
        records.push(txn(offset + 3, TransactionKind::Expense, 200_000, &format!("2025-{}-04", month), 6));
        records.push(txn(offset + 4, TransactionKind::Expense, 200_000, &format!("2025-{}-05", month), 7));
    }
    records
}

fn titles(aggregates: &MonthlyAggregates) -> Vec<String> {
    generate_insights(aggregates)
        .into_iter()
        .map(|i| i.title)
        .collect()
}

#[test]
fn steady_saver_gets_praise_and_filler() {
    let agg = MonthlyAggregates::compute(&steady_months(), &setup(), &[], 3, 2025);
    assert_eq!(agg.savings_rate(), Decimal::from(35));
    assert_eq!(
        titles(&agg),
        vec!["Excellent savings", "Positive cash flow", "Financial analysis"]
    );
}

#[test]
fn empty_month_breaks_even_with_filler() {
    let agg = MonthlyAggregates::compute(&[], &setup(), &[], 3, 2025);
    let list = generate_insights(&agg);
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].title, "Break even");
    assert_eq!(list[1].title, "Financial analysis");
}

#[test]
fn deficit_with_dominant_category_and_swings_is_truncated() {
    let records = vec![
        txn(1, TransactionKind::Income, 1_000_000, "2025-02-01", 1),
        txn(2, TransactionKind::Expense, 100_000, "2025-02-03", 5),
        txn(3, TransactionKind::Income, 500_000, "2025-03-01", 1),
        txn(4, TransactionKind::Expense, 600_000, "2025-03-03", 5),
    ];
    let budgets = vec![Budget {
        id: 1,
        category_id: 5,
        amount: Decimal::from(300_000),
        month: 3,
        year: 2025,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }];
    let agg = MonthlyAggregates::compute(&records, &setup(), &budgets, 3, 2025);

    let all: Vec<String> = candidate_insights(&agg)
        .into_iter()
        .map(|i| i.title)
        .collect();
    assert_eq!(
        all,
        vec![
            "Deficit warning",
            "Focus on Food",
            "Spending is up",
            "Income is down",
            "Budget exceeded",
        ]
    );
    assert_eq!(titles(&agg).len(), MAX_DISPLAYED_INSIGHTS);
    assert_eq!(titles(&agg), all[..MAX_DISPLAYED_INSIGHTS].to_vec());
}

#[test]
fn budgets_near_limit_are_called_out() {
    let mut records = steady_months();
    records.push(txn(99, TransactionKind::Expense, 0, "2025-03-09", 5));
    let budgets = vec![Budget {
        id: 1,
        category_id: 5,
        amount: Decimal::from(270_000),
        month: 3,
        year: 2025,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }];
    let agg = MonthlyAggregates::compute(&records, &setup(), &budgets, 3, 2025);
    let list = generate_insights(&agg);
    assert!(list.iter().any(|i| i.title == "Budget almost used up"));
    assert!(list.iter().all(|i| i.title != "Financial analysis"));
}

fn budget(id: i64, category_id: i64, amount: i64, month: u32) -> Budget {
    Budget {
        id,
        category_id,
        amount: Decimal::from(amount),
        month,
        year: 2025,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

#[test]
fn budgets_for_other_months_are_ignored() {
    let budgets = vec![budget(1, 5, 100, 2), budget(2, 6, 100, 4)];
    let agg = MonthlyAggregates::compute(&steady_months(), &setup(), &budgets, 3, 2025);
    assert!(agg.budgets.is_empty());
    assert_eq!(
        titles(&agg),
        vec!["Excellent savings", "Positive cash flow", "Financial analysis"]
    );
}

#[test]
fn exceeded_budget_outranks_near_limit_one() {
    // Food 250k of 200k is over; transport 200k of 210k is near.
    let budgets = vec![budget(1, 5, 200_000, 3), budget(2, 6, 210_000, 3)];
    let agg = MonthlyAggregates::compute(&steady_months(), &setup(), &budgets, 3, 2025);
    let list = generate_insights(&agg);
    let names: Vec<&str> = list.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        names,
        vec!["Excellent savings", "Budget exceeded", "Positive cash flow"]
    );
    assert!(list[1].message.starts_with("1 budget category went over"));
}
