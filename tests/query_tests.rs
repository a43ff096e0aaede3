// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use fintrack::models::{Transaction, TransactionKind};
use fintrack::query::{DateSpan, FilterSpec, RelativePeriod, filter_transactions, recent};
use rust_decimal::Decimal;

fn txn(id: i64, kind: TransactionKind, date: &str, category: Option<i64>, wallet: i64) -> Transaction {
    Transaction {
        id,
        kind,
        amount: Decimal::from(1_000),
        date: date.to_string(),
        category_id: category,
        wallet_id: wallet,
        to_wallet_id: None,
        description: format!("t{}", id),
        notes: String::new(),
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn span(start: &str, end: &str) -> DateSpan {
    DateSpan {
        start: NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
        end: NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
    }
}

fn ids(list: &[Transaction]) -> Vec<i64> {
    list.iter().map(|t| t.id).collect()
}

fn setup() -> Vec<Transaction> {
    vec![
        txn(1, TransactionKind::Expense, "2025-01-10", Some(5), 1),
        txn(2, TransactionKind::Income, "2025-01-31T23:59:59", Some(1), 2),
        txn(3, TransactionKind::Expense, "2025-02-01", Some(6), 1),
        txn(4, TransactionKind::Expense, "garbage", Some(5), 1),
        txn(5, TransactionKind::Expense, "2025-01-10", Some(5), 2),
    ]
}

#[test]
fn no_filters_returns_everything_newest_first() {
    let out = filter_transactions(&setup(), &FilterSpec::default(), at("2025-03-01 00:00:00"));
    // Equal dates keep their input order; unreadable dates go last.
    assert_eq!(ids(&out), vec![3, 2, 1, 5, 4]);
}

#[test]
fn range_is_inclusive_through_end_of_day() {
    let spec = FilterSpec {
        range: Some(span("2025-01-01", "2025-01-31")),
        ..FilterSpec::default()
    };
    let out = filter_transactions(&setup(), &spec, at("2025-03-01 00:00:00"));
    assert_eq!(ids(&out), vec![2, 1, 5]);
}

#[test]
fn fields_combine_with_and() {
    let spec = FilterSpec {
        kind: Some(TransactionKind::Expense),
        category_id: Some(5),
        wallet_id: Some(1),
        ..FilterSpec::default()
    };
    let out = filter_transactions(&setup(), &spec, at("2025-03-01 00:00:00"));
    assert_eq!(ids(&out), vec![1, 4]);
}

#[test]
fn range_overrides_relative_period() {
    let spec = FilterSpec {
        period: Some(RelativePeriod::Today),
        range: Some(span("2025-02-01", "2025-02-28")),
        ..FilterSpec::default()
    };
    let out = filter_transactions(&setup(), &spec, at("2025-06-01 12:00:00"));
    assert_eq!(ids(&out), vec![3]);
}

#[test]
fn relative_periods_resolve_against_now() {
    let records = vec![
        txn(1, TransactionKind::Expense, "2025-03-10T08:00:00", None, 1),
        txn(2, TransactionKind::Expense, "2025-03-09", None, 1),
        txn(3, TransactionKind::Expense, "2025-03-02", None, 1),
        txn(4, TransactionKind::Expense, "2025-02-11", None, 1),
        txn(5, TransactionKind::Expense, "2024-06-01", None, 1),
        txn(6, TransactionKind::Expense, "2025-03-11", None, 1),
    ];
    let now = at("2025-03-10 12:00:00");
    let run = |period| {
        let spec = FilterSpec {
            period: Some(period),
            ..FilterSpec::default()
        };
        ids(&filter_transactions(&records, &spec, now))
    };
    assert_eq!(run(RelativePeriod::Today), vec![1]);
    assert_eq!(run(RelativePeriod::Week), vec![1, 2]);
    assert_eq!(run(RelativePeriod::Month), vec![1, 2, 3, 4]);
    assert_eq!(run(RelativePeriod::Year), vec![1, 2, 3, 4, 5]);
    assert_eq!(run(RelativePeriod::All), vec![6, 1, 2, 3, 4, 5]);
}

#[test]
fn parses_period_names() {
    assert_eq!("Week".parse::<RelativePeriod>(), Ok(RelativePeriod::Week));
    assert!("fortnight".parse::<RelativePeriod>().is_err());
}

#[test]
fn recent_truncates_after_sorting() {
    let out = recent(&setup(), 2);
    assert_eq!(ids(&out), vec![3, 2]);
}
