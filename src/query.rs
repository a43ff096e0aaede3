// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Filtering and ordering of the transaction log.

use crate::models::{Transaction, TransactionKind};
use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativePeriod {
    Today,
    Week,
    Month,
    Year,
    All,
}

impl FromStr for RelativePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(RelativePeriod::Today),
            "week" => Ok(RelativePeriod::Week),
            "month" => Ok(RelativePeriod::Month),
            "year" => Ok(RelativePeriod::Year),
            "all" => Ok(RelativePeriod::All),
            other => Err(format!(
                "Unknown period '{}' (use today|week|month|year|all)",
                other
            )),
        }
    }
}

/// Closed interval of timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }
}

/// Calendar dates; `end` counts through its last millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn window(&self) -> Window {
        Window {
            start: self.start.and_time(NaiveTime::MIN),
            end: end_of_day(self.end),
        }
    }
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::milliseconds(1)
}

impl RelativePeriod {
    /// Resolves the period against `now`; `All` has no window.
    pub fn window(&self, now: NaiveDateTime) -> Option<Window> {
        let start = match self {
            RelativePeriod::Today => now.date().and_time(NaiveTime::MIN),
            RelativePeriod::Week => now - Duration::days(7),
            RelativePeriod::Month => now.checked_sub_months(Months::new(1))?,
            RelativePeriod::Year => now.checked_sub_months(Months::new(12))?,
            RelativePeriod::All => return None,
        };
        Some(Window { start, end: now })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub kind: Option<TransactionKind>,
    pub category_id: Option<i64>,
    pub wallet_id: Option<i64>,
    pub period: Option<RelativePeriod>,
    /// Takes precedence over `period` when both are set.
    pub range: Option<DateSpan>,
}

impl FilterSpec {
    pub fn window(&self, now: NaiveDateTime) -> Option<Window> {
        match (self.range, self.period) {
            (Some(span), _) => Some(span.window()),
            (None, Some(period)) => period.window(now),
            (None, None) => None,
        }
    }

    fn matches(&self, t: &Transaction, window: Option<&Window>) -> bool {
        if self.kind.is_some_and(|k| k != t.kind) {
            return false;
        }
        if self.category_id.is_some() && self.category_id != t.category_id {
            return false;
        }
        if self.wallet_id.is_some_and(|w| w != t.wallet_id) {
            return false;
        }
        window.is_none_or(|w| window_contains(w, t))
    }
}

/// Whether the transaction's date falls inside `window`; unreadable dates never do.
pub fn window_contains(window: &Window, t: &Transaction) -> bool {
    t.occurred_at().is_some_and(|at| window.contains(at))
}

/// Returns the matching transactions, newest first. Ties keep input order and
/// records with an unreadable date sort last.
pub fn filter_transactions(
    records: &[Transaction],
    spec: &FilterSpec,
    now: NaiveDateTime,
) -> Vec<Transaction> {
    let window = spec.window(now);
    let mut out: Vec<Transaction> = records
        .iter()
        .filter(|t| spec.matches(t, window.as_ref()))
        .cloned()
        .collect();
    sort_newest_first(&mut out);
    out
}

pub fn sort_newest_first(records: &mut [Transaction]) {
    records.sort_by_key(|t| std::cmp::Reverse(t.occurred_at()));
}

pub fn recent(records: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut out = records.to_vec();
    sort_newest_first(&mut out);
    out.truncate(limit);
    out
}
