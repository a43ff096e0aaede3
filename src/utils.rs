// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::models::{CategoryKind, Settings};
use crate::records::RecordStore;
use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the fmt subscriber once; `RUST_LOG` overrides the default level.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("fintrack=info"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parses `YYYY-MM` into (month, year).
pub fn parse_month(s: &str) -> Result<(u32, i32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok((d.month(), d.year()))
}

/// The `--month` argument if given, else the current month.
pub fn month_or_current(arg: Option<&String>) -> Result<(u32, i32)> {
    match arg {
        Some(s) => parse_month(s),
        None => {
            let today = now();
            Ok((today.month(), today.year()))
        }
    }
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .replace('_', "")
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Resolves a wallet given by id or by name.
pub fn id_for_wallet<S: KeyValueStore>(store: &RecordStore<S>, arg: &str) -> Result<i64> {
    if let Ok(id) = arg.trim().parse::<i64>() {
        if store.wallet(id).is_ok() {
            return Ok(id);
        }
    }
    store
        .wallet_by_name(arg)
        .map(|w| w.id)
        .ok_or_else(|| anyhow!("Wallet '{}' not found", arg.trim()))
}

/// Resolves a category given by id or by name; `kind` narrows repeated names.
pub fn id_for_category<S: KeyValueStore>(
    store: &RecordStore<S>,
    arg: &str,
    kind: Option<CategoryKind>,
) -> Result<i64> {
    if let Ok(id) = arg.trim().parse::<i64>() {
        if store.category(id).is_ok() {
            return Ok(id);
        }
    }
    store
        .category_by_name(arg, kind)
        .map(|c| c.id)
        .ok_or_else(|| anyhow!("Category '{}' not found", arg.trim()))
}

/// `--date` if given, else today.
pub fn date_or_today(arg: Option<&String>) -> Result<NaiveDate> {
    match arg {
        Some(s) => parse_date(s),
        None => Ok(now().date()),
    }
}

pub fn fmt_money(d: &Decimal, settings: &Settings) -> String {
    let dp = settings.decimal_places as usize;
    format!("{} {:.*}", settings.currency, dp, d)
}

/// Like [`fmt_money`], but masked when the user hides balances.
pub fn fmt_balance(d: &Decimal, settings: &Settings) -> String {
    if settings.hide_balance {
        format!("{} ••••••", settings.currency)
    } else {
        fmt_money(d, settings)
    }
}

pub fn fmt_percent(d: &Decimal) -> String {
    format!("{:.1}%", d)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
