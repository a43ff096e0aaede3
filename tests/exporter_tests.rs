// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::commands::exporter;
use fintrack::export::report_file_name;
use fintrack::models::TransactionKind;
use fintrack::records::NewTransaction;
use fintrack::report::{ReportKind, ReportRequest, compile_report};
use fintrack::{MemoryStore, RecordStore, cli};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn setup() -> RecordStore<MemoryStore> {
    let mut store = RecordStore::open(MemoryStore::new()).unwrap();
    let entries = [
        (TransactionKind::Income, 3_000_000, "2025-03-01", Some(1), "March pay"),
        (TransactionKind::Expense, 85_000, "2025-03-04", Some(5), "Groceries, weekly"),
        (TransactionKind::Expense, 40_000, "2025-02-27", Some(6), "Bus pass"),
    ];
    for (kind, amount, date, category_id, description) in entries {
        store
            .add_transaction(NewTransaction {
                kind,
                amount: Decimal::from(amount),
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                category_id,
                wallet_id: 2,
                to_wallet_id: None,
                description: description.to_string(),
                notes: String::new(),
            })
            .unwrap();
    }
    store
}

fn run_export(store: &RecordStore<MemoryStore>, args: &[&str]) {
    let mut argv = vec!["fintrack", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(store, export_m).unwrap();
}

#[test]
fn csv_report_has_sections_and_rows() {
    let store = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("march.csv");
    run_export(
        &store,
        &["report", "--kind", "monthly", "--date", "2025-03-20", "--out", out.to_str().unwrap()],
    );

    let body = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "FINANCIAL REPORT,Monthly Report - March 2025");
    assert!(lines.contains(&"SUMMARY"));
    assert!(lines.contains(&"3000000,85000,2915000"));
    assert!(lines.contains(&"TRANSACTIONS"));
    assert!(body.contains("2025-03-04,\"Groceries, weekly\",Food & Drinks,expense,Bank Account,85000"));
    assert!(!body.contains("Bus pass"));
}

#[test]
fn json_report_is_filtered_by_category() {
    let store = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("food.json");
    run_export(
        &store,
        &[
            "report", "--format", "json", "--date", "2025-03-02", "--category", "Food & Drinks",
            "--out", out.to_str().unwrap(),
        ],
    );

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(doc["title"], "Monthly Report - March 2025");
    assert_eq!(doc["transaction_count"], 1);
    assert_eq!(doc["lines"][0]["description"], "Groceries, weekly");
}

#[test]
fn default_file_name_follows_title() {
    let store = setup();
    let doc = compile_report(
        store.transactions(),
        store.categories(),
        store.wallets(),
        &ReportRequest {
            kind: ReportKind::Weekly,
            date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
            category_id: None,
            wallet_id: None,
        },
    );
    assert_eq!(
        report_file_name(&doc, "csv"),
        "Weekly_Report_-_3_Mar_-_9_Mar_2025.csv"
    );
}

#[test]
fn backup_contains_every_collection() {
    let store = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("backup.json");
    run_export(&store, &["backup", "--out", out.to_str().unwrap()]);

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(doc["transactions"].as_array().unwrap().len(), 3);
    assert_eq!(doc["wallets"].as_array().unwrap().len(), 3);
    assert_eq!(doc["categories"].as_array().unwrap().len(), 12);
    assert_eq!(doc["version"], "1.0.0");
    assert!(doc["settings"].is_object());
}
