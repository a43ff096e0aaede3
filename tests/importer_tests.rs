// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::commands::{exporter, importer};
use fintrack::models::TransactionKind;
use fintrack::{MemoryStore, RecordStore, cli};
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::{NamedTempFile, tempdir};

fn setup() -> RecordStore<MemoryStore> {
    RecordStore::open(MemoryStore::new()).unwrap()
}

fn csv_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", body).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn importer_trims_cli_path_argument() {
    let mut store = setup();
    let file = csv_file(
        "date,type,amount,category,wallet,description,notes\n\
         2025-02-03, expense ,5000,Food & Drinks,Main Wallet,Coffee,\n",
    );
    let padded = format!("  {}  ", file.path().to_str().unwrap());
    let matches =
        cli::build_cli().get_matches_from(["fintrack", "import", "transactions", "--path", &padded]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(&mut store, import_m).unwrap();
    } else {
        panic!("no import subcommand");
    }
    assert_eq!(store.transactions().len(), 1);
    assert_eq!(store.wallet(1).unwrap().balance, Decimal::from(995_000));
}

#[test]
fn importer_handles_every_kind() {
    let mut store = setup();
    let file = csv_file(
        "date,type,amount,category,wallet,description,notes\n\
         2025-02-01,income,2000000,Salary,Bank Account,Pay,february\n\
         2025-02-02,transfer,300000,,Bank Account -> E-Wallet,,\n\
         2025-02-03,expense,45000,Other,e-wallet,Gift,\n",
    );
    let count = importer::import_transactions(&mut store, file.path().to_str().unwrap()).unwrap();
    assert_eq!(count, 3);

    let transfer = store
        .transactions()
        .iter()
        .find(|t| t.kind == TransactionKind::Transfer)
        .unwrap();
    assert_eq!(transfer.to_wallet_id, Some(3));
    assert_eq!(transfer.description, "Transfer from Bank Account to E-Wallet");
    assert_eq!(store.wallet(2).unwrap().balance, Decimal::from(6_700_000));
    assert_eq!(store.wallet(3).unwrap().balance, Decimal::from(755_000));
    let gift = store
        .transactions()
        .iter()
        .find(|t| t.description == "Gift")
        .unwrap();
    assert_eq!(gift.category_id, Some(12));
}

#[test]
fn importer_rejects_invalid_date() {
    let mut store = setup();
    let file = csv_file(
        "date,type,amount,category,wallet,description,notes\n\
         2025-02-01,expense,10,Bills,Main Wallet,Water,\n\
         02/03/2025,expense,10,Bills,Main Wallet,Power,\n",
    );
    let err = importer::import_transactions(&mut store, file.path().to_str().unwrap())
        .unwrap_err()
        .to_string();
    assert!(err.contains("line 3"), "{}", err);
    assert!(store.transactions().is_empty());
}

#[test]
fn importer_rolls_back_when_row_fails_validation() {
    let mut store = setup();
    let file = csv_file(
        "date,type,amount,category,wallet,description,notes\n\
         2025-02-01,expense,10,Bills,Main Wallet,Water,\n\
         2025-02-02,transfer,99999999,,Main Wallet -> E-Wallet,,\n",
    );
    let err = importer::import_transactions(&mut store, file.path().to_str().unwrap())
        .unwrap_err()
        .to_string();
    assert!(err.starts_with("line 3:"), "{}", err);
    assert!(err.contains("Insufficient balance"), "{}", err);
    assert!(store.transactions().is_empty());
    assert_eq!(store.wallet(1).unwrap().balance, Decimal::from(1_000_000));
}

#[test]
fn importer_rejects_unknown_wallet() {
    let mut store = setup();
    let file = csv_file(
        "date,type,amount,category,wallet,description,notes\n\
         2025-02-01,expense,10,Bills,Piggy Bank,Water,\n",
    );
    let err = importer::import_transactions(&mut store, file.path().to_str().unwrap())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Piggy Bank"));
}

#[test]
fn backup_export_then_import_restores_records() {
    let mut source = setup();
    let file = csv_file(
        "date,type,amount,category,wallet,description,notes\n\
         2025-02-01,expense,12500,Health,Main Wallet,Pharmacy,\n",
    );
    importer::import_transactions(&mut source, file.path().to_str().unwrap()).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("backup.json");
    let out_str = out.to_str().unwrap();
    let matches =
        cli::build_cli().get_matches_from(["fintrack", "export", "backup", "--out", out_str]);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(&source, export_m).unwrap();

    let raw = std::fs::read_to_string(&out).unwrap();
    assert!(raw.contains("\"version\": \"1.0.0\""));
    assert!(raw.contains("\"exportDate\""));

    let mut target = setup();
    let matches =
        cli::build_cli().get_matches_from(["fintrack", "import", "backup", "--path", out_str]);
    let Some(("import", import_m)) = matches.subcommand() else {
        panic!("no import subcommand");
    };
    importer::handle(&mut target, import_m).unwrap();
    assert_eq!(target.transactions(), source.transactions());
    assert_eq!(target.wallet(1).unwrap().balance, Decimal::from(987_500));
}
