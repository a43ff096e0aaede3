// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use fintrack::{RecordStore, SqliteStore, cli, commands, db, utils};

fn open_records(path: Option<&Path>) -> Result<RecordStore<SqliteStore>> {
    let store = db::open_or_init(path)?;
    Ok(RecordStore::open(store)?)
}

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_override = matches.get_one::<String>("db").map(PathBuf::from);
    let mut records = open_records(db_override.as_deref())?;

    match matches.subcommand() {
        Some(("init", _)) => {
            let path = match &db_override {
                Some(p) => p.clone(),
                None => db::db_path()?,
            };
            println!("Data file ready at {}", path.display());
        }
        Some(("wallet", sub)) => commands::wallets::handle(&mut records, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut records, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut records, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut records, sub)?,
        Some(("dashboard", sub)) if sub.get_flag("watch") => {
            commands::reports::watch_dashboard(|| open_records(db_override.as_deref()), sub)?
        }
        Some(("dashboard", sub)) => commands::reports::dashboard(&records, sub)?,
        Some(("insights", sub)) => commands::reports::insights(&records, sub)?,
        Some(("report", sub)) => commands::reports::report(&records, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&records, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut records, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&mut records, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&records)?,
        Some(("reset", sub)) => {
            if !sub.get_flag("yes") {
                bail!("This deletes every record; pass --yes to confirm");
            }
            records.clear_all_data()?;
            println!("All data cleared and defaults restored");
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
