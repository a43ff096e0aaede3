// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::reports::report_request;
use crate::db::KeyValueStore;
use crate::export::{report_file_name, report_json, write_report_csv};
use crate::records::RecordStore;
use crate::report::compile_report;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

pub fn handle<S: KeyValueStore>(store: &RecordStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("report", sub)) => export_report(store, sub),
        Some(("backup", sub)) => export_backup(store, sub),
        _ => Ok(()),
    }
}

fn export_report<S: KeyValueStore>(store: &RecordStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let request = report_request(store, sub)?;
    let doc = compile_report(
        store.transactions(),
        store.categories(),
        store.wallets(),
        &request,
    );
    let out = match sub.get_one::<String>("out") {
        Some(p) => PathBuf::from(p.trim()),
        None => PathBuf::from(report_file_name(&doc, &fmt)),
    };

    match fmt.as_str() {
        "csv" => {
            let file =
                File::create(&out).with_context(|| format!("Create {}", out.display()))?;
            write_report_csv(&doc, BufWriter::new(file))?;
        }
        "json" => {
            std::fs::write(&out, report_json(&doc)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported '{}' to {}", doc.title, out.display());
    Ok(())
}

fn export_backup<S: KeyValueStore>(store: &RecordStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap().trim();
    let json = store.export_data()?;
    std::fs::write(out, json).with_context(|| format!("Write {}", out))?;
    println!("Backup written to {}", out);
    Ok(())
}
