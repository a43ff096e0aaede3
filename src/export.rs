// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Downstream renderings of a compiled report.

use crate::report::ReportDocument;
use anyhow::Result;
use chrono::Local;
use std::io::Write;

/// Writes the report as a delimited sheet: title, summary, then one row per
/// transaction.
pub fn write_report_csv<W: Write>(doc: &ReportDocument, out: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(out);
    wtr.write_record(["FINANCIAL REPORT", doc.title.as_str()])?;
    wtr.write_record([
        "Exported on".to_string(),
        Local::now().format("%Y-%m-%d").to_string(),
    ])?;
    wtr.write_record([""])?;

    wtr.write_record(["SUMMARY"])?;
    wtr.write_record(["Total Income", "Total Expense", "Net Balance"])?;
    wtr.write_record([
        doc.totals.income.to_string(),
        doc.totals.expense.to_string(),
        doc.totals.net.to_string(),
    ])?;
    wtr.write_record([""])?;

    wtr.write_record(["TRANSACTIONS"])?;
    wtr.write_record(["Date", "Description", "Category", "Type", "Wallet", "Amount"])?;
    for line in &doc.lines {
        wtr.write_record([
            line.date.clone(),
            line.description.clone(),
            line.category.clone(),
            line.kind.to_string(),
            line.wallet.clone(),
            line.amount.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn report_json(doc: &ReportDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// File name for an exported report, e.g. `Monthly_Report_-_January_2025.csv`.
pub fn report_file_name(doc: &ReportDocument, ext: &str) -> String {
    let stem: String = doc
        .title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{}.{}", stem, ext)
}
