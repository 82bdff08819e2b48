// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::ledger::query_entries;
use crate::config::Settings;
use crate::models::BillRecord;
use crate::reconciler::LedgerEntry;
use anyhow::{bail, Context, Result};
use serde_json::json;
use std::io::Write;
use tracing::info;

pub fn handle(records: &[BillRecord], settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("ledger", sub)) => export_ledger(records, settings, sub),
        _ => Ok(()),
    }
}

fn amount_cell(v: Option<rust_decimal::Decimal>) -> String {
    v.map(|d| d.to_string()).unwrap_or_default()
}

pub fn write_csv<W: Write>(w: W, entries: &[LedgerEntry], currency: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record([
        "Entry Date".to_string(),
        "Date of Settlement".to_string(),
        "Bill Date".to_string(),
        "Description".to_string(),
        format!("Credit ({})", currency),
        format!("Debit ({})", currency),
        "Balance".to_string(),
        "Remarks".to_string(),
        "Bill Softcopy".to_string(),
    ])?;
    for e in entries {
        wtr.write_record([
            e.entry_date.clone(),
            e.settlement_date.clone().unwrap_or_default(),
            e.bill_date.clone().unwrap_or_default(),
            e.description.clone(),
            amount_cell(e.credit),
            amount_cell(e.debit),
            e.balance.to_string(),
            e.remarks.clone().unwrap_or_default(),
            e.attachment_ref.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_json(entries: &[LedgerEntry]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = entries
        .iter()
        .map(|e| {
            json!({
                "entryDate": e.entry_date,
                "dateOfSettlement": e.settlement_date,
                "billDate": e.bill_date,
                "description": e.description,
                "credit": e.credit.map(|d| d.to_string()),
                "debit": e.debit.map(|d| d.to_string()),
                "balance": e.balance.to_string(),
                "remarks": e.remarks,
                "billSoftcopy": e.attachment_ref,
            })
        })
        .collect();
    serde_json::Value::Array(items)
}

fn export_ledger(records: &[BillRecord], settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let entries = query_entries(records, settings, sub)?;
    match fmt.as_str() {
        "csv" => {
            let file = std::fs::File::create(out)
                .with_context(|| format!("Create export file {}", out))?;
            write_csv(file, &entries, &settings.currency)?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&to_json(&entries))?)
                .with_context(|| format!("Write export file {}", out))?;
        }
    }
    info!(rows = entries.len(), out, "exported ledger");
    println!("Exported {} ledger rows to {}", entries.len(), out);
    Ok(())
}
