// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::filters_from_matches;
use crate::config::Settings;
use crate::models::BillRecord;
use crate::reconciler::{ledger_view, LedgerEntry};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use tracing::debug;

/// Running ledger rows passing the filter flags on `sub`.
pub fn query_entries(
    records: &[BillRecord],
    settings: &Settings,
    sub: &clap::ArgMatches,
) -> Result<Vec<LedgerEntry>> {
    let filters = filters_from_matches(sub)?;
    let (entries, diagnostics) = ledger_view(records, &filters, settings.opening_balance);
    if !diagnostics.is_clean() {
        debug!(undated = diagnostics.undated, "ledger kept undated entries");
    }
    Ok(entries)
}

fn opt_amount(v: Option<rust_decimal::Decimal>) -> String {
    v.map(|d| format!("{:.2}", d)).unwrap_or_else(|| "-".to_string())
}

pub fn handle(records: &[BillRecord], settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let entries = query_entries(records, settings, m)?;
    if !maybe_print_json(json_flag, jsonl_flag, &entries)? {
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|e| {
                vec![
                    e.entry_date.clone(),
                    e.settlement_date.clone().unwrap_or_else(|| "-".into()),
                    e.bill_date.clone().unwrap_or_else(|| "-".into()),
                    e.description.clone(),
                    opt_amount(e.credit),
                    opt_amount(e.debit),
                    format!("{:.2}", e.balance),
                    e.remarks.clone().unwrap_or_else(|| "-".into()),
                ]
            })
            .collect();
        let credit = format!("Credit ({})", settings.currency);
        let debit = format!("Debit ({})", settings.currency);
        println!(
            "{}",
            pretty_table(
                &[
                    "Entry Date",
                    "Settled",
                    "Bill Date",
                    "Description",
                    &credit,
                    &debit,
                    "Balance",
                    "Remarks"
                ],
                rows,
            )
        );
    }
    Ok(())
}
