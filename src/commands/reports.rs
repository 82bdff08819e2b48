// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::filters_from_matches;
use crate::config::Settings;
use crate::models::BillRecord;
use crate::reconciler::{
    aggregate_window, compute_balance, compute_category_totals, compute_monthly_trend,
    compute_pending_by_user, compute_period_balance, compute_snapshot,
};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

pub fn handle(records: &[BillRecord], settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("period", sub)) => period(records, settings, sub)?,
        Some(("trend", sub)) => trend(records, sub)?,
        Some(("categories", sub)) => categories(records, sub)?,
        Some(("pending", sub)) => pending(records, sub)?,
        Some(("snapshot", sub)) => snapshot(records, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PeriodRow {
    lifetime_balance: String,
    period_balance: String,
}

fn period(records: &[BillRecord], settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let filters = filters_from_matches(sub)?;
    let lifetime = compute_balance(records, None);
    let in_period = compute_period_balance(records, &filters);
    let row = PeriodRow {
        lifetime_balance: format!("{:.2}", lifetime),
        period_balance: format!("{:.2}", in_period),
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &row)? {
        println!(
            "{}",
            pretty_table(
                &["Lifetime", "Selected period"],
                vec![vec![
                    fmt_money(&lifetime, &settings.currency),
                    fmt_money(&in_period, &settings.currency),
                ]],
            )
        );
    }
    Ok(())
}

/// Records the aggregate reports run over; `--status` does not narrow them,
/// so the tables agree with `report snapshot` for the same flags.
pub fn window(records: &[BillRecord], sub: &clap::ArgMatches) -> Result<Vec<BillRecord>> {
    let filters = filters_from_matches(sub)?;
    Ok(aggregate_window(records, &filters))
}

fn trend(records: &[BillRecord], sub: &clap::ArgMatches) -> Result<()> {
    let data = compute_monthly_trend(&window(records, sub)?);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|m| vec![m.label.clone(), format!("{:.2}", m.total)])
            .collect();
        println!("{}", pretty_table(&["Month", "Spent"], rows));
    }
    Ok(())
}

fn categories(records: &[BillRecord], sub: &clap::ArgMatches) -> Result<()> {
    let data = compute_category_totals(&window(records, sub)?);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|c| vec![c.category.clone(), format!("{:.2}", c.total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Approved"], rows));
    }
    Ok(())
}

fn pending(records: &[BillRecord], sub: &clap::ArgMatches) -> Result<()> {
    let data = compute_pending_by_user(&window(records, sub)?);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|p| vec![p.submitter.clone(), p.count.to_string()])
            .collect();
        println!("{}", pretty_table(&["Submitter", "Pending"], rows));
    }
    Ok(())
}

fn snapshot(records: &[BillRecord], sub: &clap::ArgMatches) -> Result<()> {
    let filters = filters_from_matches(sub)?;
    let snap = compute_snapshot(records, &filters);
    println!("{}", serde_json::to_string_pretty(&snap)?);
    Ok(())
}
