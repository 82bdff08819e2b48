// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::filters_from_matches;
use crate::models::BillRecord;
use crate::reconciler::{apply_filters, count_by_status, find_duplicates, recent_activity};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;
use tracing::warn;

pub fn handle(records: &[BillRecord], m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(records, sub)?,
        Some(("counts", sub)) => counts(records, sub)?,
        Some(("duplicates", sub)) => duplicates(records, sub)?,
        Some(("recent", sub)) => recent(records, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BillRow {
    pub id: String,
    pub date: String,
    pub submitter: String,
    pub category: String,
    pub kind: String,
    pub flow: String,
    pub amount: String,
    pub status: String,
    pub description: String,
}

impl From<&BillRecord> for BillRow {
    fn from(r: &BillRecord) -> Self {
        BillRow {
            id: r.id.clone(),
            date: r
                .effective_date()
                .map(|d| d.to_string())
                .unwrap_or_else(|| r.entry_date.clone()),
            submitter: r.submitter_bucket().to_string(),
            category: r.category_bucket().to_string(),
            kind: r.kind.to_string(),
            flow: r.flow.to_string(),
            amount: format!("{:.2}", r.amount),
            status: r.status.to_string(),
            description: r.description.clone(),
        }
    }
}

fn print_rows(json_flag: bool, jsonl_flag: bool, data: &[BillRow]) -> Result<()> {
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.submitter.clone(),
                    r.category.clone(),
                    r.kind.clone(),
                    r.flow.clone(),
                    r.amount.clone(),
                    r.status.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Date",
                    "Submitter",
                    "Category",
                    "Kind",
                    "Flow",
                    "Amount",
                    "Status",
                    "Description"
                ],
                rows,
            )
        );
    }
    Ok(())
}

/// Filtered bills in input order, cut to `--limit` when given.
pub fn query_rows(records: &[BillRecord], sub: &clap::ArgMatches) -> Result<Vec<BillRow>> {
    let filters = filters_from_matches(sub)?;
    let filtered = apply_filters(records, &filters);
    if !filtered.diagnostics.is_clean() {
        warn!(
            undated = filtered.diagnostics.undated,
            returned_without_remarks = filtered.diagnostics.returned_without_remarks,
            "some listed bills have incomplete data"
        );
    }
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);
    Ok(filtered.records.iter().take(limit).map(BillRow::from).collect())
}

fn list(records: &[BillRecord], sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(records, sub)?;
    print_rows(sub.get_flag("json"), sub.get_flag("jsonl"), &data)
}

fn counts(records: &[BillRecord], sub: &clap::ArgMatches) -> Result<()> {
    let c = count_by_status(records);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &c)? {
        let rows = vec![
            vec!["Pending".to_string(), c.pending.to_string()],
            vec!["Approved".to_string(), c.approved.to_string()],
            vec!["Rejected".to_string(), c.rejected.to_string()],
            vec!["Returned".to_string(), c.returned.to_string()],
            vec!["Drafts".to_string(), c.drafts.to_string()],
            vec!["Total".to_string(), c.total.to_string()],
        ];
        println!("{}", pretty_table(&["Status", "Bills"], rows));
    }
    Ok(())
}

fn duplicates(records: &[BillRecord], sub: &clap::ArgMatches) -> Result<()> {
    let groups = find_duplicates(records);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &groups)? {
        let rows: Vec<Vec<String>> = groups
            .iter()
            .map(|g| {
                vec![
                    g.bill_date.clone(),
                    g.submitter.clone(),
                    format!("{:.2}", g.amount),
                    g.description.clone(),
                    g.ids.join(", "),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Bill date", "Submitter", "Amount", "Description", "Ids"], rows)
        );
    }
    Ok(())
}

fn recent(records: &[BillRecord], sub: &clap::ArgMatches) -> Result<()> {
    let limit = *sub.get_one::<usize>("limit").unwrap_or(&3);
    let data: Vec<BillRow> = recent_activity(records, limit)
        .iter()
        .map(BillRow::from)
        .collect();
    print_rows(sub.get_flag("json"), sub.get_flag("jsonl"), &data)
}
