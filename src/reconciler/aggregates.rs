// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::models::{BillRecord, BillStatus, Flow};
use crate::utils::{month_start, parse_loose_date};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    /// First day of the month; the sort key.
    pub month: NaiveDate,
    pub label: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCount {
    pub submitter: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub returned: usize,
    pub drafts: usize,
    /// Every non-draft record.
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub bill_date: String,
    pub amount: Decimal,
    pub submitter: String,
    pub description: String,
    pub ids: Vec<String>,
}

/// Approved debits summed per calendar month, oldest month first.
/// Records without a usable date cannot be placed in a month and are skipped.
pub fn compute_monthly_trend(records: &[BillRecord]) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    let mut undated = 0usize;
    for r in records
        .iter()
        .filter(|r| r.is_approved() && r.flow == Flow::Debit)
    {
        match r.effective_date() {
            Some(d) => *months.entry(month_start(d)).or_insert(Decimal::ZERO) += r.amount,
            None => undated += 1,
        }
    }
    if undated > 0 {
        debug!(undated, "monthly trend skipped records without a usable date");
    }
    months
        .into_iter()
        .map(|(month, total)| MonthlyTotal {
            month,
            label: month.format("%b %Y").to_string(),
            total,
        })
        .collect()
}

/// Approved amounts per category, largest first, ties by name.
pub fn compute_category_totals(records: &[BillRecord]) -> Vec<CategoryTotal> {
    let mut agg: HashMap<&str, Decimal> = HashMap::new();
    for r in records.iter().filter(|r| r.is_approved()) {
        *agg.entry(r.category_bucket()).or_insert(Decimal::ZERO) += r.amount;
    }
    let mut items: Vec<CategoryTotal> = agg
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    items.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    items
}

/// Pending submissions per submitter, most first, ties by name.
pub fn compute_pending_by_user(records: &[BillRecord]) -> Vec<PendingCount> {
    let mut agg: HashMap<&str, usize> = HashMap::new();
    for r in records.iter().filter(|r| r.status == BillStatus::Pending) {
        *agg.entry(r.submitter_bucket()).or_insert(0) += 1;
    }
    let mut items: Vec<PendingCount> = agg
        .into_iter()
        .map(|(submitter, count)| PendingCount {
            submitter: submitter.to_string(),
            count,
        })
        .collect();
    items.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.submitter.cmp(&b.submitter)));
    items
}

pub fn count_by_status(records: &[BillRecord]) -> StatusCounts {
    let mut c = StatusCounts::default();
    for r in records {
        match r.status {
            BillStatus::Draft => {
                c.drafts += 1;
                continue;
            }
            BillStatus::Pending => c.pending += 1,
            BillStatus::Approved => c.approved += 1,
            BillStatus::Rejected => c.rejected += 1,
            BillStatus::Returned => c.returned += 1,
        }
        c.total += 1;
    }
    c
}

fn normalize_text(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Non-draft records that look like the same bill submitted twice: same
/// bill date, amount, submitter and description. Groups keep input order.
pub fn find_duplicates(records: &[BillRecord]) -> Vec<DuplicateGroup> {
    let mut index: HashMap<(String, Decimal, String, String), usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    for r in records.iter().filter(|r| !r.is_draft()) {
        let raw_date = r.bill_date.as_deref().unwrap_or("").trim();
        let date_key = parse_loose_date(raw_date)
            .map(|d| d.to_string())
            .unwrap_or_else(|| raw_date.to_string());
        let key = (
            date_key.clone(),
            r.amount.normalize(),
            normalize_text(&r.submitter_name),
            normalize_text(&r.description),
        );
        match index.get(&key) {
            Some(&i) => groups[i].ids.push(r.id.clone()),
            None => {
                index.insert(key, groups.len());
                groups.push(DuplicateGroup {
                    bill_date: date_key,
                    amount: r.amount,
                    submitter: r.submitter_name.trim().to_string(),
                    description: r.description.trim().to_string(),
                    ids: vec![r.id.clone()],
                });
            }
        }
    }
    groups.retain(|g| g.ids.len() > 1);
    groups
}
