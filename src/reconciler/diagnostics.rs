// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::Serialize;
use tracing::warn;

use crate::models::{BillKind, BillRecord, BillStatus};

/// Counts of records that were kept or bucketed through a fallback rather
/// than rejected. Never an error; meant for logs and `doctor`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// No settlement, bill or entry date could be parsed.
    pub undated: usize,
    pub returned_without_remarks: usize,
    /// Empty category, reported under "Other".
    pub uncategorized: usize,
    /// Empty submitter, reported under "Unknown".
    pub unnamed_submitter: usize,
    /// Settlement date present on a non-approved record, or missing on an approved one.
    pub settlement_mismatch: usize,
    /// Approved direct payments whose approver is also their creator.
    pub self_approved: usize,
}

impl Diagnostics {
    pub fn total(&self) -> usize {
        self.undated
            + self.returned_without_remarks
            + self.uncategorized
            + self.unnamed_submitter
            + self.settlement_mismatch
            + self.self_approved
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// `(issue, count)` pairs for the non-zero counters.
    pub fn issues(&self) -> Vec<(&'static str, usize)> {
        [
            ("undated", self.undated),
            ("returned_without_remarks", self.returned_without_remarks),
            ("uncategorized", self.uncategorized),
            ("unnamed_submitter", self.unnamed_submitter),
            ("settlement_mismatch", self.settlement_mismatch),
            ("self_approved_direct_payment", self.self_approved),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect()
    }
}

fn is_self_approved(record: &BillRecord) -> bool {
    if record.kind != BillKind::DirectPayment || !record.is_approved() {
        return false;
    }
    match (record.approver_id.as_deref(), record.created_by_admin_id.as_deref()) {
        (Some(a), Some(c)) => !a.is_empty() && a == c,
        _ => false,
    }
}

/// Inspect every record for data-quality problems.
pub fn diagnose(records: &[BillRecord]) -> Diagnostics {
    let mut d = Diagnostics::default();
    for r in records {
        if r.effective_date().is_none() {
            d.undated += 1;
        }
        if (r.status == BillStatus::Returned || r.is_returned_draft()) && !r.has_remarks() {
            d.returned_without_remarks += 1;
        }
        if r.category.trim().is_empty() {
            d.uncategorized += 1;
        }
        if r.submitter_name.trim().is_empty() {
            d.unnamed_submitter += 1;
        }
        let settled = r
            .settlement_date
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        if settled != r.is_approved() {
            d.settlement_mismatch += 1;
        }
        if is_self_approved(r) {
            d.self_approved += 1;
        }
    }
    if d.self_approved > 0 {
        warn!(count = d.self_approved, "approved direct payments were approved by their creator");
    }
    d
}
