// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::models::BillRecord;
use crate::reconciler::aggregates::{
    compute_category_totals, compute_monthly_trend, compute_pending_by_user, CategoryTotal,
    MonthlyTotal, PendingCount,
};
use crate::reconciler::balance::{compute_balance, compute_period_balance};
use crate::reconciler::diagnostics::{diagnose, Diagnostics};
use crate::reconciler::filters::{apply_filters, Filters, StatusFilter};

/// Every derived figure for one `(records, filters)` pair. Built fresh on
/// each call and never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub current_balance: Decimal,
    pub period_balance: Decimal,
    pub monthly_trend: Vec<MonthlyTotal>,
    pub category_totals: Vec<CategoryTotal>,
    pub pending_by_user: Vec<PendingCount>,
    pub filtered_records: Vec<BillRecord>,
    /// Data-quality counts over the whole feed.
    pub diagnostics: Diagnostics,
}

/// Records the aggregates (trend, categories, pending) run over: the filter's
/// date range, category, kind, flow and search across every non-draft
/// status. Each aggregate then picks the statuses it counts.
pub fn aggregate_window(records: &[BillRecord], filters: &Filters) -> Vec<BillRecord> {
    apply_filters(records, &filters.clone().with_status(StatusFilter::All)).records
}

/// The lifetime balance covers every record. The aggregates cover the
/// filter's window (date range, category, kind, flow, search) across all
/// non-draft statuses; `filtered_records` honours the status filter too.
pub fn compute_snapshot(records: &[BillRecord], filters: &Filters) -> LedgerSnapshot {
    let filtered = apply_filters(records, filters);
    let window = aggregate_window(records, filters);
    let diagnostics = diagnose(records);

    debug!(
        records = records.len(),
        filtered = filtered.records.len(),
        issues = diagnostics.total(),
        "computed ledger snapshot"
    );

    LedgerSnapshot {
        current_balance: compute_balance(records, None),
        period_balance: compute_period_balance(records, filters),
        monthly_trend: compute_monthly_trend(&window),
        category_totals: compute_category_totals(&window),
        pending_by_user: compute_pending_by_user(&window),
        filtered_records: filtered.records,
        diagnostics,
    }
}
