// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure reconciliation over a snapshot of bill records: balances, filtered
//! projections, period aggregates and the running ledger. No I/O and no
//! state between calls.

pub mod aggregates;
pub mod balance;
pub mod diagnostics;
pub mod filters;
pub mod ledger;
pub mod snapshot;

pub use aggregates::{
    compute_category_totals, compute_monthly_trend, compute_pending_by_user, count_by_status,
    find_duplicates, CategoryTotal, DuplicateGroup, MonthlyTotal, PendingCount, StatusCounts,
};
pub use balance::{compute_balance, compute_period_balance};
pub use diagnostics::{diagnose, Diagnostics};
pub use filters::{
    apply_filters, recent_activity, DateRange, Filtered, Filters, Matcher, StatusFilter,
};
pub use ledger::{build_ledger, ledger_view, LedgerEntry};
pub use snapshot::{aggregate_window, compute_snapshot, LedgerSnapshot};
