// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::BillRecord;
use crate::reconciler::filters::{apply_filters, Filters};

fn accumulate<'a>(records: impl IntoIterator<Item = &'a BillRecord>) -> Decimal {
    records
        .into_iter()
        .filter(|r| r.is_approved())
        .fold(Decimal::ZERO, |acc, r| acc + r.signed_amount())
}

/// Credits minus debits over approved records. Starts from zero; an opening
/// balance, if any, is the caller's to add.
///
/// With `as_of`, only records whose effective date falls on or before the
/// cutoff count. Records without any parseable date are still counted.
pub fn compute_balance(records: &[BillRecord], as_of: Option<NaiveDate>) -> Decimal {
    let Some(cutoff) = as_of else {
        return accumulate(records);
    };
    let mut undated = 0usize;
    let total = accumulate(records.iter().filter(|r| match r.effective_date() {
        Some(d) => d <= cutoff,
        None => {
            undated += 1;
            true
        }
    }));
    if undated > 0 {
        debug!(undated, %cutoff, "balance cutoff kept undated records");
    }
    total
}

/// Balance of the approved records that pass `filters`.
pub fn compute_period_balance(records: &[BillRecord], filters: &Filters) -> Decimal {
    accumulate(&apply_filters(records, filters).records)
}
