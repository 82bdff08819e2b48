// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{BillRecord, Flow};
use crate::reconciler::diagnostics::Diagnostics;
use crate::reconciler::filters::{Filters, Matcher};

/// One approved record as it appears in the running ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub entry_date: String,
    pub settlement_date: Option<String>,
    pub bill_date: Option<String>,
    pub description: String,
    pub category: String,
    pub credit: Option<Decimal>,
    pub debit: Option<Decimal>,
    /// Balance after this entry.
    pub balance: Decimal,
    pub remarks: Option<String>,
    pub attachment_ref: Option<String>,
}

impl LedgerEntry {
    fn from_record(r: &BillRecord, balance: Decimal) -> Self {
        let (credit, debit) = match r.flow {
            Flow::Credit => (Some(r.amount), None),
            Flow::Debit => (None, Some(r.amount)),
        };
        LedgerEntry {
            id: r.id.clone(),
            entry_date: r.entry_date.clone(),
            settlement_date: r.settlement_date.clone(),
            bill_date: r.bill_date.clone(),
            description: r.description.clone(),
            category: r.category_bucket().to_string(),
            credit,
            debit,
            balance,
            remarks: r.remarks.clone(),
            attachment_ref: r.attachment_ref.clone(),
        }
    }
}

/// Approved records in chronological order of effective date; undated
/// records go last and ties keep input order.
fn chronological(records: &[BillRecord]) -> Vec<&BillRecord> {
    let mut approved: Vec<&BillRecord> = records.iter().filter(|r| r.is_approved()).collect();
    approved.sort_by_key(|r| {
        let d = r.effective_date();
        (d.is_none(), d)
    });
    approved
}

/// Running ledger starting at `opening_balance`. The last row's balance is
/// `opening_balance + compute_balance(records, None)`.
pub fn build_ledger(records: &[BillRecord], opening_balance: Decimal) -> Vec<LedgerEntry> {
    let mut balance = opening_balance;
    chronological(records)
        .into_iter()
        .map(|r| {
            balance += r.signed_amount();
            LedgerEntry::from_record(r, balance)
        })
        .collect()
}

/// Running ledger restricted to the rows passing `filters`. Balances are
/// still those of the full ledger, so hidden rows do not shift them.
pub fn ledger_view(
    records: &[BillRecord],
    filters: &Filters,
    opening_balance: Decimal,
) -> (Vec<LedgerEntry>, Diagnostics) {
    let matcher = Matcher::new(filters);
    let mut diagnostics = Diagnostics::default();
    let mut balance = opening_balance;
    let mut rows = Vec::new();
    for r in chronological(records) {
        balance += r.signed_amount();
        if matcher.matches(r, &mut diagnostics) {
            rows.push(LedgerEntry::from_record(r, balance));
        }
    }
    (rows, diagnostics)
}
