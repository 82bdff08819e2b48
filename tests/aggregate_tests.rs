// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billbook::models::{BillRecord, BillStatus, Flow};
use billbook::reconciler::{
    compute_balance, compute_category_totals, compute_monthly_trend, compute_pending_by_user,
    compute_snapshot, count_by_status, find_duplicates, DateRange, Filters, StatusFilter,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn bill(id: &str, flow: Flow, amount: &str, status: BillStatus) -> BillRecord {
    BillRecord::new(id, flow, dec(amount), status)
}

fn settled(id: &str, flow: Flow, amount: &str, date: &str) -> BillRecord {
    BillRecord {
        settlement_date: Some(date.into()),
        ..bill(id, flow, amount, BillStatus::Approved)
    }
}

#[test]
fn empty_inputs_produce_empty_aggregates() {
    assert!(compute_monthly_trend(&[]).is_empty());
    assert!(compute_category_totals(&[]).is_empty());
    assert!(compute_pending_by_user(&[]).is_empty());
    assert_eq!(count_by_status(&[]).total, 0);
}

#[test]
fn category_totals_skip_rejected_bills() {
    let records = vec![
        BillRecord {
            category: "Food".into(),
            ..bill("1", Flow::Debit, "100", BillStatus::Approved)
        },
        BillRecord {
            category: "Food".into(),
            ..bill("2", Flow::Debit, "250", BillStatus::Rejected)
        },
    ];
    let totals = compute_category_totals(&records);
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].category, "Food");
    assert_eq!(totals[0].total, dec("100"));
}

#[test]
fn category_totals_sort_by_total_then_name() {
    let cat = |id: &str, c: &str, amt: &str| BillRecord {
        category: c.into(),
        ..bill(id, Flow::Debit, amt, BillStatus::Approved)
    };
    let records = vec![
        cat("1", "Travel", "40"),
        cat("2", "", "60"),
        cat("3", "Events", "60"),
        cat("4", "Travel", "30"),
        cat("5", "Other", "5"),
    ];
    let totals = compute_category_totals(&records);
    let got: Vec<(&str, Decimal)> = totals
        .iter()
        .map(|t| (t.category.as_str(), t.total))
        .collect();
    assert_eq!(
        got,
        vec![("Travel", dec("70")), ("Other", dec("65")), ("Events", dec("60"))]
    );
}

#[test]
fn monthly_trend_orders_by_date_across_years() {
    let records = vec![
        settled("jan", Flow::Debit, "80", "2025-01-15"),
        settled("dec", Flow::Debit, "120", "2024-12-03"),
        settled("dec2", Flow::Debit, "30", "2024-12-28"),
    ];
    let trend = compute_monthly_trend(&records);
    let labels: Vec<&str> = trend.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, vec!["Dec 2024", "Jan 2025"]);
    assert_eq!(trend[0].total, dec("150"));
    assert_eq!(trend[1].total, dec("80"));
}

#[test]
fn monthly_trend_only_counts_approved_debits() {
    let records = vec![
        settled("credit", Flow::Credit, "500", "2025-02-01"),
        BillRecord {
            bill_date: Some("2025-02-10".into()),
            ..bill("pending", Flow::Debit, "70", BillStatus::Pending)
        },
        BillRecord {
            bill_date: Some("2025-02-11".into()),
            ..bill("receipt", Flow::Debit, "20", BillStatus::Approved)
        },
        BillRecord {
            entry_date: "n/a".into(),
            ..bill("undated", Flow::Debit, "9", BillStatus::Approved)
        },
    ];
    let trend = compute_monthly_trend(&records);
    assert_eq!(trend.len(), 1);
    assert_eq!(trend[0].label, "Feb 2025");
    assert_eq!(trend[0].total, dec("20"));
}

#[test]
fn pending_by_user_counts_and_sorts() {
    let by = |id: &str, who: &str, status: BillStatus| BillRecord {
        submitter_name: who.into(),
        ..bill(id, Flow::Debit, "10", status)
    };
    let records = vec![
        by("1", "Meera", BillStatus::Pending),
        by("2", "Arjun", BillStatus::Pending),
        by("3", "Meera", BillStatus::Pending),
        by("4", "", BillStatus::Pending),
        by("5", "Arjun", BillStatus::Draft),
        by("6", "Zoya", BillStatus::Approved),
        by("7", "Arjun", BillStatus::Pending),
        by("8", "Unknown", BillStatus::Pending),
    ];
    let pending = compute_pending_by_user(&records);
    let got: Vec<(&str, usize)> = pending
        .iter()
        .map(|p| (p.submitter.as_str(), p.count))
        .collect();
    assert_eq!(got, vec![("Arjun", 2), ("Meera", 2), ("Unknown", 2)]);
}

#[test]
fn drafts_never_reach_any_aggregate() {
    let drafts: Vec<BillRecord> = [Flow::Credit, Flow::Debit]
        .into_iter()
        .enumerate()
        .map(|(i, flow)| BillRecord {
            category: "Events".into(),
            submitter_name: "Asha".into(),
            settlement_date: Some("2025-01-01".into()),
            previous_status: Some(BillStatus::Approved),
            ..bill(&format!("d{}", i), flow, "999", BillStatus::Draft)
        })
        .collect();
    assert_eq!(compute_balance(&drafts, None), Decimal::ZERO);
    assert!(compute_monthly_trend(&drafts).is_empty());
    assert!(compute_category_totals(&drafts).is_empty());
    assert!(compute_pending_by_user(&drafts).is_empty());
}

#[test]
fn status_counts_match_dashboard_tiles() {
    let records = vec![
        bill("1", Flow::Debit, "1", BillStatus::Pending),
        bill("2", Flow::Debit, "1", BillStatus::Pending),
        bill("3", Flow::Debit, "1", BillStatus::Approved),
        bill("4", Flow::Debit, "1", BillStatus::Rejected),
        bill("5", Flow::Debit, "1", BillStatus::Returned),
        bill("6", Flow::Debit, "1", BillStatus::Draft),
    ];
    let c = count_by_status(&records);
    assert_eq!(
        (c.pending, c.approved, c.rejected, c.returned, c.drafts, c.total),
        (2, 1, 1, 1, 1, 5)
    );
}

#[test]
fn duplicates_match_on_date_amount_submitter_and_description() {
    let dup = |id: &str, date: &str, amount: &str, who: &str, what: &str| BillRecord {
        bill_date: Some(date.into()),
        submitter_name: who.into(),
        description: what.into(),
        ..bill(id, Flow::Debit, amount, BillStatus::Pending)
    };
    let records = vec![
        dup("a", "2025-01-05", "100", "Asha", "Cab to venue"),
        dup("b", "2025-01-05T00:00:00Z", "100.00", "asha ", "cab  to VENUE"),
        dup("c", "2025-01-05", "100", "Ravi", "Cab to venue"),
        BillRecord {
            status: BillStatus::Draft,
            ..dup("d", "2025-01-05", "100", "Asha", "Cab to venue")
        },
    ];
    let groups = find_duplicates(&records);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].ids, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(groups[0].bill_date, "2025-01-05");
}

#[test]
fn snapshot_figures_agree_with_individual_operations() {
    let records = vec![
        BillRecord {
            category: "Events".into(),
            ..settled("1", Flow::Credit, "1000", "2025-03-03")
        },
        BillRecord {
            category: "Food".into(),
            ..settled("2", Flow::Debit, "300", "2025-03-09")
        },
        BillRecord {
            category: "Food".into(),
            ..settled("3", Flow::Debit, "200", "2025-01-20")
        },
        BillRecord {
            submitter_name: "Asha".into(),
            entry_date: "2025-03-12".into(),
            ..bill("4", Flow::Debit, "40", BillStatus::Pending)
        },
        bill("5", Flow::Debit, "40", BillStatus::Draft),
    ];
    let filters = Filters::new(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap())
        .with_date_range(DateRange::Month)
        .with_status(StatusFilter::Approved);
    let snap = compute_snapshot(&records, &filters);

    assert_eq!(snap.current_balance, dec("500"));
    assert_eq!(snap.period_balance, dec("700"));
    let ids: Vec<&str> = snap.filtered_records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(snap.monthly_trend.len(), 1);
    assert_eq!(snap.monthly_trend[0].label, "Mar 2025");
    assert_eq!(snap.category_totals[0].category, "Events");
    assert_eq!(snap.pending_by_user.len(), 1);
    assert_eq!(snap.pending_by_user[0].submitter, "Asha");
    // the draft has no date and no category
    assert_eq!(snap.diagnostics.undated, 1);
}
