// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billbook::models::{BillKind, BillRecord, BillStatus, Flow};
use billbook::reconciler::{apply_filters, recent_activity, DateRange, Filters, StatusFilter};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bill(id: &str, status: BillStatus) -> BillRecord {
    BillRecord {
        category: "Events".into(),
        submitter_name: "Asha".into(),
        description: "Hall booking".into(),
        entry_date: "2025-05-02".into(),
        ..BillRecord::new(id, Flow::Debit, Decimal::from(120), status)
    }
}

fn ids(records: &[BillRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

fn setup() -> Vec<BillRecord> {
    vec![
        bill("p1", BillStatus::Pending),
        bill("a1", BillStatus::Approved),
        bill("r1", BillStatus::Rejected),
        BillRecord {
            remarks: Some("attach receipt".into()),
            ..bill("ret1", BillStatus::Returned)
        },
        BillRecord {
            category: "Travel".into(),
            kind: BillKind::DirectPayment,
            ..bill("d1", BillStatus::Draft)
        },
        BillRecord {
            previous_status: Some(BillStatus::Returned),
            remarks: Some("fix the amount".into()),
            entry_date: "2023-01-01".into(),
            ..bill("d2", BillStatus::Draft)
        },
        BillRecord {
            submitter_name: "Ravi".into(),
            category: "Travel".into(),
            ..bill("a2", BillStatus::Approved)
        },
    ]
}

#[test]
fn all_status_hides_drafts() {
    let out = apply_filters(&setup(), &Filters::new(day(2025, 5, 20)));
    assert_eq!(ids(&out.records), vec!["p1", "a1", "r1", "ret1", "a2"]);
}

#[test]
fn drafts_bucket_ignores_category_kind_and_date() {
    let filters = Filters::new(day(2025, 5, 20))
        .with_status(StatusFilter::Drafts)
        .with_category("Food")
        .with_kind(BillKind::Reimbursement)
        .with_date_range(DateRange::Month);
    let out = apply_filters(&setup(), &filters);
    assert_eq!(ids(&out.records), vec!["d1", "d2"]);
}

#[test]
fn returned_bucket_includes_drafts_created_by_return() {
    let filters = Filters::new(day(2025, 5, 20)).with_status(StatusFilter::Returned);
    let out = apply_filters(&setup(), &filters);
    assert_eq!(ids(&out.records), vec!["ret1", "d2"]);
    assert!(out.diagnostics.is_clean());
}

#[test]
fn returned_without_remarks_is_kept_and_counted() {
    let records = vec![bill("ret", BillStatus::Returned)];
    let filters = Filters::new(day(2025, 5, 20)).with_status(StatusFilter::Returned);
    let out = apply_filters(&records, &filters);
    assert_eq!(ids(&out.records), vec!["ret"]);
    assert_eq!(out.diagnostics.returned_without_remarks, 1);
}

#[test]
fn status_buckets_partition_non_drafts() {
    let records = setup();
    let today = day(2025, 5, 20);
    let all = apply_filters(&records, &Filters::new(today)).records;

    let mut union: Vec<String> = Vec::new();
    for status in [
        StatusFilter::Pending,
        StatusFilter::Approved,
        StatusFilter::Rejected,
        StatusFilter::Returned,
    ] {
        let bucket = apply_filters(&records, &Filters::new(today).with_status(status)).records;
        union.extend(bucket.into_iter().filter(|r| !r.is_draft()).map(|r| r.id));
    }
    let drafts = apply_filters(&records, &Filters::new(today).with_status(StatusFilter::Drafts));

    let mut expected: Vec<String> = all.iter().map(|r| r.id.clone()).collect();
    expected.sort();
    union.sort();
    assert_eq!(union, expected);
    assert_eq!(all.len() + drafts.records.len(), records.len());
}

#[test]
fn relative_range_uses_settlement_then_bill_then_entry_date() {
    let records = vec![
        BillRecord {
            bill_date: Some("2025-03-31".into()),
            ..bill("before", BillStatus::Pending)
        },
        BillRecord {
            bill_date: Some("2025-03-01".into()),
            settlement_date: Some("2025-04-02T09:15:00.000Z".into()),
            ..bill("settled", BillStatus::Approved)
        },
        BillRecord {
            entry_date: "2025-04-01".into(),
            ..bill("entered", BillStatus::Pending)
        },
    ];
    let filters = Filters::new(day(2025, 5, 20)).with_date_range(DateRange::Quarter);
    let out = apply_filters(&records, &filters);
    assert_eq!(ids(&out.records), vec!["settled", "entered"]);
}

#[test]
fn unparseable_settlement_date_falls_back_to_bill_date() {
    let record = BillRecord {
        settlement_date: Some("to be settled".into()),
        bill_date: Some("2025-03-30".into()),
        ..bill("x", BillStatus::Approved)
    };
    assert_eq!(record.effective_date(), Some(day(2025, 3, 30)));

    let out = apply_filters(
        &[record],
        &Filters::new(day(2025, 5, 20)).with_date_range(DateRange::Quarter),
    );
    assert!(out.records.is_empty());
    assert_eq!(out.diagnostics.undated, 0);
}

#[test]
fn undated_records_pass_date_filters() {
    let records = vec![
        BillRecord {
            entry_date: "31/12/2024".into(),
            bill_date: Some("soon".into()),
            ..bill("bad", BillStatus::Pending)
        },
        BillRecord {
            entry_date: "2020-01-01".into(),
            ..bill("old", BillStatus::Pending)
        },
    ];
    let filters = Filters::new(day(2025, 5, 20)).with_date_range(DateRange::Year);
    let out = apply_filters(&records, &filters);
    assert_eq!(ids(&out.records), vec!["bad"]);
    assert_eq!(out.diagnostics.undated, 1);
}

#[test]
fn explicit_range_is_inclusive() {
    let records = vec![
        BillRecord {
            entry_date: "2025-02-01".into(),
            ..bill("start", BillStatus::Pending)
        },
        BillRecord {
            entry_date: "2025-02-28".into(),
            ..bill("end", BillStatus::Pending)
        },
        BillRecord {
            entry_date: "2025-03-01".into(),
            ..bill("after", BillStatus::Pending)
        },
    ];
    let range = DateRange::between(Some(day(2025, 2, 1)), Some(day(2025, 2, 28))).unwrap();
    let out = apply_filters(&records, &Filters::new(day(2025, 5, 20)).with_date_range(range));
    assert_eq!(ids(&out.records), vec!["start", "end"]);
}

#[test]
fn inverted_range_is_invalid_input() {
    let err = DateRange::between(Some(day(2025, 3, 1)), Some(day(2025, 2, 1))).unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn unknown_filter_values_are_invalid_input() {
    assert!("everything".parse::<StatusFilter>().unwrap_err().is_invalid_input());
    assert!("needs_update".parse::<StatusFilter>().is_err());
    assert!("week".parse::<DateRange>().unwrap_err().is_invalid_input());
}

#[test]
fn category_and_kind_are_exact_matches() {
    let records = setup();
    let today = day(2025, 5, 20);
    let travel = apply_filters(&records, &Filters::new(today).with_category("Travel"));
    assert_eq!(ids(&travel.records), vec!["a2"]);

    let partial = apply_filters(&records, &Filters::new(today).with_category("Trav"));
    assert!(partial.records.is_empty());

    let direct = apply_filters(&records, &Filters::new(today).with_kind(BillKind::DirectPayment));
    assert!(direct.records.is_empty());
}

#[test]
fn other_category_matches_uncategorized_bills() {
    let records = vec![
        BillRecord {
            category: "  ".into(),
            ..bill("blank", BillStatus::Pending)
        },
        bill("events", BillStatus::Pending),
    ];
    let out = apply_filters(&records, &Filters::new(day(2025, 5, 20)).with_category("Other"));
    assert_eq!(ids(&out.records), vec!["blank"]);
}

#[test]
fn search_matches_amount_text() {
    let records = vec![
        BillRecord {
            description: "Snacks".into(),
            ..BillRecord::new("s", Flow::Debit, Decimal::from(250), BillStatus::Pending)
        },
        bill("other", BillStatus::Pending),
    ];
    let out = apply_filters(&records, &Filters::new(day(2025, 5, 20)).with_search("250"));
    assert_eq!(ids(&out.records), vec!["s"]);
}

#[test]
fn search_is_case_insensitive_and_blank_means_absent() {
    let records = setup();
    let today = day(2025, 5, 20);
    let ravi = apply_filters(&records, &Filters::new(today).with_search("RAVI"));
    assert_eq!(ids(&ravi.records), vec!["a2"]);

    let blank = apply_filters(&records, &Filters::new(today).with_search("   "));
    let none = apply_filters(&records, &Filters::new(today));
    assert_eq!(blank.records, none.records);
}

#[test]
fn filtering_twice_changes_nothing() {
    let records = setup();
    let today = day(2025, 5, 20);
    let cases = vec![
        Filters::new(today),
        Filters::new(today).with_status(StatusFilter::Drafts),
        Filters::new(today).with_status(StatusFilter::Returned),
        Filters::new(today)
            .with_date_range(DateRange::Year)
            .with_search("hall"),
        Filters::new(today).with_category("Travel").with_flow(Flow::Debit),
    ];
    for f in cases {
        let once = apply_filters(&records, &f).records;
        let twice = apply_filters(&once, &f).records;
        assert_eq!(once, twice, "{:?}", f);
    }
}

#[test]
fn recent_activity_is_newest_first_without_drafts() {
    let records = vec![
        BillRecord {
            entry_date: "2025-01-10".into(),
            ..bill("jan", BillStatus::Approved)
        },
        BillRecord {
            entry_date: "garbled".into(),
            ..bill("undated", BillStatus::Pending)
        },
        BillRecord {
            entry_date: "2025-03-01T08:00:00Z".into(),
            ..bill("mar", BillStatus::Pending)
        },
        BillRecord {
            entry_date: "2025-04-01".into(),
            ..bill("draft", BillStatus::Draft)
        },
        BillRecord {
            entry_date: "2025-02-14".into(),
            ..bill("feb", BillStatus::Rejected)
        },
    ];
    let recent = recent_activity(&records, 3);
    assert_eq!(ids(&recent), vec!["mar", "feb", "jan"]);
    assert_eq!(ids(&recent_activity(&records, 10)), vec!["mar", "feb", "jan", "undated"]);
}
