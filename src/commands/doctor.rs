// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::BillRecord;
use crate::reconciler::{diagnose, find_duplicates};
use crate::utils::pretty_table;
use anyhow::Result;

/// `(issue, detail)` rows for everything worth a look in the feed.
pub fn findings(records: &[BillRecord]) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = diagnose(records)
        .issues()
        .into_iter()
        .map(|(issue, n)| vec![issue.to_string(), format!("{} record(s)", n)])
        .collect();

    for g in find_duplicates(records) {
        rows.push(vec!["possible_duplicate".into(), g.ids.join(", ")]);
    }
    rows
}

pub fn handle(records: &[BillRecord]) -> Result<()> {
    let rows = findings(records);
    if rows.is_empty() {
        println!("✅ doctor: no issues found in {} bills", records.len());
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
