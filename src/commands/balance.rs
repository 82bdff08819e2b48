// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::BillRecord;
use crate::reconciler::compute_balance;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub as_of: Option<NaiveDate>,
    pub opening_balance: Decimal,
    /// Credits minus debits over approved bills.
    pub approved_net: Decimal,
    pub balance: Decimal,
}

pub fn balance_summary(
    records: &[BillRecord],
    opening_balance: Decimal,
    as_of: Option<NaiveDate>,
) -> BalanceSummary {
    let approved_net = compute_balance(records, as_of);
    BalanceSummary {
        as_of,
        opening_balance,
        approved_net,
        balance: opening_balance + approved_net,
    }
}

pub fn handle(records: &[BillRecord], settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let as_of = m
        .get_one::<String>("as-of")
        .map(|s| parse_date(s))
        .transpose()?;
    let summary = balance_summary(records, settings.opening_balance, as_of);
    if !maybe_print_json(json_flag, jsonl_flag, &summary)? {
        let ccy = settings.currency.as_str();
        let mut rows = Vec::new();
        if !summary.opening_balance.is_zero() {
            rows.push(vec![
                "Opening balance".to_string(),
                fmt_money(&summary.opening_balance, ccy),
            ]);
        }
        rows.push(vec![
            "Approved net".to_string(),
            fmt_money(&summary.approved_net, ccy),
        ]);
        rows.push(vec!["Balance".to_string(), fmt_money(&summary.balance, ccy)]);
        if let Some(d) = summary.as_of {
            rows.push(vec!["As of".to_string(), d.to_string()]);
        }
        println!("{}", pretty_table(&["", "Amount"], rows));
    }
    Ok(())
}
