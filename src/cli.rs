// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{crate_version, Arg, ArgAction, ArgMatches, Command};

use crate::feed::{FeedRequest, FeedSource};
use crate::models::{BillKind, Flow, Role, Session};
use crate::reconciler::{DateRange, Filters, StatusFilter};
use crate::utils::parse_date;

fn output_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    ]
}

fn filter_args() -> [Arg; 9] {
    [
        Arg::new("range")
            .long("range")
            .value_parser(["all", "month", "quarter", "year"])
            .conflicts_with_all(["from", "to"])
            .help("Relative window on the effective date"),
        Arg::new("from").long("from").help("Inclusive start date (YYYY-MM-DD)"),
        Arg::new("to").long("to").help("Inclusive end date (YYYY-MM-DD)"),
        Arg::new("category").long("category"),
        Arg::new("kind")
            .long("kind")
            .value_parser(["reimbursement", "directPayment"]),
        Arg::new("flow").long("flow").value_parser(["credit", "debit"]),
        Arg::new("status")
            .long("status")
            .value_parser(["all", "drafts", "pending", "approved", "rejected", "returned"]),
        Arg::new("search")
            .long("search")
            .help("Case-insensitive text over description, submitter, category and amount"),
        Arg::new("today")
            .long("today")
            .help("Date the relative windows are anchored on (defaults to today)"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("billbook")
        .version(crate_version!())
        .about("Reimbursement and direct-payment ledger: balances, reports and exports")
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .global(true)
                .value_name("PATH")
                .help("Bill feed snapshot (.json or .csv)"),
        )
        .arg(
            Arg::new("remote")
                .long("remote")
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with("input")
                .help("Fetch the feed from the bill store"),
        )
        .arg(
            Arg::new("ledger-feed")
                .long("ledger-feed")
                .global(true)
                .action(ArgAction::SetTrue)
                .requires("remote")
                .help("Fetch the settled ledger listing instead of the bill listing"),
        )
        .arg(Arg::new("user-id").long("user-id").global(true))
        .arg(
            Arg::new("role")
                .long("role")
                .global(true)
                .value_parser(["admin", "user"])
                .default_value("user"),
        )
        .arg(
            Arg::new("settings")
                .long("settings")
                .global(true)
                .value_name("PATH"),
        )
        .subcommand(Command::new("init").about("Write the default settings file"))
        .subcommand(
            Command::new("balance")
                .about("Lifetime balance over approved bills")
                .arg(Arg::new("as-of").long("as-of").help("Cutoff date (YYYY-MM-DD)"))
                .args(output_args()),
        )
        .subcommand(
            Command::new("bills")
                .about("Browse bills")
                .subcommand(
                    Command::new("list")
                        .args(filter_args())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        )
                        .args(output_args()),
                )
                .subcommand(Command::new("counts").args(output_args()))
                .subcommand(Command::new("duplicates").args(output_args()))
                .subcommand(
                    Command::new("recent")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize))
                                .default_value("3"),
                        )
                        .args(output_args()),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Balances and aggregates")
                .subcommand(Command::new("period").args(filter_args()).args(output_args()))
                .subcommand(Command::new("trend").args(filter_args()).args(output_args()))
                .subcommand(
                    Command::new("categories")
                        .args(filter_args())
                        .args(output_args()),
                )
                .subcommand(Command::new("pending").args(filter_args()).args(output_args()))
                .subcommand(Command::new("snapshot").args(filter_args())),
        )
        .subcommand(
            Command::new("ledger")
                .about("Running ledger of approved bills")
                .args(filter_args())
                .args(output_args()),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("ledger")
                    .args(filter_args())
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .required(true)
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Report data-quality issues in the feed"))
}

/// Build [`Filters`] from the flags declared by `filter_args`.
pub fn filters_from_matches(m: &ArgMatches) -> Result<Filters> {
    let today = match m.get_one::<String>("today") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let mut filters = Filters::new(today);

    let from = m.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = m.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    filters.date_range = if from.is_some() || to.is_some() {
        DateRange::between(from, to)?
    } else {
        match m.get_one::<String>("range") {
            Some(r) => r.parse::<DateRange>()?,
            None => DateRange::All,
        }
    };
    if let Some(c) = m.get_one::<String>("category").map(|s| s.trim()) {
        if !c.is_empty() {
            filters = filters.with_category(c);
        }
    }
    if let Some(k) = m.get_one::<String>("kind") {
        filters = filters.with_kind(k.parse::<BillKind>()?);
    }
    if let Some(f) = m.get_one::<String>("flow") {
        filters = filters.with_flow(f.parse::<Flow>()?);
    }
    if let Some(s) = m.get_one::<String>("status") {
        filters = filters.with_status(s.parse::<StatusFilter>()?);
    }
    if let Some(q) = m.get_one::<String>("search") {
        filters = filters.with_search(q.as_str());
    }
    Ok(filters)
}

/// Resolve the global feed flags. With `--remote`, `--ledger-feed` picks the
/// ledger listing; otherwise the role decides which bill listing is requested.
pub fn source_from_matches(m: &ArgMatches) -> Result<FeedSource> {
    if let Some(path) = m.get_one::<String>("input") {
        return Ok(FeedSource::File(PathBuf::from(path.trim())));
    }
    if m.get_flag("remote") && m.get_flag("ledger-feed") {
        return Ok(FeedSource::Remote(FeedRequest::Ledger));
    }
    if m.get_flag("remote") {
        let role = m
            .get_one::<String>("role")
            .map(|r| r.parse::<Role>())
            .transpose()?
            .unwrap_or(Role::User);
        let user_id = m
            .get_one::<String>("user-id")
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if role == Role::User && user_id.is_empty() {
            bail!("--user-id is required to fetch a user's bills");
        }
        let session = Session { user_id, role };
        return Ok(FeedSource::Remote(FeedRequest::for_session(&session)));
    }
    bail!("No bill feed: pass --input <PATH> or --remote")
}
