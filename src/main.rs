// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use billbook::{cli, commands, config, feed};

fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let settings_path = matches.get_one::<String>("settings").map(PathBuf::from);
    let settings = config::load_or_default(settings_path.as_deref())?;
    init_logging(&settings.log_filter);

    if let Some(("init", _)) = matches.subcommand() {
        let path = config::init_settings(settings_path.as_deref())?;
        println!("Settings at {}", path.display());
        return Ok(());
    }
    if matches.subcommand().is_none() {
        cli::build_cli().print_help()?;
        println!();
        return Ok(());
    }

    let source = cli::source_from_matches(&matches)?;
    let records = feed::load(&source, &settings).context("Loading bill feed")?;

    match matches.subcommand() {
        Some(("balance", sub)) => commands::balance::handle(&records, &settings, sub)?,
        Some(("bills", sub)) => commands::bills::handle(&records, sub)?,
        Some(("report", sub)) => commands::reports::handle(&records, &settings, sub)?,
        Some(("ledger", sub)) => commands::ledger::handle(&records, &settings, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&records, &settings, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&records)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
