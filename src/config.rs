// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Billbook", "billbook"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the bill store REST API.
    pub api_base: String,
    pub currency: String,
    /// Funds held before the first recorded bill. Shown separately, never
    /// folded into the computed balances.
    pub opening_balance: Decimal,
    pub log_filter: String,
    pub fetch_retries: u32,
    pub retry_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base: "http://localhost:5001/api".to_string(),
            currency: "INR".to_string(),
            opening_balance: Decimal::ZERO,
            log_filter: "billbook=warn".to_string(),
            fetch_retries: 2,
            retry_delay_ms: 1000,
            timeout_secs: 15,
        }
    }
}

pub fn settings_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    Ok(proj.config_dir().join("settings.json"))
}

pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Settings from `path` (or the default location), falling back to the
/// defaults when the file does not exist. A file that exists but does not
/// parse is an error.
pub fn load_or_default(path: Option<&Path>) -> Result<Settings> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => settings_path()?,
    };
    if !path.exists() {
        debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Settings::default());
    }
    load_settings(&path)
}

/// Write the default settings unless a file is already there. Returns the path.
pub fn init_settings(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => settings_path()?,
    };
    if path.exists() {
        return Ok(path);
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("Failed to create config dir")?;
    }
    fs::write(&path, serde_json::to_string_pretty(&Settings::default())?)
        .with_context(|| format!("Writing settings file: {}", path.display()))?;
    Ok(path)
}
