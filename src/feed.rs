// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Boundary with the bill store. Everything the store may send (envelopes,
//! legacy field names, the old `needs_update` spelling, `isDraft` flags) is
//! normalised here so the reconciler only ever sees canonical records.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{LedgerError, Result};
use crate::models::{BillKind, BillRecord, BillStatus, Flow, Role, Session};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBill {
    #[serde(default, alias = "_id")]
    id: Option<Value>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    payment_type: Option<String>,
    #[serde(default, alias = "type")]
    flow: Option<String>,
    #[serde(default)]
    amount: Option<Value>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    previous_status: Option<String>,
    #[serde(default)]
    is_draft: Option<Value>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, alias = "personName", alias = "vendorName")]
    submitter_name: Option<String>,
    #[serde(default, alias = "approvedByName")]
    approver_name: Option<String>,
    #[serde(default, alias = "approvedBy")]
    approver_id: Option<String>,
    #[serde(default, alias = "adminId")]
    created_by_admin_id: Option<String>,
    #[serde(default)]
    entry_date: Option<String>,
    #[serde(default)]
    bill_date: Option<String>,
    #[serde(default, alias = "dateOfSettlement")]
    settlement_date: Option<String>,
    #[serde(default)]
    remarks: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "photoUrl", alias = "billSoftcopyUrl")]
    attachment_ref: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Canonical status for a wire spelling. `needs_update` is the legacy name of `returned`.
fn parse_status(raw: &str) -> Result<BillStatus> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "needs_update" | "needs-update" => Ok(BillStatus::Returned),
        other => BillStatus::from_str(other),
    }
}

fn parse_amount(v: &Value, at: usize) -> Result<Decimal> {
    let parsed = match v {
        Value::Number(n) => {
            let s = n.to_string();
            Decimal::from_str(&s).or_else(|_| Decimal::from_scientific(&s)).ok()
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    };
    let amount = parsed
        .ok_or_else(|| LedgerError::invalid(format!("record {}: amount {} is not a number", at, v)))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(LedgerError::invalid(format!(
            "record {}: amount {} is negative; direction belongs in the flow",
            at, amount
        )));
    }
    Ok(amount)
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Which listing a batch of wire rows came from. Rows of the `ledger`
/// listing are settled entries and carry no status of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listing {
    Bills,
    Ledger,
}

impl WireBill {
    fn into_record(self, at: usize, listing: Listing) -> Result<BillRecord> {
        let id = match self.id {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(LedgerError::invalid(format!("record {}: missing id", at))),
        };
        let amount = match &self.amount {
            Some(v) => parse_amount(v, at)?,
            None => return Err(LedgerError::invalid(format!("record {}: missing amount", at))),
        };
        let flow = match non_empty(self.flow) {
            Some(f) => Flow::from_str(&f)?,
            None => Flow::Debit,
        };
        let kind = match (non_empty(self.kind), non_empty(self.payment_type)) {
            (Some(k), _) => BillKind::from_str(&k)?,
            (None, Some(p)) => BillKind::from_str(&p)?,
            (None, None) => BillKind::Reimbursement,
        };
        let wire_status = match (non_empty(self.status), listing) {
            (Some(s), _) => parse_status(&s)?,
            (None, Listing::Ledger) => BillStatus::Approved,
            (None, Listing::Bills) => BillStatus::Pending,
        };
        let previous_status = match non_empty(self.previous_status) {
            Some(s) => Some(parse_status(&s)?),
            None => None,
        };
        let is_draft = self.is_draft.as_ref().is_some_and(truthy);
        let (status, previous_status) = if is_draft && wire_status != BillStatus::Draft {
            (BillStatus::Draft, previous_status.or(Some(wire_status)))
        } else {
            (wire_status, previous_status)
        };

        let entry_date = non_empty(self.entry_date);
        let settlement_date = match (non_empty(self.settlement_date), listing) {
            (Some(d), _) => Some(d),
            (None, Listing::Ledger) if status == BillStatus::Approved => entry_date.clone(),
            (None, _) => None,
        };

        Ok(BillRecord {
            id,
            kind,
            flow,
            amount,
            status,
            previous_status,
            category: non_empty(self.category).unwrap_or_default(),
            submitter_name: non_empty(self.submitter_name).unwrap_or_default(),
            approver_name: non_empty(self.approver_name),
            approver_id: non_empty(self.approver_id),
            created_by_admin_id: non_empty(self.created_by_admin_id),
            entry_date: entry_date.unwrap_or_default(),
            bill_date: non_empty(self.bill_date),
            settlement_date,
            remarks: non_empty(self.remarks),
            description: non_empty(self.description).unwrap_or_default(),
            attachment_ref: non_empty(self.attachment_ref),
        })
    }
}

fn records_from_items(items: Vec<Value>, listing: Listing) -> Result<Vec<BillRecord>> {
    items
        .into_iter()
        .enumerate()
        .map(|(at, item)| {
            if !item.is_object() {
                return Err(LedgerError::invalid(format!("record {} is not an object", at)));
            }
            let wire: WireBill = serde_json::from_value(item)
                .map_err(|e| LedgerError::invalid(format!("record {}: {}", at, e)))?;
            wire.into_record(at, listing)
        })
        .collect()
}

/// Records from a decoded bill-store response: a bare array, or an envelope
/// carrying `bills` or `ledger`. Ledger rows without a status are approved
/// and settled on their entry date.
pub fn records_from_value(value: Value) -> Result<Vec<BillRecord>> {
    match value {
        Value::Array(items) => records_from_items(items, Listing::Bills),
        Value::Object(mut map) => {
            if map.get("success").and_then(Value::as_bool) == Some(false) {
                let message = map
                    .get("message")
                    .or_else(|| map.get("error"))
                    .and_then(Value::as_str)
                    .unwrap_or("request failed")
                    .to_string();
                return Err(LedgerError::Remote {
                    status: 200,
                    message,
                });
            }
            let listing = match map.remove("bills") {
                Some(v) => Some((v, Listing::Bills)),
                None => map.remove("ledger").map(|v| (v, Listing::Ledger)),
            };
            match listing {
                Some((Value::Array(items), listing)) => {
                    if listing == Listing::Ledger {
                        debug!(rows = items.len(), "reading ledger listing");
                    }
                    records_from_items(items, listing)
                }
                Some(_) => Err(LedgerError::invalid("bill list is not an array")),
                None => Err(LedgerError::invalid(
                    "response carries neither 'bills' nor 'ledger'",
                )),
            }
        }
        other => Err(LedgerError::invalid(format!(
            "expected a collection of bill records, got {}",
            match other {
                Value::Null => "null",
                Value::Bool(_) => "a boolean",
                Value::Number(_) => "a number",
                _ => "a string",
            }
        ))),
    }
}

pub fn parse_feed(json: &str) -> Result<Vec<BillRecord>> {
    let value: Value = serde_json::from_str(json)?;
    records_from_value(value)
}

/// CSV feed with a header row of field names (canonical or wire spellings).
/// Empty cells count as absent.
pub fn parse_csv<R: std::io::Read>(rdr: R) -> Result<Vec<BillRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(rdr);
    let headers = rdr.headers()?.clone();
    let mut items = Vec::new();
    for result in rdr.records() {
        let rec = result?;
        let mut obj = Map::new();
        for (h, v) in headers.iter().zip(rec.iter()) {
            let v = v.trim();
            if !v.is_empty() {
                obj.insert(h.trim().to_string(), Value::String(v.to_string()));
            }
        }
        items.push(Value::Object(obj));
    }
    records_from_items(items, Listing::Bills)
}

/// Load a feed from disk; `.csv` files go through the CSV reader, anything else is JSON.
pub fn load_path(path: &Path) -> Result<Vec<BillRecord>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let records = if is_csv {
        parse_csv(std::fs::File::open(path)?)?
    } else {
        parse_feed(&std::fs::read_to_string(path)?)?
    };
    info!(path = %path.display(), count = records.len(), "loaded bill feed");
    Ok(records)
}

/// Which bill-store listing a session is entitled to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRequest {
    AllBills,
    UserBills(String),
    Ledger,
}

impl FeedRequest {
    /// Bill listing a session is entitled to: every bill for admins, the
    /// caller's own bills otherwise.
    pub fn for_session(session: &Session) -> Self {
        match session.role {
            Role::Admin => FeedRequest::AllBills,
            Role::User => FeedRequest::UserBills(session.user_id.clone()),
        }
    }

    pub fn url(&self, api_base: &str) -> String {
        let base = api_base.trim_end_matches('/');
        match self {
            FeedRequest::AllBills => format!("{}/all-bills", base),
            FeedRequest::UserBills(id) => format!("{}/user-bills/{}", base, id),
            FeedRequest::Ledger => format!("{}/ledger", base),
        }
    }
}

/// Run `op` up to `retries + 1` times with a fixed pause between attempts.
/// Malformed responses are returned at once; retrying cannot fix them.
pub fn with_retry<T, F>(retries: u32, delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Result<T>,
{
    let mut attempt = 0;
    loop {
        match op(attempt) {
            Ok(v) => return Ok(v),
            Err(e) if e.is_invalid_input() || attempt >= retries => return Err(e),
            Err(e) => {
                attempt += 1;
                warn!(attempt, error = %e, "bill store request failed, retrying");
                thread::sleep(delay);
            }
        }
    }
}

fn fetch_once(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<BillRecord>> {
    let resp = client.get(url).send()?;
    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| body.chars().take(200).collect());
        return Err(LedgerError::Remote {
            status: status.as_u16(),
            message,
        });
    }
    parse_feed(&body)
}

/// Fetch a record snapshot from the bill store.
pub fn fetch(settings: &Settings, request: &FeedRequest) -> Result<Vec<BillRecord>> {
    let client = crate::utils::http_client(settings.timeout_secs)?;
    let url = request.url(&settings.api_base);
    let records = with_retry(
        settings.fetch_retries,
        Duration::from_millis(settings.retry_delay_ms),
        |_| fetch_once(&client, &url),
    )?;
    info!(%url, count = records.len(), "fetched bill feed");
    Ok(records)
}

/// Where the current record snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    File(PathBuf),
    Remote(FeedRequest),
}

pub fn load(source: &FeedSource, settings: &Settings) -> Result<Vec<BillRecord>> {
    match source {
        FeedSource::File(path) => load_path(path),
        FeedSource::Remote(request) => fetch(settings, request),
    }
}
