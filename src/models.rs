// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::utils::parse_loose_date;

pub const OTHER_CATEGORY: &str = "Other";
pub const UNKNOWN_SUBMITTER: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BillKind {
    Reimbursement,
    DirectPayment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Flow {
    Credit,
    Debit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BillStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Returned,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Draft => "draft",
            BillStatus::Pending => "pending",
            BillStatus::Approved => "approved",
            BillStatus::Rejected => "rejected",
            BillStatus::Returned => "returned",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(BillStatus::Draft),
            "pending" => Ok(BillStatus::Pending),
            "approved" => Ok(BillStatus::Approved),
            "rejected" => Ok(BillStatus::Rejected),
            "returned" => Ok(BillStatus::Returned),
            other => Err(LedgerError::invalid(format!("unknown bill status '{}'", other))),
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Flow::Credit => "credit",
            Flow::Debit => "debit",
        })
    }
}

impl FromStr for Flow {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "credit" => Ok(Flow::Credit),
            "debit" => Ok(Flow::Debit),
            other => Err(LedgerError::invalid(format!("unknown flow '{}'", other))),
        }
    }
}

impl fmt::Display for BillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BillKind::Reimbursement => "reimbursement",
            BillKind::DirectPayment => "directPayment",
        })
    }
}

impl FromStr for BillKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reimbursement" => Ok(BillKind::Reimbursement),
            "directpayment" | "direct-payment" | "direct" => Ok(BillKind::DirectPayment),
            other => Err(LedgerError::invalid(format!("unknown bill kind '{}'", other))),
        }
    }
}

/// A single bill as owned by the bill store. Dates stay as the store sent
/// them; they are parsed on demand so a bad date never rejects the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRecord {
    pub id: String,
    pub kind: BillKind,
    pub flow: Flow,
    pub amount: Decimal,
    pub status: BillStatus,
    /// Status the record held before it became a draft (e.g. `returned`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<BillStatus>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub submitter_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_admin_id: Option<String>,
    #[serde(default)]
    pub entry_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_ref: Option<String>,
}

impl BillRecord {
    pub fn new(id: impl Into<String>, flow: Flow, amount: Decimal, status: BillStatus) -> Self {
        BillRecord {
            id: id.into(),
            kind: BillKind::Reimbursement,
            flow,
            amount,
            status,
            previous_status: None,
            category: String::new(),
            submitter_name: String::new(),
            approver_name: None,
            approver_id: None,
            created_by_admin_id: None,
            entry_date: String::new(),
            bill_date: None,
            settlement_date: None,
            remarks: None,
            description: String::new(),
            attachment_ref: None,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.status == BillStatus::Draft
    }

    pub fn is_approved(&self) -> bool {
        self.status == BillStatus::Approved
    }

    /// `amount` with the sign of `flow` applied.
    pub fn signed_amount(&self) -> Decimal {
        match self.flow {
            Flow::Credit => self.amount,
            Flow::Debit => -self.amount,
        }
    }

    /// First parseable of settlement date, bill date, entry date.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        [
            self.settlement_date.as_deref(),
            self.bill_date.as_deref(),
            Some(self.entry_date.as_str()),
        ]
        .into_iter()
        .flatten()
        .find_map(parse_loose_date)
    }

    pub fn entry_date_parsed(&self) -> Option<NaiveDate> {
        parse_loose_date(&self.entry_date)
    }

    pub fn category_bucket(&self) -> &str {
        let c = self.category.trim();
        if c.is_empty() { OTHER_CATEGORY } else { c }
    }

    pub fn submitter_bucket(&self) -> &str {
        let s = self.submitter_name.trim();
        if s.is_empty() { UNKNOWN_SUBMITTER } else { s }
    }

    pub fn has_remarks(&self) -> bool {
        self.remarks.as_deref().is_some_and(|r| !r.trim().is_empty())
    }

    /// A draft that came back from review and still belongs under "Returned".
    pub fn is_returned_draft(&self) -> bool {
        self.is_draft() && self.previous_status == Some(BillStatus::Returned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl FromStr for Role {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(LedgerError::invalid(format!("unknown role '{}'", other))),
        }
    }
}

/// Identity furnished by the auth provider; only used to pick which feed to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub role: Role,
}
