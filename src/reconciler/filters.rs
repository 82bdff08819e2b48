// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cmp::Reverse;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::{LedgerError, Result};
use crate::models::{BillKind, BillRecord, BillStatus, Flow};
use crate::reconciler::diagnostics::Diagnostics;
use crate::utils::{month_start, quarter_start, year_start};

/// Window applied to the effective date of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DateRange {
    All,
    Month,
    Quarter,
    Year,
    /// Inclusive on both ends; either end may be open.
    Between {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl DateRange {
    pub fn between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(LedgerError::invalid(format!(
                    "date range starts after it ends ({} > {})",
                    f, t
                )));
            }
        }
        Ok(DateRange::Between { from, to })
    }

    /// Inclusive `(lower, upper)` bounds relative to `today`.
    pub fn bounds(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match *self {
            DateRange::All => (None, None),
            DateRange::Month => (Some(month_start(today)), None),
            DateRange::Quarter => (Some(quarter_start(today)), None),
            DateRange::Year => (Some(year_start(today)), None),
            DateRange::Between { from, to } => (from, to),
        }
    }
}

impl FromStr for DateRange {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(DateRange::All),
            "month" => Ok(DateRange::Month),
            "quarter" => Ok(DateRange::Quarter),
            "year" => Ok(DateRange::Year),
            other => Err(LedgerError::invalid(format!("unknown date range '{}'", other))),
        }
    }
}

/// Status bucket requested by the view. Drafts are their own bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusFilter {
    #[default]
    All,
    Drafts,
    Pending,
    Approved,
    Rejected,
    Returned,
}

impl StatusFilter {
    pub fn status(&self) -> Option<BillStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Drafts => Some(BillStatus::Draft),
            StatusFilter::Pending => Some(BillStatus::Pending),
            StatusFilter::Approved => Some(BillStatus::Approved),
            StatusFilter::Rejected => Some(BillStatus::Rejected),
            StatusFilter::Returned => Some(BillStatus::Returned),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "drafts" | "draft" => Ok(StatusFilter::Drafts),
            "pending" => Ok(StatusFilter::Pending),
            "approved" => Ok(StatusFilter::Approved),
            "rejected" => Ok(StatusFilter::Rejected),
            "returned" => Ok(StatusFilter::Returned),
            other => Err(LedgerError::invalid(format!("unknown status filter '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub date_range: DateRange,
    pub category: Option<String>,
    pub kind: Option<BillKind>,
    pub flow: Option<Flow>,
    pub status: StatusFilter,
    pub search_text: Option<String>,
    /// The caller's current date, anchoring the relative ranges.
    pub today: NaiveDate,
}

impl Filters {
    pub fn new(today: NaiveDate) -> Self {
        Filters {
            date_range: DateRange::All,
            category: None,
            kind: None,
            flow: None,
            status: StatusFilter::All,
            search_text: None,
            today,
        }
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_kind(mut self, kind: BillKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_flow(mut self, flow: Flow) -> Self {
        self.flow = Some(flow);
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// Lowercased search needle, `None` for absent or blank text.
    fn needle(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Filtered {
    pub records: Vec<BillRecord>,
    pub diagnostics: Diagnostics,
}

fn matches_status(record: &BillRecord, status: StatusFilter) -> bool {
    match status {
        StatusFilter::All => !record.is_draft(),
        StatusFilter::Drafts => record.is_draft(),
        StatusFilter::Returned => {
            record.status == BillStatus::Returned || record.is_returned_draft()
        }
        other => other.status() == Some(record.status),
    }
}

fn matches_search(record: &BillRecord, needle: &str) -> bool {
    format!(
        "{} {} {} {}",
        record.description, record.submitter_name, record.category, record.amount
    )
    .to_lowercase()
    .contains(needle)
}

/// [`Filters`] with the date bounds and the search needle resolved once,
/// ready to test records one at a time. Records with no parseable date are
/// kept and counted.
#[derive(Debug, Clone)]
pub struct Matcher<'a> {
    filters: &'a Filters,
    lower: Option<NaiveDate>,
    upper: Option<NaiveDate>,
    needle: Option<String>,
}

impl<'a> Matcher<'a> {
    pub fn new(filters: &'a Filters) -> Self {
        let (lower, upper) = filters.date_range.bounds(filters.today);
        Matcher {
            filters,
            lower,
            upper,
            needle: filters.needle(),
        }
    }

    pub fn matches(&self, record: &BillRecord, diagnostics: &mut Diagnostics) -> bool {
        let filters = self.filters;
        if !matches_status(record, filters.status) {
            return false;
        }
        if filters.status != StatusFilter::Drafts {
            if self.lower.is_some() || self.upper.is_some() {
                match record.effective_date() {
                    Some(d) => {
                        if self.lower.is_some_and(|l| d < l) || self.upper.is_some_and(|u| d > u)
                        {
                            return false;
                        }
                    }
                    None => diagnostics.undated += 1,
                }
            }
            if let Some(cat) = filters.category.as_deref().map(str::trim) {
                if record.category_bucket() != cat {
                    return false;
                }
            }
            if filters.kind.is_some_and(|k| k != record.kind) {
                return false;
            }
            if filters.flow.is_some_and(|f| f != record.flow) {
                return false;
            }
        }
        if let Some(needle) = self.needle.as_deref() {
            if !matches_search(record, needle) {
                return false;
            }
        }
        if (record.status == BillStatus::Returned || record.is_returned_draft())
            && !record.has_remarks()
        {
            diagnostics.returned_without_remarks += 1;
        }
        true
    }
}

/// Projection of `records` through `filters`, stable with respect to input order.
pub fn apply_filters(records: &[BillRecord], filters: &Filters) -> Filtered {
    let matcher = Matcher::new(filters);
    let mut diagnostics = Diagnostics::default();
    let records: Vec<BillRecord> = records
        .iter()
        .filter(|r| matcher.matches(r, &mut diagnostics))
        .cloned()
        .collect();
    if !diagnostics.is_clean() {
        debug!(
            kept = records.len(),
            undated = diagnostics.undated,
            returned_without_remarks = diagnostics.returned_without_remarks,
            "filtered records with data-quality fallbacks"
        );
    }
    Filtered {
        records,
        diagnostics,
    }
}

/// Newest `limit` non-draft records by entry date; undated entries sort last.
pub fn recent_activity(records: &[BillRecord], limit: usize) -> Vec<BillRecord> {
    let mut out: Vec<BillRecord> = records.iter().filter(|r| !r.is_draft()).cloned().collect();
    out.sort_by_key(|r| Reverse(r.entry_date_parsed()));
    out.truncate(limit);
    out
}
