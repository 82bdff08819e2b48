// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error type shared by the reconciliation core and the bill-store boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The caller handed over something that is not a usable input at all:
    /// not a collection of bill objects, an unknown enum spelling, a negative
    /// amount, or an inverted date range. Programmer error, never recovered.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bill store returned {status}: {message}")]
    Remote { status: u16, message: String },
}

impl LedgerError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        LedgerError::InvalidInput(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, LedgerError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
