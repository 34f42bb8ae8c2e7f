// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// The oracle could not produce a price. Callers must not treat this as zero.
    #[error("price unavailable for {code}: {reason}")]
    PriceUnavailable { code: String, reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid stored data: {0}")]
    InvalidData(String),

    #[error("storage unavailable: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        LedgerError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn unavailable(code: &str, reason: impl ToString) -> Self {
        LedgerError::PriceUnavailable {
            code: code.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound { .. })
    }

    pub fn is_price_unavailable(&self) -> bool {
        matches!(self, LedgerError::PriceUnavailable { .. })
    }
}
