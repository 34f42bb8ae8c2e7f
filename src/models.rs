// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rows::DELETED_ID;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub is_income: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub is_income: bool,
    pub description: String,
}

impl From<&Category> for NewCategory {
    fn from(c: &Category) -> Self {
        NewCategory {
            name: c.name.clone(),
            is_income: c.is_income,
            description: c.description.clone(),
        }
    }
}

/// A ledger entry. `amount` is in cents and its sign is whatever was entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: i64,
    /// `None` once the owning category has been deleted.
    pub category_id: Option<i64>,
}

impl Record {
    /// Category id for rendering; detached records carry the deleted sentinel.
    pub fn category_tag(&self) -> i64 {
        self.category_id.unwrap_or(DELETED_ID)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub date: NaiveDate,
    pub description: String,
    pub amount: i64,
    pub category_id: Option<i64>,
}

impl From<&Record> for NewRecord {
    fn from(r: &Record) -> Self {
        NewRecord {
            date: r.date,
            description: r.description.clone(),
            amount: r.amount,
            category_id: r.category_id,
        }
    }
}

/// A purchase lot. `unit_price` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    pub id: i64,
    pub date: NaiveDate,
    pub code: String,
    pub quantity: Decimal,
    pub unit_price: i64,
}

impl Investment {
    /// Purchase cost in cents, exact. `None` when the product leaves the
    /// decimal range.
    pub fn cost(&self) -> Option<Decimal> {
        self.quantity.checked_mul(Decimal::from(self.unit_price))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvestment {
    pub date: NaiveDate,
    pub code: String,
    pub quantity: Decimal,
    pub unit_price: i64,
}

impl From<&Investment> for NewInvestment {
    fn from(i: &Investment) -> Self {
        NewInvestment {
            date: i.date,
            code: i.code.clone(),
            quantity: i.quantity,
            unit_price: i.unit_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCacheEntry {
    pub code: String,
    pub price: i64,
    pub last_updated: NaiveDate,
}

/// Instrument codes are matched case-insensitively; `vgs.ax` and `VGS.AX` are one instrument.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn investment_cost_is_exact() {
        let lot = Investment {
            id: 1,
            date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            code: "IVV".into(),
            quantity: Decimal::from_str("2.5").unwrap(),
            unit_price: 60_001,
        };
        assert_eq!(lot.cost(), Some(Decimal::from_str("150002.5").unwrap()));
    }

    #[test]
    fn detached_record_tags_as_deleted() {
        let rec = Record {
            id: 7,
            date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            description: "old".into(),
            amount: -100,
            category_id: None,
        };
        assert_eq!(rec.category_tag(), DELETED_ID);
    }

    #[test]
    fn codes_normalize_to_upper() {
        assert_eq!(normalize_code("  vgs.ax "), "VGS.AX");
    }
}
