// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Filter criteria and the predicate nodes they compile to.
//!
//! Query text is assembled only from fixed fragments owned by each
//! [`Predicate`] variant; every user-supplied value is bound as a parameter.
//! Category membership binds the whole id set as one `rarray()` parameter,
//! so the statement text is the same whatever the set size.

use chrono::NaiveDate;
use rusqlite::ToSql;
use rusqlite::types::Value;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::error::{LedgerError, Result};

pub fn earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn latest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Conjunctive row filter. Dates are `[start_date, end_date)`; amounts are
/// inclusive cents. For investments the amount bounds apply to lot cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub min_amount: i64,
    pub max_amount: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Empty means every category (and detached records).
    pub category_ids: BTreeSet<i64>,
    /// Empty means every code; matched case-insensitively.
    pub code_substring: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            min_amount: i64::MIN,
            max_amount: i64::MAX,
            start_date: earliest_date(),
            end_date: latest_date(),
            category_ids: BTreeSet::new(),
            code_substring: String::new(),
        }
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_amount(mut self, cents: i64) -> Self {
        self.min_amount = cents;
        self
    }

    pub fn with_max_amount(mut self, cents: i64) -> Self {
        self.max_amount = cents;
        self
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = date;
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = date;
        self
    }

    pub fn with_categories(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.category_ids = ids.into_iter().collect();
        self
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code_substring = code.trim().to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.end_date < self.start_date {
            return Err(LedgerError::InvalidFilter(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        if self.max_amount < self.min_amount {
            return Err(LedgerError::InvalidFilter(format!(
                "maximum amount {} is below minimum amount {}",
                self.max_amount, self.min_amount
            )));
        }
        Ok(())
    }

    pub fn bounds_amount(&self) -> bool {
        self.min_amount != i64::MIN || self.max_amount != i64::MAX
    }

    /// Lot cost check, done in exact decimal arithmetic.
    pub fn admits_cost(&self, cost: Decimal) -> bool {
        cost >= Decimal::from(self.min_amount) && cost <= Decimal::from(self.max_amount)
    }

    pub fn record_predicates(&self) -> Vec<Predicate> {
        let mut preds = vec![
            Predicate::AmountBetween {
                min: self.min_amount,
                max: self.max_amount,
            },
            Predicate::DateFrom(self.start_date),
            Predicate::DateBefore(self.end_date),
        ];
        if !self.category_ids.is_empty() {
            preds.push(Predicate::CategoryIn(
                self.category_ids.iter().copied().collect(),
            ));
        }
        preds
    }

    /// Cost bounds are not included; see [`FilterCriteria::admits_cost`].
    pub fn investment_predicates(&self) -> Vec<Predicate> {
        let mut preds = vec![
            Predicate::DateFrom(self.start_date),
            Predicate::DateBefore(self.end_date),
        ];
        if !self.code_substring.is_empty() {
            preds.push(Predicate::CodeContains(self.code_substring.clone()));
        }
        preds
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    AmountBetween { min: i64, max: i64 },
    DateFrom(NaiveDate),
    DateBefore(NaiveDate),
    CategoryIn(Vec<i64>),
    CodeContains(String),
}

impl Predicate {
    fn fragment(&self) -> &'static str {
        match self {
            Predicate::AmountBetween { .. } => "amount BETWEEN ? AND ?",
            Predicate::DateFrom(_) => "date >= ?",
            Predicate::DateBefore(_) => "date < ?",
            Predicate::CategoryIn(_) => "category_id IN rarray(?)",
            Predicate::CodeContains(_) => "instr(upper(code), upper(?)) > 0",
        }
    }

    fn bind(&self, params: &mut Vec<Box<dyn ToSql>>) {
        match self {
            Predicate::AmountBetween { min, max } => {
                params.push(Box::new(*min));
                params.push(Box::new(*max));
            }
            Predicate::DateFrom(d) | Predicate::DateBefore(d) => {
                params.push(Box::new(d.format("%Y-%m-%d").to_string()));
            }
            Predicate::CategoryIn(ids) => {
                let set: Vec<Value> = ids.iter().map(|id| Value::Integer(*id)).collect();
                params.push(Box::new(Rc::new(set)));
            }
            Predicate::CodeContains(s) => params.push(Box::new(s.clone())),
        }
    }
}

/// A compiled `WHERE` body plus its positional parameters.
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<Box<dyn ToSql>>,
}

impl WhereClause {
    pub fn param_refs(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

pub fn compile(predicates: &[Predicate]) -> WhereClause {
    if predicates.is_empty() {
        return WhereClause {
            sql: "1=1".to_string(),
            params: Vec::new(),
        };
    }
    let mut params = Vec::new();
    let parts: Vec<&str> = predicates
        .iter()
        .map(|p| {
            p.bind(&mut params);
            p.fragment()
        })
        .collect();
    WhereClause {
        sql: parts.join(" AND "),
        params,
    }
}
