// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-instrument investment summary.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{LedgerError, Result};
use crate::filter::FilterCriteria;
use crate::price::{PriceOracle, PriceSource};
use crate::query::all_investments;
use crate::utils::round_cents;

/// Lots of one code folded together, before any market price is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub code: String,
    pub quantity: Decimal,
    /// Exact total cost in cents.
    pub cost: Decimal,
}

impl Position {
    /// Quantity-weighted average purchase price in cents.
    pub fn avg_buy_price(&self) -> Option<i64> {
        if self.quantity.is_zero() {
            return None;
        }
        self.cost.checked_div(self.quantity).and_then(round_cents)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holding {
    pub code: String,
    pub quantity: Decimal,
    pub avg_buy_price: i64,
    pub total_in: i64,
    /// `None` when the price could not be resolved; every column derived
    /// from it is `None` too.
    pub current_price: Option<i64>,
    pub current_value: Option<i64>,
    pub profit: Option<i64>,
    pub profit_pct: Option<Decimal>,
}

pub fn positions(conn: &Connection) -> Result<Vec<Position>> {
    let mut by_code: BTreeMap<String, Position> = BTreeMap::new();
    for lot in all_investments(conn, &FilterCriteria::default())? {
        let overflow = || LedgerError::InvalidData(format!("{} position is out of range", lot.code));
        let cost = lot.cost().ok_or_else(overflow)?;
        let p = by_code.entry(lot.code.clone()).or_insert_with(|| Position {
            code: lot.code.clone(),
            quantity: Decimal::ZERO,
            cost: Decimal::ZERO,
        });
        p.quantity = p.quantity.checked_add(lot.quantity).ok_or_else(overflow)?;
        p.cost = p.cost.checked_add(cost).ok_or_else(overflow)?;
    }
    Ok(by_code.into_values().collect())
}

fn out_of_range(code: &str) -> LedgerError {
    LedgerError::InvalidData(format!("{} total out of range", code))
}

fn cents(code: &str, d: Decimal) -> Result<i64> {
    round_cents(d).ok_or_else(|| out_of_range(code))
}

/// Prices a position. `price` of `None` yields a holding with no
/// value-derived columns rather than a zero valuation.
pub fn holding(position: &Position, price: Option<i64>) -> Result<Holding> {
    let total_in = cents(&position.code, position.cost)?;
    let avg_buy_price = position.avg_buy_price().unwrap_or(0);
    let (current_value, profit, profit_pct) = match price {
        None => (None, None, None),
        Some(px) => {
            let value = position
                .quantity
                .checked_mul(Decimal::from(px))
                .ok_or_else(|| out_of_range(&position.code))
                .and_then(|v| cents(&position.code, v))?;
            let profit = value
                .checked_sub(total_in)
                .ok_or_else(|| out_of_range(&position.code))?;
            let pct = if total_in == 0 {
                None
            } else {
                (Decimal::from(profit) * Decimal::ONE_HUNDRED)
                    .checked_div(Decimal::from(total_in))
                    .map(|p| p.round_dp(2))
            };
            (Some(value), Some(profit), pct)
        }
    };
    Ok(Holding {
        code: position.code.clone(),
        quantity: position.quantity,
        avg_buy_price,
        total_in,
        current_price: price,
        current_value,
        profit,
        profit_pct,
    })
}

/// One row per code, ascending. Price lookups that come back unavailable
/// leave that holding unpriced; any other error aborts the summary.
pub fn investment_summary<S: PriceSource>(
    conn: &Connection,
    oracle: &PriceOracle<S>,
    today: NaiveDate,
) -> Result<Vec<Holding>> {
    let mut out = Vec::new();
    for position in positions(conn)? {
        let price = match oracle.price_on(conn, &position.code, today) {
            Ok(px) => Some(px),
            Err(e) if e.is_price_unavailable() => None,
            Err(e) => return Err(e),
        };
        out.push(holding(&position, price)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn position(qty: &str, cost: i64) -> Position {
        Position {
            code: "IVV".into(),
            quantity: Decimal::from_str(qty).unwrap(),
            cost: Decimal::from(cost),
        }
    }

    #[test]
    fn priced_holding_computes_profit() {
        // 20 units bought for $12,000.00 total, now $650.00 each
        let h = holding(&position("20", 1_200_000), Some(65_000)).unwrap();
        assert_eq!(h.avg_buy_price, 60_000);
        assert_eq!(h.total_in, 1_200_000);
        assert_eq!(h.current_value, Some(1_300_000));
        assert_eq!(h.profit, Some(100_000));
        assert_eq!(h.profit_pct, Some(Decimal::from_str("8.33").unwrap()));
    }

    #[test]
    fn unpriced_holding_has_no_valuation() {
        let h = holding(&position("5", 300_000), None).unwrap();
        assert_eq!(h.total_in, 300_000);
        assert_eq!(h.current_price, None);
        assert_eq!(h.current_value, None);
        assert_eq!(h.profit, None);
        assert_eq!(h.profit_pct, None);
    }

    #[test]
    fn fractional_quantities_average_exactly() {
        let p = position("2.5", 150_001);
        assert_eq!(p.avg_buy_price(), Some(60_000));
    }
}
