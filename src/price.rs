// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Current market prices with a same-day cache.
//!
//! [`PriceOracle`] consults `price_cache` first and calls its
//! [`PriceSource`] at most once per code per calendar day. A failed lookup
//! is reported as `PriceUnavailable` and leaves the cache untouched.

use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::{LedgerError, Result};
use crate::models::{PriceCacheEntry, normalize_code};
use crate::utils::{http_client, round_cents};

/// Something that can quote an instrument in cents.
pub trait PriceSource {
    /// Returns `PriceUnavailable` when no usable price exists.
    fn fetch(&self, code: &str) -> Result<i64>;
}

impl<T: PriceSource + ?Sized> PriceSource for &T {
    fn fetch(&self, code: &str) -> Result<i64> {
        (**self).fetch(code)
    }
}

impl<T: PriceSource + ?Sized> PriceSource for Box<T> {
    fn fetch(&self, code: &str) -> Result<i64> {
        (**self).fetch(code)
    }
}

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    adjclose: Option<Vec<Option<f64>>>,
}

/// Picks the market price from a chart payload, falling back to the last
/// adjusted close. `None` when the payload carries no usable number.
fn extract_price(env: &ChartEnvelope) -> Option<f64> {
    let result = env.chart.result.as_ref()?.first()?;
    let from_meta = result.meta.as_ref().and_then(|m| m.regular_market_price);
    let from_close = || {
        result
            .indicators
            .as_ref()?
            .adjclose
            .as_ref()?
            .first()?
            .adjclose
            .as_ref()?
            .iter()
            .rev()
            .find_map(|p| *p)
    };
    from_meta
        .or_else(from_close)
        .filter(|p| p.is_finite() && *p > 0.0)
}

fn dollars_to_cents(code: &str, px: f64) -> Result<i64> {
    Decimal::from_f64_retain(px)
        .and_then(|d| d.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(round_cents)
        .ok_or_else(|| LedgerError::unavailable(code, format!("unrepresentable price {}", px)))
}

/// The code goes in as one percent-encoded path segment.
fn chart_url(code: &str) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(CHART_URL).map_err(|e| LedgerError::unavailable(code, e))?;
    url.path_segments_mut()
        .map_err(|_| LedgerError::unavailable(code, "chart URL cannot take a path"))?
        .push(code);
    url.query_pairs_mut()
        .append_pair("range", "1d")
        .append_pair("interval", "1d");
    Ok(url)
}

/// Yahoo Finance chart endpoint.
pub struct YahooSource {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl YahooSource {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        Ok(YahooSource {
            client: http_client(timeout)?,
            timeout,
        })
    }
}

impl PriceSource for YahooSource {
    fn fetch(&self, code: &str) -> Result<i64> {
        let url = chart_url(code)?;
        tracing::debug!(code, url = %url, "requesting quote");
        let resp = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                LedgerError::unavailable(code, format!("timed out after {:?}", self.timeout))
            } else {
                LedgerError::unavailable(code, e)
            }
        })?;
        let resp = resp
            .error_for_status()
            .map_err(|e| LedgerError::unavailable(code, e))?;
        let env: ChartEnvelope = resp
            .json()
            .map_err(|e| LedgerError::unavailable(code, format!("malformed response: {}", e)))?;
        if let Some(err) = env.chart.error.as_ref().filter(|e| !e.is_null()) {
            return Err(LedgerError::unavailable(code, err));
        }
        let px = extract_price(&env).ok_or_else(|| LedgerError::unavailable(code, "no data"))?;
        dollars_to_cents(code, px)
    }
}

pub fn cached_price(conn: &Connection, code: &str) -> Result<Option<PriceCacheEntry>> {
    Ok(conn
        .query_row(
            "SELECT code, price, last_updated FROM price_cache WHERE code=?1",
            params![normalize_code(code)],
            |r| {
                Ok(PriceCacheEntry {
                    code: r.get(0)?,
                    price: r.get(1)?,
                    last_updated: r.get(2)?,
                })
            },
        )
        .optional()?)
}

pub fn list_cached(conn: &Connection) -> Result<Vec<PriceCacheEntry>> {
    let mut stmt =
        conn.prepare("SELECT code, price, last_updated FROM price_cache ORDER BY code")?;
    let rows = stmt.query_map([], |r| {
        Ok(PriceCacheEntry {
            code: r.get(0)?,
            price: r.get(1)?,
            last_updated: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn store_price(conn: &Connection, code: &str, price: i64, day: NaiveDate) -> Result<()> {
    conn.execute(
        "INSERT INTO price_cache(code, price, last_updated) VALUES (?1, ?2, ?3)
         ON CONFLICT(code) DO UPDATE SET price=excluded.price, last_updated=excluded.last_updated",
        params![code, price, day.format("%Y-%m-%d").to_string()],
    )?;
    Ok(())
}

pub struct PriceOracle<S> {
    source: S,
    // held across check, fetch and store so one (code, day) is fetched once
    refresh: Mutex<()>,
}

impl<S: PriceSource> PriceOracle<S> {
    pub fn new(source: S) -> Self {
        PriceOracle {
            source,
            refresh: Mutex::new(()),
        }
    }

    pub fn current_price(&self, conn: &Connection, code: &str) -> Result<i64> {
        self.price_on(conn, code, Local::now().date_naive())
    }

    /// Price for `code` as of calendar day `today`.
    pub fn price_on(&self, conn: &Connection, code: &str, today: NaiveDate) -> Result<i64> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(LedgerError::InvalidInput(
                "instrument code must not be empty".into(),
            ));
        }
        let _guard = self
            .refresh
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = cached_price(conn, &code)? {
            if entry.last_updated == today {
                tracing::debug!(code = %code, price = entry.price, "price cache hit");
                return Ok(entry.price);
            }
        }

        tracing::debug!(code = %code, %today, "price cache miss");
        let price = match self.source.fetch(&code) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "price lookup failed");
                return Err(e);
            }
        };
        store_price(conn, &code, price, today)?;
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ChartEnvelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn prefers_regular_market_price() {
        let env = parse(
            r#"{"chart":{"result":[{"meta":{"regularMarketPrice":612.34},
                "indicators":{"adjclose":[{"adjclose":[600.0]}]}}],"error":null}}"#,
        );
        assert_eq!(extract_price(&env), Some(612.34));
    }

    #[test]
    fn falls_back_to_last_adjusted_close() {
        let env = parse(
            r#"{"chart":{"result":[{"meta":{},
                "indicators":{"adjclose":[{"adjclose":[98.5, 99.25, null]}]}}],"error":null}}"#,
        );
        assert_eq!(extract_price(&env), Some(99.25));
    }

    #[test]
    fn empty_payload_has_no_price() {
        let env = parse(r#"{"chart":{"result":[],"error":null}}"#);
        assert_eq!(extract_price(&env), None);
        let env = parse(r#"{"chart":{"result":null,"error":{"code":"Not Found"}}}"#);
        assert_eq!(extract_price(&env), None);
    }

    #[test]
    fn zero_is_not_a_price() {
        let env = parse(r#"{"chart":{"result":[{"meta":{"regularMarketPrice":0.0}}],"error":null}}"#);
        assert_eq!(extract_price(&env), None);
    }

    #[test]
    fn dollars_convert_to_rounded_cents() {
        assert_eq!(dollars_to_cents("IVV", 612.34).unwrap(), 61_234);
        assert_eq!(dollars_to_cents("IVV", 0.125).unwrap(), 13);
    }

    #[test]
    fn huge_price_is_unavailable_not_a_panic() {
        assert!(dollars_to_cents("IVV", 7.0e28).unwrap_err().is_price_unavailable());
    }

    #[test]
    fn chart_url_encodes_the_code_as_one_segment() {
        let url = chart_url("VGS.AX").unwrap();
        assert_eq!(
            url.as_str(),
            "https://query1.finance.yahoo.com/v8/finance/chart/VGS.AX?range=1d&interval=1d"
        );
        let url = chart_url("A/B?C#D").unwrap();
        assert!(url.path().ends_with("/chart/A%2FB%3FC%23D"));
        assert_eq!(url.query(), Some("range=1d&interval=1d"));
    }
}
