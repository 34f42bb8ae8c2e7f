// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::time::Duration;

const UA: &str = concat!("tallybook/", env!("CARGO_PKG_VERSION"));

pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(UA)
        .build()
}

static SHORT_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:(?P<y>\d{4})-)?(?P<m>\d{1,2})-)?(?P<d>\d{1,2})$")
        .expect("static date pattern")
});

/// Accepts `YYYY-MM-DD`, `MM-DD` (year of `today`), `DD` (month of `today`),
/// and blank or `today`.
pub fn parse_date_relative(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    let caps = SHORT_DATE.captures(s).ok_or_else(|| {
        anyhow!(
            "Invalid date '{}', expected YYYY-MM-DD, MM-DD (this year) or DD (this month)",
            s
        )
    })?;
    let num = |name: &str| caps.name(name).map(|m| m.as_str().parse::<u32>());
    let day = num("d").transpose()?.unwrap_or(today.day());
    let month = num("m").transpose()?.unwrap_or(today.month());
    let year = match caps.name("y") {
        Some(y) => y.as_str().parse::<i32>()?,
        None => today.year(),
    };
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow!("Invalid date '{}': no such calendar day", s))
}

pub fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

pub fn parse_year(s: &str) -> Result<i32> {
    let year: i32 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid year '{}'", s))?;
    if !(1..=9998).contains(&year) {
        return Err(anyhow!("Year {} out of range", year));
    }
    Ok(year)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Parses a currency amount such as `-12.34` into cents. More than two
/// decimal places is rejected rather than rounded.
pub fn parse_amount(s: &str) -> Result<i64> {
    let d = parse_decimal(s.trim().trim_start_matches('$'))?;
    if d.scale() > 2 && d.normalize().scale() > 2 {
        return Err(anyhow!("Amount '{}' has more than two decimal places", s));
    }
    d.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|c| c.to_i64())
        .ok_or_else(|| anyhow!("Amount '{}' is out of range", s))
}

/// Rounds a cent-denominated decimal half away from zero.
pub fn round_cents(d: Decimal) -> Option<i64> {
    d.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Plain decimal form for exports, e.g. `-12.34`.
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn fmt_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}

/// Missing values render as a dash, never as `$0.00`.
pub fn fmt_optional_cents(cents: Option<i64>) -> String {
    cents.map(fmt_cents).unwrap_or_else(|| "—".to_string())
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn relative_dates_fill_from_today() {
        let today = day(2025, 3, 14);
        assert_eq!(parse_date_relative("", today).unwrap(), today);
        assert_eq!(parse_date_relative("today", today).unwrap(), today);
        assert_eq!(parse_date_relative("7", today).unwrap(), day(2025, 3, 7));
        assert_eq!(parse_date_relative("11-05", today).unwrap(), day(2025, 11, 5));
        assert_eq!(
            parse_date_relative("2024-11-05", today).unwrap(),
            day(2024, 11, 5)
        );
    }

    #[test]
    fn relative_dates_reject_impossible_days() {
        let today = day(2025, 2, 1);
        assert!(parse_date_relative("30", today).is_err());
        assert!(parse_date_relative("2025/01/01", today).is_err());
    }

    #[test]
    fn amounts_parse_to_cents() {
        assert_eq!(parse_amount("500").unwrap(), 50_000);
        assert_eq!(parse_amount("-12.34").unwrap(), -1_234);
        assert_eq!(parse_amount("$0.5").unwrap(), 50);
        assert_eq!(parse_amount("1.500").unwrap(), 150);
        assert!(parse_amount("1.234").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn oversized_amounts_are_errors() {
        assert!(parse_amount("79228162514264337593543950335").is_err());
        assert!(parse_amount("92233720368547758.08").is_err());
    }

    #[test]
    fn cents_format_with_sign_before_symbol() {
        assert_eq!(fmt_cents(50_000), "$500.00");
        assert_eq!(fmt_cents(-5), "-$0.05");
        assert_eq!(fmt_optional_cents(None), "—");
    }

    #[test]
    fn round_cents_goes_half_away_from_zero() {
        assert_eq!(round_cents(Decimal::new(125, 1)), Some(13));
        assert_eq!(round_cents(Decimal::new(-125, 1)), Some(-13));
    }
}
