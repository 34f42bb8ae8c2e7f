// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::today;
use crate::config::Settings;
use crate::error::LedgerError;
use crate::models::normalize_code;
use crate::price::{PriceOracle, YahooSource, list_cached};
use crate::utils::{fmt_cents, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let code = normalize_code(sub.get_one::<String>("code").unwrap());
            let settings = Settings::load(conn)?;
            let oracle = PriceOracle::new(YahooSource::new(settings.price_timeout())?);
            match oracle.price_on(conn, &code, today()) {
                Ok(price) => println!("{} {}", code, fmt_cents(price)),
                Err(LedgerError::PriceUnavailable { reason, .. }) => {
                    println!("{} —", code);
                    eprintln!("price unavailable: {}", reason);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Some(("list", sub)) => {
            let entries = list_cached(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &entries)? {
                let rows = entries
                    .into_iter()
                    .map(|e| vec![e.code, fmt_cents(e.price), e.last_updated.to_string()])
                    .collect();
                println!("{}", pretty_table(&["Code", "Price", "Updated"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
