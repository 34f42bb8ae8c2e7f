// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Settings, set_page_size, set_price_timeout};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let s = Settings::load(conn)?;
            println!(
                "{}",
                pretty_table(
                    &["Key", "Value"],
                    vec![
                        vec!["page_size".into(), s.page_size.get().to_string()],
                        vec!["price_timeout_secs".into(), s.price_timeout_secs.to_string()],
                    ],
                )
            );
        }
        Some(("set-page-size", sub)) => {
            let ps = set_page_size(conn, *sub.get_one::<usize>("rows").unwrap())?;
            println!("Page size set to {}", ps.get());
        }
        Some(("set-price-timeout", sub)) => {
            let secs = *sub.get_one::<u64>("secs").unwrap();
            set_price_timeout(conn, secs)?;
            println!("Price timeout set to {}s", secs);
        }
        _ => {}
    }
    Ok(())
}
