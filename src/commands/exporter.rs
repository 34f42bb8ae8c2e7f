// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::filter::FilterCriteria;
use crate::query::{all_investments, all_records, list_categories};
use crate::utils::cents_to_decimal;
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("records", sub)) => {
            let (fmt, out) = target(sub)?;
            let n = export_records(conn, &fmt, Path::new(&out))?;
            println!("Exported {} records to {}", n, out);
        }
        Some(("investments", sub)) => {
            let (fmt, out) = target(sub)?;
            let n = export_investments(conn, &fmt, Path::new(&out))?;
            println!("Exported {} investments to {}", n, out);
        }
        _ => {}
    }
    Ok(())
}

fn target(sub: &clap::ArgMatches) -> Result<(String, String)> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".into());
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let out = sub.get_one::<String>("out").unwrap().clone();
    Ok((fmt, out))
}

/// Writes every record, oldest first. Returns the number written.
pub fn export_records(conn: &Connection, fmt: &str, out: &Path) -> Result<usize> {
    let names: HashMap<i64, String> = list_categories(conn)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let mut records = all_records(conn, &FilterCriteria::default())?;
    records.reverse();

    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "description", "amount", "category"])?;
            for r in &records {
                let category = r
                    .category_id
                    .and_then(|id| names.get(&id).cloned())
                    .unwrap_or_default();
                wtr.write_record([
                    r.id.to_string(),
                    r.date.to_string(),
                    r.description.clone(),
                    cents_to_decimal(r.amount).to_string(),
                    category,
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = records
                .iter()
                .map(|r| {
                    json!({
                        "id": r.id,
                        "date": r.date,
                        "description": r.description,
                        "amount": cents_to_decimal(r.amount).to_string(),
                        "category": r.category_id.and_then(|id| names.get(&id)),
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(records.len())
}

/// Writes every investment lot, oldest first. Returns the number written.
pub fn export_investments(conn: &Connection, fmt: &str, out: &Path) -> Result<usize> {
    let mut lots = all_investments(conn, &FilterCriteria::default())?;
    lots.reverse();

    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "code", "quantity", "unit_price"])?;
            for lot in &lots {
                wtr.write_record([
                    lot.id.to_string(),
                    lot.date.to_string(),
                    lot.code.clone(),
                    lot.quantity.normalize().to_string(),
                    cents_to_decimal(lot.unit_price).to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = lots
                .iter()
                .map(|lot| {
                    json!({
                        "id": lot.id,
                        "date": lot.date,
                        "code": lot.code,
                        "quantity": lot.quantity.normalize().to_string(),
                        "unit_price": cents_to_decimal(lot.unit_price).to_string(),
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(lots.len())
}
