// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Demo data for trying the CLI on an empty ledger.

use crate::models::{NewCategory, NewInvestment, NewRecord};
use crate::query::list_categories;
use crate::store::{insert_category, insert_investment, insert_record};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let (categories, records, lots) = seed(conn)?;
    println!(
        "Seeded {} categories, {} records and {} investments",
        categories, records, lots
    );
    Ok(())
}

fn day(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow::anyhow!("bad seed date {y}-{m}-{d}"))
}

/// Inserts the demo set inside one transaction. Refuses to touch a ledger
/// that already has categories.
pub fn seed(conn: &Connection) -> Result<(usize, usize, usize)> {
    if !list_categories(conn)?.is_empty() {
        bail!("Ledger already has categories; seed only runs on an empty ledger");
    }
    let tx = conn.unchecked_transaction()?;

    let mut ids = Vec::new();
    for (name, is_income, description) in [
        ("Work", true, "Salary and wages"),
        ("Allowance", true, ""),
        ("Groceries", false, "Supermarket and markets"),
        ("Entertainment", false, ""),
        ("Gifts", false, ""),
    ] {
        ids.push(insert_category(
            &tx,
            &NewCategory {
                name: name.into(),
                is_income,
                description: description.into(),
            },
        )?);
    }
    let (work, allowance, groceries, fun, gifts) = (ids[0], ids[1], ids[2], ids[3], ids[4]);

    let records = [
        (day(2024, 10, 1)?, "October pay", 480_000, work),
        (day(2024, 10, 3)?, "Weekly shop", -8_750, groceries),
        (day(2024, 10, 12)?, "Cinema", -3_200, fun),
        (day(2024, 10, 20)?, "Pocket money", 5_000, allowance),
        (day(2024, 11, 1)?, "November pay", 500_000, work),
        (day(2024, 11, 4)?, "Weekly shop", -9_120, groceries),
        (day(2024, 11, 18)?, "Birthday present", -4_500, gifts),
        (day(2024, 12, 1)?, "December pay", 480_000, work),
        (day(2024, 12, 14)?, "Concert tickets", -15_000, fun),
        (day(2024, 12, 22)?, "Christmas presents", -22_000, gifts),
    ];
    for (date, description, amount, category) in records {
        insert_record(
            &tx,
            &NewRecord {
                date,
                description: description.into(),
                amount,
                category_id: Some(category),
            },
        )?;
    }

    let lots = [
        (day(2024, 9, 2)?, "IVV", Decimal::new(20, 0), 60_000),
        (day(2024, 10, 7)?, "VGS.AX", Decimal::new(155, 1), 13_215),
        (day(2024, 12, 2)?, "IVV", Decimal::new(5, 0), 62_450),
    ];
    for (date, code, quantity, unit_price) in lots {
        insert_investment(
            &tx,
            &NewInvestment {
                date,
                code: code.into(),
                quantity,
                unit_price,
            },
        )?;
    }

    tx.commit()?;
    tracing::info!("seeded demo ledger");
    Ok((ids.len(), records.len(), lots.len()))
}
