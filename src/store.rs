// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Create/update/delete for categories, records and investment lots.
//!
//! Updates fail with `NotFound` for a missing id; deletes are idempotent.
//! Deleting a category detaches its records instead of removing them.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::{
    Category, Investment, NewCategory, NewInvestment, NewRecord, Record, normalize_code,
};
use crate::utils::round_cents;

fn sql_date(d: chrono::NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn category_name(cat: &NewCategory) -> Result<&str> {
    let name = cat.name.trim();
    if name.is_empty() {
        return Err(LedgerError::InvalidInput(
            "category name must not be empty".into(),
        ));
    }
    Ok(name)
}

/// Names are unique; a clash is the caller's input, not a storage fault.
fn name_clash(e: rusqlite::Error, name: &str) -> LedgerError {
    match e {
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            LedgerError::InvalidInput(format!("category '{}' already exists", name))
        }
        other => other.into(),
    }
}

pub fn insert_category(conn: &Connection, cat: &NewCategory) -> Result<i64> {
    let name = category_name(cat)?;
    conn.execute(
        "INSERT INTO categories(name, is_income, description) VALUES (?1, ?2, ?3)",
        params![name, cat.is_income, cat.description.trim()],
    )
    .map_err(|e| name_clash(e, name))?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, name, is_income = cat.is_income, "category inserted");
    Ok(id)
}

pub fn update_category(conn: &Connection, id: i64, cat: &NewCategory) -> Result<()> {
    let name = category_name(cat)?;
    let changed = conn
        .execute(
            "UPDATE categories SET name=?1, is_income=?2, description=?3 WHERE id=?4",
            params![name, cat.is_income, cat.description.trim(), id],
        )
        .map_err(|e| name_clash(e, name))?;
    if changed == 0 {
        return Err(LedgerError::not_found("category", id));
    }
    tracing::debug!(id, "category updated");
    Ok(())
}

/// Removes the category and clears the reference on every record that used it.
pub fn delete_category(conn: &Connection, id: i64) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let detached = tx.execute(
        "UPDATE records SET category_id=NULL WHERE category_id=?1",
        params![id],
    )?;
    let removed = tx.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    tx.commit()?;
    if removed > 0 {
        tracing::info!(id, detached, "category deleted");
    }
    Ok(())
}

pub fn category_by_id(conn: &Connection, id: i64) -> Result<Category> {
    conn.query_row(
        "SELECT id, name, is_income, description FROM categories WHERE id=?1",
        params![id],
        |r| {
            Ok(Category {
                id: r.get(0)?,
                name: r.get(1)?,
                is_income: r.get(2)?,
                description: r.get(3)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| LedgerError::not_found("category", id))
}

pub fn category_id_by_name(conn: &Connection, name: &str) -> Result<i64> {
    let name = name.trim();
    conn.query_row(
        "SELECT id FROM categories WHERE name=?1 COLLATE NOCASE",
        params![name],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| LedgerError::not_found("category", name))
}

fn ensure_category(conn: &Connection, category_id: Option<i64>) -> Result<()> {
    if let Some(id) = category_id {
        let exists: Option<i64> = conn
            .query_row("SELECT 1 FROM categories WHERE id=?1", params![id], |r| {
                r.get(0)
            })
            .optional()?;
        if exists.is_none() {
            return Err(LedgerError::not_found("category", id));
        }
    }
    Ok(())
}

pub fn insert_record(conn: &Connection, rec: &NewRecord) -> Result<i64> {
    ensure_category(conn, rec.category_id)?;
    conn.execute(
        "INSERT INTO records(date, description, amount, category_id) VALUES (?1, ?2, ?3, ?4)",
        params![
            sql_date(rec.date),
            rec.description.trim(),
            rec.amount,
            rec.category_id
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, date = %rec.date, amount = rec.amount, "record inserted");
    Ok(id)
}

pub fn update_record(conn: &Connection, id: i64, rec: &NewRecord) -> Result<()> {
    ensure_category(conn, rec.category_id)?;
    let changed = conn.execute(
        "UPDATE records SET date=?1, description=?2, amount=?3, category_id=?4 WHERE id=?5",
        params![
            sql_date(rec.date),
            rec.description.trim(),
            rec.amount,
            rec.category_id,
            id
        ],
    )?;
    if changed == 0 {
        return Err(LedgerError::not_found("record", id));
    }
    tracing::debug!(id, "record updated");
    Ok(())
}

pub fn record_by_id(conn: &Connection, id: i64) -> Result<Record> {
    conn.query_row(
        "SELECT id, date, description, amount, category_id FROM records WHERE id=?1",
        params![id],
        |r| {
            Ok(Record {
                id: r.get(0)?,
                date: r.get(1)?,
                description: r.get(2)?,
                amount: r.get(3)?,
                category_id: r.get(4)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| LedgerError::not_found("record", id))
}

pub fn delete_record(conn: &Connection, id: i64) -> Result<()> {
    let removed = conn.execute("DELETE FROM records WHERE id=?1", params![id])?;
    tracing::debug!(id, removed, "record delete");
    Ok(())
}

fn checked_lot(inv: &NewInvestment) -> Result<String> {
    let code = normalize_code(&inv.code);
    if code.is_empty() {
        return Err(LedgerError::InvalidInput(
            "instrument code must not be empty".into(),
        ));
    }
    if inv.quantity.is_sign_negative() || inv.quantity.is_zero() {
        return Err(LedgerError::InvalidInput(format!(
            "quantity must be positive, got {}",
            inv.quantity
        )));
    }
    if inv
        .quantity
        .checked_mul(Decimal::from(inv.unit_price))
        .and_then(round_cents)
        .is_none()
    {
        return Err(LedgerError::InvalidInput(format!(
            "{} x {} cents is too large a lot cost",
            inv.quantity, inv.unit_price
        )));
    }
    Ok(code)
}

pub fn insert_investment(conn: &Connection, inv: &NewInvestment) -> Result<i64> {
    let code = checked_lot(inv)?;
    conn.execute(
        "INSERT INTO investments(date, code, quantity, unit_price) VALUES (?1, ?2, ?3, ?4)",
        params![
            sql_date(inv.date),
            code,
            inv.quantity.normalize().to_string(),
            inv.unit_price
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, code = %code, "investment inserted");
    Ok(id)
}

pub fn update_investment(conn: &Connection, id: i64, inv: &NewInvestment) -> Result<()> {
    let code = checked_lot(inv)?;
    let changed = conn.execute(
        "UPDATE investments SET date=?1, code=?2, quantity=?3, unit_price=?4 WHERE id=?5",
        params![
            sql_date(inv.date),
            code,
            inv.quantity.normalize().to_string(),
            inv.unit_price,
            id
        ],
    )?;
    if changed == 0 {
        return Err(LedgerError::not_found("investment", id));
    }
    tracing::debug!(id, "investment updated");
    Ok(())
}

pub fn investment_by_id(conn: &Connection, id: i64) -> Result<Investment> {
    let row = conn
        .query_row(
            "SELECT id, date, code, quantity, unit_price FROM investments WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, chrono::NaiveDate>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, i64>(4)?,
                ))
            },
        )
        .optional()?;
    let (date, code, qty_s, unit_price) = row.ok_or_else(|| LedgerError::not_found("investment", id))?;
    let quantity = Decimal::from_str_exact(&qty_s).map_err(|e| {
        LedgerError::InvalidData(format!("investment {} has quantity '{}': {}", id, qty_s, e))
    })?;
    Ok(Investment {
        id,
        date,
        code,
        quantity,
        unit_price,
    })
}

pub fn delete_investment(conn: &Connection, id: i64) -> Result<()> {
    let removed = conn.execute("DELETE FROM investments WHERE id=?1", params![id])?;
    tracing::debug!(id, removed, "investment delete");
    Ok(())
}
