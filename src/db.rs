// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Context;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.tallybook", "Tallybook", "tallybook"));

pub fn db_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("tallybook.sqlite"))
}

/// Opens the ledger at `path` (or the platform default) and bootstraps the schema.
pub fn open_or_init(path: Option<&Path>) -> anyhow::Result<Connection> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => db_path()?,
    };
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    rusqlite::vtab::array::load_module(&conn)?;
    init_schema(&conn).with_context(|| format!("Initialise schema at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "ledger opened");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    rusqlite::vtab::array::load_module(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Creates the tables if missing. Connections that run filtered queries also
/// need `rarray()` registered, which both `open_*` functions do.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        is_income INTEGER NOT NULL CHECK(is_income IN (0, 1)),
        description TEXT NOT NULL DEFAULT ''
    );

    -- amount is signed, in minor units (cents)
    CREATE TABLE IF NOT EXISTS records(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        amount INTEGER NOT NULL,
        category_id INTEGER,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_records_date ON records(date);
    CREATE INDEX IF NOT EXISTS idx_records_category ON records(category_id);

    -- quantity is an exact decimal stored as text, unit_price in minor units
    CREATE TABLE IF NOT EXISTS investments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        code TEXT NOT NULL,
        quantity TEXT NOT NULL,
        unit_price INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_investments_date ON investments(date);

    CREATE TABLE IF NOT EXISTS price_cache(
        code TEXT PRIMARY KEY,
        price INTEGER NOT NULL,
        last_updated TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}
