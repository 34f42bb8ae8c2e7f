// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::time::Duration;

use crate::error::{LedgerError, Result};
use crate::pagination::PageSize;

pub const DEFAULT_PAGE_SIZE: usize = 15;
pub const DEFAULT_PRICE_TIMEOUT_SECS: u64 = 5;

const PAGE_SIZE_KEY: &str = "page_size";
const PRICE_TIMEOUT_KEY: &str = "price_timeout_secs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub page_size: PageSize,
    pub price_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            page_size: PageSize::default(),
            price_timeout_secs: DEFAULT_PRICE_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Reads stored settings; unparsable values fall back to defaults.
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut s = Settings::default();
        if let Some(raw) = get_setting(conn, PAGE_SIZE_KEY)? {
            match raw.parse::<usize>().ok().and_then(PageSize::new) {
                Some(ps) => s.page_size = ps,
                None => tracing::warn!(value = %raw, "ignoring invalid stored page_size"),
            }
        }
        if let Some(raw) = get_setting(conn, PRICE_TIMEOUT_KEY)? {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => s.price_timeout_secs = secs,
                _ => tracing::warn!(value = %raw, "ignoring invalid stored price_timeout_secs"),
            }
        }
        Ok(s)
    }

    pub fn price_timeout(&self) -> Duration {
        Duration::from_secs(self.price_timeout_secs)
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn set_page_size(conn: &Connection, rows: usize) -> Result<PageSize> {
    let ps = PageSize::new(rows)
        .ok_or_else(|| LedgerError::InvalidInput("page size must be at least 1".into()))?;
    set_setting(conn, PAGE_SIZE_KEY, &rows.to_string())?;
    Ok(ps)
}

pub fn set_price_timeout(conn: &Connection, secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(LedgerError::InvalidInput(
            "price timeout must be at least one second".into(),
        ));
    }
    set_setting(conn, PRICE_TIMEOUT_KEY, &secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[test]
    fn defaults_apply_on_empty_settings() {
        let conn = open_in_memory().unwrap();
        let s = Settings::load(&conn).unwrap();
        assert_eq!(s.page_size.get(), DEFAULT_PAGE_SIZE);
        assert_eq!(s.price_timeout(), Duration::from_secs(DEFAULT_PRICE_TIMEOUT_SECS));
    }

    #[test]
    fn stored_values_round_trip() {
        let conn = open_in_memory().unwrap();
        set_page_size(&conn, 40).unwrap();
        set_price_timeout(&conn, 3).unwrap();
        let s = Settings::load(&conn).unwrap();
        assert_eq!(s.page_size.get(), 40);
        assert_eq!(s.price_timeout_secs, 3);
    }

    #[test]
    fn zero_values_are_rejected() {
        let conn = open_in_memory().unwrap();
        assert!(matches!(
            set_page_size(&conn, 0),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(set_price_timeout(&conn, 0).is_err());
    }

    #[test]
    fn garbage_in_settings_table_falls_back() {
        let conn = open_in_memory().unwrap();
        set_setting(&conn, "page_size", "zero").unwrap();
        let s = Settings::load(&conn).unwrap();
        assert_eq!(s.page_size.get(), DEFAULT_PAGE_SIZE);
    }
}
