// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod exporter;
pub mod investments;
pub mod prices;
pub mod records;
pub mod seed;
pub mod settings;
pub mod summary;

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

use crate::filter::FilterCriteria;
use crate::pagination::PageSize;
use crate::store::category_id_by_name;
use crate::utils::{parse_amount, parse_date_relative};

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn date_arg(sub: &clap::ArgMatches, name: &str) -> Result<Option<NaiveDate>> {
    sub.get_one::<String>(name)
        .map(|s| parse_date_relative(s, today()))
        .transpose()
}

pub(crate) fn amount_arg(sub: &clap::ArgMatches, name: &str) -> Result<Option<i64>> {
    sub.get_one::<String>(name)
        .map(|s| parse_amount(s))
        .transpose()
}

/// `--page-size` if given, else the stored setting.
pub(crate) fn page_size_arg(sub: &clap::ArgMatches, stored: PageSize) -> Result<PageSize> {
    match sub.get_one::<usize>("page-size") {
        Some(&n) => PageSize::new(n).ok_or_else(|| anyhow!("--page-size must be at least 1")),
        None => Ok(stored),
    }
}

/// Builds filter criteria from the shared list arguments. Arguments the
/// subcommand does not define are treated as absent.
pub(crate) fn filter_from_args(conn: &Connection, sub: &clap::ArgMatches) -> Result<FilterCriteria> {
    let mut f = FilterCriteria::new();
    if let Some(min) = amount_arg(sub, "min")? {
        f = f.with_min_amount(min);
    }
    if let Some(max) = amount_arg(sub, "max")? {
        f = f.with_max_amount(max);
    }
    if let Some(from) = date_arg(sub, "from")? {
        f = f.with_start_date(from);
    }
    if let Some(to) = date_arg(sub, "to")? {
        f = f.with_end_date(to);
    }
    if let Ok(Some(names)) = sub.try_get_many::<String>("category") {
        let mut ids = Vec::new();
        for name in names {
            ids.push(
                category_id_by_name(conn, name)
                    .with_context(|| format!("Unknown category '{}'", name.trim()))?,
            );
        }
        f = f.with_categories(ids);
    }
    if let Ok(Some(code)) = sub.try_get_one::<String>("code") {
        f = f.with_code(code);
    }
    f.validate()?;
    Ok(f)
}

/// 1-based `--page` converted to a 0-based index; absent means the first page.
pub(crate) fn requested_page(sub: &clap::ArgMatches) -> i64 {
    sub.get_one::<i64>("page")
        .map(|p| p.saturating_sub(1))
        .unwrap_or(0)
}
