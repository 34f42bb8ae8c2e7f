// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{amount_arg, date_arg, filter_from_args, page_size_arg, requested_page, today};
use crate::config::Settings;
use crate::models::{NewRecord, Record};
use crate::pagination::{ViewState, page_count};
use crate::query::{Page, count_records, list_categories, records_view};
use crate::rows::{self, RecordLine, Row, RowKind};
use crate::store::{category_id_by_name, delete_record, insert_record, record_by_id, update_record};
use crate::utils::{fmt_cents, maybe_print_json};
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            delete_record(conn, id)?;
            println!("Removed record {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = date_arg(sub, "date")?.unwrap_or_else(today);
    let amount = amount_arg(sub, "amount")?.unwrap_or_default();
    let category_id = match sub.get_one::<String>("category") {
        Some(name) => Some(category_id_by_name(conn, name)?),
        None => None,
    };
    let rec = NewRecord {
        date,
        description: sub.get_one::<String>("desc").unwrap().trim().to_string(),
        amount,
        category_id,
    };
    let id = insert_record(conn, &rec)?;
    println!(
        "Recorded {} on {} '{}' (id {})",
        fmt_cents(amount),
        date,
        rec.description,
        id
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut rec = NewRecord::from(&record_by_id(conn, id)?);
    if let Some(date) = date_arg(sub, "date")? {
        rec.date = date;
    }
    if let Some(desc) = sub.get_one::<String>("desc") {
        rec.description = desc.trim().to_string();
    }
    if let Some(amount) = amount_arg(sub, "amount")? {
        rec.amount = amount;
    }
    if let Some(name) = sub.get_one::<String>("category") {
        rec.category_id = Some(category_id_by_name(conn, name)?);
    } else if sub.get_flag("uncategorize") {
        rec.category_id = None;
    }
    update_record(conn, id, &rec)?;
    println!("Updated record {}", id);
    Ok(())
}

/// Attaches category names; detached records get `None`.
pub fn record_lines(conn: &Connection, records: Vec<Record>) -> Result<Vec<RecordLine>> {
    let names: HashMap<i64, String> = list_categories(conn)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    Ok(records
        .into_iter()
        .map(|record| {
            let category = record.category_id.and_then(|id| names.get(&id).cloned());
            RecordLine { record, category }
        })
        .collect())
}

/// The page a `record list` invocation asks for. An out-of-range `--page`
/// leaves the view on the first page.
pub fn query_page(conn: &Connection, sub: &clap::ArgMatches) -> Result<Page<RecordLine>> {
    let settings = Settings::load(conn)?;
    let page_size = page_size_arg(sub, settings.page_size)?;
    let filter = filter_from_args(conn, sub)?;
    let pages = page_count(count_records(conn, &filter)?, page_size);
    let view = ViewState::new(filter).go_to(requested_page(sub), pages);
    let page = records_view(conn, view, page_size)?;
    Ok(Page {
        rows: record_lines(conn, page.rows)?,
        view: page.view,
        page_count: page.page_count,
    })
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let page = query_page(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &page.rows)? {
        println!(
            "{}",
            rows::table(RowKind::Record, page.rows.into_iter().map(Row::Record))
        );
        println!("Page {}/{}", page.view.page + 1, page.page_count);
    }
    Ok(())
}
