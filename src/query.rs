// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Filtered, newest-first listings. Paging is always applied to the
//! filtered and ordered result, never before filtering.

use rusqlite::{Connection, Row as SqlRow, params_from_iter};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{LedgerError, Result};
use crate::filter::{FilterCriteria, compile};
use crate::models::{Category, Investment, Record};
use crate::pagination::{PageSize, ViewState, page_count};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Records,
    Investments,
    Categories,
}

/// One page of rows together with the view that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub view: ViewState,
    pub page_count: usize,
}

fn map_record(r: &SqlRow<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: r.get(0)?,
        date: r.get(1)?,
        description: r.get(2)?,
        amount: r.get(3)?,
        category_id: r.get(4)?,
    })
}

fn select_records(
    conn: &Connection,
    filter: &FilterCriteria,
    window: Option<(usize, usize)>,
) -> Result<Vec<Record>> {
    filter.validate()?;
    // LIMIT -1 is SQLite for "no limit"
    let (limit, offset) = match window {
        Some((l, o)) => (
            i64::try_from(l).unwrap_or(i64::MAX),
            i64::try_from(o).unwrap_or(i64::MAX),
        ),
        None => (-1, 0),
    };
    let clause = compile(&filter.record_predicates());
    let sql = format!(
        "SELECT id, date, description, amount, category_id FROM records WHERE {}
         ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
        clause.sql
    );
    let mut params = clause.param_refs();
    params.push(&limit);
    params.push(&offset);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params), map_record)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Records matching `filter`, newest first, page `page` of `page_size`.
pub fn query_records(
    conn: &Connection,
    filter: &FilterCriteria,
    page: usize,
    page_size: PageSize,
) -> Result<Vec<Record>> {
    select_records(
        conn,
        filter,
        Some((page_size.get(), page_size.offset(page))),
    )
}

/// Every record matching `filter`, newest first.
pub fn all_records(conn: &Connection, filter: &FilterCriteria) -> Result<Vec<Record>> {
    select_records(conn, filter, None)
}

pub fn count_records(conn: &Connection, filter: &FilterCriteria) -> Result<usize> {
    filter.validate()?;
    let clause = compile(&filter.record_predicates());
    let sql = format!("SELECT COUNT(*) FROM records WHERE {}", clause.sql);
    let n: i64 = conn.query_row(&sql, params_from_iter(clause.param_refs()), |r| r.get(0))?;
    Ok(usize::try_from(n).unwrap_or(0))
}

fn filtered_investments(conn: &Connection, filter: &FilterCriteria) -> Result<Vec<Investment>> {
    filter.validate()?;
    let clause = compile(&filter.investment_predicates());
    let sql = format!(
        "SELECT id, date, code, quantity, unit_price FROM investments WHERE {}
         ORDER BY date DESC, id DESC",
        clause.sql
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(clause.param_refs()), |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, chrono::NaiveDate>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, i64>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, date, code, qty_s, unit_price) = row?;
        let quantity = Decimal::from_str_exact(&qty_s).map_err(|e| {
            LedgerError::InvalidData(format!(
                "investment {} has quantity '{}': {}",
                id, qty_s, e
            ))
        })?;
        let lot = Investment {
            id,
            date,
            code,
            quantity,
            unit_price,
        };
        let cost = lot.cost().ok_or_else(|| {
            LedgerError::InvalidData(format!("investment {} cost is out of range", lot.id))
        })?;
        if filter.admits_cost(cost) {
            out.push(lot);
        }
    }
    Ok(out)
}

/// Lots matching `filter`, newest first. The cost bound is evaluated in
/// exact decimal arithmetic before the page window is taken.
pub fn query_investments(
    conn: &Connection,
    filter: &FilterCriteria,
    page: usize,
    page_size: PageSize,
) -> Result<Vec<Investment>> {
    Ok(filtered_investments(conn, filter)?
        .into_iter()
        .skip(page_size.offset(page))
        .take(page_size.get())
        .collect())
}

pub fn all_investments(conn: &Connection, filter: &FilterCriteria) -> Result<Vec<Investment>> {
    filtered_investments(conn, filter)
}

pub fn count_investments(conn: &Connection, filter: &FilterCriteria) -> Result<usize> {
    if filter.bounds_amount() {
        return Ok(filtered_investments(conn, filter)?.len());
    }
    filter.validate()?;
    let clause = compile(&filter.investment_predicates());
    let sql = format!("SELECT COUNT(*) FROM investments WHERE {}", clause.sql);
    let n: i64 = conn.query_row(&sql, params_from_iter(clause.param_refs()), |r| r.get(0))?;
    Ok(usize::try_from(n).unwrap_or(0))
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT id, name, is_income, description FROM categories ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            is_income: r.get(2)?,
            description: r.get(3)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Unfiltered page count for one table.
pub fn pages_for(conn: &Connection, kind: EntityKind, page_size: PageSize) -> Result<usize> {
    let table = match kind {
        EntityKind::Records => "records",
        EntityKind::Investments => "investments",
        EntityKind::Categories => "categories",
    };
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
    Ok(page_count(usize::try_from(n).unwrap_or(0), page_size))
}

/// Fetches the page `view` points at, pulling it back in range if rows
/// have disappeared since the view was created.
pub fn records_view(
    conn: &Connection,
    view: ViewState,
    page_size: PageSize,
) -> Result<Page<Record>> {
    let pages = page_count(count_records(conn, &view.filter)?, page_size);
    let view = view.clamped(pages);
    let rows = query_records(conn, &view.filter, view.page, page_size)?;
    Ok(Page {
        rows,
        view,
        page_count: pages,
    })
}

pub fn investments_view(
    conn: &Connection,
    view: ViewState,
    page_size: PageSize,
) -> Result<Page<Investment>> {
    let matching = filtered_investments(conn, &view.filter)?;
    let pages = page_count(matching.len(), page_size);
    let view = view.clamped(pages);
    let rows = matching
        .into_iter()
        .skip(page_size.offset(view.page))
        .take(page_size.get())
        .collect();
    Ok(Page {
        rows,
        view,
        page_count: pages,
    })
}
