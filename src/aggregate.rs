// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period sums and the yearly category matrix.
//!
//! All ranges are `[start, end)`. Amounts are summed with their stored sign;
//! the expenditure side is then negated so spending (stored negative) reads
//! as a positive total and a refund reduces it. Records without a category
//! contribute to neither side. No matching rows is a zero result, not an error.

use chrono::{Datelike, Months, NaiveDate};
use rusqlite::{Connection, params};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{LedgerError, Result};
use crate::filter::FilterCriteria;
use crate::models::Record;
use crate::query::all_records;
use crate::rows::{MonthlyAmounts, SummaryRow};
use crate::store::category_by_id;

fn sql_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        tracing::debug!(%start, %end, "rejected reversed range");
        return Err(LedgerError::InvalidFilter(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }
    Ok(())
}

/// A side total from the raw signed sum of its records: income as stored,
/// expenditure negated.
pub fn side_total(raw_sum: i64, is_income: bool) -> i64 {
    if is_income { raw_sum } else { -raw_sum }
}

fn raw_side_sum(conn: &Connection, income: bool, start: NaiveDate, end: NaiveDate) -> Result<i64> {
    check_range(start, end)?;
    let total: i64 = conn.query_row(
        "SELECT IFNULL(SUM(r.amount), 0)
         FROM records r JOIN categories c ON c.id = r.category_id
         WHERE c.is_income = ?1 AND r.date >= ?2 AND r.date < ?3",
        params![income, sql_date(start), sql_date(end)],
        |r| r.get(0),
    )?;
    Ok(total)
}

/// Raw signed sum over income categories.
pub fn sum_income(conn: &Connection, start: NaiveDate, end: NaiveDate) -> Result<i64> {
    Ok(side_total(raw_side_sum(conn, true, start, end)?, true))
}

/// Negated raw sum over expenditure categories: positive for spending
/// stored as negative amounts, reduced by refunds.
pub fn sum_expenditure(conn: &Connection, start: NaiveDate, end: NaiveDate) -> Result<i64> {
    Ok(side_total(raw_side_sum(conn, false, start, end)?, false))
}

/// Raw signed sum for one category. `NotFound` only when the category does
/// not exist; no records is zero.
pub fn sum_by_category(
    conn: &Connection,
    category_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<i64> {
    check_range(start, end)?;
    category_by_id(conn, category_id)?;
    let total: i64 = conn.query_row(
        "SELECT IFNULL(SUM(amount), 0) FROM records
         WHERE category_id = ?1 AND date >= ?2 AND date < ?3",
        params![category_id, sql_date(start), sql_date(end)],
        |r| r.get(0),
    )?;
    Ok(total)
}

/// First day of the month containing `date`, and first day of the next.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date.with_day(1).unwrap_or(date);
    let end = start.checked_add_months(Months::new(1)).unwrap_or(start);
    (start, end)
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub records: Vec<Record>,
    pub income: i64,
    pub expenditure: i64,
}

impl MonthSummary {
    pub fn net(&self) -> i64 {
        self.income - self.expenditure
    }
}

/// Records, income and expenditure for the month containing `date`, read
/// inside one transaction over one range.
pub fn month_summary(conn: &Connection, date: NaiveDate) -> Result<MonthSummary> {
    let (start, end) = month_bounds(date);
    let tx = conn.unchecked_transaction()?;
    let filter = FilterCriteria::new().with_start_date(start).with_end_date(end);
    let records = all_records(&tx, &filter)?;
    let income = sum_income(&tx, start, end)?;
    let expenditure = sum_expenditure(&tx, start, end)?;
    tx.commit()?;
    Ok(MonthSummary {
        start,
        end,
        records,
        income,
        expenditure,
    })
}

struct CategoryLine {
    name: String,
    is_income: bool,
    months: MonthlyAmounts,
}

fn add_months(into: &mut MonthlyAmounts, from: &MonthlyAmounts) {
    for (a, b) in into.iter_mut().zip(from) {
        *a += b;
    }
}

/// The yearly matrix, rows in this fixed order:
///
/// income categories, divider, total income, divider,
/// expenditure categories, divider, total expenditure, divider, net change.
///
/// Category rows appear in ascending id order and only for categories with
/// at least one record in `year`. Expenditure rows are negated raw sums, the
/// same sign as [`sum_expenditure`].
pub fn year_summary(conn: &Connection, year: i32) -> Result<Vec<SummaryRow>> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| LedgerError::InvalidFilter(format!("year {} out of range", year)))?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)
        .ok_or_else(|| LedgerError::InvalidFilter(format!("year {} out of range", year)))?;

    let mut stmt = conn.prepare(
        "SELECT c.id, c.name, c.is_income,
                CAST(substr(r.date, 6, 2) AS INTEGER) AS month,
                SUM(r.amount)
         FROM records r JOIN categories c ON c.id = r.category_id
         WHERE r.date >= ?1 AND r.date < ?2
         GROUP BY c.id, month
         ORDER BY c.id, month",
    )?;
    let rows = stmt.query_map(params![sql_date(start), sql_date(end)], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, bool>(2)?,
            r.get::<_, i64>(3)?,
            r.get::<_, i64>(4)?,
        ))
    })?;

    let mut lines: BTreeMap<i64, CategoryLine> = BTreeMap::new();
    for row in rows {
        let (id, name, is_income, month, total) = row?;
        let idx = usize::try_from(month - 1)
            .ok()
            .filter(|i| *i < 12)
            .ok_or_else(|| {
                LedgerError::InvalidData(format!("record in category {} has month {}", id, month))
            })?;
        let line = lines.entry(id).or_insert_with(|| CategoryLine {
            name,
            is_income,
            months: [0; 12],
        });
        line.months[idx] += side_total(total, is_income);
    }

    let mut income_total = [0i64; 12];
    let mut expenditure_total = [0i64; 12];
    let mut income_rows = Vec::new();
    let mut expenditure_rows = Vec::new();
    for (id, line) in lines {
        if line.is_income {
            add_months(&mut income_total, &line.months);
            income_rows.push(SummaryRow::Category {
                id,
                name: line.name,
                is_income: true,
                months: line.months,
            });
        } else {
            add_months(&mut expenditure_total, &line.months);
            expenditure_rows.push(SummaryRow::Category {
                id,
                name: line.name,
                is_income: false,
                months: line.months,
            });
        }
    }

    let mut net = [0i64; 12];
    for (i, n) in net.iter_mut().enumerate() {
        *n = income_total[i] - expenditure_total[i];
    }

    let mut out = Vec::with_capacity(income_rows.len() + expenditure_rows.len() + 7);
    out.extend(income_rows);
    out.push(SummaryRow::Divider);
    out.push(SummaryRow::TotalIncome {
        months: income_total,
    });
    out.push(SummaryRow::Divider);
    out.extend(expenditure_rows);
    out.push(SummaryRow::Divider);
    out.push(SummaryRow::TotalExpenditure {
        months: expenditure_total,
    });
    out.push(SummaryRow::Divider);
    out.push(SummaryRow::NetChange { months: net });
    tracing::debug!(year, rows = out.len(), "year summary built");
    Ok(out)
}
