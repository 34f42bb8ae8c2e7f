// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{date_arg, today};
use crate::aggregate::{month_summary, sum_by_category, sum_expenditure, sum_income, year_summary};
use crate::commands::records::record_lines;
use crate::rows::{self, Row, RowKind};
use crate::store::category_id_by_name;
use crate::utils::{fmt_cents, maybe_print_json, parse_month, parse_year, pretty_table};
use anyhow::{Result, anyhow};
use chrono::Datelike;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(conn, sub),
        Some(("year", sub)) => year(conn, sub),
        Some(("range", sub)) => range(conn, sub),
        _ => Ok(()),
    }
}

fn month(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => date_arg(sub, "date")?.unwrap_or_else(today),
    };
    let summary = month_summary(conn, date)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    println!("{}", summary.start.format("%B %Y"));
    let lines = record_lines(conn, summary.records.clone())?;
    println!(
        "{}",
        rows::table(RowKind::Record, lines.into_iter().map(Row::Record))
    );
    println!(
        "{}",
        pretty_table(
            &["Income", "Expenditure", "Net"],
            vec![vec![
                fmt_cents(summary.income),
                fmt_cents(summary.expenditure),
                fmt_cents(summary.net()),
            ]],
        )
    );
    Ok(())
}

fn year(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let year = match sub.get_one::<String>("year") {
        Some(s) => parse_year(s)?,
        None => today().year(),
    };
    let matrix = year_summary(conn, year)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &matrix)? {
        println!("{}", year);
        println!(
            "{}",
            rows::table(RowKind::Summary, matrix.into_iter().map(Row::Summary))
        );
    }
    Ok(())
}

fn range(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let from = date_arg(sub, "from")?.ok_or_else(|| anyhow!("--from is required"))?;
    let to = date_arg(sub, "to")?.ok_or_else(|| anyhow!("--to is required"))?;
    if let Some(name) = sub.get_one::<String>("category") {
        let id = category_id_by_name(conn, name)?;
        let total = sum_by_category(conn, id, from, to)?;
        let out = json!({ "from": from, "to": to, "category": name.trim(), "total": total });
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
            println!(
                "{}",
                pretty_table(
                    &["From", "To", "Category", "Total"],
                    vec![vec![
                        from.to_string(),
                        to.to_string(),
                        name.trim().to_string(),
                        fmt_cents(total),
                    ]],
                )
            );
        }
        return Ok(());
    }
    let income = sum_income(conn, from, to)?;
    let expenditure = sum_expenditure(conn, from, to)?;
    let out = json!({
        "from": from,
        "to": to,
        "income": income,
        "expenditure": expenditure,
        "net": income - expenditure,
    });
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        println!(
            "{}",
            pretty_table(
                &["From", "To", "Income", "Expenditure", "Net"],
                vec![vec![
                    from.to_string(),
                    to.to_string(),
                    fmt_cents(income),
                    fmt_cents(expenditure),
                    fmt_cents(income - expenditure),
                ]],
            )
        );
    }
    Ok(())
}
