// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{amount_arg, date_arg, filter_from_args, page_size_arg, requested_page, today};
use crate::config::Settings;
use crate::holdings::investment_summary;
use crate::models::{Investment, NewInvestment, normalize_code};
use crate::pagination::{ViewState, page_count};
use crate::price::{PriceOracle, YahooSource};
use crate::query::{Page, count_investments, investments_view};
use crate::rows::{self, Row, RowKind};
use crate::store::{delete_investment, insert_investment, investment_by_id, update_investment};
use crate::utils::{fmt_cents, maybe_print_json, parse_decimal};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let lot = NewInvestment {
                date: date_arg(sub, "date")?.unwrap_or_else(today),
                code: sub.get_one::<String>("code").unwrap().clone(),
                quantity: parse_decimal(sub.get_one::<String>("qty").unwrap())?,
                unit_price: amount_arg(sub, "price")?.unwrap_or_default(),
            };
            let id = insert_investment(conn, &lot)?;
            println!(
                "Bought {} {} @ {} on {} (id {})",
                lot.quantity.normalize(),
                normalize_code(&lot.code),
                fmt_cents(lot.unit_price),
                lot.date,
                id
            );
        }
        Some(("list", sub)) => {
            let page = query_page(conn, sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &page.rows)? {
                println!(
                    "{}",
                    rows::table(RowKind::Investment, page.rows.into_iter().map(Row::Investment))
                );
                println!("Page {}/{}", page.view.page + 1, page.page_count);
            }
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let mut lot = NewInvestment::from(&investment_by_id(conn, id)?);
            if let Some(date) = date_arg(sub, "date")? {
                lot.date = date;
            }
            if let Some(code) = sub.get_one::<String>("code") {
                lot.code = code.clone();
            }
            if let Some(qty) = sub.get_one::<String>("qty") {
                lot.quantity = parse_decimal(qty)?;
            }
            if let Some(price) = amount_arg(sub, "price")? {
                lot.unit_price = price;
            }
            update_investment(conn, id, &lot)?;
            println!("Updated investment {}", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            delete_investment(conn, id)?;
            println!("Removed investment {}", id);
        }
        Some(("summary", sub)) => {
            let settings = Settings::load(conn)?;
            let oracle = PriceOracle::new(YahooSource::new(settings.price_timeout())?);
            let holdings = investment_summary(conn, &oracle, today())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &holdings)? {
                println!(
                    "{}",
                    rows::table(RowKind::Holding, holdings.into_iter().map(Row::Holding))
                );
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn query_page(conn: &Connection, sub: &clap::ArgMatches) -> Result<Page<Investment>> {
    let settings = Settings::load(conn)?;
    let page_size = page_size_arg(sub, settings.page_size)?;
    let filter = filter_from_args(conn, sub)?;
    let pages = page_count(count_investments(conn, &filter)?, page_size);
    let view = ViewState::new(filter).go_to(requested_page(sub), pages);
    Ok(investments_view(conn, view, page_size)?)
}
