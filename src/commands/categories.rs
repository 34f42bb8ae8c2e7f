// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::NewCategory;
use crate::query::list_categories;
use crate::rows::{self, Row, RowKind};
use crate::store::{category_by_id, delete_category, insert_category, update_category};
use crate::utils::maybe_print_json;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let cat = NewCategory {
                name: sub.get_one::<String>("name").unwrap().trim().to_string(),
                is_income: sub.get_flag("income"),
                description: sub.get_one::<String>("desc").cloned().unwrap_or_default(),
            };
            let id = insert_category(conn, &cat)?;
            println!(
                "Added {} category '{}' (id {})",
                if cat.is_income { "income" } else { "expenditure" },
                cat.name,
                id
            );
        }
        Some(("list", sub)) => {
            let cats = list_categories(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                println!(
                    "{}",
                    rows::table(RowKind::Category, cats.into_iter().map(Row::Category))
                );
            }
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let mut cat = NewCategory::from(&category_by_id(conn, id)?);
            if let Some(name) = sub.get_one::<String>("name") {
                cat.name = name.trim().to_string();
            }
            if sub.get_flag("income") {
                cat.is_income = true;
            } else if sub.get_flag("expenditure") {
                cat.is_income = false;
            }
            if let Some(desc) = sub.get_one::<String>("desc") {
                cat.description = desc.clone();
            }
            update_category(conn, id, &cat)?;
            println!("Updated category {}", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            delete_category(conn, id)?;
            println!("Removed category {} (its records are kept, uncategorised)", id);
        }
        _ => {}
    }
    Ok(())
}
