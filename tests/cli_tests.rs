// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tallybook::config::Settings;
use tallybook::query::list_categories;
use tallybook::store::record_by_id;
use tallybook::{cli, commands, db};

fn sub_matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["tallybook"];
    full.extend_from_slice(args);
    let m = cli::build_cli().get_matches_from(full);
    let (_, group) = m.subcommand().unwrap();
    let (_, leaf) = group.subcommand().unwrap();
    leaf.clone()
}

fn group_matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["tallybook"];
    full.extend_from_slice(args);
    let m = cli::build_cli().get_matches_from(full);
    m.subcommand().unwrap().1.clone()
}

#[test]
fn seed_refuses_a_non_empty_ledger() {
    let conn = db::open_in_memory().unwrap();
    assert_eq!(commands::seed::seed(&conn).unwrap(), (5, 10, 3));
    assert!(commands::seed::seed(&conn).is_err());
    assert_eq!(list_categories(&conn).unwrap().len(), 5);
}

#[test]
fn record_list_filters_by_several_categories() {
    let conn = db::open_in_memory().unwrap();
    commands::seed::seed(&conn).unwrap();

    let sub = sub_matches(&[
        "record", "list", "--category", "groceries", "--category", "Gifts",
    ]);
    let page = commands::records::query_page(&conn, &sub).unwrap();
    assert_eq!(page.rows.len(), 4);
    assert_eq!(page.rows[0].category.as_deref(), Some("Gifts"));
    assert_eq!(page.rows[0].record.description, "Christmas presents");
}

#[test]
fn record_list_pages_with_override_and_ignores_bad_page() {
    let conn = db::open_in_memory().unwrap();
    commands::seed::seed(&conn).unwrap();

    let sub = sub_matches(&["record", "list", "--page-size", "4", "--page", "3"]);
    let page = commands::records::query_page(&conn, &sub).unwrap();
    assert_eq!(page.page_count, 3);
    assert_eq!(page.view.page, 2);
    assert_eq!(page.rows.len(), 2);

    let sub = sub_matches(&["record", "list", "--page-size", "4", "--page", "9"]);
    let page = commands::records::query_page(&conn, &sub).unwrap();
    assert_eq!(page.view.page, 0);
}

#[test]
fn record_list_rejects_reversed_dates() {
    let conn = db::open_in_memory().unwrap();
    let sub = sub_matches(&[
        "record", "list", "--from", "2024-12-01", "--to", "2024-11-01",
    ]);
    assert!(commands::records::query_page(&conn, &sub).is_err());
}

#[test]
fn record_add_and_edit_through_handlers() {
    let conn = db::open_in_memory().unwrap();
    commands::seed::seed(&conn).unwrap();

    let add = group_matches(&[
        "record", "add", "--date", "2024-11-30", "--desc", "Lunch", "--amount", "-12.50",
        "--category", "groceries",
    ]);
    commands::records::handle(&conn, &add).unwrap();
    let id = conn.last_insert_rowid();
    let rec = record_by_id(&conn, id).unwrap();
    assert_eq!(rec.amount, -1_250);
    assert!(rec.category_id.is_some());

    let id_s = id.to_string();
    let edit = group_matches(&["record", "edit", "--id", id_s.as_str(), "--uncategorize"]);
    commands::records::handle(&conn, &edit).unwrap();
    let rec = record_by_id(&conn, id).unwrap();
    assert_eq!(rec.category_id, None);
    assert_eq!(rec.description, "Lunch");
}

#[test]
fn invest_list_matches_code_substring() {
    let conn = db::open_in_memory().unwrap();
    commands::seed::seed(&conn).unwrap();
    let sub = sub_matches(&["invest", "list", "--code", "ivv"]);
    let page = commands::investments::query_page(&conn, &sub).unwrap();
    assert_eq!(page.rows.len(), 2);
    assert!(page.rows.iter().all(|l| l.code == "IVV"));
}

#[test]
fn config_commands_persist_settings() {
    let conn = db::open_in_memory().unwrap();
    let m = group_matches(&["config", "set-page-size", "--rows", "25"]);
    commands::settings::handle(&conn, &m).unwrap();
    let m = group_matches(&["config", "set-price-timeout", "--secs", "9"]);
    commands::settings::handle(&conn, &m).unwrap();

    let s = Settings::load(&conn).unwrap();
    assert_eq!(s.page_size.get(), 25);
    assert_eq!(s.price_timeout_secs, 9);

    let m = group_matches(&["config", "set-page-size", "--rows", "0"]);
    assert!(commands::settings::handle(&conn, &m).is_err());
}
