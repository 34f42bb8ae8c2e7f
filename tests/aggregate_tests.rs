// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use tallybook::LedgerError;
use tallybook::aggregate::*;
use tallybook::db::open_in_memory;
use tallybook::models::{NewCategory, NewRecord};
use tallybook::rows::{
    DIVIDER_ID, NET_CHANGE_ID, SummaryRow, TOTAL_EXPENDITURE_ID, TOTAL_INCOME_ID,
};
use tallybook::store::{delete_category, insert_category, insert_record};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn add_category(conn: &Connection, name: &str, is_income: bool) -> i64 {
    insert_category(
        conn,
        &NewCategory {
            name: name.into(),
            is_income,
            description: String::new(),
        },
    )
    .unwrap()
}

fn add_record(conn: &Connection, date: NaiveDate, amount: i64, category_id: i64) {
    insert_record(
        conn,
        &NewRecord {
            date,
            description: String::from("x"),
            amount,
            category_id: Some(category_id),
        },
    )
    .unwrap();
}

#[test]
fn empty_ranges_sum_to_zero() {
    let conn = open_in_memory().unwrap();
    let d = day(2024, 11, 1);
    assert_eq!(sum_income(&conn, d, d).unwrap(), 0);
    assert_eq!(sum_expenditure(&conn, d, d).unwrap(), 0);
    assert_eq!(sum_income(&conn, d, day(2025, 1, 1)).unwrap(), 0);
}

#[test]
fn reversed_range_is_invalid() {
    let conn = open_in_memory().unwrap();
    let err = sum_income(&conn, day(2024, 12, 1), day(2024, 11, 1)).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidFilter(_)));
}

#[test]
fn work_income_for_november() {
    let conn = open_in_memory().unwrap();
    let work = add_category(&conn, "Work", true);
    add_record(&conn, day(2024, 11, 1), 50_000, work);
    add_record(&conn, day(2024, 12, 1), 50_000, work);

    assert_eq!(
        sum_income(&conn, day(2024, 11, 1), day(2024, 12, 1)).unwrap(),
        50_000
    );
    assert_eq!(
        sum_by_category(&conn, work, day(2024, 11, 1), day(2024, 12, 1)).unwrap(),
        50_000
    );

    let month = month_summary(&conn, day(2024, 11, 15)).unwrap();
    assert_eq!(month.start, day(2024, 11, 1));
    assert_eq!(month.end, day(2024, 12, 1));
    assert_eq!(month.records.len(), 1);
    assert_eq!(month.income, 50_000);
    assert_eq!(month.expenditure, 0);
    assert_eq!(month.net(), 50_000);
}

#[test]
fn refunds_and_corrections_net_against_their_side() {
    let conn = open_in_memory().unwrap();
    let groceries = add_category(&conn, "Groceries", false);
    let work = add_category(&conn, "Work", true);
    add_record(&conn, day(2024, 11, 4), -9_120, groceries);
    // refund
    add_record(&conn, day(2024, 11, 5), 880, groceries);
    add_record(&conn, day(2024, 11, 1), 50_000, work);
    // payroll correction
    add_record(&conn, day(2024, 11, 20), -10_000, work);

    let (s, e) = month_bounds(day(2024, 11, 1));
    assert_eq!(sum_expenditure(&conn, s, e).unwrap(), 8_240);
    assert_eq!(sum_income(&conn, s, e).unwrap(), 40_000);
    assert_eq!(sum_by_category(&conn, groceries, s, e).unwrap(), -8_240);
    assert_eq!(sum_by_category(&conn, work, s, e).unwrap(), 40_000);

    let rows = year_summary(&conn, 2024).unwrap();
    let months = |tag: i64| rows.iter().find(|r| r.tag() == tag).unwrap().months().unwrap()[10];
    assert_eq!(months(groceries), 8_240);
    assert_eq!(months(TOTAL_EXPENDITURE_ID), 8_240);
    assert_eq!(months(TOTAL_INCOME_ID), 40_000);
    assert_eq!(months(NET_CHANGE_ID), 31_760);
}

#[test]
fn expenditure_stored_negative_is_non_negative() {
    let conn = open_in_memory().unwrap();
    let fun = add_category(&conn, "Entertainment", false);
    add_record(&conn, day(2024, 12, 14), -15_000, fun);
    add_record(&conn, day(2024, 12, 15), -3_200, fun);
    let (s, e) = month_bounds(day(2024, 12, 1));
    assert_eq!(sum_expenditure(&conn, s, e).unwrap(), 18_200);
}

#[test]
fn sum_by_category_not_found_vs_empty() {
    let conn = open_in_memory().unwrap();
    let gifts = add_category(&conn, "Gifts", false);
    let (s, e) = (day(2024, 1, 1), day(2025, 1, 1));
    assert_eq!(sum_by_category(&conn, gifts, s, e).unwrap(), 0);
    assert!(sum_by_category(&conn, gifts + 1, s, e).unwrap_err().is_not_found());
}

#[test]
fn detached_records_count_on_neither_side() {
    let conn = open_in_memory().unwrap();
    let gone = add_category(&conn, "Temp", false);
    add_record(&conn, day(2024, 6, 1), -7_000, gone);
    delete_category(&conn, gone).unwrap();

    let (s, e) = month_bounds(day(2024, 6, 1));
    assert_eq!(sum_expenditure(&conn, s, e).unwrap(), 0);
    assert_eq!(sum_income(&conn, s, e).unwrap(), 0);
    // still listed in the month
    assert_eq!(month_summary(&conn, s).unwrap().records.len(), 1);
}

#[test]
fn year_summary_layout_and_buckets() {
    let conn = open_in_memory().unwrap();
    let work = add_category(&conn, "Work", true);
    let allowance = add_category(&conn, "Allowance", true);
    let groceries = add_category(&conn, "Groceries", false);
    let unused = add_category(&conn, "Entertainment", false);
    let gifts = add_category(&conn, "Gifts", false);

    add_record(&conn, day(2024, 1, 31), 480_000, work);
    add_record(&conn, day(2024, 11, 1), 500_000, work);
    add_record(&conn, day(2024, 11, 20), 5_000, allowance);
    add_record(&conn, day(2024, 11, 4), -9_120, groceries);
    add_record(&conn, day(2024, 12, 22), -22_000, gifts);
    // other years do not leak in
    add_record(&conn, day(2023, 12, 31), 1, work);
    add_record(&conn, day(2025, 1, 1), -1, groceries);

    let rows = year_summary(&conn, 2024).unwrap();
    let tags: Vec<i64> = rows.iter().map(SummaryRow::tag).collect();
    assert_eq!(
        tags,
        vec![
            work,
            allowance,
            DIVIDER_ID,
            TOTAL_INCOME_ID,
            DIVIDER_ID,
            groceries,
            gifts,
            DIVIDER_ID,
            TOTAL_EXPENDITURE_ID,
            DIVIDER_ID,
            NET_CHANGE_ID,
        ]
    );
    assert!(!tags.contains(&unused));

    let months = |tag: i64| *rows.iter().find(|r| r.tag() == tag).unwrap().months().unwrap();
    assert_eq!(months(work)[0], 480_000);
    assert_eq!(months(work)[10], 500_000);
    assert_eq!(months(TOTAL_INCOME_ID)[10], 505_000);
    assert_eq!(months(groceries)[10], 9_120);
    assert_eq!(months(TOTAL_EXPENDITURE_ID)[11], 22_000);
    assert_eq!(months(NET_CHANGE_ID)[10], 505_000 - 9_120);
    assert_eq!(months(NET_CHANGE_ID)[11], -22_000);
    assert_eq!(months(NET_CHANGE_ID)[5], 0);
}

#[test]
fn year_summary_of_empty_year_keeps_the_frame() {
    let conn = open_in_memory().unwrap();
    add_category(&conn, "Work", true);
    let rows = year_summary(&conn, 2030).unwrap();
    assert_eq!(rows.len(), 7);
    assert!(rows[0].is_divider());
    assert_eq!(rows[6].tag(), NET_CHANGE_ID);
    assert_eq!(rows[6].months(), Some(&[0i64; 12]));
}
