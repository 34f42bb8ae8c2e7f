// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tallybook::{cli, commands, db};
use tempfile::tempdir;

fn seeded() -> rusqlite::Connection {
    let conn = db::open_in_memory().unwrap();
    commands::seed::seed(&conn).unwrap();
    conn
}

#[test]
fn export_records_writes_csv_oldest_first() {
    let conn = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("records.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "tallybook", "export", "records", "--format", "csv", "--out", out_str.as_str(),
    ]);
    let (_, export) = matches.subcommand().unwrap();
    commands::exporter::handle(&conn, export).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["id", "date", "description", "amount", "category"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 10);
    assert_eq!(&rows[0][1], "2024-10-01");
    assert_eq!(&rows[0][3], "4800.00");
    assert_eq!(&rows[0][4], "Work");
    assert_eq!(&rows[1][3], "-87.50");
    assert_eq!(&rows[9][1], "2024-12-22");
}

#[test]
fn export_investments_streams_pretty_json() {
    let conn = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("lots.json");

    let n =
        commands::exporter::export_investments(&conn, "json", &out_path).unwrap();
    assert_eq!(n, 3);

    let text = std::fs::read_to_string(&out_path).unwrap();
    let items: serde_json::Value = serde_json::from_str(&text).unwrap();
    let items = items.as_array().unwrap();
    assert_eq!(items[0]["code"], "IVV");
    assert_eq!(items[0]["quantity"], "20");
    assert_eq!(items[0]["unit_price"], "600.00");
    assert_eq!(items[1]["code"], "VGS.AX");
    assert_eq!(items[1]["quantity"], "15.5");
}

#[test]
fn unknown_format_is_an_error() {
    let conn = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("x.xml");
    assert!(commands::exporter::export_records(&conn, "xml", &out).is_err());
    assert!(!out.exists());
}
