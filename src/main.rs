// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tallybook::{cli, commands, db};

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TALLYBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let matches = cli::build_cli().get_matches();

    let db_file = matches.get_one::<PathBuf>("db").cloned();
    let conn = db::open_or_init(db_file.as_deref())?;

    match matches.subcommand() {
        Some(("init", _)) => {
            let path = match db_file {
                Some(p) => p,
                None => db::db_path()?,
            };
            println!("Database initialized at {}", path.display());
        }
        Some(("seed", _)) => commands::seed::handle(&conn)?,
        Some(("category", sub)) => commands::categories::handle(&conn, sub)?,
        Some(("record", sub)) => commands::records::handle(&conn, sub)?,
        Some(("invest", sub)) => commands::investments::handle(&conn, sub)?,
        Some(("summary", sub)) => commands::summary::handle(&conn, sub)?,
        Some(("price", sub)) => commands::prices::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
