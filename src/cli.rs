// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, value_parser};
use std::path::PathBuf;

fn json_args(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print JSON instead of a table").action(ArgAction::SetTrue))
        .arg(arg!(--jsonl "Print one JSON object per line").action(ArgAction::SetTrue))
}

fn page_args(cmd: Command) -> Command {
    cmd.arg(
        arg!(--page <N> "Page to show, starting at 1")
            .value_parser(value_parser!(i64))
            .allow_hyphen_values(true),
    )
    .arg(
        Arg::new("page-size")
            .long("page-size")
            .value_name("ROWS")
            .help("Rows per page for this call")
            .value_parser(value_parser!(usize)),
    )
}

fn amount_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("AMOUNT")
        .help(help)
        .allow_hyphen_values(true)
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(amount_arg("min", "Smallest amount to include"))
        .arg(amount_arg("max", "Largest amount to include"))
        .arg(arg!(--from <DATE> "First date to include"))
        .arg(arg!(--to <DATE> "First date to exclude"))
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Income/expenditure ledger and investment lot tracker")
        .version(clap::crate_version!())
        .arg(
            arg!(--db <PATH> "Ledger database file")
                .global(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .subcommand(Command::new("init").about("Create the ledger database"))
        .subcommand(Command::new("seed").about("Load a demo data set into an empty ledger"))
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--income "Income category (default: expenditure)").action(ArgAction::SetTrue))
                        .arg(arg!(--desc <TEXT>)),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(--id <ID>).required(true).value_parser(value_parser!(i64)))
                        .arg(arg!(--name <NAME>))
                        .arg(arg!(--income).action(ArgAction::SetTrue).conflicts_with("expenditure"))
                        .arg(arg!(--expenditure).action(ArgAction::SetTrue))
                        .arg(arg!(--desc <TEXT>)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(arg!(--id <ID>).required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("record")
                .about("Manage ledger entries")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--date <DATE> "YYYY-MM-DD, MM-DD or DD (default: today)"))
                        .arg(arg!(--desc <TEXT>).required(true))
                        .arg(amount_arg("amount", "Amount, e.g. 500 or -12.50").required(true))
                        .arg(arg!(--category <NAME>)),
                )
                .subcommand(json_args(page_args(range_args(
                    Command::new("list").arg(
                        arg!(--category <NAME> "Restrict to a category (repeatable)")
                            .action(ArgAction::Append),
                    ),
                ))))
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(--id <ID>).required(true).value_parser(value_parser!(i64)))
                        .arg(arg!(--date <DATE>))
                        .arg(arg!(--desc <TEXT>))
                        .arg(amount_arg("amount", "New amount"))
                        .arg(arg!(--category <NAME>).conflicts_with("uncategorize"))
                        .arg(arg!(--uncategorize "Clear the category").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(arg!(--id <ID>).required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("invest")
                .about("Manage investment lots")
                .subcommand(
                    Command::new("add")
                        .arg(arg!(--date <DATE> "YYYY-MM-DD, MM-DD or DD (default: today)"))
                        .arg(arg!(--code <CODE>).required(true))
                        .arg(arg!(--qty <QTY>).required(true))
                        .arg(amount_arg("price", "Unit price").required(true)),
                )
                .subcommand(json_args(page_args(range_args(
                    Command::new("list").arg(arg!(--code <TEXT> "Code contains")),
                ))))
                .subcommand(
                    Command::new("edit")
                        .arg(arg!(--id <ID>).required(true).value_parser(value_parser!(i64)))
                        .arg(arg!(--date <DATE>))
                        .arg(arg!(--code <CODE>))
                        .arg(arg!(--qty <QTY>))
                        .arg(amount_arg("price", "New unit price")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(arg!(--id <ID>).required(true).value_parser(value_parser!(i64))),
                )
                .subcommand(json_args(
                    Command::new("summary").about("Holdings per code with current prices"),
                )),
        )
        .subcommand(
            Command::new("summary")
                .about("Period totals")
                .subcommand(json_args(
                    Command::new("month")
                        .arg(arg!(--month <MONTH> "YYYY-MM (default: this month)"))
                        .arg(arg!(--date <DATE> "Any day in the month").conflicts_with("month")),
                ))
                .subcommand(json_args(
                    Command::new("year").arg(arg!(--year <YEAR> "Default: this year")),
                ))
                .subcommand(json_args(
                    Command::new("range")
                        .arg(arg!(--from <DATE>).required(true))
                        .arg(arg!(--to <DATE> "First date to exclude").required(true))
                        .arg(arg!(--category <NAME>)),
                )),
        )
        .subcommand(
            Command::new("price")
                .about("Market prices")
                .subcommand(Command::new("get").arg(arg!(--code <CODE>).required(true)))
                .subcommand(json_args(Command::new("list").about("Cached prices"))),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("records")
                        .arg(arg!(--format <FMT> "csv or json").default_value("csv"))
                        .arg(arg!(--out <PATH>).required(true)),
                )
                .subcommand(
                    Command::new("investments")
                        .arg(arg!(--format <FMT> "csv or json").default_value("csv"))
                        .arg(arg!(--out <PATH>).required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Stored settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-page-size")
                        .arg(arg!(--rows <N>).required(true).value_parser(value_parser!(usize))),
                )
                .subcommand(
                    Command::new("set-price-timeout")
                        .arg(arg!(--secs <N>).required(true).value_parser(value_parser!(u64))),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn negative_amounts_parse_as_values() {
        let m = build_cli()
            .try_get_matches_from([
                "tallybook", "record", "add", "--desc", "coffee", "--amount", "-4.50",
            ])
            .unwrap();
        let (_, rec) = m.subcommand().unwrap();
        let (_, add) = rec.subcommand().unwrap();
        assert_eq!(add.get_one::<String>("amount").unwrap(), "-4.50");
    }
}
