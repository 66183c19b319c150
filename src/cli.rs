// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .value_parser(value_parser!(i64))
        .required(true)
        .help("Acting user id; resolved to a ledger owner via the access settings")
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn calendar_arg() -> Arg {
    Arg::new("calendar")
        .long("calendar")
        .value_parser(["jalali", "gregorian"])
        .default_value("jalali")
        .help("Calendar used for period boundaries and date display")
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage income/expense categories")
        .subcommand(
            Command::new("add")
                .about("Add a category")
                .arg(user_arg())
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .required(true)
                        .help("income | work-expense | personal-expense"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List categories")
                .arg(user_arg())
                .arg(Arg::new("kind").long("kind").help("Filter by kind")),
        ))
        .subcommand(
            Command::new("rename")
                .about("Rename a category in place; history keeps its id")
                .arg(user_arg())
                .arg(
                    Arg::new("id")
                        .long("id")
                        .value_parser(value_parser!(i64))
                        .required(true),
                )
                .arg(Arg::new("name").long("name").required(true)),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a category (blocked while transactions reference it)")
                .arg(user_arg())
                .arg(
                    Arg::new("id")
                        .long("id")
                        .value_parser(value_parser!(i64))
                        .required(true),
                ),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and inspect transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(user_arg())
                .arg(
                    Arg::new("category")
                        .long("category")
                        .value_parser(value_parser!(i64))
                        .required(true)
                        .help("Category id"),
                )
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .help("Positive amount in minor units; separators allowed"),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("YYYY-MM-DD or Jalali YYYY/MM/DD; defaults to today"),
                )
                .arg(
                    Arg::new("time")
                        .long("time")
                        .help("HH:MM or HH:MM:SS; defaults to 00:00:00"),
                )
                .arg(Arg::new("note").long("note")),
        )
        .subcommand(
            json_flags(
                Command::new("list")
                    .about("List transactions in a date range")
                    .arg(user_arg())
                    .arg(Arg::new("from").long("from").help("Range start date"))
                    .arg(Arg::new("to").long("to").help("Range end date"))
                    .arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize))
                            .default_value("50"),
                    )
                    .arg(
                        Arg::new("after")
                            .long("after")
                            .help("Continuation cursor: 'YYYY-MM-DD HH:MM:SS,id'"),
                    ),
            )
            .arg(calendar_arg()),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(user_arg())
                .arg(
                    Arg::new("id")
                        .long("id")
                        .value_parser(value_parser!(i64))
                        .required(true),
                ),
        )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Period summaries")
        .subcommand(
            json_flags(
                Command::new("summary")
                    .about("Day/month/year summary around an anchor date")
                    .arg(user_arg())
                    .arg(
                        Arg::new("scope")
                            .long("scope")
                            .required(true)
                            .help("day | month | year"),
                    )
                    .arg(
                        Arg::new("date")
                            .long("date")
                            .help("Anchor date; defaults to today"),
                    ),
            )
            .arg(calendar_arg()),
        )
        .subcommand(
            json_flags(
                Command::new("range")
                    .about("Summary over an arbitrary date range")
                    .arg(user_arg())
                    .arg(Arg::new("from").long("from").required(true))
                    .arg(Arg::new("to").long("to").required(true)),
            )
            .arg(calendar_arg()),
        )
        .subcommand(json_flags(
            Command::new("all")
                .about("All-time totals")
                .arg(user_arg()),
        ))
}

fn access_cmd() -> Command {
    Command::new("access")
        .about("Access mode, sharing, and the admin roster")
        .subcommand(
            Command::new("mode")
                .about("Show or set the access mode")
                .arg(Arg::new("set").long("set").value_parser(["admin-only", "public"])),
        )
        .subcommand(
            Command::new("share")
                .about("Show or toggle shared bookkeeping between admins")
                .arg(Arg::new("set").long("set").value_parser(["on", "off"])),
        )
        .subcommand(
            Command::new("primary")
                .about("Show or set the primary admin")
                .arg(Arg::new("id").long("id").value_parser(value_parser!(i64)))
                .arg(Arg::new("name").long("name").default_value("primary")),
        )
        .subcommand(
            Command::new("admin")
                .about("Manage the admin roster")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("id").long("id").value_parser(value_parser!(i64)).required(true))
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").long("id").value_parser(value_parser!(i64)).required(true)),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
}

fn export_cmd() -> Command {
    Command::new("export")
        .about("Export ledger data")
        .subcommand(
            Command::new("transactions")
                .about("Export transactions to CSV or JSON")
                .arg(user_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv | json"),
                )
                .arg(Arg::new("out").long("out").required(true))
                .arg(Arg::new("from").long("from").help("Range start date"))
                .arg(Arg::new("to").long("to").help("Range end date"))
                .arg(calendar_arg()),
        )
}

pub fn build_cli() -> Command {
    Command::new("kasbbook")
        .about("Small-business bookkeeping ledger with Jalali-calendar reports")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(category_cmd())
        .subcommand(tx_cmd())
        .subcommand(report_cmd())
        .subcommand(access_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Check ledger integrity"))
}
