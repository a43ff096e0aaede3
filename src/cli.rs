// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .help("Month as YYYY-MM (defaults to the current month)")
}

fn report_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("kind")
            .long("kind")
            .default_value("monthly")
            .value_parser(["daily", "weekly", "monthly"]),
    )
    .arg(
        Arg::new("date")
            .long("date")
            .help("Any date inside the report period, YYYY-MM-DD (defaults to today)"),
    )
    .arg(Arg::new("category").long("category"))
    .arg(Arg::new("wallet").long("wallet"))
}

fn tx_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("type")
            .long("type")
            .required(required)
            .value_parser(["income", "expense"]),
    )
    .arg(Arg::new("amount").long("amount").required(required))
    .arg(Arg::new("date").long("date").help("YYYY-MM-DD (defaults to today)"))
    .arg(Arg::new("wallet").long("wallet").required(required))
    .arg(Arg::new("category").long("category").required(required))
    .arg(Arg::new("description").long("description").short('d'))
    .arg(Arg::new("note").long("note"))
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .about("Personal finance tracker: wallets, budgets, insights and reports")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("FINTRACK_DB")
                .help("Path to the data file (defaults to the platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the data file and seed defaults"))
        .subcommand(
            Command::new("wallet")
                .about("Manage wallets")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("cash")
                                .value_parser([
                                    "cash",
                                    "bank",
                                    "ewallet",
                                    "savings",
                                    "investment",
                                ]),
                        )
                        .arg(Arg::new("balance").long("balance").default_value("0"))
                        .arg(Arg::new("color").long("color").default_value("#4f46e5")),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("wallet").required(true))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("balance").long("balance"))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("wallet").required(true))
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .action(ArgAction::SetTrue)
                                .help("Also delete the wallet's transactions"),
                        ),
                )
                .subcommand(
                    Command::new("transfer")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("note").long("note")),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("color").long("color").default_value("#64748b")),
                )
                .subcommand(json_args(
                    Command::new("list").arg(
                        Arg::new("type")
                            .long("type")
                            .value_parser(["income", "expense"]),
                    ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(tx_fields(Command::new("add"), true))
                .subcommand(json_args(
                    Command::new("list")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["income", "expense", "transfer"]),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("wallet").long("wallet"))
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .value_parser(["today", "week", "month", "year", "all"]),
                        )
                        .arg(Arg::new("from").long("from").requires("to"))
                        .arg(Arg::new("to").long("to").requires("from"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(tx_fields(
                    Command::new("edit")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                    false,
                ))
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly spending limits per category")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(month_arg())
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(json_args(Command::new("list").arg(month_arg())))
                .subcommand(json_args(Command::new("status").arg(month_arg())))
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(json_args(
            Command::new("dashboard")
                .about("Balances, monthly cash flow and budget overview")
                .arg(month_arg())
                .arg(
                    Arg::new("months")
                        .long("months")
                        .default_value("6")
                        .value_parser(value_parser!(usize))
                        .help("Months of cash flow history"),
                )
                .arg(
                    Arg::new("watch")
                        .long("watch")
                        .action(ArgAction::SetTrue)
                        .help("Refresh on the configured interval"),
                ),
        ))
        .subcommand(json_args(
            Command::new("insights")
                .about("Findings about this month's finances")
                .arg(month_arg())
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Show every finding instead of the top four"),
                ),
        ))
        .subcommand(json_args(report_args(
            Command::new("report").about("Daily, weekly or monthly report"),
        )))
        .subcommand(
            Command::new("export")
                .about("Write reports or a full backup to a file")
                .subcommand(report_args(
                    Command::new("report")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .value_parser(["csv", "json"]),
                        )
                        .arg(Arg::new("out").long("out")),
                ))
                .subcommand(
                    Command::new("backup").arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Load a backup or a CSV of transactions")
                .subcommand(
                    Command::new("backup").arg(Arg::new("path").long("path").required(true)),
                )
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("Show or change preferences")
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("locale").long("locale"))
                        .arg(
                            Arg::new("decimals")
                                .long("decimals")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("refresh")
                                .long("refresh")
                                .value_parser(value_parser!(u64))
                                .help("Dashboard refresh interval in seconds"),
                        )
                        .arg(
                            Arg::new("hide_balance")
                                .long("hide-balance")
                                .value_parser(value_parser!(bool)),
                        ),
                )
                .subcommand(
                    Command::new("theme")
                        .arg(Arg::new("theme").value_parser(["light", "dark"])),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored records for inconsistencies"))
        .subcommand(
            Command::new("reset")
                .about("Delete everything and restore defaults")
                .arg(Arg::new("yes").long("yes").action(ArgAction::SetTrue)),
        )
}
