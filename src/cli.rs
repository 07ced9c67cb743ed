// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command, value_parser};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .value_name("ID")
        .help("Act as this user instead of the selected one")
}

fn json_args(cmd: Command) -> Command {
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
            .conflicts_with("json")
            .help("Print one JSON document per line"),
    )
}

fn as_of_arg() -> Arg {
    Arg::new("as_of")
        .long("as-of")
        .value_name("DATE")
        .help("Reference time (YYYY-MM-DD[ HH:MM:SS]); defaults to now")
}

/// Fields shared by `tx add` and `tx edit`.
fn transaction_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("type")
            .long("type")
            .required(required)
            .help("income or expense"),
    )
    .arg(
        Arg::new("category")
            .long("category")
            .required(required)
            .help("Category name, see `category list`"),
    )
    .arg(Arg::new("amount").long("amount").required(required))
    .arg(
        Arg::new("description")
            .long("description")
            .required(required),
    )
    .arg(
        Arg::new("date")
            .long("date")
            .help("YYYY-MM-DD[ HH:MM:SS]; defaults to now"),
    )
    .arg(
        Arg::new("payment")
            .long("payment")
            .help("cash, card, bank-transfer, mobile-payment or other"),
    )
    .arg(
        Arg::new("tag")
            .long("tag")
            .action(ArgAction::Append)
            .help("Tag (repeatable)"),
    )
    .arg(
        Arg::new("recurring")
            .long("recurring")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("frequency")
            .long("frequency")
            .help("daily, weekly, monthly or yearly; required with --recurring"),
    )
    .arg(user_arg())
}

pub fn build_cli() -> Command {
    command!()
        .name("pennywise")
        .about("Track income and expenses, budgets and spending insights")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging (RUST_LOG takes precedence)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(
                            Arg::new("budget")
                                .long("budget")
                                .help("Monthly budget, 0 for none"),
                        ),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("use")
                        .about("Select the acting user")
                        .arg(Arg::new("id").long("id").required(true)),
                )
                .subcommand(
                    Command::new("budget")
                        .about("Set the monthly budget")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(user_arg()),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(transaction_fields(Command::new("add"), true))
                .subcommand(transaction_fields(
                    Command::new("edit").arg(Arg::new("id").long("id").required(true)),
                    false,
                ))
                .subcommand(json_args(
                    Command::new("list")
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("from").long("from").help("YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").help("YYYY-MM-DD, inclusive"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(user_arg()),
                ))
                .subcommand(
                    Command::new("rm")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .action(ArgAction::Append),
                        )
                        .arg(user_arg()),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Known categories")
                .subcommand(Command::new("list").arg(Arg::new("type").long("type"))),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Summaries and insights")
                .subcommand(json_args(
                    Command::new("overview").arg(as_of_arg()).arg(user_arg()),
                ))
                .subcommand(json_args(
                    Command::new("breakdown")
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .default_value("month")
                                .help("week, month or year; anything else means all time"),
                        )
                        .arg(as_of_arg())
                        .arg(user_arg()),
                ))
                .subcommand(json_args(
                    Command::new("trends")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(u32))
                                .help("1 to 24, default 6"),
                        )
                        .arg(as_of_arg())
                        .arg(user_arg()),
                ))
                .subcommand(json_args(
                    Command::new("insights").arg(as_of_arg()).arg(user_arg()),
                )),
        )
}
