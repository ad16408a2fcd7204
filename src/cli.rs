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
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn book_arg() -> Arg {
    Arg::new("book")
        .long("book")
        .short('b')
        .help("Book name (defaults to the book selected with `view book`)")
}

fn window_args(cmd: Command) -> Command {
    cmd.arg(book_arg())
        .arg(
            Arg::new("date")
                .long("date")
                .help("Reference date inside the period (defaults to the view cursor)"),
        )
        .arg(
            Arg::new("period")
                .long("period")
                .help("week|month|year (defaults to the view period)"),
        )
}

fn edit_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("category").long("category"))
        .arg(Arg::new("subcategory").long("subcategory"))
        .arg(Arg::new("income").long("income"))
        .arg(Arg::new("expense").long("expense"))
        .arg(Arg::new("note").long("note"))
        .arg(Arg::new("paid_with").long("paid-with"))
        .arg(
            Arg::new("labels")
                .long("labels")
                .help("Labels separated by ';' or '|'"),
        )
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Personal finance books: upload CSV statements, see where the money goes")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Path of the SQLite database (overrides TALLYBOOK_DB)"),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .global(true)
                .default_value("warn")
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .help("Log level used when RUST_LOG is not set"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("auth")
                .about("Choose the identity that owns books and transactions")
                .subcommand(
                    Command::new("login")
                        .visible_alias("signup")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(Command::new("logout"))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("book")
                .about("Manage books")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("currency").long("currency")),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a book together with all of its transactions")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions of a book")
                .subcommand(edit_args(
                    Command::new("add")
                        .arg(book_arg())
                        .arg(Arg::new("date").long("date").required(true)),
                ))
                .subcommand(json_args(
                    Command::new("list")
                        .arg(book_arg())
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(edit_args(
                    Command::new("edit").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Upload statements")
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(book_arg()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write a book's transactions to a file")
                .subcommand(
                    Command::new("transactions")
                        .arg(book_arg())
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries of the selected period")
                .subcommand(json_args(window_args(Command::new("summary"))))
                .subcommand(json_args(window_args(Command::new("by-category"))))
                .subcommand(json_args(window_args(Command::new("by-subcategory"))))
                .subcommand(json_args(
                    Command::new("trend")
                        .about("Expense per month over the whole book")
                        .arg(book_arg()),
                ))
                .subcommand(json_args(
                    window_args(Command::new("top"))
                        .arg(
                            Arg::new("group")
                                .long("group")
                                .help("category|subcategory (defaults to the view grouping)"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize))
                                .help("How many groups to show (5 for cards, 10 for bars)"),
                        ),
                ))
                .subcommand(json_args(window_args(Command::new("dashboard")))),
        )
        .subcommand(
            Command::new("view")
                .about("Inspect or change the stored view state")
                .subcommand(json_args(Command::new("show")))
                .subcommand(Command::new("book").arg(Arg::new("name").required(true)))
                .subcommand(Command::new("period").arg(Arg::new("period").required(true)))
                .subcommand(Command::new("group").arg(Arg::new("group").required(true)))
                .subcommand(Command::new("mode").arg(Arg::new("mode").required(true)))
                .subcommand(Command::new("date").arg(Arg::new("date").required(true)))
                .subcommand(Command::new("prev"))
                .subcommand(Command::new("next"))
                .subcommand(Command::new("today")),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-currency").arg(Arg::new("currency").required(true)),
                ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Report rows with unusable dates and near-duplicate labels")
                .arg(book_arg()),
        )
}
