// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
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

fn as_of() -> Arg {
    Arg::new("as_of")
        .long("as-of")
        .value_name("YYYY-MM-DD")
        .help("Evaluate as of this date instead of today")
}

fn email() -> Arg {
    Arg::new("email").long("email").required(true)
}

fn tx_id() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .help("Transaction id (a unique prefix is enough)")
}

pub fn build_cli() -> Command {
    Command::new("cashbook")
        .version(crate_version!())
        .about("Income/expense tracking with plans, recurring transactions and due alerts")
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("account")
                .about("Accounts and subscription plans")
                .subcommand(
                    Command::new("signup")
                        .about("Create an account on a 7-day trial")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(email())
                        .arg(
                            Arg::new("role")
                                .long("role")
                                .default_value("user")
                                .value_parser(["admin", "user"]),
                        )
                        .arg(as_of()),
                )
                .subcommand(json_flags(Command::new("list").arg(as_of())))
                .subcommand(json_flags(Command::new("show").arg(email()).arg(as_of())))
                .subcommand(
                    Command::new("plan")
                        .about("Move an account to another plan")
                        .arg(email())
                        .arg(
                            Arg::new("plan")
                                .long("plan")
                                .required(true)
                                .help("trial | basic | premium | annual"),
                        )
                        .arg(as_of()),
                )
                .subcommand(
                    Command::new("pay")
                        .about("Record one billing-cycle payment")
                        .arg(email())
                        .arg(as_of()),
                )
                .subcommand(Command::new("activate").arg(email()))
                .subcommand(Command::new("deactivate").arg(email()))
                .subcommand(
                    Command::new("rm")
                        .about("Delete an account (admin only)")
                        .arg(email())
                        .arg(
                            Arg::new("by")
                                .long("by")
                                .required(true)
                                .help("Email of the admin performing the removal"),
                        ),
                )
                .subcommand(json_flags(Command::new("stats").arg(as_of()))),
        )
        .subcommand(
            Command::new("tx")
                .about("Income and expense transactions")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income | expense"),
                        )
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("due")
                                .long("due")
                                .required(true)
                                .value_name("YYYY-MM-DD"),
                        )
                        .arg(Arg::new("client").long("client"))
                        .arg(Arg::new("phone").long("phone"))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .help("weekly | monthly | quarterly | yearly"),
                        )
                        .arg(
                            Arg::new("until")
                                .long("until")
                                .value_name("YYYY-MM-DD")
                                .requires("frequency")
                                .help("No occurrence on or after this date"),
                        )
                        .arg(Arg::new("owner").long("owner").help("Owner account email"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").value_name("YYYY-MM"))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .value_parser(["pending", "paid", "overdue"]),
                        )
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("owner").long("owner"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Change fields of a stored transaction")
                        .arg(tx_id())
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("due").long("due").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("client").long("client"))
                        .arg(Arg::new("phone").long("phone"))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .help("weekly | monthly | quarterly | yearly"),
                        )
                        .arg(
                            Arg::new("until")
                                .long("until")
                                .value_name("YYYY-MM-DD")
                                .help("Only for recurring transactions"),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(
                    Command::new("pay")
                        .about("Mark a transaction as paid")
                        .arg(tx_id())
                        .arg(Arg::new("method").long("method").required(true))
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD")),
                )
                .subcommand(Command::new("rm").arg(tx_id()))
                .subcommand(
                    Command::new("recur")
                        .about("Generate the next occurrence of settled recurring transactions")
                        .arg(as_of()),
                )
                .subcommand(
                    Command::new("refresh")
                        .about("Mark pending transactions past their due date as overdue")
                        .arg(as_of()),
                ),
        )
        .subcommand(
            Command::new("alerts")
                .about("Due-soon and overdue notifications")
                .subcommand(Command::new("scan").arg(as_of()))
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("unread")
                            .long("unread")
                            .action(ArgAction::SetTrue),
                    ),
                ))
                .subcommand(
                    Command::new("read")
                        .arg(Arg::new("id").long("id").conflicts_with("all"))
                        .arg(Arg::new("all").long("all").action(ArgAction::SetTrue)),
                ),
        )
        .subcommand(
            Command::new("goal")
                .about("Monthly income/expense/savings goals")
                .subcommand(
                    Command::new("set")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .required(true)
                                .value_name("YYYY-MM"),
                        )
                        .arg(Arg::new("income").long("income").default_value("0"))
                        .arg(Arg::new("expense").long("expense").default_value("0"))
                        .arg(Arg::new("savings").long("savings").default_value("0")),
                )
                .subcommand(json_flags(
                    Command::new("status").arg(
                        Arg::new("month")
                            .long("month")
                            .required(true)
                            .value_name("YYYY-MM"),
                    ),
                )),
        )
        .subcommand(
            Command::new("settings")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("alerts")
                        .arg(
                            Arg::new("days")
                                .long("days")
                                .value_parser(value_parser!(i64).range(0..)),
                        )
                        .arg(
                            Arg::new("due")
                                .long("due")
                                .value_parser(value_parser!(bool)),
                        )
                        .arg(
                            Arg::new("overdue")
                                .long("overdue")
                                .value_parser(value_parser!(bool)),
                        ),
                )
                .subcommand(
                    Command::new("currency").arg(Arg::new("code").long("code").required(true)),
                ),
        )
        .subcommand(
            Command::new("report").subcommand(json_flags(
                Command::new("month").arg(
                    Arg::new("month")
                        .long("month")
                        .required(true)
                        .value_name("YYYY-MM"),
                ),
            )),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .required(true)
                            .value_parser(["csv", "json"]),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check stored records for inconsistencies")
                .arg(as_of()),
        )
}
