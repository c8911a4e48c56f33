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
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn account_arg() -> Arg {
    Arg::new("account")
        .long("account")
        .required(true)
        .help("Account id")
}

fn id_arg(what: &'static str) -> Arg {
    Arg::new("id").long("id").required(true).help(what)
}

pub fn build_cli() -> Command {
    Command::new("coinjar")
        .version(crate_version!())
        .about("Personal finance ledger: checking, savings and brokerage accounts")
        .arg(
            Arg::new("db")
                .long("db")
                .env("COINJAR_DB")
                .global(true)
                .help("Path to the ledger database (defaults to the platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the ledger database"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Create an account")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("checking | savings | brokerage"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .default_value("ASSET")
                                .help("ASSET | DEBT"),
                        )
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .allow_hyphen_values(true)
                                .help("Opening balance (cash accounts only)"),
                        )
                        .arg(
                            Arg::new("rate")
                                .long("rate")
                                .help("Annual interest rate in percent (savings only)"),
                        )
                        .arg(
                            Arg::new("compounding")
                                .long("compounding")
                                .value_parser(value_parser!(u32))
                                .help("Compounding periods per year (savings only, default 12)"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List accounts")))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show one account")
                        .arg(id_arg("Account id")),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete an account and all of its transactions")
                        .arg(id_arg("Account id")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction against a cash account")
                        .arg(account_arg())
                        .arg(Arg::new("source").long("source").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("YYYY-MM-DD or RFC 3339 timestamp"),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(Arg::new("account").long("account").help("Only this account"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(id_arg("Transaction id")),
                ),
        )
        .subcommand(
            Command::new("holding")
                .about("Brokerage positions")
                .subcommand_required(true)
                .subcommand(
                    Command::new("set")
                        .about("Create or update a position")
                        .arg(account_arg())
                        .arg(Arg::new("ticker").long("ticker").required(true))
                        .arg(Arg::new("quantity").long("quantity").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a position")
                        .arg(account_arg())
                        .arg(Arg::new("ticker").long("ticker").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List positions")
                        .arg(account_arg()),
                )),
        )
        .subcommand(json_flags(
            Command::new("interest")
                .about("Periodic payout and effective annual yield of a savings account")
                .arg(account_arg()),
        ))
        .subcommand(Command::new("networth").about("Sum of cash balances, debts negative"))
        .subcommand(json_flags(
            Command::new("history")
                .about("Running balance of a cash account")
                .arg(account_arg()),
        ))
        .subcommand(
            Command::new("doctor")
                .about("Check cached balances against transaction history")
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Rewrite drifted balances"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn negative_amounts_parse() {
        let m = build_cli().get_matches_from([
            "coinjar", "tx", "add", "--account", "x", "--source", "Shop", "--date",
            "2025-01-01", "--amount", "-12.50",
        ]);
        let (_, tx) = m.subcommand().unwrap();
        let (_, add) = tx.subcommand().unwrap();
        assert_eq!(add.get_one::<String>("amount").unwrap(), "-12.50");
    }
}
