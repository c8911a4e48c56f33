// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use std::process::ExitCode;

use coinjar::{LedgerError, Ledger, cli, commands, db};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<LedgerError>() {
            Some(ledger_err) => {
                let kind = ledger_err.kind();
                log::debug!("{:#}", err);
                eprintln!("error[{}]: {}", kind.code(), ledger_err.public_message());
                ExitCode::from(kind.exit_code())
            }
            None => {
                eprintln!("error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn run() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_override = matches.get_one::<String>("db").map(PathBuf::from);
    let store = db::open_or_init(db_override.as_deref())?;
    let ledger = Ledger::new(store);

    match matches.subcommand() {
        Some(("init", _)) => match &db_override {
            Some(p) => println!("Database initialized at {}", p.display()),
            None => println!("Database initialized at {}", db::db_path()?.display()),
        },
        Some(("account", sub)) => commands::accounts::handle(&ledger, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&ledger, sub)?,
        Some(("holding", sub)) => commands::holdings::handle(&ledger, sub)?,
        Some(("interest", sub)) => commands::reports::interest(&ledger, sub)?,
        Some(("networth", _)) => commands::reports::net_worth(&ledger)?,
        Some(("history", sub)) => commands::reports::history(&ledger, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&ledger, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
