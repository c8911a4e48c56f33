// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use coinjar::commands::{accounts, holdings, transactions};
use coinjar::models::{AccountKind, NewAccount};
use coinjar::{ErrorKind, Ledger, LedgerError, cli};
use rust_decimal::Decimal;

fn setup() -> (Ledger, uuid::Uuid) {
    let ledger = Ledger::open_in_memory().unwrap();
    let id = ledger
        .create_account(NewAccount::new("A1", "checking"))
        .unwrap()
        .id();
    (ledger, id)
}

fn run_tx(ledger: &Ledger, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["coinjar", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", m)) => transactions::handle(ledger, m),
        _ => panic!("no tx subcommand"),
    }
}

#[test]
fn account_add_parses_savings_terms() {
    let (ledger, _) = setup();
    let matches = cli::build_cli().get_matches_from([
        "coinjar",
        "account",
        "add",
        "--name",
        " Emergency ",
        "--type",
        "Savings",
        "--rate",
        " 4.5 ",
        "--compounding",
        "4",
        "--balance",
        "1000",
    ]);
    if let Some(("account", m)) = matches.subcommand() {
        accounts::handle(&ledger, m).unwrap();
    } else {
        panic!("account command not parsed");
    }
    let created = ledger
        .list_accounts()
        .unwrap()
        .into_iter()
        .find(|a| a.name() == "Emergency")
        .unwrap();
    assert_eq!(created.kind(), AccountKind::Savings);
    let snap = created.savings_snapshot().unwrap();
    assert_eq!(snap.interest_rate, Decimal::new(45, 1));
    assert_eq!(snap.compounding_periods_per_year, 4);
    assert_eq!(snap.balance, Decimal::from(1000));
}

#[test]
fn account_add_rejects_unknown_type() {
    let (ledger, _) = setup();
    let matches = cli::build_cli().get_matches_from([
        "coinjar", "account", "add", "--name", "Card", "--type", "credit",
    ]);
    let Some(("account", m)) = matches.subcommand() else {
        panic!("account command not parsed");
    };
    let err = accounts::handle(&ledger, m).unwrap_err();
    let ledger_err = err.downcast_ref::<LedgerError>().unwrap();
    assert_eq!(ledger_err.kind(), ErrorKind::Validation);
}

#[test]
fn tx_add_then_list_newest_first_with_limit() {
    let (ledger, id) = setup();
    let acct = id.to_string();
    for (date, amount) in [("2025-01-02", "-10"), ("2025-01-09", "25.5"), ("2025-01-05", "-3")] {
        run_tx(
            &ledger,
            &[
                "add", "--account", &acct, "--source", "Shop", "--date", date, "--amount", amount,
            ],
        )
        .unwrap();
    }

    let matches = cli::build_cli().get_matches_from(["coinjar", "tx", "list", "--limit", "2"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = transactions::query_rows(&ledger, list_m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-09");
    assert_eq!(rows[0].account, "A1");
    assert_eq!(rows[0].amount, "25.50");
    assert_eq!(rows[1].date, "2025-01-05");

    assert_eq!(
        ledger.get_account(id).unwrap().balance(),
        Some(Decimal::new(125, 1))
    );
}

#[test]
fn tx_add_rejects_bad_date_without_writing() {
    let (ledger, id) = setup();
    let acct = id.to_string();
    let err = run_tx(
        &ledger,
        &[
            "add", "--account", &acct, "--source", "Shop", "--date", "2025-13-03", "--amount", "5",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Invalid date '2025-13-03'"));
    assert!(ledger.list_transactions().unwrap().is_empty());
}

#[test]
fn tx_rm_restores_balance() {
    let (ledger, id) = setup();
    let acct = id.to_string();
    run_tx(
        &ledger,
        &[
            "add", "--account", &acct, "--source", "Shop", "--date", "2025-02-01", "--amount", "-8",
        ],
    )
    .unwrap();
    let txn_id = ledger.list_transactions().unwrap()[0].id.to_string();
    run_tx(&ledger, &["rm", "--id", &format!(" {} ", txn_id)]).unwrap();
    assert!(ledger.list_transactions().unwrap().is_empty());
    assert_eq!(ledger.get_account(id).unwrap().balance(), Some(Decimal::ZERO));
}

#[test]
fn holding_set_on_brokerage() {
    let ledger = Ledger::open_in_memory().unwrap();
    let broker = ledger
        .create_account(NewAccount::new("Broker", "brokerage"))
        .unwrap()
        .id()
        .to_string();
    let matches = cli::build_cli().get_matches_from([
        "coinjar", "holding", "set", "--account", &broker, "--ticker", "vti", "--quantity", "3.25",
    ]);
    let Some(("holding", m)) = matches.subcommand() else {
        panic!("holding command not parsed");
    };
    holdings::handle(&ledger, m).unwrap();
    let held = ledger.list_holdings(broker.parse().unwrap()).unwrap();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].ticker, "VTI");
    assert_eq!(held[0].quantity, Decimal::new(325, 2));
}
