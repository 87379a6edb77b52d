// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashbook::models::{Frequency, Recurrence, TxKind, TxStatus};
use cashbook::utils::id_for_transaction;
use cashbook::{cli, commands::transactions, db, store};
use chrono::NaiveDate;
use rusqlite::Connection;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn run(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["cashbook", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(conn, tx_m)
    } else {
        panic!("no tx subcommand");
    }
}

fn setup() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    for day in 1..=3 {
        run(
            &mut conn,
            &[
                "add",
                "--type",
                "expense",
                "--description",
                "Coffee",
                "--amount",
                "10",
                "--category",
                "Food",
                "--due",
                &format!("2025-01-0{}", day),
            ],
        )
        .unwrap();
    }
    conn
}

fn only_id(conn: &Connection, description: &str) -> String {
    let all = store::all_transactions(conn).unwrap();
    let matching: Vec<_> = all
        .iter()
        .filter(|t| t.description == description)
        .collect();
    assert_eq!(matching.len(), 1);
    matching[0].id.clone()
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["cashbook", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].due_date, "2025-01-03");
            assert_eq!(rows[0].status, "pending");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn add_rejects_bad_input() {
    let mut conn = db::open_in_memory().unwrap();
    let base = [
        "add",
        "--type",
        "income",
        "--description",
        "Invoice",
        "--category",
        "Sales",
        "--due",
        "2025-01-10",
    ];

    let mut zero = base.to_vec();
    zero.extend(["--amount", "0"]);
    let err = run(&mut conn, &zero).unwrap_err();
    assert!(err.to_string().contains("must be greater than zero"));

    let mut daily = base.to_vec();
    daily.extend(["--amount", "5", "--frequency", "daily"]);
    let err = run(&mut conn, &daily).unwrap_err();
    assert!(err.to_string().contains("Invalid frequency"));

    let mut ends_early = base.to_vec();
    ends_early.extend(["--amount", "5", "--frequency", "monthly", "--until", "2025-01-10"]);
    let err = run(&mut conn, &ends_early).unwrap_err();
    assert!(err.to_string().contains("Invalid until"));

    assert!(store::all_transactions(&conn).unwrap().is_empty());
}

#[test]
fn pay_settles_once() {
    let mut conn = db::open_in_memory().unwrap();
    run(
        &mut conn,
        &[
            "add",
            "--type",
            "income",
            "--description",
            "Consulting",
            "--amount",
            "250.00",
            "--category",
            "Services",
            "--due",
            "2025-01-10",
            "--client",
            " Acme ",
        ],
    )
    .unwrap();
    let id = only_id(&conn, "Consulting");

    run(
        &mut conn,
        &["pay", "--id", &id[..8], "--method", "pix", "--date", "2025-01-09"],
    )
    .unwrap();
    let t = store::get_transaction(&conn, &id).unwrap();
    assert_eq!(t.kind, TxKind::Income);
    assert_eq!(t.client.as_deref(), Some("Acme"));
    let payment = t.status.payment().unwrap();
    assert_eq!(payment.payment_method, "pix");
    assert_eq!(payment.payment_date, d("2025-01-09"));

    let err = run(&mut conn, &["pay", "--id", &id, "--method", "cash"]).unwrap_err();
    assert!(err.to_string().contains("already paid"));
}

#[test]
fn recur_skips_stored_occurrences() {
    let mut conn = db::open_in_memory().unwrap();
    run(
        &mut conn,
        &[
            "add",
            "--type",
            "expense",
            "--description",
            "Rent",
            "--amount",
            "1200",
            "--category",
            "Housing",
            "--due",
            "2025-01-20",
            "--frequency",
            "monthly",
        ],
    )
    .unwrap();
    let root = only_id(&conn, "Rent");

    // Not paid yet: nothing rolls.
    assert!(transactions::recur(&mut conn, d("2025-02-01")).unwrap().is_empty());

    run(
        &mut conn,
        &["pay", "--id", &root, "--method", "transfer", "--date", "2025-01-20"],
    )
    .unwrap();
    let created = transactions::recur(&mut conn, d("2025-02-01")).unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].due_date, d("2025-02-20"));
    assert_eq!(created[0].status, TxStatus::Pending);
    assert_eq!(created[0].parent_transaction_id.as_deref(), Some(root.as_str()));

    assert!(transactions::recur(&mut conn, d("2025-02-01")).unwrap().is_empty());
    assert_eq!(store::all_transactions(&conn).unwrap().len(), 2);

    let child = created[0].id.clone();
    run(
        &mut conn,
        &["pay", "--id", &child, "--method", "transfer", "--date", "2025-02-20"],
    )
    .unwrap();
    let next = transactions::recur(&mut conn, d("2025-03-01")).unwrap();
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].due_date, d("2025-03-20"));
    assert_eq!(next[0].parent_transaction_id.as_deref(), Some(root.as_str()));
    assert!(transactions::recur(&mut conn, d("2025-03-01")).unwrap().is_empty());
    assert_eq!(store::all_transactions(&conn).unwrap().len(), 3);
}

#[test]
fn recur_stops_at_end_date() {
    let mut conn = db::open_in_memory().unwrap();
    run(
        &mut conn,
        &[
            "add",
            "--type",
            "expense",
            "--description",
            "Gym",
            "--amount",
            "80",
            "--category",
            "Health",
            "--due",
            "2025-01-20",
            "--frequency",
            "monthly",
            "--until",
            "2025-02-15",
        ],
    )
    .unwrap();
    let id = only_id(&conn, "Gym");
    run(&mut conn, &["pay", "--id", &id, "--method", "card"]).unwrap();
    assert!(transactions::recur(&mut conn, d("2025-02-01")).unwrap().is_empty());
}

#[test]
fn refresh_marks_overdue() {
    let mut conn = setup();
    let paid = store::all_transactions(&conn)
        .unwrap()
        .into_iter()
        .find(|t| t.due_date == d("2025-01-01"))
        .unwrap();
    run(&mut conn, &["pay", "--id", &paid.id, "--method", "cash"]).unwrap();

    assert_eq!(transactions::refresh(&mut conn, d("2025-01-03")).unwrap(), 1);
    let overdue: Vec<_> = store::all_transactions(&conn)
        .unwrap()
        .into_iter()
        .filter(|t| t.status == TxStatus::Overdue)
        .collect();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].due_date, d("2025-01-02"));
    assert_eq!(transactions::refresh(&mut conn, d("2025-01-03")).unwrap(), 0);
}

#[test]
fn remove_deletes_by_prefix() {
    let mut conn = db::open_in_memory().unwrap();
    run(
        &mut conn,
        &[
            "add",
            "--type",
            "expense",
            "--description",
            "Paper",
            "--amount",
            "3.50",
            "--category",
            "Office",
            "--due",
            "2025-04-01",
        ],
    )
    .unwrap();
    let id = only_id(&conn, "Paper");
    run(&mut conn, &["rm", "--id", &id[..6]]).unwrap();
    assert!(store::all_transactions(&conn).unwrap().is_empty());

    let err = run(&mut conn, &["rm", "--id", "nope"]).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn edit_changes_amount_due_and_recurrence() {
    let mut conn = db::open_in_memory().unwrap();
    run(
        &mut conn,
        &[
            "add",
            "--type",
            "expense",
            "--description",
            "Gym",
            "--amount",
            "45",
            "--category",
            "Health",
            "--due",
            "2025-02-01",
            "--note",
            "front desk",
        ],
    )
    .unwrap();
    let id = only_id(&conn, "Gym");

    run(
        &mut conn,
        &[
            "edit",
            "--id",
            &id[..8],
            "--amount",
            "49.90",
            "--due",
            "2025-02-05",
            "--frequency",
            "monthly",
            "--until",
            "2025-12-31",
        ],
    )
    .unwrap();
    let t = store::get_transaction(&conn, &id).unwrap();
    assert_eq!(t.amount, rust_decimal::Decimal::new(4990, 2));
    assert_eq!(t.due_date, d("2025-02-05"));
    assert_eq!(
        t.recurrence,
        Some(Recurrence {
            frequency: Frequency::Monthly,
            end_date: Some(d("2025-12-31")),
        })
    );
    assert_eq!(t.description, "Gym");
    assert_eq!(t.notes.as_deref(), Some("front desk"));
    assert_eq!(t.status, TxStatus::Pending);

    // switching frequency keeps the stored end date
    run(&mut conn, &["edit", "--id", &id, "--frequency", "quarterly"]).unwrap();
    let t = store::get_transaction(&conn, &id).unwrap();
    assert_eq!(t.recurrence.unwrap().frequency, Frequency::Quarterly);
    assert_eq!(t.recurrence.unwrap().end_date, Some(d("2025-12-31")));
}

#[test]
fn edit_rejects_invalid_changes() {
    let mut conn = setup();
    let id = store::all_transactions(&conn).unwrap()[0].id.clone();
    let before = store::get_transaction(&conn, &id).unwrap();

    let err = run(&mut conn, &["edit", "--id", &id, "--amount", "0"]).unwrap_err();
    assert!(err.to_string().contains("must be greater than zero"));

    let err = run(&mut conn, &["edit", "--id", &id, "--until", "2025-06-01"]).unwrap_err();
    assert!(err.to_string().contains("Invalid until"));

    let err = run(
        &mut conn,
        &["edit", "--id", &id, "--frequency", "weekly", "--until", "2024-12-31"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Invalid until"));

    let err = run(&mut conn, &["edit", "--id", &id, "--frequency", "hourly"]).unwrap_err();
    assert!(err.to_string().contains("Invalid frequency"));

    assert_eq!(store::get_transaction(&conn, &id).unwrap(), before);
}

#[test]
fn id_prefix_matches_literally() {
    let mut conn = db::open_in_memory().unwrap();
    conn.execute(
        "INSERT INTO transactions(id, kind, description, amount, category, due_date, status)
         VALUES ('abc123', 'expense', 'Ink', '12', 'Office', '2025-01-01', 'pending')",
        [],
    )
    .unwrap();

    assert_eq!(id_for_transaction(&conn, "abc").unwrap(), "abc123");
    for pattern in ["%", "_b", "a%3", ""] {
        assert!(id_for_transaction(&conn, pattern).is_err(), "{pattern}");
    }
    assert!(run(&mut conn, &["rm", "--id", "%"]).is_err());
    assert_eq!(store::all_transactions(&conn).unwrap().len(), 1);
}
