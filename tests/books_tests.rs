// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::models::NewTransaction;
use tallybook::state::ViewState;
use tallybook::{cli, commands::books, db, store};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    store::sign_in(&conn, "alice").unwrap();
    conn
}

fn rec(date: &str, category: &str, expense: i64) -> NewTransaction {
    NewTransaction {
        date: date.into(),
        category: category.into(),
        subcategory: None,
        income: Decimal::ZERO,
        expense: Decimal::new(expense, 0),
        note: None,
        paid_with: None,
        labels: vec![],
    }
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["tallybook", "book"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("book", book_m)) = matches.subcommand() {
        books::handle(conn, book_m)
    } else {
        panic!("no book subcommand");
    }
}

#[test]
fn add_uses_default_currency() {
    let conn = setup();
    tallybook::utils::set_default_currency(&conn, "eur").unwrap();
    run(&conn, &["add", "--name", "Travel"]).unwrap();
    run(&conn, &["add", "--name", "Savings", "--currency", "jpy"]).unwrap();

    let books = store::list_books(&conn, "alice").unwrap();
    let summary: Vec<_> = books
        .iter()
        .map(|b| (b.name.as_str(), b.currency.as_str()))
        .collect();
    assert_eq!(summary, vec![("Savings", "JPY"), ("Travel", "EUR")]);
}

#[test]
fn duplicate_names_are_per_owner() {
    let conn = setup();
    run(&conn, &["add", "--name", "Home"]).unwrap();
    assert!(run(&conn, &["add", "--name", "Home"]).is_err());

    store::sign_in(&conn, "bob").unwrap();
    run(&conn, &["add", "--name", "Home"]).unwrap();
    assert_eq!(store::list_books(&conn, "bob").unwrap().len(), 1);
    assert_eq!(store::list_books(&conn, "alice").unwrap().len(), 1);
}

#[test]
fn deleting_a_book_cascades_to_its_transactions() {
    let mut conn = setup();
    let home = store::create_book(&conn, "alice", "Home", "USD").unwrap();
    let trip = store::create_book(&conn, "alice", "Trip", "USD").unwrap();
    store::insert_transactions(
        &mut conn,
        "alice",
        &home,
        &[rec("2024-01-01", "Food", 30), rec("2024-01-02", "Rent", 100)],
    )
    .unwrap();
    store::insert_transactions(&mut conn, "alice", &trip, &[rec("2024-02-01", "Hotel", 80)])
        .unwrap();

    let mut view = ViewState::load(&conn, chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap();
    view.book = Some("Home".into());
    view.save(&conn).unwrap();

    run(&conn, &["rm", "--name", "Home"]).unwrap();

    let orphans: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transactions WHERE book_id=?1",
            [home.id],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(orphans, 0);
    assert_eq!(store::list_transactions(&conn, "alice", &trip).unwrap().len(), 1);

    let view = ViewState::load(&conn, chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap();
    assert_eq!(view.book, None);
}

#[test]
fn unknown_book_is_an_error() {
    let conn = setup();
    let err = run(&conn, &["rm", "--name", "Nope"]).unwrap_err();
    assert!(err.to_string().contains("Book 'Nope' not found"));
}
