// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use tallybook::{cli, commands::transactions, db, store};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    store::sign_in(&conn, "alice").unwrap();
    let book = store::create_book(&conn, "alice", "Home", "USD").unwrap();
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO transactions(book_id,owner,date,category,income,expense) VALUES (?1,'alice',?2,'Food','0','10')",
            params![book.id, format!("2025-01-0{}", i)],
        )
        .unwrap();
    }
    conn
}

fn run(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["tallybook", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(conn, tx_m)
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let matches =
        cli::build_cli().get_matches_from(["tallybook", "tx", "list", "--book", "Home", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
            assert_eq!(rows[0].expense, "10.00");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn add_normalizes_date_and_labels() {
    let mut conn = setup();
    run(
        &mut conn,
        &[
            "add", "--book", "Home", "--date", "2/14/2025", "--category", "Gifts",
            "--expense", "1,250.00", "--labels", "family; roses|family",
        ],
    )
    .unwrap();

    let book = store::book_by_name(&conn, "alice", "Home").unwrap();
    let rows = store::list_transactions(&conn, "alice", &book).unwrap();
    let added = &rows[0];
    assert_eq!(added.date, "2025-02-14");
    assert_eq!(added.expense, Decimal::new(125000, 2));
    assert_eq!(added.labels, vec!["family", "roses"]);
}

#[test]
fn add_requires_category() {
    let mut conn = setup();
    let err = run(&mut conn, &["add", "--book", "Home", "--date", "2025-02-14"]).unwrap_err();
    assert!(err.to_string().contains("A category is required"));
}

#[test]
fn edit_changes_only_editable_fields() {
    let mut conn = setup();
    let id: i64 = conn
        .query_row("SELECT id FROM transactions ORDER BY id LIMIT 1", [], |r| r.get(0))
        .unwrap();
    run(
        &mut conn,
        &[
            "edit", "--id", &id.to_string(), "--category", "Dining", "--subcategory", "Lunch",
            "--note", "team",
        ],
    )
    .unwrap();

    let tx = store::get_transaction(&conn, "alice", id).unwrap();
    assert_eq!(tx.category, "Dining");
    assert_eq!(tx.subcategory.as_deref(), Some("Lunch"));
    assert_eq!(tx.note.as_deref(), Some("team"));
    assert_eq!(tx.date, "2025-01-01");
    assert_eq!(tx.expense, Decimal::new(10, 0));

    // an empty value clears an optional field
    run(&mut conn, &["edit", "--id", &id.to_string(), "--subcategory", ""]).unwrap();
    let tx = store::get_transaction(&conn, "alice", id).unwrap();
    assert_eq!(tx.subcategory, None);
}

#[test]
fn edit_rejects_blank_category() {
    let mut conn = setup();
    let id: i64 = conn
        .query_row("SELECT id FROM transactions LIMIT 1", [], |r| r.get(0))
        .unwrap();
    let err = run(&mut conn, &["edit", "--id", &id.to_string(), "--category", "  "]).unwrap_err();
    assert!(err.to_string().contains("Category must not be empty"));
}

#[test]
fn rows_are_invisible_to_other_owners() {
    let mut conn = setup();
    let id: i64 = conn
        .query_row("SELECT id FROM transactions LIMIT 1", [], |r| r.get(0))
        .unwrap();

    store::sign_in(&conn, "bob").unwrap();
    assert!(store::get_transaction(&conn, "bob", id).is_err());
    assert!(store::book_by_name(&conn, "bob", "Home").is_err());
    let err = run(&mut conn, &["rm", "--id", &id.to_string()]).unwrap_err();
    assert!(err.to_string().contains("not found"));

    store::sign_in(&conn, "alice").unwrap();
    run(&mut conn, &["rm", "--id", &id.to_string()]).unwrap();
    let left: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(left, 2);
}
