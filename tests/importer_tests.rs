// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Write;
use tallybook::{cli, commands::importer, db, error::ImportError, store};
use tempfile::{Builder, NamedTempFile};

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    store::sign_in(&conn, "alice").unwrap();
    store::create_book(&conn, "alice", "Home", "usd").unwrap();
    conn
}

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "{}", contents).unwrap();
    file.flush().unwrap();
    file
}

fn run_import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "tallybook",
        "import",
        "transactions",
        "--path",
        path,
        "--book",
        "Home",
    ]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

fn count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn upload_normalizes_dates_and_amounts() {
    let mut conn = base_conn();
    let file = csv_file("Date,Category,Income,Expense\n2024/3/5,Food,0,12.50\n");
    let path = file.path().to_str().unwrap().to_string();
    run_import(&mut conn, &format!("  {}  ", path)).unwrap();

    let book = store::book_by_name(&conn, "alice", "Home").unwrap();
    let rows = store::list_transactions(&conn, "alice", &book).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "2024-03-05");
    assert_eq!(rows[0].category, "Food");
    assert_eq!(rows[0].income, Decimal::ZERO);
    assert_eq!(rows[0].expense, Decimal::new(125, 1));
    assert_eq!(book.currency, "USD");
}

#[test]
fn upload_skips_short_and_incomplete_rows() {
    let mut conn = base_conn();
    let file = csv_file(
        "Expense,Note,Category,Date,Paid\n\
         \"1,200.00\",rent for march,Housing,3/1/2024,Bank\n\
         \n\
         5,no category,,2024-03-02,Cash\n\
         broken,row\n\
         4.5,coffee,Food,2024-03-03,Card\n",
    );
    let path = file.path().to_str().unwrap().to_string();
    let book = store::book_by_name(&conn, "alice", "Home").unwrap();
    let upload = importer::upload(&mut conn, "alice", &book, &path).unwrap();
    assert_eq!(upload.records.len(), 2);
    assert_eq!(upload.discarded, 2);
    assert_eq!(upload.rejected, 1);
    assert_eq!(upload.skipped(), 3);
    assert_eq!(upload.records[0].expense, Decimal::new(120000, 2));
    assert_eq!(upload.records[0].date, "2024-03-01");
    assert_eq!(upload.records[0].paid_with.as_deref(), Some("Bank"));
    assert_eq!(count(&conn), 2);
}

#[test]
fn upload_rejects_wrong_extension() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Category,Expense\n2024-01-01,Food,1").unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let err = run_import(&mut conn, &path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ImportError>(),
        Some(ImportError::WrongExtension(_))
    ));
    assert_eq!(count(&conn), 0);
}

#[test]
fn upload_with_no_valid_rows_writes_nothing() {
    let mut conn = base_conn();
    let file = csv_file("Date,Category,Expense\n,Food,1\n2024-01-01,,2\nx,y\n");
    let path = file.path().to_str().unwrap().to_string();
    let err = run_import(&mut conn, &path).unwrap_err();
    assert!(err.to_string().contains("No valid rows found"));
    assert_eq!(count(&conn), 0);
}

#[test]
fn upload_keeps_unrecognized_dates_verbatim() {
    let mut conn = base_conn();
    let file = csv_file("Date,Category,Expense\n5 March 2024,Food,3\n");
    let path = file.path().to_str().unwrap().to_string();
    run_import(&mut conn, &path).unwrap();

    let date: String = conn
        .query_row("SELECT date FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(date, "5 March 2024");
}

#[test]
fn upload_requires_sign_in() {
    let mut conn = base_conn();
    store::sign_out(&conn).unwrap();
    let file = csv_file("Date,Category,Expense\n2024-01-01,Food,1\n");
    let path = file.path().to_str().unwrap().to_string();
    let err = run_import(&mut conn, &path).unwrap_err();
    assert!(err.to_string().contains("Not signed in"));
}
