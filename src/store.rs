// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Books and transactions, always scoped to the acting owner.
//!
//! Every statement carries `owner=?` so a caller can only see or change its
//! own rows. Removing a book relies on the `ON DELETE CASCADE` foreign key
//! to take its transactions with it.

use crate::models::{Book, NewTransaction, Transaction, TransactionEdit};
use crate::utils::{clear_setting, get_setting, set_setting};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use tracing::info;

const OWNER_KEY: &str = "owner";

// Session

pub fn sign_in(conn: &Connection, owner: &str) -> Result<String> {
    let owner = owner.trim();
    if owner.is_empty() {
        return Err(anyhow!("Owner name must not be empty"));
    }
    set_setting(conn, OWNER_KEY, owner)?;
    info!(owner, "signed in");
    Ok(owner.to_string())
}

pub fn sign_out(conn: &Connection) -> Result<Option<String>> {
    let prev = get_setting(conn, OWNER_KEY)?;
    clear_setting(conn, OWNER_KEY)?;
    Ok(prev)
}

pub fn current_owner(conn: &Connection) -> Result<String> {
    get_setting(conn, OWNER_KEY)?
        .context("Not signed in; run `tallybook auth login <name>` first")
}

// Books

fn book_from_row(r: &Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: r.get(0)?,
        owner: r.get(1)?,
        name: r.get(2)?,
        currency: r.get(3)?,
        created_at: r.get(4)?,
        updated_at: r.get(5)?,
    })
}

pub fn list_books(conn: &Connection, owner: &str) -> Result<Vec<Book>> {
    let mut stmt = conn.prepare(
        "SELECT id, owner, name, currency, created_at, updated_at
         FROM books WHERE owner=?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![owner], book_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn create_book(conn: &Connection, owner: &str, name: &str, currency: &str) -> Result<Book> {
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Book name must not be empty"));
    }
    let currency = currency.trim().to_uppercase();
    conn.execute(
        "INSERT INTO books(owner, name, currency) VALUES (?1, ?2, ?3)",
        params![owner, name, currency],
    )
    .with_context(|| format!("Could not create book '{}'", name))?;
    info!(owner, name, %currency, "created book");
    book_by_name(conn, owner, name)
}

pub fn book_by_name(conn: &Connection, owner: &str, name: &str) -> Result<Book> {
    conn.query_row(
        "SELECT id, owner, name, currency, created_at, updated_at
         FROM books WHERE owner=?1 AND name=?2",
        params![owner, name.trim()],
        book_from_row,
    )
    .optional()?
    .with_context(|| format!("Book '{}' not found", name.trim()))
}

/// Deletes the book and, through the cascade, all of its transactions.
/// Returns how many transactions went with it.
pub fn delete_book(conn: &Connection, owner: &str, name: &str) -> Result<usize> {
    let book = book_by_name(conn, owner, name)?;
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE book_id=?1",
        params![book.id],
        |r| r.get(0),
    )?;
    conn.execute(
        "DELETE FROM books WHERE id=?1 AND owner=?2",
        params![book.id, owner],
    )?;
    info!(owner, name = %book.name, transactions = count, "deleted book");
    Ok(count as usize)
}

// Transactions

fn decimal_column(r: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = r.get(idx)?;
    raw.parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn labels_column(r: &Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = r.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn transaction_from_row(r: &Row) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        book_id: r.get(1)?,
        date: r.get(2)?,
        category: r.get(3)?,
        subcategory: r.get(4)?,
        income: decimal_column(r, 5)?,
        expense: decimal_column(r, 6)?,
        note: r.get(7)?,
        paid_with: r.get(8)?,
        labels: labels_column(r, 9)?,
    })
}

const TX_COLUMNS: &str =
    "id, book_id, date, category, subcategory, income, expense, note, paid_with, labels";

/// All transactions of a book, newest first.
pub fn list_transactions(conn: &Connection, owner: &str, book: &Book) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE book_id=?1 AND owner=?2 ORDER BY date DESC, id DESC",
        TX_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![book.id, owner], transaction_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn get_transaction(conn: &Connection, owner: &str, id: i64) -> Result<Transaction> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE id=?1 AND owner=?2",
        TX_COLUMNS
    );
    conn.query_row(&sql, params![id, owner], transaction_from_row)
        .optional()?
        .with_context(|| format!("Transaction {} not found", id))
}

/// Inserts all records in one SQLite transaction; either every row lands or none.
pub fn insert_transactions(
    conn: &mut Connection,
    owner: &str,
    book: &Book,
    records: &[NewTransaction],
) -> Result<usize> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO transactions(book_id, owner, date, category, subcategory, income, expense, note, paid_with, labels)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
        )?;
        for rec in records {
            stmt.execute(params![
                book.id,
                owner,
                rec.date,
                rec.category,
                rec.subcategory,
                rec.income.to_string(),
                rec.expense.to_string(),
                rec.note,
                rec.paid_with,
                serde_json::to_string(&rec.labels)?,
            ])?;
        }
    }
    tx.commit()?;
    info!(owner, book = %book.name, rows = records.len(), "inserted transactions");
    Ok(records.len())
}

pub fn update_transaction(
    conn: &Connection,
    owner: &str,
    id: i64,
    edit: &TransactionEdit,
) -> Result<Transaction> {
    let mut current = get_transaction(conn, owner, id)?;
    if let Some(category) = &edit.category {
        let category = category.trim();
        if category.is_empty() {
            return Err(anyhow!("Category must not be empty"));
        }
        current.category = category.to_string();
    }
    if let Some(sub) = &edit.subcategory {
        current.subcategory = sub.clone();
    }
    if let Some(income) = edit.income {
        current.income = income;
    }
    if let Some(expense) = edit.expense {
        current.expense = expense;
    }
    if let Some(note) = &edit.note {
        current.note = note.clone();
    }
    if let Some(paid_with) = &edit.paid_with {
        current.paid_with = paid_with.clone();
    }
    if let Some(labels) = &edit.labels {
        current.labels = labels.clone();
    }

    conn.execute(
        "UPDATE transactions
         SET category=?1, subcategory=?2, income=?3, expense=?4, note=?5, paid_with=?6, labels=?7,
             updated_at=datetime('now')
         WHERE id=?8 AND owner=?9",
        params![
            current.category,
            current.subcategory,
            current.income.to_string(),
            current.expense.to_string(),
            current.note,
            current.paid_with,
            serde_json::to_string(&current.labels)?,
            id,
            owner
        ],
    )?;
    Ok(current)
}

pub fn delete_transaction(conn: &Connection, owner: &str, id: i64) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE id=?1 AND owner=?2",
        params![id, owner],
    )?;
    if n == 0 {
        return Err(anyhow!("Transaction {} not found", id));
    }
    Ok(())
}
