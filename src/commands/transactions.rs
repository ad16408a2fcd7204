// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::resolve_book;
use crate::models::{NewTransaction, TransactionEdit};
use crate::normalize::parse_labels;
use crate::store;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let owner = store::current_owner(conn)?;
            let id = *sub.get_one::<i64>("id").unwrap();
            store::delete_transaction(conn, &owner, id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn text_arg(sub: &clap::ArgMatches, name: &str) -> Option<String> {
    sub.get_one::<String>(name).map(|s| s.trim().to_string())
}

// Empty string means "clear the field"
fn optional_text(sub: &clap::ArgMatches, name: &str) -> Option<Option<String>> {
    text_arg(sub, name).map(|s| if s.is_empty() { None } else { Some(s) })
}

fn amount_arg(sub: &clap::ArgMatches, name: &str) -> Result<Option<Decimal>> {
    sub.get_one::<String>(name)
        .map(|s| parse_decimal(s))
        .transpose()
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = store::current_owner(conn)?;
    let book = resolve_book(conn, &owner, sub)?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let category = text_arg(sub, "category")
        .filter(|c| !c.is_empty())
        .ok_or_else(|| anyhow::anyhow!("A category is required"))?;

    let rec = NewTransaction {
        date: date.to_string(),
        category,
        subcategory: optional_text(sub, "subcategory").flatten(),
        income: amount_arg(sub, "income")?.unwrap_or(Decimal::ZERO),
        expense: amount_arg(sub, "expense")?.unwrap_or(Decimal::ZERO),
        note: optional_text(sub, "note").flatten(),
        paid_with: optional_text(sub, "paid_with").flatten(),
        labels: text_arg(sub, "labels")
            .map(|l| parse_labels(&l))
            .unwrap_or_default(),
    };
    store::insert_transactions(conn, &owner, &book, std::slice::from_ref(&rec))?;
    println!(
        "Recorded {} on {} (income {}, expense {}) in '{}'",
        rec.category, rec.date, rec.income, rec.expense, book.name
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = store::current_owner(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let edit = TransactionEdit {
        category: text_arg(sub, "category"),
        subcategory: optional_text(sub, "subcategory"),
        income: amount_arg(sub, "income")?,
        expense: amount_arg(sub, "expense")?,
        note: optional_text(sub, "note"),
        paid_with: optional_text(sub, "paid_with"),
        labels: text_arg(sub, "labels").map(|l| parse_labels(&l)),
    };
    if edit.is_empty() {
        println!("Nothing to change for transaction {}", id);
        return Ok(());
    }
    let tx = store::update_transaction(conn, &owner, id, &edit)?;
    println!(
        "Updated transaction {}: {} / {} (income {}, expense {})",
        tx.id,
        tx.category,
        tx.subcategory.as_deref().unwrap_or("-"),
        tx.income,
        tx.expense
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.category.clone(),
                    r.subcategory.clone(),
                    r.income.clone(),
                    r.expense.clone(),
                    r.note.clone(),
                    r.paid_with.clone(),
                    r.labels.join(", "),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Date", "Category", "Subcategory", "Income", "Expense", "Note",
                    "Paid with", "Labels",
                ],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub category: String,
    pub subcategory: String,
    pub income: String,
    pub expense: String,
    pub note: String,
    pub paid_with: String,
    pub labels: Vec<String>,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let owner = store::current_owner(conn)?;
    let book = resolve_book(conn, &owner, sub)?;
    let category = text_arg(sub, "category");
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    let data = store::list_transactions(conn, &owner, &book)?
        .into_iter()
        .filter(|t| category.as_deref().is_none_or(|c| t.category == c))
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date,
            category: t.category,
            subcategory: t.subcategory.unwrap_or_default(),
            income: format!("{:.2}", t.income),
            expense: format!("{:.2}", t.expense),
            note: t.note.unwrap_or_default(),
            paid_with: t.paid_with.unwrap_or_default(),
            labels: t.labels,
        })
        .collect();
    Ok(data)
}
