// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::resolve_book;
use crate::store;
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// Rewrites text so the upload tokenizer reads it back as written: it has no
/// escaped quotes and never joins lines, so `"` becomes `'` and line breaks
/// become spaces. Commas are left alone; the writer quotes those fields.
pub fn upload_safe(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .replace('"', "'")
        .trim()
        .to_string()
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    let owner = store::current_owner(conn)?;
    let book = resolve_book(conn, &owner, sub)?;

    let mut rows = store::list_transactions(conn, &owner, &book)?;
    // oldest first, the order a statement would list them in
    rows.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "category",
                "subcategory",
                "income",
                "expense",
                "note",
                "paid with",
                "labels",
            ])?;
            for t in &rows {
                wtr.write_record([
                    upload_safe(&t.date),
                    upload_safe(&t.category),
                    upload_safe(t.subcategory.as_deref().unwrap_or_default()),
                    t.income.to_string(),
                    t.expense.to_string(),
                    upload_safe(t.note.as_deref().unwrap_or_default()),
                    upload_safe(t.paid_with.as_deref().unwrap_or_default()),
                    upload_safe(&t.labels.join(";")),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        _ => return Err(anyhow!("Unknown format: {} (use csv|json)", fmt)),
    }
    println!(
        "Exported {} transaction(s) from '{}' to {}",
        rows.len(),
        book.name,
        out
    );
    Ok(())
}
