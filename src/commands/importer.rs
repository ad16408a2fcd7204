// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::resolve_book;
use crate::error::ImportError;
use crate::models::{Book, NewTransaction};
use crate::normalize::normalize_table;
use crate::parser::parse_csv;
use crate::store;
use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// What an upload found in a statement, before anything is stored.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub records: Vec<NewTransaction>,
    /// Lines dropped by the tokenizer (fewer than three fields).
    pub discarded: usize,
    /// Rows dropped by the normalizer (no date or no category).
    pub rejected: usize,
}

impl Upload {
    pub fn skipped(&self) -> usize {
        self.discarded + self.rejected
    }
}

/// Reads and normalizes a statement. Fails on anything structural so the
/// caller never writes a partial upload.
pub fn read_statement(path: &str) -> Result<Upload, ImportError> {
    let is_csv = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(ImportError::WrongExtension(path.to_string()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Unreadable {
        path: path.to_string(),
        source,
    })?;

    let table = parse_csv(&text);
    let normalized = normalize_table(&table);
    debug!(
        path,
        kept = normalized.records.len(),
        discarded = table.discarded,
        rejected = normalized.rejected,
        "normalized statement"
    );
    if normalized.records.is_empty() {
        return Err(ImportError::NoValidRows(path.to_string()));
    }
    Ok(Upload {
        records: normalized.records,
        discarded: table.discarded,
        rejected: normalized.rejected,
    })
}

pub fn upload(conn: &mut Connection, owner: &str, book: &Book, path: &str) -> Result<Upload> {
    let upload = read_statement(path)?;
    store::insert_transactions(conn, owner, book, &upload.records)?;
    info!(
        path,
        book = %book.name,
        imported = upload.records.len(),
        skipped = upload.skipped(),
        "upload finished"
    );
    Ok(upload)
}

fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let owner = store::current_owner(conn)?;
    let book = resolve_book(conn, &owner, sub)?;
    let upload = upload(conn, &owner, &book, path)?;
    println!(
        "Imported {} transaction(s) into '{}' from {} ({} row(s) skipped)",
        upload.records.len(),
        book.name,
        path,
        upload.skipped()
    );
    Ok(())
}
