// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod books;
pub mod config;
pub mod doctor;
pub mod exporter;
pub mod importer;
pub mod reports;
pub mod transactions;
pub mod view;

use crate::models::Book;
use crate::state::ViewState;
use crate::store;
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// The book named by `--book`, falling back to the one selected in the view state.
pub fn resolve_book(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<Book> {
    let explicit = sub
        .try_get_one::<String>("book")
        .ok()
        .flatten()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let name = match explicit {
        Some(name) => name,
        None => ViewState::load(conn, today())?
            .book
            .context("No book given; pass --book or select one with `tallybook view book <name>`")?,
    };
    store::book_by_name(conn, owner, &name)
}
