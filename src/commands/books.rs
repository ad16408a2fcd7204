// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::state::ViewState;
use crate::store;
use crate::utils::{get_default_currency, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let owner = store::current_owner(conn)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let ccy = match sub.get_one::<String>("currency") {
                Some(c) => c.clone(),
                None => get_default_currency(conn)?,
            };
            let book = store::create_book(conn, &owner, name, &ccy)?;
            println!("Added book '{}' ({})", book.name, book.currency);
        }
        Some(("list", sub)) => {
            let books = store::list_books(conn, &owner)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &books)? {
                let data = books
                    .into_iter()
                    .map(|b| vec![b.name, b.currency, b.created_at])
                    .collect();
                println!("{}", pretty_table(&["Name", "Currency", "Created"], data));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let removed = store::delete_book(conn, &owner, name)?;
            // forget the selection if it pointed at the deleted book
            let mut view = ViewState::load(conn, super::today())?;
            if view.book.as_deref() == Some(name.trim()) {
                view.book = None;
                view.save(conn)?;
            }
            println!(
                "Removed book '{}' and {} transaction(s)",
                name.trim(),
                removed
            );
        }
        _ => {}
    }
    Ok(())
}
