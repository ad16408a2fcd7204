// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::today;
use crate::aggregate::GroupKey;
use crate::period::Granularity;
use crate::state::{ViewMode, ViewState};
use crate::store;
use crate::utils::{maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let mut view = ViewState::load(conn, today())?;
    match m.subcommand() {
        Some(("show", sub)) => {
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
                print_view(&view);
            }
            return Ok(());
        }
        Some(("book", sub)) => {
            let owner = store::current_owner(conn)?;
            let book = store::book_by_name(conn, &owner, sub.get_one::<String>("name").unwrap())?;
            view.book = Some(book.name);
        }
        Some(("period", sub)) => {
            view.granularity = Granularity::parse(sub.get_one::<String>("period").unwrap())?;
        }
        Some(("group", sub)) => {
            view.group_by = GroupKey::parse(sub.get_one::<String>("group").unwrap())?;
        }
        Some(("mode", sub)) => {
            view.mode = ViewMode::parse(sub.get_one::<String>("mode").unwrap())?;
        }
        Some(("date", sub)) => {
            view.cursor = parse_date(sub.get_one::<String>("date").unwrap())?;
        }
        Some(("prev", _)) => view.previous(),
        Some(("next", _)) => view.next(),
        Some(("today", _)) => view.cursor = today(),
        _ => return Ok(()),
    }
    view.save(conn)?;
    print_view(&view);
    Ok(())
}

fn print_view(view: &ViewState) {
    let window = view.window();
    let rows = vec![
        vec!["Book".into(), view.book.clone().unwrap_or_else(|| "-".into())],
        vec!["Period".into(), window.label(view.granularity)],
        vec!["Cursor".into(), view.cursor.to_string()],
        vec!["Group by".into(), format!("{:?}", view.group_by).to_lowercase()],
        vec!["Mode".into(), format!("{:?}", view.mode).to_lowercase()],
    ];
    println!("{}", pretty_table(&["View", "Value"], rows));
}
