// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::utils::{get_default_currency, get_setting, pretty_table, set_default_currency};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let db_path = match conn.path() {
                Some(p) if !p.is_empty() => p.to_string(),
                _ => db::db_path()?.display().to_string(),
            };
            let rows = vec![
                vec!["database".to_string(), db_path],
                vec![
                    "owner".to_string(),
                    get_setting(conn, "owner")?.unwrap_or_else(|| "-".into()),
                ],
                vec!["default_currency".to_string(), get_default_currency(conn)?],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set-currency", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap().trim();
            if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(anyhow!("Invalid currency '{}', expected a 3-letter code", ccy));
            }
            set_default_currency(conn, ccy)?;
            println!("Default currency set to {}", ccy.to_uppercase());
        }
        _ => {}
    }
    Ok(())
}
