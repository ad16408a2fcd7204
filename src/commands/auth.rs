// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let owner = store::sign_in(conn, name)?;
            println!("Signed in as '{}'", owner);
        }
        Some(("logout", _)) => match store::sign_out(conn)? {
            Some(prev) => println!("Signed out '{}'", prev),
            None => println!("Nobody was signed in"),
        },
        Some(("whoami", _)) => println!("{}", store::current_owner(conn)?),
        _ => {}
    }
    Ok(())
}
