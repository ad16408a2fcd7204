// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Line-oriented tokenizer for uploaded statements.
//!
//! Quoting is deliberately simple: a `"` flips the in-quotes state and is
//! dropped, there are no escaped quotes, and the state never carries over a
//! line break. A quoted field spanning two lines is therefore split, and an
//! unterminated quote swallows the rest of its line.

use tracing::debug;

/// Data rows with fewer fields than this are skipped.
pub const MIN_FIELDS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Data lines dropped for having fewer than [`MIN_FIELDS`] fields.
    pub discarded: usize,
}

pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

pub fn parse_csv(text: &str) -> CsvTable {
    let mut lines = text.lines();
    let header = match lines.next() {
        Some(first) => parse_line(first.trim_start_matches('\u{feff}')),
        None => return CsvTable::default(),
    };

    let mut table = CsvTable {
        header,
        ..CsvTable::default()
    };
    for line in lines {
        let fields = parse_line(line);
        if fields.len() < MIN_FIELDS {
            table.discarded += 1;
            continue;
        }
        table.rows.push(fields);
    }
    debug!(
        columns = table.header.len(),
        rows = table.rows.len(),
        discarded = table.discarded,
        "parsed statement"
    );
    table
}
