// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::GroupKey;
use crate::models::Transaction;
use crate::period::{Granularity, Window};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::debug;

const VIEW_STATE_KEY: &str = "view_state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Chart,
}

impl ViewMode {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(ViewMode::Table),
            "chart" => Ok(ViewMode::Chart),
            other => Err(anyhow!("Invalid view mode '{}', expected table|chart", other)),
        }
    }
}

/// Everything the dashboard needs to know about what the user is looking at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub book: Option<String>,
    pub cursor: NaiveDate,
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default)]
    pub group_by: GroupKey,
    #[serde(default)]
    pub mode: ViewMode,
}

impl ViewState {
    pub fn new(today: NaiveDate) -> Self {
        ViewState {
            book: None,
            cursor: today,
            granularity: Granularity::default(),
            group_by: GroupKey::default(),
            mode: ViewMode::default(),
        }
    }

    pub fn window(&self) -> Window {
        Window::containing(self.cursor, self.granularity)
    }

    pub fn previous(&mut self) {
        self.cursor = self.granularity.shift(self.cursor, -1);
    }

    pub fn next(&mut self) {
        self.cursor = self.granularity.shift(self.cursor, 1);
    }

    pub fn load(conn: &Connection, today: NaiveDate) -> Result<Self> {
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE key=?1",
                params![VIEW_STATE_KEY],
                |r| r.get(0),
            )
            .optional()?;
        match raw {
            Some(s) => serde_json::from_str(&s).context("Stored view state is corrupt"),
            None => Ok(ViewState::new(today)),
        }
    }

    pub fn save(&self, conn: &Connection) -> Result<()> {
        let raw = serde_json::to_string(self)?;
        conn.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![VIEW_STATE_KEY, raw],
        )?;
        debug!(state = %raw, "saved view state");
        Ok(())
    }
}

/// Token handed out per load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic request counter. Only the most recently issued ticket may
/// publish results; anything older is stale and is dropped.
#[derive(Debug, Default)]
pub struct Generation {
    latest: u64,
}

impl Generation {
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

/// The transaction list shown for the selected book.
#[derive(Debug, Default)]
pub struct LoadedBook {
    generation: Generation,
    book: Option<String>,
    transactions: Vec<Transaction>,
}

impl LoadedBook {
    pub fn request(&mut self) -> Ticket {
        self.generation.begin()
    }

    /// Applies a finished load. Returns `false` and leaves the current list
    /// untouched when a newer request has been issued since `ticket`.
    pub fn complete(&mut self, ticket: Ticket, book: &str, rows: Vec<Transaction>) -> bool {
        if !self.generation.is_current(ticket) {
            debug!(?ticket, book, "dropping stale load");
            return false;
        }
        self.book = Some(book.to_string());
        self.transactions = rows;
        true
    }

    pub fn book(&self) -> Option<&str> {
        self.book.as_deref()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}
