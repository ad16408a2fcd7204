// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Summaries over a book's transactions: expense per category or
//! subcategory, income/expense totals, and the month-by-month trend.
//!
//! Labels are compared exactly as stored. "Food" and "food " are two groups.

use crate::models::Transaction;
use crate::period::Window;
use anyhow::{Result, anyhow};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Cards show the top five groups.
pub const TOP_CARDS: usize = 5;
/// Bar charts show the top ten groups.
pub const TOP_BARS: usize = 10;

pub const NO_SUBCATEGORY: &str = "(none)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    #[default]
    Category,
    Subcategory,
}

impl GroupKey {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "category" => Ok(GroupKey::Category),
            "subcategory" | "sub" => Ok(GroupKey::Subcategory),
            other => Err(anyhow!(
                "Invalid grouping '{}', expected category|subcategory",
                other
            )),
        }
    }

    fn label<'a>(&self, tx: &'a Transaction) -> &'a str {
        match self {
            GroupKey::Category => &tx.category,
            GroupKey::Subcategory => tx.subcategory.as_deref().unwrap_or(NO_SUBCATEGORY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    pub label: String, // "Mon YYYY"
    pub year: i32,
    pub month: u32,
    pub expense: Decimal,
}

/// Sums positive expenses per group label, in first-encounter order.
pub fn group_expenses(txs: &[Transaction], key: GroupKey) -> Vec<GroupTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupTotal> = Vec::new();
    for tx in txs.iter().filter(|t| t.expense > Decimal::ZERO) {
        let label = key.label(tx);
        match index.get(label) {
            Some(&i) => groups[i].amount += tx.expense,
            None => {
                index.insert(label, groups.len());
                groups.push(GroupTotal {
                    label: label.to_string(),
                    amount: tx.expense,
                });
            }
        }
    }
    groups
}

pub fn totals(txs: &[Transaction]) -> Totals {
    let income: Decimal = txs.iter().map(|t| t.income).sum();
    let expense: Decimal = txs.iter().map(|t| t.expense).sum();
    Totals {
        income,
        expense,
        net: income - expense,
    }
}

/// Keeps transactions whose date parses and falls inside `window`.
pub fn filter_window(txs: &[Transaction], window: &Window) -> Vec<Transaction> {
    txs.iter()
        .filter(|t| t.day().is_some_and(|d| window.contains(d)))
        .cloned()
        .collect()
}

/// Expense per calendar month over the whole set, oldest first.
pub fn monthly_trend(txs: &[Transaction]) -> Vec<MonthBucket> {
    let mut months: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for tx in txs {
        if let Some(day) = tx.day() {
            *months.entry((day.year(), day.month())).or_insert(Decimal::ZERO) += tx.expense;
        }
    }
    months
        .into_iter()
        .map(|((year, month), expense)| MonthBucket {
            label: month_label(year, month),
            year,
            month,
            expense,
        })
        .collect()
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", year, month))
}

/// Largest `n` groups by amount. The sort is stable, so ties keep the
/// order in which the groups were first seen.
pub fn top_n(groups: &[GroupTotal], n: usize) -> Vec<GroupTotal> {
    let mut sorted = groups.to_vec();
    sorted.sort_by(|a, b| b.amount.cmp(&a.amount));
    sorted.truncate(n);
    sorted
}
