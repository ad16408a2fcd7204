// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::NewTransaction;
use crate::parser::CsvTable;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

static YMD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})$").expect("valid regex"));
static MDY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[-/](\d{1,2})[-/](\d{4})$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Category,
    Subcategory,
    Income,
    Expense,
    Note,
    PaidWith,
    Labels,
}

// Checked in order; the first rule whose needle is contained in the
// lowercased header decides the field. Subcategory precedes category so
// "subcategory" and "子分类" never land on the category column.
const HEADER_RULES: &[(Field, &[&str])] = &[
    (Field::Date, &["date", "日期"]),
    (Field::Subcategory, &["sub", "子分类", "子类别"]),
    (Field::Category, &["category", "分类", "类别"]),
    (Field::Income, &["income", "收入"]),
    (Field::Expense, &["expense", "支出"]),
    (Field::Note, &["note", "description", "备注", "说明"]),
    (Field::PaidWith, &["paid", "支付", "账户"]),
    (Field::Labels, &["tag", "label", "标签"]),
];

pub fn classify_header(header: &str) -> Option<Field> {
    let h = header.trim().to_lowercase();
    HEADER_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| h.contains(n)))
        .map(|(field, _)| *field)
}

/// Column positions for each canonical field. The first matching column wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub category: Option<usize>,
    pub subcategory: Option<usize>,
    pub income: Option<usize>,
    pub expense: Option<usize>,
    pub note: Option<usize>,
    pub paid_with: Option<usize>,
    pub labels: Option<usize>,
}

impl ColumnMap {
    pub fn from_header(header: &[String]) -> Self {
        let mut map = ColumnMap::default();
        for (idx, name) in header.iter().enumerate() {
            let slot = match classify_header(name) {
                Some(Field::Date) => &mut map.date,
                Some(Field::Category) => &mut map.category,
                Some(Field::Subcategory) => &mut map.subcategory,
                Some(Field::Income) => &mut map.income,
                Some(Field::Expense) => &mut map.expense,
                Some(Field::Note) => &mut map.note,
                Some(Field::PaidWith) => &mut map.paid_with,
                Some(Field::Labels) => &mut map.labels,
                None => continue,
            };
            slot.get_or_insert(idx);
        }
        map
    }
}

/// Strips thousands separators and parses; anything unparsable is zero.
pub fn parse_amount(raw: &str) -> Decimal {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(cleaned).unwrap_or(Decimal::ZERO)
}

/// Rewrites `YYYY[-/]M[-/]D` and `M[-/]D[-/]YYYY` to `YYYY-MM-DD`.
/// Other inputs come back trimmed but otherwise untouched.
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Some(c) = YMD.captures(raw) {
        return format!("{}-{:0>2}-{:0>2}", &c[1], &c[2], &c[3]);
    }
    if let Some(c) = MDY.captures(raw) {
        return format!("{}-{:0>2}-{:0>2}", &c[3], &c[1], &c[2]);
    }
    raw.to_string()
}

pub fn parse_labels(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in raw.split([';', '|']) {
        let label = part.trim();
        if !label.is_empty() && !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    out
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Builds a canonical record from one data row, or `None` when the row has
/// no usable date or category.
pub fn normalize_row(columns: &ColumnMap, row: &[String]) -> Option<NewTransaction> {
    let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).map(|s| s.as_str());

    let date = normalize_date(cell(columns.date).unwrap_or(""));
    let category = cell(columns.category).unwrap_or("").trim().to_string();
    if date.is_empty() || category.is_empty() {
        return None;
    }

    Some(NewTransaction {
        date,
        category,
        subcategory: cell(columns.subcategory).and_then(non_empty),
        income: cell(columns.income).map(parse_amount).unwrap_or(Decimal::ZERO),
        expense: cell(columns.expense).map(parse_amount).unwrap_or(Decimal::ZERO),
        note: cell(columns.note).and_then(non_empty),
        paid_with: cell(columns.paid_with).and_then(non_empty),
        labels: cell(columns.labels).map(parse_labels).unwrap_or_default(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<NewTransaction>,
    /// Rows dropped for a missing date or category.
    pub rejected: usize,
}

pub fn normalize_table(table: &CsvTable) -> Normalized {
    let columns = ColumnMap::from_header(&table.header);
    debug!(?columns, "mapped statement header");
    let mut out = Normalized::default();
    for row in &table.rows {
        match normalize_row(&columns, row) {
            Some(rec) => out.records.push(rec),
            None => out.rejected += 1,
        }
    }
    out
}
