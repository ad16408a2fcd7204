// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub currency: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A transaction after header mapping and normalization, ready for storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub income: Decimal,
    pub expense: Decimal,
    pub note: Option<String>,
    pub paid_with: Option<String>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub book_id: i64,
    pub date: String, // YYYY-MM-DD unless the source used an unrecognized format
    pub category: String,
    pub subcategory: Option<String>,
    pub income: Decimal,
    pub expense: Decimal,
    pub note: Option<String>,
    pub paid_with: Option<String>,
    pub labels: Vec<String>,
}

impl Transaction {
    /// The calendar day, if the stored date is a valid `YYYY-MM-DD`.
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Editable fields of a stored transaction. `None` leaves a field unchanged;
/// date and book are fixed at creation.
#[derive(Debug, Clone, Default)]
pub struct TransactionEdit {
    pub category: Option<String>,
    pub subcategory: Option<Option<String>>,
    pub income: Option<Decimal>,
    pub expense: Option<Decimal>,
    pub note: Option<Option<String>>,
    pub paid_with: Option<Option<String>>,
    pub labels: Option<Vec<String>>,
}

impl TransactionEdit {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.subcategory.is_none()
            && self.income.is_none()
            && self.expense.is_none()
            && self.note.is_none()
            && self.paid_with.is_none()
            && self.labels.is_none()
    }
}
