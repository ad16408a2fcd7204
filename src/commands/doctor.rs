// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::resolve_book;
use crate::aggregate::GroupKey;
use crate::models::Transaction;
use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = store::current_owner(conn)?;
    let book = resolve_book(conn, &owner, sub)?;
    let txs = store::list_transactions(conn, &owner, &book)?;
    let rows = find_issues(&txs);

    if rows.is_empty() {
        println!("doctor: no issues found in '{}'", book.name);
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn find_issues(txs: &[Transaction]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) Dates that passed through upload without becoming YYYY-MM-DD;
    //    these never show up in period views or the trend
    for t in txs.iter().filter(|t| t.day().is_none()) {
        rows.push(vec![
            "unparsed_date".into(),
            format!("#{} '{}' ({})", t.id, t.date, t.category),
        ]);
    }

    // 2) Labels that only differ by case or surrounding whitespace and so
    //    are reported as separate groups; categories and subcategories are
    //    grouped apart, so they are compared apart
    let mut spellings: BTreeMap<(GroupKey, String), Vec<&str>> = BTreeMap::new();
    for t in txs {
        let labels = std::iter::once((GroupKey::Category, t.category.as_str())).chain(
            t.subcategory
                .as_deref()
                .map(|s| (GroupKey::Subcategory, s)),
        );
        for (field, label) in labels {
            let variants = spellings
                .entry((field, label.trim().to_lowercase()))
                .or_default();
            if !variants.contains(&label) {
                variants.push(label);
            }
        }
    }
    for variants in spellings.values().filter(|v| v.len() > 1) {
        let quoted: Vec<String> = variants.iter().map(|v| format!("'{}'", v)).collect();
        rows.push(vec!["label_variants".into(), quoted.join(", ")]);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn tx(id: i64, date: &str, category: &str, sub: Option<&str>) -> Transaction {
        Transaction {
            id,
            book_id: 1,
            date: date.into(),
            category: category.into(),
            subcategory: sub.map(Into::into),
            income: Decimal::ZERO,
            expense: Decimal::ONE,
            note: None,
            paid_with: None,
            labels: vec![],
        }
    }

    #[test]
    fn reports_bad_dates_and_label_variants() {
        let txs = vec![
            tx(1, "2024-01-01", "Food", None),
            tx(2, "5 March 2024", "food ", None),
            tx(3, "2024-13-05", "Rent", Some("Deposit")),
        ];
        let issues = find_issues(&txs);
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0], vec!["unparsed_date", "#2 '5 March 2024' (food )"]);
        assert_eq!(issues[1][0], "unparsed_date");
        assert_eq!(issues[2], vec!["label_variants", "'Food', 'food '"]);
    }

    #[test]
    fn category_and_subcategory_spellings_are_compared_apart() {
        let txs = vec![
            tx(1, "2024-01-01", "Food", Some("food")),
            tx(2, "2024-01-02", "Travel", Some("Snacks")),
        ];
        assert!(find_issues(&txs).is_empty());

        let txs = vec![
            tx(1, "2024-01-01", "Food", Some("Lunch")),
            tx(2, "2024-01-02", "Food", Some("lunch")),
        ];
        assert_eq!(find_issues(&txs), vec![vec!["label_variants", "'Lunch', 'lunch'"]]);
    }

    #[test]
    fn clean_book_has_no_issues() {
        let txs = vec![tx(1, "2024-01-01", "Food", Some("Lunch"))];
        assert!(find_issues(&txs).is_empty());
    }
}
