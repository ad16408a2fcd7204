// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{resolve_book, today};
use crate::aggregate::{
    self, GroupKey, GroupTotal, MonthBucket, TOP_BARS, TOP_CARDS, Totals,
};
use crate::models::{Book, Transaction};
use crate::period::{Granularity, Window};
use crate::state::{ViewMode, ViewState};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use tracing::debug;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("by-category", sub)) => by_group(conn, sub, GroupKey::Category)?,
        Some(("by-subcategory", sub)) => by_group(conn, sub, GroupKey::Subcategory)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        Some(("top", sub)) => top(conn, sub)?,
        Some(("dashboard", sub)) => dashboard(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// A book's transactions narrowed to one period.
pub struct Scope {
    pub book: Book,
    pub granularity: Granularity,
    pub window: Window,
    pub all: Vec<Transaction>,
    pub in_window: Vec<Transaction>,
    pub view: ViewState,
}

impl Scope {
    fn period_label(&self) -> String {
        self.window.label(self.granularity)
    }
}

/// Resolves book and period from the flags, falling back to the stored view
/// state, and loads the book's transactions.
pub fn load_scope(conn: &Connection, sub: &clap::ArgMatches) -> Result<Scope> {
    let owner = store::current_owner(conn)?;
    let view = ViewState::load(conn, today())?;
    let book = resolve_book(conn, &owner, sub)?;

    let granularity = match sub.try_get_one::<String>("period").ok().flatten() {
        Some(p) => Granularity::parse(p)?,
        None => view.granularity,
    };
    let reference = match sub.try_get_one::<String>("date").ok().flatten() {
        Some(d) => parse_date(d)?,
        None => view.cursor,
    };
    let window = Window::containing(reference, granularity);

    let all = store::list_transactions(conn, &owner, &book)?;
    let in_window = aggregate::filter_window(&all, &window);
    debug!(
        book = %book.name,
        start = %window.start,
        end = %window.end,
        total = all.len(),
        in_window = in_window.len(),
        "report scope"
    );
    Ok(Scope {
        book,
        granularity,
        window,
        all,
        in_window,
        view,
    })
}

#[derive(Serialize)]
struct SummaryOut<'a> {
    book: &'a str,
    currency: &'a str,
    period: String,
    start: String,
    end: String,
    transactions: usize,
    #[serde(flatten)]
    totals: Totals,
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let scope = load_scope(conn, sub)?;
    let totals = aggregate::totals(&scope.in_window);
    let out = SummaryOut {
        book: &scope.book.name,
        currency: &scope.book.currency,
        period: scope.period_label(),
        start: scope.window.start.to_string(),
        end: scope.window.end.to_string(),
        transactions: scope.in_window.len(),
        totals,
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        println!("{} | {}", scope.book.name, out.period);
        print_totals(&totals, &scope.book.currency);
    }
    Ok(())
}

fn print_totals(totals: &Totals, ccy: &str) {
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Net"],
            vec![vec![
                fmt_money(&totals.income, ccy),
                fmt_money(&totals.expense, ccy),
                fmt_money(&totals.net, ccy),
            ]],
        )
    );
}

fn group_header(key: GroupKey) -> &'static str {
    match key {
        GroupKey::Category => "Category",
        GroupKey::Subcategory => "Subcategory",
    }
}

fn group_rows(groups: &[GroupTotal], ccy: &str) -> Vec<Vec<String>> {
    groups
        .iter()
        .map(|g| vec![g.label.clone(), fmt_money(&g.amount, ccy)])
        .collect()
}

fn by_group(conn: &Connection, sub: &clap::ArgMatches, key: GroupKey) -> Result<()> {
    let scope = load_scope(conn, sub)?;
    let mut groups = aggregate::group_expenses(&scope.in_window, key);
    groups = aggregate::top_n(&groups, groups.len());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &groups)? {
        println!("{} | {}", scope.book.name, scope.period_label());
        println!(
            "{}",
            pretty_table(
                &[group_header(key), "Spent"],
                group_rows(&groups, &scope.book.currency)
            )
        );
    }
    Ok(())
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let owner = store::current_owner(conn)?;
    let book = resolve_book(conn, &owner, sub)?;
    let rows = store::list_transactions(conn, &owner, &book)?;
    let buckets = aggregate::monthly_trend(&rows);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &buckets)? {
        println!("{}", trend_table(&buckets, &book.currency));
    }
    Ok(())
}

fn trend_table(buckets: &[MonthBucket], ccy: &str) -> comfy_table::Table {
    let data = buckets
        .iter()
        .map(|b| vec![b.label.clone(), fmt_money(&b.expense, ccy)])
        .collect();
    pretty_table(&["Month", "Spent"], data)
}

fn top(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let scope = load_scope(conn, sub)?;
    let key = match sub.get_one::<String>("group") {
        Some(g) => GroupKey::parse(g)?,
        None => scope.view.group_by,
    };
    let limit = match sub.get_one::<usize>("limit") {
        Some(n) => *n,
        None => match scope.view.mode {
            ViewMode::Table => TOP_CARDS,
            ViewMode::Chart => TOP_BARS,
        },
    };
    let groups = aggregate::top_n(&aggregate::group_expenses(&scope.in_window, key), limit);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &groups)? {
        println!(
            "{} | {} | top {}",
            scope.book.name,
            scope.period_label(),
            limit
        );
        println!(
            "{}",
            pretty_table(
                &[group_header(key), "Spent"],
                group_rows(&groups, &scope.book.currency)
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct Dashboard {
    pub book: String,
    pub currency: String,
    pub period: String,
    pub totals: Totals,
    pub top_categories: Vec<GroupTotal>,
    pub top_groups: Vec<GroupTotal>,
    pub trend: Vec<MonthBucket>,
}

pub fn build_dashboard(scope: &Scope) -> Dashboard {
    let key = scope.view.group_by;
    Dashboard {
        book: scope.book.name.clone(),
        currency: scope.book.currency.clone(),
        period: scope.period_label(),
        totals: aggregate::totals(&scope.in_window),
        top_categories: aggregate::top_n(
            &aggregate::group_expenses(&scope.in_window, GroupKey::Category),
            TOP_CARDS,
        ),
        top_groups: aggregate::top_n(&aggregate::group_expenses(&scope.in_window, key), TOP_BARS),
        // the trend always spans the whole book, whatever the period
        trend: aggregate::monthly_trend(&scope.all),
    }
}

fn dashboard(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let scope = load_scope(conn, sub)?;
    let dash = build_dashboard(&scope);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dash)? {
        return Ok(());
    }
    let ccy = &dash.currency;
    println!("{} | {}", dash.book, dash.period);
    print_totals(&dash.totals, ccy);
    println!(
        "{}",
        pretty_table(&["Top categories", "Spent"], group_rows(&dash.top_categories, ccy))
    );
    println!(
        "{}",
        pretty_table(
            &[group_header(scope.view.group_by), "Spent"],
            group_rows(&dash.top_groups, ccy)
        )
    );
    println!("{}", trend_table(&dash.trend, ccy));
    Ok(())
}
