// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Week,
    #[default]
    Month,
    Year,
}

impl Granularity {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            "year" | "yearly" => Ok(Granularity::Year),
            other => Err(anyhow!(
                "Invalid period '{}', expected week|month|year",
                other
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }

    /// Moves `from` by `steps` whole units. Month and year steps clamp the
    /// day to the end of a shorter target month (Jan 31 + 1 month = Feb 29/28).
    pub fn shift(&self, from: NaiveDate, steps: i32) -> NaiveDate {
        match self {
            Granularity::Week => from + Duration::weeks(steps as i64),
            Granularity::Month => shift_months(from, steps),
            Granularity::Year => shift_months(from, steps.saturating_mul(12)),
        }
    }
}

fn shift_months(from: NaiveDate, months: i32) -> NaiveDate {
    let n = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        from.checked_add_months(n)
    } else {
        from.checked_sub_months(n)
    };
    shifted.unwrap_or(from)
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    pub fn containing(reference: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Week => {
                let start =
                    reference - Duration::days(reference.weekday().num_days_from_sunday() as i64);
                Window {
                    start,
                    end: start + Duration::days(6),
                }
            }
            Granularity::Month => {
                let start = reference.with_day(1).unwrap_or(reference);
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|d| d.pred_opt())
                    .unwrap_or(reference);
                Window { start, end }
            }
            Granularity::Year => Window {
                start: NaiveDate::from_ymd_opt(reference.year(), 1, 1).unwrap_or(reference),
                end: NaiveDate::from_ymd_opt(reference.year(), 12, 31).unwrap_or(reference),
            },
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn label(&self, granularity: Granularity) -> String {
        match granularity {
            Granularity::Week => format!(
                "{} - {}",
                self.start.format("%b %-d, %Y"),
                self.end.format("%b %-d, %Y")
            ),
            Granularity::Month => self.start.format("%B %Y").to_string(),
            Granularity::Year => self.start.format("%Y").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-03-06 is a Wednesday
        let w = Window::containing(d(2024, 3, 6), Granularity::Week);
        assert_eq!(w.start, d(2024, 3, 3));
        assert_eq!(w.end, d(2024, 3, 9));
        let sunday = Window::containing(d(2024, 3, 3), Granularity::Week);
        assert_eq!(sunday.start, d(2024, 3, 3));
    }

    #[test]
    fn month_and_year_windows_are_inclusive() {
        let m = Window::containing(d(2024, 2, 14), Granularity::Month);
        assert_eq!((m.start, m.end), (d(2024, 2, 1), d(2024, 2, 29)));
        assert!(m.contains(d(2024, 2, 29)));
        assert!(!m.contains(d(2024, 3, 1)));
        let y = Window::containing(d(2023, 7, 4), Granularity::Year);
        assert_eq!((y.start, y.end), (d(2023, 1, 1), d(2023, 12, 31)));
    }

    #[test]
    fn shifting_moves_one_unit() {
        assert_eq!(Granularity::Week.shift(d(2024, 3, 6), -1), d(2024, 2, 28));
        assert_eq!(Granularity::Month.shift(d(2024, 1, 31), 1), d(2024, 2, 29));
        assert_eq!(Granularity::Month.shift(d(2024, 1, 15), -1), d(2023, 12, 15));
        assert_eq!(Granularity::Year.shift(d(2024, 2, 29), 1), d(2025, 2, 28));
    }

    #[test]
    fn labels_read_naturally() {
        let w = Window::containing(d(2024, 3, 6), Granularity::Month);
        assert_eq!(w.label(Granularity::Month), "March 2024");
        let w = Window::containing(d(2024, 3, 6), Granularity::Week);
        assert_eq!(w.label(Granularity::Week), "Mar 3, 2024 - Mar 9, 2024");
    }

    #[test]
    fn parses_period_names() {
        assert_eq!(Granularity::parse(" Week ").unwrap(), Granularity::Week);
        assert!(Granularity::parse("fortnight").is_err());
    }
}
