// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar-aligned date windows. Every function takes the reference time
//! explicitly; nothing here reads the clock.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// A closed interval `[start, end]`. A missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn since(start: NaiveDateTime) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        match (self.start, self.end) {
            (None, None) => true,
            (Some(s), None) => *at >= s,
            (None, Some(e)) => *at <= e,
            (Some(s), Some(e)) => *at >= s && *at <= e,
        }
    }
}

/// Named relative window anchored to "now".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
    Year,
    /// No lower bound.
    All,
}

impl Period {
    /// Unrecognized names fall back to an unbounded window and are reported
    /// back as `all`, not as the name that was asked for.
    pub fn from_name(name: &str) -> Period {
        match name.trim().to_lowercase().as_str() {
            "week" => Period::Week,
            "month" => Period::Month,
            "year" => Period::Year,
            _ => Period::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::All => "all",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

/// Shift a (year, month) pair by `delta` months, wrapping across years.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// First instant to last second of the given calendar month.
pub fn month_range(year: i32, month: u32) -> DateRange {
    let start = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
    let (next_year, next_month) = shift_month(year, month, 1);
    let next = NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap_or(NaiveDate::MAX);
    DateRange::new(
        start_of_day(start),
        start_of_day(next) - Duration::seconds(1),
    )
}

pub fn current_month_range(now: NaiveDateTime) -> DateRange {
    month_range(now.year(), now.month())
}

pub fn previous_month_range(now: NaiveDateTime) -> DateRange {
    let (year, month) = shift_month(now.year(), now.month(), -1);
    month_range(year, month)
}

/// Lower bound of a named period. `None` means unbounded.
pub fn period_start(period: Period, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let today = now.date();
    match period {
        Period::Week => {
            let back = today.weekday().num_days_from_sunday() as i64;
            Some(start_of_day(today - Duration::days(back)))
        }
        Period::Month => Some(start_of_day(first_of_month(today))),
        Period::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1).map(start_of_day),
        Period::All => None,
    }
}

pub fn period_range(period: Period, now: NaiveDateTime) -> DateRange {
    DateRange {
        start: period_start(period, now),
        end: None,
    }
}

/// `months` calendar months ending with the month of `now`.
pub fn trailing_months_range(months: u32, now: NaiveDateTime) -> DateRange {
    let back = months.saturating_sub(1) as i32;
    let (year, month) = shift_month(now.year(), now.month(), -back);
    let first = month_range(year, month);
    let last = current_month_range(now);
    DateRange {
        start: first.start,
        end: last.end,
    }
}
