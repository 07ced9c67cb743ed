// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use pennywise::window::{
    DateRange, Period, current_month_range, month_range, period_start, previous_month_range,
    shift_month, trailing_months_range,
};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

#[test]
fn current_month_covers_whole_month() {
    let r = current_month_range(at(2025, 3, 17, 14, 5, 0));
    assert_eq!(r.start, Some(at(2025, 3, 1, 0, 0, 0)));
    assert_eq!(r.end, Some(at(2025, 3, 31, 23, 59, 59)));
}

#[test]
fn february_end_respects_leap_years() {
    assert_eq!(month_range(2024, 2).end, Some(at(2024, 2, 29, 23, 59, 59)));
    assert_eq!(month_range(2025, 2).end, Some(at(2025, 2, 28, 23, 59, 59)));
}

#[test]
fn previous_month_of_january_is_december_of_prior_year() {
    let r = previous_month_range(at(2025, 1, 10, 8, 0, 0));
    assert_eq!(r.start, Some(at(2024, 12, 1, 0, 0, 0)));
    assert_eq!(r.end, Some(at(2024, 12, 31, 23, 59, 59)));
}

#[test]
fn previous_month_mid_year() {
    let r = previous_month_range(at(2025, 7, 31, 23, 0, 0));
    assert_eq!(r.start, Some(at(2025, 6, 1, 0, 0, 0)));
    assert_eq!(r.end, Some(at(2025, 6, 30, 23, 59, 59)));
}

#[test]
fn shift_month_wraps_both_ways() {
    assert_eq!(shift_month(2025, 1, -1), (2024, 12));
    assert_eq!(shift_month(2025, 12, 1), (2026, 1));
    assert_eq!(shift_month(2025, 3, -14), (2024, 1));
    assert_eq!(shift_month(2025, 6, 0), (2025, 6));
}

#[test]
fn week_starts_on_most_recent_sunday() {
    // 2025-08-13 is a Wednesday
    let start = period_start(Period::Week, at(2025, 8, 13, 18, 30, 0));
    assert_eq!(start, Some(at(2025, 8, 10, 0, 0, 0)));
    // On a Sunday the week starts that same day
    let start = period_start(Period::Week, at(2025, 8, 10, 9, 0, 0));
    assert_eq!(start, Some(at(2025, 8, 10, 0, 0, 0)));
}

#[test]
fn month_and_year_starts() {
    let now = at(2025, 8, 13, 18, 30, 0);
    assert_eq!(period_start(Period::Month, now), Some(at(2025, 8, 1, 0, 0, 0)));
    assert_eq!(period_start(Period::Year, now), Some(at(2025, 1, 1, 0, 0, 0)));
    assert_eq!(period_start(Period::All, now), None);
}

#[test]
fn unknown_period_name_is_unbounded() {
    assert_eq!(Period::from_name("decade"), Period::All);
    assert_eq!(Period::from_name(" Week "), Period::Week);
    assert_eq!(period_start(Period::from_name(""), at(2025, 1, 1, 0, 0, 0)), None);
}

#[test]
fn ranges_are_closed_intervals() {
    let r = DateRange::new(at(2025, 1, 1, 0, 0, 0), at(2025, 1, 31, 23, 59, 59));
    assert!(r.contains(&at(2025, 1, 1, 0, 0, 0)));
    assert!(r.contains(&at(2025, 1, 31, 23, 59, 59)));
    assert!(!r.contains(&at(2025, 2, 1, 0, 0, 0)));
    assert!(DateRange::unbounded().contains(&at(1999, 1, 1, 0, 0, 0)));
    assert!(!DateRange::since(at(2025, 1, 1, 0, 0, 0)).contains(&at(2024, 12, 31, 23, 59, 59)));
}

#[test]
fn trailing_months_ends_with_current_month() {
    let r = trailing_months_range(6, at(2025, 3, 15, 12, 0, 0));
    assert_eq!(r.start, Some(at(2024, 10, 1, 0, 0, 0)));
    assert_eq!(r.end, Some(at(2025, 3, 31, 23, 59, 59)));

    let single = trailing_months_range(1, at(2025, 3, 15, 12, 0, 0));
    assert_eq!(single, current_month_range(at(2025, 3, 15, 12, 0, 0)));
}
