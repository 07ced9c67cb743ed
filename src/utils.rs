// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::{Decimal, RoundingStrategy};

pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Round half away from zero to `dp` places.
pub fn round_dp(d: Decimal, dp: u32) -> Decimal {
    d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Figures exposed to callers (averages, percentages) carry two decimals.
pub fn round2(d: Decimal) -> Decimal {
    round_dp(d, 2)
}

/// Percentages inside insight messages carry one decimal.
pub fn fmt_pct1(d: Decimal) -> String {
    format!("{:.1}", round_dp(d, 1))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", round2(*d))
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s.trim()))
}

/// Accepts `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD` (midnight).
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, DATETIME_FMT) {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| {
        format!(
            "Invalid date '{}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS",
            s
        )
    })?;
    Ok(date.and_time(NaiveTime::MIN))
}

/// End of the given day, for inclusive `--to` bounds.
pub fn end_of_day(date: NaiveDate) -> Result<NaiveDateTime> {
    date.and_hms_opt(23, 59, 59)
        .ok_or_else(|| anyhow!("Invalid end of day for {}", date))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s.trim()))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

// Acting user settings
pub fn get_current_user(conn: &Connection) -> Result<Option<i64>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='current_user'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    match v {
        Some(s) => Ok(Some(
            s.parse::<i64>()
                .with_context(|| format!("Invalid current_user setting '{}'", s))?,
        )),
        None => Ok(None),
    }
}

pub fn set_current_user(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('current_user', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![user_id.to_string()],
    )?;
    Ok(())
}

/// `--user` wins over the stored `current_user` setting.
pub fn resolve_user(conn: &Connection, sub: &clap::ArgMatches) -> Result<i64> {
    if let Some(raw) = sub.get_one::<String>("user") {
        return raw
            .trim()
            .parse::<i64>()
            .with_context(|| format!("Invalid user id '{}'", raw.trim()));
    }
    get_current_user(conn)?
        .ok_or_else(|| anyhow!("No user selected; pass --user or run `pennywise user use --id <ID>`"))
}
