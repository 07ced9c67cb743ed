// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::aggregate_by;
use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionType};
use crate::window::{DateRange, trailing_months_range};

pub const DEFAULT_TREND_MONTHS: u32 = 6;
pub const MAX_TREND_MONTHS: u32 = 24;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// Income and expense activity for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub income: Decimal,
    pub expense: Decimal,
    pub income_count: u64,
    pub expense_count: u64,
    pub net: Decimal,
    pub total_transactions: u64,
}

impl MonthlyTrend {
    fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            month_name: month_name(month),
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
            income_count: 0,
            expense_count: 0,
            net: Decimal::ZERO,
            total_transactions: 0,
        }
    }
}

/// Checks a requested month count. `None` means the default of six.
pub fn validate_months(months: Option<u32>) -> Result<u32> {
    let months = months.unwrap_or(DEFAULT_TREND_MONTHS);
    if !(1..=MAX_TREND_MONTHS).contains(&months) {
        return Err(Error::Validation(format!(
            "Months must be between 1 and {}, got {}",
            MAX_TREND_MONTHS, months
        )));
    }
    Ok(months)
}

/// `months` calendar months counting the month of `now` as the last one.
pub fn trend_window(months: u32, now: NaiveDateTime) -> DateRange {
    trailing_months_range(months, now)
}

/// Per-month records in ascending (year, month) order. Only months with at
/// least one transaction appear; gaps are not filled.
pub fn build_trends<'a, I>(txs: I) -> Vec<MonthlyTrend>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let buckets = aggregate_by(txs, |t| (t.date.year(), t.date.month(), t.kind()));

    let mut months: BTreeMap<(i32, u32), MonthlyTrend> = BTreeMap::new();
    for bucket in buckets {
        let (year, month, kind) = bucket.key;
        let entry = months
            .entry((year, month))
            .or_insert_with(|| MonthlyTrend::empty(year, month));
        match kind {
            TransactionType::Income => {
                entry.income = bucket.total_amount;
                entry.income_count = bucket.count;
            }
            TransactionType::Expense => {
                entry.expense = bucket.total_amount;
                entry.expense_count = bucket.count;
            }
        }
    }

    months
        .into_values()
        .map(|mut m| {
            m.net = m.income.saturating_sub(m.expense);
            m.total_transactions = m.income_count + m.expense_count;
            m
        })
        .collect()
}
