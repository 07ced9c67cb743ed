// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Grouped sums, counts and averages over already-fetched transactions.
//!
//! Nothing here fails on empty input: no data yields empty buckets and zero
//! totals, and every ratio short-circuits to zero when its denominator is not
//! positive. Sums and ratios saturate at `Decimal::MAX`/`Decimal::MIN`
//! instead of overflowing.

use std::collections::HashMap;
use std::hash::Hash;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{AggregateBucket, Category, Transaction, TransactionType};
use crate::utils::round2;

/// One bucket per distinct key, in order of first occurrence.
pub fn aggregate_by<'a, K, I, F>(txs: I, key_fn: F) -> Vec<AggregateBucket<K>>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(&Transaction) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut sums: Vec<(K, Decimal, u64)> = Vec::new();
    for tx in txs {
        let key = key_fn(tx);
        match index.get(&key) {
            Some(&i) => {
                sums[i].1 = sums[i].1.saturating_add(tx.amount);
                sums[i].2 += 1;
            }
            None => {
                index.insert(key.clone(), sums.len());
                sums.push((key, tx.amount, 1));
            }
        }
    }
    sums.into_iter()
        .map(|(key, total_amount, count)| AggregateBucket {
            key,
            total_amount,
            count,
            average_amount: average(total_amount, count),
        })
        .collect()
}

pub fn average(total: Decimal, count: u64) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    total
        .checked_div(Decimal::from(count))
        .map(round2)
        .unwrap_or(Decimal::ZERO)
}

/// Largest total first. Stable, so ties keep first-occurrence order.
pub fn sort_by_total_desc<K>(buckets: &mut [AggregateBucket<K>]) {
    buckets.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
}

/// `part / whole * 100`, unrounded. Zero when `whole` is not positive;
/// a quotient too large for `Decimal` saturates with the sign of `part`.
pub fn ratio_percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match part.checked_div(whole) {
        Some(q) => q.saturating_mul(Decimal::ONE_HUNDRED),
        None if part.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

/// `part / whole * 100`, two decimals, zero when `whole` is not positive.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    round2(ratio_percent(part, whole))
}

/// Relative change from `previous` to `current` in percent, unrounded.
/// Zero when there is no positive baseline.
pub fn percent_change(current: Decimal, previous: Decimal) -> Decimal {
    ratio_percent(current.saturating_sub(previous), previous)
}

pub fn sum_amounts<'a, I>(txs: I) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
{
    txs.into_iter()
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeTotals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub income_count: u64,
    pub expense_count: u64,
}

impl TypeTotals {
    pub fn balance(&self) -> Decimal {
        self.income.saturating_sub(self.expenses)
    }
}

/// Income and expense sums in one pass.
pub fn totals_by_type<'a, I>(txs: I) -> TypeTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = TypeTotals::default();
    for bucket in aggregate_by(txs, Transaction::kind) {
        match bucket.key {
            TransactionType::Income => {
                totals.income = bucket.total_amount;
                totals.income_count = bucket.count;
            }
            TransactionType::Expense => {
                totals.expenses = bucket.total_amount;
                totals.expense_count = bucket.count;
            }
        }
    }
    totals
}

/// One row of the spending-by-category view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub total_amount: Decimal,
    pub transaction_count: u64,
    pub average_amount: Decimal,
    pub percentage: Decimal,
}

/// Expense buckets by category, largest first, with their share of the total.
/// Income transactions in `txs` are ignored.
pub fn category_breakdown<'a, I>(txs: I) -> (Vec<CategoryShare>, Decimal)
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut buckets = aggregate_by(
        txs.into_iter()
            .filter(|t| t.kind() == TransactionType::Expense),
        |t| t.category,
    );
    sort_by_total_desc(&mut buckets);
    let total = buckets
        .iter()
        .fold(Decimal::ZERO, |acc, b| acc.saturating_add(b.total_amount));
    let rows = buckets
        .into_iter()
        .map(|b| CategoryShare {
            category: b.key,
            percentage: percentage(b.total_amount, total),
            total_amount: b.total_amount,
            transaction_count: b.count,
            average_amount: b.average_amount,
        })
        .collect();
    (rows, total)
}
