// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read capabilities the aggregation core needs from storage.

use crate::error::Result;
use crate::models::{Category, Transaction, TransactionType, User};
use crate::window::DateRange;

/// Narrows a query. Every field left unset matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category: Option<Category>,
    pub range: DateRange,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn of_kind(kind: TransactionType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn in_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.kind.is_none_or(|k| tx.kind() == k)
            && self.category.is_none_or(|c| tx.category == c)
            && self.range.contains(&tx.date)
    }
}

pub trait TransactionStore {
    /// Transactions of `user_id` matching `filter`, newest first.
    fn query(&self, user_id: i64, filter: &TransactionFilter) -> Result<Vec<Transaction>>;

    /// Number of transactions of `user_id` matching `filter`. Ignores `limit`.
    fn count(&self, user_id: i64, filter: &TransactionFilter) -> Result<u64>;
}

pub trait UserStore {
    fn get_by_id(&self, user_id: i64) -> Result<User>;
}
