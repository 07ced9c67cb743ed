// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rule-based advisories over current vs previous month figures.
//!
//! Each [`InsightRule`] yields at most one insight, so thresholds that must
//! not fire together (alert vs watch, increase vs savings) live in the same
//! rule. Rules run in registration order and that order is the output order.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{percent_change, ratio_percent};
use crate::models::{Category, Insight, InsightKind, Priority};
use crate::utils::fmt_pct1;

const BUDGET_ALERT_PCT: i64 = 90;
const BUDGET_WATCH_PCT: i64 = 75;
const SPENDING_INCREASE_PCT: i64 = 20;
const SAVINGS_PCT: i64 = -10;
const INCOME_GROWTH_PCT: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
}

/// Figures the rules look at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightInput {
    pub current_income: Decimal,
    pub current_expenses: Decimal,
    pub previous_income: Decimal,
    pub previous_expenses: Decimal,
    pub monthly_budget: Decimal,
    pub top_category: Option<CategoryTotal>,
}

impl InsightInput {
    /// Expenses as a percentage of the budget, `None` without a budget.
    pub fn budget_usage(&self) -> Option<Decimal> {
        if self.monthly_budget <= Decimal::ZERO {
            return None;
        }
        Some(ratio_percent(self.current_expenses, self.monthly_budget))
    }

    pub fn expense_change(&self) -> Decimal {
        percent_change(self.current_expenses, self.previous_expenses)
    }

    pub fn income_change(&self) -> Decimal {
        percent_change(self.current_income, self.previous_income)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InsightRule {
    pub name: &'static str,
    pub evaluate: fn(&InsightInput) -> Option<Insight>,
}

fn insight(kind: InsightKind, priority: Priority, title: &str, message: String) -> Insight {
    Insight {
        kind,
        title: title.to_string(),
        message,
        priority,
    }
}

fn budget_rule(input: &InsightInput) -> Option<Insight> {
    let usage = input.budget_usage()?;
    if usage > Decimal::from(BUDGET_ALERT_PCT) {
        Some(insight(
            InsightKind::Warning,
            Priority::High,
            "Budget Alert",
            format!(
                "You've used {}% of your monthly budget. Consider reducing expenses.",
                fmt_pct1(usage)
            ),
        ))
    } else if usage > Decimal::from(BUDGET_WATCH_PCT) {
        Some(insight(
            InsightKind::Caution,
            Priority::Medium,
            "Budget Watch",
            format!(
                "You've used {}% of your monthly budget. Monitor your spending.",
                fmt_pct1(usage)
            ),
        ))
    } else {
        None
    }
}

fn expense_change_rule(input: &InsightInput) -> Option<Insight> {
    let change = input.expense_change();
    if change > Decimal::from(SPENDING_INCREASE_PCT) {
        Some(insight(
            InsightKind::Warning,
            Priority::Medium,
            "Spending Increase",
            format!(
                "Your expenses increased by {}% compared to last month.",
                fmt_pct1(change)
            ),
        ))
    } else if change < Decimal::from(SAVINGS_PCT) {
        Some(insight(
            InsightKind::Success,
            Priority::Low,
            "Great Savings",
            format!(
                "You reduced expenses by {}% compared to last month!",
                fmt_pct1(change.abs())
            ),
        ))
    } else {
        None
    }
}

fn income_change_rule(input: &InsightInput) -> Option<Insight> {
    let change = input.income_change();
    if change > Decimal::from(INCOME_GROWTH_PCT) {
        return Some(insight(
            InsightKind::Success,
            Priority::Low,
            "Income Growth",
            format!(
                "Your income increased by {}% compared to last month!",
                fmt_pct1(change)
            ),
        ));
    }
    None
}

fn top_category_rule(input: &InsightInput) -> Option<Insight> {
    let top = input.top_category?;
    if input.current_expenses <= Decimal::ZERO {
        return None;
    }
    let share = ratio_percent(top.total, input.current_expenses);
    Some(insight(
        InsightKind::Info,
        Priority::Low,
        "Top Expense Category",
        format!(
            "{} accounts for {}% of your expenses this month.",
            top.category,
            fmt_pct1(share)
        ),
    ))
}

pub const BUILTIN_RULES: [InsightRule; 4] = [
    InsightRule {
        name: "budget_usage",
        evaluate: budget_rule,
    },
    InsightRule {
        name: "expense_change",
        evaluate: expense_change_rule,
    },
    InsightRule {
        name: "income_change",
        evaluate: income_change_rule,
    },
    InsightRule {
        name: "top_category",
        evaluate: top_category_rule,
    },
];

pub struct InsightGenerator {
    rules: Vec<InsightRule>,
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightGenerator {
    /// Generator with the built-in rule set.
    pub fn new() -> Self {
        Self {
            rules: BUILTIN_RULES.to_vec(),
        }
    }

    /// Appends a rule; it runs after everything already registered.
    pub fn register(&mut self, rule: InsightRule) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    pub fn generate(&self, input: &InsightInput) -> Vec<Insight> {
        let mut out = Vec::new();
        for rule in &self.rules {
            if let Some(found) = (rule.evaluate)(input) {
                tracing::debug!(rule = rule.name, title = %found.title, "insight fired");
                out.push(found);
            }
        }
        out
    }
}
