// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read models behind the dashboard views. Each view fetches what it needs
//! through the store traits and hands the rows to the pure aggregation code.

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{
    CategoryShare, aggregate_by, category_breakdown, percentage, sort_by_total_desc,
    sum_amounts, totals_by_type,
};
use crate::error::Result;
use crate::insights::{CategoryTotal, InsightGenerator, InsightInput};
use crate::models::{Category, Insight, Transaction, TransactionType, User};
use crate::store::{TransactionFilter, TransactionStore, UserStore};
use crate::trends::{MonthlyTrend, build_trends, trend_window, validate_months};
use crate::utils::round2;
use crate::window::{DateRange, Period, current_month_range, period_range, previous_month_range};

pub const RECENT_LIMIT: usize = 10;
pub const TOP_CATEGORY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodInfo {
    pub month: u32,
    pub year: i32,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewTotals {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_balance: Decimal,
    pub monthly_income: Decimal,
    pub monthly_expenses: Decimal,
    pub monthly_balance: Decimal,
    pub transaction_count: u64,
    pub budget_used: Decimal,
    pub budget_remaining: Decimal,
    pub monthly_budget: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub overview: OverviewTotals,
    pub recent_transactions: Vec<Transaction>,
    pub user: User,
    pub period: PeriodInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseBreakdown {
    pub breakdown: Vec<CategoryShare>,
    pub total_expenses: Decimal,
    pub period: Period,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrends {
    pub trends: Vec<MonthlyTrend>,
    pub period: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthSummary {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Changes {
    pub income: Decimal,
    pub expenses: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopCategory {
    pub category: Category,
    pub total: Decimal,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub budget: Decimal,
    pub used: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialInsights {
    pub current_month: MonthSummary,
    pub previous_month: MonthSummary,
    pub changes: Changes,
    pub top_expense_categories: Vec<TopCategory>,
    pub insights: Vec<Insight>,
    pub budget_status: Option<BudgetStatus>,
}

/// Share of the budget spent, two decimals; zero without a budget.
pub fn budget_used(monthly_budget: Decimal, expenses: Decimal) -> Decimal {
    percentage(expenses, monthly_budget)
}

/// What is left of the budget, never below zero.
pub fn budget_remaining(monthly_budget: Decimal, expenses: Decimal) -> Decimal {
    monthly_budget
        .saturating_sub(expenses)
        .max(Decimal::ZERO)
}

fn month_summary(txs: &[Transaction]) -> MonthSummary {
    let totals = totals_by_type(txs);
    MonthSummary {
        income: totals.income,
        expenses: totals.expenses,
        balance: totals.balance(),
    }
}

pub struct Dashboard<'s, S> {
    store: &'s S,
    generator: InsightGenerator,
}

impl<'s, S> Dashboard<'s, S>
where
    S: TransactionStore + UserStore,
{
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            generator: InsightGenerator::new(),
        }
    }

    pub fn with_generator(store: &'s S, generator: InsightGenerator) -> Self {
        Self { store, generator }
    }

    fn sum_of(&self, user_id: i64, kind: TransactionType, range: DateRange) -> Result<Decimal> {
        let rows = self
            .store
            .query(user_id, &TransactionFilter::of_kind(kind).in_range(range))?;
        Ok(sum_amounts(&rows))
    }

    pub fn overview(&self, user_id: i64, now: NaiveDateTime) -> Result<Overview> {
        let user = self.store.get_by_id(user_id)?;
        let month = current_month_range(now);

        let total_income = self.sum_of(user_id, TransactionType::Income, DateRange::unbounded())?;
        let total_expenses =
            self.sum_of(user_id, TransactionType::Expense, DateRange::unbounded())?;
        let monthly_income = self.sum_of(user_id, TransactionType::Income, month)?;
        let monthly_expenses = self.sum_of(user_id, TransactionType::Expense, month)?;
        let transaction_count = self.store.count(user_id, &TransactionFilter::all())?;
        let recent_transactions = self
            .store
            .query(user_id, &TransactionFilter::all().with_limit(RECENT_LIMIT))?;

        tracing::debug!(
            user_id,
            transaction_count,
            recent = recent_transactions.len(),
            "overview assembled"
        );

        Ok(Overview {
            overview: OverviewTotals {
                total_income,
                total_expenses,
                total_balance: total_income.saturating_sub(total_expenses),
                monthly_income,
                monthly_expenses,
                monthly_balance: monthly_income.saturating_sub(monthly_expenses),
                transaction_count,
                budget_used: budget_used(user.monthly_budget, monthly_expenses),
                budget_remaining: budget_remaining(user.monthly_budget, monthly_expenses),
                monthly_budget: user.monthly_budget,
            },
            recent_transactions,
            period: PeriodInfo {
                month: now.month(),
                year: now.year(),
                start: month.start,
                end: month.end,
            },
            user,
        })
    }

    pub fn expense_breakdown(
        &self,
        user_id: i64,
        period: Period,
        now: NaiveDateTime,
    ) -> Result<ExpenseBreakdown> {
        let filter =
            TransactionFilter::of_kind(TransactionType::Expense).in_range(period_range(period, now));
        let rows = self.store.query(user_id, &filter)?;
        let (breakdown, total_expenses) = category_breakdown(&rows);
        tracing::debug!(
            user_id,
            period = period.as_str(),
            categories = breakdown.len(),
            "expense breakdown assembled"
        );
        Ok(ExpenseBreakdown {
            breakdown,
            total_expenses,
            period,
        })
    }

    /// `months` of `None` means six months.
    pub fn monthly_trends(
        &self,
        user_id: i64,
        months: Option<u32>,
        now: NaiveDateTime,
    ) -> Result<MonthlyTrends> {
        let months = validate_months(months)?;
        let filter = TransactionFilter::all().in_range(trend_window(months, now));
        let rows = self.store.query(user_id, &filter)?;
        let trends = build_trends(&rows);
        tracing::debug!(user_id, months, records = trends.len(), "trends assembled");
        Ok(MonthlyTrends {
            trends,
            period: format!("{} months", months),
        })
    }

    pub fn insights(&self, user_id: i64, now: NaiveDateTime) -> Result<FinancialInsights> {
        let user = self.store.get_by_id(user_id)?;
        let current_rows = self
            .store
            .query(user_id, &TransactionFilter::all().in_range(current_month_range(now)))?;
        let previous_rows = self
            .store
            .query(user_id, &TransactionFilter::all().in_range(previous_month_range(now)))?;

        let current = month_summary(&current_rows);
        let previous = month_summary(&previous_rows);

        let mut buckets = aggregate_by(
            current_rows
                .iter()
                .filter(|t| t.kind() == TransactionType::Expense),
            |t| t.category,
        );
        sort_by_total_desc(&mut buckets);
        buckets.truncate(TOP_CATEGORY_LIMIT);
        let top_expense_categories: Vec<TopCategory> = buckets
            .into_iter()
            .map(|b| TopCategory {
                category: b.key,
                total: b.total_amount,
                count: b.count,
            })
            .collect();

        let input = InsightInput {
            current_income: current.income,
            current_expenses: current.expenses,
            previous_income: previous.income,
            previous_expenses: previous.expenses,
            monthly_budget: user.monthly_budget,
            top_category: top_expense_categories.first().map(|t| CategoryTotal {
                category: t.category,
                total: t.total,
            }),
        };
        let insights = self.generator.generate(&input);

        let budget_status = user.has_budget().then(|| BudgetStatus {
            budget: user.monthly_budget,
            used: current.expenses,
            remaining: budget_remaining(user.monthly_budget, current.expenses),
            percentage: budget_used(user.monthly_budget, current.expenses),
        });

        tracing::debug!(user_id, insights = insights.len(), "insights assembled");

        Ok(FinancialInsights {
            current_month: current,
            previous_month: previous,
            changes: Changes {
                income: round2(input.income_change()),
                expenses: round2(input.expense_change()),
            },
            top_expense_categories,
            insights,
            budget_status,
        })
    }
}
