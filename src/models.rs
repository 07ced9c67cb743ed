// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const MAX_DESCRIPTION_LEN: usize = 200;
pub const MAX_TAG_LEN: usize = 20;

/// Upper bound for a transaction amount or a monthly budget (one trillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::Validation(format!(
                "Unknown transaction type '{}', expected income or expense",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncomeCategory {
    Salary,
    Freelance,
    Allowance,
    Scholarship,
    PartTime,
    Gift,
    OtherIncome,
}

impl IncomeCategory {
    pub const ALL: [IncomeCategory; 7] = [
        IncomeCategory::Salary,
        IncomeCategory::Freelance,
        IncomeCategory::Allowance,
        IncomeCategory::Scholarship,
        IncomeCategory::PartTime,
        IncomeCategory::Gift,
        IncomeCategory::OtherIncome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeCategory::Salary => "salary",
            IncomeCategory::Freelance => "freelance",
            IncomeCategory::Allowance => "allowance",
            IncomeCategory::Scholarship => "scholarship",
            IncomeCategory::PartTime => "part-time",
            IncomeCategory::Gift => "gift",
            IncomeCategory::OtherIncome => "other-income",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpenseCategory {
    Food,
    Transportation,
    Education,
    Entertainment,
    Healthcare,
    Shopping,
    Utilities,
    Rent,
    Books,
    Technology,
    Clothing,
    OtherExpense,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 12] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transportation,
        ExpenseCategory::Education,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Shopping,
        ExpenseCategory::Utilities,
        ExpenseCategory::Rent,
        ExpenseCategory::Books,
        ExpenseCategory::Technology,
        ExpenseCategory::Clothing,
        ExpenseCategory::OtherExpense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "food",
            ExpenseCategory::Transportation => "transportation",
            ExpenseCategory::Education => "education",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Healthcare => "healthcare",
            ExpenseCategory::Shopping => "shopping",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Books => "books",
            ExpenseCategory::Technology => "technology",
            ExpenseCategory::Clothing => "clothing",
            ExpenseCategory::OtherExpense => "other-expense",
        }
    }
}

/// A transaction category. The variant decides whether the transaction is
/// income or expense, so a category can never disagree with its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Income(IncomeCategory),
    Expense(ExpenseCategory),
}

impl Category {
    pub fn kind(&self) -> TransactionType {
        match self {
            Category::Income(_) => TransactionType::Income,
            Category::Expense(_) => TransactionType::Expense,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Income(c) => c.as_str(),
            Category::Expense(c) => c.as_str(),
        }
    }

    /// Every category of the given type, in display order.
    pub fn all_of(kind: TransactionType) -> Vec<Category> {
        match kind {
            TransactionType::Income => IncomeCategory::ALL
                .iter()
                .copied()
                .map(Category::Income)
                .collect(),
            TransactionType::Expense => ExpenseCategory::ALL
                .iter()
                .copied()
                .map(Category::Expense)
                .collect(),
        }
    }

    /// Parse a category name and check it belongs to `kind`.
    pub fn parse_for(kind: TransactionType, name: &str) -> Result<Category> {
        let category: Category = name.parse()?;
        if category.kind() != kind {
            return Err(Error::Validation(format!(
                "Category '{}' is not valid for {} transactions",
                category, kind
            )));
        }
        Ok(category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        if let Some(c) = IncomeCategory::ALL.iter().find(|c| c.as_str() == needle) {
            return Ok(Category::Income(*c));
        }
        if let Some(c) = ExpenseCategory::ALL.iter().find(|c| c.as_str() == needle) {
            return Ok(Category::Expense(*c));
        }
        Err(Error::Validation(format!("Unknown category '{}'", s.trim())))
    }
}

impl TryFrom<String> for Category {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    BankTransfer,
    MobilePayment,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank-transfer",
            PaymentMethod::MobilePayment => "mobile-payment",
            PaymentMethod::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "bank-transfer" => Ok(PaymentMethod::BankTransfer),
            "mobile-payment" => Ok(PaymentMethod::MobilePayment),
            "other" => Ok(PaymentMethod::Other),
            other => Err(Error::Validation(format!(
                "Unknown payment method '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurringFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringFrequency::Daily => "daily",
            RecurringFrequency::Weekly => "weekly",
            RecurringFrequency::Monthly => "monthly",
            RecurringFrequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for RecurringFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecurringFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(RecurringFrequency::Daily),
            "weekly" => Ok(RecurringFrequency::Weekly),
            "monthly" => Ok(RecurringFrequency::Monthly),
            "yearly" => Ok(RecurringFrequency::Yearly),
            other => Err(Error::Validation(format!(
                "Unknown recurring frequency '{}'",
                other
            ))),
        }
    }
}

/// Collapse the `is_recurring` flag and optional frequency into one value.
/// A frequency is required exactly when the transaction recurs.
pub fn recurrence_from_flags(
    is_recurring: bool,
    frequency: Option<RecurringFrequency>,
) -> Result<Option<RecurringFrequency>> {
    match (is_recurring, frequency) {
        (true, Some(f)) => Ok(Some(f)),
        (false, None) => Ok(None),
        (true, None) => Err(Error::Validation(
            "Recurring transactions need a recurring frequency".into(),
        )),
        (false, Some(_)) => Err(Error::Validation(
            "Recurring frequency given for a non-recurring transaction".into(),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub category: Category,
    pub amount: Decimal,
    pub date: NaiveDateTime,
    pub description: String,
    pub payment_method: PaymentMethod,
    pub tags: BTreeSet<String>,
    pub recurring: Option<RecurringFrequency>,
}

impl Transaction {
    pub fn kind(&self) -> TransactionType {
        self.category.kind()
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring.is_some()
    }
}

/// Input for creating or replacing a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub category: Category,
    pub amount: Decimal,
    /// Defaults to the creation time when unset.
    pub date: Option<NaiveDateTime>,
    pub description: String,
    pub payment_method: PaymentMethod,
    pub tags: Vec<String>,
    pub recurring: Option<RecurringFrequency>,
}

impl NewTransaction {
    pub fn new(category: Category, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            category,
            amount,
            date: None,
            description: description.into(),
            payment_method: PaymentMethod::default(),
            tags: Vec::new(),
            recurring: None,
        }
    }

    /// Check field constraints and return the cleaned description and tag set.
    pub fn validate(&self) -> Result<(String, BTreeSet<String>)> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "Amount must be greater than 0, got {}",
                self.amount
            )));
        }
        if self.amount > MAX_AMOUNT {
            return Err(Error::Validation(format!(
                "Amount cannot exceed {}, got {}",
                MAX_AMOUNT, self.amount
            )));
        }
        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(Error::Validation("Description is required".into()));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(Error::Validation(format!(
                "Description cannot exceed {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
        let mut tags = BTreeSet::new();
        for raw in &self.tags {
            let tag = raw.trim();
            if tag.is_empty() {
                continue;
            }
            if tag.chars().count() > MAX_TAG_LEN {
                return Err(Error::Validation(format!(
                    "Tag '{}' exceeds {} characters",
                    tag, MAX_TAG_LEN
                )));
            }
            tags.insert(tag.to_string());
        }
        Ok((description, tags))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Zero means no budget is configured.
    pub monthly_budget: Decimal,
    pub created_at: String,
}

impl User {
    pub fn has_budget(&self) -> bool {
        self.monthly_budget > Decimal::ZERO
    }
}

/// Totals for one group of transactions sharing a key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateBucket<K> {
    pub key: K,
    pub total_amount: Decimal,
    pub count: u64,
    pub average_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Info,
    Caution,
    Warning,
    Success,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Info => "info",
            InsightKind::Caution => "caution",
            InsightKind::Warning => "warning",
            InsightKind::Success => "success",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// A human-readable advisory derived from spending and income figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    pub priority: Priority,
}
