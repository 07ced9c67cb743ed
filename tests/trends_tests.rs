// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use pennywise::models::{Category, ExpenseCategory, IncomeCategory, PaymentMethod, Transaction};
use pennywise::trends::{build_trends, month_name, validate_months};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn tx(id: i64, category: Category, amount: &str, y: i32, m: u32, d: u32) -> Transaction {
    Transaction {
        id,
        user_id: 1,
        category,
        amount: dec(amount),
        date: NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
        description: "t".into(),
        payment_method: PaymentMethod::Card,
        tags: BTreeSet::new(),
        recurring: None,
    }
}

#[test]
fn two_month_scenario_nets() {
    let txs = vec![
        tx(1, Category::Income(IncomeCategory::Salary), "100", 2025, 1, 3),
        tx(2, Category::Expense(ExpenseCategory::Food), "40", 2025, 1, 9),
        tx(3, Category::Expense(ExpenseCategory::Rent), "60", 2025, 2, 1),
    ];
    let trends = build_trends(&txs);
    assert_eq!(trends.len(), 2);

    assert_eq!((trends[0].year, trends[0].month), (2025, 1));
    assert_eq!(trends[0].month_name, "Jan");
    assert_eq!(trends[0].income, dec("100"));
    assert_eq!(trends[0].expense, dec("40"));
    assert_eq!(trends[0].net, dec("60"));
    assert_eq!(trends[0].total_transactions, 2);

    assert_eq!(trends[1].month, 2);
    assert_eq!(trends[1].income_count, 0);
    assert_eq!(trends[1].expense_count, 1);
    assert_eq!(trends[1].net, dec("-60"));
}

#[test]
fn months_sorted_across_year_boundary_and_gaps_not_filled() {
    // Newest first, the way the store returns rows
    let txs = vec![
        tx(1, Category::Expense(ExpenseCategory::Food), "5", 2025, 2, 14),
        tx(2, Category::Income(IncomeCategory::Gift), "20", 2024, 11, 2),
        tx(3, Category::Expense(ExpenseCategory::Books), "12", 2024, 11, 1),
    ];
    let trends = build_trends(&txs);
    let keys: Vec<_> = trends.iter().map(|t| (t.year, t.month)).collect();
    assert_eq!(keys, vec![(2024, 11), (2025, 2)]);
}

#[test]
fn same_type_in_one_month_is_summed() {
    let txs = vec![
        tx(1, Category::Expense(ExpenseCategory::Food), "10.25", 2025, 5, 1),
        tx(2, Category::Expense(ExpenseCategory::Rent), "500", 2025, 5, 2),
    ];
    let trends = build_trends(&txs);
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].expense, dec("510.25"));
    assert_eq!(trends[0].expense_count, 2);
    assert_eq!(trends[0].net, dec("-510.25"));
}

#[test]
fn empty_input_has_no_months() {
    let txs: Vec<Transaction> = Vec::new();
    assert!(build_trends(&txs).is_empty());
}

#[test]
fn month_count_bounds() {
    assert_eq!(validate_months(None).unwrap(), 6);
    assert_eq!(validate_months(Some(1)).unwrap(), 1);
    assert_eq!(validate_months(Some(24)).unwrap(), 24);
    assert!(validate_months(Some(0)).is_err());
    assert!(validate_months(Some(25)).is_err());
}

#[test]
fn month_names() {
    assert_eq!(month_name(1), "Jan");
    assert_eq!(month_name(12), "Dec");
    assert_eq!(month_name(0), "");
}
