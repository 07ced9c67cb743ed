// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use pennywise::Error;
use pennywise::dashboard::Dashboard;
use pennywise::db::{SqliteStore, init_schema};
use pennywise::insights::{InsightGenerator, InsightInput, InsightRule};
use pennywise::models::{
    Category, ExpenseCategory, IncomeCategory, Insight, InsightKind, MAX_AMOUNT, NewTransaction,
    Priority,
};
use pennywise::window::Period;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn add(store: &SqliteStore, user: i64, category: Category, amount: &str, date: NaiveDateTime) {
    let mut input = NewTransaction::new(category, dec(amount), "entry");
    input.date = Some(date);
    store.create_transaction(user, &input, date).unwrap();
}

fn food() -> Category {
    Category::Expense(ExpenseCategory::Food)
}

fn rent() -> Category {
    Category::Expense(ExpenseCategory::Rent)
}

fn salary() -> Category {
    Category::Income(IncomeCategory::Salary)
}

#[test]
fn overview_budget_figures() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let user = store.create_user("Ana", "ana@example.com", dec("1000")).unwrap();
    add(&store, user.id, salary(), "2000", at(2025, 3, 1));
    add(&store, user.id, rent(), "800", at(2025, 3, 2));
    add(&store, user.id, food(), "150", at(2025, 3, 10));
    // Last month counts toward totals but not the monthly figures
    add(&store, user.id, food(), "40", at(2025, 2, 20));

    let data = Dashboard::new(&store)
        .overview(user.id, at(2025, 3, 15))
        .unwrap();
    let o = &data.overview;
    assert_eq!(o.total_income, dec("2000"));
    assert_eq!(o.total_expenses, dec("990"));
    assert_eq!(o.total_balance, dec("1010"));
    assert_eq!(o.monthly_expenses, dec("950"));
    assert_eq!(o.monthly_balance, dec("1050"));
    assert_eq!(o.budget_used, dec("95.00"));
    assert_eq!(o.budget_remaining, dec("50"));
    assert_eq!(o.transaction_count, 4);
    assert_eq!(data.period.month, 3);
    assert_eq!(data.period.year, 2025);
    assert_eq!(data.user.email, "ana@example.com");

    // Newest first
    let dates: Vec<_> = data.recent_transactions.iter().map(|t| t.date).collect();
    assert_eq!(dates[0], at(2025, 3, 10));
    assert_eq!(dates[3], at(2025, 2, 20));
}

#[test]
fn overview_without_budget_and_over_budget() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let free = store.create_user("Free", "free@example.com", Decimal::ZERO).unwrap();
    add(&store, free.id, food(), "300", at(2025, 3, 2));
    let o = Dashboard::new(&store)
        .overview(free.id, at(2025, 3, 15))
        .unwrap()
        .overview;
    assert_eq!(o.budget_used, Decimal::ZERO);
    assert_eq!(o.budget_remaining, Decimal::ZERO);

    let tight = store.create_user("Tight", "tight@example.com", dec("100")).unwrap();
    add(&store, tight.id, food(), "250", at(2025, 3, 2));
    let o = Dashboard::new(&store)
        .overview(tight.id, at(2025, 3, 15))
        .unwrap()
        .overview;
    assert_eq!(o.budget_used, dec("250.00"));
    assert_eq!(o.budget_remaining, Decimal::ZERO);
}

#[test]
fn recent_transactions_capped_at_ten() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let user = store.create_user("Ana", "ana@example.com", Decimal::ZERO).unwrap();
    for day in 1..=12 {
        add(&store, user.id, food(), "1", at(2025, 3, day));
    }
    let data = Dashboard::new(&store)
        .overview(user.id, at(2025, 3, 20))
        .unwrap();
    assert_eq!(data.recent_transactions.len(), 10);
    assert_eq!(data.overview.transaction_count, 12);
}

#[test]
fn breakdown_respects_period() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let user = store.create_user("Ana", "ana@example.com", Decimal::ZERO).unwrap();
    add(&store, user.id, salary(), "5000", at(2025, 3, 1));
    add(&store, user.id, rent(), "600", at(2025, 3, 3));
    add(&store, user.id, food(), "200", at(2025, 3, 12));
    add(&store, user.id, food(), "100", at(2025, 1, 12));
    let now = at(2025, 3, 14);
    let dash = Dashboard::new(&store);

    let month = dash.expense_breakdown(user.id, Period::Month, now).unwrap();
    assert_eq!(month.total_expenses, dec("800"));
    assert_eq!(month.breakdown.len(), 2);
    assert_eq!(month.breakdown[0].category, rent());
    assert_eq!(month.breakdown[0].percentage, dec("75.00"));
    assert_eq!(month.breakdown[1].percentage, dec("25.00"));

    let year = dash.expense_breakdown(user.id, Period::Year, now).unwrap();
    assert_eq!(year.total_expenses, dec("900"));
    assert_eq!(year.breakdown[1].transaction_count, 2);
    assert_eq!(year.breakdown[1].total_amount, dec("300"));

    // 2025-03-14 is a Friday; the week begins Sunday the 9th
    let week = dash.expense_breakdown(user.id, Period::Week, now).unwrap();
    assert_eq!(week.total_expenses, dec("200"));
}

#[test]
fn breakdown_empty_period() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let user = store.create_user("Ana", "ana@example.com", Decimal::ZERO).unwrap();
    add(&store, user.id, food(), "20", at(2024, 6, 1));
    let data = Dashboard::new(&store)
        .expense_breakdown(user.id, Period::Month, at(2025, 3, 14))
        .unwrap();
    assert!(data.breakdown.is_empty());
    assert_eq!(data.total_expenses, Decimal::ZERO);
    let v = serde_json::to_value(&data).unwrap();
    assert_eq!(v["period"], "month");
}

#[test]
fn trends_over_store() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let user = store.create_user("Ana", "ana@example.com", Decimal::ZERO).unwrap();
    add(&store, user.id, salary(), "100", at(2025, 2, 3));
    add(&store, user.id, food(), "40", at(2025, 2, 9));
    add(&store, user.id, rent(), "60", at(2025, 3, 1));
    // Outside a two month window
    add(&store, user.id, rent(), "999", at(2025, 1, 31));

    let dash = Dashboard::new(&store);
    let data = dash.monthly_trends(user.id, Some(2), at(2025, 3, 20)).unwrap();
    assert_eq!(data.period, "2 months");
    assert_eq!(data.trends.len(), 2);
    assert_eq!(data.trends[0].net, dec("60"));
    assert_eq!(data.trends[1].net, dec("-60"));

    let default = dash.monthly_trends(user.id, None, at(2025, 3, 20)).unwrap();
    assert_eq!(default.period, "6 months");
    assert_eq!(default.trends.len(), 3);

    let err = dash.monthly_trends(user.id, Some(0), at(2025, 3, 20)).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn insights_with_budget() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let user = store.create_user("Ana", "ana@example.com", dec("1000")).unwrap();
    add(&store, user.id, rent(), "500", at(2025, 2, 2));
    add(&store, user.id, rent(), "700", at(2025, 3, 2));
    add(&store, user.id, food(), "250", at(2025, 3, 5));

    let data = Dashboard::new(&store)
        .insights(user.id, at(2025, 3, 15))
        .unwrap();
    assert_eq!(data.current_month.expenses, dec("950"));
    assert_eq!(data.previous_month.expenses, dec("500"));
    assert_eq!(data.changes.expenses, dec("90.00"));
    assert_eq!(data.changes.income, Decimal::ZERO);

    let budget = data.budget_status.unwrap();
    assert_eq!(budget.used, dec("950"));
    assert_eq!(budget.remaining, dec("50"));
    assert_eq!(budget.percentage, dec("95.00"));

    assert_eq!(data.top_expense_categories[0].category, rent());
    let titles: Vec<_> = data.insights.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Budget Alert", "Spending Increase", "Top Expense Category"]
    );
    assert!(data.insights[0].message.contains("95.0%"));
}

#[test]
fn insights_without_budget_or_history() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let user = store.create_user("Ana", "ana@example.com", Decimal::ZERO).unwrap();
    let data = Dashboard::new(&store)
        .insights(user.id, at(2025, 3, 15))
        .unwrap();
    assert!(data.budget_status.is_none());
    assert!(data.insights.is_empty());
    assert!(data.top_expense_categories.is_empty());
    let v = serde_json::to_value(&data).unwrap();
    assert!(v["budget_status"].is_null());
}

#[test]
fn users_never_see_each_other() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let a = store.create_user("A", "a@example.com", Decimal::ZERO).unwrap();
    let b = store.create_user("B", "b@example.com", Decimal::ZERO).unwrap();
    add(&store, a.id, food(), "10", at(2025, 3, 2));
    add(&store, b.id, food(), "99", at(2025, 3, 2));

    let dash = Dashboard::new(&store);
    let o = dash.overview(a.id, at(2025, 3, 15)).unwrap();
    assert_eq!(o.overview.total_expenses, dec("10"));
    assert!(o.recent_transactions.iter().all(|t| t.user_id == a.id));
    let bd = dash
        .expense_breakdown(b.id, Period::All, at(2025, 3, 15))
        .unwrap();
    assert_eq!(bd.total_expenses, dec("99"));
}

#[test]
fn missing_user_is_not_found() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let dash = Dashboard::new(&store);
    assert!(matches!(
        dash.overview(42, at(2025, 3, 15)),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        dash.insights(42, at(2025, 3, 15)),
        Err(Error::NotFound(_))
    ));
}

/// Writes a row directly, skipping the amount checks of `create_transaction`.
fn insert_raw(conn: &Connection, user: i64, amount: &str, date: &str) {
    conn.execute(
        "INSERT INTO transactions(user_id,type,category,amount,date,description)
         VALUES (?1,'expense','rent',?2,?3,'raw')",
        params![user, amount, date],
    )
    .unwrap();
}

#[test]
fn amounts_and_budgets_above_limit_rejected() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let over = MAX_AMOUNT + dec("0.01");
    assert!(matches!(
        store.create_user("Big", "big@example.com", over),
        Err(Error::Validation(_))
    ));
    let user = store
        .create_user("Ana", "ana@example.com", MAX_AMOUNT)
        .unwrap();
    assert!(matches!(
        store.update_budget(user.id, over),
        Err(Error::Validation(_))
    ));

    let now = at(2025, 3, 2);
    let huge = NewTransaction::new(rent(), over, "Castle");
    assert!(matches!(
        store.create_transaction(user.id, &huge, now),
        Err(Error::Validation(_))
    ));
    let top = NewTransaction::new(rent(), MAX_AMOUNT, "Castle");
    assert!(store.create_transaction(user.id, &top, now).is_ok());
}

#[test]
fn stored_amount_beyond_tiny_budget_still_reports() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let user = store.create_user("Ana", "ana@example.com", dec("0.01")).unwrap();
    insert_raw(&conn, user.id, "1000000000000000000000000000", "2025-03-02 10:00:00");

    let dash = Dashboard::new(&store);
    let o = dash.overview(user.id, at(2025, 3, 15)).unwrap().overview;
    assert_eq!(o.budget_used, Decimal::MAX);
    assert_eq!(o.budget_remaining, Decimal::ZERO);

    let data = dash.insights(user.id, at(2025, 3, 15)).unwrap();
    assert_eq!(data.insights[0].title, "Budget Alert");
    assert_eq!(data.budget_status.unwrap().percentage, Decimal::MAX);
}

#[test]
fn stored_sums_past_decimal_max_saturate() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let user = store.create_user("Ana", "ana@example.com", Decimal::ZERO).unwrap();
    insert_raw(&conn, user.id, "50000000000000000000000000000", "2025-03-02 10:00:00");
    insert_raw(&conn, user.id, "50000000000000000000000000000", "2025-03-03 10:00:00");

    let dash = Dashboard::new(&store);
    let now = at(2025, 3, 15);
    let o = dash.overview(user.id, now).unwrap().overview;
    assert_eq!(o.total_expenses, Decimal::MAX);
    assert_eq!(o.total_balance, -Decimal::MAX);

    let bd = dash.expense_breakdown(user.id, Period::Month, now).unwrap();
    assert_eq!(bd.total_expenses, Decimal::MAX);
    let trends = dash.monthly_trends(user.id, Some(1), now).unwrap();
    assert_eq!(trends.trends[0].net, -Decimal::MAX);
    assert!(dash.insights(user.id, now).is_ok());
}

fn big_spender(input: &InsightInput) -> Option<Insight> {
    (input.current_expenses > dec("100")).then(|| Insight {
        kind: InsightKind::Caution,
        title: "Big Spender".into(),
        message: "More than 100 spent this month.".into(),
        priority: Priority::Medium,
    })
}

#[test]
fn dashboard_runs_registered_rules() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let user = store.create_user("Ana", "ana@example.com", Decimal::ZERO).unwrap();
    add(&store, user.id, food(), "150", at(2025, 3, 2));

    let mut generator = InsightGenerator::new();
    generator.register(InsightRule {
        name: "big_spender",
        evaluate: big_spender,
    });
    let data = Dashboard::with_generator(&store, generator)
        .insights(user.id, at(2025, 3, 15))
        .unwrap();
    let titles: Vec<_> = data.insights.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Top Expense Category", "Big Spender"]);

    let plain = Dashboard::new(&store)
        .insights(user.id, at(2025, 3, 15))
        .unwrap();
    assert_eq!(plain.insights.len(), 1);
}
