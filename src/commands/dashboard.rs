// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dashboard::Dashboard;
use crate::db::SqliteStore;
use crate::utils::{
    DATETIME_FMT, fmt_money, maybe_print_json, parse_datetime, pretty_table, resolve_user,
};
use crate::window::Period;
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("overview", sub)) => overview(conn, sub)?,
        Some(("breakdown", sub)) => breakdown(conn, sub)?,
        Some(("trends", sub)) => trends(conn, sub)?,
        Some(("insights", sub)) => insights(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn reference_time(sub: &clap::ArgMatches) -> Result<NaiveDateTime> {
    match sub.get_one::<String>("as_of") {
        Some(s) => parse_datetime(s),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

fn overview(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = resolve_user(conn, sub)?;
    let now = reference_time(sub)?;
    let store = SqliteStore::new(conn);
    let data = Dashboard::new(&store).overview(user_id, now)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let o = &data.overview;
    let rows = vec![
        vec!["Total income".into(), fmt_money(&o.total_income)],
        vec!["Total expenses".into(), fmt_money(&o.total_expenses)],
        vec!["Total balance".into(), fmt_money(&o.total_balance)],
        vec![
            format!("Income {}-{:02}", data.period.year, data.period.month),
            fmt_money(&o.monthly_income),
        ],
        vec![
            format!("Expenses {}-{:02}", data.period.year, data.period.month),
            fmt_money(&o.monthly_expenses),
        ],
        vec!["Monthly balance".into(), fmt_money(&o.monthly_balance)],
        vec!["Monthly budget".into(), fmt_money(&o.monthly_budget)],
        vec!["Budget used".into(), format!("{:.2}%", o.budget_used)],
        vec!["Budget remaining".into(), fmt_money(&o.budget_remaining)],
        vec!["Transactions".into(), o.transaction_count.to_string()],
    ];
    println!("{}", pretty_table(&["Overview", "Value"], rows));

    let recent = data
        .recent_transactions
        .iter()
        .map(|t| {
            vec![
                t.date.format(DATETIME_FMT).to_string(),
                t.kind().to_string(),
                t.category.to_string(),
                fmt_money(&t.amount),
                t.description.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Type", "Category", "Amount", "Description"],
            recent
        )
    );
    Ok(())
}

fn breakdown(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = resolve_user(conn, sub)?;
    let now = reference_time(sub)?;
    let period = Period::from_name(sub.get_one::<String>("period").unwrap());
    let store = SqliteStore::new(conn);
    let data = Dashboard::new(&store).expense_breakdown(user_id, period, now)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let mut rows: Vec<Vec<String>> = data
        .breakdown
        .iter()
        .map(|b| {
            vec![
                b.category.to_string(),
                fmt_money(&b.total_amount),
                b.transaction_count.to_string(),
                fmt_money(&b.average_amount),
                format!("{:.2}%", b.percentage),
            ]
        })
        .collect();
    rows.push(vec![
        format!("Total ({})", data.period),
        fmt_money(&data.total_expenses),
        String::new(),
        String::new(),
        String::new(),
    ]);
    println!(
        "{}",
        pretty_table(&["Category", "Spent", "Count", "Average", "Share"], rows)
    );
    Ok(())
}

fn trends(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = resolve_user(conn, sub)?;
    let now = reference_time(sub)?;
    let months = sub.get_one::<u32>("months").copied();
    let store = SqliteStore::new(conn);
    let data = Dashboard::new(&store).monthly_trends(user_id, months, now)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .trends
        .iter()
        .map(|t| {
            vec![
                format!("{} {}", t.month_name, t.year),
                fmt_money(&t.income),
                fmt_money(&t.expense),
                fmt_money(&t.net),
                t.total_transactions.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Net", "Transactions"], rows)
    );
    Ok(())
}

fn insights(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = resolve_user(conn, sub)?;
    let now = reference_time(sub)?;
    let store = SqliteStore::new(conn);
    let data = Dashboard::new(&store).insights(user_id, now)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let summary = vec![
        vec![
            "This month".into(),
            fmt_money(&data.current_month.income),
            fmt_money(&data.current_month.expenses),
            fmt_money(&data.current_month.balance),
        ],
        vec![
            "Last month".into(),
            fmt_money(&data.previous_month.income),
            fmt_money(&data.previous_month.expenses),
            fmt_money(&data.previous_month.balance),
        ],
        vec![
            "Change".into(),
            format!("{:.2}%", data.changes.income),
            format!("{:.2}%", data.changes.expenses),
            String::new(),
        ],
    ];
    println!(
        "{}",
        pretty_table(&["", "Income", "Expenses", "Balance"], summary)
    );
    if let Some(b) = &data.budget_status {
        println!(
            "Budget: {} used of {} ({:.2}%), {} remaining",
            fmt_money(&b.used),
            fmt_money(&b.budget),
            b.percentage,
            fmt_money(&b.remaining)
        );
    }
    let rows = data
        .insights
        .iter()
        .map(|i| {
            vec![
                i.kind.as_str().to_string(),
                i.priority.as_str().to_string(),
                i.title.clone(),
                i.message.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Type", "Priority", "Title", "Message"], rows)
    );
    Ok(())
}
