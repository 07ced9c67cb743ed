// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqliteStore;
use crate::models::{
    Category, NewTransaction, PaymentMethod, RecurringFrequency, Transaction, TransactionType,
    recurrence_from_flags,
};
use crate::store::{TransactionFilter, TransactionStore};
use crate::utils::{
    DATETIME_FMT, end_of_day, fmt_money, maybe_print_json, parse_date, parse_datetime,
    parse_decimal, pretty_table, resolve_user,
};
use crate::window::DateRange;
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid transaction id '{}'", raw.trim()))
}

fn tags_arg(sub: &clap::ArgMatches) -> Option<Vec<String>> {
    sub.get_many::<String>("tag")
        .map(|vals| vals.map(|s| s.to_string()).collect())
}

fn frequency_arg(sub: &clap::ArgMatches) -> Result<Option<RecurringFrequency>> {
    Ok(sub
        .get_one::<String>("frequency")
        .map(|s| s.parse::<RecurringFrequency>())
        .transpose()?)
}

/// Resolve `--type`/`--category`; either may be omitted on edit, in which case
/// the category alone decides the type.
fn category_arg(sub: &clap::ArgMatches) -> Result<Option<Category>> {
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TransactionType>())
        .transpose()?;
    let category = sub.get_one::<String>("category");
    Ok(match (kind, category) {
        (Some(k), Some(c)) => Some(Category::parse_for(k, c)?),
        (None, Some(c)) => Some(c.parse::<Category>()?),
        (Some(k), None) => {
            return Err(anyhow::anyhow!(
                "--type {} needs a matching --category",
                k
            ));
        }
        (None, None) => None,
    })
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = resolve_user(conn, sub)?;
    let category = category_arg(sub)?.context("--category is required")?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap();
    let mut input = NewTransaction::new(category, amount, description.as_str());
    input.date = sub
        .get_one::<String>("date")
        .map(|s| parse_datetime(s))
        .transpose()?;
    if let Some(p) = sub.get_one::<String>("payment") {
        input.payment_method = p.parse::<PaymentMethod>()?;
    }
    input.tags = tags_arg(sub).unwrap_or_default();
    input.recurring = recurrence_from_flags(sub.get_flag("recurring"), frequency_arg(sub)?)?;

    let now = chrono::Local::now().naive_local();
    let tx = SqliteStore::new(conn).create_transaction(user_id, &input, now)?;
    println!(
        "Recorded #{} {} {} ({}) on {}",
        tx.id,
        tx.kind(),
        fmt_money(&tx.amount),
        tx.category,
        tx.date.format(DATETIME_FMT)
    );
    Ok(())
}

/// Build the replacement for `existing` from whichever fields were passed.
pub fn edited(existing: &Transaction, sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let mut input = NewTransaction {
        category: existing.category,
        amount: existing.amount,
        date: Some(existing.date),
        description: existing.description.clone(),
        payment_method: existing.payment_method,
        tags: existing.tags.iter().cloned().collect(),
        recurring: existing.recurring,
    };
    if let Some(category) = category_arg(sub)? {
        input.category = category;
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        input.amount = parse_decimal(a)?;
    }
    if let Some(d) = sub.get_one::<String>("date") {
        input.date = Some(parse_datetime(d)?);
    }
    if let Some(d) = sub.get_one::<String>("description") {
        input.description = d.to_string();
    }
    if let Some(p) = sub.get_one::<String>("payment") {
        input.payment_method = p.parse::<PaymentMethod>()?;
    }
    if let Some(tags) = tags_arg(sub) {
        input.tags = tags;
    }
    let frequency = frequency_arg(sub)?;
    if sub.get_flag("recurring") || frequency.is_some() {
        input.recurring = recurrence_from_flags(sub.get_flag("recurring"), frequency)?;
    }
    Ok(input)
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = resolve_user(conn, sub)?;
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let store = SqliteStore::new(conn);
    let existing = store.get_transaction(user_id, id)?;
    let input = edited(&existing, sub)?;
    let tx = store.update_transaction(user_id, id, &input)?;
    println!(
        "Updated #{} {} {} ({})",
        tx.id,
        tx.kind(),
        fmt_money(&tx.amount),
        tx.category
    );
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = resolve_user(conn, sub)?;
    let ids = sub
        .get_many::<String>("id")
        .unwrap()
        .map(|s| parse_id(s))
        .collect::<Result<Vec<_>>>()?;
    let store = SqliteStore::new(conn);
    if let [id] = ids.as_slice() {
        store.delete_transaction(user_id, *id)?;
        println!("Removed transaction #{}", id);
    } else {
        let removed = store.bulk_delete(user_id, &ids)?;
        println!("Removed {} of {} transactions", removed, ids.len());
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.r#type.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.description.clone(),
                    r.payment_method.clone(),
                    r.tags.join(","),
                    r.recurring.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID",
                    "Date",
                    "Type",
                    "Category",
                    "Amount",
                    "Description",
                    "Payment",
                    "Tags",
                    "Recurring"
                ],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub r#type: String,
    pub category: String,
    pub amount: String,
    pub description: String,
    pub payment_method: String,
    pub tags: Vec<String>,
    pub recurring: String,
}

impl From<Transaction> for TransactionRow {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            date: t.date.format(DATETIME_FMT).to_string(),
            r#type: t.kind().to_string(),
            category: t.category.to_string(),
            amount: fmt_money(&t.amount),
            description: t.description,
            payment_method: t.payment_method.to_string(),
            tags: t.tags.into_iter().collect(),
            recurring: t.recurring.map(|f| f.to_string()).unwrap_or_default(),
        }
    }
}

pub fn filter_from_args(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let mut filter = TransactionFilter::all();
    if let Some(t) = sub.get_one::<String>("type") {
        filter.kind = Some(t.parse::<TransactionType>()?);
    }
    if let Some(c) = sub.get_one::<String>("category") {
        let category = c.parse::<Category>()?;
        if filter.kind.is_some_and(|k| k != category.kind()) {
            return Err(anyhow::anyhow!(
                "Category '{}' is not a {} category",
                category,
                filter.kind.map(|k| k.as_str()).unwrap_or_default()
            ));
        }
        filter.category = Some(category);
    }
    let start = sub
        .get_one::<String>("from")
        .map(|s| parse_date(s).map(|d| d.and_time(chrono::NaiveTime::MIN)))
        .transpose()?;
    let end = sub
        .get_one::<String>("to")
        .map(|s| parse_date(s).and_then(end_of_day))
        .transpose()?;
    filter.range = DateRange { start, end };
    filter.limit = sub.get_one::<usize>("limit").copied();
    Ok(filter)
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let user_id = resolve_user(conn, sub)?;
    let filter = filter_from_args(sub)?;
    let rows = SqliteStore::new(conn).query(user_id, &filter)?;
    Ok(rows.into_iter().map(TransactionRow::from).collect())
}
