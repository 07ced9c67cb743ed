// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::SqliteStore;
use crate::utils::{fmt_money, parse_decimal, pretty_table, resolve_user, set_current_user};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::store::UserStore;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", _)) => list(conn)?,
        Some(("use", sub)) => select(conn, sub)?,
        Some(("budget", sub)) => budget(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let email = sub.get_one::<String>("email").unwrap();
    let budget = match sub.get_one::<String>("budget") {
        Some(b) => parse_decimal(b)?,
        None => Decimal::ZERO,
    };
    let store = SqliteStore::new(conn);
    let user = store.create_user(name, email, budget)?;
    println!(
        "Added user #{} '{}' <{}> (budget {})",
        user.id,
        user.name,
        user.email,
        fmt_money(&user.monthly_budget)
    );
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let store = SqliteStore::new(conn);
    let data = store
        .list_users()?
        .into_iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                u.name,
                u.email,
                fmt_money(&u.monthly_budget),
                u.created_at,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Name", "Email", "Monthly Budget", "Created"], data)
    );
    Ok(())
}

fn select(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let raw = sub.get_one::<String>("id").unwrap().trim();
    let id = raw
        .parse::<i64>()
        .with_context(|| format!("Invalid user id '{}'", raw))?;
    let user = SqliteStore::new(conn).get_by_id(id)?;
    set_current_user(conn, user.id)?;
    println!("Acting as user #{} '{}'", user.id, user.name);
    Ok(())
}

fn budget(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = resolve_user(conn, sub)?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let user = SqliteStore::new(conn).update_budget(user_id, amount)?;
    println!(
        "Monthly budget for '{}' set to {}",
        user.name,
        fmt_money(&user.monthly_budget)
    );
    Ok(())
}
