// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Context;
use chrono::NaiveDateTime;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::models::{
    Category, MAX_AMOUNT, NewTransaction, PaymentMethod, RecurringFrequency, Transaction,
    TransactionType, User, recurrence_from_flags,
};
use crate::store::{TransactionFilter, TransactionStore, UserStore};
use crate::utils::DATETIME_FMT;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Pennywise", "pennywise"));

/// Environment variable that overrides the database location.
pub const DB_ENV: &str = "PENNYWISE_DB";

pub fn db_path() -> anyhow::Result<PathBuf> {
    if let Ok(p) = std::env::var(DB_ENV) {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p.trim()));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("pennywise.sqlite"))
}

pub fn open_or_init() -> anyhow::Result<Connection> {
    let path = db_path()?;
    open_at(&path)
}

pub fn open_at(path: &std::path::Path) -> anyhow::Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        monthly_budget TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        payment_method TEXT NOT NULL DEFAULT 'cash',
        tags TEXT NOT NULL DEFAULT '[]',
        is_recurring INTEGER NOT NULL DEFAULT 0,
        recurring_frequency TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
    CREATE INDEX IF NOT EXISTS idx_transactions_user_type ON transactions(user_id, type);
    CREATE INDEX IF NOT EXISTS idx_transactions_user_category ON transactions(user_id, category);
    "#,
    )?;
    Ok(())
}

const TX_COLUMNS: &str = "id, user_id, type, category, amount, date, description, \
     payment_method, tags, is_recurring, recurring_frequency";

/// Columns exactly as stored, before they are checked against the model.
struct TransactionRecord {
    id: i64,
    user_id: i64,
    kind: String,
    category: String,
    amount: String,
    date: String,
    description: String,
    payment_method: String,
    tags: String,
    is_recurring: bool,
    recurring_frequency: Option<String>,
}

impl TransactionRecord {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            user_id: r.get(1)?,
            kind: r.get(2)?,
            category: r.get(3)?,
            amount: r.get(4)?,
            date: r.get(5)?,
            description: r.get(6)?,
            payment_method: r.get(7)?,
            tags: r.get(8)?,
            is_recurring: r.get(9)?,
            recurring_frequency: r.get(10)?,
        })
    }
}

fn corrupt(id: i64, what: &str, err: impl std::fmt::Display) -> Error {
    Error::InvalidData(format!("transaction {}: {} ({})", id, what, err))
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = Error;

    fn try_from(rec: TransactionRecord) -> Result<Self> {
        let id = rec.id;
        let kind: TransactionType = rec
            .kind
            .parse()
            .map_err(|e| corrupt(id, "bad type", e))?;
        let category = Category::parse_for(kind, &rec.category)
            .map_err(|e| corrupt(id, "bad category", e))?;
        let amount = rec
            .amount
            .parse::<Decimal>()
            .map_err(|e| corrupt(id, &format!("bad amount '{}'", rec.amount), e))?;
        let date = NaiveDateTime::parse_from_str(&rec.date, DATETIME_FMT)
            .map_err(|e| corrupt(id, &format!("bad date '{}'", rec.date), e))?;
        let payment_method: PaymentMethod = rec
            .payment_method
            .parse()
            .map_err(|e| corrupt(id, "bad payment method", e))?;
        let tags: BTreeSet<String> =
            serde_json::from_str(&rec.tags).map_err(|e| corrupt(id, "bad tags", e))?;
        let frequency = rec
            .recurring_frequency
            .as_deref()
            .map(str::parse::<RecurringFrequency>)
            .transpose()
            .map_err(|e| corrupt(id, "bad recurring frequency", e))?;
        let recurring = recurrence_from_flags(rec.is_recurring, frequency)
            .map_err(|e| corrupt(id, "recurrence", e))?;
        Ok(Transaction {
            id,
            user_id: rec.user_id,
            category,
            amount,
            date,
            description: rec.description,
            payment_method,
            tags,
            recurring,
        })
    }
}

fn parse_budget(user_id: i64, raw: &str) -> Result<Decimal> {
    raw.parse::<Decimal>().map_err(|e| {
        Error::InvalidData(format!("user {}: bad monthly budget '{}' ({})", user_id, raw, e))
    })
}

fn check_budget(budget: Decimal) -> Result<()> {
    if budget < Decimal::ZERO {
        return Err(Error::Validation(format!(
            "Monthly budget cannot be negative, got {}",
            budget
        )));
    }
    if budget > MAX_AMOUNT {
        return Err(Error::Validation(format!(
            "Monthly budget cannot exceed {}, got {}",
            MAX_AMOUNT, budget
        )));
    }
    Ok(())
}

/// SQLite-backed user and transaction store.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn create_user(&self, name: &str, email: &str, monthly_budget: Decimal) -> Result<User> {
        let name = name.trim();
        let email = email.trim().to_lowercase();
        if name.is_empty() {
            return Err(Error::Validation("Name is required".into()));
        }
        if !email.contains('@') {
            return Err(Error::Validation(format!("Invalid email '{}'", email)));
        }
        check_budget(monthly_budget)?;
        let existing: Option<i64> = self
            .conn
            .query_row("SELECT id FROM users WHERE email=?1", params![email], |r| {
                r.get(0)
            })
            .optional()?;
        if existing.is_some() {
            return Err(Error::Validation(format!(
                "User already exists with email '{}'",
                email
            )));
        }
        self.conn.execute(
            "INSERT INTO users(name, email, monthly_budget) VALUES (?1, ?2, ?3)",
            params![name, email, monthly_budget.to_string()],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(user_id = id, "user created");
        self.get_by_id(id)
    }

    pub fn update_budget(&self, user_id: i64, monthly_budget: Decimal) -> Result<User> {
        check_budget(monthly_budget)?;
        let changed = self.conn.execute(
            "UPDATE users SET monthly_budget=?1 WHERE id=?2",
            params![monthly_budget.to_string(), user_id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("user {}", user_id)));
        }
        self.get_by_id(user_id)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, monthly_budget, created_at FROM users ORDER BY id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
            ))
        })?;
        let mut users = Vec::new();
        for row in rows {
            let (id, name, email, budget, created_at) = row?;
            users.push(User {
                id,
                name,
                email,
                monthly_budget: parse_budget(id, &budget)?,
                created_at,
            });
        }
        Ok(users)
    }

    pub fn create_transaction(
        &self,
        user_id: i64,
        input: &NewTransaction,
        now: NaiveDateTime,
    ) -> Result<Transaction> {
        // Owner must exist before anything is recorded against it.
        self.get_by_id(user_id)?;
        let (description, tags) = input.validate()?;
        let date = input.date.unwrap_or(now);
        self.conn.execute(
            "INSERT INTO transactions(user_id, type, category, amount, date, description,
                payment_method, tags, is_recurring, recurring_frequency)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                user_id,
                input.category.kind().as_str(),
                input.category.as_str(),
                input.amount.to_string(),
                date.format(DATETIME_FMT).to_string(),
                description,
                input.payment_method.as_str(),
                serde_json::to_string(&tags)?,
                input.recurring.is_some(),
                input.recurring.map(|f| f.as_str()),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(user_id, transaction_id = id, "transaction created");
        self.get_transaction(user_id, id)
    }

    /// Fetch one transaction, refusing access to other users' rows.
    pub fn get_transaction(&self, user_id: i64, id: i64) -> Result<Transaction> {
        let sql = format!("SELECT {} FROM transactions WHERE id=?1", TX_COLUMNS);
        let rec = self
            .conn
            .query_row(&sql, params![id], TransactionRecord::from_row)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", id)))?;
        if rec.user_id != user_id {
            tracing::warn!(user_id, transaction_id = id, "cross-user access refused");
            return Err(Error::Unauthorized(format!(
                "transaction {} belongs to another user",
                id
            )));
        }
        Transaction::try_from(rec)
    }

    pub fn update_transaction(
        &self,
        user_id: i64,
        id: i64,
        input: &NewTransaction,
    ) -> Result<Transaction> {
        let existing = self.get_transaction(user_id, id)?;
        let (description, tags) = input.validate()?;
        let date = input.date.unwrap_or(existing.date);
        self.conn.execute(
            "UPDATE transactions SET type=?1, category=?2, amount=?3, date=?4, description=?5,
                payment_method=?6, tags=?7, is_recurring=?8, recurring_frequency=?9
             WHERE id=?10 AND user_id=?11",
            params![
                input.category.kind().as_str(),
                input.category.as_str(),
                input.amount.to_string(),
                date.format(DATETIME_FMT).to_string(),
                description,
                input.payment_method.as_str(),
                serde_json::to_string(&tags)?,
                input.recurring.is_some(),
                input.recurring.map(|f| f.as_str()),
                id,
                user_id,
            ],
        )?;
        tracing::debug!(user_id, transaction_id = id, "transaction updated");
        self.get_transaction(user_id, id)
    }

    pub fn delete_transaction(&self, user_id: i64, id: i64) -> Result<()> {
        self.get_transaction(user_id, id)?;
        self.conn.execute(
            "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
            params![id, user_id],
        )?;
        tracing::debug!(user_id, transaction_id = id, "transaction deleted");
        Ok(())
    }

    /// Delete the listed ids owned by `user_id`; others are skipped.
    /// Returns how many rows were removed.
    pub fn bulk_delete(&self, user_id: i64, ids: &[i64]) -> Result<usize> {
        if ids.is_empty() {
            return Err(Error::Validation("Transaction IDs are required".into()));
        }
        let tx = self.conn.unchecked_transaction()?;
        let mut removed = 0;
        {
            let mut stmt =
                tx.prepare("DELETE FROM transactions WHERE id=?1 AND user_id=?2")?;
            for id in ids {
                removed += stmt.execute(params![id, user_id])?;
            }
        }
        tx.commit()?;
        tracing::debug!(user_id, requested = ids.len(), removed, "bulk delete");
        Ok(removed)
    }
}

/// Builds the WHERE clause shared by `query` and `count`.
fn filter_sql(user_id: i64, filter: &TransactionFilter) -> (String, Vec<String>) {
    let mut sql = String::from(" WHERE user_id=?");
    let mut params_vec: Vec<String> = vec![user_id.to_string()];
    if let Some(kind) = filter.kind {
        sql.push_str(" AND type=?");
        params_vec.push(kind.as_str().into());
    }
    if let Some(category) = filter.category {
        sql.push_str(" AND category=?");
        params_vec.push(category.as_str().into());
    }
    if let Some(start) = filter.range.start {
        sql.push_str(" AND date>=?");
        params_vec.push(start.format(DATETIME_FMT).to_string());
    }
    if let Some(end) = filter.range.end {
        sql.push_str(" AND date<=?");
        params_vec.push(end.format(DATETIME_FMT).to_string());
    }
    (sql, params_vec)
}

impl TransactionStore for SqliteStore<'_> {
    fn query(&self, user_id: i64, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let (clause, mut params_vec) = filter_sql(user_id, filter);
        let mut sql = format!("SELECT {} FROM transactions{}", TX_COLUMNS, clause);
        sql.push_str(" ORDER BY date DESC, id DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            params_vec.push(limit.to_string());
        }
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params_vec.iter()),
            TransactionRecord::from_row,
        )?;
        let mut data = Vec::new();
        for row in rows {
            data.push(Transaction::try_from(row?)?);
        }
        tracing::debug!(user_id, rows = data.len(), "transactions queried");
        Ok(data)
    }

    fn count(&self, user_id: i64, filter: &TransactionFilter) -> Result<u64> {
        let (clause, params_vec) = filter_sql(user_id, filter);
        let sql = format!("SELECT COUNT(*) FROM transactions{}", clause);
        let n: i64 = self.conn.query_row(
            &sql,
            rusqlite::params_from_iter(params_vec.iter()),
            |r| r.get(0),
        )?;
        Ok(n.max(0) as u64)
    }
}

impl UserStore for SqliteStore<'_> {
    fn get_by_id(&self, user_id: i64) -> Result<User> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, email, monthly_budget, created_at FROM users WHERE id=?1",
                params![user_id],
                |r| {
                    Ok((
                        r.get::<_, i64>(0)?,
                        r.get::<_, String>(1)?,
                        r.get::<_, String>(2)?,
                        r.get::<_, String>(3)?,
                        r.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;
        let (id, name, email, budget, created_at) =
            row.ok_or_else(|| Error::NotFound(format!("user {}", user_id)))?;
        Ok(User {
            id,
            name,
            email,
            monthly_budget: parse_budget(id, &budget)?,
            created_at,
        })
    }
}
