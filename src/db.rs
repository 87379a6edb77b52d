// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Cashbook", "cashbook"));

/// Environment variable that overrides the database location.
pub const DB_ENV: &str = "CASHBOOK_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("cashbook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    debug!(path = %path.display(), "opening database");
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
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

    CREATE TABLE IF NOT EXISTS accounts(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL CHECK(role IN ('admin','user')),
        is_active INTEGER NOT NULL DEFAULT 1,
        plan_type TEXT NOT NULL CHECK(plan_type IN ('trial','basic','premium','annual')),
        trial_start_date TEXT,
        trial_end_date TEXT,
        subscription_start_date TEXT,
        last_payment_date TEXT,
        next_payment_date TEXT,
        total_paid TEXT NOT NULL DEFAULT '0',
        monthly_revenue TEXT NOT NULL DEFAULT '0',
        is_trial_expired INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        due_date TEXT NOT NULL,
        status TEXT NOT NULL CHECK(status IN ('pending','paid','overdue')),
        payment_method TEXT,
        payment_date TEXT,
        client TEXT,
        phone TEXT,
        frequency TEXT CHECK(frequency IN ('weekly','monthly','quarterly','yearly')),
        recurring_end_date TEXT,
        parent_transaction_id TEXT,
        owner_id TEXT,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(owner_id) REFERENCES accounts(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_due ON transactions(due_date);
    CREATE INDEX IF NOT EXISTS idx_transactions_parent ON transactions(parent_transaction_id);

    CREATE TABLE IF NOT EXISTS alerts(
        id TEXT PRIMARY KEY,
        transaction_id TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('due_soon','overdue')),
        message TEXT NOT NULL,
        created_on TEXT NOT NULL,
        read INTEGER NOT NULL DEFAULT 0,
        UNIQUE(transaction_id, kind),
        FOREIGN KEY(transaction_id) REFERENCES transactions(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS goals(
        month TEXT PRIMARY KEY,
        income_target TEXT NOT NULL DEFAULT '0',
        expense_limit TEXT NOT NULL DEFAULT '0',
        savings_target TEXT NOT NULL DEFAULT '0'
    );
    "#,
    )?;
    Ok(())
}

/// Fresh in-memory database with the full schema.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}
