// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record persistence. The connection is the store handle and is passed into
//! every call; writes replace whole records.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::errors::Error;
use crate::models::{
    Account, AlertKind, AlertSettings, Frequency, MonthlyGoal, NotificationAlert, Payment,
    PlanType, Recurrence, Role, Transaction, TxKind, TxStatus,
};

const ACCOUNT_COLS: &str = "id, name, email, role, is_active, plan_type, trial_start_date, \
     trial_end_date, subscription_start_date, last_payment_date, next_payment_date, total_paid, \
     monthly_revenue, is_trial_expired, created_at";

const TX_COLS: &str = "id, kind, description, amount, category, due_date, status, \
     payment_method, payment_date, client, phone, frequency, recurring_end_date, \
     parent_transaction_id, owner_id, notes";

fn decimal_col(raw: &str, table: &'static str, id: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}' in {}#{}", raw, table, id))
}

// ---- accounts ----

fn account_from_row(r: &Row<'_>) -> Result<Account> {
    let id: String = r.get(0)?;
    let role: String = r.get(3)?;
    let plan: String = r.get(5)?;
    let total_paid: String = r.get(11)?;
    let monthly_revenue: String = r.get(12)?;
    Ok(Account {
        name: r.get(1)?,
        email: r.get(2)?,
        role: role.parse::<Role>()?,
        is_active: r.get(4)?,
        plan_type: plan.parse::<PlanType>()?,
        trial_start_date: r.get(6)?,
        trial_end_date: r.get(7)?,
        subscription_start_date: r.get(8)?,
        last_payment_date: r.get(9)?,
        next_payment_date: r.get(10)?,
        total_paid: decimal_col(&total_paid, "accounts", &id)?,
        monthly_revenue: decimal_col(&monthly_revenue, "accounts", &id)?,
        is_trial_expired: r.get(13)?,
        created_at: r.get(14)?,
        id,
    })
}

pub fn insert_account(conn: &Connection, a: &Account) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO accounts({ACCOUNT_COLS}) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15)"),
        params![
            a.id,
            a.name,
            a.email,
            a.role.as_str(),
            a.is_active,
            a.plan_type.as_str(),
            a.trial_start_date,
            a.trial_end_date,
            a.subscription_start_date,
            a.last_payment_date,
            a.next_payment_date,
            a.total_paid.to_string(),
            a.monthly_revenue.to_string(),
            a.is_trial_expired,
            a.created_at,
        ],
    )
    .with_context(|| format!("Insert account '{}'", a.email))?;
    Ok(())
}

pub fn update_account(conn: &Connection, a: &Account) -> Result<()> {
    let n = conn.execute(
        "UPDATE accounts SET name=?2, email=?3, role=?4, is_active=?5, plan_type=?6,
            trial_start_date=?7, trial_end_date=?8, subscription_start_date=?9,
            last_payment_date=?10, next_payment_date=?11, total_paid=?12,
            monthly_revenue=?13, is_trial_expired=?14
         WHERE id=?1",
        params![
            a.id,
            a.name,
            a.email,
            a.role.as_str(),
            a.is_active,
            a.plan_type.as_str(),
            a.trial_start_date,
            a.trial_end_date,
            a.subscription_start_date,
            a.last_payment_date,
            a.next_payment_date,
            a.total_paid.to_string(),
            a.monthly_revenue.to_string(),
            a.is_trial_expired,
        ],
    )?;
    if n == 0 {
        return Err(Error::NotFound {
            kind: "Account",
            key: a.id.clone(),
        }
        .into());
    }
    Ok(())
}

pub fn find_account_by_email(conn: &Connection, email: &str) -> Result<Option<Account>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ACCOUNT_COLS} FROM accounts WHERE lower(email)=lower(?1)"
    ))?;
    let mut rows = stmt.query(params![email.trim()])?;
    match rows.next()? {
        Some(r) => Ok(Some(account_from_row(r)?)),
        None => Ok(None),
    }
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ACCOUNT_COLS} FROM accounts ORDER BY name, email"
    ))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(account_from_row(r)?);
    }
    Ok(out)
}

pub fn delete_account(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM accounts WHERE id=?1", params![id])?;
    Ok(())
}

// ---- transactions ----

fn transaction_from_row(r: &Row<'_>) -> Result<Transaction> {
    let id: String = r.get(0)?;
    let kind: String = r.get(1)?;
    let amount: String = r.get(3)?;
    let status: String = r.get(6)?;
    let method: Option<String> = r.get(7)?;
    let paid_on: Option<NaiveDate> = r.get(8)?;
    let frequency: Option<String> = r.get(11)?;
    let end_date: Option<NaiveDate> = r.get(12)?;

    let status = match (status.as_str(), method, paid_on) {
        ("pending", _, _) => TxStatus::Pending,
        ("overdue", _, _) => TxStatus::Overdue,
        ("paid", Some(payment_method), Some(payment_date)) => TxStatus::Paid(Payment {
            payment_method,
            payment_date,
        }),
        ("paid", _, _) => {
            return Err(Error::Corrupt {
                table: "transactions",
                id,
                reason: "paid without payment method/date".into(),
            }
            .into());
        }
        (other, _, _) => return Err(Error::invalid("status", other).into()),
    };
    let recurrence = match frequency {
        Some(f) => Some(Recurrence {
            frequency: f.parse::<Frequency>()?,
            end_date,
        }),
        None => None,
    };

    Ok(Transaction {
        kind: kind.parse::<TxKind>()?,
        description: r.get(2)?,
        amount: decimal_col(&amount, "transactions", &id)?,
        category: r.get(4)?,
        due_date: r.get(5)?,
        status,
        client: r.get(9)?,
        phone: r.get(10)?,
        recurrence,
        parent_transaction_id: r.get(13)?,
        owner_id: r.get(14)?,
        notes: r.get(15)?,
        id,
    })
}

pub fn insert_transaction(conn: &Connection, t: &Transaction) -> Result<()> {
    let payment = t.status.payment();
    conn.execute(
        &format!("INSERT INTO transactions({TX_COLS}) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16)"),
        params![
            t.id,
            t.kind.as_str(),
            t.description,
            t.amount.to_string(),
            t.category,
            t.due_date,
            t.status.as_str(),
            payment.map(|p| p.payment_method.as_str()),
            payment.map(|p| p.payment_date),
            t.client,
            t.phone,
            t.recurrence.map(|r| r.frequency.as_str()),
            t.recurrence.and_then(|r| r.end_date),
            t.parent_transaction_id,
            t.owner_id,
            t.notes,
        ],
    )
    .with_context(|| format!("Insert transaction '{}'", t.description))?;
    Ok(())
}

pub fn update_transaction(conn: &Connection, t: &Transaction) -> Result<()> {
    let payment = t.status.payment();
    let n = conn.execute(
        "UPDATE transactions SET kind=?2, description=?3, amount=?4, category=?5, due_date=?6,
            status=?7, payment_method=?8, payment_date=?9, client=?10, phone=?11,
            frequency=?12, recurring_end_date=?13, parent_transaction_id=?14, owner_id=?15,
            notes=?16
         WHERE id=?1",
        params![
            t.id,
            t.kind.as_str(),
            t.description,
            t.amount.to_string(),
            t.category,
            t.due_date,
            t.status.as_str(),
            payment.map(|p| p.payment_method.as_str()),
            payment.map(|p| p.payment_date),
            t.client,
            t.phone,
            t.recurrence.map(|r| r.frequency.as_str()),
            t.recurrence.and_then(|r| r.end_date),
            t.parent_transaction_id,
            t.owner_id,
            t.notes,
        ],
    )?;
    if n == 0 {
        return Err(Error::NotFound {
            kind: "Transaction",
            key: t.id.clone(),
        }
        .into());
    }
    Ok(())
}

pub fn get_transaction(conn: &Connection, id: &str) -> Result<Transaction> {
    let mut stmt = conn.prepare(&format!("SELECT {TX_COLS} FROM transactions WHERE id=?1"))?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => transaction_from_row(r),
        None => Err(Error::NotFound {
            kind: "Transaction",
            key: id.to_string(),
        }
        .into()),
    }
}

#[derive(Debug, Default, Clone)]
pub struct TxFilter {
    pub month: Option<String>,
    pub status: Option<String>,
    pub kind: Option<TxKind>,
    pub owner_id: Option<String>,
    pub limit: Option<usize>,
}

/// Transactions matching `filter`, most recent due date first.
pub fn list_transactions(conn: &Connection, filter: &TxFilter) -> Result<Vec<Transaction>> {
    let mut sql = format!("SELECT {TX_COLS} FROM transactions WHERE 1=1");
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = &filter.month {
        sql.push_str(" AND substr(due_date,1,7)=?");
        params_vec.push(month.clone());
    }
    if let Some(status) = &filter.status {
        sql.push_str(" AND status=?");
        params_vec.push(status.clone());
    }
    if let Some(kind) = filter.kind {
        sql.push_str(" AND kind=?");
        params_vec.push(kind.as_str().to_string());
    }
    if let Some(owner) = &filter.owner_id {
        sql.push_str(" AND owner_id=?");
        params_vec.push(owner.clone());
    }
    sql.push_str(" ORDER BY due_date DESC, created_at DESC, id");
    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(transaction_from_row(r)?);
    }
    Ok(out)
}

pub fn all_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    list_transactions(conn, &TxFilter::default())
}

/// Whether a chain already holds an occurrence due on `due_date`.
pub fn occurrence_exists(conn: &Connection, root_id: &str, due_date: NaiveDate) -> Result<bool> {
    let hit: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM transactions
             WHERE due_date=?2 AND (parent_transaction_id=?1 OR id=?1)
             LIMIT 1",
            params![root_id, due_date],
            |r| r.get(0),
        )
        .optional()?;
    Ok(hit.is_some())
}

/// Full identifiers starting with `prefix`.
pub fn transaction_ids_with_prefix(conn: &Connection, prefix: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT id FROM transactions WHERE substr(id, 1, length(?1)) = ?1 ORDER BY id",
    )?;
    let ids = stmt
        .query_map(params![prefix], |r| r.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ids)
}

pub fn delete_transaction(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    Ok(())
}

// ---- alerts ----

pub fn insert_alert(conn: &Connection, a: &NotificationAlert) -> Result<()> {
    conn.execute(
        "INSERT INTO alerts(id, transaction_id, kind, message, created_on, read)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            a.id,
            a.transaction_id,
            a.kind.as_str(),
            a.message,
            a.created_on,
            a.read
        ],
    )?;
    Ok(())
}

pub fn list_alerts(conn: &Connection, unread_only: bool) -> Result<Vec<NotificationAlert>> {
    let sql = if unread_only {
        "SELECT id, transaction_id, kind, message, created_on, read FROM alerts WHERE read=0 ORDER BY created_on DESC, kind"
    } else {
        "SELECT id, transaction_id, kind, message, created_on, read FROM alerts ORDER BY created_on DESC, kind"
    };
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let kind: String = r.get(2)?;
        out.push(NotificationAlert {
            id: r.get(0)?,
            transaction_id: r.get(1)?,
            kind: kind.parse::<AlertKind>()?,
            message: r.get(3)?,
            created_on: r.get(4)?,
            read: r.get(5)?,
        });
    }
    Ok(out)
}

/// Marks alerts read. `None` marks every alert. Returns the number changed.
pub fn mark_alerts_read(conn: &Connection, id_prefix: Option<&str>) -> Result<usize> {
    let n = match id_prefix {
        Some(p) => conn.execute(
            "UPDATE alerts SET read=1 WHERE read=0 AND substr(id, 1, length(?1)) = ?1",
            params![p],
        )?,
        None => conn.execute("UPDATE alerts SET read=1 WHERE read=0", [])?,
    };
    Ok(n)
}

// ---- goals ----

pub fn upsert_goal(conn: &Connection, g: &MonthlyGoal) -> Result<()> {
    conn.execute(
        "INSERT INTO goals(month, income_target, expense_limit, savings_target) VALUES (?1,?2,?3,?4)
         ON CONFLICT(month) DO UPDATE SET income_target=excluded.income_target,
            expense_limit=excluded.expense_limit, savings_target=excluded.savings_target",
        params![
            g.month,
            g.income_target.to_string(),
            g.expense_limit.to_string(),
            g.savings_target.to_string()
        ],
    )?;
    Ok(())
}

pub fn get_goal(conn: &Connection, month: &str) -> Result<Option<MonthlyGoal>> {
    let row: Option<(String, String, String)> = conn
        .query_row(
            "SELECT income_target, expense_limit, savings_target FROM goals WHERE month=?1",
            params![month],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    let Some((income, expense, savings)) = row else {
        return Ok(None);
    };
    Ok(Some(MonthlyGoal {
        month: month.to_string(),
        income_target: decimal_col(&income, "goals", month)?,
        expense_limit: decimal_col(&expense, "goals", month)?,
        savings_target: decimal_col(&savings, "goals", month)?,
    }))
}

// ---- settings ----

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn get_currency(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "currency")?.unwrap_or_else(|| "USD".to_string()))
}

pub fn load_alert_settings(conn: &Connection) -> Result<AlertSettings> {
    let mut s = AlertSettings::default();
    if let Some(v) = get_setting(conn, "alerts.days_before_due")? {
        s.days_before_due = v
            .parse()
            .with_context(|| format!("Invalid alerts.days_before_due '{}'", v))?;
    }
    if let Some(v) = get_setting(conn, "alerts.enable_due")? {
        s.enable_due_alerts = v == "true";
    }
    if let Some(v) = get_setting(conn, "alerts.enable_overdue")? {
        s.enable_overdue_alerts = v == "true";
    }
    Ok(s)
}

pub fn save_alert_settings(conn: &Connection, s: &AlertSettings) -> Result<()> {
    set_setting(conn, "alerts.days_before_due", &s.days_before_due.to_string())?;
    set_setting(conn, "alerts.enable_due", &s.enable_due_alerts.to_string())?;
    set_setting(conn, "alerts.enable_overdue", &s.enable_overdue_alerts.to_string())?;
    Ok(())
}
