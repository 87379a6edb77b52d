// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::{recurring, transactions as rules};
use crate::models::{Frequency, Recurrence, Transaction, TxKind, TxStatus};
use crate::store::{self, TxFilter};
use crate::utils::{
    account_by_email, id_for_transaction, maybe_print_json, parse_amount, parse_date,
    parse_month, pretty_table, short_id, today_from,
};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("recur", sub)) => {
            recur(conn, today_from(sub)?)?;
        }
        Some(("refresh", sub)) => {
            refresh(conn, today_from(sub)?)?;
        }
        _ => {}
    }
    Ok(())
}

fn opt_trimmed(sub: &clap::ArgMatches, key: &str) -> Option<String> {
    sub.get_one::<String>(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind = sub.get_one::<String>("type").unwrap().parse::<TxKind>()?;
    let description = sub.get_one::<String>("description").unwrap().trim().to_string();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let due_date = parse_date(sub.get_one::<String>("due").unwrap())?;
    let recurrence = match sub.get_one::<String>("frequency") {
        Some(f) => Some(Recurrence {
            frequency: f.parse::<Frequency>()?,
            end_date: sub
                .get_one::<String>("until")
                .map(|s| parse_date(s))
                .transpose()?,
        }),
        None => None,
    };
    if let Err(e) = rules::check_recurrence(due_date, recurrence) {
        warn!(due = %due_date, "recurrence ends on or before the first due date");
        return Err(e.into());
    }
    let owner_id = match sub.get_one::<String>("owner") {
        Some(email) => Some(account_by_email(conn, email)?.id),
        None => None,
    };

    let tx = Transaction {
        id: Uuid::new_v4().to_string(),
        kind,
        description,
        amount,
        category,
        due_date,
        status: TxStatus::Pending,
        client: opt_trimmed(sub, "client"),
        phone: opt_trimmed(sub, "phone"),
        recurrence,
        parent_transaction_id: None,
        owner_id,
        notes: opt_trimmed(sub, "note"),
    };
    store::insert_transaction(conn, &tx)?;
    info!(id = %tx.id, kind = %tx.kind, amount = %tx.amount, "transaction added");
    println!(
        "Recorded {} '{}' of {} due {} [{}]",
        tx.kind,
        tx.description,
        tx.amount,
        tx.due_date,
        short_id(&tx.id)
    );
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let changes = rules::TxEdit {
        description: opt_trimmed(sub, "description"),
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_amount(s))
            .transpose()?,
        category: opt_trimmed(sub, "category"),
        due_date: sub
            .get_one::<String>("due")
            .map(|s| parse_date(s))
            .transpose()?,
        client: opt_trimmed(sub, "client"),
        phone: opt_trimmed(sub, "phone"),
        frequency: sub
            .get_one::<String>("frequency")
            .map(|f| f.parse::<Frequency>())
            .transpose()?,
        end_date: sub
            .get_one::<String>("until")
            .map(|s| parse_date(s))
            .transpose()?,
        notes: opt_trimmed(sub, "note"),
    };

    let db = conn.transaction()?;
    let id = id_for_transaction(&db, sub.get_one::<String>("id").unwrap())?;
    let updated = rules::apply_edit(&store::get_transaction(&db, &id)?, changes)?;
    store::update_transaction(&db, &updated)?;
    db.commit()?;

    info!(id = %updated.id, "transaction edited");
    println!(
        "Updated '{}' ({}) due {} [{}]",
        updated.description,
        updated.amount,
        updated.due_date,
        short_id(&updated.id)
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub due_date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub status: String,
    pub payment_method: String,
    pub recurrence: String,
    pub parent: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        TransactionRow {
            id: t.id.clone(),
            due_date: t.due_date.to_string(),
            kind: t.kind.to_string(),
            description: t.description.clone(),
            category: t.category.clone(),
            amount: format!("{:.2}", t.amount),
            status: t.status.to_string(),
            payment_method: t
                .status
                .payment()
                .map(|p| p.payment_method.clone())
                .unwrap_or_default(),
            recurrence: t
                .recurrence
                .map(|r| match r.end_date {
                    Some(end) => format!("{} until {}", r.frequency, end),
                    None => r.frequency.to_string(),
                })
                .unwrap_or_default(),
            parent: t.parent_transaction_id.clone().unwrap_or_default(),
        }
    }
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let filter = TxFilter {
        month: sub
            .get_one::<String>("month")
            .map(|m| parse_month(m))
            .transpose()?,
        status: sub.get_one::<String>("status").cloned(),
        kind: sub
            .get_one::<String>("type")
            .map(|k| k.parse::<TxKind>())
            .transpose()?,
        owner_id: match sub.get_one::<String>("owner") {
            Some(email) => Some(account_by_email(conn, email)?.id),
            None => None,
        },
        limit: sub.get_one::<usize>("limit").copied(),
    };
    Ok(store::list_transactions(conn, &filter)?
        .iter()
        .map(TransactionRow::from)
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    short_id(&r.id).to_string(),
                    r.due_date.clone(),
                    r.kind.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.status.clone(),
                    r.recurrence.clone(),
                    short_id(&r.parent).to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID", "Due", "Type", "Description", "Category", "Amount", "Status", "Repeats",
                    "Parent",
                ],
                rows,
            )
        );
    }
    Ok(())
}

fn pay(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let method = sub.get_one::<String>("method").unwrap();
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now().date_naive(),
    };

    let db = conn.transaction()?;
    let id = id_for_transaction(&db, sub.get_one::<String>("id").unwrap())?;
    let settled = rules::settle(&store::get_transaction(&db, &id)?, method, date)?;
    store::update_transaction(&db, &settled)?;
    db.commit()?;

    info!(id = %settled.id, method = %method.trim(), "transaction paid");
    println!(
        "Paid '{}' ({}) on {} via {}",
        settled.description,
        settled.amount,
        date,
        method.trim()
    );
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = id_for_transaction(conn, sub.get_one::<String>("id").unwrap())?;
    store::delete_transaction(conn, &id)?;
    info!(%id, "transaction removed");
    println!("Removed transaction {}", short_id(&id));
    Ok(())
}

/// Stores the next occurrence of every settled recurring transaction that is
/// past due on `today`, skipping occurrences the chain already holds.
pub fn recur(conn: &mut Connection, today: chrono::NaiveDate) -> Result<Vec<Transaction>> {
    let db = conn.transaction()?;
    let all = store::all_transactions(&db)?;
    let mut created = Vec::new();
    for next in recurring::generate_due(&all, today) {
        let root = next.root_id().to_string();
        if store::occurrence_exists(&db, &root, next.due_date)? {
            debug!(%root, due = %next.due_date, "occurrence already stored");
            continue;
        }
        store::insert_transaction(&db, &next)?;
        created.push(next);
    }
    db.commit()?;

    info!(count = created.len(), %today, "recurring occurrences generated");
    for t in &created {
        println!(
            "Scheduled '{}' ({}) for {} [{}]",
            t.description,
            t.amount,
            t.due_date,
            short_id(&t.id)
        );
    }
    if created.is_empty() {
        println!("No new occurrences");
    }
    Ok(created)
}

/// Switches pending transactions past their due date to overdue.
pub fn refresh(conn: &mut Connection, today: chrono::NaiveDate) -> Result<usize> {
    let db = conn.transaction()?;
    let all = store::all_transactions(&db)?;
    let changed = rules::refresh_overdue(&all, today);
    for t in &changed {
        store::update_transaction(&db, t)?;
    }
    db.commit()?;
    info!(count = changed.len(), %today, "overdue statuses refreshed");
    println!("{} transaction(s) marked overdue", changed.len());
    Ok(changed.len())
}
