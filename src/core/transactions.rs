// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::{Error, Result};
use crate::models::{Frequency, Payment, Recurrence, Transaction, TxStatus};

/// Field changes for an existing transaction. `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct TxEdit {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub client: Option<String>,
    pub phone: Option<String>,
    pub frequency: Option<Frequency>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Rejects an end date that leaves the recurrence without any occurrence.
pub fn check_recurrence(due_date: NaiveDate, recurrence: Option<Recurrence>) -> Result<()> {
    match recurrence.and_then(|r| r.end_date) {
        Some(end) if end <= due_date => Err(Error::invalid("until", &end.to_string())),
        _ => Ok(()),
    }
}

/// Applies `edit` on top of `tx`. Status and chain links are left alone.
pub fn apply_edit(tx: &Transaction, edit: TxEdit) -> Result<Transaction> {
    if let Some(amount) = edit.amount {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(amount.to_string()));
        }
    }
    let recurrence = match (edit.frequency, tx.recurrence) {
        (Some(frequency), current) => Some(Recurrence {
            frequency,
            end_date: edit.end_date.or(current.and_then(|r| r.end_date)),
        }),
        (None, Some(current)) => Some(Recurrence {
            end_date: edit.end_date.or(current.end_date),
            ..current
        }),
        (None, None) => match edit.end_date {
            Some(end) => return Err(Error::invalid("until", &end.to_string())),
            None => None,
        },
    };
    let out = Transaction {
        description: edit.description.unwrap_or_else(|| tx.description.clone()),
        amount: edit.amount.unwrap_or(tx.amount),
        category: edit.category.unwrap_or_else(|| tx.category.clone()),
        due_date: edit.due_date.unwrap_or(tx.due_date),
        client: edit.client.or_else(|| tx.client.clone()),
        phone: edit.phone.or_else(|| tx.phone.clone()),
        notes: edit.notes.or_else(|| tx.notes.clone()),
        recurrence,
        ..tx.clone()
    };
    check_recurrence(out.due_date, out.recurrence)?;
    Ok(out)
}

/// Marks `tx` as paid with the given method on `date`.
pub fn settle(tx: &Transaction, method: &str, date: NaiveDate) -> Result<Transaction> {
    if tx.status.is_paid() {
        return Err(Error::AlreadyPaid(tx.id.clone()));
    }
    let method = method.trim();
    if method.is_empty() {
        return Err(Error::invalid("payment method", method));
    }
    Ok(Transaction {
        status: TxStatus::Paid(Payment {
            payment_method: method.to_string(),
            payment_date: date,
        }),
        ..tx.clone()
    })
}

/// Pending transactions whose due date has passed, switched to overdue.
pub fn refresh_overdue(txs: &[Transaction], today: NaiveDate) -> Vec<Transaction> {
    txs.iter()
        .filter(|t| t.status == TxStatus::Pending && t.due_date < today)
        .map(|t| Transaction {
            status: TxStatus::Overdue,
            ..t.clone()
        })
        .collect()
}
