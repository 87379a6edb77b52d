// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Next-occurrence generation for recurring transactions.
//!
//! Month based steps clamp to the last day of the target month, so
//! Jan 31 + 1 month is Feb 28 (or 29). Each step starts from the current
//! occurrence's own due date. A recurrence end date is exclusive.

use chrono::{Days, Months, NaiveDate};
use uuid::Uuid;

use crate::models::{Frequency, Transaction, TxStatus};

/// Due date one `frequency` step after `date`.
pub fn step(date: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    match frequency {
        Frequency::Weekly => date.checked_add_days(Days::new(7)),
        Frequency::Monthly => date.checked_add_months(Months::new(1)),
        Frequency::Quarterly => date.checked_add_months(Months::new(3)),
        Frequency::Yearly => date.checked_add_months(Months::new(12)),
    }
}

/// Recurring, paid and past due on `today`.
pub fn is_rollover_candidate(tx: &Transaction, today: NaiveDate) -> bool {
    tx.is_recurring() && tx.status.is_paid() && tx.due_date < today
}

/// The occurrence that follows `tx`, or `None` once the recurrence has ended.
pub fn next_occurrence(tx: &Transaction, today: NaiveDate) -> Option<Transaction> {
    if !is_rollover_candidate(tx, today) {
        return None;
    }
    let recurrence = tx.recurrence?;
    let due_date = step(tx.due_date, recurrence.frequency)?;
    if recurrence.end_date.is_some_and(|end| due_date >= end) {
        return None;
    }

    Some(Transaction {
        id: Uuid::new_v4().to_string(),
        due_date,
        status: TxStatus::Pending,
        parent_transaction_id: Some(tx.root_id().to_string()),
        ..tx.clone()
    })
}

/// Next occurrences for every candidate in `txs`.
///
/// Recomputed from scratch on each call and not deduplicated against
/// occurrences generated earlier: callers must skip what they already stored.
pub fn generate_due<'a>(
    txs: &'a [Transaction],
    today: NaiveDate,
) -> impl Iterator<Item = Transaction> + 'a {
    txs.iter().filter_map(move |tx| next_occurrence(tx, today))
}
