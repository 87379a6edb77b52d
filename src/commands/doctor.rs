// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};

/// Rows of (issue, detail) for records that break the model's invariants.
/// Date-dependent checks compare against `today`, bound as `?1`.
pub fn check(conn: &Connection, today: NaiveDate) -> Result<Vec<Vec<String>>> {
    let today = today.to_string();
    let mut rows = Vec::new();
    let mut push_all = |issue: &str, sql: &str| -> Result<()> {
        let mut stmt = conn.prepare(sql)?;
        let mut cur = if stmt.parameter_count() == 0 {
            stmt.query([])?
        } else {
            stmt.query(params![today])?
        };
        while let Some(r) = cur.next()? {
            let detail: String = r.get(0)?;
            rows.push(vec![issue.to_string(), detail]);
        }
        Ok(())
    };

    // 1) Plan fields out of step with the plan type
    push_all(
        "trial_with_subscription_dates",
        "SELECT email FROM accounts WHERE plan_type='trial'
         AND (subscription_start_date IS NOT NULL OR last_payment_date IS NOT NULL
              OR next_payment_date IS NOT NULL)",
    )?;
    push_all(
        "subscription_with_trial_dates",
        "SELECT email FROM accounts WHERE plan_type!='trial'
         AND (trial_start_date IS NOT NULL OR trial_end_date IS NOT NULL)",
    )?;
    push_all(
        "subscription_without_next_payment",
        "SELECT email FROM accounts WHERE plan_type!='trial' AND next_payment_date IS NULL",
    )?;

    // 2) Transactions
    push_all(
        "paid_without_payment",
        "SELECT id FROM transactions WHERE status='paid'
         AND (payment_method IS NULL OR payment_date IS NULL)",
    )?;
    push_all(
        "end_date_without_frequency",
        "SELECT id FROM transactions WHERE frequency IS NULL AND recurring_end_date IS NOT NULL",
    )?;
    push_all(
        "orphan_occurrence",
        "SELECT t.id FROM transactions t WHERE t.parent_transaction_id IS NOT NULL
         AND NOT EXISTS (SELECT 1 FROM transactions p WHERE p.id=t.parent_transaction_id)",
    )?;
    push_all(
        "non_positive_amount",
        "SELECT id FROM transactions WHERE CAST(amount AS REAL) <= 0",
    )?;
    push_all(
        "pending_past_due",
        "SELECT id FROM transactions WHERE status='pending' AND due_date < ?1",
    )?;

    Ok(rows)
}

pub fn handle(conn: &Connection, today: NaiveDate) -> Result<()> {
    let rows = check(conn, today)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
