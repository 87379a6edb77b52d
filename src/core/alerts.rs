// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{AlertKind, AlertSettings, NotificationAlert, Transaction};

/// Alerts that should be raised on `today` and are not in `existing` yet.
///
/// At most one alert per (transaction, kind) is ever returned, counting both
/// `existing` and the alerts produced in this pass.
pub fn derive_alerts(
    txs: &[Transaction],
    existing: &[NotificationAlert],
    settings: &AlertSettings,
    today: NaiveDate,
) -> Vec<NotificationAlert> {
    let mut seen: HashSet<(&str, AlertKind)> = existing
        .iter()
        .map(|a| (a.transaction_id.as_str(), a.kind))
        .collect();

    let mut out = Vec::new();
    for tx in txs.iter().filter(|t| !t.status.is_paid()) {
        let days = (tx.due_date - today).num_days();
        let kind = if days < 0 {
            settings.enable_overdue_alerts.then_some(AlertKind::Overdue)
        } else if days <= settings.days_before_due {
            settings.enable_due_alerts.then_some(AlertKind::DueSoon)
        } else {
            None
        };
        let Some(kind) = kind else { continue };
        if !seen.insert((tx.id.as_str(), kind)) {
            continue;
        }
        out.push(NotificationAlert {
            id: Uuid::new_v4().to_string(),
            transaction_id: tx.id.clone(),
            kind,
            message: alert_message(tx, kind, days),
            created_on: today,
            read: false,
        });
    }
    out
}

fn alert_message(tx: &Transaction, kind: AlertKind, days: i64) -> String {
    let what = format!("{} '{}' ({})", tx.kind, tx.description, tx.amount.round_dp(2));
    match kind {
        AlertKind::DueSoon if days == 0 => format!("{} is due today", what),
        AlertKind::DueSoon => format!("{} is due in {} day(s) on {}", what, days, tx.due_date),
        AlertKind::Overdue => format!("{} is {} day(s) overdue since {}", what, -days, tx.due_date),
    }
}
