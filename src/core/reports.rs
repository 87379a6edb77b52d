// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::goals::month_totals;
use crate::core::plans::is_trial_expired;
use crate::models::{Account, PlanType, Transaction, TxStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub paid_count: usize,
    pub pending_count: usize,
    pub overdue_count: usize,
    pub paid_total: Decimal,
    pub open_total: Decimal,
}

pub fn month_summary(txs: &[Transaction], month: &str) -> MonthSummary {
    let (income, expense) = month_totals(txs, month);
    let mut s = MonthSummary {
        month: month.to_string(),
        income,
        expense,
        net: income - expense,
        paid_count: 0,
        pending_count: 0,
        overdue_count: 0,
        paid_total: Decimal::ZERO,
        open_total: Decimal::ZERO,
    };
    for t in txs
        .iter()
        .filter(|t| t.due_date.format("%Y-%m").to_string() == month)
    {
        match t.status {
            TxStatus::Paid(_) => {
                s.paid_count += 1;
                s.paid_total += t.amount;
            }
            TxStatus::Pending => {
                s.pending_count += 1;
                s.open_total += t.amount;
            }
            TxStatus::Overdue => {
                s.overdue_count += 1;
                s.open_total += t.amount;
            }
        }
    }
    s
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanCount {
    pub plan: PlanType,
    pub accounts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub plans: Vec<PlanCount>,
    pub active: usize,
    pub expired_trials: usize,
    /// Sum of `monthly_revenue` over active accounts.
    pub mrr: Decimal,
    pub total_paid: Decimal,
}

pub fn revenue_summary(accounts: &[Account], now: DateTime<Utc>) -> RevenueSummary {
    let plans = PlanType::ALL
        .iter()
        .map(|&plan| PlanCount {
            plan,
            accounts: accounts.iter().filter(|a| a.plan_type == plan).count(),
        })
        .collect();
    let active: Vec<&Account> = accounts.iter().filter(|a| a.is_active).collect();
    RevenueSummary {
        plans,
        active: active.len(),
        expired_trials: accounts
            .iter()
            .filter(|a| is_trial_expired(a, now))
            .count(),
        mrr: active.iter().map(|a| a.monthly_revenue).sum(),
        total_paid: accounts.iter().map(|a| a.total_paid).sum(),
    }
}
