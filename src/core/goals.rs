// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{MonthlyGoal, Transaction, TxKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub savings: Decimal,
    pub income_pct: Decimal,
    pub expense_pct: Decimal,
    pub savings_pct: Decimal,
    pub expense_exceeded: bool,
}

/// Sums of the transactions due in the goal's month against its targets.
pub fn progress(goal: &MonthlyGoal, txs: &[Transaction]) -> GoalProgress {
    let (income, expense) = month_totals(txs, &goal.month);
    let savings = income - expense;
    GoalProgress {
        month: goal.month.clone(),
        income,
        expense,
        savings,
        income_pct: pct(income, goal.income_target),
        expense_pct: pct(expense, goal.expense_limit),
        savings_pct: pct(savings, goal.savings_target),
        expense_exceeded: !goal.expense_limit.is_zero() && expense > goal.expense_limit,
    }
}

/// (income, expense) totals of transactions due in `month` (YYYY-MM).
pub fn month_totals(txs: &[Transaction], month: &str) -> (Decimal, Decimal) {
    txs.iter()
        .filter(|t| t.due_date.format("%Y-%m").to_string() == month)
        .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), t| match t.kind {
            TxKind::Income => (inc + t.amount, exp),
            TxKind::Expense => (inc, exp + t.amount),
        })
}

fn pct(actual: Decimal, target: Decimal) -> Decimal {
    if target.is_zero() {
        return Decimal::ZERO;
    }
    (actual * Decimal::ONE_HUNDRED / target).round_dp(1)
}
