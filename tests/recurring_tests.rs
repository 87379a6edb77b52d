// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashbook::core::recurring::{generate_due, next_occurrence, step};
use cashbook::models::{
    Frequency, Payment, Recurrence, Transaction, TxKind, TxStatus,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn paid() -> TxStatus {
    TxStatus::Paid(Payment {
        payment_method: "transfer".into(),
        payment_date: d("2025-01-20"),
    })
}

fn rent(due: &str, frequency: Frequency, end: Option<&str>) -> Transaction {
    Transaction {
        id: "root-1".into(),
        kind: TxKind::Expense,
        description: "Office rent".into(),
        amount: Decimal::new(120000, 2),
        category: "Rent".into(),
        due_date: d(due),
        status: paid(),
        client: None,
        phone: None,
        recurrence: Some(Recurrence {
            frequency,
            end_date: end.map(d),
        }),
        parent_transaction_id: None,
        owner_id: None,
        notes: None,
    }
}

#[test]
fn monthly_occurrence_is_pending_next_month() {
    let a = rent("2025-01-20", Frequency::Monthly, None);
    let b = next_occurrence(&a, d("2025-02-01")).unwrap();
    assert_eq!(b.due_date, d("2025-02-20"));
    assert_eq!(b.status, TxStatus::Pending);
    assert_ne!(b.id, a.id);
    assert_eq!(b.parent_transaction_id.as_deref(), Some("root-1"));
    assert_eq!(b.description, a.description);
    assert_eq!(b.amount, a.amount);
    assert_eq!(b.category, a.category);
    assert_eq!(b.kind, a.kind);
    assert_eq!(b.recurrence, a.recurrence);
}

#[test]
fn end_date_is_exclusive() {
    let before = rent("2025-01-20", Frequency::Monthly, Some("2025-02-15"));
    assert!(next_occurrence(&before, d("2025-02-01")).is_none());

    let on = rent("2025-01-20", Frequency::Monthly, Some("2025-02-20"));
    assert!(next_occurrence(&on, d("2025-02-01")).is_none());

    let after = rent("2025-01-20", Frequency::Monthly, Some("2025-02-21"));
    assert_eq!(
        next_occurrence(&after, d("2025-02-01")).unwrap().due_date,
        d("2025-02-20")
    );
}

#[test]
fn chain_points_at_root() {
    let a = rent("2025-01-20", Frequency::Monthly, None);
    let mut b = next_occurrence(&a, d("2025-02-01")).unwrap();
    b.status = paid();
    let c = next_occurrence(&b, d("2025-03-01")).unwrap();
    assert_eq!(b.parent_transaction_id.as_deref(), Some("root-1"));
    assert_eq!(c.parent_transaction_id.as_deref(), Some("root-1"));
    assert_eq!(c.due_date, d("2025-03-20"));
}

#[test]
fn month_steps_clamp_to_month_end() {
    assert_eq!(step(d("2025-01-31"), Frequency::Monthly), Some(d("2025-02-28")));
    assert_eq!(step(d("2024-01-31"), Frequency::Monthly), Some(d("2024-02-29")));
    assert_eq!(step(d("2025-11-30"), Frequency::Quarterly), Some(d("2026-02-28")));
    assert_eq!(step(d("2024-02-29"), Frequency::Yearly), Some(d("2025-02-28")));
    assert_eq!(step(d("2025-12-29"), Frequency::Weekly), Some(d("2026-01-05")));
    assert_eq!(step(d("2025-03-15"), Frequency::Quarterly), Some(d("2025-06-15")));
}

#[test]
fn only_settled_past_due_transactions_roll() {
    let mut pending = rent("2025-01-20", Frequency::Monthly, None);
    pending.status = TxStatus::Pending;
    assert!(next_occurrence(&pending, d("2025-02-01")).is_none());

    let due_today = rent("2025-02-01", Frequency::Monthly, None);
    assert!(next_occurrence(&due_today, d("2025-02-01")).is_none());

    let mut one_off = rent("2025-01-20", Frequency::Monthly, None);
    one_off.recurrence = None;
    assert!(next_occurrence(&one_off, d("2025-02-01")).is_none());
}

#[test]
fn generate_due_is_restartable() {
    let mut weekly = rent("2025-01-27", Frequency::Weekly, None);
    weekly.id = "root-2".into();
    let mut future = rent("2025-03-01", Frequency::Monthly, None);
    future.id = "root-3".into();
    let mut open = rent("2025-01-05", Frequency::Yearly, None);
    open.id = "root-4".into();
    open.status = TxStatus::Overdue;
    let txs = vec![
        rent("2025-01-20", Frequency::Monthly, None),
        weekly,
        future,
        open,
    ];

    let first: Vec<Transaction> = generate_due(&txs, d("2025-02-01")).collect();
    let second: Vec<Transaction> = generate_due(&txs, d("2025-02-01")).collect();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(first[0].due_date, second[0].due_date);
    assert_ne!(first[0].id, second[0].id);
    assert_eq!(first[1].due_date, d("2025-02-03"));
    assert_eq!(first[1].parent_transaction_id.as_deref(), Some("root-2"));
}
