// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashbook::core::plans::{
    change_plan, is_payment_due, is_trial_expired, record_payment, refresh_trial_flag,
    set_active, sign_up, trial_days_left,
};
use cashbook::core::reports::revenue_summary;
use cashbook::models::{Account, PlanType, Role};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn fresh() -> Account {
    sign_up("Ana", "ana@example.com", Role::User, ts("2025-01-01T09:00:00Z"))
}

#[test]
fn sign_up_starts_seven_day_trial() {
    let a = fresh();
    assert_eq!(a.plan_type, PlanType::Trial);
    assert!(a.is_active);
    assert_eq!(a.trial_start_date, Some(ts("2025-01-01T09:00:00Z")));
    assert_eq!(a.trial_end_date, Some(ts("2025-01-08T09:00:00Z")));
    assert!(a.subscription_start_date.is_none());
    assert!(a.next_payment_date.is_none());
    assert!(a.total_paid.is_zero());
}

#[test]
fn change_plan_always_lands_on_target() {
    let now = ts("2025-03-10T12:00:00Z");
    for from in PlanType::ALL {
        let start = change_plan(&fresh(), from, ts("2025-02-01T00:00:00Z"));
        for to in PlanType::ALL {
            let a = change_plan(&start, to, now);
            assert_eq!(a.plan_type, to);
            assert!(a.is_active);
            assert!(!a.is_trial_expired);
            if to == PlanType::Trial {
                assert_eq!(a.trial_start_date, Some(now));
                assert_eq!(a.trial_end_date, Some(now + Duration::days(7)));
                assert!(a.subscription_start_date.is_none());
                assert!(a.last_payment_date.is_none());
                assert!(a.next_payment_date.is_none());
                assert!(a.monthly_revenue.is_zero());
            } else {
                assert!(a.trial_start_date.is_none());
                assert!(a.trial_end_date.is_none());
                assert_eq!(a.subscription_start_date, Some(now));
                assert_eq!(a.last_payment_date, Some(now));
            }
        }
    }
}

#[test]
fn billing_cycle_lengths_are_exact() {
    let now = ts("2025-01-31T23:59:59Z");
    for (plan, days) in [
        (PlanType::Basic, 30),
        (PlanType::Premium, 90),
        (PlanType::Annual, 365),
    ] {
        let a = change_plan(&fresh(), plan, now);
        assert_eq!(a.next_payment_date.unwrap() - now, Duration::days(days));
    }
}

#[test]
fn monthly_revenue_is_normalized() {
    let now = ts("2025-01-01T00:00:00Z");
    let mrr = |p| change_plan(&fresh(), p, now).monthly_revenue;
    assert_eq!(mrr(PlanType::Basic), Decimal::new(1990, 2));
    assert_eq!(mrr(PlanType::Premium), Decimal::new(1790, 2));
    assert_eq!(mrr(PlanType::Annual), Decimal::new(1490, 2));
    assert_eq!(mrr(PlanType::Trial), Decimal::ZERO);
}

#[test]
fn change_plan_keeps_total_paid() {
    let mut a = fresh();
    a.total_paid = Decimal::new(5000, 2);
    let b = change_plan(&a, PlanType::Annual, ts("2025-01-02T00:00:00Z"));
    assert_eq!(b.total_paid, Decimal::new(5000, 2));
}

#[test]
fn trial_expires_strictly_after_end() {
    let a = fresh();
    assert!(!is_trial_expired(&a, ts("2025-01-08T09:00:00Z")));
    assert!(is_trial_expired(&a, ts("2025-01-08T09:00:01Z")));

    let paid = change_plan(&a, PlanType::Basic, ts("2025-01-02T00:00:00Z"));
    assert!(!is_trial_expired(&paid, ts("2030-01-01T00:00:00Z")));

    let mut no_end = fresh();
    no_end.trial_end_date = None;
    assert!(!is_trial_expired(&no_end, ts("2030-01-01T00:00:00Z")));
    assert_eq!(trial_days_left(&no_end, ts("2025-01-02T00:00:00Z")), 0);
}

#[test]
fn trial_days_left_rounds_up_and_floors_at_zero() {
    let a = fresh();
    assert_eq!(trial_days_left(&a, ts("2025-01-01T09:00:00Z")), 7);
    assert_eq!(trial_days_left(&a, ts("2025-01-01T10:00:00Z")), 7);
    assert_eq!(trial_days_left(&a, ts("2025-01-07T09:00:00Z")), 1);
    assert_eq!(trial_days_left(&a, ts("2025-01-07T09:00:01Z")), 1);
    assert_eq!(trial_days_left(&a, ts("2025-01-08T09:00:00Z")), 0);
    assert_eq!(trial_days_left(&a, ts("2025-02-01T00:00:00Z")), 0);

    let basic = change_plan(&a, PlanType::Basic, ts("2025-01-02T00:00:00Z"));
    assert_eq!(trial_days_left(&basic, ts("2025-01-02T00:00:00Z")), 0);
}

#[test]
fn trial_days_left_never_increases() {
    let a = fresh();
    let mut now = ts("2024-12-30T00:00:00Z");
    let mut last = i64::MAX;
    for _ in 0..(24 * 12) {
        let left = trial_days_left(&a, now);
        assert!(left <= last);
        assert!(left >= 0);
        last = left;
        now += Duration::hours(1);
    }
    assert_eq!(last, 0);
}

#[test]
fn refresh_trial_flag_caches_expiry() {
    let a = fresh();
    let r = refresh_trial_flag(&a, ts("2025-01-20T00:00:00Z"));
    assert!(r.is_trial_expired);
    assert_eq!(r.plan_type, PlanType::Trial);
}

#[test]
fn payments_roll_billing_forward() {
    let start = ts("2025-01-01T00:00:00Z");
    let a = change_plan(&fresh(), PlanType::Basic, start);
    assert!(!is_payment_due(&a, ts("2025-01-30T23:59:59Z")));
    assert!(is_payment_due(&a, ts("2025-01-31T00:00:00Z")));

    let paid_at = ts("2025-02-01T00:00:00Z");
    let b = record_payment(&a, paid_at);
    assert_eq!(b.total_paid, Decimal::new(1990, 2));
    assert_eq!(b.last_payment_date, Some(paid_at));
    assert_eq!(b.next_payment_date, Some(paid_at + Duration::days(30)));
    assert_eq!(b.subscription_start_date, Some(start));

    let trial = fresh();
    assert_eq!(record_payment(&trial, paid_at), trial);
    assert!(!is_payment_due(&trial, paid_at));
}

#[test]
fn deactivation_keeps_plan() {
    let a = change_plan(&fresh(), PlanType::Premium, ts("2025-01-01T00:00:00Z"));
    let off = set_active(&a, false);
    assert!(!off.is_active);
    assert_eq!(off.plan_type, PlanType::Premium);
    assert!(!is_payment_due(&off, ts("2026-01-01T00:00:00Z")));
}

#[test]
fn revenue_summary_counts_active_mrr() {
    let now = ts("2025-01-20T00:00:00Z");
    let basic = change_plan(&fresh(), PlanType::Basic, ts("2025-01-02T00:00:00Z"));
    let annual = change_plan(&fresh(), PlanType::Annual, ts("2025-01-02T00:00:00Z"));
    let inactive = set_active(&basic, false);
    let stale_trial = fresh();

    let s = revenue_summary(&[basic, annual, inactive, stale_trial], now);
    assert_eq!(s.active, 3);
    assert_eq!(s.expired_trials, 1);
    assert_eq!(s.mrr, Decimal::new(3480, 2));
    let basic_count = s
        .plans
        .iter()
        .find(|p| p.plan == PlanType::Basic)
        .unwrap()
        .accounts;
    assert_eq!(basic_count, 2);
}
