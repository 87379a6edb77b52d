// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Subscription lifecycle: plan transitions, trial windows and billing dates.
//!
//! Every function here is pure. Callers load an [`Account`], pass it through
//! one of these transitions and persist the returned record as a whole.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Account, PlanType, Role};

pub const TRIAL_DAYS: i64 = 7;

const MS_PER_DAY: i64 = 86_400_000;

impl PlanType {
    /// Length of one billing cycle. The trial is never billed.
    pub fn cycle(self) -> Option<Duration> {
        match self {
            PlanType::Trial => None,
            PlanType::Basic => Some(Duration::days(30)),
            PlanType::Premium => Some(Duration::days(90)),
            PlanType::Annual => Some(Duration::days(365)),
        }
    }

    /// Amount charged once per cycle.
    pub fn cycle_price(self) -> Decimal {
        match self {
            PlanType::Trial => Decimal::ZERO,
            PlanType::Basic => Decimal::new(1990, 2),
            PlanType::Premium => Decimal::new(5370, 2),
            PlanType::Annual => Decimal::new(17880, 2),
        }
    }

    /// Cycle price normalized to one month.
    pub fn monthly_revenue(self) -> Decimal {
        let price = self.cycle_price();
        let monthly = match self {
            PlanType::Trial => Decimal::ZERO,
            PlanType::Basic => price,
            PlanType::Premium => price / Decimal::from(3),
            PlanType::Annual => price / Decimal::from(12),
        };
        monthly.round_dp(2)
    }
}

/// New account at sign-up: active, on a fresh trial window.
pub fn sign_up(name: &str, email: &str, role: Role, now: DateTime<Utc>) -> Account {
    Account {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        is_active: true,
        plan_type: PlanType::Trial,
        trial_start_date: Some(now),
        trial_end_date: Some(now + Duration::days(TRIAL_DAYS)),
        subscription_start_date: None,
        last_payment_date: None,
        next_payment_date: None,
        total_paid: Decimal::ZERO,
        monthly_revenue: Decimal::ZERO,
        is_trial_expired: false,
        created_at: now,
    }
}

/// Moves `account` onto `plan`, resetting every plan-dependent field.
///
/// Any plan may move to any other, including itself (which restarts the
/// trial window or the billing cycle). `total_paid` is left untouched.
pub fn change_plan(account: &Account, plan: PlanType, now: DateTime<Utc>) -> Account {
    let mut next = account.clone();
    next.plan_type = plan;
    next.is_active = true;
    next.is_trial_expired = false;
    next.monthly_revenue = plan.monthly_revenue();

    match plan.cycle() {
        None => {
            next.trial_start_date = Some(now);
            next.trial_end_date = Some(now + Duration::days(TRIAL_DAYS));
            next.subscription_start_date = None;
            next.last_payment_date = None;
            next.next_payment_date = None;
        }
        Some(cycle) => {
            next.trial_start_date = None;
            next.trial_end_date = None;
            next.subscription_start_date = Some(now);
            next.last_payment_date = Some(now);
            next.next_payment_date = Some(now + cycle);
        }
    }
    next
}

pub fn is_trial_expired(account: &Account, now: DateTime<Utc>) -> bool {
    account.plan_type == PlanType::Trial && account.trial_end_date.is_some_and(|end| end < now)
}

/// Whole days left on the trial, rounded up, never negative.
pub fn trial_days_left(account: &Account, now: DateTime<Utc>) -> i64 {
    if account.plan_type != PlanType::Trial {
        return 0;
    }
    let Some(end) = account.trial_end_date else {
        return 0;
    };
    let ms = (end - now).num_milliseconds();
    if ms <= 0 {
        return 0;
    }
    (ms + MS_PER_DAY - 1) / MS_PER_DAY
}

/// Recomputes the cached `is_trial_expired` flag.
pub fn refresh_trial_flag(account: &Account, now: DateTime<Utc>) -> Account {
    Account {
        is_trial_expired: is_trial_expired(account, now),
        ..account.clone()
    }
}

pub fn is_payment_due(account: &Account, now: DateTime<Utc>) -> bool {
    account.is_active
        && account.plan_type != PlanType::Trial
        && account.next_payment_date.is_some_and(|due| due <= now)
}

/// Books one cycle payment and rolls the billing dates forward from `now`.
/// Trial accounts are returned unchanged.
pub fn record_payment(account: &Account, now: DateTime<Utc>) -> Account {
    let Some(cycle) = account.plan_type.cycle() else {
        return account.clone();
    };
    Account {
        total_paid: account.total_paid + account.plan_type.cycle_price(),
        last_payment_date: Some(now),
        next_payment_date: Some(now + cycle),
        ..account.clone()
    }
}

/// Toggles the active flag. The plan is not affected.
pub fn set_active(account: &Account, active: bool) -> Account {
    Account {
        is_active: active,
        ..account.clone()
    }
}
