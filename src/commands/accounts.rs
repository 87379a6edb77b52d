// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;
use tracing::{info, warn};

use crate::core::{plans, reports};
use crate::errors::Error;
use crate::models::{Account, PlanType, Role};
use crate::store;
use crate::utils::{
    account_by_email, fmt_money, fmt_opt_ts, maybe_print_json, now_from, pretty_table,
    validate_email,
};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("signup", sub)) => signup(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("plan", sub)) => change_plan(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("activate", sub)) => set_active(conn, sub, true)?,
        Some(("deactivate", sub)) => set_active(conn, sub, false)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("stats", sub)) => stats(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn signup(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    let email = validate_email(sub.get_one::<String>("email").unwrap())?;
    let role = sub.get_one::<String>("role").unwrap().parse::<Role>()?;
    let now = now_from(sub)?;

    let account = plans::sign_up(name, &email, role, now);
    store::insert_account(conn, &account)?;
    info!(account = %account.id, %email, "account signed up");
    println!(
        "Created {} account '{}' <{}>, trial ends {}",
        role,
        name,
        email,
        fmt_opt_ts(account.trial_end_date)
    );
    Ok(())
}

#[derive(Serialize)]
pub struct AccountRow {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    pub plan: PlanType,
    pub trial_days_left: i64,
    pub trial_expired: bool,
    pub next_payment: String,
    pub monthly_revenue: String,
    pub total_paid: String,
}

fn account_row(a: &Account, now: chrono::DateTime<chrono::Utc>) -> AccountRow {
    AccountRow {
        name: a.name.clone(),
        email: a.email.clone(),
        role: a.role,
        active: a.is_active,
        plan: a.plan_type,
        trial_days_left: plans::trial_days_left(a, now),
        trial_expired: plans::is_trial_expired(a, now),
        next_payment: fmt_opt_ts(a.next_payment_date),
        monthly_revenue: format!("{:.2}", a.monthly_revenue),
        total_paid: format!("{:.2}", a.total_paid),
    }
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<AccountRow>> {
    let now = now_from(sub)?;
    Ok(store::list_accounts(conn)?
        .iter()
        .map(|a| account_row(a, now))
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.email.clone(),
                    r.role.to_string(),
                    if r.active { "yes" } else { "no" }.to_string(),
                    r.plan.to_string(),
                    r.trial_days_left.to_string(),
                    r.next_payment.clone(),
                    r.monthly_revenue.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Name", "Email", "Role", "Active", "Plan", "Trial Days", "Next Payment", "MRR"],
                rows,
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let now = now_from(sub)?;
    let account = account_by_email(conn, sub.get_one::<String>("email").unwrap())?;

    let refreshed = plans::refresh_trial_flag(&account, now);
    if refreshed.is_trial_expired != account.is_trial_expired {
        store::update_account(conn, &refreshed)?;
        info!(account = %refreshed.id, expired = refreshed.is_trial_expired, "trial flag refreshed");
    }

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &refreshed)? {
        let ccy = store::get_currency(conn)?;
        let a = &refreshed;
        let rows = vec![
            vec!["Name".into(), a.name.clone()],
            vec!["Email".into(), a.email.clone()],
            vec!["Role".into(), a.role.to_string()],
            vec!["Active".into(), a.is_active.to_string()],
            vec!["Plan".into(), a.plan_type.to_string()],
            vec!["Trial start".into(), fmt_opt_ts(a.trial_start_date)],
            vec!["Trial end".into(), fmt_opt_ts(a.trial_end_date)],
            vec![
                "Trial days left".into(),
                plans::trial_days_left(a, now).to_string(),
            ],
            vec!["Trial expired".into(), a.is_trial_expired.to_string()],
            vec!["Subscribed".into(), fmt_opt_ts(a.subscription_start_date)],
            vec!["Last payment".into(), fmt_opt_ts(a.last_payment_date)],
            vec!["Next payment".into(), fmt_opt_ts(a.next_payment_date)],
            vec![
                "Payment due".into(),
                plans::is_payment_due(a, now).to_string(),
            ],
            vec!["Monthly revenue".into(), fmt_money(&a.monthly_revenue, &ccy)],
            vec!["Total paid".into(), fmt_money(&a.total_paid, &ccy)],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}

fn change_plan(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let plan = sub.get_one::<String>("plan").unwrap().parse::<PlanType>()?;
    let now = now_from(sub)?;

    let tx = conn.transaction()?;
    let account = account_by_email(&tx, sub.get_one::<String>("email").unwrap())?;
    let previous = account.plan_type;
    let updated = plans::change_plan(&account, plan, now);
    store::update_account(&tx, &updated)?;
    tx.commit()?;

    info!(account = %updated.id, from = %previous, to = %plan, "plan changed");
    match updated.next_payment_date {
        Some(next) => println!(
            "'{}' moved from {} to {}; next payment {}",
            updated.email,
            previous,
            plan,
            next.format("%Y-%m-%d")
        ),
        None => println!(
            "'{}' moved from {} to {}; trial ends {}",
            updated.email,
            previous,
            plan,
            fmt_opt_ts(updated.trial_end_date)
        ),
    }
    Ok(())
}

fn pay(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let now = now_from(sub)?;
    let tx = conn.transaction()?;
    let account = account_by_email(&tx, sub.get_one::<String>("email").unwrap())?;
    if account.plan_type == PlanType::Trial {
        warn!(account = %account.id, "payment recorded against a trial account ignored");
        println!("'{}' is on trial; nothing to pay", account.email);
        return Ok(());
    }
    if !account.is_active {
        warn!(account = %account.id, "payment refused for an inactive account");
        bail!("'{}' is inactive; activate it before recording a payment", account.email);
    }
    let updated = plans::record_payment(&account, now);
    store::update_account(&tx, &updated)?;
    tx.commit()?;

    let ccy = store::get_currency(conn)?;
    info!(account = %updated.id, "cycle payment recorded");
    println!(
        "Recorded {} for '{}'; next payment {}",
        fmt_money(&updated.plan_type.cycle_price(), &ccy),
        updated.email,
        fmt_opt_ts(updated.next_payment_date)
    );
    Ok(())
}

fn set_active(conn: &Connection, sub: &clap::ArgMatches, active: bool) -> Result<()> {
    let account = account_by_email(conn, sub.get_one::<String>("email").unwrap())?;
    store::update_account(conn, &plans::set_active(&account, active))?;
    info!(account = %account.id, active, "account activation changed");
    println!(
        "{} '{}'",
        if active { "Activated" } else { "Deactivated" },
        account.email
    );
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let by = account_by_email(conn, sub.get_one::<String>("by").unwrap())?;
    if by.role != Role::Admin || !by.is_active {
        warn!(by = %by.email, "non-admin attempted account removal");
        return Err(Error::Forbidden(by.email).into());
    }
    let account = account_by_email(conn, sub.get_one::<String>("email").unwrap())?;
    store::delete_account(conn, &account.id)?;
    info!(account = %account.id, by = %by.email, "account removed");
    println!("Removed account '{}'", account.email);
    Ok(())
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let now = now_from(sub)?;
    let summary = reports::revenue_summary(&store::list_accounts(conn)?, now);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        let ccy = store::get_currency(conn)?;
        let mut rows: Vec<Vec<String>> = summary
            .plans
            .iter()
            .map(|p| vec![format!("accounts on {}", p.plan), p.accounts.to_string()])
            .collect();
        rows.push(vec!["active".into(), summary.active.to_string()]);
        rows.push(vec!["expired trials".into(), summary.expired_trials.to_string()]);
        rows.push(vec!["MRR".into(), fmt_money(&summary.mrr, &ccy)]);
        rows.push(vec!["total paid".into(), fmt_money(&summary.total_paid, &ccy)]);
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}
