// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use tracing::info;

use crate::core::goals::progress;
use crate::models::MonthlyGoal;
use crate::store::{self, TxFilter};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let goal = MonthlyGoal {
        month: parse_month(sub.get_one::<String>("month").unwrap())?,
        income_target: parse_decimal(sub.get_one::<String>("income").unwrap())?,
        expense_limit: parse_decimal(sub.get_one::<String>("expense").unwrap())?,
        savings_target: parse_decimal(sub.get_one::<String>("savings").unwrap())?,
    };
    store::upsert_goal(conn, &goal)?;
    info!(month = %goal.month, "goal set");
    println!(
        "Goal for {}: income {}, expenses at most {}, savings {}",
        goal.month, goal.income_target, goal.expense_limit, goal.savings_target
    );
    Ok(())
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let goal = store::get_goal(conn, &month)?
        .ok_or_else(|| anyhow!("No goal set for {}", month))?;
    let txs = store::list_transactions(
        conn,
        &TxFilter {
            month: Some(month.clone()),
            ..TxFilter::default()
        },
    )?;
    let p = progress(&goal, &txs);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &p)? {
        let ccy = store::get_currency(conn)?;
        let rows = vec![
            vec![
                "Income".into(),
                fmt_money(&p.income, &ccy),
                fmt_money(&goal.income_target, &ccy),
                format!("{}%", p.income_pct),
            ],
            vec![
                "Expenses".into(),
                fmt_money(&p.expense, &ccy),
                fmt_money(&goal.expense_limit, &ccy),
                format!(
                    "{}%{}",
                    p.expense_pct,
                    if p.expense_exceeded { " (over)" } else { "" }
                ),
            ],
            vec![
                "Savings".into(),
                fmt_money(&p.savings, &ccy),
                fmt_money(&goal.savings_target, &ccy),
                format!("{}%", p.savings_pct),
            ],
        ];
        println!(
            "{}",
            pretty_table(&["", "Actual", "Target", "Progress"], rows)
        );
    }
    Ok(())
}
