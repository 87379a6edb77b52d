// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::core::reports::month_summary;
use crate::store::{self, TxFilter};
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn month(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let txs = store::list_transactions(
        conn,
        &TxFilter {
            month: Some(month.clone()),
            ..TxFilter::default()
        },
    )?;
    let s = month_summary(&txs, &month);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let ccy = store::get_currency(conn)?;
        let rows = vec![
            vec!["Income".into(), fmt_money(&s.income, &ccy)],
            vec!["Expenses".into(), fmt_money(&s.expense, &ccy)],
            vec!["Net".into(), fmt_money(&s.net, &ccy)],
            vec![
                "Paid".into(),
                format!("{} ({})", s.paid_count, fmt_money(&s.paid_total, &ccy)),
            ],
            vec!["Pending".into(), s.pending_count.to_string()],
            vec!["Overdue".into(), s.overdue_count.to_string()],
            vec!["Open total".into(), fmt_money(&s.open_total, &ccy)],
        ];
        println!("{}", pretty_table(&[s.month.as_str(), ""], rows));
    }
    Ok(())
}
