// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use tracing::info;

use crate::store;

const CSV_HEADER: [&str; 14] = [
    "id",
    "type",
    "description",
    "amount",
    "category",
    "due_date",
    "status",
    "payment_method",
    "payment_date",
    "client",
    "phone",
    "frequency",
    "recurring_end_date",
    "parent_transaction_id",
];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut txs = store::all_transactions(conn)?;
    txs.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));

    match fmt.as_str() {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            wtr.write_record(CSV_HEADER)?;
            for t in &txs {
                let payment = t.status.payment();
                wtr.write_record([
                    t.id.clone(),
                    t.kind.to_string(),
                    t.description.clone(),
                    t.amount.to_string(),
                    t.category.clone(),
                    t.due_date.to_string(),
                    t.status.to_string(),
                    payment.map(|p| p.payment_method.clone()).unwrap_or_default(),
                    payment
                        .map(|p| p.payment_date.to_string())
                        .unwrap_or_default(),
                    t.client.clone().unwrap_or_default(),
                    t.phone.clone().unwrap_or_default(),
                    t.recurrence
                        .map(|r| r.frequency.to_string())
                        .unwrap_or_default(),
                    t.recurrence
                        .and_then(|r| r.end_date)
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    t.parent_transaction_id.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&txs)?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    info!(count = txs.len(), %out, %fmt, "transactions exported");
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
