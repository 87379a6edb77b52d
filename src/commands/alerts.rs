// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::info;

use crate::core::alerts::derive_alerts;
use crate::models::NotificationAlert;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table, short_id, today_from};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("scan", sub)) => {
            let created = scan(conn, today_from(sub)?)?;
            for a in &created {
                println!("[{}] {}", a.kind, a.message);
            }
            if created.is_empty() {
                println!("No new alerts");
            }
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("read", sub)) => read(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Derives alerts for `today` and stores the new ones.
pub fn scan(conn: &mut Connection, today: NaiveDate) -> Result<Vec<NotificationAlert>> {
    let db = conn.transaction()?;
    let settings = store::load_alert_settings(&db)?;
    let txs = store::all_transactions(&db)?;
    let existing = store::list_alerts(&db, false)?;
    let created = derive_alerts(&txs, &existing, &settings, today);
    for a in &created {
        store::insert_alert(&db, a)?;
    }
    db.commit()?;
    info!(count = created.len(), %today, "alert scan finished");
    Ok(created)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = store::list_alerts(conn, sub.get_flag("unread"))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|a| {
                vec![
                    short_id(&a.id).to_string(),
                    a.created_on.to_string(),
                    a.kind.to_string(),
                    a.message.clone(),
                    if a.read { "yes" } else { "" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Created", "Kind", "Message", "Read"], rows)
        );
    }
    Ok(())
}

fn read(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let n = match (sub.get_one::<String>("id"), sub.get_flag("all")) {
        (Some(id), _) if id.trim().is_empty() => bail!("Alert id must not be empty"),
        (Some(id), _) => store::mark_alerts_read(conn, Some(id.trim()))?,
        (None, true) => store::mark_alerts_read(conn, None)?,
        (None, false) => bail!("Pass --id <ID> or --all"),
    };
    println!("{} alert(s) marked read", n);
    Ok(())
}
