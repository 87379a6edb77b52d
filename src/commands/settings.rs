// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;
use tracing::info;

use crate::store;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let alerts = store::load_alert_settings(conn)?;
            let currency = store::get_currency(conn)?;
            let v = json!({ "currency": currency, "alerts": alerts });
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &v)? {
                let rows = vec![
                    vec!["currency".into(), currency],
                    vec![
                        "alerts.days_before_due".into(),
                        alerts.days_before_due.to_string(),
                    ],
                    vec![
                        "alerts.enable_due".into(),
                        alerts.enable_due_alerts.to_string(),
                    ],
                    vec![
                        "alerts.enable_overdue".into(),
                        alerts.enable_overdue_alerts.to_string(),
                    ],
                ];
                println!("{}", pretty_table(&["Key", "Value"], rows));
            }
        }
        Some(("alerts", sub)) => {
            let mut s = store::load_alert_settings(conn)?;
            if let Some(days) = sub.get_one::<i64>("days") {
                s.days_before_due = *days;
            }
            if let Some(on) = sub.get_one::<bool>("due") {
                s.enable_due_alerts = *on;
            }
            if let Some(on) = sub.get_one::<bool>("overdue") {
                s.enable_overdue_alerts = *on;
            }
            store::save_alert_settings(conn, &s)?;
            info!(?s, "alert settings saved");
            println!(
                "Alerts: due-soon {} ({} days before), overdue {}",
                if s.enable_due_alerts { "on" } else { "off" },
                s.days_before_due,
                if s.enable_overdue_alerts { "on" } else { "off" }
            );
        }
        Some(("currency", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().trim().to_uppercase();
            store::set_setting(conn, "currency", &code)?;
            println!("Currency set to {}", code);
        }
        _ => {}
    }
    Ok(())
}
