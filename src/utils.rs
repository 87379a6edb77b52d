// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::errors::Error;
use crate::models::Account;
use crate::store;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Strictly positive amount.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d <= Decimal::ZERO {
        return Err(Error::InvalidAmount(s.trim().to_string()).into());
    }
    Ok(d)
}

pub fn validate_email(s: &str) -> Result<String> {
    let s = s.trim();
    if !EMAIL_RE.is_match(s) {
        return Err(Error::InvalidEmail(s.to_string()).into());
    }
    Ok(s.to_lowercase())
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn fmt_opt_ts(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// `--as-of` date when given, today otherwise.
pub fn today_from(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("as_of") {
        Some(s) => parse_date(s),
        None => Ok(Utc::now().date_naive()),
    }
}

/// `--as-of` at midnight UTC when given, the current instant otherwise.
pub fn now_from(sub: &clap::ArgMatches) -> Result<DateTime<Utc>> {
    match sub.get_one::<String>("as_of") {
        Some(s) => Ok(parse_date(s)?.and_time(chrono::NaiveTime::MIN).and_utc()),
        None => Ok(Utc::now()),
    }
}

pub fn account_by_email(conn: &Connection, email: &str) -> Result<Account> {
    store::find_account_by_email(conn, email)?.ok_or_else(|| {
        Error::NotFound {
            kind: "Account",
            key: email.trim().to_string(),
        }
        .into()
    })
}

/// Resolves a full or abbreviated transaction identifier.
pub fn id_for_transaction(conn: &Connection, prefix: &str) -> Result<String> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(Error::invalid("transaction id", prefix).into());
    }
    let mut ids = store::transaction_ids_with_prefix(conn, prefix)?;
    if let Some(exact) = ids.iter().position(|id| id == prefix) {
        return Ok(ids.swap_remove(exact));
    }
    match ids.len() {
        0 => Err(Error::NotFound {
            kind: "Transaction",
            key: prefix.to_string(),
        }
        .into()),
        1 => Ok(ids.remove(0)),
        n => Err(Error::Ambiguous {
            kind: "Transaction",
            key: prefix.to_string(),
            matches: n,
        }
        .into()),
    }
}

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
