// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Access policy and ledger-owner resolution.
//!
//! Two modes: `admin_only` restricts the ledger to the admin roster,
//! `public` lets every user keep a private ledger. In admin mode the
//! `share_enabled` flag collapses all admins onto the primary admin's
//! ledger so a small team books into one set of accounts.

use rusqlite::{OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;

pub const SETTING_ACCESS_MODE: &str = "access_mode";
pub const SETTING_SHARE_ENABLED: &str = "share_enabled";
pub const SETTING_PRIMARY_ADMIN: &str = "primary_admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    AdminOnly,
    Public,
}

impl AccessMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::AdminOnly => "admin_only",
            AccessMode::Public => "public",
        }
    }

    pub fn parse(s: &str) -> Option<AccessMode> {
        match s {
            "admin_only" | "admin-only" => Some(AccessMode::AdminOnly),
            "public" => Some(AccessMode::Public),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub user_id: i64,
    pub name: String,
}

pub fn setting(ledger: &Ledger, key: &str) -> Result<Option<String>> {
    let v = ledger
        .conn()
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(ledger: &Ledger, key: &str, value: &str) -> Result<()> {
    ledger.conn().execute(
        "INSERT INTO settings(key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Defaults to admin-only, the original deployment posture.
pub fn access_mode(ledger: &Ledger) -> Result<AccessMode> {
    let stored = setting(ledger, SETTING_ACCESS_MODE)?;
    Ok(stored
        .as_deref()
        .and_then(AccessMode::parse)
        .unwrap_or(AccessMode::AdminOnly))
}

pub fn set_access_mode(ledger: &Ledger, mode: AccessMode) -> Result<()> {
    set_setting(ledger, SETTING_ACCESS_MODE, mode.as_str())
}

pub fn share_enabled(ledger: &Ledger) -> Result<bool> {
    Ok(setting(ledger, SETTING_SHARE_ENABLED)?.as_deref() == Some("1"))
}

pub fn set_share_enabled(ledger: &Ledger, enabled: bool) -> Result<()> {
    set_setting(ledger, SETTING_SHARE_ENABLED, if enabled { "1" } else { "0" })
}

pub fn primary_admin(ledger: &Ledger) -> Result<Option<i64>> {
    let v = setting(ledger, SETTING_PRIMARY_ADMIN)?;
    Ok(v.and_then(|s| s.parse().ok()))
}

/// The primary admin is always on the roster as well.
pub fn set_primary_admin(ledger: &Ledger, user_id: i64, name: &str) -> Result<()> {
    set_setting(ledger, SETTING_PRIMARY_ADMIN, &user_id.to_string())?;
    add_admin(ledger, user_id, name)
}

pub fn add_admin(ledger: &Ledger, user_id: i64, name: &str) -> Result<()> {
    ledger.conn().execute(
        "INSERT INTO admins(user_id, name) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET name=excluded.name",
        params![user_id, name],
    )?;
    Ok(())
}

pub fn remove_admin(ledger: &Ledger, user_id: i64) -> Result<()> {
    let n = ledger
        .conn()
        .execute("DELETE FROM admins WHERE user_id=?1", params![user_id])?;
    if n == 0 {
        return Err(LedgerError::NotFound(user_id));
    }
    Ok(())
}

pub fn list_admins(ledger: &Ledger) -> Result<Vec<Admin>> {
    let mut stmt = ledger
        .conn()
        .prepare("SELECT user_id, name FROM admins ORDER BY user_id")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(Admin {
            user_id: r.get(0)?,
            name: r.get(1)?,
        });
    }
    Ok(out)
}

pub fn is_admin(ledger: &Ledger, user_id: i64) -> Result<bool> {
    if primary_admin(ledger)? == Some(user_id) {
        return Ok(true);
    }
    let found: Option<i64> = ledger
        .conn()
        .query_row(
            "SELECT user_id FROM admins WHERE user_id=?1",
            params![user_id],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn access_allowed(ledger: &Ledger, user_id: i64) -> Result<bool> {
    match access_mode(ledger)? {
        AccessMode::Public => Ok(true),
        AccessMode::AdminOnly => is_admin(ledger, user_id),
    }
}

/// Maps an acting user to the ledger they book into.
///
/// Public mode: everyone gets their own private ledger. Admin-only mode:
/// non-admins are denied; with sharing on, all admins book into the
/// primary admin's ledger, otherwise each admin keeps a private one.
pub fn resolve_owner(ledger: &Ledger, user_id: i64) -> Result<i64> {
    match access_mode(ledger)? {
        AccessMode::Public => Ok(user_id),
        AccessMode::AdminOnly => {
            if !is_admin(ledger, user_id)? {
                return Err(LedgerError::AccessDenied(user_id));
            }
            if share_enabled(ledger)? {
                // Sharing without a primary admin falls back to private.
                Ok(primary_admin(ledger)?.unwrap_or(user_id))
            } else {
                Ok(user_id)
            }
        }
    }
}
