// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDateTime, Timelike};
use rusqlite::{Connection, OptionalExtension, params};

use crate::db;
use crate::error::{LedgerError, Result};
use crate::models::{Category, CategoryKind, Transaction, TxCursor, TxPage};

/// Seeded installment category. Every owner gets one, locked, under
/// personal expenses; it cannot be renamed or removed.
pub const INSTALLMENT_CATEGORY: &str = "قسط";

/// Durable store for categories and transactions, scoped per owner.
/// Every write commits before the call returns. One `Ledger` wraps one
/// SQLite connection; tests open isolated in-memory instances.
pub struct Ledger {
    conn: Connection,
}

impl Ledger {
    pub fn new(conn: Connection) -> Ledger {
        Ledger { conn }
    }

    pub fn open_in_memory() -> Result<Ledger> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(db::SCHEMA)?;
        Ok(Ledger { conn })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    // ---- categories ----

    pub fn create_category(&self, owner_id: i64, name: &str, kind: CategoryKind) -> Result<Category> {
        let dup: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM categories WHERE owner_id=?1 AND name=?2",
                params![owner_id, name],
                |r| r.get(0),
            )
            .optional()?;
        if dup.is_some() {
            return Err(LedgerError::DuplicateName(name.to_string()));
        }
        self.conn.execute(
            "INSERT INTO categories(owner_id, name, kind) VALUES (?1, ?2, ?3)",
            params![owner_id, name, kind.as_str()],
        )?;
        Ok(Category {
            id: self.conn.last_insert_rowid(),
            owner_id,
            name: name.to_string(),
            kind,
            locked: false,
        })
    }

    pub fn category(&self, owner_id: i64, category_id: i64) -> Result<Category> {
        let row: Option<(i64, i64, String, String, bool)> = self
            .conn
            .query_row(
                "SELECT id, owner_id, name, kind, is_locked FROM categories
                 WHERE id=?1 AND owner_id=?2",
                params![category_id, owner_id],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
            )
            .optional()?;
        let (id, owner_id, name, kind, locked) =
            row.ok_or(LedgerError::NotFound(category_id))?;
        Ok(Category {
            id,
            owner_id,
            name,
            kind: CategoryKind::parse(&kind)?,
            locked,
        })
    }

    pub fn list_categories(&self, owner_id: i64, kind: Option<CategoryKind>) -> Result<Vec<Category>> {
        let mut out = Vec::new();
        let mut push = |id: i64, owner_id: i64, name: String, kind: String, locked: bool| {
            CategoryKind::parse(&kind).map(|kind| {
                out.push(Category {
                    id,
                    owner_id,
                    name,
                    kind,
                    locked,
                })
            })
        };
        match kind {
            Some(k) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, owner_id, name, kind, is_locked FROM categories
                     WHERE owner_id=?1 AND kind=?2 ORDER BY is_locked DESC, name",
                )?;
                let mut rows = stmt.query(params![owner_id, k.as_str()])?;
                while let Some(r) = rows.next()? {
                    push(r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)?;
                }
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, owner_id, name, kind, is_locked FROM categories
                     WHERE owner_id=?1 ORDER BY kind, is_locked DESC, name",
                )?;
                let mut rows = stmt.query(params![owner_id])?;
                while let Some(r) = rows.next()? {
                    push(r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)?;
                }
            }
        }
        Ok(out)
    }

    /// Renames in place; transaction history keeps pointing at the same id.
    pub fn rename_category(&self, owner_id: i64, category_id: i64, new_name: &str) -> Result<Category> {
        let current = self.category(owner_id, category_id)?;
        if current.locked {
            return Err(LedgerError::CategoryLocked(current.name));
        }
        if current.name != new_name {
            let dup: Option<i64> = self
                .conn
                .query_row(
                    "SELECT id FROM categories WHERE owner_id=?1 AND name=?2 AND id<>?3",
                    params![owner_id, new_name, category_id],
                    |r| r.get(0),
                )
                .optional()?;
            if dup.is_some() {
                return Err(LedgerError::DuplicateName(new_name.to_string()));
            }
        }
        self.conn.execute(
            "UPDATE categories SET name=?1 WHERE id=?2 AND owner_id=?3",
            params![new_name, category_id, owner_id],
        )?;
        Ok(Category {
            name: new_name.to_string(),
            ..current
        })
    }

    /// Deletion blocks while any transaction still references the
    /// category; callers must delete or re-book those rows first.
    pub fn delete_category(&self, owner_id: i64, category_id: i64) -> Result<()> {
        let current = self.category(owner_id, category_id)?;
        if current.locked {
            return Err(LedgerError::CategoryLocked(current.name));
        }
        let referencing: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE category_id=?1",
            params![category_id],
            |r| r.get(0),
        )?;
        if referencing > 0 {
            return Err(LedgerError::CategoryInUse {
                id: category_id,
                transactions: referencing,
            });
        }
        self.conn.execute(
            "DELETE FROM categories WHERE id=?1 AND owner_id=?2",
            params![category_id, owner_id],
        )?;
        Ok(())
    }

    /// Seeds the locked installment category for an owner, re-locking it
    /// if a previous run left it unlocked.
    pub fn ensure_installment(&self, owner_id: i64) -> Result<Category> {
        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM categories WHERE owner_id=?1 AND name=?2",
                params![owner_id, INSTALLMENT_CATEGORY],
                |r| r.get(0),
            )
            .optional()?;
        let id = match existing {
            Some(id) => {
                self.conn
                    .execute("UPDATE categories SET is_locked=1 WHERE id=?1", params![id])?;
                id
            }
            None => {
                self.conn.execute(
                    "INSERT INTO categories(owner_id, name, kind, is_locked) VALUES (?1, ?2, ?3, 1)",
                    params![
                        owner_id,
                        INSTALLMENT_CATEGORY,
                        CategoryKind::PersonalExpense.as_str()
                    ],
                )?;
                self.conn.last_insert_rowid()
            }
        };
        self.category(owner_id, id)
    }

    // ---- transactions ----

    pub fn create_transaction(
        &self,
        owner_id: i64,
        category_id: i64,
        amount: i64,
        ts: NaiveDateTime,
        note: Option<&str>,
    ) -> Result<Transaction> {
        if amount <= 0 {
            return Err(LedgerError::AmountInvalid(amount));
        }
        let known: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM categories WHERE id=?1 AND owner_id=?2",
                params![category_id, owner_id],
                |r| r.get(0),
            )
            .optional()?;
        if known.is_none() {
            return Err(LedgerError::CategoryNotFound(category_id));
        }
        // Whole-second precision keeps period end boundaries exact.
        let ts = ts.with_nanosecond(0).unwrap_or(ts);
        self.conn.execute(
            "INSERT INTO transactions(owner_id, category_id, amount, ts, note)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![owner_id, category_id, amount, ts, note],
        )?;
        Ok(Transaction {
            id: self.conn.last_insert_rowid(),
            owner_id,
            category_id,
            amount,
            ts,
            note: note.map(|s| s.to_string()),
        })
    }

    pub fn transaction(&self, owner_id: i64, transaction_id: i64) -> Result<Transaction> {
        let row: Option<Transaction> = self
            .conn
            .query_row(
                "SELECT id, owner_id, category_id, amount, ts, note FROM transactions
                 WHERE id=?1 AND owner_id=?2",
                params![transaction_id, owner_id],
                Self::tx_from_row,
            )
            .optional()?;
        row.ok_or(LedgerError::NotFound(transaction_id))
    }

    pub fn delete_transaction(&self, owner_id: i64, transaction_id: i64) -> Result<()> {
        let n = self.conn.execute(
            "DELETE FROM transactions WHERE id=?1 AND owner_id=?2",
            params![transaction_id, owner_id],
        )?;
        if n == 0 {
            return Err(LedgerError::NotFound(transaction_id));
        }
        Ok(())
    }

    /// Rows in `[from_ts, to_ts]`, ascending by `(ts, id)`. At most
    /// `limit` rows are returned; `next` restarts the scan after the last
    /// row of this page.
    pub fn list_transactions(
        &self,
        owner_id: i64,
        from_ts: NaiveDateTime,
        to_ts: NaiveDateTime,
        cursor: Option<TxCursor>,
        limit: usize,
    ) -> Result<TxPage> {
        let fetch = (limit + 1) as i64;
        let mut items: Vec<Transaction> = Vec::new();
        match cursor {
            Some(cur) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, owner_id, category_id, amount, ts, note FROM transactions
                     WHERE owner_id=?1 AND ts>=?2 AND ts<=?3
                       AND (ts>?4 OR (ts=?4 AND id>?5))
                     ORDER BY ts, id LIMIT ?6",
                )?;
                let mut rows = stmt.query(params![owner_id, from_ts, to_ts, cur.ts, cur.id, fetch])?;
                while let Some(r) = rows.next()? {
                    items.push(Self::tx_from_row(r)?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, owner_id, category_id, amount, ts, note FROM transactions
                     WHERE owner_id=?1 AND ts>=?2 AND ts<=?3
                     ORDER BY ts, id LIMIT ?4",
                )?;
                let mut rows = stmt.query(params![owner_id, from_ts, to_ts, fetch])?;
                while let Some(r) = rows.next()? {
                    items.push(Self::tx_from_row(r)?);
                }
            }
        }
        let next = if items.len() > limit {
            items.truncate(limit);
            items.last().map(|t| TxCursor { ts: t.ts, id: t.id })
        } else {
            None
        };
        Ok(TxPage { items, next })
    }

    fn tx_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
        Ok(Transaction {
            id: r.get(0)?,
            owner_id: r.get(1)?,
            category_id: r.get(2)?,
            amount: r.get(3)?,
            ts: r.get(4)?,
            note: r.get(5)?,
        })
    }

    // ---- consistency sweep ----

    /// Cross-checks the constraints the schema cannot express on its own.
    /// Returns `(issue, detail)` pairs; empty means healthy.
    pub fn integrity_report(&self) -> Result<Vec<(String, String)>> {
        let mut issues = Vec::new();

        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.owner_id, c.owner_id FROM transactions t
             JOIN categories c ON t.category_id=c.id
             WHERE t.owner_id <> c.owner_id",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(r) = rows.next()? {
            let (tx, t_owner, c_owner): (i64, i64, i64) = (r.get(0)?, r.get(1)?, r.get(2)?);
            issues.push((
                "cross_owner_category".into(),
                format!("tx {} owner {} references category of owner {}", tx, t_owner, c_owner),
            ));
        }

        let mut stmt = self.conn.prepare(
            "SELECT t.id FROM transactions t
             LEFT JOIN categories c ON t.category_id=c.id
             WHERE c.id IS NULL",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(r) = rows.next()? {
            let tx: i64 = r.get(0)?;
            issues.push(("dangling_category".into(), format!("tx {}", tx)));
        }

        let mut stmt = self
            .conn
            .prepare("SELECT id, amount FROM transactions WHERE amount <= 0")?;
        let mut rows = stmt.query([])?;
        while let Some(r) = rows.next()? {
            let (tx, amount): (i64, i64) = (r.get(0)?, r.get(1)?);
            issues.push(("nonpositive_amount".into(), format!("tx {} amount {}", tx, amount)));
        }

        Ok(issues)
    }
}
