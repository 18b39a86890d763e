//! Persistence for the most recently shown display list.
//!
//! # Responsibility
//! - Carry the last display list across one-shot CLI invocations.
//!
//! # Invariants
//! - `save` replaces the whole snapshot in one transaction.
//! - Stored ids are not checked against `items`; stale ids surface as
//!   not-found errors when acted upon.

use crate::model::item::ItemId;
use crate::query::display::DisplaySnapshot;
use crate::repo::item_repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

const TITLE_KEY: &str = "title";

/// Storage for the last shown display list.
pub trait DisplayStore {
    /// Replaces the stored snapshot.
    fn save(&self, snapshot: &DisplaySnapshot) -> RepoResult<()>;
    /// Loads the stored snapshot; empty when nothing was listed yet.
    fn load(&self) -> RepoResult<DisplaySnapshot>;
}

/// SQLite-backed display snapshot store.
pub struct SqliteDisplayStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDisplayStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DisplayStore for SqliteDisplayStore<'_> {
    fn save(&self, snapshot: &DisplaySnapshot) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM display_list;", [])?;
        for (index, id) in snapshot.item_ids.iter().enumerate() {
            tx.execute(
                "INSERT INTO display_list (position, item_id) VALUES (?1, ?2);",
                params![index as i64 + 1, id],
            )?;
        }
        tx.execute(
            "INSERT INTO display_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![TITLE_KEY, snapshot.title],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn load(&self) -> RepoResult<DisplaySnapshot> {
        let title: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM display_meta WHERE key = ?1;",
                [TITLE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let mut stmt = self
            .conn
            .prepare("SELECT item_id FROM display_list ORDER BY position ASC;")?;
        let item_ids = stmt
            .query_map([], |row| row.get::<_, ItemId>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DisplaySnapshot {
            title: title.unwrap_or_default(),
            item_ids,
        })
    }
}
