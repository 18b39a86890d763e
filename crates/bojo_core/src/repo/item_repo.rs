//! Item store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide durable create/read/update-state/delete over journal items.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Ids come from `AUTOINCREMENT` and are never reused.
//! - `list_all` returns creation order (`id ASC`).
//! - Deleting an item clears `parent_id` on its children (`ON DELETE SET NULL`).
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::item::{Item, ItemId, ItemValidationError, NewItem};
use crate::model::marker::{ItemState, Signifier};
use chrono::Utc;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    description,
    state,
    signifier,
    parent_id,
    scheduled_at,
    created_at,
    updated_at
FROM items";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for item persistence and lookup operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Db(DbError),
    NotFound(ItemId),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item {id} not found"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "item store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Portable item shape used by JSON export/import.
///
/// `id` and `parent_id` are only meaningful within one exported batch.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportedItem {
    pub id: ItemId,
    pub description: String,
    pub state: ItemState,
    #[serde(default)]
    pub signifier: Option<Signifier>,
    #[serde(default)]
    pub parent_id: Option<ItemId>,
    #[serde(default)]
    pub scheduled_at: Option<i64>,
}

impl From<&Item> for ExportedItem {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            description: item.description.clone(),
            state: item.state,
            signifier: item.signifier,
            parent_id: item.parent_id,
            scheduled_at: item.scheduled_at,
        }
    }
}

/// Durable CRUD contract over the journal's items.
pub trait ItemStore {
    /// Validates, allocates the next id, stamps timestamps and commits.
    fn create(&self, item: &NewItem) -> RepoResult<Item>;
    /// Every stored item in creation order.
    fn list_all(&self) -> RepoResult<Vec<Item>>;
    fn get(&self, id: ItemId) -> RepoResult<Option<Item>>;
    fn set_state(&self, id: ItemId, state: ItemState) -> RepoResult<Item>;
    fn set_signifier(&self, id: ItemId, signifier: Option<Signifier>) -> RepoResult<Item>;
    /// Permanently removes one item and returns it as it was stored.
    fn delete(&self, id: ItemId) -> RepoResult<Item>;
    /// Completes every non-complete item scheduled strictly before `now_ms`.
    fn complete_past(&self, now_ms: i64) -> RepoResult<Vec<Item>>;
    /// Inserts a batch with fresh ids, remapping in-batch parent references.
    fn import(&self, items: &[ExportedItem]) -> RepoResult<Vec<Item>>;
}

/// SQLite-backed item store.
pub struct SqliteItemStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemStore<'conn> {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = schema_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl ItemStore for SqliteItemStore<'_> {
    fn create(&self, item: &NewItem) -> RepoResult<Item> {
        item.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if let Some(parent_id) = item.parent_id {
            if !item_exists(&tx, parent_id)? {
                return Err(ItemValidationError::UnknownParent(parent_id).into());
            }
        }

        let now = now_epoch_ms();
        tx.execute(
            "INSERT INTO items (
                description,
                state,
                signifier,
                parent_id,
                scheduled_at,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6);",
            params![
                item.description.trim(),
                item.state.name(),
                item.signifier.map(Signifier::name),
                item.parent_id,
                item.scheduled_at,
                now,
            ],
        )?;
        let id = tx.last_insert_rowid();
        let created = fetch_item(&tx, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created item {id} missing in read-back"))
        })?;
        tx.commit()?;

        info!("event=item_create module=repo status=ok item_id={id}");
        Ok(created)
    }

    fn list_all(&self) -> RepoResult<Vec<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn get(&self, id: ItemId) -> RepoResult<Option<Item>> {
        fetch_item(self.conn, id)
    }

    fn set_state(&self, id: ItemId, state: ItemState) -> RepoResult<Item> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE items SET state = ?1, updated_at = ?2 WHERE id = ?3;",
            params![state.name(), now_epoch_ms(), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        let updated = fetch_item(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        tx.commit()?;

        info!(
            "event=item_set_state module=repo status=ok item_id={id} state={}",
            state.name()
        );
        Ok(updated)
    }

    fn set_signifier(&self, id: ItemId, signifier: Option<Signifier>) -> RepoResult<Item> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE items SET signifier = ?1, updated_at = ?2 WHERE id = ?3;",
            params![signifier.map(Signifier::name), now_epoch_ms(), id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        let updated = fetch_item(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        tx.commit()?;

        info!(
            "event=item_set_signifier module=repo status=ok item_id={id} signifier={}",
            signifier.map_or("none", Signifier::name)
        );
        Ok(updated)
    }

    fn delete(&self, id: ItemId) -> RepoResult<Item> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let removed = fetch_item(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        tx.execute("DELETE FROM items WHERE id = ?1;", [id])?;
        tx.commit()?;

        info!("event=item_delete module=repo status=ok item_id={id}");
        Ok(removed)
    }

    fn complete_past(&self, now_ms: i64) -> RepoResult<Vec<Item>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut stmt = tx.prepare(
            "SELECT id FROM items
             WHERE scheduled_at IS NOT NULL
               AND scheduled_at < ?1
               AND state != ?2
             ORDER BY id ASC;",
        )?;
        let ids = stmt
            .query_map(params![now_ms, ItemState::Complete.name()], |row| {
                row.get::<_, ItemId>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);

        let updated_at = now_epoch_ms();
        let mut completed = Vec::with_capacity(ids.len());
        for id in ids {
            tx.execute(
                "UPDATE items SET state = ?1, updated_at = ?2 WHERE id = ?3;",
                params![ItemState::Complete.name(), updated_at, id],
            )?;
            completed.push(fetch_item(&tx, id)?.ok_or(RepoError::NotFound(id))?);
        }
        tx.commit()?;

        info!(
            "event=item_complete_past module=repo status=ok count={}",
            completed.len()
        );
        Ok(completed)
    }

    fn import(&self, items: &[ExportedItem]) -> RepoResult<Vec<Item>> {
        for item in items {
            to_new_item(item).validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let now = now_epoch_ms();
        let mut id_map: HashMap<ItemId, ItemId> = HashMap::with_capacity(items.len());
        let mut created_ids = Vec::with_capacity(items.len());

        for item in items {
            tx.execute(
                "INSERT INTO items (
                    description,
                    state,
                    signifier,
                    parent_id,
                    scheduled_at,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, NULL, ?4, ?5, ?5);",
                params![
                    item.description.trim(),
                    item.state.name(),
                    item.signifier.map(Signifier::name),
                    item.scheduled_at,
                    now,
                ],
            )?;
            let new_id = tx.last_insert_rowid();
            id_map.insert(item.id, new_id);
            created_ids.push(new_id);
        }

        for (item, new_id) in items.iter().zip(&created_ids) {
            let Some(parent_id) = item.parent_id.and_then(|old| id_map.get(&old)) else {
                continue;
            };
            tx.execute(
                "UPDATE items SET parent_id = ?1 WHERE id = ?2;",
                params![parent_id, new_id],
            )?;
        }

        let mut imported = Vec::with_capacity(created_ids.len());
        for id in created_ids {
            imported.push(fetch_item(&tx, id)?.ok_or(RepoError::NotFound(id))?);
        }
        tx.commit()?;

        info!(
            "event=item_import module=repo status=ok count={}",
            imported.len()
        );
        Ok(imported)
    }
}

fn to_new_item(item: &ExportedItem) -> NewItem {
    NewItem::new(item.description.clone())
        .with_state(item.state)
        .with_signifier(item.signifier)
        .with_schedule(item.scheduled_at)
}

fn item_exists(conn: &Connection, id: ItemId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM items WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn fetch_item(conn: &Connection, id: ItemId) -> RepoResult<Option<Item>> {
    let mut stmt = conn.prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
    let row = stmt
        .query_row([id], |row| Ok(parse_item_row(row)))
        .optional()?;
    row.transpose()
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id: ItemId = row.get("id")?;

    let state_text: String = row.get("state")?;
    let state = ItemState::from_name(&state_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid state `{state_text}` for item {id}"))
    })?;

    let signifier = match row.get::<_, Option<String>>("signifier")? {
        Some(value) => Some(Signifier::from_name(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid signifier `{value}` for item {id}"))
        })?),
        None => None,
    };

    let description: String = row.get("description")?;
    if description.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty description for item {id}"
        )));
    }

    Ok(Item {
        id,
        description,
        state,
        signifier,
        parent_id: row.get("parent_id")?,
        scheduled_at: row.get("scheduled_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Current wall clock as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}
