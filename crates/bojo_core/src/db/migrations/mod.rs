//! Embedded schema migrations.
//!
//! Each step is a numbered `.sql` file compiled into the binary. The number
//! of the last applied step is kept in `PRAGMA user_version`, so a journal
//! written by a newer build is refused rather than silently misread.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, TransactionBehavior};

struct Step {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[Step] = &[
    Step {
        version: 1,
        name: "items",
        sql: include_str!("0001_items.sql"),
    },
    Step {
        version: 2,
        name: "display_list",
        sql: include_str!("0002_display_list.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Schema version recorded in the database file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings the schema up to [`latest_version`] in one immediate transaction.
///
/// Returns the versions applied, empty when the schema was current.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<Vec<u32>> {
    let found = schema_version(conn)?;
    let latest = latest_version();
    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Step> = STEPS.iter().filter(|step| step.version > found).collect();
    if pending.is_empty() {
        return Ok(Vec::new());
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=migration_applied module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    Ok(pending.iter().map(|step| step.version).collect())
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, schema_version, STEPS};
    use rusqlite::Connection;

    #[test]
    fn steps_are_strictly_increasing_from_one() {
        for (index, step) in STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "step {}", step.name);
        }
    }

    #[test]
    fn fresh_database_applies_every_step_once() {
        let mut conn = Connection::open_in_memory().expect("in-memory db");
        let applied = apply_migrations(&mut conn).expect("migrate");
        assert_eq!(applied, (1..=latest_version()).collect::<Vec<_>>());
        assert_eq!(schema_version(&conn).expect("version"), latest_version());

        assert!(apply_migrations(&mut conn).expect("re-run").is_empty());
    }
}
