//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open the journal file (or an in-memory journal for tests).
//! - Configure pragmas the item store relies on.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and `synchronous=FULL`.
//! - Returned connections have migrations fully applied.

use super::migrations::{apply_migrations, latest_version};
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// File name of the journal database inside the root directory.
pub const DB_FILE_NAME: &str = "db.sqlite3";

/// Opens `<root>/db.sqlite3`, creating the root directory when missing.
///
/// # Side effects
/// - Creates `root` (mode 0700 on Unix) if it does not exist.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(root: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let root = root.as_ref();
    info!("event=db_open module=db status=start mode=file");

    if let Err(err) = ensure_root_dir(root) {
        error!(
            "event=db_open module=db status=error mode=file duration_ms={} error_code=root_dir_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err.into());
    }

    let conn = match Connection::open(root.join(DB_FILE_NAME)) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, "file", started_at)
}

/// Opens an in-memory journal and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, "memory", started_at)
}

fn finish_open(mut conn: Connection, mode: &str, started_at: Instant) -> DbResult<Connection> {
    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA synchronous = FULL;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    let applied = apply_migrations(conn)?;
    if !applied.is_empty() {
        info!(
            "event=db_migrate module=db status=ok applied={} version={}",
            applied.len(),
            latest_version()
        );
    }
    Ok(())
}

#[cfg(unix)]
fn ensure_root_dir(root: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    if root.is_dir() {
        return Ok(());
    }
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(root)
}

#[cfg(not(unix))]
fn ensure_root_dir(root: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(root)
}
