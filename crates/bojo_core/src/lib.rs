//! Core domain logic for the bojo bullet journal.
//! This crate is the single source of truth for item invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use config::Settings;
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{Item, ItemId, ItemValidationError, NewItem};
pub use model::marker::{
    parse_marker, parse_signifier, parse_state, ItemState, Marker, MarkerParseError, Signifier,
};
pub use query::display::{
    resolve_display_number, DisplayEntry, DisplayList, DisplaySnapshot, RangeError,
};
pub use query::views::{recent, upcoming};
pub use repo::display_repo::{DisplayStore, SqliteDisplayStore};
pub use repo::item_repo::{
    now_epoch_ms, ExportedItem, ItemStore, RepoError, RepoResult, SqliteItemStore,
};
pub use service::error::{JournalError, JournalResult};
pub use service::journal_service::{AddItem, ItemRef, JournalService, ListView};
pub use service::schedule::{TimeParseError, TimeResolver};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
