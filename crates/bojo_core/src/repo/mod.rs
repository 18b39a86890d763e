//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the item store contract used by services.
//! - Isolate SQLite query details from orchestration code.
//!
//! # Invariants
//! - Item writes call `NewItem::validate()` before any SQL mutation.
//! - Every mutating call commits before it returns.

pub mod display_repo;
pub mod item_repo;
