//! Journal domain model.
//!
//! # Responsibility
//! - Define the canonical item record and its marker vocabularies.
//! - Keep glyph tables fixed so rendering and parsing agree.
//!
//! # Invariants
//! - Every item is identified by a stable, never reused `ItemId`.
//! - `ItemState` and `Signifier` are independent axes.

pub mod item;
pub mod marker;
