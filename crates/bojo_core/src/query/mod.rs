//! Read-only views over the item collection.
//!
//! # Responsibility
//! - Derive the "recent", "upcoming" and filtered lists shown to the user.
//! - Map user-facing display numbers back to item ids.
//!
//! # Invariants
//! - Functions here never mutate items or touch storage.
//! - Display numbers are 1-based positions in one produced list.

pub mod display;
pub mod views;
