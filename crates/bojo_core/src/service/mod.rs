//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate item store, display snapshot and query views into use cases.
//! - Map layer errors onto the user-facing error taxonomy.
//!
//! # Invariants
//! - Services never bypass repository validation or commit contracts.
//! - Free-text time parsing happens only through an injected `TimeResolver`.

pub mod error;
pub mod journal_service;
pub mod schedule;
