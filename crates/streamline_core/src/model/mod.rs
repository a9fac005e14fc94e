//! Domain model for tracked events.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own validation rules shared by every write and read path.
//!
//! # Invariants
//! - Every event is identified by a stable `EventId`.
//! - Deletion is a hard delete; there is no edit-in-place.

pub mod event;
