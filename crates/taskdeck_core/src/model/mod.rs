//! Domain model for tasks, settings and the signed-in user.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep construction and update rules next to the data they protect.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Identity and creation time are not reachable through partial updates.

pub mod settings;
pub mod task;
pub mod timestamp;
pub mod user;
