//! Core session stores.
//!
//! # Responsibility
//! - Own in-memory app state and mediate every mutation of it.
//! - Persist through `KeyValueStore` without exposing storage to callers.
//!
//! # Invariants
//! - Stores are constructed explicitly and owned by the caller; there is no
//!   global instance.
//! - Each store writes a single storage key.

pub mod session_store;
pub mod settings_store;
pub mod task_store;
