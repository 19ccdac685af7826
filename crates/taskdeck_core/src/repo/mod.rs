//! Persistence abstractions and implementations.
//!
//! # Responsibility
//! - Define the key-value contract the stores persist through.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Repository APIs surface transport failures as `KvError`; they never
//!   decode or validate the stored blobs.

pub mod kv_repo;
