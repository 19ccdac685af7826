//! SQLite backing for device key-value storage.
//!
//! Connections handed out here already carry the `kv_entries` table at
//! [`schema::SCHEMA_VERSION`]. Failures surface as
//! [`KvError`](crate::repo::kv_repo::KvError) so callers see one storage
//! error type.

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
