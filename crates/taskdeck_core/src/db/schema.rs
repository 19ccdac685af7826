//! `kv_entries` schema upgrades and shape check.
//!
//! # Invariants
//! - `PRAGMA user_version` records the applied schema step.
//! - A database stamped newer than [`SCHEMA_VERSION`] is never touched.
//! - After `ensure_kv_schema` returns `Ok`, `kv_entries` has the
//!   `key`, `value` and `updated_at` columns.

use crate::repo::kv_repo::{KvError, KvResult};
use log::info;
use rusqlite::Connection;

/// Columns the key-value queries rely on.
const KV_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

/// Ordered upgrade steps; step `n` lifts `user_version` from `n - 1` to `n`.
const STEPS: &[&str] = &[include_str!("kv_entries_v1.sql")];

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = STEPS.len() as u32;

/// Brings `conn` up to [`SCHEMA_VERSION`] and checks the table shape.
///
/// Returns the version found before upgrading.
pub fn ensure_kv_schema(conn: &mut Connection) -> KvResult<u32> {
    let found = stored_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(KvError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    if found < SCHEMA_VERSION {
        let tx = conn.transaction()?;
        for (index, sql) in STEPS.iter().enumerate().skip(found as usize) {
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", index as u32 + 1)?;
        }
        tx.commit()?;
        info!(
            "event=kv_schema_upgrade module=db status=ok from_version={found} to_version={SCHEMA_VERSION}"
        );
    }

    check_kv_columns(conn)?;
    Ok(found)
}

/// Reads `PRAGMA user_version`.
pub fn stored_version(conn: &Connection) -> KvResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

fn check_kv_columns(conn: &Connection) -> KvResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('kv_entries');")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    match KV_COLUMNS
        .iter()
        .find(|expected| !columns.iter().any(|column| column.as_str() == **expected))
    {
        Some(missing) => Err(KvError::SchemaMismatch(format!(
            "kv_entries is missing column `{missing}`"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{ensure_kv_schema, stored_version, SCHEMA_VERSION};
    use crate::repo::kv_repo::KvError;
    use rusqlite::Connection;

    #[test]
    fn fresh_database_is_upgraded_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(ensure_kv_schema(&mut conn).unwrap(), 0);
        assert_eq!(stored_version(&conn).unwrap(), SCHEMA_VERSION);
        assert_eq!(ensure_kv_schema(&mut conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn mismatched_table_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE kv_entries (key TEXT PRIMARY KEY, payload TEXT);
             PRAGMA user_version = 1;",
        )
        .unwrap();

        let err = ensure_kv_schema(&mut conn).unwrap_err();
        assert!(matches!(err, KvError::SchemaMismatch(ref message) if message.contains("value")));
    }
}
