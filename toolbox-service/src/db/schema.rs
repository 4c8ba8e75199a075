//! Database schema setup.

use rusqlite::Connection;

use crate::error::{DatabaseError, ServiceResult};

/// Create the document table if it does not exist yet.
///
/// `seq` gives documents a stable insertion order; `id` is the identifier
/// handed back to clients.
pub(super) fn ensure_schema(conn: &Connection) -> ServiceResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            kind TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_documents_kind ON documents(kind, seq);
    "#,
    )
    .map_err(|e| DatabaseError::Migration {
        message: e.to_string(),
    })?;

    Ok(())
}
