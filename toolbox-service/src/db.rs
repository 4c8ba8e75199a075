//! SQLite-backed document store.
//!
//! Each document is a JSON object stored in the `documents` table under its
//! kind. Filters are evaluated in SQL with the JSON1 functions.

mod documents;
mod schema;

use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

use tracing::debug;

use crate::error::{DatabaseError, ServiceResult};

/// Database manager for SQLite operations
pub struct Database {
    conn: Mutex<Connection>,
    name: Option<String>,
}

impl Database {
    /// Open the database file at `path`, creating the file, its directory and
    /// the document schema when missing.
    pub fn open(path: &Path, name: Option<String>) -> ServiceResult<Self> {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = dir {
            std::fs::create_dir_all(dir).map_err(|source| DatabaseError::Directory {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path).map_err(DatabaseError::Connection)?;
        let journal: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(DatabaseError::Query)?;
        schema::ensure_schema(&conn)?;

        debug!(
            path = %path.display(),
            name = ?name,
            journal = %journal,
            "Opened document database"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            name,
        })
    }

    /// Resolve a `DATABASE_URL` value to a file path.
    ///
    /// Accepts bare paths as well as `sqlite://` and `sqlite:` prefixed URLs.
    pub fn path_from_url(url: &str) -> &Path {
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        Path::new(path)
    }
}
