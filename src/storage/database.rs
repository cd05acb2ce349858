//! `SQLite` database connection.
//!
//! The database lives at `~/.jornada/jornada.db` and holds the key-value
//! table behind the configuration and state stores.

use rusqlite::Connection;

use crate::error::JornadaError;

use super::migrations;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at a specific path.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &std::path::Path) -> Result<Self, JornadaError> {
        let conn = Connection::open(path).map_err(|e| {
            JornadaError::Database(format!("Failed to open database {}: {e}", path.display()))
        })?;

        // Another process may be mid-write when a timer host polls.
        conn.busy_timeout(std::time::Duration::from_millis(500))
            .map_err(|e| JornadaError::Database(format!("Failed to set busy timeout: {e}")))?;

        let db = Self { conn };
        db.migrate()?;

        Ok(db)
    }

    /// Open an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, JornadaError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            JornadaError::Database(format!("Failed to open in-memory database: {e}"))
        })?;

        let db = Self { conn };
        db.migrate()?;

        Ok(db)
    }

    fn migrate(&self) -> Result<(), JornadaError> {
        migrations::run(&self.conn)
    }

    /// Counter that changes whenever another connection commits to this
    /// database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the pragma cannot be read.
    pub fn data_version(&self) -> Result<i64, JornadaError> {
        self.conn
            .query_row("PRAGMA data_version", [], |row| row.get(0))
            .map_err(|e| JornadaError::Database(format!("Failed to read data version: {e}")))
    }

    /// Get a reference to the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
