pub mod migrations;
pub mod models;
pub mod queries;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::Result;
use rusqlite::Connection;
use thiserror::Error;
use tracing::info;

/// Errors a moderation transition can surface to a handler. Anything that
/// is not a workflow violation folds into `Db`/`Internal`.
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("showcase not found")]
    NotFound,
    #[error("showcase was already decided")]
    AlreadyDecided,
    #[error(transparent)]
    Db(#[from] rusqlite::Error),
    #[error("{0}")]
    Internal(String),
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }

    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&mut conn)
    }

    /// Raw guard for operations with their own error type (the moderation
    /// transactions). Serializes writers, so concurrent approvals for the
    /// same profile cannot lose a coin increment.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, ModerationError> {
        self.conn
            .lock()
            .map_err(|e| ModerationError::Internal(format!("DB lock poisoned: {}", e)))
    }
}
