//! The single write connection, serialized behind a mutex.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use pulse_core::errors::{PulseError, PulseResult, StorageError};

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// Owns the one connection allowed to write.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open the write connection to the given database path.
    pub fn open(path: &Path) -> PulseResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory write connection (for testing).
    pub fn open_in_memory() -> PulseResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure with exclusive access to the write connection.
    pub fn with_conn_sync<F, T>(&self, f: F) -> PulseResult<T>
    where
        F: FnOnce(&Connection) -> PulseResult<T>,
    {
        let guard = self.conn.lock().map_err(|e| {
            PulseError::Storage(StorageError::LockPoisoned {
                message: e.to_string(),
            })
        })?;
        f(&guard)
    }
}
