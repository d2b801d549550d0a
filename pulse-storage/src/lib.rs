//! # pulse-storage
//!
//! SQLite persistence for the prediction/measurement loop: connection
//! pool (single writer + read pool, WAL), versioned migrations, raw-SQL
//! query modules, and the [`StorageEngine`] façade that implements the
//! settings and analysis-queue seams.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;
pub use pool::ConnectionPool;

use pulse_core::errors::{PulseError, StorageError};

/// Map a low-level storage failure message into a PulseError.
pub(crate) fn to_storage_err(message: String) -> PulseError {
    PulseError::Storage(StorageError::SqliteError { message })
}
