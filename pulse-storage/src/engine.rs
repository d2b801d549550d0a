//! StorageEngine — owns the ConnectionPool, runs migrations on open, and
//! implements the settings and analysis-queue seams.

use std::path::Path;

use chrono::Utc;
use rusqlite::Connection;

use pulse_core::errors::{ConfigError, PulseError, PulseResult};
use pulse_core::models::AnalysisTask;
use pulse_core::traits::{IAnalysisQueue, ISettings};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{queue_ops, settings_ops};

/// The main storage engine. Owns the connection pool; every job acquires
/// its connection scopes through it.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, use the read pool for read operations (file-backed mode).
    /// When false, route all reads through the writer (in-memory mode,
    /// because in-memory read pool connections are isolated databases).
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> PulseResult<Self> {
        let pool = ConnectionPool::open(path, 4)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing). Routes all reads
    /// through the writer since in-memory read pool connections can't see
    /// the writer's changes.
    pub fn open_in_memory() -> PulseResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations.
    fn initialize(&self) -> PulseResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| migrations::run_migrations(conn))
    }

    /// Get a reference to the connection pool (for advanced operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Execute a read-only query on the best available connection.
    /// File-backed: uses the read pool (no writer contention).
    /// In-memory: uses the writer (read pool is isolated).
    pub fn with_reader<F, T>(&self, f: F) -> PulseResult<T>
    where
        F: FnOnce(&Connection) -> PulseResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }

    /// Execute a write (or transaction) on the write connection.
    pub fn with_writer<F, T>(&self, f: F) -> PulseResult<T>
    where
        F: FnOnce(&Connection) -> PulseResult<T>,
    {
        self.pool.writer.with_conn_sync(f)
    }

    fn raw_setting(&self, key: &str) -> PulseResult<String> {
        let value = self.with_reader(|conn| settings_ops::get_setting(conn, key))?;
        value.ok_or_else(|| {
            PulseError::Config(ConfigError::SettingMissing {
                key: key.to_string(),
            })
        })
    }
}

impl ISettings for StorageEngine {
    fn get_number(&self, key: &str) -> PulseResult<f64> {
        let raw = self.raw_setting(key)?;
        raw.trim().parse::<f64>().map_err(|e| {
            PulseError::Config(ConfigError::SettingInvalid {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })
        })
    }

    fn get_integer(&self, key: &str) -> PulseResult<i64> {
        let raw = self.raw_setting(key)?;
        let trimmed = raw.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Ok(value);
        }
        // Seeded values are written through f64 formatting, so integral
        // settings may carry a trailing ".0" etc.
        match trimmed.parse::<f64>() {
            Ok(value) if value.fract() == 0.0 => Ok(value as i64),
            Ok(_) => Err(PulseError::Config(ConfigError::SettingInvalid {
                key: key.to_string(),
                value: raw.clone(),
                reason: "expected an integer".to_string(),
            })),
            Err(e) => Err(PulseError::Config(ConfigError::SettingInvalid {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })),
        }
    }
}

impl IAnalysisQueue for StorageEngine {
    fn enqueue(&self, task: &AnalysisTask) -> PulseResult<()> {
        self.with_writer(|conn| queue_ops::enqueue_task(conn, task, Utc::now()))
    }
}
