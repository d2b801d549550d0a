//! Versioned schema migrations sequenced by PRAGMA user_version.

mod v001_core_tables;
mod v002_forecast_tables;
mod v003_settings;
mod v004_analysis_queue;

use rusqlite::Connection;

use pulse_core::errors::{PulseError, PulseResult, StorageError};

use crate::to_storage_err;

type Migration = fn(&Connection) -> PulseResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[
    (1, v001_core_tables::migrate),
    (2, v002_forecast_tables::migrate),
    (3, v003_settings::migrate),
    (4, v004_analysis_queue::migrate),
];

/// Run every migration newer than the database's current user_version.
pub fn run_migrations(conn: &Connection) -> PulseResult<()> {
    let current: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (version, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        migrate(conn).map_err(|e| {
            PulseError::Storage(StorageError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })
        })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| to_storage_err(e.to_string()))?;
        tracing::info!(version, "applied migration");
    }
    Ok(())
}

/// Latest schema version this build knows about.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|(v, _)| *v).unwrap_or(0)
}
