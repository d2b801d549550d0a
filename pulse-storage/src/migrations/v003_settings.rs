//! v003: system_settings, seeded with every named default.
//!
//! Seeding uses INSERT OR IGNORE so operator overrides survive re-running
//! migrations on an existing database.

use rusqlite::{params, Connection};

use pulse_core::config::defaults;
use pulse_core::errors::PulseResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PulseResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS system_settings (
            setting_key   TEXT PRIMARY KEY,
            setting_value TEXT NOT NULL,
            description   TEXT NOT NULL DEFAULT '',
            updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    for (key, value, description) in defaults::seed_values() {
        conn.execute(
            "INSERT OR IGNORE INTO system_settings (setting_key, setting_value, description)
             VALUES (?1, ?2, ?3)",
            params![key, value.to_string(), description],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }

    Ok(())
}
