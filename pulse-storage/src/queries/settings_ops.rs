//! Reads and writes for the system_settings table.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use pulse_core::errors::PulseResult;

use crate::to_storage_err;

/// Get the raw value of one setting.
pub fn get_setting(conn: &Connection, key: &str) -> PulseResult<Option<String>> {
    conn.query_row(
        "SELECT setting_value FROM system_settings WHERE setting_key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Set (or override) one setting.
pub fn set_setting(
    conn: &Connection,
    key: &str,
    value: &str,
    now: DateTime<Utc>,
) -> PulseResult<()> {
    conn.execute(
        "INSERT INTO system_settings (setting_key, setting_value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (setting_key) DO UPDATE SET
             setting_value = excluded.setting_value,
             updated_at = excluded.updated_at",
        params![key, value, now.to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Delete one setting (tests and operator tooling).
pub fn delete_setting(conn: &Connection, key: &str) -> PulseResult<()> {
    conn.execute(
        "DELETE FROM system_settings WHERE setting_key = ?1",
        params![key],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
