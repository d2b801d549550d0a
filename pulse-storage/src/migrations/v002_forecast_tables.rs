//! v002: account_baselines, adjustment_factor_cache, prediction_weights,
//! weight_audit_log, prediction_snapshots. Seeds uniform weights for every
//! platform × factor.

use rusqlite::{params, Connection};

use pulse_core::errors::PulseResult;
use pulse_core::factors::Factor;
use pulse_core::models::Platform;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> PulseResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS account_baselines (
            account_id           TEXT PRIMARY KEY REFERENCES accounts(account_id),
            baseline_impressions REAL NOT NULL,
            source               TEXT NOT NULL,
            sample_count         INTEGER NOT NULL,
            window_start         TEXT NOT NULL,
            window_end           TEXT NOT NULL,
            calculated_at        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS adjustment_factor_cache (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            platform      TEXT NOT NULL,
            factor_name   TEXT NOT NULL,
            factor_value  TEXT NOT NULL,
            adjustment    REAL NOT NULL,
            sample_count  INTEGER NOT NULL,
            is_active     INTEGER NOT NULL DEFAULT 0,
            calculated_at TEXT NOT NULL,
            UNIQUE (platform, factor_name, factor_value)
        );

        CREATE INDEX IF NOT EXISTS idx_factor_cache_lookup
            ON adjustment_factor_cache(platform, factor_name, is_active);

        CREATE TABLE IF NOT EXISTS prediction_weights (
            platform    TEXT NOT NULL,
            factor_name TEXT NOT NULL,
            weight      REAL NOT NULL,
            updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (platform, factor_name)
        );

        CREATE TABLE IF NOT EXISTS weight_audit_log (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            platform      TEXT NOT NULL,
            factor_name   TEXT NOT NULL,
            old_weight    REAL NOT NULL,
            new_weight    REAL NOT NULL,
            data_count    INTEGER NOT NULL,
            metrics_count INTEGER NOT NULL,
            calculated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_weight_audit_platform
            ON weight_audit_log(platform, calculated_at);

        CREATE TABLE IF NOT EXISTS prediction_snapshots (
            publication_id       INTEGER PRIMARY KEY REFERENCES publications(id),
            content_id           TEXT NOT NULL,
            account_id           TEXT NOT NULL,
            baseline_used        REAL NOT NULL,
            baseline_source      TEXT NOT NULL,
            adjustments          TEXT NOT NULL DEFAULT '{}',
            total_adjustment     REAL NOT NULL,
            predicted_impressions REAL NOT NULL,
            actual_48h           INTEGER,
            actual_7d            INTEGER,
            actual_30d           INTEGER,
            error_7d             REAL,
            error_30d            REAL,
            created_at           TEXT NOT NULL,
            updated_at           TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_snapshots_content ON prediction_snapshots(content_id);
        CREATE INDEX IF NOT EXISTS idx_snapshots_account ON prediction_snapshots(account_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    // Seed uniform weights so a freshly created database can predict
    // before the first recalculation.
    for platform in Platform::ALL {
        for factor in Factor::ALL {
            conn.execute(
                "INSERT OR IGNORE INTO prediction_weights (platform, factor_name, weight)
                 VALUES (?1, ?2, ?3)",
                params![platform.as_str(), factor.as_str(), Factor::uniform_weight()],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        }
    }

    Ok(())
}
