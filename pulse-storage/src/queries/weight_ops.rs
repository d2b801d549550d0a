//! Reads and the atomic update path for prediction weights.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use pulse_core::errors::PulseResult;
use pulse_core::factors::Factor;
use pulse_core::models::{Platform, PredictionWeight, WeightAuditEntry};

use super::parse_ts;
use crate::to_storage_err;

/// One factor's weight transition within a platform update.
#[derive(Debug, Clone)]
pub struct WeightChange {
    pub factor: Factor,
    pub old_weight: f64,
    pub new_weight: f64,
}

/// Current weights for one platform.
pub fn get_weights(conn: &Connection, platform: Platform) -> PulseResult<Vec<PredictionWeight>> {
    let mut stmt = conn
        .prepare(
            "SELECT factor_name, weight, updated_at
             FROM prediction_weights WHERE platform = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![platform.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut weights = Vec::new();
    for row in rows {
        let (factor_name, weight, updated_at) = row.map_err(|e| to_storage_err(e.to_string()))?;
        let Some(factor) = Factor::parse(&factor_name) else {
            // Unknown factor rows are skipped rather than failing reads.
            tracing::warn!(factor = %factor_name, "skipping unknown factor weight row");
            continue;
        };
        weights.push(PredictionWeight {
            platform,
            factor,
            weight,
            updated_at: parse_ts(&updated_at)?,
        });
    }
    Ok(weights)
}

/// Timestamp of the platform's latest audit row (the last weight change).
pub fn last_audit_time(
    conn: &Connection,
    platform: Platform,
) -> PulseResult<Option<DateTime<Utc>>> {
    let last: Option<String> = conn
        .query_row(
            "SELECT MAX(calculated_at) FROM weight_audit_log WHERE platform = ?1",
            params![platform.as_str()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .flatten();
    last.as_deref().map(parse_ts).transpose()
}

/// Apply a platform's full weight update: every factor's new weight plus
/// one audit row per factor, all in one transaction. A failure of any row
/// rolls back the whole platform update.
pub fn apply_weight_update(
    conn: &Connection,
    platform: Platform,
    changes: &[WeightChange],
    data_count: u32,
    metrics_count: u64,
    now: DateTime<Utc>,
) -> PulseResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("weight update begin: {e}")))?;

    match apply_weight_update_inner(&tx, platform, changes, data_count, metrics_count, now) {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("weight update commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn apply_weight_update_inner(
    conn: &Connection,
    platform: Platform,
    changes: &[WeightChange],
    data_count: u32,
    metrics_count: u64,
    now: DateTime<Utc>,
) -> PulseResult<()> {
    for change in changes {
        conn.execute(
            "INSERT INTO prediction_weights (platform, factor_name, weight, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (platform, factor_name) DO UPDATE SET
                 weight = excluded.weight,
                 updated_at = excluded.updated_at",
            params![
                platform.as_str(),
                change.factor.as_str(),
                change.new_weight,
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

        conn.execute(
            "INSERT INTO weight_audit_log
                 (platform, factor_name, old_weight, new_weight, data_count, metrics_count, calculated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                platform.as_str(),
                change.factor.as_str(),
                change.old_weight,
                change.new_weight,
                data_count,
                metrics_count as i64,
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}

/// Full audit trail for one platform, oldest first.
pub fn audit_entries(conn: &Connection, platform: Platform) -> PulseResult<Vec<WeightAuditEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT factor_name, old_weight, new_weight, data_count, metrics_count, calculated_at
             FROM weight_audit_log WHERE platform = ?1 ORDER BY id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![platform.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut entries = Vec::new();
    for row in rows {
        let (factor_name, old_weight, new_weight, data_count, metrics_count, calculated_at) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let Some(factor) = Factor::parse(&factor_name) else {
            continue;
        };
        entries.push(WeightAuditEntry {
            platform,
            factor,
            old_weight,
            new_weight,
            data_count: data_count as u32,
            metrics_count: metrics_count as u64,
            calculated_at: parse_ts(&calculated_at)?,
        });
    }
    Ok(entries)
}
