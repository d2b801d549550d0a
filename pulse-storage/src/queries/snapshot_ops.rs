//! Upserts, measurement writes, and aggregate reads for prediction
//! snapshots.
//!
//! Per-round column names come from exhaustive matches over
//! [`MeasurePoint`] — never from caller strings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use pulse_core::errors::PulseResult;
use pulse_core::models::{
    BaselineSource, FactorAdjustment, MeasurePoint, MeasurementTarget, OutcomeObservation,
    Platform, PredictionSnapshot, PublicationStatus,
};

use super::{metric_ops, parse_ts, publication_ops};
use crate::to_storage_err;

/// Column holding the observed actual for one round.
fn actual_column(point: MeasurePoint) -> &'static str {
    match point {
        MeasurePoint::Initial => "actual_48h",
        MeasurePoint::Primary => "actual_7d",
        MeasurePoint::Extended => "actual_30d",
    }
}

/// Column holding the prediction error for one round, if the round
/// defines one.
fn error_column(point: MeasurePoint) -> Option<&'static str> {
    match point {
        MeasurePoint::Initial => None,
        MeasurePoint::Primary => Some("error_7d"),
        MeasurePoint::Extended => Some("error_30d"),
    }
}

/// Upsert a snapshot, keyed by publication. Measurement columns are not
/// touched by the upsert; re-forecasting a publication keeps its recorded
/// outcomes.
pub fn upsert_snapshot(conn: &Connection, snapshot: &PredictionSnapshot) -> PulseResult<()> {
    let adjustments_json = serde_json::to_string(&snapshot.adjustments)
        .map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO prediction_snapshots
             (publication_id, content_id, account_id, baseline_used, baseline_source,
              adjustments, total_adjustment, predicted_impressions, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT (publication_id) DO UPDATE SET
             baseline_used = excluded.baseline_used,
             baseline_source = excluded.baseline_source,
             adjustments = excluded.adjustments,
             total_adjustment = excluded.total_adjustment,
             predicted_impressions = excluded.predicted_impressions,
             updated_at = excluded.updated_at",
        params![
            snapshot.publication_id,
            snapshot.content_id,
            snapshot.account_id,
            snapshot.baseline_used,
            snapshot.baseline_source.as_str(),
            adjustments_json,
            snapshot.total_adjustment,
            snapshot.predicted_impressions,
            snapshot.created_at.to_rfc3339(),
            snapshot.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get the snapshot for one publication.
pub fn get_snapshot(
    conn: &Connection,
    publication_id: i64,
) -> PulseResult<Option<PredictionSnapshot>> {
    let mut stmt = conn
        .prepare(
            "SELECT publication_id, content_id, account_id, baseline_used, baseline_source,
                    adjustments, total_adjustment, predicted_impressions,
                    actual_48h, actual_7d, actual_30d, error_7d, error_30d,
                    created_at, updated_at
             FROM prediction_snapshots WHERE publication_id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let row = stmt
        .query_row(params![publication_id], |row| {
            Ok(RawSnapshot {
                publication_id: row.get(0)?,
                content_id: row.get(1)?,
                account_id: row.get(2)?,
                baseline_used: row.get(3)?,
                baseline_source: row.get(4)?,
                adjustments: row.get(5)?,
                total_adjustment: row.get(6)?,
                predicted_impressions: row.get(7)?,
                actual_48h: row.get(8)?,
                actual_7d: row.get(9)?,
                actual_30d: row.get(10)?,
                error_7d: row.get(11)?,
                error_30d: row.get(12)?,
                created_at: row.get(13)?,
                updated_at: row.get(14)?,
            })
        })
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    row.map(RawSnapshot::into_snapshot).transpose()
}

struct RawSnapshot {
    publication_id: i64,
    content_id: String,
    account_id: String,
    baseline_used: f64,
    baseline_source: String,
    adjustments: String,
    total_adjustment: f64,
    predicted_impressions: f64,
    actual_48h: Option<i64>,
    actual_7d: Option<i64>,
    actual_30d: Option<i64>,
    error_7d: Option<f64>,
    error_30d: Option<f64>,
    created_at: String,
    updated_at: String,
}

impl RawSnapshot {
    fn into_snapshot(self) -> PulseResult<PredictionSnapshot> {
        let adjustments: BTreeMap<pulse_core::Factor, FactorAdjustment> =
            serde_json::from_str(&self.adjustments).map_err(|e| to_storage_err(e.to_string()))?;
        Ok(PredictionSnapshot {
            publication_id: self.publication_id,
            content_id: self.content_id,
            account_id: self.account_id,
            baseline_used: self.baseline_used,
            baseline_source: BaselineSource::parse(&self.baseline_source).ok_or_else(|| {
                to_storage_err(format!("unknown baseline source {:?}", self.baseline_source))
            })?,
            adjustments,
            total_adjustment: self.total_adjustment,
            predicted_impressions: self.predicted_impressions,
            actual_initial: self.actual_48h.map(|v| v as u64),
            actual_primary: self.actual_7d.map(|v| v as u64),
            actual_extended: self.actual_30d.map(|v| v as u64),
            error_primary: self.error_7d,
            error_extended: self.error_30d,
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
        })
    }
}

/// Publications due for outcome collection in one round: the round's
/// actual column is still NULL, the publication is live, and its posting
/// time plus the round delay has elapsed (posted_at <= cutoff).
pub fn pending_targets(
    conn: &Connection,
    point: MeasurePoint,
    cutoff: DateTime<Utc>,
) -> PulseResult<Vec<MeasurementTarget>> {
    let sql = format!(
        "SELECT p.id, p.account_id, p.platform, ps.content_id, p.posted_at,
                ps.predicted_impressions
         FROM publications p
         JOIN prediction_snapshots ps ON ps.publication_id = p.id
         WHERE ps.{} IS NULL
           AND p.status = 'posted'
           AND p.posted_at IS NOT NULL
           AND p.posted_at <= ?1
         ORDER BY p.posted_at ASC",
        actual_column(point)
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![cutoff.to_rfc3339()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, f64>(5)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut targets = Vec::new();
    for row in rows {
        let (publication_id, account_id, platform, content_id, posted_at, predicted) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        targets.push(MeasurementTarget {
            publication_id,
            account_id,
            platform: Platform::parse(&platform)
                .ok_or_else(|| to_storage_err(format!("unknown platform {platform:?}")))?,
            content_id,
            posted_at: parse_ts(&posted_at)?,
            predicted_impressions: predicted,
        });
    }
    Ok(targets)
}

/// Record one round's outcome for one publication: the actual value (and
/// error, for rounds that define one) on the snapshot, the metrics upsert,
/// and the final-round status transition — all in one transaction.
///
/// The snapshot update is conditional on the round column still being
/// NULL, so re-running a job is provably a no-op once a round is filled.
/// Returns whether the round was actually recorded.
pub fn record_measurement(
    conn: &Connection,
    publication_id: i64,
    point: MeasurePoint,
    observation: &OutcomeObservation,
    error: Option<f64>,
    now: DateTime<Utc>,
) -> PulseResult<bool> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("record measurement begin: {e}")))?;

    let recorded =
        match record_measurement_inner(&tx, publication_id, point, observation, error, now) {
            Ok(recorded) => recorded,
            Err(e) => {
                let _ = tx.rollback();
                return Err(e);
            }
        };

    tx.commit()
        .map_err(|e| to_storage_err(format!("record measurement commit: {e}")))?;
    Ok(recorded)
}

fn record_measurement_inner(
    conn: &Connection,
    publication_id: i64,
    point: MeasurePoint,
    observation: &OutcomeObservation,
    error: Option<f64>,
    now: DateTime<Utc>,
) -> PulseResult<bool> {
    let actual = actual_column(point);
    let updated = match (error_column(point), error) {
        (Some(err_col), Some(error)) => conn
            .execute(
                &format!(
                    "UPDATE prediction_snapshots
                     SET {actual} = ?1, {err_col} = ?2, updated_at = ?3
                     WHERE publication_id = ?4 AND {actual} IS NULL"
                ),
                params![
                    observation.views as i64,
                    error,
                    now.to_rfc3339(),
                    publication_id
                ],
            )
            .map_err(|e| to_storage_err(e.to_string()))?,
        _ => conn
            .execute(
                &format!(
                    "UPDATE prediction_snapshots
                     SET {actual} = ?1, updated_at = ?2
                     WHERE publication_id = ?3 AND {actual} IS NULL"
                ),
                params![observation.views as i64, now.to_rfc3339(), publication_id],
            )
            .map_err(|e| to_storage_err(e.to_string()))?,
    };

    if updated == 0 {
        // Round already filled; nothing else to write.
        return Ok(false);
    }

    metric_ops::upsert_metric(
        conn,
        &pulse_core::models::OutcomeMetric {
            publication_id,
            point,
            views: observation.views,
            likes: observation.likes,
            comments: observation.comments,
            shares: observation.shares,
            engagement_rate: observation.engagement_rate,
            measured_at: now,
        },
    )?;

    if point.is_final() {
        publication_ops::set_status(conn, publication_id, PublicationStatus::Measured, now)?;
    }

    Ok(true)
}

/// Cross-account aggregate: mean of `actual / baseline − 1.0` and sample
/// count over other accounts on the same platform that published the same
/// content, at one round. `None` when there are no qualifying rows.
pub fn cross_account_aggregate(
    conn: &Connection,
    content_id: &str,
    platform: Platform,
    exclude_account_id: &str,
    point: MeasurePoint,
) -> PulseResult<Option<(f64, u32)>> {
    let row: (Option<f64>, i64) = conn
        .query_row(
            "SELECT AVG(CAST(m.views AS REAL) / ps.baseline_used - 1.0), COUNT(*)
             FROM prediction_snapshots ps
             JOIN publications p ON p.id = ps.publication_id
             JOIN metrics m ON m.publication_id = p.id AND m.measure_point = ?4
             WHERE ps.content_id = ?1
               AND p.platform = ?2
               AND ps.account_id != ?3
               AND ps.baseline_used > 0",
            params![
                content_id,
                platform.as_str(),
                exclude_account_id,
                point.label()
            ],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    match row {
        (Some(avg), count) if count > 0 => Ok(Some((avg, count as u32))),
        _ => Ok(None),
    }
}

/// One errored snapshot joined with its primary-round outcome, feeding the
/// weight learner's error correlation.
#[derive(Debug, Clone)]
pub struct ErroredSnapshotRow {
    pub publication_id: i64,
    pub adjustments_json: String,
    pub actual: f64,
    pub baseline: f64,
}

/// Snapshots for one platform with a known primary-round error, created
/// after `since`.
pub fn errored_snapshot_rows(
    conn: &Connection,
    platform: Platform,
    since: DateTime<Utc>,
) -> PulseResult<Vec<ErroredSnapshotRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT ps.publication_id, ps.adjustments, m.views, ps.baseline_used
             FROM prediction_snapshots ps
             JOIN publications p ON p.id = ps.publication_id
             JOIN metrics m ON m.publication_id = p.id AND m.measure_point = ?2
             WHERE p.platform = ?1 AND ps.error_7d IS NOT NULL AND ps.created_at >= ?3",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(
            params![
                platform.as_str(),
                MeasurePoint::Primary.label(),
                since.to_rfc3339()
            ],
            |row| {
                Ok(ErroredSnapshotRow {
                    publication_id: row.get(0)?,
                    adjustments_json: row.get(1)?,
                    actual: row.get::<_, i64>(2)? as f64,
                    baseline: row.get(3)?,
                })
            },
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(out)
}

/// Snapshots whose actual for one round is recorded but whose error is
/// still NULL (error backfill).
pub fn missing_error_rows(
    conn: &Connection,
    point: MeasurePoint,
) -> PulseResult<Vec<(i64, f64, u64)>> {
    let Some(err_col) = error_column(point) else {
        return Ok(Vec::new());
    };
    let actual = actual_column(point);
    let sql = format!(
        "SELECT publication_id, predicted_impressions, {actual}
         FROM prediction_snapshots
         WHERE {actual} IS NOT NULL AND {err_col} IS NULL"
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (publication_id, predicted, actual) = row.map_err(|e| to_storage_err(e.to_string()))?;
        out.push((publication_id, predicted, actual as u64));
    }
    Ok(out)
}

/// Write one round's error without touching the actual (error backfill).
pub fn set_error(
    conn: &Connection,
    publication_id: i64,
    point: MeasurePoint,
    error: f64,
    now: DateTime<Utc>,
) -> PulseResult<()> {
    let Some(err_col) = error_column(point) else {
        return Ok(());
    };
    conn.execute(
        &format!(
            "UPDATE prediction_snapshots
             SET {err_col} = ?1, updated_at = ?2
             WHERE publication_id = ?3"
        ),
        params![error, now.to_rfc3339(), publication_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
