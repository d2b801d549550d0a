//! Upserts and aggregate reads over the metrics table.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use pulse_core::errors::PulseResult;
use pulse_core::models::{MeasurePoint, OutcomeMetric, Platform};

use super::parse_ts;
use crate::to_storage_err;

/// Upsert one observation, keyed (publication, measure_point).
/// Repeated collection for the same round never duplicates rows.
pub fn upsert_metric(conn: &Connection, metric: &OutcomeMetric) -> PulseResult<()> {
    conn.execute(
        "INSERT INTO metrics
             (publication_id, measure_point, views, likes, comments, shares, engagement_rate, measured_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT (publication_id, measure_point) DO UPDATE SET
             views = excluded.views,
             likes = excluded.likes,
             comments = excluded.comments,
             shares = excluded.shares,
             engagement_rate = excluded.engagement_rate,
             measured_at = excluded.measured_at",
        params![
            metric.publication_id,
            metric.point.label(),
            metric.views as i64,
            metric.likes.map(|v| v as i64),
            metric.comments.map(|v| v as i64),
            metric.shares.map(|v| v as i64),
            metric.engagement_rate,
            metric.measured_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get one observation by (publication, round).
pub fn get_metric(
    conn: &Connection,
    publication_id: i64,
    point: MeasurePoint,
) -> PulseResult<Option<OutcomeMetric>> {
    let mut stmt = conn
        .prepare(
            "SELECT publication_id, views, likes, comments, shares, engagement_rate, measured_at
             FROM metrics WHERE publication_id = ?1 AND measure_point = ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let row = stmt
        .query_row(params![publication_id, point.label()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, Option<i64>>(4)?,
                row.get::<_, Option<f64>>(5)?,
                row.get::<_, String>(6)?,
            ))
        })
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((publication_id, views, likes, comments, shares, engagement_rate, measured_at)) = row
    else {
        return Ok(None);
    };
    Ok(Some(OutcomeMetric {
        publication_id,
        point,
        views: views as u64,
        likes: likes.map(|v| v as u64),
        comments: comments.map(|v| v as u64),
        shares: shares.map(|v| v as u64),
        engagement_rate,
        measured_at: parse_ts(&measured_at)?,
    }))
}

/// Total outcome rows recorded for a platform (tier determination).
pub fn count_for_platform(conn: &Connection, platform: Platform) -> PulseResult<u64> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*)
             FROM metrics m
             JOIN publications p ON p.id = m.publication_id
             WHERE p.platform = ?1",
            params![platform.as_str()],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as u64)
}

/// Outcome rows recorded for a platform after a point in time
/// (new-data gating).
pub fn count_for_platform_since(
    conn: &Connection,
    platform: Platform,
    since: DateTime<Utc>,
) -> PulseResult<u64> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*)
             FROM metrics m
             JOIN publications p ON p.id = m.publication_id
             WHERE p.platform = ?1 AND m.measured_at > ?2",
            params![platform.as_str(), since.to_rfc3339()],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as u64)
}

/// Mean views and sample count from an account's own history at one round,
/// within a trailing window (real-time baseline fallback).
pub fn own_history_stats(
    conn: &Connection,
    account_id: &str,
    point: MeasurePoint,
    cutoff: DateTime<Utc>,
) -> PulseResult<Option<(f64, u32)>> {
    let row: (Option<f64>, i64) = conn
        .query_row(
            "SELECT AVG(CAST(m.views AS REAL)), COUNT(*)
             FROM metrics m
             JOIN publications p ON p.id = m.publication_id
             WHERE p.account_id = ?1 AND m.measure_point = ?2 AND m.measured_at >= ?3",
            params![account_id, point.label(), cutoff.to_rfc3339()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    match row {
        (Some(avg), count) if count > 0 => Ok(Some((avg, count as u32))),
        _ => Ok(None),
    }
}

/// One outcome row joined with its account, for baseline estimation.
#[derive(Debug, Clone)]
pub struct BaselineSample {
    pub account_id: String,
    pub platform: Platform,
    pub niche: Option<String>,
    pub account_created_at: DateTime<Utc>,
    pub views: f64,
    pub measured_at: DateTime<Utc>,
}

/// All outcome rows of active accounts at one round within the cohort
/// window, joined with account attributes.
pub fn baseline_samples(
    conn: &Connection,
    point: MeasurePoint,
    cutoff: DateTime<Utc>,
) -> PulseResult<Vec<BaselineSample>> {
    let mut stmt = conn
        .prepare(
            "SELECT a.account_id, a.platform, a.niche, a.created_at, m.views, m.measured_at
             FROM accounts a
             JOIN publications p ON p.account_id = a.account_id
             JOIN metrics m ON m.publication_id = p.id
             WHERE a.status = 'active' AND m.measure_point = ?1 AND m.measured_at >= ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![point.label(), cutoff.to_rfc3339()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut samples = Vec::new();
    for row in rows {
        let (account_id, platform, niche, created_at, views, measured_at) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        samples.push(BaselineSample {
            account_id,
            platform: Platform::parse(&platform)
                .ok_or_else(|| to_storage_err(format!("unknown platform {platform:?}")))?,
            niche,
            account_created_at: parse_ts(&created_at)?,
            views: views as f64,
            measured_at: parse_ts(&measured_at)?,
        });
    }
    Ok(samples)
}
