//! Upserts, lookups, and sample reads for the adjustment factor cache.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use pulse_core::errors::PulseResult;
use pulse_core::factors::Factor;
use pulse_core::models::{FactorCacheEntry, MeasurePoint, Platform};

use super::parse_ts;
use crate::to_storage_err;

/// Upsert one cache entry, fully replacing the previous value for its
/// (platform, factor, value) triple.
pub fn upsert_entry(conn: &Connection, entry: &FactorCacheEntry) -> PulseResult<()> {
    conn.execute(
        "INSERT INTO adjustment_factor_cache
             (platform, factor_name, factor_value, adjustment, sample_count, is_active, calculated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (platform, factor_name, factor_value) DO UPDATE SET
             adjustment = excluded.adjustment,
             sample_count = excluded.sample_count,
             is_active = excluded.is_active,
             calculated_at = excluded.calculated_at",
        params![
            entry.platform.as_str(),
            entry.factor.as_str(),
            entry.factor_value,
            entry.adjustment,
            entry.sample_count,
            entry.is_active as i32,
            entry.calculated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Adjustment for one (platform, factor, value), active entries only.
/// Inactive entries never influence predictions.
pub fn get_active_adjustment(
    conn: &Connection,
    platform: Platform,
    factor: Factor,
    value: &str,
) -> PulseResult<Option<f64>> {
    conn.query_row(
        "SELECT adjustment FROM adjustment_factor_cache
         WHERE platform = ?1 AND factor_name = ?2 AND factor_value = ?3 AND is_active = 1",
        params![platform.as_str(), factor.as_str(), value],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// All cache entries for one (platform, factor), active or not.
pub fn list_entries(
    conn: &Connection,
    platform: Platform,
    factor: Factor,
) -> PulseResult<Vec<FactorCacheEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT factor_value, adjustment, sample_count, is_active, calculated_at
             FROM adjustment_factor_cache
             WHERE platform = ?1 AND factor_name = ?2
             ORDER BY factor_value",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![platform.as_str(), factor.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut entries = Vec::new();
    for row in rows {
        let (factor_value, adjustment, sample_count, is_active, calculated_at) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        entries.push(FactorCacheEntry {
            platform,
            factor,
            factor_value,
            adjustment,
            sample_count: sample_count as u32,
            is_active: is_active != 0,
            calculated_at: parse_ts(&calculated_at)?,
        });
    }
    Ok(entries)
}

/// One snapshot-joined outcome row feeding the cache builder.
#[derive(Debug, Clone)]
pub struct CacheSampleRow {
    pub content_id: String,
    pub account_id: String,
    pub niche: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub hook_type: Option<String>,
    pub narrative_structure: Option<String>,
    pub duration_seconds: Option<f64>,
    pub bgm_category: Option<String>,
    pub actual: f64,
    pub baseline: f64,
}

/// All snapshot-joined outcomes for one platform at one round, within the
/// trailing window, with positive baselines.
pub fn sample_rows(
    conn: &Connection,
    platform: Platform,
    point: MeasurePoint,
    cutoff: DateTime<Utc>,
) -> PulseResult<Vec<CacheSampleRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT ps.content_id, ps.account_id, a.niche, p.posted_at, p.tags,
                    c.hook_type, c.narrative_structure, c.duration_seconds, c.bgm_category,
                    m.views, ps.baseline_used
             FROM prediction_snapshots ps
             JOIN publications p ON p.id = ps.publication_id
             JOIN accounts a ON a.account_id = ps.account_id
             JOIN content c ON c.content_id = ps.content_id
             JOIN metrics m ON m.publication_id = p.id AND m.measure_point = ?2
             WHERE p.platform = ?1 AND ps.created_at >= ?3 AND ps.baseline_used > 0",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(
            params![platform.as_str(), point.label(), cutoff.to_rfc3339()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, Option<f64>>(7)?,
                    row.get::<_, Option<String>>(8)?,
                    row.get::<_, i64>(9)?,
                    row.get::<_, f64>(10)?,
                ))
            },
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut samples = Vec::new();
    for row in rows {
        let (
            content_id,
            account_id,
            niche,
            posted_at,
            tags,
            hook_type,
            narrative_structure,
            duration_seconds,
            bgm_category,
            views,
            baseline,
        ) = row.map_err(|e| to_storage_err(e.to_string()))?;
        samples.push(CacheSampleRow {
            content_id,
            account_id,
            niche,
            posted_at: posted_at.as_deref().map(parse_ts).transpose()?,
            tags: serde_json::from_str(&tags).map_err(|e| to_storage_err(e.to_string()))?,
            hook_type,
            narrative_structure,
            duration_seconds,
            bgm_category,
            actual: views as f64,
            baseline,
        });
    }
    Ok(samples)
}
