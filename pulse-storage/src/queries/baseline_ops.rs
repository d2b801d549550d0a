//! Upserts and reads for the account_baselines table.

use rusqlite::{params, Connection, OptionalExtension};

use pulse_core::errors::PulseResult;
use pulse_core::models::{AccountBaseline, BaselineSource};

use super::parse_ts;
use crate::to_storage_err;

/// Upsert one baseline, fully overwriting the account's previous row.
pub fn upsert_baseline(conn: &Connection, baseline: &AccountBaseline) -> PulseResult<()> {
    conn.execute(
        "INSERT INTO account_baselines
             (account_id, baseline_impressions, source, sample_count,
              window_start, window_end, calculated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (account_id) DO UPDATE SET
             baseline_impressions = excluded.baseline_impressions,
             source = excluded.source,
             sample_count = excluded.sample_count,
             window_start = excluded.window_start,
             window_end = excluded.window_end,
             calculated_at = excluded.calculated_at",
        params![
            baseline.account_id,
            baseline.baseline_impressions,
            baseline.source.as_str(),
            baseline.sample_count,
            baseline.window_start.to_rfc3339(),
            baseline.window_end.to_rfc3339(),
            baseline.calculated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get the cached baseline for one account.
pub fn get_baseline(conn: &Connection, account_id: &str) -> PulseResult<Option<AccountBaseline>> {
    let mut stmt = conn
        .prepare(
            "SELECT account_id, baseline_impressions, source, sample_count,
                    window_start, window_end, calculated_at
             FROM account_baselines WHERE account_id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let row = stmt
        .query_row(params![account_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let Some((account_id, baseline_impressions, source, sample_count, start, end, calculated)) =
        row
    else {
        return Ok(None);
    };
    Ok(Some(AccountBaseline {
        account_id,
        baseline_impressions,
        source: BaselineSource::parse(&source)
            .ok_or_else(|| to_storage_err(format!("unknown baseline source {source:?}")))?,
        sample_count: sample_count as u32,
        window_start: parse_ts(&start)?,
        window_end: parse_ts(&end)?,
        calculated_at: parse_ts(&calculated)?,
    }))
}
