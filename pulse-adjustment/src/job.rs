//! The adjustment-cache batch: rebuild every platform's factor cache.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use pulse_core::config::CacheConfig;
use pulse_core::errors::PulseResult;
use pulse_core::models::{MeasurePoint, Platform};
use pulse_storage::queries::cache_ops;
use pulse_storage::StorageEngine;

use crate::builder;

/// Per-run counts reported by the cache job.
#[derive(Debug, Clone, Default)]
pub struct CacheJobReport {
    /// Upserted entries per platform.
    pub entries: BTreeMap<Platform, usize>,
}

/// Rebuild the adjustment factor cache for all platforms from the trailing
/// outcome window at the primary measurement point.
pub fn run_adjustment_cache_job(
    storage: &StorageEngine,
    now: DateTime<Utc>,
) -> PulseResult<CacheJobReport> {
    let cfg = CacheConfig::load(storage)?;
    let cutoff = now - Duration::days(cfg.window_days);

    let mut report = CacheJobReport::default();
    for platform in Platform::ALL {
        let rows = storage.with_reader(|conn| {
            cache_ops::sample_rows(conn, platform, MeasurePoint::Primary, cutoff)
        })?;
        let entries = builder::build_entries(platform, &rows, &cfg, now);

        storage.with_writer(|conn| {
            for entry in &entries {
                cache_ops::upsert_entry(conn, entry)?;
            }
            Ok(())
        })?;

        info!(
            platform = platform.as_str(),
            rows = rows.len(),
            entries = entries.len(),
            "adjustment cache rebuilt"
        );
        report.entries.insert(platform, entries.len());
    }
    Ok(report)
}
