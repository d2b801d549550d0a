//! Pure grouping of outcome rows into cache entries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use pulse_core::config::CacheConfig;
use pulse_core::factors::{Factor, FactorInputs};
use pulse_core::models::{FactorCacheEntry, Platform};
use pulse_storage::queries::cache_ops::CacheSampleRow;

fn inputs_for(row: &CacheSampleRow) -> FactorInputs {
    FactorInputs {
        hook_type: row.hook_type.clone(),
        narrative_structure: row.narrative_structure.clone(),
        duration_seconds: row.duration_seconds,
        bgm_category: row.bgm_category.clone(),
        niche: row.niche.clone(),
        posted_at: row.posted_at,
        tags: row.tags.clone(),
    }
}

/// Group the platform's outcome rows by (factor, resolved value) and
/// compute the mean relative adjustment per group.
///
/// Every group is returned with its true sample count; groups below the
/// minimum sample are marked inactive rather than dropped, so the cache
/// stays auditable. Cross-account performance is excluded by construction
/// (it is computed in real time at prediction time).
pub fn build_entries(
    platform: Platform,
    rows: &[CacheSampleRow],
    cfg: &CacheConfig,
    now: DateTime<Utc>,
) -> Vec<FactorCacheEntry> {
    let mut entries = Vec::new();

    for factor in Factor::ALL.into_iter().filter(Factor::is_cached) {
        // (sum of ratios, count) per factor value.
        let mut groups: HashMap<String, (f64, u32)> = HashMap::new();

        for row in rows {
            if row.baseline <= 0.0 {
                continue;
            }
            let Some(value) = factor.resolve_value(&inputs_for(row)) else {
                continue;
            };
            let ratio = row.actual / row.baseline - 1.0;
            groups
                .entry(value)
                .and_modify(|(sum, count)| {
                    *sum += ratio;
                    *count += 1;
                })
                .or_insert((ratio, 1));
        }

        for (factor_value, (sum, count)) in groups {
            entries.push(FactorCacheEntry {
                platform,
                factor,
                factor_value,
                adjustment: sum / count as f64,
                sample_count: count,
                is_active: count >= cfg.min_sample,
                calculated_at: now,
            });
        }
    }

    // Deterministic output order for stable upserts and tests.
    entries.sort_by(|a, b| {
        (a.factor.as_str(), a.factor_value.as_str()).cmp(&(b.factor.as_str(), b.factor_value.as_str()))
    });
    entries
}
