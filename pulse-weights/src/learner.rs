//! WeightLearner: gating, correlation, smoothing, and the atomic
//! audit-logged weight update, per platform.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use pulse_core::config::WeightConfig;
use pulse_core::errors::{LearnerError, PulseError, PulseResult};
use pulse_core::factors::Factor;
use pulse_core::models::{FactorAdjustment, Platform};
use pulse_storage::queries::weight_ops::{self, WeightChange};
use pulse_storage::queries::{metric_ops, snapshot_ops};
use pulse_storage::StorageEngine;

use crate::correlation::{self, FactorOutcome};
use crate::smoothing;
use crate::tier;

/// Why a platform's recalculation was skipped. Skips are normal outcomes,
/// not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    IntervalNotElapsed {
        since_last: Duration,
        required: Duration,
    },
    InsufficientNewData {
        new_outcomes: u64,
        required: u64,
    },
}

/// Result of one platform's recalculation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RecalcOutcome {
    Performed { tier_level: u8, data_count: u32 },
    Skipped(SkipReason),
}

/// The weight learner. Holds a per-platform guard so two recalculations
/// for the same platform cannot overlap in-process; the tier interval
/// gating provides the coarser cross-process protection.
pub struct WeightLearner {
    running: [AtomicBool; Platform::ALL.len()],
}

impl WeightLearner {
    pub fn new() -> Self {
        Self {
            running: Default::default(),
        }
    }

    /// Run weight recalculation for one platform.
    pub fn recalc_platform(
        &self,
        storage: &StorageEngine,
        platform: Platform,
        cfg: &WeightConfig,
        now: DateTime<Utc>,
    ) -> PulseResult<RecalcOutcome> {
        let guard = &self.running[platform.index()];
        if guard
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PulseError::Learner(LearnerError::AlreadyRunning {
                platform: platform.as_str().to_string(),
            }));
        }
        let result = self.recalc_platform_inner(storage, platform, cfg, now);
        guard.store(false, Ordering::SeqCst);
        result
    }

    fn recalc_platform_inner(
        &self,
        storage: &StorageEngine,
        platform: Platform,
        cfg: &WeightConfig,
        now: DateTime<Utc>,
    ) -> PulseResult<RecalcOutcome> {
        // Step 1: tier from the platform's total outcome volume.
        let metrics_count =
            storage.with_reader(|conn| metric_ops::count_for_platform(conn, platform))?;
        let tier = tier::determine(metrics_count, cfg);

        // Step 2: gating against the last recorded weight change.
        let last_change = storage.with_reader(|conn| weight_ops::last_audit_time(conn, platform))?;
        let new_outcomes = match last_change {
            Some(last) => {
                let since_last = now - last;
                if since_last < tier.min_interval {
                    return Ok(RecalcOutcome::Skipped(SkipReason::IntervalNotElapsed {
                        since_last,
                        required: tier.min_interval,
                    }));
                }
                storage
                    .with_reader(|conn| metric_ops::count_for_platform_since(conn, platform, last))?
            }
            // First run: all outcomes count as new.
            None => metrics_count,
        };
        if new_outcomes < cfg.min_new_outcomes {
            return Ok(RecalcOutcome::Skipped(SkipReason::InsufficientNewData {
                new_outcomes,
                required: cfg.min_new_outcomes,
            }));
        }

        // Step 3: raw contributions from errored snapshots in the window.
        let since = now - Duration::days(cfg.window_days);
        let rows =
            storage.with_reader(|conn| snapshot_ops::errored_snapshot_rows(conn, platform, since))?;
        let data_count = rows.len() as u32;

        let mut outcomes: BTreeMap<Factor, Vec<FactorOutcome>> = BTreeMap::new();
        for row in &rows {
            let adjustments: BTreeMap<Factor, FactorAdjustment> =
                match serde_json::from_str(&row.adjustments_json) {
                    Ok(adjustments) => adjustments,
                    Err(e) => {
                        // One malformed row never aborts the platform run.
                        warn!(
                            publication_id = row.publication_id,
                            error = %e,
                            "skipping snapshot with malformed adjustment detail"
                        );
                        continue;
                    }
                };
            for (factor, detail) in adjustments {
                outcomes.entry(factor).or_default().push(FactorOutcome {
                    adjustment: detail.adjustment,
                    weight: detail.weight,
                    actual: row.actual,
                    baseline: row.baseline,
                });
            }
        }
        let raw = correlation::raw_contributions(&outcomes);

        // Steps 4–8: normalize, smooth, clip, floor, renormalize.
        let calculated = smoothing::normalize_contributions(&raw);
        let old: BTreeMap<Factor, f64> = storage
            .with_reader(|conn| weight_ops::get_weights(conn, platform))?
            .into_iter()
            .map(|w| (w.factor, w.weight))
            .collect();
        let smoothed = smoothing::smooth(&old, &calculated, cfg);

        // Step 9: atomic update + audit, all factors in one transaction.
        let changes: Vec<WeightChange> = smoothed
            .iter()
            .map(|w| WeightChange {
                factor: w.factor,
                old_weight: w.old,
                new_weight: w.new,
            })
            .collect();
        storage.with_writer(|conn| {
            weight_ops::apply_weight_update(conn, platform, &changes, data_count, metrics_count, now)
        })?;

        info!(
            platform = platform.as_str(),
            tier = tier.level,
            data_count,
            metrics_count,
            "weights recalculated"
        );
        Ok(RecalcOutcome::Performed {
            tier_level: tier.level,
            data_count,
        })
    }
}

impl Default for WeightLearner {
    fn default() -> Self {
        Self::new()
    }
}

/// Run weight recalculation for every platform, reporting each outcome.
pub fn run_weight_recalc_job(
    storage: &StorageEngine,
    now: DateTime<Utc>,
) -> PulseResult<BTreeMap<Platform, RecalcOutcome>> {
    let cfg = WeightConfig::load(storage)?;
    let learner = WeightLearner::new();
    let mut results = BTreeMap::new();
    for platform in Platform::ALL {
        let outcome = learner.recalc_platform(storage, platform, &cfg, now)?;
        match &outcome {
            RecalcOutcome::Performed { tier_level, .. } => {
                info!(platform = platform.as_str(), tier = tier_level, "recalculated");
            }
            RecalcOutcome::Skipped(reason) => {
                info!(platform = platform.as_str(), reason = ?reason, "skipped");
            }
        }
        results.insert(platform, outcome);
    }
    Ok(results)
}
