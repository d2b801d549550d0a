//! The daily baseline batch: recompute and upsert every active account.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use pulse_core::config::BaselineConfig;
use pulse_core::errors::PulseResult;
use pulse_core::models::MeasurePoint;
use pulse_storage::queries::{account_ops, baseline_ops, metric_ops};
use pulse_storage::StorageEngine;

use crate::estimator;

/// Per-run counts reported by the baseline job.
#[derive(Debug, Clone, Default)]
pub struct BaselineJobReport {
    pub accounts: usize,
    pub own_history: usize,
    pub cohort: usize,
    pub defaulted: usize,
}

/// Recompute baselines for all active accounts and fully overwrite each
/// account's row. Safe to re-run at any time.
pub fn run_baseline_job(
    storage: &StorageEngine,
    now: DateTime<Utc>,
) -> PulseResult<BaselineJobReport> {
    let cfg = BaselineConfig::load(storage)?;
    let cohort_cutoff = now - Duration::days(cfg.cohort_window_days);

    let accounts = storage.with_reader(account_ops::list_active_accounts)?;
    let samples = storage
        .with_reader(|conn| metric_ops::baseline_samples(conn, MeasurePoint::Primary, cohort_cutoff))?;

    let mut report = BaselineJobReport {
        accounts: accounts.len(),
        ..Default::default()
    };

    for account in &accounts {
        let baseline = estimator::estimate(account, &samples, &cfg, now);
        match baseline.source {
            pulse_core::models::BaselineSource::OwnHistory => report.own_history += 1,
            pulse_core::models::BaselineSource::Cohort => report.cohort += 1,
            pulse_core::models::BaselineSource::Default => report.defaulted += 1,
        }
        storage.with_writer(|conn| baseline_ops::upsert_baseline(conn, &baseline))?;
    }

    info!(
        accounts = report.accounts,
        own_history = report.own_history,
        cohort = report.cohort,
        default = report.defaulted,
        "baseline job complete"
    );
    Ok(report)
}
