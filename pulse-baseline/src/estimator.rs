//! The fallback-chain estimator. Pure aggregation over fetched sample
//! rows: deterministic given the same samples, config, and clock.

use chrono::{DateTime, Duration, Utc};

use pulse_core::config::BaselineConfig;
use pulse_core::models::{Account, AccountBaseline, AgeBucket, BaselineSource};
use pulse_storage::queries::metric_ops::BaselineSample;

/// Mean views over a filtered subset of samples, with count and
/// observation bounds.
struct SampleStats {
    mean: f64,
    count: u32,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
}

fn stats<'a, I>(samples: I) -> Option<SampleStats>
where
    I: Iterator<Item = &'a BaselineSample>,
{
    let mut sum = 0.0;
    let mut count = 0u32;
    let mut start: Option<DateTime<Utc>> = None;
    let mut end: Option<DateTime<Utc>> = None;
    for sample in samples {
        sum += sample.views;
        count += 1;
        start = Some(start.map_or(sample.measured_at, |s| s.min(sample.measured_at)));
        end = Some(end.map_or(sample.measured_at, |e| e.max(sample.measured_at)));
    }
    let (Some(window_start), Some(window_end)) = (start, end) else {
        return None;
    };
    Some(SampleStats {
        mean: sum / count as f64,
        count,
        window_start,
        window_end,
    })
}

/// Estimate one account's baseline. First qualifying step wins:
///
/// 1. own trailing-window history (≥ min_sample)
/// 2. cohort sharing platform × niche × age bucket (≥ min_sample)
/// 3. cohort sharing platform × niche (≥ min_sample)
/// 4. cohort sharing platform (≥ min_sample)
/// 5. configured default
///
/// `samples` is the full active-account outcome set within the cohort
/// window; own-history is further restricted to the (narrower) own window.
/// Falling through a step on insufficient samples is normal control flow,
/// never an error.
pub fn estimate(
    account: &Account,
    samples: &[BaselineSample],
    cfg: &BaselineConfig,
    now: DateTime<Utc>,
) -> AccountBaseline {
    let own_cutoff = now - Duration::days(cfg.window_days);

    // Step 1: own history within the narrow window.
    if let Some(own) = stats(
        samples
            .iter()
            .filter(|s| s.account_id == account.account_id && s.measured_at >= own_cutoff),
    ) {
        if own.count >= cfg.min_sample {
            return AccountBaseline {
                account_id: account.account_id.clone(),
                baseline_impressions: own.mean,
                source: BaselineSource::OwnHistory,
                sample_count: own.count,
                window_start: own.window_start,
                window_end: own.window_end,
                calculated_at: now,
            };
        }
    }

    let cohort_start = now - Duration::days(cfg.cohort_window_days);
    let cohort = |stats: SampleStats| AccountBaseline {
        account_id: account.account_id.clone(),
        baseline_impressions: stats.mean,
        source: BaselineSource::Cohort,
        sample_count: stats.count,
        window_start: cohort_start,
        window_end: now,
        calculated_at: now,
    };

    // Step 2: platform × niche × age bucket.
    if let Some(niche) = account.niche.as_deref() {
        let bucket = AgeBucket::from_created_at(account.created_at, now);
        if let Some(s) = stats(samples.iter().filter(|s| {
            s.platform == account.platform
                && s.niche.as_deref() == Some(niche)
                && AgeBucket::from_created_at(s.account_created_at, now) == bucket
        })) {
            if s.count >= cfg.min_sample {
                return cohort(s);
            }
        }

        // Step 3: platform × niche.
        if let Some(s) = stats(
            samples
                .iter()
                .filter(|s| s.platform == account.platform && s.niche.as_deref() == Some(niche)),
        ) {
            if s.count >= cfg.min_sample {
                return cohort(s);
            }
        }
    }

    // Step 4: platform only.
    if let Some(s) = stats(samples.iter().filter(|s| s.platform == account.platform)) {
        if s.count >= cfg.min_sample {
            return cohort(s);
        }
    }

    // Step 5: configured default.
    AccountBaseline {
        account_id: account.account_id.clone(),
        baseline_impressions: cfg.default_impressions,
        source: BaselineSource::Default,
        sample_count: 0,
        window_start: cohort_start,
        window_end: now,
        calculated_at: now,
    }
}
