//! Seeded defaults for every named setting.

use super::keys;

pub const DEFAULT_BASELINE_WINDOW_DAYS: i64 = 14;
pub const DEFAULT_BASELINE_MIN_SAMPLE: u32 = 3;
pub const DEFAULT_BASELINE_COHORT_WINDOW_DAYS: i64 = 90;
pub const DEFAULT_BASELINE_DEFAULT_IMPRESSIONS: f64 = 500.0;

pub const DEFAULT_CACHE_WINDOW_DAYS: i64 = 90;
pub const DEFAULT_CACHE_MIN_SAMPLE: u32 = 5;

pub const DEFAULT_WEIGHT_TIER1_THRESHOLD: u64 = 500;
pub const DEFAULT_WEIGHT_TIER2_THRESHOLD: u64 = 5_000;
pub const DEFAULT_WEIGHT_TIER3_THRESHOLD: u64 = 50_000;
pub const DEFAULT_WEIGHT_MIN_NEW_OUTCOMES: u64 = 100;
pub const DEFAULT_WEIGHT_SMOOTHING_ALPHA: f64 = 0.3;
pub const DEFAULT_WEIGHT_MAX_CHANGE_RATE: f64 = 0.2;
pub const DEFAULT_WEIGHT_FLOOR: f64 = 0.02;
pub const DEFAULT_WEIGHT_WINDOW_DAYS: i64 = 90;

pub const DEFAULT_ADJUSTMENT_INDIVIDUAL_MIN: f64 = -0.5;
pub const DEFAULT_ADJUSTMENT_INDIVIDUAL_MAX: f64 = 0.5;
pub const DEFAULT_ADJUSTMENT_TOTAL_MIN: f64 = -0.7;
pub const DEFAULT_ADJUSTMENT_TOTAL_MAX: f64 = 1.0;
pub const DEFAULT_PREDICTION_VALUE_MIN_RATIO: f64 = 0.3;
pub const DEFAULT_PREDICTION_VALUE_MAX_RATIO: f64 = 2.0;
pub const DEFAULT_CROSS_ACCOUNT_MIN_SAMPLE: u32 = 2;

pub const DEFAULT_MEASURE_DELAY_INITIAL_HOURS: i64 = 48;
pub const DEFAULT_MEASURE_DELAY_PRIMARY_HOURS: i64 = 168;
pub const DEFAULT_MEASURE_DELAY_EXTENDED_HOURS: i64 = 720;

/// Every named setting with its seeded default and description, in one
/// place so the settings migration and the config structs cannot drift.
pub fn seed_values() -> Vec<(&'static str, f64, &'static str)> {
    vec![
        (
            keys::BASELINE_WINDOW_DAYS,
            DEFAULT_BASELINE_WINDOW_DAYS as f64,
            "Trailing window (days) for own-history baselines",
        ),
        (
            keys::BASELINE_MIN_SAMPLE,
            DEFAULT_BASELINE_MIN_SAMPLE as f64,
            "Minimum samples for a baseline fallback step to qualify",
        ),
        (
            keys::BASELINE_COHORT_WINDOW_DAYS,
            DEFAULT_BASELINE_COHORT_WINDOW_DAYS as f64,
            "Trailing window (days) for cohort baselines",
        ),
        (
            keys::BASELINE_DEFAULT_IMPRESSIONS,
            DEFAULT_BASELINE_DEFAULT_IMPRESSIONS,
            "Baseline impressions when every fallback step fails",
        ),
        (
            keys::CACHE_WINDOW_DAYS,
            DEFAULT_CACHE_WINDOW_DAYS as f64,
            "Trailing window (days) for the adjustment factor cache",
        ),
        (
            keys::CACHE_MIN_SAMPLE,
            DEFAULT_CACHE_MIN_SAMPLE as f64,
            "Minimum samples for a cache entry to become active",
        ),
        (
            keys::WEIGHT_TIER1_THRESHOLD,
            DEFAULT_WEIGHT_TIER1_THRESHOLD as f64,
            "Outcome count threshold between recalc tiers 1 and 2",
        ),
        (
            keys::WEIGHT_TIER2_THRESHOLD,
            DEFAULT_WEIGHT_TIER2_THRESHOLD as f64,
            "Outcome count threshold between recalc tiers 2 and 3",
        ),
        (
            keys::WEIGHT_TIER3_THRESHOLD,
            DEFAULT_WEIGHT_TIER3_THRESHOLD as f64,
            "Outcome count threshold between recalc tiers 3 and 4",
        ),
        (
            keys::WEIGHT_MIN_NEW_OUTCOMES,
            DEFAULT_WEIGHT_MIN_NEW_OUTCOMES as f64,
            "Minimum new outcomes since the last recalc to run again",
        ),
        (
            keys::WEIGHT_SMOOTHING_ALPHA,
            DEFAULT_WEIGHT_SMOOTHING_ALPHA,
            "EMA blend rate toward the freshly calculated weight",
        ),
        (
            keys::WEIGHT_MAX_CHANGE_RATE,
            DEFAULT_WEIGHT_MAX_CHANGE_RATE,
            "Maximum relative change of a weight per recalc",
        ),
        (
            keys::WEIGHT_FLOOR,
            DEFAULT_WEIGHT_FLOOR,
            "Minimum weight any factor may hold before renormalization",
        ),
        (
            keys::WEIGHT_WINDOW_DAYS,
            DEFAULT_WEIGHT_WINDOW_DAYS as f64,
            "Trailing window (days) of errored snapshots for weight learning",
        ),
        (
            keys::ADJUSTMENT_INDIVIDUAL_MIN,
            DEFAULT_ADJUSTMENT_INDIVIDUAL_MIN,
            "Lower clip for a single factor adjustment",
        ),
        (
            keys::ADJUSTMENT_INDIVIDUAL_MAX,
            DEFAULT_ADJUSTMENT_INDIVIDUAL_MAX,
            "Upper clip for a single factor adjustment",
        ),
        (
            keys::ADJUSTMENT_TOTAL_MIN,
            DEFAULT_ADJUSTMENT_TOTAL_MIN,
            "Lower clip for the weighted total adjustment",
        ),
        (
            keys::ADJUSTMENT_TOTAL_MAX,
            DEFAULT_ADJUSTMENT_TOTAL_MAX,
            "Upper clip for the weighted total adjustment",
        ),
        (
            keys::PREDICTION_VALUE_MIN_RATIO,
            DEFAULT_PREDICTION_VALUE_MIN_RATIO,
            "Predicted impressions floor as a fraction of baseline",
        ),
        (
            keys::PREDICTION_VALUE_MAX_RATIO,
            DEFAULT_PREDICTION_VALUE_MAX_RATIO,
            "Predicted impressions ceiling as a fraction of baseline",
        ),
        (
            keys::CROSS_ACCOUNT_MIN_SAMPLE,
            DEFAULT_CROSS_ACCOUNT_MIN_SAMPLE as f64,
            "Minimum other-account outcomes for a cross-account effect",
        ),
        (
            keys::MEASURE_DELAY_INITIAL_HOURS,
            DEFAULT_MEASURE_DELAY_INITIAL_HOURS as f64,
            "Delay (hours) after posting for the initial round",
        ),
        (
            keys::MEASURE_DELAY_PRIMARY_HOURS,
            DEFAULT_MEASURE_DELAY_PRIMARY_HOURS as f64,
            "Delay (hours) after posting for the primary round",
        ),
        (
            keys::MEASURE_DELAY_EXTENDED_HOURS,
            DEFAULT_MEASURE_DELAY_EXTENDED_HOURS as f64,
            "Delay (hours) after posting for the extended round",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_covers_every_key_once() {
        let seeds = seed_values();
        assert_eq!(seeds.len(), 24);
        let mut names: Vec<&str> = seeds.iter().map(|(k, _, _)| *k).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), seeds.len(), "duplicate setting key in seed");
    }
}
