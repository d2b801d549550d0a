//! Names of every tunable setting in the central store.

pub const BASELINE_WINDOW_DAYS: &str = "baseline_window_days";
pub const BASELINE_MIN_SAMPLE: &str = "baseline_min_sample";
pub const BASELINE_COHORT_WINDOW_DAYS: &str = "baseline_cohort_window_days";
pub const BASELINE_DEFAULT_IMPRESSIONS: &str = "baseline_default_impressions";

pub const CACHE_WINDOW_DAYS: &str = "cache_window_days";
pub const CACHE_MIN_SAMPLE: &str = "cache_min_sample";

pub const WEIGHT_TIER1_THRESHOLD: &str = "weight_tier1_threshold";
pub const WEIGHT_TIER2_THRESHOLD: &str = "weight_tier2_threshold";
pub const WEIGHT_TIER3_THRESHOLD: &str = "weight_tier3_threshold";
pub const WEIGHT_MIN_NEW_OUTCOMES: &str = "weight_min_new_outcomes";
pub const WEIGHT_SMOOTHING_ALPHA: &str = "weight_smoothing_alpha";
pub const WEIGHT_MAX_CHANGE_RATE: &str = "weight_max_change_rate";
pub const WEIGHT_FLOOR: &str = "weight_floor";
pub const WEIGHT_WINDOW_DAYS: &str = "weight_window_days";

pub const ADJUSTMENT_INDIVIDUAL_MIN: &str = "adjustment_individual_min";
pub const ADJUSTMENT_INDIVIDUAL_MAX: &str = "adjustment_individual_max";
pub const ADJUSTMENT_TOTAL_MIN: &str = "adjustment_total_min";
pub const ADJUSTMENT_TOTAL_MAX: &str = "adjustment_total_max";
pub const PREDICTION_VALUE_MIN_RATIO: &str = "prediction_value_min_ratio";
pub const PREDICTION_VALUE_MAX_RATIO: &str = "prediction_value_max_ratio";
pub const CROSS_ACCOUNT_MIN_SAMPLE: &str = "cross_account_min_sample";

pub const MEASURE_DELAY_INITIAL_HOURS: &str = "measure_delay_initial_hours";
pub const MEASURE_DELAY_PRIMARY_HOURS: &str = "measure_delay_primary_hours";
pub const MEASURE_DELAY_EXTENDED_HOURS: &str = "measure_delay_extended_hours";
