use serde::{Deserialize, Serialize};

use crate::errors::PulseResult;
use crate::traits::ISettings;

use super::{defaults, keys};

/// Baseline estimator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    /// Trailing window (days) for own-history samples.
    pub window_days: i64,
    /// Minimum samples for a fallback step to qualify.
    pub min_sample: u32,
    /// Trailing window (days) for cohort samples.
    pub cohort_window_days: i64,
    /// Baseline when every fallback step fails.
    pub default_impressions: f64,
}

impl BaselineConfig {
    /// Load from the central settings store. Missing keys fail loudly.
    pub fn load(settings: &dyn ISettings) -> PulseResult<Self> {
        Ok(Self {
            window_days: settings.get_integer(keys::BASELINE_WINDOW_DAYS)?,
            min_sample: settings.get_integer(keys::BASELINE_MIN_SAMPLE)? as u32,
            cohort_window_days: settings.get_integer(keys::BASELINE_COHORT_WINDOW_DAYS)?,
            default_impressions: settings.get_number(keys::BASELINE_DEFAULT_IMPRESSIONS)?,
        })
    }
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            window_days: defaults::DEFAULT_BASELINE_WINDOW_DAYS,
            min_sample: defaults::DEFAULT_BASELINE_MIN_SAMPLE,
            cohort_window_days: defaults::DEFAULT_BASELINE_COHORT_WINDOW_DAYS,
            default_impressions: defaults::DEFAULT_BASELINE_DEFAULT_IMPRESSIONS,
        }
    }
}
