use serde::{Deserialize, Serialize};

use crate::errors::PulseResult;
use crate::traits::ISettings;

use super::{defaults, keys};

/// Factor weight learner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Ascending outcome-count thresholds separating the four recalc tiers.
    pub tier1_threshold: u64,
    pub tier2_threshold: u64,
    pub tier3_threshold: u64,
    /// Minimum new outcomes since the last recalc to run again.
    pub min_new_outcomes: u64,
    /// EMA blend rate toward the freshly calculated weight.
    pub smoothing_alpha: f64,
    /// Maximum relative change of a weight per recalc.
    pub max_change_rate: f64,
    /// Minimum weight any factor may hold before renormalization.
    pub floor: f64,
    /// Trailing window (days) of errored snapshots to learn from.
    pub window_days: i64,
}

impl WeightConfig {
    /// Load from the central settings store. Missing keys fail loudly.
    pub fn load(settings: &dyn ISettings) -> PulseResult<Self> {
        Ok(Self {
            tier1_threshold: settings.get_integer(keys::WEIGHT_TIER1_THRESHOLD)? as u64,
            tier2_threshold: settings.get_integer(keys::WEIGHT_TIER2_THRESHOLD)? as u64,
            tier3_threshold: settings.get_integer(keys::WEIGHT_TIER3_THRESHOLD)? as u64,
            min_new_outcomes: settings.get_integer(keys::WEIGHT_MIN_NEW_OUTCOMES)? as u64,
            smoothing_alpha: settings.get_number(keys::WEIGHT_SMOOTHING_ALPHA)?,
            max_change_rate: settings.get_number(keys::WEIGHT_MAX_CHANGE_RATE)?,
            floor: settings.get_number(keys::WEIGHT_FLOOR)?,
            window_days: settings.get_integer(keys::WEIGHT_WINDOW_DAYS)?,
        })
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            tier1_threshold: defaults::DEFAULT_WEIGHT_TIER1_THRESHOLD,
            tier2_threshold: defaults::DEFAULT_WEIGHT_TIER2_THRESHOLD,
            tier3_threshold: defaults::DEFAULT_WEIGHT_TIER3_THRESHOLD,
            min_new_outcomes: defaults::DEFAULT_WEIGHT_MIN_NEW_OUTCOMES,
            smoothing_alpha: defaults::DEFAULT_WEIGHT_SMOOTHING_ALPHA,
            max_change_rate: defaults::DEFAULT_WEIGHT_MAX_CHANGE_RATE,
            floor: defaults::DEFAULT_WEIGHT_FLOOR,
            window_days: defaults::DEFAULT_WEIGHT_WINDOW_DAYS,
        }
    }
}
