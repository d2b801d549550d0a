use serde::{Deserialize, Serialize};

use crate::errors::PulseResult;
use crate::traits::ISettings;

use super::{defaults, keys, BaselineConfig};

/// Prediction snapshot builder configuration, including the baseline
/// settings used by the real-time fallback path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Clip range for a single factor adjustment.
    pub individual_min: f64,
    pub individual_max: f64,
    /// Clip range for the weighted total adjustment.
    pub total_min: f64,
    pub total_max: f64,
    /// Clip range for the predicted value as a fraction of baseline.
    pub value_min_ratio: f64,
    pub value_max_ratio: f64,
    /// Minimum other-account outcomes for a cross-account effect.
    pub cross_account_min_sample: u32,
    pub baseline: BaselineConfig,
}

impl ForecastConfig {
    /// Load from the central settings store. Missing keys fail loudly.
    pub fn load(settings: &dyn ISettings) -> PulseResult<Self> {
        Ok(Self {
            individual_min: settings.get_number(keys::ADJUSTMENT_INDIVIDUAL_MIN)?,
            individual_max: settings.get_number(keys::ADJUSTMENT_INDIVIDUAL_MAX)?,
            total_min: settings.get_number(keys::ADJUSTMENT_TOTAL_MIN)?,
            total_max: settings.get_number(keys::ADJUSTMENT_TOTAL_MAX)?,
            value_min_ratio: settings.get_number(keys::PREDICTION_VALUE_MIN_RATIO)?,
            value_max_ratio: settings.get_number(keys::PREDICTION_VALUE_MAX_RATIO)?,
            cross_account_min_sample: settings.get_integer(keys::CROSS_ACCOUNT_MIN_SAMPLE)? as u32,
            baseline: BaselineConfig::load(settings)?,
        })
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            individual_min: defaults::DEFAULT_ADJUSTMENT_INDIVIDUAL_MIN,
            individual_max: defaults::DEFAULT_ADJUSTMENT_INDIVIDUAL_MAX,
            total_min: defaults::DEFAULT_ADJUSTMENT_TOTAL_MIN,
            total_max: defaults::DEFAULT_ADJUSTMENT_TOTAL_MAX,
            value_min_ratio: defaults::DEFAULT_PREDICTION_VALUE_MIN_RATIO,
            value_max_ratio: defaults::DEFAULT_PREDICTION_VALUE_MAX_RATIO,
            cross_account_min_sample: defaults::DEFAULT_CROSS_ACCOUNT_MIN_SAMPLE,
            baseline: BaselineConfig::default(),
        }
    }
}
