use serde::{Deserialize, Serialize};

use crate::errors::PulseResult;
use crate::traits::ISettings;

use super::{defaults, keys};

/// Adjustment-factor cache builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Trailing window (days) of outcomes to aggregate.
    pub window_days: i64,
    /// Minimum samples for an entry to become active.
    pub min_sample: u32,
}

impl CacheConfig {
    /// Load from the central settings store. Missing keys fail loudly.
    pub fn load(settings: &dyn ISettings) -> PulseResult<Self> {
        Ok(Self {
            window_days: settings.get_integer(keys::CACHE_WINDOW_DAYS)?,
            min_sample: settings.get_integer(keys::CACHE_MIN_SAMPLE)? as u32,
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            window_days: defaults::DEFAULT_CACHE_WINDOW_DAYS,
            min_sample: defaults::DEFAULT_CACHE_MIN_SAMPLE,
        }
    }
}
