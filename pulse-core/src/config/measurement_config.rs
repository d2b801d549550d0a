use serde::{Deserialize, Serialize};

use crate::errors::PulseResult;
use crate::models::MeasurePoint;
use crate::traits::ISettings;

use super::{defaults, keys};

/// Measurement orchestrator configuration: per-round collection delays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    pub initial_delay_hours: i64,
    pub primary_delay_hours: i64,
    pub extended_delay_hours: i64,
}

impl MeasurementConfig {
    /// Load from the central settings store. Missing keys fail loudly.
    pub fn load(settings: &dyn ISettings) -> PulseResult<Self> {
        Ok(Self {
            initial_delay_hours: settings.get_integer(keys::MEASURE_DELAY_INITIAL_HOURS)?,
            primary_delay_hours: settings.get_integer(keys::MEASURE_DELAY_PRIMARY_HOURS)?,
            extended_delay_hours: settings.get_integer(keys::MEASURE_DELAY_EXTENDED_HOURS)?,
        })
    }

    /// Delay after posting before one round becomes due.
    pub fn delay_hours(&self, point: MeasurePoint) -> i64 {
        match point {
            MeasurePoint::Initial => self.initial_delay_hours,
            MeasurePoint::Primary => self.primary_delay_hours,
            MeasurePoint::Extended => self.extended_delay_hours,
        }
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            initial_delay_hours: defaults::DEFAULT_MEASURE_DELAY_INITIAL_HOURS,
            primary_delay_hours: defaults::DEFAULT_MEASURE_DELAY_PRIMARY_HOURS,
            extended_delay_hours: defaults::DEFAULT_MEASURE_DELAY_EXTENDED_HOURS,
        }
    }
}
