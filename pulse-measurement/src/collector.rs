//! Collector used when no platform adapter is wired in.

use pulse_core::errors::PulseResult;
use pulse_core::models::{MeasurePoint, MeasurementTarget, OutcomeObservation};
use pulse_core::traits::IOutcomeCollector;

/// A collector that never has a result: every target is left pending for
/// the next run. Used for dry runs and as the CLI default.
pub struct NullCollector;

impl IOutcomeCollector for NullCollector {
    fn collect(
        &self,
        _target: &MeasurementTarget,
        _point: MeasurePoint,
    ) -> PulseResult<Option<OutcomeObservation>> {
        Ok(None)
    }
}
