use crate::errors::PulseResult;
use crate::models::{MeasurePoint, MeasurementTarget, OutcomeObservation};

/// Collects the observed outcome for one measurement target.
///
/// This is the only call into the platform-adapter layer. `Ok(None)` means
/// "no result available yet": the target is left untouched and naturally
/// retried on the next scheduled run.
pub trait IOutcomeCollector: Send + Sync {
    fn collect(
        &self,
        target: &MeasurementTarget,
        point: MeasurePoint,
    ) -> PulseResult<Option<OutcomeObservation>>;
}
