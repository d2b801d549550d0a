//! Prediction error: signed comparison of forecast and outcome, plus the
//! backfill batch for snapshots measured before their error was written.

use chrono::{DateTime, Utc};
use tracing::info;

use pulse_core::errors::PulseResult;
use pulse_core::models::MeasurePoint;
use pulse_storage::queries::snapshot_ops;
use pulse_storage::StorageEngine;

/// Relative prediction error for one measurement round.
///
/// Both exactly zero → 0 (perfect, no signal). Actual zero with a positive
/// prediction → 1.0 (maximum). Otherwise `|predicted − actual| / actual`,
/// deliberately uncapped: large overestimates yield large errors.
pub fn calc_prediction_error(predicted: f64, actual: f64) -> f64 {
    if predicted == 0.0 && actual == 0.0 {
        return 0.0;
    }
    if actual == 0.0 {
        return 1.0;
    }
    (predicted - actual).abs() / actual
}

/// Per-run counts reported by the error backfill.
#[derive(Debug, Clone, Default)]
pub struct ErrorBackfillReport {
    pub updated_primary: usize,
    pub updated_extended: usize,
}

/// Compute missing errors for snapshots whose actuals are already
/// recorded (e.g. after a crash between the actual write and the error
/// write in older data). Idempotent: only NULL error columns are filled.
pub fn run_error_backfill_job(
    storage: &StorageEngine,
    now: DateTime<Utc>,
) -> PulseResult<ErrorBackfillReport> {
    let mut report = ErrorBackfillReport::default();

    for point in [MeasurePoint::Primary, MeasurePoint::Extended] {
        let rows = storage.with_reader(|conn| snapshot_ops::missing_error_rows(conn, point))?;
        for (publication_id, predicted, actual) in &rows {
            let error = calc_prediction_error(*predicted, *actual as f64);
            storage.with_writer(|conn| {
                snapshot_ops::set_error(conn, *publication_id, point, error, now)
            })?;
        }
        match point {
            MeasurePoint::Primary => report.updated_primary = rows.len(),
            MeasurePoint::Extended => report.updated_extended = rows.len(),
            MeasurePoint::Initial => {}
        }
    }

    info!(
        primary = report.updated_primary,
        extended = report.updated_extended,
        "error backfill complete"
    );
    Ok(report)
}
