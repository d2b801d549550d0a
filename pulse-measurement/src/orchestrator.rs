//! The three-round measurement orchestrator.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use pulse_core::config::MeasurementConfig;
use pulse_core::errors::PulseResult;
use pulse_core::models::{AnalysisTask, MeasurePoint, MeasurementTarget};
use pulse_core::traits::{IAnalysisQueue, IOutcomeCollector};
use pulse_forecast::calc_prediction_error;
use pulse_storage::queries::snapshot_ops;
use pulse_storage::StorageEngine;

/// Per-round counts.
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub point: MeasurePoint,
    pub targets: usize,
    pub processed: usize,
    pub skipped: usize,
}

/// Counts for a full orchestration run.
#[derive(Debug, Clone, Default)]
pub struct MeasurementReport {
    pub rounds: Vec<RoundReport>,
}

impl MeasurementReport {
    pub fn total_processed(&self) -> usize {
        self.rounds.iter().map(|r| r.processed).sum()
    }
}

/// Drives outcome collection for all three rounds against the injected
/// collector. The storage engine itself serves as the analysis queue.
pub struct MeasurementOrchestrator<'a> {
    storage: &'a StorageEngine,
    collector: &'a dyn IOutcomeCollector,
}

impl<'a> MeasurementOrchestrator<'a> {
    pub fn new(storage: &'a StorageEngine, collector: &'a dyn IOutcomeCollector) -> Self {
        Self { storage, collector }
    }

    /// Run all three rounds. Safe to re-run at any time: a round already
    /// recorded for a publication is never selected again.
    pub fn run(
        &self,
        cfg: &MeasurementConfig,
        now: DateTime<Utc>,
    ) -> PulseResult<MeasurementReport> {
        let mut report = MeasurementReport::default();
        for point in MeasurePoint::ALL {
            report.rounds.push(self.process_round(point, cfg, now)?);
        }
        Ok(report)
    }

    /// Process one round: select due targets and handle each
    /// independently. A single target's failure never aborts the batch.
    pub fn process_round(
        &self,
        point: MeasurePoint,
        cfg: &MeasurementConfig,
        now: DateTime<Utc>,
    ) -> PulseResult<RoundReport> {
        let cutoff = now - Duration::hours(cfg.delay_hours(point));
        let targets = self
            .storage
            .with_reader(|conn| snapshot_ops::pending_targets(conn, point, cutoff))?;

        let mut processed = 0usize;
        let mut skipped = 0usize;
        for target in &targets {
            match self.process_target(target, point, now) {
                Ok(true) => processed += 1,
                Ok(false) => skipped += 1,
                Err(e) => {
                    warn!(
                        publication_id = target.publication_id,
                        round = point.label(),
                        error = %e,
                        "measurement target failed; will retry next run"
                    );
                    skipped += 1;
                }
            }
        }

        info!(
            round = point.label(),
            targets = targets.len(),
            processed,
            skipped,
            "measurement round complete"
        );
        Ok(RoundReport {
            point,
            targets: targets.len(),
            processed,
            skipped,
        })
    }

    /// Handle one target: collect, record, enqueue analysis.
    /// Returns whether the round was recorded.
    fn process_target(
        &self,
        target: &MeasurementTarget,
        point: MeasurePoint,
        now: DateTime<Utc>,
    ) -> PulseResult<bool> {
        // No result yet: leave the row untouched for the next run.
        let Some(observation) = self.collector.collect(target, point)? else {
            return Ok(false);
        };

        let error = point
            .has_error()
            .then(|| calc_prediction_error(target.predicted_impressions, observation.views as f64));

        let recorded = self.storage.with_writer(|conn| {
            snapshot_ops::record_measurement(
                conn,
                target.publication_id,
                point,
                &observation,
                error,
                now,
            )
        })?;
        if !recorded {
            return Ok(false);
        }

        if let Some(kind) = point.analysis_kind() {
            self.storage.enqueue(&AnalysisTask {
                task_id: Uuid::new_v4().to_string(),
                kind,
                publication_id: target.publication_id,
                content_id: target.content_id.clone(),
                point,
            })?;
        }
        Ok(true)
    }
}
