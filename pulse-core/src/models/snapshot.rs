use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::factors::Factor;

use super::{BaselineSource, MeasurePoint};

/// Per-factor detail persisted on a snapshot: the concrete value used,
/// the clipped adjustment, and the weight applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorAdjustment {
    pub value: Option<String>,
    pub adjustment: f64,
    pub weight: f64,
}

/// The persisted forecast for one publication, later filled in with
/// observed outcomes and prediction errors per measurement round.
/// Created once at publish time; measurement columns are written at most
/// once each (NULL = pending). Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionSnapshot {
    pub publication_id: i64,
    pub content_id: String,
    pub account_id: String,
    pub baseline_used: f64,
    pub baseline_source: BaselineSource,
    /// Detail for all nine factors, keyed by stable factor name.
    pub adjustments: BTreeMap<Factor, FactorAdjustment>,
    pub total_adjustment: f64,
    pub predicted_impressions: f64,
    pub actual_initial: Option<u64>,
    pub actual_primary: Option<u64>,
    pub actual_extended: Option<u64>,
    pub error_primary: Option<f64>,
    pub error_extended: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PredictionSnapshot {
    /// Observed actual for one round, if recorded.
    pub fn actual(&self, point: MeasurePoint) -> Option<u64> {
        match point {
            MeasurePoint::Initial => self.actual_initial,
            MeasurePoint::Primary => self.actual_primary,
            MeasurePoint::Extended => self.actual_extended,
        }
    }

    /// Recorded prediction error for one round. The initial round defines
    /// no error column.
    pub fn error(&self, point: MeasurePoint) -> Option<f64> {
        match point {
            MeasurePoint::Initial => None,
            MeasurePoint::Primary => self.error_primary,
            MeasurePoint::Extended => self.error_extended,
        }
    }
}
