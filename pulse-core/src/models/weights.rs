use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::factors::Factor;

use super::Platform;

/// The learned relative importance of one factor on one platform.
/// All weights for a platform sum to 1.0 within floating tolerance.
/// Mutated only by the weight learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionWeight {
    pub platform: Platform,
    pub factor: Factor,
    pub weight: f64,
    pub updated_at: DateTime<Utc>,
}

/// Append-only record of one weight change. Never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightAuditEntry {
    pub platform: Platform,
    pub factor: Factor,
    pub old_weight: f64,
    pub new_weight: f64,
    /// Snapshot rows with a known error that fed this recalculation.
    pub data_count: u32,
    /// Total outcome rows for the platform at recalculation time.
    pub metrics_count: u64,
    pub calculated_at: DateTime<Utc>,
}
