use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::factors::Factor;

use super::Platform;

/// Cached average lift/penalty for one (platform, factor, value) bucket.
///
/// Entries below the minimum sample are still recorded with their true
/// sample count, but inactive entries never influence predictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorCacheEntry {
    pub platform: Platform,
    pub factor: Factor,
    pub factor_value: String,
    /// Mean of `actual / baseline − 1.0` over the trailing window.
    pub adjustment: f64,
    pub sample_count: u32,
    pub is_active: bool,
    pub calculated_at: DateTime<Utc>,
}
