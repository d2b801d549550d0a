use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MeasurePoint, Platform};

/// A publication due for outcome collection in one measurement round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementTarget {
    pub publication_id: i64,
    pub account_id: String,
    pub platform: Platform,
    pub content_id: String,
    pub posted_at: DateTime<Utc>,
    pub predicted_impressions: f64,
}

/// One collected outcome for a target. Views drive the prediction loop;
/// the engagement counters are stored alongside on the metrics row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeObservation {
    pub views: u64,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub shares: Option<u64>,
    pub engagement_rate: Option<f64>,
}

/// Downstream analysis kind triggered after a measurement round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Micro,
    Cumulative,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Micro => "micro",
            AnalysisKind::Cumulative => "cumulative",
        }
    }
}

/// A task handed to the (external) analysis layer after a measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisTask {
    pub task_id: String,
    pub kind: AnalysisKind,
    pub publication_id: i64,
    pub content_id: String,
    pub point: MeasurePoint,
}
