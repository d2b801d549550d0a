use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AnalysisKind;

/// One of the three fixed measurement rounds after posting.
///
/// Each round has its own delay setting, its own actual-value column on the
/// prediction snapshot, an optional error column, and an optional
/// downstream analysis kind. The set is closed; the orchestrator matches
/// exhaustively over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurePoint {
    /// First look shortly after posting (nominally 48h).
    Initial,
    /// The primary window (nominally 7d) feeding baselines, the adjustment
    /// cache, cross-account correlation, and weight learning.
    Primary,
    /// The long-tail window (nominally 30d); storage only.
    Extended,
}

impl MeasurePoint {
    /// All rounds, in measurement order.
    pub const ALL: [MeasurePoint; 3] =
        [MeasurePoint::Initial, MeasurePoint::Primary, MeasurePoint::Extended];

    /// Stable storage label (also the metrics measure_point value).
    pub fn label(&self) -> &'static str {
        match self {
            MeasurePoint::Initial => "48h",
            MeasurePoint::Primary => "7d",
            MeasurePoint::Extended => "30d",
        }
    }

    /// Parse a stable storage label.
    pub fn parse(label: &str) -> Option<MeasurePoint> {
        match label {
            "48h" => Some(MeasurePoint::Initial),
            "7d" => Some(MeasurePoint::Primary),
            "30d" => Some(MeasurePoint::Extended),
            _ => None,
        }
    }

    /// Whether this round records a prediction error alongside the actual.
    pub fn has_error(&self) -> bool {
        !matches!(self, MeasurePoint::Initial)
    }

    /// Downstream analysis triggered after a successful measurement.
    /// The extended round is storage-only.
    pub fn analysis_kind(&self) -> Option<AnalysisKind> {
        match self {
            MeasurePoint::Initial => Some(AnalysisKind::Micro),
            MeasurePoint::Primary => Some(AnalysisKind::Cumulative),
            MeasurePoint::Extended => None,
        }
    }

    /// Whether this is the last round; once it is recorded the publication
    /// advances to the measured status.
    pub fn is_final(&self) -> bool {
        matches!(self, MeasurePoint::Extended)
    }
}

/// An observation of one publication at one measurement round.
/// Unique per (publication, round): upserted, never duplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeMetric {
    pub publication_id: i64,
    pub point: MeasurePoint,
    pub views: u64,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub shares: Option<u64>,
    pub engagement_rate: Option<f64>,
    pub measured_at: DateTime<Utc>,
}
