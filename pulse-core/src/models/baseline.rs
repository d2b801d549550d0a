use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which step of the fallback chain produced a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSource {
    OwnHistory,
    Cohort,
    Default,
}

impl BaselineSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaselineSource::OwnHistory => "own_history",
            BaselineSource::Cohort => "cohort",
            BaselineSource::Default => "default",
        }
    }

    pub fn parse(name: &str) -> Option<BaselineSource> {
        match name {
            "own_history" => Some(BaselineSource::OwnHistory),
            "cohort" => Some(BaselineSource::Cohort),
            "default" => Some(BaselineSource::Default),
            _ => None,
        }
    }
}

/// Expected impressions for one account absent any content-specific
/// adjustment. One row per account, fully overwritten on each run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBaseline {
    pub account_id: String,
    pub baseline_impressions: f64,
    pub source: BaselineSource,
    pub sample_count: u32,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub calculated_at: DateTime<Utc>,
}
