use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Platform;

/// Publication lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Scheduled,
    Posted,
    Measured,
    Failed,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationStatus::Scheduled => "scheduled",
            PublicationStatus::Posted => "posted",
            PublicationStatus::Measured => "measured",
            PublicationStatus::Failed => "failed",
        }
    }

    pub fn parse(name: &str) -> Option<PublicationStatus> {
        match name {
            "scheduled" => Some(PublicationStatus::Scheduled),
            "posted" => Some(PublicationStatus::Posted),
            "measured" => Some(PublicationStatus::Measured),
            "failed" => Some(PublicationStatus::Failed),
            _ => None,
        }
    }
}

/// One posting of one content item to one account.
/// Has a 1:1 relation to at most one prediction snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    pub id: i64,
    pub content_id: String,
    pub account_id: String,
    pub platform: Platform,
    pub posted_at: Option<DateTime<Utc>>,
    pub status: PublicationStatus,
    /// Hashtags/keywords attached at posting time; the first entry is the
    /// primary keyword used for factor resolution.
    pub tags: Vec<String>,
}
