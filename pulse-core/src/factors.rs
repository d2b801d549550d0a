//! The closed set of nine adjustment factors.
//!
//! Each factor is a categorical attribute of a posted content item whose
//! historical lift/penalty is cached per (platform, factor, value).
//! `CrossAccountPerformance` is the one exception: it depends on the
//! specific content item, so it is computed in real time and never cached.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// One adjustment factor. The set is closed: adding a factor is a
/// source-level change, and every `match` over it is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    HookType,
    ContentLength,
    PostHour,
    PostWeekday,
    Niche,
    NarrativeStructure,
    SoundBgm,
    HashtagKeyword,
    CrossAccountPerformance,
}

impl Factor {
    /// All nine factors, in canonical order.
    pub const ALL: [Factor; 9] = [
        Factor::HookType,
        Factor::ContentLength,
        Factor::PostHour,
        Factor::PostWeekday,
        Factor::Niche,
        Factor::NarrativeStructure,
        Factor::SoundBgm,
        Factor::HashtagKeyword,
        Factor::CrossAccountPerformance,
    ];

    /// Number of factors.
    pub const COUNT: usize = Self::ALL.len();

    /// Uniform share used when a platform has no learned weight for a factor.
    pub fn uniform_weight() -> f64 {
        1.0 / Self::COUNT as f64
    }

    /// Stable storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::HookType => "hook_type",
            Factor::ContentLength => "content_length",
            Factor::PostHour => "post_hour",
            Factor::PostWeekday => "post_weekday",
            Factor::Niche => "niche",
            Factor::NarrativeStructure => "narrative_structure",
            Factor::SoundBgm => "sound_bgm",
            Factor::HashtagKeyword => "hashtag_keyword",
            Factor::CrossAccountPerformance => "cross_account_performance",
        }
    }

    /// Parse a stable storage name back into a factor.
    pub fn parse(name: &str) -> Option<Factor> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    /// Whether this factor participates in the adjustment-factor cache.
    /// Cross-account performance is always computed in real time.
    pub fn is_cached(&self) -> bool {
        !matches!(self, Factor::CrossAccountPerformance)
    }

    /// Resolve the concrete value of this factor for one publication.
    /// `None` means the factor cannot be determined (no cache lookup,
    /// zero adjustment downstream).
    pub fn resolve_value(&self, inputs: &FactorInputs) -> Option<String> {
        match self {
            Factor::HookType => inputs.hook_type.clone(),
            Factor::ContentLength => inputs.duration_seconds.map(|d| length_bucket(d).to_string()),
            Factor::PostHour => inputs.posted_at.map(|t| hour_bucket(t.hour()).to_string()),
            Factor::PostWeekday => inputs
                .posted_at
                .map(|t| t.weekday().num_days_from_sunday().to_string()),
            Factor::Niche => inputs.niche.clone(),
            Factor::NarrativeStructure => inputs.narrative_structure.clone(),
            Factor::SoundBgm => inputs.bgm_category.clone(),
            Factor::HashtagKeyword => inputs.tags.first().cloned(),
            // Resolved live by the cross-account correlator, never from inputs.
            Factor::CrossAccountPerformance => None,
        }
    }
}

/// Everything needed to resolve cacheable factor values for one publication:
/// content metadata, account niche, posting time, and publication tags.
#[derive(Debug, Clone, Default)]
pub struct FactorInputs {
    pub hook_type: Option<String>,
    pub narrative_structure: Option<String>,
    pub duration_seconds: Option<f64>,
    pub bgm_category: Option<String>,
    pub niche: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

/// Content-length bucket: ≤15s, 16–30s, 31–60s, >60s.
pub fn length_bucket(duration_seconds: f64) -> &'static str {
    if duration_seconds <= 15.0 {
        "0-15s"
    } else if duration_seconds <= 30.0 {
        "16-30s"
    } else if duration_seconds <= 60.0 {
        "31-60s"
    } else {
        "60s+"
    }
}

/// Post-hour bucket: six bands covering 24 hours (the overnight band is wider).
pub fn hour_bucket(hour: u32) -> &'static str {
    match hour {
        0..=5 => "00-05",
        6..=8 => "06-08",
        9..=11 => "09-11",
        12..=14 => "12-14",
        15..=17 => "15-17",
        18..=20 => "18-20",
        _ => "21-23",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn length_bucket_boundaries() {
        assert_eq!(length_bucket(15.0), "0-15s");
        assert_eq!(length_bucket(15.5), "16-30s");
        assert_eq!(length_bucket(30.0), "16-30s");
        assert_eq!(length_bucket(31.0), "31-60s");
        assert_eq!(length_bucket(60.0), "31-60s");
        assert_eq!(length_bucket(61.0), "60s+");
    }

    #[test]
    fn hour_bucket_covers_all_hours() {
        assert_eq!(hour_bucket(0), "00-05");
        assert_eq!(hour_bucket(5), "00-05");
        assert_eq!(hour_bucket(6), "06-08");
        assert_eq!(hour_bucket(11), "09-11");
        assert_eq!(hour_bucket(14), "12-14");
        assert_eq!(hour_bucket(17), "15-17");
        assert_eq!(hour_bucket(20), "18-20");
        assert_eq!(hour_bucket(23), "21-23");
    }

    #[test]
    fn storage_names_round_trip() {
        for factor in Factor::ALL {
            assert_eq!(Factor::parse(factor.as_str()), Some(factor));
        }
        assert_eq!(Factor::parse("bogus"), None);
    }

    #[test]
    fn serde_names_match_storage_names() {
        for factor in Factor::ALL {
            let json = serde_json::to_string(&factor).unwrap();
            assert_eq!(json, format!("\"{}\"", factor.as_str()));
        }
    }

    #[test]
    fn only_cross_account_is_uncached() {
        let uncached: Vec<Factor> = Factor::ALL
            .into_iter()
            .filter(|f| !f.is_cached())
            .collect();
        assert_eq!(uncached, vec![Factor::CrossAccountPerformance]);
    }

    #[test]
    fn resolves_time_derived_values() {
        let posted = Utc.with_ymd_and_hms(2026, 3, 4, 19, 30, 0).unwrap(); // a Wednesday
        let inputs = FactorInputs {
            posted_at: Some(posted),
            ..Default::default()
        };
        assert_eq!(
            Factor::PostHour.resolve_value(&inputs),
            Some("18-20".to_string())
        );
        assert_eq!(
            Factor::PostWeekday.resolve_value(&inputs),
            Some("3".to_string())
        );
    }

    #[test]
    fn resolves_first_tag_as_keyword() {
        let inputs = FactorInputs {
            tags: vec!["fitness".to_string(), "gym".to_string()],
            ..Default::default()
        };
        assert_eq!(
            Factor::HashtagKeyword.resolve_value(&inputs),
            Some("fitness".to_string())
        );
        assert_eq!(
            Factor::HashtagKeyword.resolve_value(&FactorInputs::default()),
            None
        );
    }

    #[test]
    fn cross_account_never_resolves_from_inputs() {
        let inputs = FactorInputs {
            hook_type: Some("question".to_string()),
            ..Default::default()
        };
        assert_eq!(Factor::CrossAccountPerformance.resolve_value(&inputs), None);
    }
}
