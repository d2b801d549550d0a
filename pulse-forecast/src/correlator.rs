//! Real-time cross-account correlation: how the same content performed on
//! other accounts of the same platform.

use pulse_core::errors::PulseResult;
use pulse_core::models::{MeasurePoint, Platform};
use pulse_storage::queries::snapshot_ops;
use pulse_storage::StorageEngine;

/// The cross-account effect for one content item. An adjustment of 0 with
/// a sample count of 0 means "no detectable effect", not missing data;
/// downstream treats it identically to a measured null effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossAccountEffect {
    pub adjustment: f64,
    pub sample_count: u32,
}

impl CrossAccountEffect {
    /// The null effect returned below the minimum sample.
    pub const NONE: CrossAccountEffect = CrossAccountEffect {
        adjustment: 0.0,
        sample_count: 0,
    };
}

/// Mean of `actual / baseline − 1.0` across *other* accounts on the
/// *same* platform that published the same content and have a primary
/// round outcome. Cross-platform results are excluded by construction.
pub fn cross_account_effect(
    storage: &StorageEngine,
    content_id: &str,
    platform: Platform,
    exclude_account_id: &str,
    min_sample: u32,
) -> PulseResult<CrossAccountEffect> {
    let aggregate = storage.with_reader(|conn| {
        snapshot_ops::cross_account_aggregate(
            conn,
            content_id,
            platform,
            exclude_account_id,
            MeasurePoint::Primary,
        )
    })?;

    match aggregate {
        Some((adjustment, sample_count)) if sample_count >= min_sample => Ok(CrossAccountEffect {
            adjustment,
            sample_count,
        }),
        _ => Ok(CrossAccountEffect::NONE),
    }
}
