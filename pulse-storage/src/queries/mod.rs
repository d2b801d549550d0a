//! Raw SQL operations, one module per table group.

pub mod account_ops;
pub mod baseline_ops;
pub mod cache_ops;
pub mod content_ops;
pub mod metric_ops;
pub mod publication_ops;
pub mod queue_ops;
pub mod settings_ops;
pub mod snapshot_ops;
pub mod weight_ops;

use chrono::{DateTime, Utc};

use pulse_core::errors::PulseResult;

use crate::to_storage_err;

/// Parse an RFC 3339 timestamp stored as TEXT.
pub(crate) fn parse_ts(value: &str) -> PulseResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad timestamp {value:?}: {e}")))
}
