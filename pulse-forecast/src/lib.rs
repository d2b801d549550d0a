//! # pulse-forecast
//!
//! Builds the prediction snapshot for a publication at publish time:
//! baseline × weighted factor adjustments, with per-factor, total, and
//! value clipping. Also home to the real-time cross-account correlator
//! and the prediction-error calculator with its backfill job.

pub mod builder;
pub mod correlator;
pub mod error;

pub use builder::build_snapshot;
pub use correlator::{cross_account_effect, CrossAccountEffect};
pub use error::{calc_prediction_error, run_error_backfill_job, ErrorBackfillReport};
