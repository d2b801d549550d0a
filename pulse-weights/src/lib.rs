//! # pulse-weights
//!
//! Periodically recalibrates the relative importance of each adjustment
//! factor per platform from error-correlation statistics, with tiered
//! recalculation intervals, exponential smoothing, change-rate clipping,
//! a weight floor, and final renormalization to sum 1.0. Every change is
//! audit-logged in the same transaction as the weight update.

pub mod correlation;
pub mod learner;
pub mod smoothing;
pub mod tier;

pub use learner::{run_weight_recalc_job, RecalcOutcome, SkipReason, WeightLearner};
pub use tier::Tier;
