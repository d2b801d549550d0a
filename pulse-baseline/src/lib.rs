//! # pulse-baseline
//!
//! Computes each account's expected impressions through a fallback chain:
//! own trailing-window history, then progressively wider cohorts
//! (platform × niche × age bucket, platform × niche, platform), then a
//! configured default. Recomputed daily for all active accounts and fully
//! overwritten per account.

pub mod estimator;
pub mod job;

pub use estimator::estimate;
pub use job::{run_baseline_job, BaselineJobReport};
