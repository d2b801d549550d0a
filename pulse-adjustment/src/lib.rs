//! # pulse-adjustment
//!
//! Builds the per-platform adjustment factor cache: for every cacheable
//! factor, the average relative lift/penalty (`actual / baseline − 1.0`)
//! per factor value over a trailing outcome window. Under-sampled entries
//! are recorded with their true sample count but marked inactive.

pub mod builder;
pub mod job;

pub use builder::build_entries;
pub use job::{run_adjustment_cache_job, CacheJobReport};
