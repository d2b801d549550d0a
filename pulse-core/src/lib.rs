//! # pulse-core
//!
//! Foundation crate for the Pulse performance-prediction loop.
//! Defines domain models, the closed adjustment-factor set, per-job
//! configuration, errors, and the traits that seam off external
//! collaborators (settings store, outcome collection, analysis queue).
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod factors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use errors::{PulseError, PulseResult};
pub use factors::{Factor, FactorInputs};
pub use models::{MeasurePoint, Platform};
