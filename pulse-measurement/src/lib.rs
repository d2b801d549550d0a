//! # pulse-measurement
//!
//! Polling orchestrator for the three measurement rounds. For each round,
//! finds publications whose round column is still unset and whose delay
//! has elapsed, collects outcomes through the injected collector, records
//! actual + error + metric in one transaction, and enqueues downstream
//! analysis. Idempotent by construction: only NULL columns are acted on,
//! and an unavailable result leaves the target for the next run.

pub mod collector;
pub mod orchestrator;

pub use collector::NullCollector;
pub use orchestrator::{MeasurementOrchestrator, MeasurementReport, RoundReport};
