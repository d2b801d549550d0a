//! Per-job configuration loaded from named settings.
//!
//! Every tunable parameter is a named setting in the central store; a job
//! loads its typed config struct once at invocation time and threads it
//! explicitly through every computation. Missing keys fail loudly
//! ([`crate::errors::ConfigError::SettingMissing`]); the `Default` impls
//! exist for seeding and tests only.

pub mod defaults;
pub mod keys;

mod baseline_config;
mod cache_config;
mod forecast_config;
mod measurement_config;
mod weight_config;

pub use baseline_config::BaselineConfig;
pub use cache_config::CacheConfig;
pub use forecast_config::ForecastConfig;
pub use measurement_config::MeasurementConfig;
pub use weight_config::WeightConfig;
