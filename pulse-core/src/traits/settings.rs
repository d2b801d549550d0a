use crate::errors::PulseResult;

/// Read access to the central store of named settings.
///
/// A missing key is an explicit [`crate::errors::ConfigError::SettingMissing`]
/// failure, never a silent zero.
pub trait ISettings: Send + Sync {
    fn get_number(&self, key: &str) -> PulseResult<f64>;
    fn get_integer(&self, key: &str) -> PulseResult<i64>;
}
