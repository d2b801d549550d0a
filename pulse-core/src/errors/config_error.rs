/// Configuration-layer errors.
///
/// A missing setting must surface as an explicit failure distinct from
/// "zero"; callers never receive a silently substituted default.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("setting not found: {key}")]
    SettingMissing { key: String },

    #[error("setting {key} has invalid value {value:?}: {reason}")]
    SettingInvalid {
        key: String,
        value: String,
        reason: String,
    },
}
