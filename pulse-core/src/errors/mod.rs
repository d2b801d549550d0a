//! Error types for every Pulse subsystem.

mod config_error;
mod learner_error;
mod storage_error;

pub use config_error::ConfigError;
pub use learner_error::LearnerError;
pub use storage_error::StorageError;

/// Top-level error wrapping the per-subsystem error enums.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Learner(#[from] LearnerError),
}

/// Result alias used across the workspace.
pub type PulseResult<T> = Result<T, PulseError>;
