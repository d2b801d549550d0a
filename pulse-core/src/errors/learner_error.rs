/// Weight-learner errors.
#[derive(Debug, thiserror::Error)]
pub enum LearnerError {
    #[error("weight recalculation already running for platform {platform}")]
    AlreadyRunning { platform: String },
}
