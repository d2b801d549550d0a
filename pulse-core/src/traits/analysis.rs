use crate::errors::PulseResult;
use crate::models::AnalysisTask;

/// Hands a downstream analysis task to the (external) analysis layer.
pub trait IAnalysisQueue: Send + Sync {
    fn enqueue(&self, task: &AnalysisTask) -> PulseResult<()>;
}
