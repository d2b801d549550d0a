//! Domain models persisted by pulse-storage.

mod account;
mod adjustment;
mod baseline;
mod content;
mod measurement;
mod metric;
mod publication;
mod snapshot;
mod weights;

pub use account::{Account, AccountStatus, AgeBucket, Platform};
pub use adjustment::FactorCacheEntry;
pub use baseline::{AccountBaseline, BaselineSource};
pub use content::ContentMeta;
pub use measurement::{AnalysisKind, AnalysisTask, MeasurementTarget, OutcomeObservation};
pub use metric::{MeasurePoint, OutcomeMetric};
pub use publication::{Publication, PublicationStatus};
pub use snapshot::{FactorAdjustment, PredictionSnapshot};
pub use weights::{PredictionWeight, WeightAuditEntry};
