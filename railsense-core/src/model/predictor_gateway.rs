use super::{Prediction, PredictionFeatures};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("prediction model unavailable: {0}")]
    ModelUnavailable(String),
}

/// the boundary to the delay, congestion and anomaly models.
///
/// implementations must be safe to call from many threads at once. a call is
/// synchronous and may fail independently of every other call; retry policy,
/// if any, belongs to the implementation.
pub trait PredictorGateway: Send + Sync {
    fn predict(&self, features: &PredictionFeatures) -> Result<Prediction, PredictionError>;
}
