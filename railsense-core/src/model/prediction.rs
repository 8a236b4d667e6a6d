use serde::{Deserialize, Serialize};

use super::PredictionFeatures;

/// categorical traffic-density label for a section-hour.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CongestionLevel::Low => "Low",
            CongestionLevel::Medium => "Medium",
            CongestionLevel::High => "High",
        };
        write!(f, "{s}")
    }
}

/// output of a predictor gateway call.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Prediction {
    /// expected delay in minutes, non-negative
    pub delay_minutes: f64,
    pub congestion_level: CongestionLevel,
    pub is_anomaly: bool,
}

/// a prediction along with the features that produced it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictionRecord {
    pub features: PredictionFeatures,
    pub prediction: Prediction,
}

impl PredictionRecord {
    pub fn new(features: PredictionFeatures, prediction: Prediction) -> PredictionRecord {
        PredictionRecord {
            features,
            prediction,
        }
    }
}
