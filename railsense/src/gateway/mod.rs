mod heuristic_predictor;
mod prediction_log;
mod predictor_config;

pub use heuristic_predictor::HeuristicPredictor;
pub use prediction_log::{PredictionLog, PredictionLogRow};
pub use predictor_config::{
    HeuristicPredictorConfig, PeakWindow, PredictorConfig, SectionDelay, WeatherMultipliers,
};
