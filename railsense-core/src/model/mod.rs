mod features;
mod prediction;
mod predictor_gateway;
mod section;

pub use features::{DayOfWeek, PredictionFeatures, Weather};
pub use prediction::{CongestionLevel, Prediction, PredictionRecord};
pub use predictor_gateway::{PredictionError, PredictorGateway};
pub use section::{Section, TrainId};
