use std::fmt::Display;

use railsense_core::model::{CongestionLevel, Prediction, PredictionRecord, TrainId};
use serde::{Deserialize, Serialize};

use super::{DecisionContext, DecisionError, DecisionPolicy, TrainInfo};
use crate::gateway::PredictionLogRow;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpeedAction {
    IncreaseSpeed,
    DecreaseSpeed,
    MaintainSpeed,
}

impl SpeedAction {
    /// recovers lost time on an open section, yields on a congested one.
    pub fn advise(prediction: &Prediction, policy: &DecisionPolicy) -> SpeedAction {
        if prediction.delay_minutes > policy.increase_speed_delay_minutes
            && prediction.congestion_level == CongestionLevel::Low
        {
            SpeedAction::IncreaseSpeed
        } else if prediction.congestion_level >= policy.decrease_speed_congestion {
            SpeedAction::DecreaseSpeed
        } else {
            SpeedAction::MaintainSpeed
        }
    }
}

impl Display for SpeedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SpeedAction::IncreaseSpeed => "INCREASE_SPEED",
            SpeedAction::DecreaseSpeed => "DECREASE_SPEED",
            SpeedAction::MaintainSpeed => "MAINTAIN_SPEED",
        };
        write!(f, "{s}")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SpeedAdvice {
    pub train_number: TrainId,
    pub prediction: PredictionRecord,
    pub recommended_speed_action: SpeedAction,
}

impl SpeedAdvice {
    pub fn log_row(&self) -> PredictionLogRow {
        PredictionLogRow::new(
            self.train_number.as_str(),
            &self.prediction,
            Some(self.recommended_speed_action.to_string()),
        )
    }
}

/// predicts the train's current section and recommends a speed action.
pub fn advise_speed(ctx: &DecisionContext, info: &TrainInfo) -> Result<SpeedAdvice, DecisionError> {
    let features = ctx.features(info)?;
    let prediction = ctx.predict(&features).map_err(|e| {
        DecisionError::model_unavailable(vec![info.track_section.clone()], &[e])
    })?;
    let action = SpeedAction::advise(&prediction, &ctx.policy);
    Ok(SpeedAdvice {
        train_number: info.train_number.clone(),
        prediction: PredictionRecord::new(features, prediction),
        recommended_speed_action: action,
    })
}
