use railsense_core::model::{DayOfWeek, Section, TrainId, Weather};
use serde::{Deserialize, Serialize};

use super::DecisionError;

/// the observed state of one train, as submitted by a dispatcher.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrainInfo {
    pub train_number: TrainId,
    pub track_section: Section,
    pub day_of_week: DayOfWeek,
    pub hour_of_day: u8,
    pub weather_condition: Weather,
    pub trains_in_section_hour: u32,
}

impl TrainInfo {
    /// checks the fields serde cannot constrain on its own.
    pub fn validate(&self) -> Result<(), DecisionError> {
        if self.hour_of_day > 23 {
            return Err(DecisionError::InvalidRequest(format!(
                "hour_of_day must be in [0, 23], found {}",
                self.hour_of_day
            )));
        }
        if self.train_number.as_str().trim().is_empty() {
            return Err(DecisionError::InvalidRequest(String::from(
                "train_number must not be empty",
            )));
        }
        if self.track_section.as_str().trim().is_empty() {
            return Err(DecisionError::InvalidRequest(String::from(
                "track_section must not be empty",
            )));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RouteRequest {
    /// sections in the order the train is expected to pass them
    pub route: Vec<Section>,
    pub train_info: TrainInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DepartureRequest {
    pub conflicting_train_1: TrainInfo,
    pub conflicting_train_2: TrainInfo,
    /// the section both trains want to enter next
    pub next_section: Section,
}
