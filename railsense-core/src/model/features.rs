use serde::{Deserialize, Serialize};

use super::Section;

/// the feature tuple submitted to a [`super::PredictorGateway`] for a single
/// train at a single section-hour.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictionFeatures {
    /// train category resolved from the roster, e.g. "Express" or "Goods"
    pub train_type: String,
    pub track_section: Section,
    pub day_of_week: DayOfWeek,
    /// hour of the day in [0, 23]
    pub hour_of_day: u8,
    pub weather_condition: Weather,
    /// count of trains occupying the section during this hour
    pub trains_in_section_hour: u32,
}

impl PredictionFeatures {
    /// copy of these features evaluated at another section, all other
    /// features held constant.
    pub fn at_section(&self, section: &Section) -> PredictionFeatures {
        PredictionFeatures {
            track_section: section.clone(),
            ..self.clone()
        }
    }

    /// copy of these features with a different traffic count.
    pub fn with_traffic(&self, trains_in_section_hour: u32) -> PredictionFeatures {
        PredictionFeatures {
            trains_in_section_hour,
            ..self.clone()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        };
        write!(f, "{s}")
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Weather {
    Clear,
    Rain,
    Fog,
    Storm,
    #[serde(rename = "Extreme Heat")]
    ExtremeHeat,
}

impl std::fmt::Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Weather::Clear => "Clear",
            Weather::Rain => "Rain",
            Weather::Fog => "Fog",
            Weather::Storm => "Storm",
            Weather::ExtremeHeat => "Extreme Heat",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_accepts_source_labels() {
        let w: Weather = serde_json::from_str("\"Extreme Heat\"").unwrap();
        assert_eq!(w, Weather::ExtremeHeat);
        assert!(serde_json::from_str::<Weather>("\"Hail\"").is_err());
    }

    #[test]
    fn test_at_section_holds_other_features() {
        let features = PredictionFeatures {
            train_type: String::from("Express"),
            track_section: Section::from("SBC"),
            day_of_week: DayOfWeek::Monday,
            hour_of_day: 10,
            weather_condition: Weather::Clear,
            trains_in_section_hour: 5,
        };
        let moved = features.at_section(&Section::from("KGI"));
        assert_eq!(moved.track_section, Section::from("KGI"));
        assert_eq!(moved.with_traffic(5), moved);
        assert_eq!(moved.hour_of_day, features.hour_of_day);
    }
}
