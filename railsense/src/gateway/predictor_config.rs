use std::sync::Arc;

use railsense_core::model::{PredictorGateway, Weather};
use serde::{Deserialize, Serialize};

use super::HeuristicPredictor;

/// configures the [`PredictorGateway`] used by the decision context.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PredictorConfig {
    Heuristic(HeuristicPredictorConfig),
}

impl Default for PredictorConfig {
    fn default() -> Self {
        PredictorConfig::Heuristic(HeuristicPredictorConfig::default())
    }
}

impl PredictorConfig {
    pub fn build(&self) -> Arc<dyn PredictorGateway> {
        match self {
            PredictorConfig::Heuristic(conf) => Arc::new(HeuristicPredictor::from(conf)),
        }
    }
}

/// parameters of the deterministic stand-in predictor. delay is
///
///   (section base + peak surcharge + slow train surcharge + per-train traffic surcharge)
///     * weather multiplier
///
/// congestion is banded on the traffic count and an anomaly is flagged when
/// the delay exceeds `anomaly_delay_minutes`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HeuristicPredictorConfig {
    #[serde(default)]
    pub section_delays: Vec<SectionDelay>,
    #[serde(default = "default_peak_windows")]
    pub peak_windows: Vec<PeakWindow>,
    #[serde(default = "default_peak_delay")]
    pub peak_delay_minutes: f64,
    #[serde(default = "default_slow_train_types")]
    pub slow_train_types: Vec<String>,
    #[serde(default = "default_slow_train_delay")]
    pub slow_train_delay_minutes: f64,
    #[serde(default = "default_delay_per_train")]
    pub delay_per_train_minutes: f64,
    #[serde(default)]
    pub weather_multipliers: WeatherMultipliers,
    /// traffic counts above this are at least Medium congestion
    #[serde(default = "default_medium_traffic")]
    pub medium_traffic_threshold: u32,
    /// traffic counts above this are High congestion
    #[serde(default = "default_high_traffic")]
    pub high_traffic_threshold: u32,
    #[serde(default = "default_anomaly_delay")]
    pub anomaly_delay_minutes: f64,
    /// sections for which the model reports itself unavailable
    #[serde(default)]
    pub unavailable_sections: Vec<String>,
}

impl Default for HeuristicPredictorConfig {
    fn default() -> Self {
        Self {
            section_delays: vec![],
            peak_windows: default_peak_windows(),
            peak_delay_minutes: default_peak_delay(),
            slow_train_types: default_slow_train_types(),
            slow_train_delay_minutes: default_slow_train_delay(),
            delay_per_train_minutes: default_delay_per_train(),
            weather_multipliers: WeatherMultipliers::default(),
            medium_traffic_threshold: default_medium_traffic(),
            high_traffic_threshold: default_high_traffic(),
            anomaly_delay_minutes: default_anomaly_delay(),
            unavailable_sections: vec![],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SectionDelay {
    pub section: String,
    pub minutes: f64,
}

/// an inclusive range of hours of the day.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PeakWindow {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl PeakWindow {
    pub fn contains(&self, hour: u8) -> bool {
        self.start_hour <= hour && hour <= self.end_hour
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct WeatherMultipliers {
    pub clear: f64,
    pub rain: f64,
    pub fog: f64,
    pub storm: f64,
    pub extreme_heat: f64,
}

impl WeatherMultipliers {
    pub fn get(&self, weather: &Weather) -> f64 {
        match weather {
            Weather::Clear => self.clear,
            Weather::Rain => self.rain,
            Weather::Fog => self.fog,
            Weather::Storm => self.storm,
            Weather::ExtremeHeat => self.extreme_heat,
        }
    }
}

impl Default for WeatherMultipliers {
    fn default() -> Self {
        Self {
            clear: 1.0,
            rain: 1.3,
            fog: 1.9,
            storm: 2.8,
            extreme_heat: 1.4,
        }
    }
}

fn default_peak_windows() -> Vec<PeakWindow> {
    vec![
        PeakWindow {
            start_hour: 7,
            end_hour: 10,
        },
        PeakWindow {
            start_hour: 17,
            end_hour: 20,
        },
    ]
}

fn default_peak_delay() -> f64 {
    12.5
}

fn default_slow_train_types() -> Vec<String> {
    vec![String::from("Goods")]
}

fn default_slow_train_delay() -> f64 {
    20.0
}

fn default_delay_per_train() -> f64 {
    0.5
}

fn default_medium_traffic() -> u32 {
    3
}

fn default_high_traffic() -> u32 {
    7
}

fn default_anomaly_delay() -> f64 {
    120.0
}
