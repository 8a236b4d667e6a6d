use std::collections::{HashMap, HashSet};

use railsense_core::model::{
    CongestionLevel, Prediction, PredictionError, PredictionFeatures, PredictorGateway, Section,
};

use super::{HeuristicPredictorConfig, PeakWindow, WeatherMultipliers};

/// deterministic, configuration-driven delay model. stands in for the trained
/// delay, congestion and anomaly models behind the same gateway boundary.
pub struct HeuristicPredictor {
    section_delays: HashMap<Section, f64>,
    peak_windows: Vec<PeakWindow>,
    peak_delay_minutes: f64,
    slow_train_types: HashSet<String>,
    slow_train_delay_minutes: f64,
    delay_per_train_minutes: f64,
    weather_multipliers: WeatherMultipliers,
    medium_traffic_threshold: u32,
    high_traffic_threshold: u32,
    anomaly_delay_minutes: f64,
    unavailable_sections: HashSet<Section>,
}

impl HeuristicPredictor {
    fn delay(&self, features: &PredictionFeatures) -> f64 {
        let mut delay = self
            .section_delays
            .get(&features.track_section)
            .copied()
            .unwrap_or_default();
        if self
            .peak_windows
            .iter()
            .any(|w| w.contains(features.hour_of_day))
        {
            delay += self.peak_delay_minutes;
        }
        if self.slow_train_types.contains(&features.train_type) {
            delay += self.slow_train_delay_minutes;
        }
        delay += self.delay_per_train_minutes * features.trains_in_section_hour as f64;
        delay *= self.weather_multipliers.get(&features.weather_condition);
        delay.max(0.0)
    }

    fn congestion(&self, trains_in_section_hour: u32) -> CongestionLevel {
        if trains_in_section_hour > self.high_traffic_threshold {
            CongestionLevel::High
        } else if trains_in_section_hour > self.medium_traffic_threshold {
            CongestionLevel::Medium
        } else {
            CongestionLevel::Low
        }
    }
}

impl PredictorGateway for HeuristicPredictor {
    fn predict(&self, features: &PredictionFeatures) -> Result<Prediction, PredictionError> {
        if self.unavailable_sections.contains(&features.track_section) {
            return Err(PredictionError::ModelUnavailable(format!(
                "no model is loaded for section {}",
                features.track_section
            )));
        }
        let delay_minutes = self.delay(features);
        Ok(Prediction {
            delay_minutes,
            congestion_level: self.congestion(features.trains_in_section_hour),
            is_anomaly: delay_minutes > self.anomaly_delay_minutes,
        })
    }
}

impl From<&HeuristicPredictorConfig> for HeuristicPredictor {
    fn from(conf: &HeuristicPredictorConfig) -> Self {
        HeuristicPredictor {
            section_delays: conf
                .section_delays
                .iter()
                .map(|d| (Section::from(d.section.as_str()), d.minutes))
                .collect(),
            peak_windows: conf.peak_windows.clone(),
            peak_delay_minutes: conf.peak_delay_minutes,
            slow_train_types: conf.slow_train_types.iter().cloned().collect(),
            slow_train_delay_minutes: conf.slow_train_delay_minutes,
            delay_per_train_minutes: conf.delay_per_train_minutes,
            weather_multipliers: conf.weather_multipliers,
            medium_traffic_threshold: conf.medium_traffic_threshold,
            high_traffic_threshold: conf.high_traffic_threshold,
            anomaly_delay_minutes: conf.anomaly_delay_minutes,
            unavailable_sections: conf
                .unavailable_sections
                .iter()
                .map(|s| Section::from(s.as_str()))
                .collect(),
        }
    }
}
