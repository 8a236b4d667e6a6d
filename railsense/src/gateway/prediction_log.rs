use std::path::{Path, PathBuf};

use railsense_core::model::{DayOfWeek, PredictionRecord, Weather};
use serde::{Deserialize, Serialize};

use crate::util;

/// a flat record of one prediction for the CSV prediction log.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictionLogRow {
    pub train_number: String,
    pub track_section: String,
    pub day_of_week: DayOfWeek,
    pub hour_of_day: u8,
    pub weather_condition: Weather,
    pub trains_in_section_hour: u32,
    pub train_type_used: String,
    pub predicted_delay_minutes: f64,
    pub predicted_congestion_level: String,
    pub is_anomaly: bool,
    pub recommended_speed_action: Option<String>,
}

impl PredictionLogRow {
    pub fn new(
        train_number: &str,
        record: &PredictionRecord,
        recommended_speed_action: Option<String>,
    ) -> PredictionLogRow {
        let f = &record.features;
        let p = &record.prediction;
        PredictionLogRow {
            train_number: train_number.to_string(),
            track_section: f.track_section.to_string(),
            day_of_week: f.day_of_week,
            hour_of_day: f.hour_of_day,
            weather_condition: f.weather_condition,
            trains_in_section_hour: f.trains_in_section_hour,
            train_type_used: f.train_type.clone(),
            predicted_delay_minutes: p.delay_minutes,
            predicted_congestion_level: p.congestion_level.to_string(),
            is_anomaly: p.is_anomaly,
            recommended_speed_action,
        }
    }
}

/// append-only CSV log of served predictions.
#[derive(Clone, Debug)]
pub struct PredictionLog {
    path: PathBuf,
}

impl PredictionLog {
    pub fn new(path: &Path) -> PredictionLog {
        PredictionLog {
            path: path.to_owned(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, rows: &[PredictionLogRow]) -> Result<(), String> {
        if rows.is_empty() {
            return Ok(());
        }
        util::fs::append_csv_rows(rows, &self.path)
            .map_err(|e| format!("prediction log '{}': {e}", self.path.display()))?;
        log::debug!("appended {} rows to {}", rows.len(), self.path.display());
        Ok(())
    }
}
