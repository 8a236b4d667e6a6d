use railsense_core::{model::TrainId, util::time_ops};
use serde::{Deserialize, Serialize};

/// one row of the timetable source: a single stop of a single train run.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TimetableRecord {
    #[serde(alias = "train_number")]
    pub train_id: TrainId,
    /// day of the run this stop falls on, starting at 1
    #[serde(default)]
    pub day: Option<u32>,
    #[serde(default)]
    pub station_code: Option<String>,
    /// clock string "HH:MM:SS", or "None"/null when the stop has no arrival
    #[serde(default, deserialize_with = "time_ops::deserialize_optional_clock")]
    pub arrival: Option<String>,
    /// clock string "HH:MM:SS", or "None"/null when the stop has no departure
    #[serde(default, deserialize_with = "time_ops::deserialize_optional_clock")]
    pub departure: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deserialize_source_row() {
        let row = r#"{"arrival": "None", "day": 1, "train_name": "Chennai Exp",
            "station_code": "SBC", "id": 7, "train_number": 12613, "departure": "06:20:00"}"#;
        let record: TimetableRecord = serde_json::from_str(row).unwrap();
        assert_eq!(record.train_id, TrainId::from("12613"));
        assert_eq!(record.arrival, None);
        assert_eq!(record.departure.as_deref(), Some("06:20:00"));
        assert_eq!(record.station_code.as_deref(), Some("SBC"));
    }

    #[test]
    fn test_deserialize_null_fields() {
        let row = r#"{"train_id": "T1", "day": null, "station_code": null, "arrival": null}"#;
        let record: TimetableRecord = serde_json::from_str(row).unwrap();
        assert_eq!(record.day, None);
        assert_eq!(record.station_code, None);
        assert_eq!(record.arrival, None);
        assert_eq!(record.departure, None);
    }
}
