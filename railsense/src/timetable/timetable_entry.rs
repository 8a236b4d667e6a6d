use railsense_core::{
    model::{Section, TrainId},
    util::time_ops,
};
use serde::{Deserialize, Serialize};

use crate::source::TimetableRecord;

/// a timetable stop with clock strings converted to minute offsets from the
/// start of day 1 of the run. any field may still be unknown.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimetableEntry {
    pub train_id: TrainId,
    pub day: Option<u32>,
    pub section: Option<Section>,
    pub arrival: Option<i64>,
    pub departure: Option<i64>,
}

impl TimetableEntry {
    /// ordering key reconstructing the physical stopping order of a run.
    ///
    /// both components are `Option`s, and `None` orders before every `Some`:
    /// a stop with an unknown day or arrival ranks before every stop with a
    /// known one. the origin of a run has no arrival and therefore sorts first
    /// within its day.
    pub fn chronological_key(&self) -> (Option<u32>, Option<i64>) {
        (self.day, self.arrival)
    }
}

impl From<&TimetableRecord> for TimetableEntry {
    fn from(record: &TimetableRecord) -> Self {
        let section = record
            .station_code
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Section::from);
        TimetableEntry {
            train_id: record.train_id.clone(),
            day: record.day,
            section,
            arrival: time_ops::minute_offset(record.day, record.arrival.as_deref()),
            departure: time_ops::minute_offset(record.day, record.departure.as_deref()),
        }
    }
}

/// a stop of a train with both offsets resolved.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ScheduledStop {
    pub section: Section,
    /// minutes since the start of day 1 of the run
    pub arrival: i64,
    /// minutes since the start of day 1 of the run
    pub departure: i64,
}
