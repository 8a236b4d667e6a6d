use std::collections::HashMap;

use railsense_core::model::TrainId;

use super::{group_runs, ScheduledStop, SortedRun, TimetableEntry};

/// per-train chronological stop lists with resolved arrival and departure offsets.
#[derive(Clone, Debug, Default)]
pub struct TimetableIndex(HashMap<TrainId, Vec<ScheduledStop>>);

impl TimetableIndex {
    /// builds the index over every train in the provided entries.
    pub fn build<I>(entries: I) -> TimetableIndex
    where
        I: IntoIterator<Item = TimetableEntry>,
    {
        let mut dropped = 0;
        let lookup: HashMap<TrainId, Vec<ScheduledStop>> = group_runs(entries)
            .into_iter()
            .map(|run| {
                let n_entries = run.entries.len();
                let train_id = run.train_id.clone();
                let stops = resolve_run(run);
                dropped += n_entries - stops.len();
                (train_id, stops)
            })
            .collect();
        if dropped > 0 {
            log::debug!("timetable index dropped {dropped} entries with unrecoverable times");
        }
        TimetableIndex(lookup)
    }

    /// the stops of a train ordered by departure offset, if the train is known.
    pub fn stops(&self, train_id: &TrainId) -> Option<&[ScheduledStop]> {
        self.0.get(train_id).map(|s| s.as_slice())
    }

    pub fn n_trains(&self) -> usize {
        self.0.len()
    }

    pub fn n_stops(&self) -> usize {
        self.0.values().map(|s| s.len()).sum()
    }
}

/// resolves unknown offsets within a single run:
///
///   1. departure is forward-filled from the nearest earlier known departure
///   2. arrival is back-filled from the nearest later known arrival
///   3. a still-unknown arrival takes the stop's departure, and vice versa
///
/// stops with both offsets unknown, or without a station code, are dropped.
/// the result is ordered by departure offset.
fn resolve_run(run: SortedRun) -> Vec<ScheduledStop> {
    let mut entries = run.entries;

    let mut last_departure: Option<i64> = None;
    for entry in entries.iter_mut() {
        match entry.departure {
            Some(d) => last_departure = Some(d),
            None => entry.departure = last_departure,
        }
    }

    let mut next_arrival: Option<i64> = None;
    for entry in entries.iter_mut().rev() {
        match entry.arrival {
            Some(a) => next_arrival = Some(a),
            None => entry.arrival = next_arrival,
        }
    }

    let mut stops: Vec<ScheduledStop> = entries
        .into_iter()
        .filter_map(|e| {
            let section = e.section?;
            let (arrival, departure) = match (e.arrival, e.departure) {
                (Some(a), Some(d)) => (a, d),
                (Some(a), None) => (a, a),
                (None, Some(d)) => (d, d),
                (None, None) => return None,
            };
            Some(ScheduledStop {
                section,
                arrival,
                departure,
            })
        })
        .collect();
    stops.sort_by_key(|s| s.departure);
    stops
}
