use itertools::Itertools;
use railsense_core::model::{Section, TrainId};

use super::TimetableEntry;

/// all timetable entries of one train, in physical stopping order.
#[derive(Clone, Debug)]
pub struct SortedRun {
    pub train_id: TrainId,
    /// entries ordered by [`TimetableEntry::chronological_key`]
    pub entries: Vec<TimetableEntry>,
}

impl SortedRun {
    /// orders the entries of a single train. the sort is stable, so entries
    /// with equal keys keep their source order.
    pub fn new(train_id: TrainId, mut entries: Vec<TimetableEntry>) -> SortedRun {
        entries.sort_by_key(|e| e.chronological_key());
        SortedRun { train_id, entries }
    }

    /// the station sequence of this run. entries without a station code stay
    /// in the sequence as `None` so that no edge is drawn across them.
    pub fn section_sequence(&self) -> Vec<Option<&Section>> {
        self.entries.iter().map(|e| e.section.as_ref()).collect()
    }
}

/// groups entries by train and orders each group. runs are returned sorted by
/// train id so that downstream insertion order does not depend on the order
/// of the source file.
pub fn group_runs<I>(entries: I) -> Vec<SortedRun>
where
    I: IntoIterator<Item = TimetableEntry>,
{
    entries
        .into_iter()
        .map(|e| (e.train_id.clone(), e))
        .into_group_map()
        .into_iter()
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(train_id, group)| SortedRun::new(train_id, group))
        .collect_vec()
}
