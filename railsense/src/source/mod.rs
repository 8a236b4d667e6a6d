mod roster;
mod source_error;
mod source_ops;
mod timetable_record;

pub use roster::{RosterEntry, RosterRecord, TrainRoster};
pub use source_error::SourceError;
pub use source_ops::{read_json, read_roster, read_timetable};
pub use timetable_record::TimetableRecord;
