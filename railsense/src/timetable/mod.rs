mod sorted_run;
mod timetable_entry;
mod timetable_index;

pub use sorted_run::{group_runs, SortedRun};
pub use timetable_entry::{ScheduledStop, TimetableEntry};
pub use timetable_index::TimetableIndex;
