use serde::{Deserialize, Serialize};

/// where the network graph comes from.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum NetworkSourceConfig {
    /// derive the graph from the timetable runs of the target train population
    #[default]
    Timetable,
    /// load a previously persisted network map and use it as a fixed graph
    File { path: String },
}
