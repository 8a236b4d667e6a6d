use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::NetworkGraph;

/// summarizes a network graph build.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NetworkGraphSummary {
    /// information describing how this graph was generated
    pub source: NetworkGraphSource,
    pub stats: NetworkGraphStats,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "snake_case")]
pub struct NetworkGraphSource {
    /// timetable file the runs were read from
    pub timetable_file: String,
    /// zones defining the target train population
    pub target_zones: Vec<String>,
    /// roster trains in the target zones
    pub target_trains: usize,
    /// date and time this graph was created
    pub created: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct NetworkGraphStats {
    /// sections with at least one successor
    pub sections: usize,
    /// sections only ever observed as a successor, e.g. line terminals
    pub terminal_sections: usize,
    pub edges: usize,
    pub self_loops: usize,
    pub max_out_degree: usize,
    /// number of sections by out-degree
    pub out_degree_counts: BTreeMap<usize, usize>,
}

impl NetworkGraphSource {
    pub fn new(timetable_file: &str, target_zones: &[String], target_trains: usize) -> Self {
        let created = chrono::Utc::now().to_rfc3339();
        Self {
            timetable_file: timetable_file.to_string(),
            target_zones: target_zones.to_vec(),
            target_trains,
            created,
        }
    }
}

impl From<&NetworkGraph> for NetworkGraphStats {
    fn from(graph: &NetworkGraph) -> Self {
        let mut out_degree_counts: BTreeMap<usize, usize> = BTreeMap::new();
        for (_, successors) in graph.iter() {
            *out_degree_counts.entry(successors.len()).or_default() += 1;
        }
        let terminal_sections = graph
            .edges()
            .map(|(_, dst)| dst)
            .filter(|dst| !graph.contains(dst))
            .collect::<HashSet<_>>()
            .len();
        NetworkGraphStats {
            sections: graph.n_sections(),
            terminal_sections,
            edges: graph.n_edges(),
            self_loops: graph.edges().filter(|(src, dst)| src == dst).count(),
            max_out_degree: out_degree_counts.keys().max().copied().unwrap_or_default(),
            out_degree_counts,
        }
    }
}

impl NetworkGraphSummary {
    pub fn new(source: NetworkGraphSource, graph: &NetworkGraph) -> Self {
        Self {
            source,
            stats: NetworkGraphStats::from(graph),
        }
    }
}
