use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
};

use indexmap::IndexMap;
use itertools::Itertools;
use kdam::tqdm;
use railsense_core::model::{Section, TrainId};

use super::NetworkError;
use crate::{
    source,
    timetable::{group_runs, SortedRun, TimetableEntry},
    util,
};

/// directed adjacency of track sections.
///
/// each section maps to its distinct successors in the order they were first
/// observed. every successor was seen as the immediate next stop of at least
/// one train run. only sections with at least one successor are keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkGraph(IndexMap<Section, Vec<Section>>);

impl NetworkGraph {
    /// a graph with no sections. used when no qualifying trains exist so that
    /// decisions still run against an explicitly empty network.
    pub fn empty() -> NetworkGraph {
        NetworkGraph(IndexMap::new())
    }

    /// builds the graph from the runs of the target population.
    ///
    /// an edge is drawn between each pair of consecutive stops that both carry
    /// a station code. self-loops from repeated stations are kept.
    ///
    /// # Errors
    ///
    /// * [`NetworkError::EmptyGraph`] if there are no runs, or no run produced an edge
    pub fn build(runs: &[SortedRun]) -> Result<NetworkGraph, NetworkError> {
        if runs.is_empty() {
            return Err(NetworkError::EmptyGraph(String::from(
                "no trains found in the target population",
            )));
        }
        let mut adjacency: IndexMap<Section, Vec<Section>> = IndexMap::new();
        let runs_iter = tqdm!(runs.iter(), desc = "build network graph", total = runs.len());
        for run in runs_iter {
            for (src, dst) in run.section_sequence().into_iter().tuple_windows() {
                if let (Some(src), Some(dst)) = (src, dst) {
                    let successors = adjacency.entry(src.clone()).or_default();
                    if !successors.contains(dst) {
                        successors.push(dst.clone());
                    }
                }
            }
        }
        eprintln!();

        if adjacency.is_empty() {
            return Err(NetworkError::EmptyGraph(format!(
                "{} train runs produced no section-to-section edges",
                runs.len()
            )));
        }
        let graph = NetworkGraph(adjacency);
        log::info!(
            "network graph built from {} train runs with {} sections and {} edges",
            runs.len(),
            graph.n_sections(),
            graph.n_edges()
        );
        Ok(graph)
    }

    /// restricts the timetable to the target population and builds the graph.
    pub fn from_timetable<I>(
        entries: I,
        population: &HashSet<TrainId>,
    ) -> Result<NetworkGraph, NetworkError>
    where
        I: IntoIterator<Item = TimetableEntry>,
    {
        if population.is_empty() {
            return Err(NetworkError::EmptyGraph(String::from(
                "no trains found in the target population",
            )));
        }
        let target_entries = entries
            .into_iter()
            .filter(|e| population.contains(&e.train_id));
        let runs = group_runs(target_entries);
        log::debug!(
            "{} of {} target trains have timetable entries",
            runs.len(),
            population.len()
        );
        NetworkGraph::build(&runs)
    }

    /// loads a persisted network map (see [`NetworkGraph::write_json`]).
    /// duplicate successors in the file are collapsed to their first occurrence.
    pub fn read_json(path: &Path) -> Result<NetworkGraph, NetworkError> {
        let map: BTreeMap<Section, Vec<Section>> = source::read_json(path)?;
        let adjacency: IndexMap<Section, Vec<Section>> = map
            .into_iter()
            .filter(|(_, successors)| !successors.is_empty())
            .map(|(section, successors)| (section, successors.into_iter().unique().collect_vec()))
            .collect();
        let graph = NetworkGraph(adjacency);
        log::info!(
            "network graph loaded from {} with {} sections and {} edges",
            path.display(),
            graph.n_sections(),
            graph.n_edges()
        );
        Ok(graph)
    }

    /// the successors of a section in insertion order. sections that are not
    /// in the graph, such as the end of a line, have none.
    pub fn successors(&self, section: &Section) -> &[Section] {
        self.0.get(section).map(|s| s.as_slice()).unwrap_or(&[])
    }

    pub fn contains(&self, section: &Section) -> bool {
        self.0.contains_key(section)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// number of sections with at least one successor
    pub fn n_sections(&self) -> usize {
        self.0.len()
    }

    pub fn n_edges(&self) -> usize {
        self.0.values().map(|s| s.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Section, &[Section])> {
        self.0.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn edges(&self) -> impl Iterator<Item = (&Section, &Section)> {
        self.0
            .iter()
            .flat_map(|(src, dsts)| dsts.iter().map(move |dst| (src, dst)))
    }

    /// the graph keyed by section code in sorted order, the persisted form.
    pub fn to_sorted_map(&self) -> BTreeMap<&Section, &[Section]> {
        self.iter().collect()
    }

    /// writes the network map as JSON with sorted keys.
    pub fn write_json(&self, filepath: &Path, overwrite: bool) -> Result<bool, NetworkError> {
        util::fs::write_json_pretty(&self.to_sorted_map(), filepath, overwrite).map_err(|message| {
            NetworkError::WriteError {
                path: filepath.to_owned(),
                message,
            }
        })
    }
}
