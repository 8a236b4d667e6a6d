use std::path::Path;

use itertools::Itertools;

use super::{AppError, RailsenseConfig, SourceConfig};
use crate::{
    decision::DecisionContext,
    network::{NetworkError, NetworkGraph, NetworkSourceConfig},
    source::{self, TrainRoster},
    timetable::{TimetableEntry, TimetableIndex},
};

/// the parsed roster and timetable sources.
pub struct SourceData {
    pub roster: TrainRoster,
    pub entries: Vec<TimetableEntry>,
}

impl SourceData {
    /// reads both sources. missing files are fatal.
    pub fn load(sources: &SourceConfig) -> Result<SourceData, AppError> {
        let roster = source::read_roster(Path::new(&sources.trains_file))?;
        let records = source::read_timetable(Path::new(&sources.schedules_file))?;
        let entries = records.iter().map(TimetableEntry::from).collect_vec();
        Ok(SourceData { roster, entries })
    }

    /// builds the graph over the roster trains in the target zones.
    pub fn network_graph(&self, target_zones: &[String]) -> Result<NetworkGraph, NetworkError> {
        let population = self.roster.population(target_zones);
        log::info!(
            "{} roster trains in target zones [{}]",
            population.len(),
            target_zones.iter().join(", ")
        );
        NetworkGraph::from_timetable(self.entries.iter().cloned(), &population)
    }
}

/// loads every source named by the configuration and assembles the
/// immutable decision context.
///
/// a timetable-derived graph with no edges is not fatal here: a warning is
/// logged and decisions run against an empty network, so reroutes report no
/// alternatives while route evaluation and arbitration keep working.
pub fn build_context(config: &RailsenseConfig) -> Result<DecisionContext, AppError> {
    let data = SourceData::load(&config.sources)?;

    let graph = match &config.network {
        NetworkSourceConfig::Timetable => {
            match data.network_graph(&config.sources.target_zones) {
                Ok(graph) => graph,
                Err(NetworkError::EmptyGraph(msg)) => {
                    log::warn!("{msg}, serving decisions with an empty network graph");
                    NetworkGraph::empty()
                }
                Err(e) => return Err(AppError::from(e)),
            }
        }
        NetworkSourceConfig::File { path } => NetworkGraph::read_json(Path::new(path))?,
    };

    let SourceData { roster, entries } = data;
    let timetable = TimetableIndex::build(entries);
    log::info!(
        "timetable index holds {} trains with {} stops",
        timetable.n_trains(),
        timetable.n_stops()
    );

    let gateway = config.predictor.build();
    Ok(DecisionContext::new(
        graph,
        timetable,
        roster,
        gateway,
        config.policy.clone(),
    ))
}
