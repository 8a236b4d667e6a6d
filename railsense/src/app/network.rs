use std::path::Path;

use super::{context_builder::SourceData, AppError, RailsenseConfig};
use crate::network::{NetworkGraphSource, NetworkGraphSummary};

/// builds the network graph from the configured sources and persists it as a
/// network map. an empty graph is an error here.
pub fn run(config: &RailsenseConfig, output_file: &Path, write_summary: bool) -> Result<(), AppError> {
    let sources = &config.sources;
    let data = SourceData::load(sources)?;
    let graph = data.network_graph(&sources.target_zones)?;

    graph.write_json(output_file, true)?;
    log::info!("network map written to {}", output_file.display());

    let summary = NetworkGraphSummary::new(
        NetworkGraphSource::new(
            &sources.schedules_file,
            &sources.target_zones,
            data.roster.population(&sources.target_zones).len(),
        ),
        &graph,
    );
    log::info!(
        "{} sections ({} terminal), {} edges, {} self-loops, max out-degree {}",
        summary.stats.sections,
        summary.stats.terminal_sections,
        summary.stats.edges,
        summary.stats.self_loops,
        summary.stats.max_out_degree
    );
    if write_summary {
        let summary_file = output_file.with_extension("summary.json");
        crate::util::fs::write_json_pretty(&summary, &summary_file, true).map_err(|message| {
            AppError::WriteError {
                path: summary_file.clone(),
                message,
            }
        })?;
        log::info!("network summary written to {}", summary_file.display());
    }
    Ok(())
}
