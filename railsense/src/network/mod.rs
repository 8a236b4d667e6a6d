mod network_error;
mod network_graph;
mod network_source_config;
mod network_summary;

pub use network_error::NetworkError;
pub use network_graph::NetworkGraph;
pub use network_source_config::NetworkSourceConfig;
pub use network_summary::{NetworkGraphSource, NetworkGraphStats, NetworkGraphSummary};
