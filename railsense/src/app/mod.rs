mod app_error;
mod context_builder;
mod network;
mod railsense_app;
mod railsense_config;
mod request_batch;

pub use app_error::AppError;
pub use context_builder::{build_context, SourceData};
pub use railsense_app::{RailsenseApp, RailsenseOperation};
pub use railsense_config::{RailsenseConfig, SourceConfig};
pub use request_batch::{DecisionResponse, ParsedRequest, RequestBatch};
