use std::path::PathBuf;

use crate::source::SourceError;

#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    #[error("network graph is empty: {0}")]
    EmptyGraph(String),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("Error writing to '{path}': {message}")]
    WriteError { path: PathBuf, message: String },
}
