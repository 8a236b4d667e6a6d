use std::path::PathBuf;

use railsense_core::model::PredictionError;

use crate::{decision::DecisionError, network::NetworkError, source::SourceError};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Decision(#[from] DecisionError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Error reading from '{path}': {message}")]
    ReadError { path: PathBuf, message: String },
    #[error("Error writing to '{path}': {message}")]
    WriteError { path: PathBuf, message: String },
    #[error("{0}")]
    Internal(String),
}
