use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("required input data is missing: '{path}'")]
    InputDataMissing { path: PathBuf },
    #[error("Error reading from '{path}': {message}")]
    ReadError { path: PathBuf, message: String },
    #[error("error due to dataset contents: {0}")]
    InvalidData(String),
}
