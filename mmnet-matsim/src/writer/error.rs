use std::path::PathBuf;

use mmnet_core::{crs::CrsError, model::ModelError};

#[derive(thiserror::Error, Debug)]
pub enum MatsimWriterError {
    #[error("Invalid input: {0}")]
    InvalidUserInput(String),
    #[error("network and transit writer settings disagree: {0}")]
    InconsistentSettings(String),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Crs(#[from] CrsError),
    #[error("Error writing to '{path}': {message}")]
    WriteError { path: PathBuf, message: String },
    #[error("Error writing XML: {0}")]
    XmlWriteError(String),
    #[error("Error writing to csv: {0}")]
    CsvWriteError(String),
    #[error("{0}")]
    InternalError(String),
}
