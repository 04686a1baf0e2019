//! Error types shared by the three commands.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenusError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{}:{line}: {message}", .path.display())]
    InputFormat {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("Missing column '{column}' in {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("No frequency CSV files found in folder: {}", .0.display())]
    NoFrequencyFiles(PathBuf),
}

pub type Result<T> = std::result::Result<T, GenusError>;
