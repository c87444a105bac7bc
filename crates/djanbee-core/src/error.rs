use std::path::PathBuf;

use thiserror::Error;

/// Reasons an interactive flow stops short. "Not found" is not one of them;
/// discovery reports that as `None`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("cancelled by user")]
    Declined,
    #[error("No active virtual environment found")]
    NoActiveEnvironment,
    #[error("Requirements file not found: {}", .0.display())]
    ManifestMissing(PathBuf),
    #[error("{0}")]
    Command(String),
    #[error("{0}")]
    Io(String),
}

impl From<anyhow::Error> for FlowError {
    fn from(err: anyhow::Error) -> Self {
        Self::Io(format!("{err:#}"))
    }
}
