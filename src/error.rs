use std::path::PathBuf;

use thiserror::Error;

/// Failures reading a loadout from disk
///
/// The engine itself has no error paths; this only covers the runner's input.
#[derive(Error, Debug)]
pub enum LoadoutError {
    #[error("Failed to read loadout {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid loadout JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown sample loadout: {0}")]
    UnknownSample(String),
}

/// Failures in the headless runner
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Loadout(#[from] LoadoutError),

    #[error("Failed to write result to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
