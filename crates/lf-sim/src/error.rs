//! Error types for simulation runs.

use thiserror::Error;

/// Errors encountered while stepping a circuit through time.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Probe '{label}' does not point at a live node")]
    UnknownProbe { label: String },
}

pub type SimResult<T> = Result<T, SimError>;
