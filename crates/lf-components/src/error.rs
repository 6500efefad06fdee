//! Error types for component construction.

use thiserror::Error;

/// Errors raised while building a component from its parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    #[error("Invalid parameter for {kind}: {what}")]
    InvalidParam {
        kind: &'static str,
        what: &'static str,
    },

    #[error("Unknown component kind: {tag}")]
    UnknownKind { tag: String },
}

pub type ComponentResult<T> = Result<T, ComponentError>;
