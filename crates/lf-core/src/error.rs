use thiserror::Error;

pub type LfResult<T> = Result<T, LfError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LfError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}

/// Bounds-checked index helper shared by the component and graph crates.
pub fn check_index(what: &'static str, index: usize, len: usize) -> LfResult<usize> {
    if index < len {
        Ok(index)
    } else {
        Err(LfError::IndexOob { what, index, len })
    }
}
