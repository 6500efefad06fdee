//! Graph-specific error types.

use lf_components::ComponentError;
use lf_core::{CompId, NodeId, WireId};
use thiserror::Error;

/// Illegal wire attempt. The circuit is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Node {node} cannot be wired to itself")]
    SelfLoop { node: NodeId },

    #[error("Node {node} does not exist")]
    UnknownNode { node: NodeId },

    #[error("Wire source {node} is not an output")]
    NotAnOutput { node: NodeId },

    #[error("Wire destination {node} is not an input")]
    NotAnInput { node: NodeId },

    #[error("Input {node} is already driven by wire {wire}")]
    InputAlreadyDriven { node: NodeId, wire: WireId },

    #[error("Width mismatch: output {from} is {from_width} bit(s), input {to} is {to_width} bit(s)")]
    WidthMismatch {
        from: NodeId,
        to: NodeId,
        from_width: u8,
        to_width: u8,
    },
}

/// A settle pass ran out of budget before the dirty set drained.
///
/// Non-fatal: the values computed so far stay in place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Circuit did not settle within {budget} steps ({pending} still pending)")]
pub struct UnstableCircuitError {
    pub budget: usize,
    pub pending: usize,
}

/// Graph mutation and lookup errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Component {comp} does not exist")]
    UnknownComponent { comp: CompId },

    #[error("Node {node} does not exist")]
    UnknownNode { node: NodeId },

    #[error("Wire {wire} does not exist")]
    UnknownWire { wire: WireId },

    #[error("Component {comp} has no {what} pin {pin}")]
    NoSuchPin {
        comp: CompId,
        what: &'static str,
        pin: usize,
    },

    #[error("Component {comp} is not a passthrough")]
    NotAPassthrough { comp: CompId },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}

pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_display() {
        let err = ConnectionError::InputAlreadyDriven {
            node: NodeId::from_index(3),
            wire: WireId::from_index(1),
        };
        assert_eq!(err.to_string(), "Input 3 is already driven by wire 1");
    }

    #[test]
    fn graph_error_wraps_connection_error() {
        let err: GraphError = ConnectionError::SelfLoop {
            node: NodeId::from_index(0),
        }
        .into();
        assert!(matches!(err, GraphError::Connection(_)));
        assert!(err.to_string().contains("itself"));
    }
}
