//! Connection checks and arena consistency validation.

use std::collections::HashSet;

use lf_core::{NodeId, WireId};

use crate::circuit::Circuit;
use crate::error::{ConnectionError, GraphError, GraphResult};
use crate::node::Direction;

/// Reject a wire that would break a structural invariant.
pub(crate) fn check_connection(
    circuit: &Circuit,
    from: NodeId,
    to: NodeId,
) -> Result<(), ConnectionError> {
    if from == to {
        return Err(ConnectionError::SelfLoop { node: from });
    }
    let source = circuit
        .node(from)
        .ok_or(ConnectionError::UnknownNode { node: from })?;
    let dest = circuit
        .node(to)
        .ok_or(ConnectionError::UnknownNode { node: to })?;

    if source.direction() != Direction::Output {
        return Err(ConnectionError::NotAnOutput { node: from });
    }
    if dest.direction() != Direction::Input {
        return Err(ConnectionError::NotAnInput { node: to });
    }
    // A second driver on one input is contention; refuse it outright.
    if let Some(wire) = dest.incoming() {
        return Err(ConnectionError::InputAlreadyDriven { node: to, wire });
    }
    if source.width() != dest.width() {
        return Err(ConnectionError::WidthMismatch {
            from,
            to,
            from_width: source.width(),
            to_width: dest.width(),
        });
    }
    Ok(())
}

fn broken(what: String) -> GraphError {
    GraphError::Invariant { what }
}

/// Verify every cross-reference between components, nodes and wires.
///
/// - each node's owner exists and lists the node at its pin
/// - each wire's endpoints exist, have the right direction, and list the wire
/// - each input lists at most the one wire that targets it
pub(crate) fn check_consistency(circuit: &Circuit) -> GraphResult<()> {
    for comp in circuit.components() {
        let (Some(inputs), Some(outputs)) = (circuit.inputs_of(comp), circuit.outputs_of(comp))
        else {
            return Err(broken(format!("component {comp} has no pin lists")));
        };
        for (pin, id) in inputs.iter().enumerate() {
            let node = circuit
                .node(*id)
                .ok_or_else(|| broken(format!("component {comp} input {pin} is missing")))?;
            if node.owner() != comp || node.pin() != pin || node.direction() != Direction::Input {
                return Err(broken(format!("node {id} does not match component {comp}")));
            }
        }
        for (pin, id) in outputs.iter().enumerate() {
            let node = circuit
                .node(*id)
                .ok_or_else(|| broken(format!("component {comp} output {pin} is missing")))?;
            if node.owner() != comp || node.pin() != pin || node.direction() != Direction::Output
            {
                return Err(broken(format!("node {id} does not match component {comp}")));
            }
        }
    }

    let mut seen_targets: HashSet<NodeId> = HashSet::new();
    for wire in circuit.wires() {
        let source = circuit
            .node(wire.from())
            .ok_or_else(|| broken(format!("wire {} source is missing", wire.id())))?;
        let dest = circuit
            .node(wire.to())
            .ok_or_else(|| broken(format!("wire {} destination is missing", wire.id())))?;
        if source.direction() != Direction::Output || dest.direction() != Direction::Input {
            return Err(broken(format!("wire {} runs the wrong way", wire.id())));
        }
        if !source.outgoing().contains(&wire.id()) {
            return Err(broken(format!("node {} does not list wire {}", source.id(), wire.id())));
        }
        if dest.incoming() != Some(wire.id()) {
            return Err(broken(format!("node {} does not list wire {}", dest.id(), wire.id())));
        }
        if !seen_targets.insert(wire.to()) {
            return Err(broken(format!("node {} has two drivers", wire.to())));
        }
    }

    for node in circuit.nodes() {
        if circuit.slot(node.owner()).is_none() {
            return Err(broken(format!("node {} outlived its owner", node.id())));
        }
        let listed: Vec<WireId> = node.incoming().into_iter().chain(node.outgoing().iter().copied()).collect();
        for wire in listed {
            if circuit.wire(wire).is_none() {
                return Err(broken(format!("node {} lists missing wire {wire}", node.id())));
            }
        }
    }
    Ok(())
}
