//! Batch circuit builder.

use lf_components::{ComponentSpec, LogicComponent};
use lf_core::{CompId, NodeId, WireId};
use tracing::debug;

use crate::circuit::Circuit;
use crate::error::GraphResult;
use crate::scheduler::EngineConfig;
use crate::wire::WireOptions;

/// Builder for constructing a circuit without settling after every edit.
///
/// Components and wires go into a draft circuit; `build()` validates the
/// cross-references and runs a single settle pass. A circuit that fails to
/// settle is still returned, with the outcome in [`Circuit::last_settle`].
#[derive(Debug, Default)]
pub struct CircuitBuilder {
    draft: Circuit,
}

impl CircuitBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            draft: Circuit::with_config(config),
        }
    }

    /// Build a component from its spec and add it.
    pub fn add(&mut self, spec: &ComponentSpec) -> GraphResult<CompId> {
        let model = spec.build()?;
        Ok(self.draft.insert_component(model))
    }

    pub fn add_component(&mut self, model: Box<dyn LogicComponent>) -> CompId {
        self.draft.insert_component(model)
    }

    pub fn input(&self, comp: CompId, pin: usize) -> GraphResult<NodeId> {
        self.draft.input(comp, pin)
    }

    pub fn output(&self, comp: CompId, pin: usize) -> GraphResult<NodeId> {
        self.draft.output(comp, pin)
    }

    pub fn inputs_of(&self, comp: CompId) -> Option<&[NodeId]> {
        self.draft.inputs_of(comp)
    }

    pub fn outputs_of(&self, comp: CompId) -> Option<&[NodeId]> {
        self.draft.outputs_of(comp)
    }

    pub fn connect(&mut self, from: NodeId, to: NodeId) -> GraphResult<WireId> {
        self.draft.insert_wire(from, to, WireOptions::default())
    }

    pub fn connect_with(
        &mut self,
        from: NodeId,
        to: NodeId,
        options: WireOptions,
    ) -> GraphResult<WireId> {
        self.draft.insert_wire(from, to, options)
    }

    /// Validate and settle the draft.
    pub fn build(self) -> GraphResult<Circuit> {
        let mut circuit = self.draft;
        circuit.check_consistency()?;
        let outcome = circuit.settle();
        debug!(
            components = circuit.component_count(),
            wires = circuit.wire_count(),
            settled = outcome.is_ok(),
            "built circuit"
        );
        Ok(circuit)
    }
}
