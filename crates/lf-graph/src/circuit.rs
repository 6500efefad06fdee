//! The live circuit: arenas of components, nodes and wires plus the
//! structural edits that keep them consistent.
//!
//! Every public edit ends with a settle pass, so callers always observe a
//! converged graph between operations. A settle that runs out of budget does
//! not fail the edit; its outcome is kept in [`Circuit::last_settle`].

use std::collections::{HashSet, VecDeque};

use lf_components::{ComponentSpec, DrawnState, LogicComponent};
use lf_core::{check_index, CompId, LogicValue, NodeId, WireId};
use tracing::debug;

use crate::error::{ConnectionError, GraphError, GraphResult, UnstableCircuitError};
use crate::node::{Direction, Node};
use crate::scheduler::{Dirty, EngineConfig, SettleStats};
use crate::validate;
use crate::wire::{Wire, WireOptions};

/// A component instance together with the terminals it owns.
#[derive(Debug)]
pub(crate) struct ComponentSlot {
    pub(crate) model: Box<dyn LogicComponent>,
    pub(crate) inputs: Vec<NodeId>,
    pub(crate) outputs: Vec<NodeId>,
}

/// Owned circuit graph. Ids index into the arenas and are never reused.
#[derive(Debug)]
pub struct Circuit {
    pub(crate) nodes: Vec<Option<Node>>,
    pub(crate) wires: Vec<Option<Wire>>,
    pub(crate) components: Vec<Option<ComponentSlot>>,
    pub(crate) pending: VecDeque<Dirty>,
    pub(crate) queued: HashSet<Dirty>,
    pub(crate) tick: u64,
    pub(crate) config: EngineConfig,
    pub(crate) last_settle: Result<SettleStats, UnstableCircuitError>,
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl Circuit {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            nodes: Vec::new(),
            wires: Vec::new(),
            components: Vec::new(),
            pending: VecDeque::new(),
            queued: HashSet::new(),
            tick: 0,
            config,
            last_settle: Ok(SettleStats::default()),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot()).and_then(Option::as_ref)
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(id.slot()).and_then(Option::as_ref)
    }

    pub fn component(&self, id: CompId) -> Option<&dyn LogicComponent> {
        self.slot(id).map(|s| s.model.as_ref())
    }

    pub fn spec(&self, id: CompId) -> Option<ComponentSpec> {
        self.component(id).map(|c| c.spec())
    }

    pub fn inputs_of(&self, id: CompId) -> Option<&[NodeId]> {
        self.slot(id).map(|s| s.inputs.as_slice())
    }

    pub fn outputs_of(&self, id: CompId) -> Option<&[NodeId]> {
        self.slot(id).map(|s| s.outputs.as_slice())
    }

    /// Input terminal `pin` of `comp`.
    pub fn input(&self, comp: CompId, pin: usize) -> GraphResult<NodeId> {
        let slot = self.slot_or_err(comp)?;
        check_index("input pin", pin, slot.inputs.len()).map_err(|_| GraphError::NoSuchPin {
            comp,
            what: "input",
            pin,
        })?;
        Ok(slot.inputs[pin])
    }

    /// Output terminal `pin` of `comp`.
    pub fn output(&self, comp: CompId, pin: usize) -> GraphResult<NodeId> {
        let slot = self.slot_or_err(comp)?;
        check_index("output pin", pin, slot.outputs.len()).map_err(|_| {
            GraphError::NoSuchPin {
                comp,
                what: "output",
                pin,
            }
        })?;
        Ok(slot.outputs[pin])
    }

    /// Effective value of a node.
    pub fn value(&self, id: NodeId) -> Option<LogicValue> {
        self.node(id).map(Node::read)
    }

    pub fn drawn_state(&self, id: CompId) -> Option<DrawnState> {
        self.component(id).map(|c| c.drawn_state())
    }

    /// Live component ids in creation order.
    pub fn components(&self) -> impl Iterator<Item = CompId> + '_ {
        self.components
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| CompId::from_index(i as u32))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().flatten()
    }

    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.iter().flatten()
    }

    pub fn component_count(&self) -> usize {
        self.components.iter().flatten().count()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.component_count() == 0
    }

    /// Outcome of the most recent settle pass.
    pub fn last_settle(&self) -> &Result<SettleStats, UnstableCircuitError> {
        &self.last_settle
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    /// Build a component from its spec and add it.
    pub fn add(&mut self, spec: &ComponentSpec) -> GraphResult<CompId> {
        let model = spec.build()?;
        Ok(self.add_component(model))
    }

    /// Add an already-built component; its outputs are computed before returning.
    pub fn add_component(&mut self, model: Box<dyn LogicComponent>) -> CompId {
        let id = self.insert_component(model);
        self.finish_edit();
        id
    }

    /// Remove a component, severing every wire attached to it first.
    pub fn remove_component(&mut self, comp: CompId) -> GraphResult<()> {
        self.detach_component(comp)?;
        self.finish_edit();
        Ok(())
    }

    /// Wire an output node to an input node.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> GraphResult<WireId> {
        self.connect_with(from, to, WireOptions::default())
    }

    pub fn connect_with(
        &mut self,
        from: NodeId,
        to: NodeId,
        options: WireOptions,
    ) -> GraphResult<WireId> {
        let id = self.insert_wire(from, to, options)?;
        self.finish_edit();
        Ok(id)
    }

    /// Remove a wire. Its destination reads `Unknown` afterwards.
    pub fn disconnect(&mut self, wire: WireId) -> GraphResult<()> {
        self.detach_wire(wire)?;
        self.finish_edit();
        Ok(())
    }

    /// Remove a passthrough and wire each bit's driver straight to the
    /// passthrough's former consumers.
    ///
    /// Spliced wires keep the downstream wire's style (falling back to the
    /// upstream one) and the sum of both delays. A bit fed by another bit of
    /// the same passthrough is traced back to the outside driver; a bit with
    /// no outside driver loses its consumers. Returns the new wires.
    ///
    /// Every splice is checked before anything is detached, so an error
    /// leaves the circuit unchanged.
    pub fn remove_passthrough(&mut self, comp: CompId) -> GraphResult<Vec<WireId>> {
        let slot = self.slot_or_err(comp)?;
        if !matches!(slot.model.spec(), ComponentSpec::Passthrough { .. }) {
            return Err(GraphError::NotAPassthrough { comp });
        }
        let plan = self.splice_plan(comp, &slot.inputs, &slot.outputs)?;

        self.detach_component(comp)?;

        let mut spliced = Vec::with_capacity(plan.len());
        let mut failure = None;
        for (driver, consumer, options) in plan {
            match self.insert_wire(driver, consumer, options) {
                Ok(id) => spliced.push(id),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        debug!(comp = %comp, wires = spliced.len(), "spliced out passthrough");
        self.finish_edit();
        match failure {
            Some(err) => Err(err),
            None => Ok(spliced),
        }
    }

    /// `(driver, consumer, options)` for every wire a passthrough splice adds.
    fn splice_plan(
        &self,
        comp: CompId,
        inputs: &[NodeId],
        outputs: &[NodeId],
    ) -> GraphResult<Vec<(NodeId, NodeId, WireOptions)>> {
        let mut plan = Vec::new();
        for (bit, output) in outputs.iter().enumerate() {
            let Some((driver, up)) = self.outside_driver(comp, inputs, bit) else {
                continue;
            };
            let from_width = self.node(driver).map_or(1, Node::width);
            let consumers = self
                .node(*output)
                .map(|n| n.outgoing.as_slice())
                .unwrap_or_default()
                .iter()
                .filter_map(|w| self.wire(*w))
                .filter(|w| self.node(w.to).is_some_and(|n| n.owner != comp));
            for down in consumers {
                let to_width = self.node(down.to).map_or(1, Node::width);
                if from_width != to_width {
                    return Err(ConnectionError::WidthMismatch {
                        from: driver,
                        to: down.to,
                        from_width,
                        to_width,
                    }
                    .into());
                }
                let options = WireOptions {
                    delay: up.delay + down.delay,
                    style: down.style.clone().or_else(|| up.style.clone()),
                };
                plan.push((driver, down.to, options));
            }
        }
        Ok(plan)
    }

    /// Follow input `bit` of a passthrough upstream, through any of its own
    /// outputs, to a node owned by another component. Delays along the way are
    /// summed; the style nearest the bit wins. `None` when the chain ends
    /// undriven or loops inside the passthrough.
    fn outside_driver(
        &self,
        comp: CompId,
        inputs: &[NodeId],
        mut bit: usize,
    ) -> Option<(NodeId, WireOptions)> {
        let mut visited = vec![false; inputs.len()];
        let mut options = WireOptions::default();
        loop {
            if std::mem::replace(visited.get_mut(bit)?, true) {
                return None;
            }
            let wire = self
                .node(inputs[bit])?
                .incoming
                .and_then(|w| self.wire(w))?;
            options.delay += wire.delay;
            if options.style.is_none() {
                options.style = wire.style.clone();
            }
            let source = self.node(wire.from)?;
            if source.owner != comp {
                return Some((wire.from, options));
            }
            bit = source.pin;
        }
    }

    /// Pin a node to `value` until [`Circuit::unforce`].
    pub fn force(&mut self, node: NodeId, value: LogicValue) -> GraphResult<()> {
        self.node_mut_or_err(node)?.force(value);
        self.enqueue(Dirty::Node(node));
        self.finish_edit();
        Ok(())
    }

    /// Release a forced node back to its propagated value.
    pub fn unforce(&mut self, node: NodeId) -> GraphResult<()> {
        self.node_mut_or_err(node)?.unforce();
        self.enqueue(Dirty::Node(node));
        self.finish_edit();
        Ok(())
    }

    /// Drive a source component (switch, clock) to a level.
    pub fn set_level(&mut self, comp: CompId, level: bool) -> GraphResult<()> {
        if self.slot_mut_or_err(comp)?.model.set_level(level) {
            self.enqueue(Dirty::Component(comp));
        }
        self.finish_edit();
        Ok(())
    }

    /// Flip a source component (switch, clock).
    pub fn toggle(&mut self, comp: CompId) -> GraphResult<()> {
        if self.slot_mut_or_err(comp)?.model.toggle() {
            self.enqueue(Dirty::Component(comp));
        }
        self.finish_edit();
        Ok(())
    }

    /// Drop every component, wire and pending entry. Configuration is kept.
    pub fn clear(&mut self) {
        *self = Self::with_config(self.config.clone());
    }

    /// Check arena cross-references; see [`validate::check_consistency`].
    pub fn check_consistency(&self) -> GraphResult<()> {
        validate::check_consistency(self)
    }

    // ------------------------------------------------------------------
    // Internal edits (no settle)
    // ------------------------------------------------------------------

    pub(crate) fn insert_component(&mut self, model: Box<dyn LogicComponent>) -> CompId {
        let id = CompId::from_index(self.components.len() as u32);
        let arity = model.arity();

        let inputs: Vec<NodeId> = (0..arity.inputs)
            .map(|pin| self.alloc_node(Direction::Input, id, pin, model.input_width(pin)))
            .collect();
        let outputs: Vec<NodeId> = (0..arity.outputs)
            .map(|pin| self.alloc_node(Direction::Output, id, pin, model.output_width(pin)))
            .collect();

        debug!(comp = %id, kind = model.kind(), inputs = arity.inputs, outputs = arity.outputs, "added component");
        self.components.push(Some(ComponentSlot {
            model,
            inputs,
            outputs,
        }));
        self.enqueue(Dirty::Component(id));
        id
    }

    fn alloc_node(&mut self, direction: Direction, owner: CompId, pin: usize, width: u8) -> NodeId {
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes
            .push(Some(Node::new(id, direction, owner, pin, width)));
        id
    }

    pub(crate) fn insert_wire(
        &mut self,
        from: NodeId,
        to: NodeId,
        options: WireOptions,
    ) -> GraphResult<WireId> {
        validate::check_connection(self, from, to)?;

        let id = WireId::from_index(self.wires.len() as u32);
        let initial = self.value(from).unwrap_or_default();
        self.wires.push(Some(Wire::new(id, from, to, options)));

        if let Some(node) = self.nodes[from.slot()].as_mut() {
            node.outgoing.push(id);
        }
        let changed = match self.nodes[to.slot()].as_mut() {
            Some(node) => {
                node.incoming = Some(id);
                node.write(initial)
            }
            None => false,
        };
        if changed {
            self.enqueue(Dirty::Node(to));
        }
        debug!(wire = %id, from = %from, to = %to, "connected");
        Ok(id)
    }

    pub(crate) fn detach_wire(&mut self, id: WireId) -> GraphResult<()> {
        let wire = self
            .wires
            .get_mut(id.slot())
            .and_then(Option::take)
            .ok_or(GraphError::UnknownWire { wire: id })?;

        if let Some(source) = self.nodes.get_mut(wire.from.slot()).and_then(Option::as_mut) {
            source.outgoing.retain(|w| *w != id);
        }
        let changed = match self.nodes.get_mut(wire.to.slot()).and_then(Option::as_mut) {
            Some(dest) => {
                dest.incoming = None;
                dest.write(LogicValue::Unknown)
            }
            None => false,
        };
        if changed {
            self.enqueue(Dirty::Node(wire.to));
        }
        debug!(wire = %id, "disconnected");
        Ok(())
    }

    pub(crate) fn detach_component(&mut self, comp: CompId) -> GraphResult<()> {
        let slot = self.slot_or_err(comp)?;
        let owned: Vec<NodeId> = slot.inputs.iter().chain(&slot.outputs).copied().collect();

        // A wire between two of the component's own pins shows up on both ends.
        let mut attached: Vec<WireId> = owned
            .iter()
            .filter_map(|n| self.node(*n))
            .flat_map(|n| n.incoming.iter().chain(&n.outgoing).copied())
            .collect();
        attached.sort_unstable();
        attached.dedup();
        for wire in attached {
            self.detach_wire(wire)?;
        }

        for node in &owned {
            self.nodes[node.slot()] = None;
        }
        self.components[comp.slot()] = None;
        self.pending.retain(|d| match d {
            Dirty::Node(n) => !owned.contains(n),
            Dirty::Component(c) => *c != comp,
        });
        self.queued.retain(|d| match d {
            Dirty::Node(n) => !owned.contains(n),
            Dirty::Component(c) => *c != comp,
        });
        debug!(comp = %comp, "removed component");
        Ok(())
    }

    /// Settle after an edit, keeping (not propagating) an unstable outcome.
    fn finish_edit(&mut self) {
        let _ = self.settle();
    }

    // ------------------------------------------------------------------
    // Lookup helpers
    // ------------------------------------------------------------------

    pub(crate) fn slot(&self, id: CompId) -> Option<&ComponentSlot> {
        self.components.get(id.slot()).and_then(Option::as_ref)
    }

    fn slot_or_err(&self, id: CompId) -> GraphResult<&ComponentSlot> {
        self.slot(id)
            .ok_or(GraphError::UnknownComponent { comp: id })
    }

    fn slot_mut_or_err(&mut self, id: CompId) -> GraphResult<&mut ComponentSlot> {
        self.components
            .get_mut(id.slot())
            .and_then(Option::as_mut)
            .ok_or(GraphError::UnknownComponent { comp: id })
    }

    fn node_mut_or_err(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        self.nodes
            .get_mut(id.slot())
            .and_then(Option::as_mut)
            .ok_or(GraphError::UnknownNode { node: id })
    }
}
