//! Recalculation scheduler.
//!
//! Dirty entries are drained in FIFO order, not topological order: every
//! recompute is re-evaluated until nothing changes, so interim values are
//! overwritten before convergence. Feedback loops are legal; a budget on
//! the number of drained entries stops oscillators.

use lf_core::{CompId, LogicValue, NodeId, WireId};
use tracing::{trace, warn};

use crate::circuit::Circuit;
use crate::error::{GraphError, GraphResult, UnstableCircuitError};
use crate::node::Direction;

/// Work item in the pending queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Dirty {
    /// An input node changed (recompute its owner) or an output node changed
    /// (push its value downstream).
    Node(NodeId),
    /// A component must be recomputed regardless of its inputs, e.g. a fresh
    /// instance or a source moved by an external driver.
    Component(CompId),
}

/// Scheduler settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of queue entries one settle pass may drain.
    pub iteration_budget: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            iteration_budget: 10_000,
        }
    }
}

/// Work done by a converged settle pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SettleStats {
    /// Queue entries drained.
    pub steps: usize,
    /// Component recomputations performed.
    pub recomputes: usize,
}

impl Circuit {
    /// Add a node to the pending set. Takes effect on the next [`Circuit::settle`].
    pub fn mark_dirty(&mut self, node: NodeId) -> GraphResult<()> {
        if self.node(node).is_none() {
            return Err(GraphError::UnknownNode { node });
        }
        self.enqueue(Dirty::Node(node));
        Ok(())
    }

    /// Number of entries waiting to be drained.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drain the pending set to a fixed point.
    ///
    /// On budget overrun the remaining entries are dropped, the values
    /// computed so far are kept, and the error is returned (and remembered in
    /// [`Circuit::last_settle`]).
    pub fn settle(&mut self) -> Result<SettleStats, UnstableCircuitError> {
        let budget = self.config.iteration_budget;
        let mut stats = SettleStats::default();

        while let Some(item) = self.pending.pop_front() {
            self.queued.remove(&item);
            if stats.steps >= budget {
                let err = UnstableCircuitError {
                    budget,
                    pending: self.pending.len() + 1,
                };
                self.pending.clear();
                self.queued.clear();
                warn!(budget, pending = err.pending, "circuit did not settle");
                self.last_settle = Err(err.clone());
                return Err(err);
            }
            stats.steps += 1;
            trace!(?item, "pop");

            match item {
                Dirty::Node(id) => {
                    let Some(node) = self.node(id) else {
                        continue;
                    };
                    match node.direction() {
                        Direction::Input => {
                            let owner = node.owner();
                            self.recompute(owner);
                            stats.recomputes += 1;
                        }
                        Direction::Output => self.propagate(id),
                    }
                }
                Dirty::Component(comp) => {
                    self.recompute(comp);
                    stats.recomputes += 1;
                }
            }
        }

        trace!(steps = stats.steps, recomputes = stats.recomputes, "settled");
        self.last_settle = Ok(stats);
        Ok(stats)
    }

    /// Advance time by one tick: step tick-driven sources, deliver delayed
    /// wire values that came due, then settle.
    pub fn tick(&mut self) -> Result<SettleStats, UnstableCircuitError> {
        self.tick += 1;
        let now = self.tick;

        let mut moved = Vec::new();
        for (index, slot) in self.components.iter_mut().enumerate() {
            if let Some(slot) = slot {
                if slot.model.on_tick(now) {
                    moved.push(CompId::from_index(index as u32));
                }
            }
        }
        for comp in moved {
            self.enqueue(Dirty::Component(comp));
        }

        let mut arrivals = Vec::new();
        for wire in self.wires.iter_mut().flatten() {
            for value in wire.take_due(now) {
                arrivals.push((wire.to, value));
            }
        }
        for (to, value) in arrivals {
            self.write_input(to, value);
        }

        trace!(tick = now, pending = self.pending.len(), "tick");
        self.settle()
    }

    pub(crate) fn enqueue(&mut self, item: Dirty) {
        if self.queued.insert(item) {
            self.pending.push_back(item);
        }
    }

    /// Recompute one component and write its outputs.
    fn recompute(&mut self, comp: CompId) {
        let Some(slot) = self
            .components
            .get_mut(comp.slot())
            .and_then(Option::as_mut)
        else {
            return;
        };

        let inputs: Vec<LogicValue> = slot
            .inputs
            .iter()
            .map(|id| {
                self.nodes
                    .get(id.slot())
                    .and_then(Option::as_ref)
                    .map(|n| n.read())
                    .unwrap_or_default()
            })
            .collect();
        let values = slot.model.recompute(&inputs);
        if values.len() != slot.outputs.len() {
            warn!(
                comp = %comp,
                kind = slot.model.kind(),
                expected = slot.outputs.len(),
                got = values.len(),
                "recompute returned wrong number of outputs"
            );
            return;
        }
        let outputs = slot.outputs.clone();

        for (id, value) in outputs.into_iter().zip(values) {
            let changed = self
                .nodes
                .get_mut(id.slot())
                .and_then(Option::as_mut)
                .is_some_and(|n| n.write(value));
            if changed {
                self.propagate(id);
            }
        }
    }

    /// Push an output node's effective value onto every outgoing wire.
    fn propagate(&mut self, output: NodeId) {
        let Some(node) = self.node(output) else {
            return;
        };
        let value = node.read();
        let outgoing: Vec<WireId> = node.outgoing().to_vec();

        for id in outgoing {
            let Some(wire) = self.wires.get_mut(id.slot()).and_then(Option::as_mut) else {
                continue;
            };
            if wire.is_delayed() {
                wire.schedule(self.tick, value);
            } else {
                let to = wire.to;
                self.write_input(to, value);
            }
        }
    }

    fn write_input(&mut self, to: NodeId, value: LogicValue) {
        let changed = self
            .nodes
            .get_mut(to.slot())
            .and_then(Option::as_mut)
            .is_some_and(|n| n.write(value));
        if changed {
            self.enqueue(Dirty::Node(to));
        }
    }
}
