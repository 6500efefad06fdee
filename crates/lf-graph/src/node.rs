//! Component terminals.

use lf_core::{CompId, LogicValue, NodeId, WireId};

/// Direction of a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Driven by at most one incoming wire.
    Input,
    /// Fans out to any number of wires.
    Output,
}

/// A single input or output terminal, owned by its component.
///
/// `read` returns the forced value when one is set, otherwise the last value
/// written by propagation. Wires are referenced by id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) direction: Direction,
    pub(crate) owner: CompId,
    pub(crate) pin: usize,
    pub(crate) width: u8,
    pub(crate) value: LogicValue,
    pub(crate) forced: Option<LogicValue>,
    pub(crate) incoming: Option<WireId>,
    pub(crate) outgoing: Vec<WireId>,
}

impl Node {
    pub(crate) fn new(
        id: NodeId,
        direction: Direction,
        owner: CompId,
        pin: usize,
        width: u8,
    ) -> Self {
        Self {
            id,
            direction,
            owner,
            pin,
            width,
            value: LogicValue::Unknown,
            forced: None,
            incoming: None,
            outgoing: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn owner(&self) -> CompId {
        self.owner
    }

    /// Position within the owner's input or output list.
    pub fn pin(&self) -> usize {
        self.pin
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    /// Effective value seen by consumers.
    pub fn read(&self) -> LogicValue {
        self.forced.unwrap_or(self.value)
    }

    /// Value last written by propagation, ignoring any override.
    pub fn propagated(&self) -> LogicValue {
        self.value
    }

    pub fn forced(&self) -> Option<LogicValue> {
        self.forced
    }

    pub fn incoming(&self) -> Option<WireId> {
        self.incoming
    }

    pub fn outgoing(&self) -> &[WireId] {
        &self.outgoing
    }

    /// Store a propagated value. Returns whether the effective value changed;
    /// writing the current value again reports no change.
    pub(crate) fn write(&mut self, value: LogicValue) -> bool {
        let before = self.read();
        self.value = value;
        self.read() != before
    }

    pub(crate) fn force(&mut self, value: LogicValue) -> bool {
        let before = self.read();
        self.forced = Some(value);
        self.read() != before
    }

    pub(crate) fn unforce(&mut self) -> bool {
        let before = self.read();
        self.forced = None;
        self.read() != before
    }
}
