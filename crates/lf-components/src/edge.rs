//! Edge detection shared by every clocked component.

use lf_core::{Edge, LogicValue};

/// Phase of a clocked component relative to its qualifying edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockState {
    /// Clock is at the post-edge level or undefined.
    #[default]
    Idle,
    /// Clock sits at the level that precedes the qualifying edge.
    Armed,
    /// The last observation was a qualifying edge.
    Fired,
}

/// Remembers the last clock level seen and reports qualifying edges.
///
/// The last level is updated on every observation, including undefined ones,
/// so `False -> Unknown -> True` never fires a rising edge.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    edge: Edge,
    last: LogicValue,
    state: ClockState,
}

impl EdgeDetector {
    pub fn new(edge: Edge) -> Self {
        Self {
            edge,
            last: LogicValue::Unknown,
            state: ClockState::Idle,
        }
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn last_clock(&self) -> LogicValue {
        self.last
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Record a clock level; returns `true` exactly on a qualifying edge.
    pub fn observe(&mut self, clock: LogicValue) -> bool {
        let fired = Edge::between(self.last, clock) == Some(self.edge);
        self.last = clock;
        self.state = if fired {
            ClockState::Fired
        } else if clock == self.edge.armed_level() {
            ClockState::Armed
        } else {
            ClockState::Idle
        };
        fired
    }
}
