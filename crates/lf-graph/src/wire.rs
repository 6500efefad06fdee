//! Directed connections from an output node to an input node.

use std::collections::VecDeque;

use lf_core::{LogicValue, NodeId, WireId};

/// Optional wire parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireOptions {
    /// Ticks before a value reaches the destination; `0` is instantaneous.
    pub delay: u32,
    /// Opaque rendering hint carried for the front end and documents.
    pub style: Option<String>,
}

impl WireOptions {
    pub fn delayed(delay: u32) -> Self {
        Self { delay, style: None }
    }
}

/// A wire never owns its endpoints; it only names them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    pub(crate) id: WireId,
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) delay: u32,
    pub(crate) style: Option<String>,
    /// `(due_tick, value)` in scheduling order.
    pub(crate) in_flight: VecDeque<(u64, LogicValue)>,
}

impl Wire {
    pub(crate) fn new(id: WireId, from: NodeId, to: NodeId, options: WireOptions) -> Self {
        Self {
            id,
            from,
            to,
            delay: options.delay,
            style: options.style,
            in_flight: VecDeque::new(),
        }
    }

    pub fn id(&self) -> WireId {
        self.id
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn is_delayed(&self) -> bool {
        self.delay > 0
    }

    pub fn options(&self) -> WireOptions {
        WireOptions {
            delay: self.delay,
            style: self.style.clone(),
        }
    }

    /// Values still travelling along the wire.
    pub fn in_flight(&self) -> impl Iterator<Item = &(u64, LogicValue)> {
        self.in_flight.iter()
    }

    pub(crate) fn schedule(&mut self, now: u64, value: LogicValue) {
        self.in_flight
            .push_back((now + u64::from(self.delay), value));
    }

    /// Pop every entry due at or before `now`, oldest first.
    pub(crate) fn take_due(&mut self, now: u64) -> Vec<LogicValue> {
        let mut due = Vec::new();
        while let Some(&(at, value)) = self.in_flight.front() {
            if at > now {
                break;
            }
            self.in_flight.pop_front();
            due.push(value);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_core::Id;
    use lf_core::LogicValue::{False as F, True as T};

    #[test]
    fn delayed_values_come_out_in_order() {
        let mut wire = Wire::new(
            Id::from_index(0),
            Id::from_index(0),
            Id::from_index(1),
            WireOptions::delayed(2),
        );
        wire.schedule(0, T);
        wire.schedule(1, F);
        assert!(wire.take_due(1).is_empty());
        assert_eq!(wire.take_due(2), vec![T]);
        assert_eq!(wire.take_due(5), vec![F]);
        assert_eq!(wire.in_flight().count(), 0);
    }
}
