//! Four-valued logic domain.
//!
//! Every wire and terminal carries one of four values: the two booleans,
//! `Unknown` (an undetermined or conflicting level) and `HighZ` (nothing is
//! driving the line). `Unknown` poisons boolean operators, with two
//! documented short-circuit identities:
//!
//! - `AND(False, x) = False` for every `x`
//! - `OR(True, x) = True` for every `x`
//!
//! `NAND` and `NOR` inherit these by negation. `XOR`, `XNOR` and `NOT` have
//! no identities: any undefined operand makes the result `Unknown`.
//!
//! Operators never see `HighZ` directly; it is resolved first through a
//! [`HighZPolicy`] (by default into `Unknown`).

use core::fmt;

/// A single logic level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicValue {
    True,
    False,
    #[default]
    Unknown,
    HighZ,
}

impl LogicValue {
    /// Boolean view of the value, `None` for `Unknown` and `HighZ`.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            LogicValue::True => Some(true),
            LogicValue::False => Some(false),
            LogicValue::Unknown | LogicValue::HighZ => None,
        }
    }

    /// True for the two boolean levels.
    pub fn is_defined(self) -> bool {
        self.as_bool().is_some()
    }

    pub fn is_high_z(self) -> bool {
        self == LogicValue::HighZ
    }

    /// Map `HighZ` according to `policy`; other values pass unchanged.
    pub fn resolve(self, policy: HighZPolicy) -> LogicValue {
        match (self, policy) {
            (LogicValue::HighZ, HighZPolicy::Unknown) => LogicValue::Unknown,
            (LogicValue::HighZ, HighZPolicy::False) => LogicValue::False,
            (v, _) => v,
        }
    }

    pub fn not(self) -> LogicValue {
        match self.as_bool() {
            Some(b) => LogicValue::from(!b),
            None => LogicValue::Unknown,
        }
    }

    /// `False` dominates; otherwise any undefined operand yields `Unknown`.
    pub fn and(self, rhs: LogicValue) -> LogicValue {
        match (self.as_bool(), rhs.as_bool()) {
            (Some(false), _) | (_, Some(false)) => LogicValue::False,
            (Some(true), Some(true)) => LogicValue::True,
            _ => LogicValue::Unknown,
        }
    }

    /// `True` dominates; otherwise any undefined operand yields `Unknown`.
    pub fn or(self, rhs: LogicValue) -> LogicValue {
        match (self.as_bool(), rhs.as_bool()) {
            (Some(true), _) | (_, Some(true)) => LogicValue::True,
            (Some(false), Some(false)) => LogicValue::False,
            _ => LogicValue::Unknown,
        }
    }

    pub fn xor(self, rhs: LogicValue) -> LogicValue {
        match (self.as_bool(), rhs.as_bool()) {
            (Some(a), Some(b)) => LogicValue::from(a ^ b),
            _ => LogicValue::Unknown,
        }
    }

    pub fn nand(self, rhs: LogicValue) -> LogicValue {
        self.and(rhs).not()
    }

    pub fn nor(self, rhs: LogicValue) -> LogicValue {
        self.or(rhs).not()
    }

    pub fn xnor(self, rhs: LogicValue) -> LogicValue {
        self.xor(rhs).not()
    }

    /// N-ary AND; the empty conjunction is `True`.
    pub fn all<I: IntoIterator<Item = LogicValue>>(values: I) -> LogicValue {
        values.into_iter().fold(LogicValue::True, LogicValue::and)
    }

    /// N-ary OR; the empty disjunction is `False`.
    pub fn any<I: IntoIterator<Item = LogicValue>>(values: I) -> LogicValue {
        values.into_iter().fold(LogicValue::False, LogicValue::or)
    }

    /// N-ary XOR (odd parity).
    pub fn parity<I: IntoIterator<Item = LogicValue>>(values: I) -> LogicValue {
        values.into_iter().fold(LogicValue::False, LogicValue::xor)
    }

    /// Single-character rendering used by logs and the CLI.
    pub fn symbol(self) -> char {
        match self {
            LogicValue::True => '1',
            LogicValue::False => '0',
            LogicValue::Unknown => 'X',
            LogicValue::HighZ => 'Z',
        }
    }
}

impl From<bool> for LogicValue {
    fn from(b: bool) -> Self {
        if b {
            LogicValue::True
        } else {
            LogicValue::False
        }
    }
}

impl fmt::Display for LogicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// How a consumer interprets an undriven (`HighZ`) input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HighZPolicy {
    /// Report a floating input as `Unknown`.
    #[default]
    Unknown,
    /// Treat a floating input as logical `False` (pull-down).
    False,
}

/// Qualifying clock transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    #[default]
    Rising,
    Falling,
}

impl Edge {
    /// Classify a transition. Only `False -> True` and `True -> False`
    /// count; anything touching `Unknown` or `HighZ` is a non-edge.
    pub fn between(prev: LogicValue, next: LogicValue) -> Option<Edge> {
        match (prev, next) {
            (LogicValue::False, LogicValue::True) => Some(Edge::Rising),
            (LogicValue::True, LogicValue::False) => Some(Edge::Falling),
            _ => None,
        }
    }

    /// Level the clock must sit at before this edge can occur.
    pub fn armed_level(self) -> LogicValue {
        match self {
            Edge::Rising => LogicValue::False,
            Edge::Falling => LogicValue::True,
        }
    }
}
