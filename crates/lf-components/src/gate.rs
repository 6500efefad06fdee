//! Combinational gates.

use lf_core::{HighZPolicy, LogicValue};
use serde::{Deserialize, Serialize};

use crate::error::{ComponentError, ComponentResult};
use crate::spec::ComponentSpec;
use crate::traits::{Arity, LogicComponent, MAX_PINS};

/// Boolean function computed by a [`Gate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateOp {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
    Not,
    Buffer,
}

impl GateOp {
    pub fn is_unary(self) -> bool {
        matches!(self, GateOp::Not | GateOp::Buffer)
    }

    /// Fan-in used when a descriptor does not name one.
    pub fn default_fan_in(self) -> usize {
        if self.is_unary() {
            1
        } else {
            2
        }
    }

    /// Evaluate over already-resolved inputs (no `HighZ`).
    pub fn eval(self, inputs: &[LogicValue]) -> LogicValue {
        let values = inputs.iter().copied();
        match self {
            GateOp::And => LogicValue::all(values),
            GateOp::Or => LogicValue::any(values),
            GateOp::Nand => LogicValue::all(values).not(),
            GateOp::Nor => LogicValue::any(values).not(),
            GateOp::Xor => LogicValue::parity(values),
            GateOp::Xnor => LogicValue::parity(values).not(),
            GateOp::Not => inputs.first().copied().unwrap_or_default().not(),
            // A buffer still maps Unknown/HighZ onto Unknown, never passes HighZ.
            GateOp::Buffer => match inputs.first().and_then(|v| v.as_bool()) {
                Some(b) => LogicValue::from(b),
                None => LogicValue::Unknown,
            },
        }
    }
}

/// N-input boolean gate with a single output.
#[derive(Debug, Clone)]
pub struct Gate {
    op: GateOp,
    fan_in: usize,
    high_z: HighZPolicy,
}

impl Gate {
    pub fn new(op: GateOp, fan_in: usize) -> ComponentResult<Self> {
        if op.is_unary() && fan_in != 1 {
            return Err(ComponentError::InvalidParam {
                kind: "Gate",
                what: "unary gates take exactly one input",
            });
        }
        if !op.is_unary() && fan_in < 2 {
            return Err(ComponentError::InvalidParam {
                kind: "Gate",
                what: "binary gates take at least two inputs",
            });
        }
        if fan_in > MAX_PINS {
            return Err(ComponentError::InvalidParam {
                kind: "Gate",
                what: "fan-in above 256 inputs",
            });
        }
        Ok(Self {
            op,
            fan_in,
            high_z: HighZPolicy::default(),
        })
    }

    /// Choose how floating inputs are read.
    pub fn with_high_z(mut self, policy: HighZPolicy) -> Self {
        self.high_z = policy;
        self
    }

    pub fn op(&self) -> GateOp {
        self.op
    }
}

impl LogicComponent for Gate {
    fn kind(&self) -> &'static str {
        "Gate"
    }

    fn spec(&self) -> ComponentSpec {
        ComponentSpec::Gate {
            op: self.op,
            fan_in: Some(self.fan_in),
            high_z: self.high_z,
        }
    }

    fn arity(&self) -> Arity {
        Arity::new(self.fan_in, 1)
    }

    fn recompute(&mut self, inputs: &[LogicValue]) -> Vec<LogicValue> {
        let resolved: Vec<LogicValue> = inputs.iter().map(|v| v.resolve(self.high_z)).collect();
        vec![self.op.eval(&resolved)]
    }
}
