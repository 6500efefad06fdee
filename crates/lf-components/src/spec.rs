//! Component factory keyed by kind tag.

use lf_core::{Edge, HighZPolicy};
use serde::{Deserialize, Serialize};

use crate::adder::{FullAdder, HalfAdder};
use crate::clocked::{DFlipFlop, RandomInput};
use crate::demux::{Demux, Mux};
use crate::display::{Display, DisplayVariant};
use crate::error::{ComponentError, ComponentResult};
use crate::gate::{Gate, GateOp};
use crate::passthrough::Passthrough;
use crate::sources::{Clock, Probe, Switch};
use crate::traits::LogicComponent;

/// Kind tag plus parameters: everything needed to construct a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentSpec {
    Gate {
        op: GateOp,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fan_in: Option<usize>,
        #[serde(default)]
        high_z: HighZPolicy,
    },
    Demux {
        from: usize,
        to: usize,
        #[serde(default)]
        high_z_idle: bool,
    },
    Mux {
        from: usize,
        to: usize,
    },
    HalfAdder,
    FullAdder,
    RandomInput {
        #[serde(default)]
        edge: Edge,
        #[serde(default)]
        seed: u64,
    },
    DFlipFlop {
        #[serde(default)]
        edge: Edge,
    },
    Passthrough {
        #[serde(default = "default_width")]
        width: usize,
    },
    Switch {
        #[serde(default)]
        on: bool,
        #[serde(default)]
        high_z_off: bool,
    },
    Probe,
    Clock {
        #[serde(default = "default_period")]
        period: u32,
        #[serde(default)]
        level: bool,
    },
    Display {
        variant: DisplayVariant,
    },
}

fn default_width() -> usize {
    1
}

fn default_period() -> u32 {
    1
}

impl ComponentSpec {
    /// Default parameters for a kind tag. Gate operations are accepted as
    /// tags of their own (`"And"`, `"Not"`, ...).
    pub fn default_for(tag: &str) -> ComponentResult<Self> {
        let gate = |op: GateOp| ComponentSpec::Gate {
            op,
            fan_in: None,
            high_z: HighZPolicy::default(),
        };
        Ok(match tag {
            "And" => gate(GateOp::And),
            "Or" => gate(GateOp::Or),
            "Nand" => gate(GateOp::Nand),
            "Nor" => gate(GateOp::Nor),
            "Xor" => gate(GateOp::Xor),
            "Xnor" => gate(GateOp::Xnor),
            "Not" => gate(GateOp::Not),
            "Buffer" => gate(GateOp::Buffer),
            "Demux" => ComponentSpec::Demux {
                from: 1,
                to: 2,
                high_z_idle: false,
            },
            "Mux" => ComponentSpec::Mux { from: 2, to: 1 },
            "HalfAdder" => ComponentSpec::HalfAdder,
            "FullAdder" => ComponentSpec::FullAdder,
            "RandomInput" => ComponentSpec::RandomInput {
                edge: Edge::Rising,
                seed: 0,
            },
            "DFlipFlop" => ComponentSpec::DFlipFlop { edge: Edge::Rising },
            "Passthrough" => ComponentSpec::Passthrough { width: 1 },
            "Switch" => ComponentSpec::Switch {
                on: false,
                high_z_off: false,
            },
            "Probe" => ComponentSpec::Probe,
            "Clock" => ComponentSpec::Clock {
                period: 1,
                level: false,
            },
            "Display" => ComponentSpec::Display {
                variant: DisplayVariant::Hex,
            },
            other => {
                return Err(ComponentError::UnknownKind {
                    tag: other.to_string(),
                })
            }
        })
    }

    /// Kind tag, identical to the serialized `type` field.
    pub fn tag(&self) -> &'static str {
        match self {
            ComponentSpec::Gate { .. } => "Gate",
            ComponentSpec::Demux { .. } => "Demux",
            ComponentSpec::Mux { .. } => "Mux",
            ComponentSpec::HalfAdder => "HalfAdder",
            ComponentSpec::FullAdder => "FullAdder",
            ComponentSpec::RandomInput { .. } => "RandomInput",
            ComponentSpec::DFlipFlop { .. } => "DFlipFlop",
            ComponentSpec::Passthrough { .. } => "Passthrough",
            ComponentSpec::Switch { .. } => "Switch",
            ComponentSpec::Probe => "Probe",
            ComponentSpec::Clock { .. } => "Clock",
            ComponentSpec::Display { .. } => "Display",
        }
    }

    /// Check parameters without keeping the built component.
    pub fn validate(&self) -> ComponentResult<()> {
        self.build().map(|_| ())
    }

    /// Construct a fresh instance.
    pub fn build(&self) -> ComponentResult<Box<dyn LogicComponent>> {
        Ok(match *self {
            ComponentSpec::Gate { op, fan_in, high_z } => Box::new(
                Gate::new(op, fan_in.unwrap_or(op.default_fan_in()))?.with_high_z(high_z),
            ),
            ComponentSpec::Demux {
                from,
                to,
                high_z_idle,
            } => Box::new(Demux::new(from, to)?.with_high_z_idle(high_z_idle)),
            ComponentSpec::Mux { from, to } => Box::new(Mux::new(from, to)?),
            ComponentSpec::HalfAdder => Box::new(HalfAdder),
            ComponentSpec::FullAdder => Box::new(FullAdder),
            ComponentSpec::RandomInput { edge, seed } => Box::new(RandomInput::new(edge, seed)),
            ComponentSpec::DFlipFlop { edge } => Box::new(DFlipFlop::new(edge)),
            ComponentSpec::Passthrough { width } => Box::new(Passthrough::new(width)?),
            ComponentSpec::Switch { on, high_z_off } => {
                Box::new(Switch::new(on).with_high_z_off(high_z_off))
            }
            ComponentSpec::Probe => Box::new(Probe::new()),
            ComponentSpec::Clock { period, level } => Box::new(Clock::new(period, level)),
            ComponentSpec::Display { variant } => Box::new(Display::new(variant)),
        })
    }
}
