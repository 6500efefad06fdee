//! Circuit document schema.
//!
//! Components reference their pins through document node keys (`u32`),
//! which only need to be unique within one document. Wires refer to those
//! keys. Node values, forced overrides, clock history and the resolved
//! cross-links between nodes, wires and components are never written.

use lf_components::{ComponentSpec, DisplayVariant};
use lf_graph::WireOptions;
use serde::{Deserialize, Serialize};

/// Keys that describe live or recomputable state. They are stripped from
/// incoming documents and never produced by [`crate::to_doc`].
pub const DERIVED_KEYS: &[&str] = &[
    "value",
    "forced",
    "last_clock",
    "incoming",
    "outgoing",
    "component",
    "node",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CircuitDoc {
    #[serde(rename = "in", default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<SwitchDef>,
    #[serde(rename = "out", default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<ProbeDef>,
    /// Seven-segment displays.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub displays: Vec<DisplayDef>,
    /// Hex digit displays.
    #[serde(rename = "displaysA", default, skip_serializing_if = "Vec::is_empty")]
    pub displays_a: Vec<DisplayDef>,
    /// Byte displays.
    #[serde(rename = "displaysB", default, skip_serializing_if = "Vec::is_empty")]
    pub displays_b: Vec<DisplayDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clocks: Vec<ClockDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gates: Vec<GateDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wires: Vec<WireDef>,
}

impl CircuitDoc {
    pub fn is_empty(&self) -> bool {
        self.component_count() == 0 && self.wires.is_empty()
    }

    pub fn component_count(&self) -> usize {
        self.inputs.len()
            + self.outputs.len()
            + self.displays.len()
            + self.displays_a.len()
            + self.displays_b.len()
            + self.clocks.len()
            + self.gates.len()
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn default_period() -> u32 {
    1
}

/// Input switch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwitchDef {
    #[serde(default, skip_serializing_if = "is_false")]
    pub on: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub high_z_off: bool,
    #[serde(default)]
    pub outputs: Vec<u32>,
}

impl SwitchDef {
    pub fn spec(&self) -> ComponentSpec {
        ComponentSpec::Switch {
            on: self.on,
            high_z_off: self.high_z_off,
        }
    }
}

/// Output probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeDef {
    #[serde(default)]
    pub inputs: Vec<u32>,
}

/// Display; the variant comes from the array it is listed in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayDef {
    #[serde(default)]
    pub inputs: Vec<u32>,
}

impl DisplayDef {
    pub fn spec(variant: DisplayVariant) -> ComponentSpec {
        ComponentSpec::Display { variant }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClockDef {
    #[serde(default = "default_period")]
    pub period: u32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub level: bool,
    #[serde(default)]
    pub outputs: Vec<u32>,
}

impl ClockDef {
    pub fn spec(&self) -> ComponentSpec {
        ComponentSpec::Clock {
            period: self.period,
            level: self.level,
        }
    }
}

/// Any component kind, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GateDef {
    #[serde(flatten)]
    pub spec: ComponentSpec,
    #[serde(default)]
    pub inputs: Vec<u32>,
    #[serde(default)]
    pub outputs: Vec<u32>,
}

/// A wire entry: either the legacy `[from, to]` pair or a detailed record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum WireDef {
    Pair(Vec<Option<u32>>),
    Detailed(WireRecord),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WireRecord {
    pub from: Option<u32>,
    #[serde(default)]
    pub to: Option<u32>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub delay: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

impl WireDef {
    /// Plain pair unless the options need the detailed form.
    pub fn new(from: u32, to: u32, options: WireOptions) -> Self {
        if options == WireOptions::default() {
            WireDef::Pair(vec![Some(from), Some(to)])
        } else {
            WireDef::Detailed(WireRecord {
                from: Some(from),
                to: Some(to),
                delay: options.delay,
                style: options.style,
            })
        }
    }

    /// Source key, destination key and options; `None` if either key is missing.
    pub fn endpoints(&self) -> Option<(u32, u32, WireOptions)> {
        match self {
            WireDef::Pair(pair) => {
                let from = pair.first().copied().flatten()?;
                let to = pair.get(1).copied().flatten()?;
                Some((from, to, WireOptions::default()))
            }
            WireDef::Detailed(record) => Some((
                record.from?,
                record.to?,
                WireOptions {
                    delay: record.delay,
                    style: record.style.clone(),
                },
            )),
        }
    }
}
