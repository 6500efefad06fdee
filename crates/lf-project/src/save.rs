//! Circuit to document.

use std::collections::HashMap;

use lf_components::{ComponentSpec, DisplayVariant};
use lf_core::{CompId, NodeId};
use lf_graph::Circuit;

use crate::schema::{ClockDef, CircuitDoc, DisplayDef, GateDef, ProbeDef, SwitchDef, WireDef};

/// Document array a component is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    In,
    Out,
    Displays,
    DisplaysA,
    DisplaysB,
    Clocks,
    Gates,
}

impl Section {
    const LOAD_ORDER: [Section; 7] = [
        Section::In,
        Section::Out,
        Section::Displays,
        Section::DisplaysA,
        Section::DisplaysB,
        Section::Clocks,
        Section::Gates,
    ];

    fn of(spec: &ComponentSpec) -> Self {
        match spec {
            ComponentSpec::Switch { .. } => Section::In,
            ComponentSpec::Probe => Section::Out,
            ComponentSpec::Display {
                variant: DisplayVariant::SevenSegment,
            } => Section::Displays,
            ComponentSpec::Display {
                variant: DisplayVariant::Hex,
            } => Section::DisplaysA,
            ComponentSpec::Display {
                variant: DisplayVariant::Byte,
            } => Section::DisplaysB,
            ComponentSpec::Clock { .. } => Section::Clocks,
            _ => Section::Gates,
        }
    }
}

/// Assigns dense document keys in emission order.
#[derive(Default)]
struct KeyMap {
    keys: HashMap<NodeId, u32>,
    next: u32,
}

impl KeyMap {
    fn assign(&mut self, nodes: &[NodeId]) -> Vec<u32> {
        nodes
            .iter()
            .map(|n| {
                let key = self.next;
                self.keys.insert(*n, key);
                self.next += 1;
                key
            })
            .collect()
    }
}

/// Describe a circuit as a document.
///
/// Components are emitted in load order, so saving a freshly loaded
/// document reproduces it exactly. Node values and other live state are
/// not part of the output, except the parameters that double as source
/// state (switch position, clock level).
pub fn to_doc(circuit: &Circuit) -> CircuitDoc {
    let mut doc = CircuitDoc::default();
    let mut keys = KeyMap::default();

    let specs: Vec<(CompId, ComponentSpec)> = circuit
        .components()
        .filter_map(|c| circuit.spec(c).map(|s| (c, s)))
        .collect();

    for section in Section::LOAD_ORDER {
        for (comp, spec) in specs.iter().filter(|(_, s)| Section::of(s) == section) {
            let inputs = keys.assign(circuit.inputs_of(*comp).unwrap_or_default());
            let outputs = keys.assign(circuit.outputs_of(*comp).unwrap_or_default());
            match spec {
                ComponentSpec::Switch { on, high_z_off } => doc.inputs.push(SwitchDef {
                    on: *on,
                    high_z_off: *high_z_off,
                    outputs,
                }),
                ComponentSpec::Probe => doc.outputs.push(ProbeDef { inputs }),
                ComponentSpec::Display { .. } => {
                    let def = DisplayDef { inputs };
                    match section {
                        Section::Displays => doc.displays.push(def),
                        Section::DisplaysA => doc.displays_a.push(def),
                        _ => doc.displays_b.push(def),
                    }
                }
                ComponentSpec::Clock { period, level } => doc.clocks.push(ClockDef {
                    period: *period,
                    level: *level,
                    outputs,
                }),
                other => doc.gates.push(GateDef {
                    spec: other.clone(),
                    inputs,
                    outputs,
                }),
            }
        }
    }

    for wire in circuit.wires() {
        if let (Some(from), Some(to)) = (keys.keys.get(&wire.from()), keys.keys.get(&wire.to())) {
            doc.wires.push(WireDef::new(*from, *to, wire.options()));
        }
    }
    doc
}
