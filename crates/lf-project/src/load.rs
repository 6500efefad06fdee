//! Document to circuit.
//!
//! Components are created section by section in a fixed order (in, out,
//! displays, displaysA, displaysB, clocks, gates) and wires last, since
//! wires refer to node keys bound by the earlier steps. Everything is built
//! into a fresh circuit; a live circuit is only replaced once the whole
//! document has been accepted.

use std::collections::HashMap;

use lf_core::NodeId;
use lf_graph::{Circuit, CircuitBuilder, EngineConfig};
use tracing::{debug, warn};

use crate::schema::{CircuitDoc, DERIVED_KEYS};
use crate::validate::{entries, validate_doc};
use crate::ProjectResult;

/// A circuit built from a document, plus what the load had to skip.
#[derive(Debug)]
pub struct Loaded {
    pub circuit: Circuit,
    /// Document node key to live node.
    pub keys: HashMap<u32, NodeId>,
    /// Indices into `wires` of entries that were not connected.
    pub skipped_wires: Vec<usize>,
}

fn bind(keys: &mut HashMap<u32, NodeId>, doc_keys: &[u32], nodes: Option<&[NodeId]>) {
    if let Some(nodes) = nodes {
        keys.extend(doc_keys.iter().copied().zip(nodes.iter().copied()));
    }
}

/// Build a circuit from a parsed document.
///
/// Wire entries with a missing endpoint, an endpoint key that no component
/// declared, or an illegal connection are skipped with a warning.
pub fn load_doc(doc: &CircuitDoc, config: EngineConfig) -> ProjectResult<Loaded> {
    validate_doc(doc)?;

    let mut builder = CircuitBuilder::with_config(config);
    let mut keys = HashMap::new();
    for entry in entries(doc) {
        let comp = builder.add(&entry.spec)?;
        bind(&mut keys, entry.inputs, builder.inputs_of(comp));
        bind(&mut keys, entry.outputs, builder.outputs_of(comp));
    }

    let mut skipped_wires = Vec::new();
    for (index, def) in doc.wires.iter().enumerate() {
        let Some((from, to, options)) = def.endpoints() else {
            warn!(index, "wire entry is missing an endpoint, skipped");
            skipped_wires.push(index);
            continue;
        };
        let (Some(&source), Some(&dest)) = (keys.get(&from), keys.get(&to)) else {
            warn!(index, from, to, "wire refers to an unknown node key, skipped");
            skipped_wires.push(index);
            continue;
        };
        if let Err(err) = builder.connect_with(source, dest, options) {
            warn!(index, %err, "wire rejected, skipped");
            skipped_wires.push(index);
        }
    }

    let circuit = builder.build()?;
    debug!(
        components = circuit.component_count(),
        wires = circuit.wire_count(),
        skipped = skipped_wires.len(),
        "loaded circuit"
    );
    Ok(Loaded {
        circuit,
        keys,
        skipped_wires,
    })
}

/// Replace `live` with the circuit described by `doc`, keeping its engine
/// configuration. On error `live` is left untouched.
pub fn load_into(live: &mut Circuit, doc: &CircuitDoc) -> ProjectResult<Vec<usize>> {
    let loaded = load_doc(doc, live.config().clone())?;
    *live = loaded.circuit;
    Ok(loaded.skipped_wires)
}

/// Remove derived keys from a parsed JSON tree. Returns how many were dropped.
pub(crate) fn strip_json(value: &mut serde_json::Value) -> usize {
    match value {
        serde_json::Value::Object(map) => {
            let mut n = DERIVED_KEYS
                .iter()
                .filter(|k| map.remove(**k).is_some())
                .count();
            for child in map.values_mut() {
                n += strip_json(child);
            }
            n
        }
        serde_json::Value::Array(items) => items.iter_mut().map(strip_json).sum(),
        _ => 0,
    }
}

/// Remove derived keys from a parsed YAML tree. Returns how many were dropped.
pub(crate) fn strip_yaml(value: &mut serde_yaml::Value) -> usize {
    match value {
        serde_yaml::Value::Mapping(map) => {
            let mut n = DERIVED_KEYS
                .iter()
                .filter(|k| map.remove(**k).is_some())
                .count();
            for child in map.values_mut() {
                n += strip_yaml(child);
            }
            n
        }
        serde_yaml::Value::Sequence(items) => items.iter_mut().map(strip_yaml).sum(),
        serde_yaml::Value::Tagged(tagged) => strip_yaml(&mut tagged.value),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GateDef, ProbeDef, SwitchDef, WireDef};
    use lf_components::{ComponentSpec, GateOp};
    use lf_core::{HighZPolicy, LogicValue};
    use lf_graph::WireOptions;

    fn inverter_doc() -> CircuitDoc {
        CircuitDoc {
            inputs: vec![SwitchDef {
                on: true,
                high_z_off: false,
                outputs: vec![0],
            }],
            outputs: vec![ProbeDef { inputs: vec![1] }],
            gates: vec![GateDef {
                spec: ComponentSpec::Gate {
                    op: GateOp::Not,
                    fan_in: None,
                    high_z: HighZPolicy::Unknown,
                },
                inputs: vec![2],
                outputs: vec![3],
            }],
            wires: vec![
                WireDef::new(0, 2, WireOptions::default()),
                WireDef::new(3, 1, WireOptions::default()),
            ],
            ..CircuitDoc::default()
        }
    }

    #[test]
    fn loads_and_settles() {
        let loaded = load_doc(&inverter_doc(), EngineConfig::default()).unwrap();
        assert!(loaded.skipped_wires.is_empty());
        let probe_in = loaded.keys[&1];
        assert_eq!(loaded.circuit.value(probe_in), Some(LogicValue::False));
        assert_eq!(loaded.circuit.component_count(), 3);
        assert_eq!(loaded.circuit.wire_count(), 2);
    }

    #[test]
    fn dangling_wires_are_skipped() {
        let mut doc = inverter_doc();
        doc.wires.push(WireDef::Pair(vec![Some(3), None]));
        doc.wires.push(WireDef::Pair(vec![Some(0), Some(99)]));
        // Second driver for the NOT input.
        doc.wires.push(WireDef::new(3, 2, WireOptions::default()));
        let loaded = load_doc(&doc, EngineConfig::default()).unwrap();
        assert_eq!(loaded.skipped_wires, vec![2, 3, 4]);
        assert_eq!(loaded.circuit.wire_count(), 2);
    }

    #[test]
    fn invalid_doc_leaves_live_circuit() {
        let mut live = load_doc(&inverter_doc(), EngineConfig::default())
            .unwrap()
            .circuit;
        let mut bad = inverter_doc();
        bad.outputs[0].inputs = vec![0];
        assert!(load_into(&mut live, &bad).is_err());
        assert_eq!(live.component_count(), 3);
        assert_eq!(live.wire_count(), 2);
    }

    #[test]
    fn strips_nested_derived_keys() {
        let mut value = serde_json::json!({
            "gates": [{"type": "Probe", "value": "1", "inputs": [0], "component": 4}],
            "node": 1
        });
        assert_eq!(strip_json(&mut value), 3);
        assert_eq!(value, serde_json::json!({"gates": [{"type": "Probe", "inputs": [0]}]}));
    }

    #[test]
    fn strips_yaml_keys() {
        let mut value: serde_yaml::Value =
            serde_yaml::from_str("out:\n  - inputs: [1]\n    forced: true\n").unwrap();
        assert_eq!(strip_yaml(&mut value), 1);
    }
}
