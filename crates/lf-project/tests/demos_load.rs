use std::path::{Path, PathBuf};

use lf_core::LogicValue::{False as F, True as T};
use lf_graph::EngineConfig;
use lf_project::{load_doc, read_doc, Loaded};

fn demo(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

fn load(name: &str) -> Loaded {
    let doc = read_doc(&demo(name)).unwrap_or_else(|e| panic!("Failed to read {name}: {e}"));
    load_doc(&doc, EngineConfig::default()).unwrap_or_else(|e| panic!("Failed to load {name}: {e}"))
}

#[test]
fn demos_load_and_settle() {
    for name in ["sr_latch.json", "demux.json", "clocked_adder.yaml"] {
        let loaded = load(name);
        assert!(loaded.circuit.last_settle().is_ok(), "{name} did not settle");
        loaded.circuit.check_consistency().unwrap();
    }
}

#[test]
fn sr_latch_is_set() {
    let loaded = load("sr_latch.json");
    let c = &loaded.circuit;
    assert_eq!(c.value(loaded.keys[&2]), Some(T));
    assert_eq!(c.value(loaded.keys[&3]), Some(F));
}

#[test]
fn demux_routes_to_group_two() {
    let loaded = load("demux.json");
    let values: Vec<_> = [10, 11, 12, 13]
        .iter()
        .map(|k| loaded.circuit.value(loaded.keys[k]).unwrap())
        .collect();
    assert_eq!(values, vec![F, F, T, F]);
    // The trailing `[9, null]` entry has no destination.
    assert_eq!(loaded.skipped_wires, vec![7]);
}

#[test]
fn clocked_adder_steps() {
    let mut loaded = load("clocked_adder.yaml");
    let sum = loaded.keys[&10];
    let carry = loaded.keys[&11];
    loaded.circuit.tick().unwrap();
    assert_eq!(loaded.circuit.value(sum), Some(F));
    assert_eq!(loaded.circuit.value(carry), Some(T));
    let styled = loaded
        .circuit
        .wires()
        .filter(|w| w.style() == Some("bus"))
        .count();
    assert_eq!(styled, 1);
}
