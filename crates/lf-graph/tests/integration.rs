//! Integration tests for lf-graph.

use lf_components::{Arity, ComponentSpec, DrawnState, GateOp, LogicComponent};
use lf_core::{HighZPolicy, LogicValue};
use lf_graph::{
    Circuit, CircuitBuilder, ConnectionError, EngineConfig, GraphError, WireOptions,
};

use lf_core::LogicValue::{False as F, True as T, Unknown as X};

fn gate(op: GateOp) -> ComponentSpec {
    ComponentSpec::Gate {
        op,
        fan_in: None,
        high_z: HighZPolicy::Unknown,
    }
}

fn switch(on: bool) -> ComponentSpec {
    ComponentSpec::Switch {
        on,
        high_z_off: false,
    }
}

#[test]
fn nand_latch_converges_and_holds() {
    // S̄ -> [N1] -> Q, R̄ -> [N2] -> Q̄, cross-coupled.
    let mut c = Circuit::new();
    let s = c.add(&switch(false)).unwrap();
    let r = c.add(&switch(true)).unwrap();
    let n1 = c.add(&gate(GateOp::Nand)).unwrap();
    let n2 = c.add(&gate(GateOp::Nand)).unwrap();

    c.connect(c.output(s, 0).unwrap(), c.input(n1, 0).unwrap()).unwrap();
    c.connect(c.output(n2, 0).unwrap(), c.input(n1, 1).unwrap()).unwrap();
    c.connect(c.output(r, 0).unwrap(), c.input(n2, 0).unwrap()).unwrap();
    c.connect(c.output(n1, 0).unwrap(), c.input(n2, 1).unwrap()).unwrap();

    let q = c.output(n1, 0).unwrap();
    let q_bar = c.output(n2, 0).unwrap();
    assert_eq!(c.value(q), Some(T));
    assert_eq!(c.value(q_bar), Some(F));
    assert!(c.last_settle().is_ok());

    // Release set: the latch holds.
    c.set_level(s, true).unwrap();
    assert_eq!(c.value(q), Some(T));
    assert_eq!(c.value(q_bar), Some(F));

    // Reset.
    c.set_level(r, false).unwrap();
    assert_eq!(c.value(q), Some(F));
    assert_eq!(c.value(q_bar), Some(T));
    c.check_consistency().unwrap();
}

/// A lone inverter fed back to itself starts at `Unknown`, and `NOT(Unknown)`
/// is `Unknown`, so the loop is already at a fixed point. Forcing a defined
/// level and releasing it is what starts the oscillation.
#[test]
fn ring_oscillator_exhausts_budget_without_failing_edit() {
    let mut c = Circuit::with_config(EngineConfig {
        iteration_budget: 64,
    });
    let not = c.add(&gate(GateOp::Not)).unwrap();
    let out = c.output(not, 0).unwrap();
    let input = c.input(not, 0).unwrap();
    c.connect(out, input).unwrap();

    // Unknown feeding back into NOT stays Unknown: nothing to oscillate yet.
    assert_eq!(c.value(out), Some(X));
    assert!(c.last_settle().is_ok());

    // Kick the loop with a defined level and let go.
    c.force(out, T).unwrap();
    assert!(c.last_settle().is_ok());
    c.unforce(out).unwrap();

    let err = c.last_settle().clone().unwrap_err();
    assert_eq!(err.budget, 64);
    assert_eq!(c.pending_len(), 0);
    assert!(c.value(out).is_some_and(LogicValue::is_defined));
    c.check_consistency().unwrap();
}

#[test]
fn settle_is_idempotent() {
    let mut c = Circuit::new();
    let a = c.add(&switch(true)).unwrap();
    let b = c.add(&switch(false)).unwrap();
    let xor = c.add(&gate(GateOp::Xor)).unwrap();
    c.connect(c.output(a, 0).unwrap(), c.input(xor, 0).unwrap()).unwrap();
    c.connect(c.output(b, 0).unwrap(), c.input(xor, 1).unwrap()).unwrap();

    let before: Vec<_> = c.nodes().map(|n| n.read()).collect();
    let stats = c.settle().unwrap();
    assert_eq!(stats.steps, 0);
    let after: Vec<_> = c.nodes().map(|n| n.read()).collect();
    assert_eq!(before, after);
}

#[test]
fn disconnect_leaves_input_unknown() {
    let mut c = Circuit::new();
    let sw = c.add(&switch(true)).unwrap();
    let probe = c.add(&ComponentSpec::Probe).unwrap();
    let w = c.connect(c.output(sw, 0).unwrap(), c.input(probe, 0).unwrap()).unwrap();
    assert_eq!(c.drawn_state(probe), Some(DrawnState::Level(T)));

    c.disconnect(w).unwrap();
    assert_eq!(c.value(c.input(probe, 0).unwrap()), Some(X));
    assert_eq!(c.drawn_state(probe), Some(DrawnState::Level(X)));
    assert!(c.wire(w).is_none());
    assert!(matches!(
        c.disconnect(w),
        Err(GraphError::UnknownWire { .. })
    ));
}

#[test]
fn delayed_wire_delivers_after_ticks() {
    let mut c = Circuit::new();
    let sw = c.add(&switch(false)).unwrap();
    let not = c.add(&gate(GateOp::Not)).unwrap();
    c.connect_with(
        c.output(sw, 0).unwrap(),
        c.input(not, 0).unwrap(),
        WireOptions::delayed(2),
    )
    .unwrap();
    let out = c.output(not, 0).unwrap();

    // The initial level is copied across immediately.
    assert_eq!(c.value(out), Some(T));

    c.toggle(sw).unwrap();
    assert_eq!(c.value(out), Some(T));
    c.tick().unwrap();
    assert_eq!(c.value(out), Some(T));
    c.tick().unwrap();
    assert_eq!(c.value(out), Some(F));
    assert_eq!(c.current_tick(), 2);
}

#[test]
fn passthrough_splice_merges_delay_and_style() {
    let mut c = Circuit::new();
    let sw = c.add(&switch(true)).unwrap();
    let pass = c.add(&ComponentSpec::Passthrough { width: 1 }).unwrap();
    let pa = c.add(&ComponentSpec::Probe).unwrap();
    let pb = c.add(&ComponentSpec::Probe).unwrap();

    c.connect_with(
        c.output(sw, 0).unwrap(),
        c.input(pass, 0).unwrap(),
        WireOptions {
            delay: 1,
            style: Some("bus".into()),
        },
    )
    .unwrap();
    c.connect_with(
        c.output(pass, 0).unwrap(),
        c.input(pa, 0).unwrap(),
        WireOptions::delayed(2),
    )
    .unwrap();
    c.connect_with(
        c.output(pass, 0).unwrap(),
        c.input(pb, 0).unwrap(),
        WireOptions {
            delay: 0,
            style: Some("dashed".into()),
        },
    )
    .unwrap();

    let spliced = c.remove_passthrough(pass).unwrap();
    assert_eq!(spliced.len(), 2);
    assert_eq!(c.component_count(), 3);
    assert_eq!(c.wire_count(), 2);

    let to_a = c.wire(spliced[0]).unwrap();
    assert_eq!(to_a.from(), c.output(sw, 0).unwrap());
    assert_eq!(to_a.to(), c.input(pa, 0).unwrap());
    assert_eq!(to_a.delay(), 3);
    assert_eq!(to_a.style(), Some("bus"));

    let to_b = c.wire(spliced[1]).unwrap();
    assert_eq!(to_b.delay(), 1);
    assert_eq!(to_b.style(), Some("dashed"));

    assert_eq!(c.value(c.input(pa, 0).unwrap()), Some(T));
    c.check_consistency().unwrap();
}

#[test]
fn remove_passthrough_rejects_other_kinds() {
    let mut c = Circuit::new();
    let not = c.add(&gate(GateOp::Not)).unwrap();
    assert!(matches!(
        c.remove_passthrough(not),
        Err(GraphError::NotAPassthrough { .. })
    ));
}

#[test]
fn remove_component_cuts_its_wires() {
    let mut c = Circuit::new();
    let sw = c.add(&switch(true)).unwrap();
    let not = c.add(&gate(GateOp::Not)).unwrap();
    let probe = c.add(&ComponentSpec::Probe).unwrap();
    c.connect(c.output(sw, 0).unwrap(), c.input(not, 0).unwrap()).unwrap();
    c.connect(c.output(not, 0).unwrap(), c.input(probe, 0).unwrap()).unwrap();
    assert_eq!(c.drawn_state(probe), Some(DrawnState::Level(F)));

    c.remove_component(not).unwrap();
    assert_eq!(c.wire_count(), 0);
    assert_eq!(c.component_count(), 2);
    assert_eq!(c.drawn_state(probe), Some(DrawnState::Level(X)));
    assert!(c.component(not).is_none());
    assert!(matches!(
        c.remove_component(not),
        Err(GraphError::UnknownComponent { .. })
    ));

    // Ids are never reused.
    let again = c.add(&gate(GateOp::Not)).unwrap();
    assert_ne!(again, not);
    c.check_consistency().unwrap();
}

#[test]
fn remove_self_fed_gate() {
    let mut c = Circuit::with_config(EngineConfig {
        iteration_budget: 64,
    });
    let not = c.add(&gate(GateOp::Not)).unwrap();
    let probe = c.add(&ComponentSpec::Probe).unwrap();
    let out = c.output(not, 0).unwrap();
    c.connect(out, c.input(not, 0).unwrap()).unwrap();
    c.connect(out, c.input(probe, 0).unwrap()).unwrap();
    c.force(out, T).unwrap();
    c.unforce(out).unwrap();
    assert!(c.last_settle().is_err());

    c.remove_component(not).unwrap();
    assert!(c.component(not).is_none());
    assert_eq!(c.component_count(), 1);
    assert_eq!(c.wire_count(), 0);
    assert_eq!(c.pending_len(), 0);
    assert_eq!(c.drawn_state(probe), Some(DrawnState::Level(X)));
    assert!(c.last_settle().is_ok());
    c.check_consistency().unwrap();
}

#[test]
fn passthrough_splice_follows_chained_bits() {
    // sw -> in0, out0 -> in1, out1 -> probe
    let mut c = Circuit::new();
    let sw = c.add(&switch(true)).unwrap();
    let pass = c.add(&ComponentSpec::Passthrough { width: 2 }).unwrap();
    let probe = c.add(&ComponentSpec::Probe).unwrap();

    c.connect_with(
        c.output(sw, 0).unwrap(),
        c.input(pass, 0).unwrap(),
        WireOptions::delayed(1),
    )
    .unwrap();
    c.connect_with(
        c.output(pass, 0).unwrap(),
        c.input(pass, 1).unwrap(),
        WireOptions {
            delay: 2,
            style: Some("loop".into()),
        },
    )
    .unwrap();
    c.connect(c.output(pass, 1).unwrap(), c.input(probe, 0).unwrap())
        .unwrap();
    assert_eq!(c.drawn_state(probe), Some(DrawnState::Level(T)));

    let spliced = c.remove_passthrough(pass).unwrap();
    assert_eq!(spliced.len(), 1);
    assert_eq!(c.component_count(), 2);
    assert_eq!(c.wire_count(), 1);
    assert_eq!(c.pending_len(), 0);

    let wire = c.wire(spliced[0]).unwrap();
    assert_eq!(wire.from(), c.output(sw, 0).unwrap());
    assert_eq!(wire.to(), c.input(probe, 0).unwrap());
    assert_eq!(wire.delay(), 3);
    assert_eq!(wire.style(), Some("loop"));
    assert_eq!(c.drawn_state(probe), Some(DrawnState::Level(T)));

    c.set_level(sw, false).unwrap();
    for _ in 0..3 {
        c.tick().unwrap();
    }
    assert_eq!(c.drawn_state(probe), Some(DrawnState::Level(F)));
    c.check_consistency().unwrap();
}

#[test]
fn passthrough_splice_drops_self_looped_bit() {
    // out0 -> in0 (loop), out0 -> pa; sw -> in1, out1 -> pb
    let mut c = Circuit::new();
    let sw = c.add(&switch(true)).unwrap();
    let pass = c.add(&ComponentSpec::Passthrough { width: 2 }).unwrap();
    let pa = c.add(&ComponentSpec::Probe).unwrap();
    let pb = c.add(&ComponentSpec::Probe).unwrap();

    c.connect(c.output(pass, 0).unwrap(), c.input(pass, 0).unwrap())
        .unwrap();
    c.connect(c.output(pass, 0).unwrap(), c.input(pa, 0).unwrap())
        .unwrap();
    c.connect(c.output(sw, 0).unwrap(), c.input(pass, 1).unwrap())
        .unwrap();
    c.connect(c.output(pass, 1).unwrap(), c.input(pb, 0).unwrap())
        .unwrap();

    let spliced = c.remove_passthrough(pass).unwrap();
    assert_eq!(spliced.len(), 1);
    assert_eq!(c.wire_count(), 1);
    assert!(c.component(pass).is_none());
    assert_eq!(c.drawn_state(pa), Some(DrawnState::Level(X)));
    assert_eq!(c.drawn_state(pb), Some(DrawnState::Level(T)));
    assert!(c.last_settle().is_ok());
    c.check_consistency().unwrap();
}

#[test]
fn second_driver_is_rejected() {
    let mut c = Circuit::new();
    let a = c.add(&switch(true)).unwrap();
    let b = c.add(&switch(false)).unwrap();
    let probe = c.add(&ComponentSpec::Probe).unwrap();
    let input = c.input(probe, 0).unwrap();
    let first = c.connect(c.output(a, 0).unwrap(), input).unwrap();

    let err = c.connect(c.output(b, 0).unwrap(), input).unwrap_err();
    assert_eq!(
        err,
        GraphError::Connection(ConnectionError::InputAlreadyDriven {
            node: input,
            wire: first,
        })
    );
    assert_eq!(c.wire_count(), 1);
    assert_eq!(c.value(input), Some(T));
}

#[test]
fn wrong_direction_is_rejected() {
    let mut c = Circuit::new();
    let a = c.add(&gate(GateOp::And)).unwrap();
    let b = c.add(&gate(GateOp::And)).unwrap();
    let err = c
        .connect(c.input(a, 0).unwrap(), c.input(b, 0).unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::Connection(ConnectionError::NotAnOutput { .. })
    ));
    let err = c
        .connect(c.output(a, 0).unwrap(), c.output(b, 0).unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::Connection(ConnectionError::NotAnInput { .. })
    ));
    assert_eq!(c.wire_count(), 0);
}

/// Source with a single four-bit output.
#[derive(Debug)]
struct Nibble;

impl LogicComponent for Nibble {
    fn kind(&self) -> &'static str {
        "Nibble"
    }

    fn spec(&self) -> ComponentSpec {
        ComponentSpec::Passthrough { width: 4 }
    }

    fn arity(&self) -> Arity {
        Arity::new(0, 1)
    }

    fn output_width(&self, _pin: usize) -> u8 {
        4
    }

    fn recompute(&mut self, _inputs: &[LogicValue]) -> Vec<LogicValue> {
        vec![F]
    }
}

#[test]
fn width_mismatch_is_rejected() {
    let mut c = Circuit::new();
    let nibble = c.add_component(Box::new(Nibble));
    let probe = c.add(&ComponentSpec::Probe).unwrap();
    let err = c
        .connect(c.output(nibble, 0).unwrap(), c.input(probe, 0).unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::Connection(ConnectionError::WidthMismatch {
            from_width: 4,
            to_width: 1,
            ..
        })
    ));
}

#[test]
fn forced_input_overrides_driver() {
    let mut c = Circuit::new();
    let sw = c.add(&switch(false)).unwrap();
    let not = c.add(&gate(GateOp::Not)).unwrap();
    c.connect(c.output(sw, 0).unwrap(), c.input(not, 0).unwrap()).unwrap();
    let input = c.input(not, 0).unwrap();
    let out = c.output(not, 0).unwrap();
    assert_eq!(c.value(out), Some(T));

    c.force(input, T).unwrap();
    assert_eq!(c.value(out), Some(F));
    assert_eq!(c.node(input).unwrap().propagated(), F);

    c.unforce(input).unwrap();
    assert_eq!(c.value(out), Some(T));
}

#[test]
fn clocked_flip_flop_samples_on_rising_edge() {
    let mut c = Circuit::new();
    let clk = c.add(&ComponentSpec::Clock {
        period: 1,
        level: false,
    })
    .unwrap();
    let d = c.add(&switch(true)).unwrap();
    let ff = c
        .add(&ComponentSpec::DFlipFlop {
            edge: lf_core::Edge::Rising,
        })
        .unwrap();
    c.connect(c.output(d, 0).unwrap(), c.input(ff, 0).unwrap()).unwrap();
    c.connect(c.output(clk, 0).unwrap(), c.input(ff, 1).unwrap()).unwrap();
    let q = c.output(ff, 0).unwrap();
    assert_eq!(c.value(q), Some(X));

    c.tick().unwrap();
    assert_eq!(c.value(q), Some(T));

    // Changing d while the clock is high does not refire the edge.
    c.set_level(d, false).unwrap();
    assert_eq!(c.value(q), Some(T));

    c.tick().unwrap();
    assert_eq!(c.value(q), Some(T));
    c.tick().unwrap();
    assert_eq!(c.value(q), Some(F));
    assert_eq!(c.value(c.output(ff, 1).unwrap()), Some(T));
}

#[test]
fn builder_matches_incremental_edits() {
    let mut b = CircuitBuilder::new();
    let a = b.add(&switch(true)).unwrap();
    let s = b.add(&switch(true)).unwrap();
    let and = b.add(&gate(GateOp::And)).unwrap();
    let fa = b.output(a, 0).unwrap();
    let fs = b.output(s, 0).unwrap();
    let t0 = b.input(and, 0).unwrap();
    let t1 = b.input(and, 1).unwrap();
    b.connect(fa, t0).unwrap();
    b.connect(fs, t1).unwrap();
    let built = b.build().unwrap();

    let mut c = Circuit::new();
    let a = c.add(&switch(true)).unwrap();
    let s = c.add(&switch(true)).unwrap();
    let and2 = c.add(&gate(GateOp::And)).unwrap();
    c.connect(c.output(a, 0).unwrap(), c.input(and2, 0).unwrap()).unwrap();
    c.connect(c.output(s, 0).unwrap(), c.input(and2, 1).unwrap()).unwrap();

    let lhs: Vec<_> = built.nodes().map(|n| n.read()).collect();
    let rhs: Vec<_> = c.nodes().map(|n| n.read()).collect();
    assert_eq!(lhs, rhs);
    assert_eq!(built.value(built.output(and, 0).unwrap()), Some(T));
}

#[test]
fn clear_keeps_config() {
    let mut c = Circuit::with_config(EngineConfig {
        iteration_budget: 5,
    });
    c.add(&switch(true)).unwrap();
    c.clear();
    assert!(c.is_empty());
    assert_eq!(c.config().iteration_budget, 5);
}
