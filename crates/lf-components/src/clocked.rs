//! Edge-triggered components.
//!
//! Both kinds here drive their state change through an [`EdgeDetector`];
//! between qualifying edges their outputs hold.

use lf_core::{Edge, HighZPolicy, LogicValue};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::edge::{ClockState, EdgeDetector};
use crate::spec::ComponentSpec;
use crate::traits::{Arity, LogicComponent};

/// Emits a fresh random bit on each qualifying clock edge.
///
/// The generator is seeded, so two instances with the same seed fed the
/// same clock produce the same sequence. The output is `Unknown` until the
/// first edge.
#[derive(Debug, Clone)]
pub struct RandomInput {
    seed: u64,
    detector: EdgeDetector,
    rng: ChaCha8Rng,
    out: LogicValue,
}

impl RandomInput {
    pub fn new(edge: Edge, seed: u64) -> Self {
        Self {
            seed,
            detector: EdgeDetector::new(edge),
            rng: ChaCha8Rng::seed_from_u64(seed),
            out: LogicValue::Unknown,
        }
    }

    pub fn clock_state(&self) -> ClockState {
        self.detector.state()
    }
}

impl LogicComponent for RandomInput {
    fn kind(&self) -> &'static str {
        "RandomInput"
    }

    fn spec(&self) -> ComponentSpec {
        ComponentSpec::RandomInput {
            edge: self.detector.edge(),
            seed: self.seed,
        }
    }

    fn arity(&self) -> Arity {
        Arity::new(1, 1)
    }

    fn recompute(&mut self, inputs: &[LogicValue]) -> Vec<LogicValue> {
        let clock = inputs.first().copied().unwrap_or_default();
        if self.detector.observe(clock) {
            self.out = LogicValue::from(self.rng.gen_bool(0.5));
        }
        vec![self.out]
    }
}

/// D flip-flop: inputs `(d, clk)`, outputs `(q, not_q)`.
#[derive(Debug, Clone)]
pub struct DFlipFlop {
    detector: EdgeDetector,
    q: LogicValue,
}

impl DFlipFlop {
    pub fn new(edge: Edge) -> Self {
        Self {
            detector: EdgeDetector::new(edge),
            q: LogicValue::Unknown,
        }
    }

    pub fn stored(&self) -> LogicValue {
        self.q
    }

    pub fn clock_state(&self) -> ClockState {
        self.detector.state()
    }
}

impl LogicComponent for DFlipFlop {
    fn kind(&self) -> &'static str {
        "DFlipFlop"
    }

    fn spec(&self) -> ComponentSpec {
        ComponentSpec::DFlipFlop {
            edge: self.detector.edge(),
        }
    }

    fn arity(&self) -> Arity {
        Arity::new(2, 2)
    }

    fn recompute(&mut self, inputs: &[LogicValue]) -> Vec<LogicValue> {
        let d = inputs.first().copied().unwrap_or_default();
        let clock = inputs.get(1).copied().unwrap_or_default();
        if self.detector.observe(clock) {
            self.q = d.resolve(HighZPolicy::Unknown);
        }
        vec![self.q, self.q.not()]
    }
}
