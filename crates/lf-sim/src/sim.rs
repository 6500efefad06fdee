//! Tick-driven simulation runner.

use lf_components::ComponentSpec;
use lf_core::{LogicValue, NodeId};
use lf_graph::Circuit;
use tracing::{debug, warn};

use crate::error::{SimError, SimResult};

/// Options for a simulation run.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Number of ticks to advance.
    pub ticks: u64,
    /// Record every N-th tick (decimation).
    pub record_every: u64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            ticks: 16,
            record_every: 1,
        }
    }
}

/// A named node whose value is sampled during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Probe {
    pub label: String,
    pub node: NodeId,
}

impl Probe {
    pub fn new(label: impl Into<String>, node: NodeId) -> Self {
        Self {
            label: label.into(),
            node,
        }
    }

    /// One probe per `Probe` component, sampling its input pin.
    pub fn from_sinks(circuit: &Circuit) -> Vec<Probe> {
        circuit
            .components()
            .filter(|c| matches!(circuit.spec(*c), Some(ComponentSpec::Probe)))
            .filter_map(|c| {
                let node = circuit.inputs_of(c)?.first().copied()?;
                Some(Probe::new(format!("probe{c}"), node))
            })
            .collect()
    }
}

/// Sampled values of a run. Row `i` of `values` was taken at `ticks[i]`.
#[derive(Clone, Debug, Default)]
pub struct SimRecord {
    pub labels: Vec<String>,
    pub ticks: Vec<u64>,
    pub values: Vec<Vec<LogicValue>>,
    /// Whether the settle pass of the sampled tick converged.
    pub settled: Vec<bool>,
}

impl SimRecord {
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Values of one probe over the run.
    pub fn series(&self, label: &str) -> Option<Vec<LogicValue>> {
        let col = self.labels.iter().position(|l| l == label)?;
        Some(self.values.iter().map(|row| row[col]).collect())
    }

    /// Number of sampled ticks whose settle pass ran out of budget.
    pub fn unstable_count(&self) -> usize {
        self.settled.iter().filter(|s| !**s).count()
    }

    fn push(&mut self, circuit: &Circuit, probes: &[Probe], settled: bool) {
        self.ticks.push(circuit.current_tick());
        self.values.push(
            probes
                .iter()
                .map(|p| circuit.value(p.node).unwrap_or_default())
                .collect(),
        );
        self.settled.push(settled);
    }
}

/// Step a circuit through `opts.ticks` ticks, sampling `probes`.
///
/// The starting state is always recorded, then every `record_every`-th tick,
/// then the final tick. A tick that fails to settle is recorded with
/// `settled = false`; the run continues.
pub fn run_sim(circuit: &mut Circuit, opts: &SimOptions, probes: &[Probe]) -> SimResult<SimRecord> {
    if opts.record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }
    if let Some(p) = probes.iter().find(|p| circuit.node(p.node).is_none()) {
        return Err(SimError::UnknownProbe {
            label: p.label.clone(),
        });
    }

    let mut record = SimRecord {
        labels: probes.iter().map(|p| p.label.clone()).collect(),
        ..SimRecord::default()
    };
    record.push(circuit, probes, circuit.last_settle().is_ok());

    let mut step = 0;
    let mut settled = true;
    while step < opts.ticks {
        settled = match circuit.tick() {
            Ok(_) => true,
            Err(err) => {
                warn!(tick = circuit.current_tick(), %err, "tick did not settle");
                false
            }
        };
        step += 1;

        if step % opts.record_every == 0 {
            record.push(circuit, probes, settled);
        }
    }

    // Always record final state
    if step % opts.record_every != 0 {
        record.push(circuit, probes, settled);
    }

    debug!(
        ticks = step,
        samples = record.len(),
        unstable = record.unstable_count(),
        "simulation finished"
    );
    Ok(record)
}
