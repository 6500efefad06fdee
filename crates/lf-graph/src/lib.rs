//! lf-graph: circuit graph and propagation engine for logicflow.
//!
//! Provides:
//! - Arena-backed circuit of components, terminal nodes and wires
//! - Structural edits that keep every cross-reference consistent
//! - A FIFO scheduler that settles values to a fixed point under a budget
//! - Tick-driven time for clocks and delayed wires
//!
//! # Example
//!
//! ```
//! use lf_components::{ComponentSpec, GateOp};
//! use lf_core::{HighZPolicy, LogicValue};
//! use lf_graph::Circuit;
//!
//! let mut circuit = Circuit::new();
//! let sw = circuit
//!     .add(&ComponentSpec::Switch { on: false, high_z_off: false })
//!     .unwrap();
//! let not = circuit
//!     .add(&ComponentSpec::Gate { op: GateOp::Not, fan_in: None, high_z: HighZPolicy::Unknown })
//!     .unwrap();
//! circuit
//!     .connect(circuit.output(sw, 0).unwrap(), circuit.input(not, 0).unwrap())
//!     .unwrap();
//!
//! let out = circuit.output(not, 0).unwrap();
//! assert_eq!(circuit.value(out), Some(LogicValue::True));
//! circuit.toggle(sw).unwrap();
//! assert_eq!(circuit.value(out), Some(LogicValue::False));
//! ```

pub mod builder;
pub mod circuit;
pub mod error;
pub mod node;
pub mod scheduler;
pub(crate) mod validate;
pub mod wire;

pub use builder::CircuitBuilder;
pub use circuit::Circuit;
pub use error::{ConnectionError, GraphError, GraphResult, UnstableCircuitError};
pub use node::{Direction, Node};
pub use scheduler::{EngineConfig, SettleStats};
pub use wire::{Wire, WireOptions};
