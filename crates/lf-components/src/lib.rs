//! lf-components: component library for logic circuits.
//!
//! Provides the kinds a circuit is built from:
//! - Gates (AND/OR/NAND/NOR/XOR/XNOR/NOT/buffer) over four-valued logic
//! - Demultiplexers and multiplexers driven by a binary selector bus
//! - Half and full adders
//! - Edge-triggered parts (random input, D flip-flop) sharing one edge detector
//! - Sources and sinks (switch, clock, probe, displays) and a passthrough
//!
//! All components implement [`LogicComponent`] and are built from a
//! [`ComponentSpec`], the tagged parameter record also used by documents.
//!
//! # Example
//!
//! ```
//! use lf_components::{ComponentSpec, GateOp};
//! use lf_core::{HighZPolicy, LogicValue};
//!
//! let spec = ComponentSpec::Gate { op: GateOp::And, fan_in: None, high_z: HighZPolicy::Unknown };
//! let mut and = spec.build().unwrap();
//! let out = and.recompute(&[LogicValue::False, LogicValue::Unknown]);
//! assert_eq!(out, vec![LogicValue::False]);
//! ```

pub mod adder;
pub mod clocked;
pub mod demux;
pub mod display;
pub mod edge;
pub mod error;
pub mod gate;
pub mod passthrough;
pub mod sources;
pub mod spec;
pub mod traits;

// Re-exports
pub use adder::{FullAdder, HalfAdder};
pub use clocked::{DFlipFlop, RandomInput};
pub use demux::{Demux, Mux};
pub use display::{Display, DisplayVariant};
pub use edge::{ClockState, EdgeDetector};
pub use error::{ComponentError, ComponentResult};
pub use gate::{Gate, GateOp};
pub use passthrough::Passthrough;
pub use sources::{Clock, Probe, Switch};
pub use spec::ComponentSpec;
pub use traits::{Arity, DrawnState, LogicComponent, MAX_PINS};
