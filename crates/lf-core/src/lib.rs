//! lf-core: stable foundation for logicflow.
//!
//! Contains:
//! - logic (four-valued `LogicValue` algebra, hi-Z policy, clock edges)
//! - ids (stable compact IDs for nodes, components and wires)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod logic;

// Re-exports: nice ergonomics for downstream crates
pub use error::{check_index, LfError, LfResult};
pub use ids::*;
pub use logic::*;
