//! Tick-driven simulation for logicflow circuits.
//!
//! Provides:
//! - `run_sim`: step a circuit through time and sample probed nodes
//! - Decimated recording with per-sample settle status

pub mod error;
pub mod sim;

pub use error::{SimError, SimResult};
pub use sim::{run_sim, Probe, SimOptions, SimRecord};
