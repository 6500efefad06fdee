//! Core trait for component models.

use core::fmt::Debug;

use lf_core::LogicValue;

use crate::spec::ComponentSpec;

/// Upper bound on the pins of one side (inputs or outputs) of a component.
pub const MAX_PINS: usize = 256;

/// Fixed pin counts of a component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub inputs: usize,
    pub outputs: usize,
}

impl Arity {
    pub fn new(inputs: usize, outputs: usize) -> Self {
        Self { inputs, outputs }
    }
}

/// What a front end needs to render a component beyond its pin values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawnState {
    #[default]
    None,
    /// Single level (switches, clocks, probes).
    Level(LogicValue),
    /// Lit segments `a..g` as bits 0..6, `None` while any segment input is undefined.
    Segments(Option<u8>),
    /// Hex digit 0..15.
    Digit(Option<u8>),
    /// Unsigned byte.
    Byte(Option<u8>),
}

/// A unit with fixed input/output pins and a recomputation rule.
///
/// `recompute` maps the current input values to new output values. It may
/// update internal state (a flip-flop's stored bit, an edge detector's last
/// clock level) but never the component's arity. The returned vector must
/// hold exactly `arity().outputs` values.
///
/// The hooks below `recompute` let an external driver move a source
/// component; each returns whether the component's outputs may have changed,
/// in which case the owning circuit schedules a recompute.
pub trait LogicComponent: Send + Debug {
    /// Kind tag, matching the `type` tag of [`ComponentSpec`].
    fn kind(&self) -> &'static str;

    /// Parameters needed to rebuild an equivalent component.
    fn spec(&self) -> ComponentSpec;

    fn arity(&self) -> Arity;

    /// Bit width of an input pin. Every built-in kind uses single-bit pins.
    fn input_width(&self, _pin: usize) -> u8 {
        1
    }

    /// Bit width of an output pin.
    fn output_width(&self, _pin: usize) -> u8 {
        1
    }

    fn recompute(&mut self, inputs: &[LogicValue]) -> Vec<LogicValue>;

    fn drawn_state(&self) -> DrawnState {
        DrawnState::None
    }

    /// Called once per simulation tick with the new tick number.
    fn on_tick(&mut self, _tick: u64) -> bool {
        false
    }

    /// Drive an external source to a level.
    fn set_level(&mut self, _level: bool) -> bool {
        false
    }

    /// Flip an external source.
    fn toggle(&mut self) -> bool {
        false
    }
}
