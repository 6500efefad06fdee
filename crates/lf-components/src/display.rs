//! Display sinks. They have no outputs; their value is the decoded reading
//! exposed through [`DrawnState`].

use lf_core::LogicValue;
use serde::{Deserialize, Serialize};

use crate::spec::ComponentSpec;
use crate::traits::{Arity, DrawnState, LogicComponent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayVariant {
    /// Seven independent segments `a..g`.
    SevenSegment,
    /// 4-bit hex digit, LSB first.
    Hex,
    /// 8-bit unsigned value, LSB first.
    Byte,
}

impl DisplayVariant {
    pub fn width(self) -> usize {
        match self {
            DisplayVariant::SevenSegment => 7,
            DisplayVariant::Hex => 4,
            DisplayVariant::Byte => 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Display {
    variant: DisplayVariant,
    reading: Option<u8>,
}

impl Display {
    pub fn new(variant: DisplayVariant) -> Self {
        Self {
            variant,
            reading: None,
        }
    }

    pub fn variant(&self) -> DisplayVariant {
        self.variant
    }
}

/// Pack LSB-first bits into a byte; `None` if any bit is undefined.
fn pack(bits: &[LogicValue]) -> Option<u8> {
    bits.iter()
        .take(8)
        .enumerate()
        .try_fold(0u8, |acc, (i, bit)| {
            bit.as_bool().map(|b| if b { acc | (1 << i) } else { acc })
        })
}

impl LogicComponent for Display {
    fn kind(&self) -> &'static str {
        "Display"
    }

    fn spec(&self) -> ComponentSpec {
        ComponentSpec::Display {
            variant: self.variant,
        }
    }

    fn arity(&self) -> Arity {
        Arity::new(self.variant.width(), 0)
    }

    fn recompute(&mut self, inputs: &[LogicValue]) -> Vec<LogicValue> {
        self.reading = pack(inputs);
        Vec::new()
    }

    fn drawn_state(&self) -> DrawnState {
        match self.variant {
            DisplayVariant::SevenSegment => DrawnState::Segments(self.reading),
            DisplayVariant::Hex => DrawnState::Digit(self.reading),
            DisplayVariant::Byte => DrawnState::Byte(self.reading),
        }
    }
}
