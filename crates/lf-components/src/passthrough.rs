//! Bus re-routing without logic.

use lf_core::LogicValue;

use crate::error::{ComponentError, ComponentResult};
use crate::spec::ComponentSpec;
use crate::traits::{Arity, LogicComponent, MAX_PINS};

/// Identity per bit, `HighZ` included. Input pin `i` feeds output pin `i`.
#[derive(Debug, Clone)]
pub struct Passthrough {
    width: usize,
}

impl Passthrough {
    pub fn new(width: usize) -> ComponentResult<Self> {
        if width == 0 {
            return Err(ComponentError::InvalidParam {
                kind: "Passthrough",
                what: "width must be positive",
            });
        }
        if width > MAX_PINS {
            return Err(ComponentError::InvalidParam {
                kind: "Passthrough",
                what: "width above 256 bits",
            });
        }
        Ok(Self { width })
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

impl LogicComponent for Passthrough {
    fn kind(&self) -> &'static str {
        "Passthrough"
    }

    fn spec(&self) -> ComponentSpec {
        ComponentSpec::Passthrough { width: self.width }
    }

    fn arity(&self) -> Arity {
        Arity::new(self.width, self.width)
    }

    fn recompute(&mut self, inputs: &[LogicValue]) -> Vec<LogicValue> {
        let mut out = inputs.to_vec();
        out.resize(self.width, LogicValue::Unknown);
        out
    }
}
