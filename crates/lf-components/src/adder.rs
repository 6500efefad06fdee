//! Arithmetic cells.

use lf_core::LogicValue;

use crate::spec::ComponentSpec;
use crate::traits::{Arity, LogicComponent};

/// `(a, b) -> (sum, carry)`. Any undefined input makes both outputs `Unknown`.
#[derive(Debug, Clone, Default)]
pub struct HalfAdder;

impl LogicComponent for HalfAdder {
    fn kind(&self) -> &'static str {
        "HalfAdder"
    }

    fn spec(&self) -> ComponentSpec {
        ComponentSpec::HalfAdder
    }

    fn arity(&self) -> Arity {
        Arity::new(2, 2)
    }

    fn recompute(&mut self, inputs: &[LogicValue]) -> Vec<LogicValue> {
        match defined(inputs) {
            Some(bits) if bits.len() == 2 => {
                let (a, b) = (bits[0], bits[1]);
                vec![LogicValue::from(a ^ b), LogicValue::from(a && b)]
            }
            _ => vec![LogicValue::Unknown; 2],
        }
    }
}

/// `(a, b, carry_in) -> (sum, carry_out)`, same undefined-input rule as [`HalfAdder`].
#[derive(Debug, Clone, Default)]
pub struct FullAdder;

impl LogicComponent for FullAdder {
    fn kind(&self) -> &'static str {
        "FullAdder"
    }

    fn spec(&self) -> ComponentSpec {
        ComponentSpec::FullAdder
    }

    fn arity(&self) -> Arity {
        Arity::new(3, 2)
    }

    fn recompute(&mut self, inputs: &[LogicValue]) -> Vec<LogicValue> {
        match defined(inputs) {
            Some(bits) if bits.len() == 3 => {
                let total = bits.iter().filter(|b| **b).count();
                vec![LogicValue::from(total % 2 == 1), LogicValue::from(total >= 2)]
            }
            _ => vec![LogicValue::Unknown; 2],
        }
    }
}

fn defined(inputs: &[LogicValue]) -> Option<Vec<bool>> {
    inputs.iter().map(|v| v.as_bool()).collect()
}
