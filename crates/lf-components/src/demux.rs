//! Demultiplexer and multiplexer.
//!
//! Both take their data pins first and the selector bus last, least
//! significant selector bit first. A selector bit that is `Unknown` or
//! `HighZ` makes the selection ambiguous, which turns every output `Unknown`.

use lf_core::{HighZPolicy, LogicValue};

use crate::error::{ComponentError, ComponentResult};
use crate::spec::ComponentSpec;
use crate::traits::{Arity, LogicComponent, MAX_PINS};

/// Number of selector bits needed to address `groups` groups: `ceil(log2(groups))`.
pub fn select_bits(groups: usize) -> usize {
    if groups <= 1 {
        0
    } else {
        (usize::BITS - (groups - 1).leading_zeros()) as usize
    }
}

/// Decode an LSB-first selector bus, `None` if any bit is undefined.
pub fn decode_select(bits: &[LogicValue]) -> Option<usize> {
    bits.iter().enumerate().try_fold(0usize, |acc, (i, bit)| {
        bit.as_bool().map(|b| if b { acc | (1 << i) } else { acc })
    })
}

fn check_widths(kind: &'static str, from: usize, to: usize) -> ComponentResult<()> {
    if from == 0 || to == 0 {
        return Err(ComponentError::InvalidParam {
            kind,
            what: "bus widths must be positive",
        });
    }
    if from > MAX_PINS || to > MAX_PINS {
        return Err(ComponentError::InvalidParam {
            kind,
            what: "bus wider than 256 bits",
        });
    }
    Ok(())
}

/// Routes a `from`-bit input onto one of `ceil(to / from)` output groups.
#[derive(Debug, Clone)]
pub struct Demux {
    from: usize,
    to: usize,
    high_z_idle: bool,
}

impl Demux {
    pub fn new(from: usize, to: usize) -> ComponentResult<Self> {
        check_widths("Demux", from, to)?;
        Ok(Self {
            from,
            to,
            high_z_idle: false,
        })
    }

    /// Drive non-selected groups to `HighZ` instead of `False`. Data bits are
    /// then forwarded unresolved so tri-state levels survive the routing.
    pub fn with_high_z_idle(mut self, high_z_idle: bool) -> Self {
        self.high_z_idle = high_z_idle;
        self
    }

    pub fn groups(&self) -> usize {
        self.to.div_ceil(self.from)
    }

    pub fn select_width(&self) -> usize {
        select_bits(self.groups())
    }
}

impl LogicComponent for Demux {
    fn kind(&self) -> &'static str {
        "Demux"
    }

    fn spec(&self) -> ComponentSpec {
        ComponentSpec::Demux {
            from: self.from,
            to: self.to,
            high_z_idle: self.high_z_idle,
        }
    }

    fn arity(&self) -> Arity {
        Arity::new(self.from + self.select_width(), self.to)
    }

    fn recompute(&mut self, inputs: &[LogicValue]) -> Vec<LogicValue> {
        let (data, select) = inputs.split_at(self.from.min(inputs.len()));
        let Some(selected) = decode_select(select) else {
            return vec![LogicValue::Unknown; self.to];
        };
        let idle = if self.high_z_idle {
            LogicValue::HighZ
        } else {
            LogicValue::False
        };
        (0..self.to)
            .map(|i| {
                if i / self.from != selected {
                    return idle;
                }
                let bit = data.get(i % self.from).copied().unwrap_or_default();
                if self.high_z_idle {
                    bit
                } else {
                    bit.resolve(HighZPolicy::Unknown)
                }
            })
            .collect()
    }
}

/// Selects one `to`-bit group out of a `from`-bit input.
#[derive(Debug, Clone)]
pub struct Mux {
    from: usize,
    to: usize,
}

impl Mux {
    pub fn new(from: usize, to: usize) -> ComponentResult<Self> {
        check_widths("Mux", from, to)?;
        Ok(Self { from, to })
    }

    pub fn groups(&self) -> usize {
        self.from.div_ceil(self.to)
    }

    pub fn select_width(&self) -> usize {
        select_bits(self.groups())
    }
}

impl LogicComponent for Mux {
    fn kind(&self) -> &'static str {
        "Mux"
    }

    fn spec(&self) -> ComponentSpec {
        ComponentSpec::Mux {
            from: self.from,
            to: self.to,
        }
    }

    fn arity(&self) -> Arity {
        Arity::new(self.from + self.select_width(), self.to)
    }

    fn recompute(&mut self, inputs: &[LogicValue]) -> Vec<LogicValue> {
        let (data, select) = inputs.split_at(self.from.min(inputs.len()));
        let Some(selected) = decode_select(select) else {
            return vec![LogicValue::Unknown; self.to];
        };
        (0..self.to)
            .map(|j| match data.get(selected * self.to + j) {
                Some(bit) => bit.resolve(HighZPolicy::Unknown),
                None => LogicValue::False,
            })
            .collect()
    }
}
