//! Externally driven sources and sinks: switches, clocks and probes.

use lf_core::LogicValue;

use crate::spec::ComponentSpec;
use crate::traits::{Arity, DrawnState, LogicComponent};

/// Manual input switch.
///
/// When open, the switch drives `False`, or leaves its line floating
/// (`HighZ`) if built with `high_z_off`.
#[derive(Debug, Clone)]
pub struct Switch {
    on: bool,
    high_z_off: bool,
}

impl Switch {
    pub fn new(on: bool) -> Self {
        Self {
            on,
            high_z_off: false,
        }
    }

    pub fn with_high_z_off(mut self, high_z_off: bool) -> Self {
        self.high_z_off = high_z_off;
        self
    }

    pub fn level(&self) -> LogicValue {
        match (self.on, self.high_z_off) {
            (true, _) => LogicValue::True,
            (false, true) => LogicValue::HighZ,
            (false, false) => LogicValue::False,
        }
    }
}

impl LogicComponent for Switch {
    fn kind(&self) -> &'static str {
        "Switch"
    }

    fn spec(&self) -> ComponentSpec {
        ComponentSpec::Switch {
            on: self.on,
            high_z_off: self.high_z_off,
        }
    }

    fn arity(&self) -> Arity {
        Arity::new(0, 1)
    }

    fn recompute(&mut self, _inputs: &[LogicValue]) -> Vec<LogicValue> {
        vec![self.level()]
    }

    fn drawn_state(&self) -> DrawnState {
        DrawnState::Level(self.level())
    }

    fn set_level(&mut self, level: bool) -> bool {
        let changed = self.on != level;
        self.on = level;
        changed
    }

    fn toggle(&mut self) -> bool {
        self.on = !self.on;
        true
    }
}

/// Square-wave source that flips every `period` ticks.
///
/// A period of zero disables tick-driven flipping; the clock then only moves
/// through `toggle`/`set_level`.
#[derive(Debug, Clone)]
pub struct Clock {
    period: u32,
    level: bool,
}

impl Clock {
    pub fn new(period: u32, level: bool) -> Self {
        Self { period, level }
    }

    pub fn level(&self) -> bool {
        self.level
    }
}

impl LogicComponent for Clock {
    fn kind(&self) -> &'static str {
        "Clock"
    }

    fn spec(&self) -> ComponentSpec {
        ComponentSpec::Clock {
            period: self.period,
            level: self.level,
        }
    }

    fn arity(&self) -> Arity {
        Arity::new(0, 1)
    }

    fn recompute(&mut self, _inputs: &[LogicValue]) -> Vec<LogicValue> {
        vec![LogicValue::from(self.level)]
    }

    fn drawn_state(&self) -> DrawnState {
        DrawnState::Level(LogicValue::from(self.level))
    }

    fn on_tick(&mut self, tick: u64) -> bool {
        if self.period == 0 || tick % u64::from(self.period) != 0 {
            return false;
        }
        self.level = !self.level;
        true
    }

    fn set_level(&mut self, level: bool) -> bool {
        let changed = self.level != level;
        self.level = level;
        changed
    }

    fn toggle(&mut self) -> bool {
        self.level = !self.level;
        true
    }
}

/// Output sink: remembers the level on its single input.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    seen: LogicValue,
}

impl Probe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> LogicValue {
        self.seen
    }
}

impl LogicComponent for Probe {
    fn kind(&self) -> &'static str {
        "Probe"
    }

    fn spec(&self) -> ComponentSpec {
        ComponentSpec::Probe
    }

    fn arity(&self) -> Arity {
        Arity::new(1, 0)
    }

    fn recompute(&mut self, inputs: &[LogicValue]) -> Vec<LogicValue> {
        self.seen = inputs.first().copied().unwrap_or_default();
        Vec::new()
    }

    fn drawn_state(&self) -> DrawnState {
        DrawnState::Level(self.seen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_core::LogicValue::{False as F, HighZ as Z, True as T};

    #[test]
    fn switch_levels() {
        let mut sw = Switch::new(false);
        assert_eq!(sw.recompute(&[]), vec![F]);
        assert!(sw.set_level(true));
        assert!(!sw.set_level(true));
        assert_eq!(sw.recompute(&[]), vec![T]);

        let mut floating = Switch::new(false).with_high_z_off(true);
        assert_eq!(floating.recompute(&[]), vec![Z]);
        floating.toggle();
        assert_eq!(floating.drawn_state(), DrawnState::Level(T));
    }

    #[test]
    fn clock_flips_on_period() {
        let mut clk = Clock::new(2, false);
        assert!(!clk.on_tick(1));
        assert!(clk.on_tick(2));
        assert!(clk.level());
        assert!(!clk.on_tick(3));
        assert!(clk.on_tick(4));
        assert!(!clk.level());
    }

    #[test]
    fn stopped_clock_only_toggles_manually() {
        let mut clk = Clock::new(0, false);
        assert!(!clk.on_tick(1));
        assert!(clk.toggle());
        assert_eq!(clk.recompute(&[]), vec![T]);
    }

    #[test]
    fn probe_records_input() {
        let mut probe = Probe::new();
        assert!(probe.recompute(&[Z]).is_empty());
        assert_eq!(probe.seen(), Z);
    }
}
