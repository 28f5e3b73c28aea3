// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod console;
pub mod echo;

pub use console::ConsoleModel;
pub use echo::EchoModel;

use crate::signals::{DigitalLevel, SerialPorts};

/// A clocked hardware model exposing a serial source/sink port pair.
///
/// The simulation loop drives the clock with `set_clock` and then calls
/// `eval`; sequential logic updates on the rising edge.
pub trait HardwareModel: std::fmt::Debug {
    fn name(&self) -> &str;
    fn set_clock(&mut self, level: DigitalLevel);
    fn eval(&mut self);
    fn finalize(&mut self) {}
    fn ports(&self) -> &dyn SerialPorts;
    fn ports_mut(&mut self) -> &mut dyn SerialPorts;
    fn snapshot(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

/// Detects a low-to-high transition between two `eval` calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct EdgeDetector {
    current: DigitalLevel,
    evaluated: DigitalLevel,
}

impl EdgeDetector {
    pub fn set(&mut self, level: DigitalLevel) {
        self.current = level;
    }

    pub fn level(&self) -> DigitalLevel {
        self.current
    }

    /// True exactly once per rising edge.
    pub fn take_rising(&mut self) -> bool {
        let rising = !self.evaluated.is_high() && self.current.is_high();
        self.evaluated = self.current;
        rising
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_detector() {
        let mut edge = EdgeDetector::default();
        assert!(!edge.take_rising());

        edge.set(DigitalLevel::High);
        assert!(edge.take_rising());
        // Re-evaluating without a new edge does nothing.
        assert!(!edge.take_rising());

        edge.set(DigitalLevel::Low);
        assert!(!edge.take_rising());
        edge.set(DigitalLevel::High);
        assert!(edge.take_rising());
    }
}
