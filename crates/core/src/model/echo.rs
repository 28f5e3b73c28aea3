// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::{EdgeDetector, HardwareModel};
use crate::signals::{DigitalLevel, SerialPorts, SerialSignals};

/// Registered loopback: a byte accepted on the sink appears on the source one
/// clock later. Holds a single byte, so `sink.ready` is low while it is occupied.
#[derive(Debug)]
pub struct EchoModel {
    signals: SerialSignals,
    clk: EdgeDetector,
    echoed: u64,
}

impl Default for EchoModel {
    fn default() -> Self {
        Self::new()
    }
}

impl EchoModel {
    pub fn new() -> Self {
        let mut signals = SerialSignals::default();
        signals.sink.ready = true;
        Self {
            signals,
            clk: EdgeDetector::default(),
            echoed: 0,
        }
    }

    pub fn echoed(&self) -> u64 {
        self.echoed
    }
}

impl HardwareModel for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    fn set_clock(&mut self, level: DigitalLevel) {
        self.clk.set(level);
    }

    fn eval(&mut self) {
        if !self.clk.take_rising() {
            return;
        }

        let sig = &mut self.signals;
        if sig.source.fires() {
            sig.source.valid = false;
            self.echoed += 1;
        }
        if sig.sink.fires() {
            sig.source.valid = true;
            sig.source.data = sig.sink.data;
        }
        sig.sink.ready = !sig.source.valid;
    }

    fn ports(&self) -> &dyn SerialPorts {
        &self.signals
    }

    fn ports_mut(&mut self) -> &mut dyn SerialPorts {
        &mut self.signals
    }

    fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "echoed": self.echoed,
            "holding": self.signals.source.valid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(model: &mut EchoModel) {
        model.set_clock(DigitalLevel::High);
        model.eval();
        model.set_clock(DigitalLevel::Low);
        model.eval();
    }

    #[test]
    fn test_echo_one_cycle_latency() {
        let mut model = EchoModel::new();
        assert!(model.ports().read_sink_ready());

        model.ports_mut().write_sink(Some(b'q'));
        clock(&mut model);
        assert_eq!(model.ports().read_source(), Some(b'q'));
        assert!(!model.ports().read_sink_ready());

        // Without source.ready the byte is held.
        model.ports_mut().write_sink(None);
        clock(&mut model);
        assert_eq!(model.ports().read_source(), Some(b'q'));

        model.ports_mut().write_source_ready(true);
        clock(&mut model);
        assert_eq!(model.ports().read_source(), None);
        assert!(model.ports().read_sink_ready());
        assert_eq!(model.echoed(), 1);
    }

    #[test]
    fn test_no_update_without_rising_edge() {
        let mut model = EchoModel::new();
        model.ports_mut().write_sink(Some(1));
        model.set_clock(DigitalLevel::Low);
        model.eval();
        model.eval();
        assert_eq!(model.ports().read_source(), None);
    }
}
