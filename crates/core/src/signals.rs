// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use serde::Serialize;

/// Represents a digital signal level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitalLevel {
    #[default]
    Low,
    High,
}

impl DigitalLevel {
    pub fn toggled(self) -> Self {
        match self {
            DigitalLevel::Low => DigitalLevel::High,
            DigitalLevel::High => DigitalLevel::Low,
        }
    }

    pub fn is_high(self) -> bool {
        self == DigitalLevel::High
    }
}

impl From<bool> for DigitalLevel {
    fn from(b: bool) -> Self {
        if b {
            DigitalLevel::High
        } else {
            DigitalLevel::Low
        }
    }
}

impl From<DigitalLevel> for bool {
    fn from(level: DigitalLevel) -> Self {
        match level {
            DigitalLevel::High => true,
            DigitalLevel::Low => false,
        }
    }
}

/// One direction of a valid/ready stream: two control wires and an 8-bit data lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StreamPort {
    pub valid: bool,
    pub ready: bool,
    pub data: u8,
}

impl StreamPort {
    /// True when both sides agree on a transfer in the current cycle.
    pub fn fires(&self) -> bool {
        self.valid && self.ready
    }
}

/// The serial port pair exposed by a UART hardware model.
///
/// `source` carries bytes out of the hardware towards the host,
/// `sink` carries bytes from the host into the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SerialSignals {
    pub source: StreamPort,
    pub sink: StreamPort,
}

/// Live accessors into a hardware model's serial ports.
///
/// The host side of the handshake is only allowed to drive `source.ready`,
/// `sink.valid` and `sink.data`; everything else is owned by the hardware.
pub trait SerialPorts {
    /// Data currently presented on the source lane, if `source.valid` is set.
    fn read_source(&self) -> Option<u8>;
    fn write_source_ready(&mut self, ready: bool);
    fn read_sink_ready(&self) -> bool;
    /// Drive the sink lane. `None` deasserts `sink.valid` and leaves the data lane alone.
    fn write_sink(&mut self, beat: Option<u8>);
    fn signals(&self) -> SerialSignals;
}

impl SerialPorts for SerialSignals {
    fn read_source(&self) -> Option<u8> {
        self.source.valid.then_some(self.source.data)
    }

    fn write_source_ready(&mut self, ready: bool) {
        self.source.ready = ready;
    }

    fn read_sink_ready(&self) -> bool {
        self.sink.ready
    }

    fn write_sink(&mut self, beat: Option<u8>) {
        match beat {
            Some(data) => {
                self.sink.valid = true;
                self.sink.data = data;
            }
            None => self.sink.valid = false,
        }
    }

    fn signals(&self) -> SerialSignals {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digital_level() {
        let level = DigitalLevel::default();
        assert_eq!(level, DigitalLevel::Low);
        assert_eq!(level.toggled(), DigitalLevel::High);
        assert_eq!(level.toggled().toggled(), DigitalLevel::Low);

        let b: bool = DigitalLevel::High.into();
        assert!(b);
        assert_eq!(DigitalLevel::from(false), DigitalLevel::Low);
    }

    #[test]
    fn test_serial_signals_accessors() {
        let mut sig = SerialSignals::default();
        assert_eq!(sig.read_source(), None);

        sig.source.valid = true;
        sig.source.data = 0x5A;
        assert_eq!(sig.read_source(), Some(0x5A));

        sig.write_sink(Some(0x41));
        assert!(sig.sink.valid);
        assert_eq!(sig.sink.data, 0x41);

        sig.write_sink(None);
        assert!(!sig.sink.valid);
        // Data lane keeps its last value once valid drops.
        assert_eq!(sig.sink.data, 0x41);
    }
}
