// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::{EdgeDetector, HardwareModel};
use crate::firmware::{UartDriver, UartStdio};
use crate::signals::{DigitalLevel, SerialPorts, SerialSignals};
use std::collections::VecDeque;

pub const RX_FIFO_DEPTH: usize = 16;
pub const PROMPT: &str = "> ";

/// UART peripheral core: an RX FIFO fed by the sink port and a TX FIFO
/// drained through the source port.
#[derive(Debug, Default)]
pub struct UartCore {
    rx: VecDeque<u8>,
    tx: VecDeque<u8>,
    enabled: bool,
}

impl UartCore {
    /// Rising-edge sampling of the port pair.
    fn sample(&mut self, sig: &mut SerialSignals) {
        if sig.source.fires() {
            sig.source.valid = false;
        }
        if sig.sink.fires() {
            self.rx.push_back(sig.sink.data);
        }
    }

    /// Register outputs for the next cycle.
    fn drive(&mut self, sig: &mut SerialSignals) {
        if !sig.source.valid {
            if let Some(byte) = self.tx.pop_front() {
                sig.source.valid = true;
                sig.source.data = byte;
            }
        }
        sig.sink.ready = self.rx.len() < RX_FIFO_DEPTH;
    }

    pub fn rx_pending(&self) -> usize {
        self.rx.len()
    }

    pub fn tx_pending(&self) -> usize {
        self.tx.len()
    }
}

impl UartDriver for UartCore {
    fn init(&mut self) {
        self.rx.clear();
        self.tx.clear();
        self.enabled = true;
    }

    fn write_byte(&mut self, byte: u8) {
        if self.enabled {
            self.tx.push_back(byte);
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

/// Line-echo console program running on the simulated target.
#[derive(Debug)]
struct ConsoleFirmware {
    banner: String,
    booted: bool,
    lines: u64,
}

impl ConsoleFirmware {
    fn step(&mut self, stdio: &mut UartStdio<UartCore>) {
        if !self.booted {
            stdio.init();
            stdio.puts(&self.banner);
            stdio.putc(b'\n');
            stdio.puts(PROMPT);
            self.booted = true;
            return;
        }

        while let Some(c) = stdio.getc() {
            match c {
                b'\r' | b'\n' => {
                    stdio.putc(b'\n');
                    stdio.puts(PROMPT);
                    self.lines += 1;
                }
                _ => {
                    stdio.putc(c);
                }
            }
        }
    }
}

/// UART peripheral with a small firmware routine behind it.
///
/// On the first clock the firmware prints a banner and a prompt, then echoes
/// everything it receives and starts a new prompt on every line ending.
#[derive(Debug)]
pub struct ConsoleModel {
    signals: SerialSignals,
    clk: EdgeDetector,
    stdio: UartStdio<UartCore>,
    firmware: ConsoleFirmware,
}

impl ConsoleModel {
    pub fn new(banner: impl Into<String>) -> Self {
        Self {
            signals: SerialSignals::default(),
            clk: EdgeDetector::default(),
            stdio: UartStdio::new(UartCore::default()),
            firmware: ConsoleFirmware {
                banner: banner.into(),
                booted: false,
                lines: 0,
            },
        }
    }

    pub fn lines(&self) -> u64 {
        self.firmware.lines
    }

    pub fn uart(&self) -> &UartCore {
        self.stdio.driver()
    }
}

impl HardwareModel for ConsoleModel {
    fn name(&self) -> &str {
        "console"
    }

    fn set_clock(&mut self, level: DigitalLevel) {
        self.clk.set(level);
    }

    fn eval(&mut self) {
        if !self.clk.take_rising() {
            return;
        }
        self.stdio.driver_mut().sample(&mut self.signals);
        self.firmware.step(&mut self.stdio);
        self.stdio.driver_mut().drive(&mut self.signals);
    }

    fn finalize(&mut self) {
        let uart = self.stdio.driver();
        if uart.tx_pending() > 0 || uart.rx_pending() > 0 {
            tracing::debug!(
                "Console finished with {} TX / {} RX bytes in FIFOs",
                uart.tx_pending(),
                uart.rx_pending()
            );
        }
    }

    fn ports(&self) -> &dyn SerialPorts {
        &self.signals
    }

    fn ports_mut(&mut self) -> &mut dyn SerialPorts {
        &mut self.signals
    }

    fn snapshot(&self) -> serde_json::Value {
        let uart = self.stdio.driver();
        serde_json::json!({
            "booted": self.firmware.booted,
            "lines": self.firmware.lines,
            "rx_pending": uart.rx_pending(),
            "tx_pending": uart.tx_pending(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(model: &mut ConsoleModel) {
        model.set_clock(DigitalLevel::High);
        model.eval();
        model.set_clock(DigitalLevel::Low);
        model.eval();
    }

    /// Drain the source port as an always-ready host would.
    fn collect(model: &mut ConsoleModel, cycles: usize) -> Vec<u8> {
        let mut out = Vec::new();
        for _ in 0..cycles {
            model.ports_mut().write_source_ready(true);
            if let Some(b) = model.ports().read_source() {
                out.push(b);
            }
            clock(model);
        }
        out
    }

    #[test]
    fn test_banner_on_boot() {
        let mut model = ConsoleModel::new("hello");
        let out = collect(&mut model, 32);
        assert_eq!(out, b"hello\n\r> ".to_vec());
        assert_eq!(model.uart().tx_pending(), 0);
    }

    #[test]
    fn test_echo_and_new_prompt() {
        let mut model = ConsoleModel::new("");
        collect(&mut model, 16);

        // Hold the echo on the source port while typing.
        model.ports_mut().write_source_ready(false);
        for &b in b"ab\r" {
            assert!(model.ports().read_sink_ready());
            model.ports_mut().write_sink(Some(b));
            clock(&mut model);
        }
        model.ports_mut().write_sink(None);

        let out = collect(&mut model, 32);
        assert_eq!(out, b"ab\n\r> ".to_vec());
        assert_eq!(model.lines(), 1);
    }

    #[test]
    fn test_sink_ready_tracks_rx_fifo() {
        let mut core = UartCore::default();
        let mut sig = SerialSignals::default();
        core.init();
        for i in 0..RX_FIFO_DEPTH {
            sig.sink.valid = true;
            sig.sink.ready = true;
            sig.sink.data = i as u8;
            core.sample(&mut sig);
        }
        core.drive(&mut sig);
        assert!(!sig.sink.ready);

        core.read_byte();
        core.drive(&mut sig);
        assert!(sig.sink.ready);
    }
}
