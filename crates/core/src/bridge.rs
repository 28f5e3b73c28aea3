// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::signals::SerialPorts;
use serde::Serialize;
use std::collections::VecDeque;

/// Cumulative transfer counters for a bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BridgeStats {
    pub ticks: u64,
    /// Bytes committed into the hardware sink.
    pub to_hardware: u64,
    /// Bytes captured from the hardware source.
    pub from_hardware: u64,
}

/// Host side of a valid/ready serial link.
///
/// Each `tick` performs at most one transfer per direction against the live
/// ports of the hardware model. Both queues are unbounded: the host never
/// pushes back on the hardware source, and nothing limits how much the
/// external endpoint may queue for the sink.
#[derive(Debug, Default)]
pub struct HandshakeBridge {
    outbound: VecDeque<u8>,
    inbound: VecDeque<u8>,
    stats: BridgeStats,
}

impl HandshakeBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, ports: &mut dyn SerialPorts) {
        self.stats.ticks += 1;

        ports.write_source_ready(true);
        if let Some(byte) = ports.read_source() {
            self.inbound.push_back(byte);
            self.stats.from_hardware += 1;
        }

        ports.write_sink(None);
        if ports.read_sink_ready() {
            // Valid and ready are both high this cycle, so the byte is committed now.
            if let Some(byte) = self.outbound.pop_front() {
                ports.write_sink(Some(byte));
                self.stats.to_hardware += 1;
            }
        }
    }

    pub fn enqueue_outbound(&mut self, byte: u8) {
        self.outbound.push_back(byte);
    }

    pub fn enqueue_outbound_bytes(&mut self, bytes: &[u8]) {
        self.outbound.extend(bytes.iter().copied());
    }

    /// Removes and returns every byte captured from the hardware so far.
    pub fn drain_inbound(&mut self) -> Vec<u8> {
        self.inbound.drain(..).collect()
    }

    pub fn outbound_len(&self) -> usize {
        self.outbound.len()
    }

    pub fn inbound_len(&self) -> usize {
        self.inbound.len()
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats
    }
}
