// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod memory;
pub mod pty;

use crate::bridge::HandshakeBridge;
use serde::Serialize;
use std::io;

/// A non-blocking external byte stream.
pub trait StreamEndpoint: std::fmt::Debug {
    /// Attempt to read a single byte. Returns `Ok(None)` when nothing is available.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
    /// Write as much of `bytes` as the endpoint accepts right now.
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<usize>;
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdapterStats {
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub short_writes: u64,
    pub bytes_dropped: u64,
}

/// Moves bytes between a `StreamEndpoint` and a `HandshakeBridge`, once per cycle.
///
/// Bytes the endpoint did not accept in one write stay pending and are sent
/// ahead of newer traffic on the next pump.
#[derive(Debug)]
pub struct StreamEndpointAdapter<E: StreamEndpoint> {
    endpoint: E,
    pending: Vec<u8>,
    stats: AdapterStats,
}

impl<E: StreamEndpoint> StreamEndpointAdapter<E> {
    pub fn new(endpoint: E) -> Self {
        Self {
            endpoint,
            pending: Vec::new(),
            stats: AdapterStats::default(),
        }
    }

    pub fn pump(&mut self, bridge: &mut HandshakeBridge) {
        match self.endpoint.read_byte() {
            Ok(Some(byte)) => {
                bridge.enqueue_outbound(byte);
                self.stats.bytes_read += 1;
            }
            Ok(None) => {}
            Err(e) => tracing::debug!("Endpoint read failed: {}", e),
        }

        self.pending.extend(bridge.drain_inbound());
        if self.pending.is_empty() {
            return;
        }

        match self.endpoint.write_bytes(&self.pending) {
            Ok(written) => {
                if written < self.pending.len() {
                    self.stats.short_writes += 1;
                    tracing::trace!(
                        "Short write: {} of {} bytes accepted",
                        written,
                        self.pending.len()
                    );
                }
                self.pending.drain(..written);
                self.stats.bytes_written += written as u64;
            }
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) => {}
            Err(e) => {
                tracing::warn!(
                    "Endpoint write failed, dropping {} bytes: {}",
                    self.pending.len(),
                    e
                );
                self.stats.bytes_dropped += self.pending.len() as u64;
                self.pending.clear();
            }
        }
    }

    pub fn close(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            tracing::debug!("{} bytes still pending at close", self.pending.len());
        }
        self.endpoint.close()
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn stats(&self) -> AdapterStats {
        self.stats
    }
}
