// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::StreamEndpoint;
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// In-process endpoint backed by shared buffers.
///
/// Clones share the same buffers, so a test can keep one handle while the
/// adapter owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryEndpoint {
    input: Arc<Mutex<VecDeque<u8>>>,
    output: Arc<Mutex<Vec<u8>>>,
    read_attempts: Arc<AtomicU64>,
    closed: Arc<AtomicBool>,
    write_limit: Option<usize>,
    write_error: Arc<Mutex<Option<io::ErrorKind>>>,
}

impl MemoryEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept at most `limit` bytes per write; `0` makes every write would-block.
    pub fn with_write_limit(mut self, limit: usize) -> Self {
        self.write_limit = Some(limit);
        self
    }

    /// Fail every write with `kind` until cleared with `None`.
    pub fn set_write_error(&self, kind: Option<io::ErrorKind>) {
        if let Ok(mut err) = self.write_error.lock() {
            *err = kind;
        }
    }

    /// Queue bytes as if typed by the external peer.
    pub fn push_input(&self, bytes: &[u8]) {
        if let Ok(mut input) = self.input.lock() {
            input.extend(bytes.iter().copied());
        }
    }

    pub fn output(&self) -> Vec<u8> {
        self.output
            .lock()
            .map(|out| out.clone())
            .unwrap_or_default()
    }

    pub fn take_output(&self) -> Vec<u8> {
        self.output
            .lock()
            .map(|mut out| std::mem::take(&mut *out))
            .unwrap_or_default()
    }

    pub fn read_attempts(&self) -> u64 {
        self.read_attempts.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

impl StreamEndpoint for MemoryEndpoint {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.read_attempts.fetch_add(1, Ordering::Relaxed);
        let mut input = self
            .input
            .lock()
            .map_err(|_| io::Error::other("input buffer poisoned"))?;
        Ok(input.pop_front())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<usize> {
        if let Some(kind) = self.write_error.lock().ok().and_then(|err| *err) {
            return Err(kind.into());
        }
        let accepted = self.write_limit.map_or(bytes.len(), |l| l.min(bytes.len()));
        if accepted == 0 && !bytes.is_empty() {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        let mut output = self
            .output
            .lock()
            .map_err(|_| io::Error::other("output buffer poisoned"))?;
        output.extend_from_slice(&bytes[..accepted]);
        Ok(accepted)
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}
