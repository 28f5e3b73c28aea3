// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::signals::{DigitalLevel, SerialSignals};
use std::io;

/// Receives a snapshot of the traced signals after every evaluated time step.
///
/// Dumps arrive with strictly increasing `time`.
pub trait TraceSink: std::fmt::Debug {
    fn open(&mut self) -> io::Result<()> {
        Ok(())
    }
    fn dump(
        &mut self,
        time: u64,
        clock: DigitalLevel,
        signals: &SerialSignals,
    ) -> io::Result<()>;
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Discards every dump. Used when tracing is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn dump(
        &mut self,
        _time: u64,
        _clock: DigitalLevel,
        _signals: &SerialSignals,
    ) -> io::Result<()> {
        Ok(())
    }
}
