// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::bridge::{BridgeStats, HandshakeBridge};
use crate::endpoint::{AdapterStats, StreamEndpoint, StreamEndpointAdapter};
use crate::model::HardwareModel;
use crate::signals::DigitalLevel;
use crate::trace::TraceSink;
use crate::{SimResult, SimulationError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    Running,
    Finalizing,
    Stopped,
}

/// Simulated time and the generated clock. One time unit per half period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatedClock {
    level: DigitalLevel,
    time: u64,
}

impl SimulatedClock {
    /// Advance one time unit and toggle the clock, returning the new level.
    pub fn advance(&mut self) -> DigitalLevel {
        self.time += 1;
        self.level = self.level.toggled();
        self.level
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn level(&self) -> DigitalLevel {
        self.level
    }
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Number of time steps to simulate before finalizing.
    pub max_ticks: u64,
    /// Log source/sink activity on every full clock period.
    pub diagnostics: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_ticks: 100_000,
            diagnostics: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub status: LoopState,
    pub model: String,
    pub ticks: u64,
    pub clock_toggles: u64,
    pub bridge: BridgeStats,
    pub endpoint: AdapterStats,
    pub outbound_left: usize,
    pub inbound_left: usize,
    pub model_state: serde_json::Value,
}

/// Drives a hardware model, its serial bridge and the external endpoint in lockstep.
///
/// Each step advances time by one unit and toggles the clock. On the falling
/// edge the bridge performs its handshake, away from the rising edge where the
/// model samples its inputs. Then the model evaluates, the trace sink records
/// the step, and the endpoint is pumped.
pub struct ClockedSimulationLoop<M: HardwareModel, E: StreamEndpoint> {
    model: M,
    bridge: HandshakeBridge,
    adapter: StreamEndpointAdapter<E>,
    trace: Box<dyn TraceSink>,
    clock: SimulatedClock,
    config: LoopConfig,
    state: LoopState,
    clock_toggles: u64,
}

impl<M: HardwareModel, E: StreamEndpoint> std::fmt::Debug for ClockedSimulationLoop<M, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockedSimulationLoop")
            .field("model", &self.model.name())
            .field("clock", &self.clock)
            .field("state", &self.state)
            .finish()
    }
}

impl<M: HardwareModel, E: StreamEndpoint> ClockedSimulationLoop<M, E> {
    pub fn new(
        mut model: M,
        endpoint: E,
        mut trace: Box<dyn TraceSink>,
        config: LoopConfig,
    ) -> SimResult<Self> {
        trace
            .open()
            .map_err(|source| SimulationError::Trace { time: 0, source })?;

        let clock = SimulatedClock::default();
        model.set_clock(clock.level());

        Ok(Self {
            model,
            bridge: HandshakeBridge::new(),
            adapter: StreamEndpointAdapter::new(endpoint),
            trace,
            clock,
            config,
            state: LoopState::Running,
            clock_toggles: 0,
        })
    }

    /// Runs one time step. Returns `false` once the tick budget is spent.
    pub fn step(&mut self) -> SimResult<bool> {
        if self.state != LoopState::Running || self.clock.time() >= self.config.max_ticks {
            return Ok(false);
        }

        let level = self.clock.advance();
        self.clock_toggles += 1;
        self.model.set_clock(level);

        if level == DigitalLevel::Low {
            self.bridge.tick(self.model.ports_mut());
        }

        self.model.eval();

        let time = self.clock.time();
        let signals = self.model.ports().signals();
        self.trace
            .dump(time, level, &signals)
            .map_err(|source| SimulationError::Trace { time, source })?;

        self.adapter.pump(&mut self.bridge);

        if self.config.diagnostics
            && time % 2 == 0
            && (signals.source.valid || signals.sink.valid)
        {
            tracing::info!(
                "[{}] TX: {:#x} RX: {:#x}",
                time / 2,
                if signals.source.valid { signals.source.data } else { 0 },
                if signals.sink.valid { signals.sink.data } else { 0 }
            );
        }

        Ok(true)
    }

    /// Steps until the tick budget is spent, then finalizes.
    pub fn run(&mut self) -> SimResult<RunSummary> {
        tracing::debug!(
            "Running {} for {} ticks",
            self.model.name(),
            self.config.max_ticks
        );
        while self.step()? {}
        self.finalize()?;
        Ok(self.summary())
    }

    pub fn finalize(&mut self) -> SimResult<()> {
        if self.state == LoopState::Stopped {
            return Ok(());
        }
        self.state = LoopState::Finalizing;

        self.model.finalize();
        self.trace.close().map_err(|source| SimulationError::Finalize {
            stage: "closing trace",
            source,
        })?;
        self.adapter
            .close()
            .map_err(|source| SimulationError::Finalize {
                stage: "closing endpoint",
                source,
            })?;

        self.state = LoopState::Stopped;
        tracing::debug!("Simulation stopped at time {}", self.clock.time());
        Ok(())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            status: self.state,
            model: self.model.name().to_string(),
            ticks: self.clock.time(),
            clock_toggles: self.clock_toggles,
            bridge: self.bridge.stats(),
            endpoint: self.adapter.stats(),
            outbound_left: self.bridge.outbound_len(),
            inbound_left: self.bridge.inbound_len() + self.adapter.pending_len(),
            model_state: self.model.snapshot(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn clock(&self) -> SimulatedClock {
        self.clock
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn bridge(&self) -> &HandshakeBridge {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut HandshakeBridge {
        &mut self.bridge
    }

    pub fn adapter(&self) -> &StreamEndpointAdapter<E> {
        &self.adapter
    }
}
