// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod bridge;
pub mod endpoint;
pub mod firmware;
pub mod model;
pub mod signals;
pub mod sim;
pub mod trace;

pub use bridge::{BridgeStats, HandshakeBridge};
pub use endpoint::{StreamEndpoint, StreamEndpointAdapter};
pub use model::HardwareModel;
pub use signals::{DigitalLevel, SerialPorts, SerialSignals, StreamPort};
pub use sim::{ClockedSimulationLoop, LoopConfig, LoopState, RunSummary};
pub use trace::{NullTrace, TraceSink};

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("Endpoint setup failed: {0}")]
    Endpoint(#[from] endpoint::pty::EndpointError),
    #[error("Trace sink failed at time {time}: {source}")]
    Trace {
        time: u64,
        #[source]
        source: std::io::Error,
    },
    #[error("Finalization failed while {stage}: {source}")]
    Finalize {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },
}

pub type SimResult<T> = Result<T, SimulationError>;
