// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

mod vcd_trace;

use clap::Parser;
use simuart_config::{ModelKind, RunConfig};
use simuart_core::endpoint::pty::PtyEndpoint;
use simuart_core::model::{ConsoleModel, EchoModel};
use simuart_core::{
    ClockedSimulationLoop, HardwareModel, LoopConfig, NullTrace, RunSummary, StreamEndpoint,
    TraceSink,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{error, info};

use crate::vcd_trace::VcdTrace;

const EXIT_PASS: u8 = 0;
const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_RUNTIME_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "SimUart: clocked UART co-simulation over a pseudo-terminal",
    long_about = None
)]
struct Cli {
    /// Path to the run configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of simulated time steps to run (default: 100000)
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Hardware model behind the serial ports: echo or console
    #[arg(long, value_parser = ModelKind::from_str)]
    model: Option<ModelKind>,

    /// First line printed by the console model
    #[arg(long)]
    banner: Option<String>,

    /// Write the waveform trace to this VCD file (default: dump.vcd)
    #[arg(long)]
    vcd: Option<PathBuf>,

    /// Disable the waveform trace
    #[arg(long, conflicts_with = "vcd")]
    no_trace: bool,

    /// Log source/sink activity every clock period
    #[arg(long)]
    diagnostics: bool,

    /// Enable debug-level logging
    #[arg(short, long)]
    trace: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level based on --trace flag
    if cli.trace {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    run(&cli, &config)
}

fn resolve_config(cli: &Cli) -> anyhow::Result<RunConfig> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };

    if let Some(max_ticks) = cli.max_ticks {
        config.max_ticks = max_ticks;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(banner) = &cli.banner {
        config.banner = banner.clone();
    }
    if let Some(path) = &cli.vcd {
        config.trace.enabled = true;
        config.trace.path = path.clone();
    }
    if cli.no_trace {
        config.trace.enabled = false;
    }
    config.diagnostics |= cli.diagnostics;

    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli, config: &RunConfig) -> ExitCode {
    info!("Starting SimUart ({:?} model)", config.model);

    let trace: Box<dyn TraceSink> = if config.trace.enabled {
        match VcdTrace::create(&config.trace.path) {
            Ok(trace) => {
                info!("Writing trace to {:?}", config.trace.path);
                Box::new(trace)
            }
            Err(e) => {
                error!("Failed to create trace {:?}: {}", config.trace.path, e);
                return ExitCode::from(EXIT_RUNTIME_ERROR);
            }
        }
    } else {
        Box::new(NullTrace)
    };

    let endpoint = match PtyEndpoint::open() {
        Ok(endpoint) => endpoint,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    };
    if let Some(path) = endpoint.peer_path() {
        println!("Terminal opened at {}", path.display());
    }

    let loop_config = LoopConfig {
        max_ticks: config.max_ticks,
        diagnostics: config.diagnostics,
    };

    let result = match config.model {
        ModelKind::Echo => run_model(EchoModel::new(), endpoint, trace, loop_config),
        ModelKind::Console => run_model(
            ConsoleModel::new(config.banner.clone()),
            endpoint,
            trace,
            loop_config,
        ),
    };

    match result {
        Ok(summary) => {
            report_summary(&summary, cli.json);
            ExitCode::from(EXIT_PASS)
        }
        Err(e) => {
            error!("Simulation failed: {}", e);
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

fn run_model<M: HardwareModel, E: StreamEndpoint>(
    model: M,
    endpoint: E,
    trace: Box<dyn TraceSink>,
    config: LoopConfig,
) -> simuart_core::SimResult<RunSummary> {
    let mut sim = ClockedSimulationLoop::new(model, endpoint, trace, config)?;
    sim.run()
}

fn report_summary(summary: &RunSummary, json: bool) {
    info!("Simulation finished after {} ticks", summary.ticks);
    info!(
        "Bytes to hardware: {}, from hardware: {}",
        summary.bridge.to_hardware, summary.bridge.from_hardware
    );
    if summary.endpoint.short_writes > 0 || summary.endpoint.bytes_dropped > 0 {
        info!(
            "Endpoint short writes: {}, dropped bytes: {}",
            summary.endpoint.short_writes, summary.endpoint.bytes_dropped
        );
    }
    if summary.outbound_left > 0 || summary.inbound_left > 0 {
        info!(
            "Undelivered at stop: {} outbound, {} inbound",
            summary.outbound_left, summary.inbound_left
        );
    }

    if json {
        match serde_json::to_string(summary) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to serialize summary: {}", e),
        }
    }
}
