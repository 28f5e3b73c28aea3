// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default schema version for YAML configs
fn default_schema_version() -> String {
    "1.0".to_string()
}

fn default_max_ticks() -> u64 {
    100_000
}

fn default_banner() -> String {
    "simuart console ready".to_string()
}

fn default_true() -> bool {
    true
}

fn default_trace_path() -> PathBuf {
    PathBuf::from("dump.vcd")
}

/// Which built-in hardware model sits behind the serial ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Registered sink-to-source loopback.
    #[serde(alias = "loopback")]
    Echo,
    /// UART peripheral with a line-echo console program.
    #[default]
    Console,
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "echo" | "loopback" => Ok(Self::Echo),
            "console" => Ok(Self::Console),
            _ => Err(format!(
                "unsupported model '{}'; supported: echo, console",
                value
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TraceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_trace_path")]
    pub path: PathBuf,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_trace_path(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Simulated time steps before the run is finalized.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    #[serde(default)]
    pub model: ModelKind,
    /// First line printed by the console model.
    #[serde(default = "default_banner")]
    pub banner: String,
    #[serde(default)]
    pub trace: TraceConfig,
    /// Log source/sink activity every clock period.
    #[serde(default)]
    pub diagnostics: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            max_ticks: default_max_ticks(),
            model: ModelKind::default(),
            banner: default_banner(),
            trace: TraceConfig::default(),
            diagnostics: false,
        }
    }
}

impl RunConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read run config at {:?}", path))?;
        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Invalid run config {:?}", path))?;
        tracing::debug!("Loaded run config from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(contents).context("Failed to parse Run Config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != "1.0" {
            anyhow::bail!(
                "Unsupported schema_version '{}'. Supported versions: '1.0'",
                self.schema_version
            );
        }

        if self.max_ticks == 0 {
            anyhow::bail!("'max_ticks' must be greater than zero");
        }

        if self.trace.enabled && self.trace.path.as_os_str().is_empty() {
            anyhow::bail!("'trace.path' cannot be empty while tracing is enabled");
        }

        Ok(())
    }
}
