// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use simuart_core::{DigitalLevel, SerialSignals, StreamPort, TraceSink};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use vcd::{IdCode, TimescaleUnit, Value, Writer};

const DATA_WIDTH: u32 = 8;

struct PortIds {
    valid: IdCode,
    ready: IdCode,
    data: IdCode,
}

struct VcdIds {
    clk: IdCode,
    source: PortIds,
    sink: PortIds,
}

/// Value-change-dump trace of the clock and the serial port pair.
pub struct VcdTrace<W: Write> {
    writer: Option<Writer<W>>,
    ids: Option<VcdIds>,
    last: Option<(DigitalLevel, SerialSignals)>,
    last_time: u64,
}

impl VcdTrace<BufWriter<File>> {
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> VcdTrace<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: Some(Writer::new(out)),
            ids: None,
            last: None,
            last_time: 0,
        }
    }

    fn writer(&mut self) -> io::Result<&mut Writer<W>> {
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "trace closed"))
    }
}

fn add_port(writer: &mut Writer<impl Write>, prefix: &str) -> io::Result<PortIds> {
    Ok(PortIds {
        valid: writer.add_wire(1, &format!("{}_valid", prefix))?,
        ready: writer.add_wire(1, &format!("{}_ready", prefix))?,
        data: writer.add_wire(DATA_WIDTH, &format!("{}_data", prefix))?,
    })
}

// Helper to convert u64 to Vec<Value> (MSB first)
fn u64_to_vec(val: u64, width: u32) -> Vec<Value> {
    let mut bits = Vec::with_capacity(width as usize);
    for i in (0..width).rev() {
        let bit = (val >> i) & 1;
        bits.push(if bit == 1 { Value::V1 } else { Value::V0 });
    }
    bits
}

fn scalar(b: bool) -> Value {
    if b {
        Value::V1
    } else {
        Value::V0
    }
}

fn write_port(
    writer: &mut Writer<impl Write>,
    ids: &PortIds,
    port: &StreamPort,
    prev: Option<&StreamPort>,
) -> io::Result<()> {
    if prev.map_or(true, |p| p.valid != port.valid) {
        writer.change_scalar(ids.valid, scalar(port.valid))?;
    }
    if prev.map_or(true, |p| p.ready != port.ready) {
        writer.change_scalar(ids.ready, scalar(port.ready))?;
    }
    if prev.map_or(true, |p| p.data != port.data) {
        writer.change_vector(ids.data, u64_to_vec(port.data as u64, DATA_WIDTH))?;
    }
    Ok(())
}

impl<W: Write> core::fmt::Debug for VcdTrace<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "VcdTrace(last_time={})", self.last_time)
    }
}

impl<W: Write> TraceSink for VcdTrace<W> {
    fn open(&mut self) -> io::Result<()> {
        let writer = self.writer()?;

        writer.timescale(1, TimescaleUnit::NS)?;
        writer.add_module("top")?;
        let clk = writer.add_wire(1, "clk")?;

        writer.add_module("serial")?;
        let source = add_port(writer, "source")?;
        let sink = add_port(writer, "sink")?;
        writer.upscope()?; // serial

        writer.upscope()?; // top
        writer.enddefinitions()?;

        // Initial values
        writer.timestamp(0)?;
        writer.change_scalar(clk, Value::V0)?;
        let idle = SerialSignals::default();
        write_port(writer, &source, &idle.source, None)?;
        write_port(writer, &sink, &idle.sink, None)?;

        self.ids = Some(VcdIds { clk, source, sink });
        self.last = Some((DigitalLevel::Low, idle));
        Ok(())
    }

    fn dump(
        &mut self,
        time: u64,
        clock: DigitalLevel,
        signals: &SerialSignals,
    ) -> io::Result<()> {
        if time <= self.last_time {
            tracing::debug!("Ignoring non-increasing trace time {}", time);
            return Ok(());
        }
        let (Some(writer), Some(ids)) = (self.writer.as_mut(), self.ids.as_ref()) else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "trace is not open",
            ));
        };
        let prev = self.last.as_ref();

        writer.timestamp(time)?;
        if prev.map_or(true, |(clk, _)| *clk != clock) {
            writer.change_scalar(ids.clk, scalar(clock.into()))?;
        }
        write_port(
            writer,
            &ids.source,
            &signals.source,
            prev.map(|(_, s)| &s.source),
        )?;
        write_port(writer, &ids.sink, &signals.sink, prev.map(|(_, s)| &s.sink))?;

        self.last = Some((clock, *signals));
        self.last_time = time;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.ids = None;
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}
