// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Character I/O for code running on the simulated target.
//!
//! Instead of process-wide stdin/stdout/stderr bound to a UART, firmware gets
//! an explicit `UartStdio` handle and passes it to whatever needs console I/O.

use std::fmt;

/// Register-level access to a UART, as seen from the firmware side.
pub trait UartDriver {
    fn init(&mut self);
    fn write_byte(&mut self, byte: u8);
    /// Next received byte, if any. Never waits.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Console handle over a `UartDriver`.
#[derive(Debug, Default)]
pub struct UartStdio<D: UartDriver> {
    driver: D,
}

impl<D: UartDriver> UartStdio<D> {
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    pub fn init(&mut self) {
        self.driver.init();
    }

    /// Writes one character. A line feed is followed by a carriage return so
    /// raw terminals return to column zero.
    pub fn putc(&mut self, c: u8) -> u8 {
        self.driver.write_byte(c);
        if c == b'\n' {
            self.driver.write_byte(b'\r');
        }
        c
    }

    pub fn getc(&mut self) -> Option<u8> {
        self.driver.read_byte()
    }

    pub fn puts(&mut self, s: &str) {
        for b in s.bytes() {
            self.putc(b);
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

impl<D: UartDriver> fmt::Write for UartStdio<D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.puts(s);
        Ok(())
    }
}
