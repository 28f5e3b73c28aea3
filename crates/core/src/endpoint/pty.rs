// SimUart - UART Co-Simulation Bridge
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! POSIX pseudo-terminal endpoint.
//!
//! The simulator keeps the master side. The slave path is reported so that a
//! terminal program (`screen`, `picocom`, ...) can attach to it.

use super::StreamEndpoint;
use std::ffi::CStr;
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("Opening pseudoterminal failed: {0}")]
    Open(#[source] io::Error),
    #[error("grantpt failed: {0}")]
    Grant(#[source] io::Error),
    #[error("unlockpt failed: {0}")]
    Unlock(#[source] io::Error),
    #[error("Getting file status flags on pseudoterminal failed: {0}")]
    GetFlags(#[source] io::Error),
    #[error("Setting file status flags on pseudoterminal failed: {0}")]
    SetFlags(#[source] io::Error),
    #[error("Getting terminal options failed: {0}")]
    GetAttributes(#[source] io::Error),
    #[error("Setting terminal options failed: {0}")]
    SetAttributes(#[source] io::Error),
}

fn check(
    ret: libc::c_int,
    step: fn(io::Error) -> EndpointError,
) -> Result<libc::c_int, EndpointError> {
    if ret < 0 {
        Err(step(io::Error::last_os_error()))
    } else {
        Ok(ret)
    }
}

/// Master side of a pseudo-terminal pair, in non-blocking raw-echo-off mode.
#[derive(Debug)]
pub struct PtyEndpoint {
    master: Option<File>,
    peer_path: Option<PathBuf>,
}

impl PtyEndpoint {
    pub fn open() -> Result<Self, EndpointError> {
        // SAFETY: posix_openpt takes no pointers; failure is reported as -1.
        let raw = check(
            unsafe { libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY) },
            EndpointError::Open,
        )?;
        // SAFETY: `raw` is a freshly opened descriptor that nothing else owns.
        let fd = unsafe { OwnedFd::from_raw_fd(raw) };
        let raw = fd.as_raw_fd();

        // SAFETY: `raw` stays open while `fd` is alive; these calls take no pointers.
        check(unsafe { libc::grantpt(raw) }, EndpointError::Grant)?;
        check(unsafe { libc::unlockpt(raw) }, EndpointError::Unlock)?;

        // SAFETY: F_GETFL/F_SETFL on an open descriptor, integer arguments only.
        let flags = check(
            unsafe { libc::fcntl(raw, libc::F_GETFL) },
            EndpointError::GetFlags,
        )?;
        check(
            unsafe { libc::fcntl(raw, libc::F_SETFL, flags | libc::O_NONBLOCK) },
            EndpointError::SetFlags,
        )?;

        // SAFETY: termios is plain data, and tcgetattr fills every field before
        // it is read.
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        // SAFETY: `termios` is a valid, exclusively borrowed out-parameter.
        check(
            unsafe { libc::tcgetattr(raw, &mut termios) },
            EndpointError::GetAttributes,
        )?;
        termios.c_lflag &= !libc::ECHO;
        // SAFETY: `termios` was initialized by tcgetattr above.
        check(
            unsafe { libc::tcsetattr(raw, libc::TCSADRAIN, &termios) },
            EndpointError::SetAttributes,
        )?;

        let peer_path = peer_name(raw);
        match &peer_path {
            Some(path) => tracing::debug!("Pseudoterminal peer at {}", path.display()),
            None => tracing::warn!("Could not resolve pseudoterminal peer name"),
        }

        Ok(Self {
            master: Some(File::from(fd)),
            peer_path,
        })
    }

    /// Path of the slave side, for an external program to attach to.
    pub fn peer_path(&self) -> Option<&Path> {
        self.peer_path.as_deref()
    }

    fn master(&mut self) -> io::Result<&mut File> {
        self.master
            .as_mut()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotConnected, "pseudoterminal closed")
            })
    }
}

#[cfg(target_os = "linux")]
fn peer_name(fd: RawFd) -> Option<PathBuf> {
    let mut buf = [0 as libc::c_char; 128];
    // SAFETY: the length passed matches `buf`, so ptsname_r cannot write past it.
    let ret = unsafe { libc::ptsname_r(fd, buf.as_mut_ptr(), buf.len()) };
    if ret != 0 {
        return None;
    }
    // SAFETY: on success ptsname_r leaves a NUL-terminated name inside `buf`.
    let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Some(PathBuf::from(name.to_string_lossy().into_owned()))
}

#[cfg(not(target_os = "linux"))]
fn peer_name(fd: RawFd) -> Option<PathBuf> {
    // SAFETY: `fd` is an open master descriptor. ptsname is not reentrant, but
    // the simulator is single-threaded.
    let ptr = unsafe { libc::ptsname(fd) };
    if ptr.is_null() {
        return None;
    }
    // SAFETY: a non-null ptsname result is a NUL-terminated static buffer.
    let name = unsafe { CStr::from_ptr(ptr) };
    Some(PathBuf::from(name.to_string_lossy().into_owned()))
}

impl StreamEndpoint for PtyEndpoint {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.master()?.read(&mut byte) {
            Ok(1) => Ok(Some(byte[0])),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            // The master reports EIO while no peer has the slave open.
            Err(e) if e.raw_os_error() == Some(libc::EIO) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.master()?.write(bytes)
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(master) = self.master.take() {
            drop(master);
            tracing::debug!("Pseudoterminal closed");
        }
        Ok(())
    }
}
