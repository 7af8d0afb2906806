// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io;
use std::os::unix::io::RawFd;

use mroute_kern::{RouterDiscovery, SetSockOpt, SockOpt};

/// Install a test logger once; RUST_LOG controls verbosity.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fake routing/membership socket.
///
/// Records every option issued and answers with the next scripted errno, or
/// success once the script runs out.
pub struct RecordingSocket {
    fd: RawFd,
    script: RefCell<Vec<Option<i32>>>,
    calls: RefCell<Vec<SockOpt>>,
    attempts: Cell<usize>,
}

impl RecordingSocket {
    pub fn new(fd: RawFd) -> Self {
        Self {
            fd,
            script: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            attempts: Cell::new(0),
        }
    }

    /// Queue the result of the next call: `None` succeeds, `Some(errno)` fails.
    pub fn then(self, errno: Option<i32>) -> Self {
        self.script.borrow_mut().push(errno);
        self
    }

    pub fn calls(&self) -> Vec<SockOpt> {
        self.calls.borrow().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

impl SetSockOpt for RecordingSocket {
    fn descriptor(&self) -> RawFd {
        self.fd
    }

    fn set_opt(&self, opt: &SockOpt) -> io::Result<()> {
        self.calls.borrow_mut().push(*opt);
        self.attempts.set(self.attempts.get() + 1);

        let mut script = self.script.borrow_mut();
        let next = if script.is_empty() {
            None
        } else {
            script.remove(0)
        };
        match next {
            Some(errno) => Err(io::Error::from_raw_os_error(errno)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryCall {
    Enable(u16),
    Disable(u16),
}

/// Fake router-discovery advertiser.
#[derive(Debug, Default)]
pub struct RecordingDiscovery {
    pub calls: Vec<DiscoveryCall>,
}

impl RouterDiscovery for RecordingDiscovery {
    fn enable(&mut self, vif: u16) {
        self.calls.push(DiscoveryCall::Enable(vif));
    }

    fn disable(&mut self, vif: u16) {
        self.calls.push(DiscoveryCall::Disable(vif));
    }
}
