// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Recording fakes for unit tests.

use std::cell::RefCell;
use std::io;
use std::os::unix::io::RawFd;
use std::sync::{Mutex, Once};
use std::thread::{self, ThreadId};

use crate::discovery::RouterDiscovery;
use crate::sockopt::{SetSockOpt, SockOpt};

/// Kernel socket stand-in: records every option, optionally failing with an errno.
pub(crate) struct FakeSocket {
    fd: RawFd,
    errno: Option<i32>,
    calls: RefCell<Vec<SockOpt>>,
}

impl FakeSocket {
    pub(crate) fn new(fd: RawFd) -> Self {
        Self {
            fd,
            errno: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn failing(fd: RawFd, errno: i32) -> Self {
        Self {
            errno: Some(errno),
            ..Self::new(fd)
        }
    }

    pub(crate) fn calls(&self) -> Vec<SockOpt> {
        self.calls.borrow().clone()
    }
}

impl SetSockOpt for FakeSocket {
    fn descriptor(&self) -> RawFd {
        self.fd
    }

    fn set_opt(&self, opt: &SockOpt) -> io::Result<()> {
        self.calls.borrow_mut().push(*opt);
        match self.errno {
            Some(errno) => Err(io::Error::from_raw_os_error(errno)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingDiscovery {
    pub(crate) enabled: Vec<u16>,
    pub(crate) disabled: Vec<u16>,
}

impl RouterDiscovery for RecordingDiscovery {
    fn enable(&mut self, vif: u16) {
        self.enabled.push(vif);
    }

    fn disable(&mut self, vif: u16) {
        self.disabled.push(vif);
    }
}

/// Logger that keeps every record, tagged with the emitting thread.
struct CapturingLogger {
    records: Mutex<Vec<(ThreadId, log::Level, String)>>,
}

impl log::Log for CapturingLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        if let Ok(mut records) = self.records.lock() {
            records.push((thread::current().id(), record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};

/// Install the capturing logger for this test binary and clear what the
/// calling thread logged so far.
pub(crate) fn capture_logs() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
    take_logs();
}

/// Drain the records emitted by the calling thread.
pub(crate) fn take_logs() -> Vec<(log::Level, String)> {
    let me = thread::current().id();
    let mut records = LOGGER.records.lock().expect("logger mutex");
    let (mine, others): (Vec<_>, Vec<_>) = records.drain(..).partition(|(id, _, _)| *id == me);
    *records = others;
    mine.into_iter().map(|(_, level, msg)| (level, msg)).collect()
}
