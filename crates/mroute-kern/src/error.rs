// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Errors surfaced to the control plane.

use std::fmt;
use std::io;
use std::net::IpAddr;
use std::os::unix::io::RawFd;

use crate::addr::Family;
use crate::caps::GroupApi;
use crate::sockopt::OptName;

/// Hard failures of a kernel call.
///
/// Benign outcomes (missing transport, deleting an absent route) are not
/// errors; see [`crate::route::RouteOutcome`].
#[derive(Debug)]
pub enum KernelError {
    /// The kernel rejected the socket option.
    Rejected {
        op: OptName,
        fd: RawFd,
        err: io::Error,
    },

    /// Source-specific membership requested under a legacy group API.
    SourceFilterUnsupported { api: GroupApi },

    /// Membership requested for a family the capabilities exclude.
    FamilyUnsupported(Family),

    /// Route or request addresses of the wrong family for the call.
    FamilyMismatch {
        expected: Family,
        source: IpAddr,
        group: IpAddr,
    },
}

impl KernelError {
    /// Raw OS error of a rejected call.
    #[must_use]
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Rejected { err, .. } => err.raw_os_error(),
            _ => None,
        }
    }
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { op, fd, err } => write!(f, "{} rejected on sd {}: {}", op, fd, err),
            Self::SourceFilterUnsupported { api } => {
                write!(f, "source-specific membership not supported by the {} API", api)
            }
            Self::FamilyUnsupported(family) => {
                write!(f, "{} multicast membership is disabled", family)
            }
            Self::FamilyMismatch {
                expected,
                source,
                group,
            } => write!(f, "expected {} addresses, got ({},{})", expected, source, group),
        }
    }
}

impl std::error::Error for KernelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected { err, .. } => Some(err),
            _ => None,
        }
    }
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
