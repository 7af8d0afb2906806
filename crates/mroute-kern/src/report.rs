// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Diagnostics for kernel call failures.
//!
//! Turns an OS error plus call context into one log line and a disposition
//! the caller acts on.

use std::io;
use std::os::unix::io::RawFd;

use crate::addr::{self, Family};
use crate::membership::{GroupAction, MulticastGroupRequest};
use crate::route::{MulticastRoute, RouteAction};

/// What a failed route call means to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Delete of an entry the kernel does not have; nothing to undo.
    EntryAbsent,
    /// Genuine failure.
    Rejected,
}

/// Classify a route failure. Only ENOENT on delete is benign.
#[must_use]
pub fn classify_route_failure(action: RouteAction, err: &io::Error) -> Disposition {
    match (action, err.raw_os_error()) {
        (RouteAction::Delete, Some(libc::ENOENT)) => Disposition::EntryAbsent,
        _ => Disposition::Rejected,
    }
}

/// Log level for a route failure. IPv6 failures rank one step above IPv4.
#[must_use]
pub fn route_failure_level(family: Family, disposition: Disposition) -> log::Level {
    match (disposition, family) {
        (Disposition::EntryAbsent, _) => log::Level::Info,
        (Disposition::Rejected, Family::V4) => log::Level::Warn,
        (Disposition::Rejected, Family::V6) => log::Level::Error,
    }
}

/// Log a failed route call and classify it.
pub fn route_failure(
    family: Family,
    action: RouteAction,
    route: &MulticastRoute,
    fd: RawFd,
    err: &io::Error,
) -> Disposition {
    let disposition = classify_route_failure(action, err);
    let level = route_failure_level(family, disposition);

    match disposition {
        Disposition::EntryAbsent => log::log!(
            level,
            "[MROUTE] Failed removing {} multicast route ({},{}), does not exist",
            family,
            route.source,
            route.group
        ),
        Disposition::Rejected => log::log!(
            level,
            "[MROUTE] Failed {} {} multicast route ({},{}) parent VIF {} on sd {} ... {}: {}",
            action.verb(),
            family,
            route.source,
            route.group,
            route.inbound,
            fd,
            err.raw_os_error().unwrap_or(0),
            err
        ),
    }

    disposition
}

/// Log a failed join/leave.
pub fn membership_failure(
    action: GroupAction,
    req: &MulticastGroupRequest<'_>,
    fd: RawFd,
    err: &io::Error,
) {
    log::error!(
        "[MEMBERSHIP] Failed {} group ({},{}) on {} (ifindex {}) sd {} ... {}: {}",
        action.verb(),
        addr::display_source(&req.source),
        addr::display_group(&req.group, req.prefix_len),
        req.interface.name,
        req.interface.ifindex,
        fd,
        err.raw_os_error().unwrap_or(0),
        err
    );
}

/// Log a join/leave that cannot be expressed with the current capabilities.
pub fn membership_unsupported(
    action: GroupAction,
    req: &MulticastGroupRequest<'_>,
    reason: &dyn std::fmt::Display,
) {
    log::error!(
        "[MEMBERSHIP] Cannot {} group ({},{}) on {}: {}",
        match action {
            GroupAction::Join => "join",
            GroupAction::Leave => "leave",
        },
        addr::display_source(&req.source),
        addr::display_group(&req.group, req.prefix_len),
        req.interface.name,
        reason
    );
}

/// The family's routing socket is not open.
pub fn no_transport(family: Family) {
    log::debug!("[MROUTE] No {} multicast socket", family);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_enoent() {
        let enoent = io::Error::from_raw_os_error(libc::ENOENT);
        assert_eq!(
            classify_route_failure(RouteAction::Delete, &enoent),
            Disposition::EntryAbsent
        );
        assert_eq!(
            classify_route_failure(RouteAction::Add, &enoent),
            Disposition::Rejected
        );
    }

    #[test]
    fn test_classify_other_errors() {
        let eperm = io::Error::from_raw_os_error(libc::EPERM);
        assert_eq!(
            classify_route_failure(RouteAction::Delete, &eperm),
            Disposition::Rejected
        );
        let synthetic = io::Error::other("not an OS error");
        assert_eq!(
            classify_route_failure(RouteAction::Delete, &synthetic),
            Disposition::Rejected
        );
    }

    #[test]
    fn test_levels() {
        use log::Level;

        assert_eq!(route_failure_level(Family::V4, Disposition::EntryAbsent), Level::Info);
        assert_eq!(route_failure_level(Family::V6, Disposition::EntryAbsent), Level::Info);
        assert_eq!(route_failure_level(Family::V4, Disposition::Rejected), Level::Warn);
        assert_eq!(route_failure_level(Family::V6, Disposition::Rejected), Level::Error);

        // log::Level orders Error < Warn < Info: lower is more severe
        assert!(
            route_failure_level(Family::V6, Disposition::Rejected)
                < route_failure_level(Family::V4, Disposition::Rejected)
        );
        assert!(
            route_failure_level(Family::V6, Disposition::Rejected)
                < route_failure_level(Family::V6, Disposition::EntryAbsent)
        );
    }
}
