// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Multicast group membership (join/leave) on an interface.
//!
//! Picks exactly one socket option from the request's family, whether the
//! source is the wildcard, and the [`GroupApi`] generation:
//!
//! | API | Source | IPv4 | IPv6 |
//! |-----|--------|------|------|
//! | rfc3678 | any | `MCAST_JOIN_GROUP` (`group_req`) | `MCAST_JOIN_GROUP` (`group_req`) |
//! | rfc3678 | specific | `MCAST_JOIN_SOURCE_GROUP` (`group_source_req`) | same |
//! | mreqn | any | `IP_ADD_MEMBERSHIP` (`ip_mreqn`) | `IPV6_JOIN_GROUP` (`ipv6_mreq`) |
//! | mreq | any | `IP_ADD_MEMBERSHIP` (`ip_mreq`) | `IPV6_JOIN_GROUP` (`ipv6_mreq`) |
//!
//! Leave uses the matching `LEAVE`/`DROP` option with the identical value.
//! The legacy generations cannot express a source filter, so a
//! source-specific request under them fails before any kernel call.
//!
//! On Linux the RFC 3678 API can join on an interface that is down or has no
//! address yet, which `ip_mreq` cannot.

use std::net::IpAddr;

use crate::addr::{self, Family, Interface};
use crate::caps::{GroupApi, KernelCaps};
use crate::error::{KernelError, Result};
use crate::report;
use crate::sockopt::{OptName, OptValue, SetSockOpt, SockOpt};

/// Join or leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupAction {
    #[default]
    Join,
    Leave,
}

impl GroupAction {
    pub(crate) const fn verb(self) -> &'static str {
        match self {
            Self::Join => "joining",
            Self::Leave => "leaving",
        }
    }
}

/// A join/leave request, borrowed for a single call.
#[derive(Debug, Clone, Copy)]
pub struct MulticastGroupRequest<'a> {
    /// Target group.
    pub group: IpAddr,
    /// Source filter; the unspecified address means any source.
    pub source: IpAddr,
    /// Interface to join on.
    pub interface: &'a Interface,
    /// Group prefix length, for diagnostics only. Zero means host length.
    pub prefix_len: u8,
}

impl<'a> MulticastGroupRequest<'a> {
    /// Any-source (ASM) request.
    pub fn any_source(group: IpAddr, interface: &'a Interface) -> Self {
        let source = match group {
            IpAddr::V4(_) => IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED),
            IpAddr::V6(_) => IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED),
        };
        Self {
            group,
            source,
            interface,
            prefix_len: 0,
        }
    }

    /// Source-specific (SSM) request.
    pub fn source_specific(source: IpAddr, group: IpAddr, interface: &'a Interface) -> Self {
        Self {
            group,
            source,
            interface,
            prefix_len: 0,
        }
    }

    #[must_use]
    pub fn with_prefix_len(mut self, prefix_len: u8) -> Self {
        self.prefix_len = prefix_len;
        self
    }

    #[must_use]
    pub fn is_any_source(&self) -> bool {
        addr::is_any(&self.source)
    }

    #[must_use]
    pub fn family(&self) -> Family {
        Family::of(&self.group)
    }
}

/// Build the single socket option for a join/leave.
pub fn build_membership(
    caps: &KernelCaps,
    action: GroupAction,
    req: &MulticastGroupRequest<'_>,
) -> Result<SockOpt> {
    let family = req.family();
    if family == Family::V6 && !caps.ipv6 {
        return Err(KernelError::FamilyUnsupported(Family::V6));
    }

    let ifindex = req.interface.ifindex;
    let join = action == GroupAction::Join;

    let opt = match caps.group_api {
        GroupApi::Rfc3678 if req.is_any_source() => SockOpt::new(
            family,
            if join {
                OptName::McastJoinGroup
            } else {
                OptName::McastLeaveGroup
            },
            OptValue::Group {
                interface: ifindex,
                group: req.group,
            },
        ),
        GroupApi::Rfc3678 => SockOpt::new(
            family,
            if join {
                OptName::McastJoinSourceGroup
            } else {
                OptName::McastLeaveSourceGroup
            },
            OptValue::SourceGroup {
                interface: ifindex,
                source: req.source,
                group: req.group,
            },
        ),
        api if !req.is_any_source() => {
            return Err(KernelError::SourceFilterUnsupported { api });
        }
        api => match req.group {
            IpAddr::V6(group) => SockOpt::new(
                family,
                if join {
                    OptName::Ipv6JoinGroup
                } else {
                    OptName::Ipv6LeaveGroup
                },
                OptValue::MreqV6 { group, ifindex },
            ),
            IpAddr::V4(group) => SockOpt::new(
                family,
                if join {
                    OptName::IpAddMembership
                } else {
                    OptName::IpDropMembership
                },
                if api == GroupApi::Mreqn {
                    OptValue::MreqnV4 { group, ifindex }
                } else {
                    OptValue::MreqV4 {
                        group,
                        local: req.interface.inaddr,
                    }
                },
            ),
        },
    };

    Ok(opt)
}

/// Join or leave a multicast group on `sock`.
pub fn join_leave<S>(
    sock: &S,
    caps: &KernelCaps,
    action: GroupAction,
    req: &MulticastGroupRequest<'_>,
) -> Result<()>
where
    S: SetSockOpt + ?Sized,
{
    let opt = match build_membership(caps, action, req) {
        Ok(opt) => opt,
        Err(err) => {
            report::membership_unsupported(action, req, &err);
            return Err(err);
        }
    };

    let fd = sock.descriptor();
    log::debug!(
        "[MEMBERSHIP] {} group ({},{}) on ifindex {} and socket {} ...",
        match action {
            GroupAction::Join => "Join",
            GroupAction::Leave => "Leave",
        },
        addr::display_source(&req.source),
        req.group,
        req.interface.ifindex,
        fd
    );

    sock.set_opt(&opt).map_err(|err| {
        report::membership_failure(action, req, fd, &err);
        KernelError::Rejected {
            op: opt.name,
            fd,
            err,
        }
    })
}
