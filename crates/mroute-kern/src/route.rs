// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Multicast forwarding cache (MFC) installation.
//!
//! One kernel call per request: `MRT_ADD_MFC`/`MRT_DEL_MFC` on the IPv4
//! routing socket, `MRT6_ADD_MFC`/`MRT6_DEL_MFC` on the IPv6 one.
//!
//! # Outcomes
//!
//! | Situation | Result | Log |
//! |-----------|--------|-----|
//! | Routing socket absent | `Ok(NoTransport)` | debug |
//! | Kernel accepted | `Ok(Applied)` | debug |
//! | Delete of an absent entry (ENOENT) | `Ok(EntryAbsent)` | info |
//! | Any other IPv4 failure | `Err(Rejected)` | warn |
//! | Any other IPv6 failure | `Err(Rejected)` | error |
//!
//! Router discovery (IPv4 only) is toggled after `Applied`, and only for
//! routes with at least one outbound VIF. A delete that finds the entry
//! already gone does not disable discovery: the disable was issued when
//! the entry was actually removed, and advertisers count per VIF.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::addr::{self, Family};
use crate::discovery::RouterDiscovery;
use crate::error::{KernelError, Result};
use crate::report::{self, Disposition};
use crate::sockopt::{OptName, OptValue, SetSockOpt, SockOpt};
use crate::sys;

/// Number of VIF slots in a TTL vector, the kernel's `MAXVIFS`.
pub const MAX_VIFS: usize = sys::MAXVIFS;

/// Add or delete a forwarding entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    Add,
    Delete,
}

impl RouteAction {
    pub(crate) const fn verb(self) -> &'static str {
        match self {
            Self::Add => "adding",
            Self::Delete => "removing",
        }
    }
}

/// Non-error result of a route call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The kernel accepted the change.
    Applied,
    /// The family's routing socket is not open on this host.
    NoTransport,
    /// Delete of an entry the kernel does not have.
    EntryAbsent,
}

/// IPv6 interface-set bitmap: one bit per multicast interface index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IfSet {
    bits: [u32; sys::IF_SET_WORDS],
}

impl IfSet {
    /// Number of representable interfaces.
    pub const CAPACITY: usize = sys::IF_SETSIZE;

    #[must_use]
    pub const fn new() -> Self {
        Self {
            bits: [0; sys::IF_SET_WORDS],
        }
    }

    /// Presence bitmap of a TTL vector: bit `i` set iff `ttls[i] != 0`.
    #[must_use]
    pub fn from_ttls(ttls: &[u8]) -> Self {
        let mut set = Self::new();
        for (i, ttl) in ttls.iter().enumerate().take(Self::CAPACITY) {
            if *ttl != 0 {
                set.set(i);
            }
        }
        set
    }

    /// Set bit `i`. Out-of-range indices are ignored.
    pub fn set(&mut self, i: usize) {
        if i < Self::CAPACITY {
            self.bits[i / sys::NIFBITS] |= 1 << (i % sys::NIFBITS);
        }
    }

    pub fn clear(&mut self, i: usize) {
        if i < Self::CAPACITY {
            self.bits[i / sys::NIFBITS] &= !(1 << (i % sys::NIFBITS));
        }
    }

    #[must_use]
    pub fn is_set(&self, i: usize) -> bool {
        i < Self::CAPACITY && self.bits[i / sys::NIFBITS] & (1 << (i % sys::NIFBITS)) != 0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }

    /// Raw `if_mask` words.
    #[must_use]
    pub const fn words(&self) -> [u32; sys::IF_SET_WORDS] {
        self.bits
    }
}

/// Typed `mfcctl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MfcCtl {
    pub origin: Ipv4Addr,
    pub group: Ipv4Addr,
    pub parent: u16,
    pub ttls: [u8; MAX_VIFS],
}

/// Typed `mf6cctl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mf6cCtl {
    pub origin: Ipv6Addr,
    pub group: Ipv6Addr,
    pub parent: u16,
    pub ifset: IfSet,
}

/// A (source,group) forwarding entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MulticastRoute {
    /// Origin address.
    pub source: IpAddr,
    /// Destination group, same family as `source`.
    pub group: IpAddr,
    /// Inbound (parent) VIF.
    pub inbound: u16,
    /// Per-VIF TTL threshold; 0 means not an outbound member.
    pub ttl: [u8; MAX_VIFS],
}

impl MulticastRoute {
    /// Route with no outbound VIFs yet.
    #[must_use]
    pub fn new(source: IpAddr, group: IpAddr, inbound: u16) -> Self {
        Self {
            source,
            group,
            inbound,
            ttl: [0; MAX_VIFS],
        }
    }

    /// Add an outbound VIF with a TTL threshold.
    ///
    /// Returns `false` when `vif` is beyond the kernel's VIF count (the VIF
    /// is not representable) or `ttl` is zero.
    pub fn add_outbound(&mut self, vif: usize, ttl: u8) -> bool {
        match self.ttl.get_mut(vif) {
            Some(slot) if ttl != 0 => {
                *slot = ttl;
                true
            }
            _ => false,
        }
    }

    pub fn remove_outbound(&mut self, vif: usize) {
        if let Some(slot) = self.ttl.get_mut(vif) {
            *slot = 0;
        }
    }

    /// Outbound VIFs and their thresholds.
    pub fn outbound(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.ttl
            .iter()
            .enumerate()
            .filter(|(_, ttl)| **ttl != 0)
            .map(|(vif, ttl)| (vif, *ttl))
    }

    /// At least one outbound VIF.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.ttl.iter().any(|ttl| *ttl != 0)
    }

    /// IPv6 interface set derived from the TTL vector.
    #[must_use]
    pub fn interface_set(&self) -> IfSet {
        IfSet::from_ttls(&self.ttl)
    }

    fn v4_pair(&self) -> Result<(Ipv4Addr, Ipv4Addr)> {
        match (self.source, self.group) {
            (IpAddr::V4(source), IpAddr::V4(group)) => Ok((source, group)),
            (source, group) => Err(KernelError::FamilyMismatch {
                expected: Family::V4,
                source,
                group,
            }),
        }
    }

    fn v6_pair(&self) -> Result<(Ipv6Addr, Ipv6Addr)> {
        match (self.source, self.group) {
            (IpAddr::V6(source), IpAddr::V6(group)) => Ok((source, group)),
            (source, group) => Err(KernelError::FamilyMismatch {
                expected: Family::V6,
                source,
                group,
            }),
        }
    }
}

/// Build the `MRT_ADD_MFC`/`MRT_DEL_MFC` option for an IPv4 route.
pub fn build_mfc(action: RouteAction, route: &MulticastRoute) -> Result<SockOpt> {
    let (origin, group) = route.v4_pair()?;
    let name = match action {
        RouteAction::Add => OptName::MrtAddMfc,
        RouteAction::Delete => OptName::MrtDelMfc,
    };

    Ok(SockOpt::new(
        Family::V4,
        name,
        OptValue::Mfc(MfcCtl {
            origin,
            group,
            parent: route.inbound,
            ttls: route.ttl,
        }),
    ))
}

/// Build the `MRT6_ADD_MFC`/`MRT6_DEL_MFC` option for an IPv6 route.
pub fn build_mf6c(action: RouteAction, route: &MulticastRoute) -> Result<SockOpt> {
    let (origin, group) = route.v6_pair()?;
    let name = match action {
        RouteAction::Add => OptName::Mrt6AddMfc,
        RouteAction::Delete => OptName::Mrt6DelMfc,
    };

    Ok(SockOpt::new(
        Family::V6,
        name,
        OptValue::Mf6c(Mf6cCtl {
            origin,
            group,
            parent: route.inbound,
            ifset: route.interface_set(),
        }),
    ))
}

/// Add or delete an IPv4 forwarding entry.
///
/// With `notify` set, an applied change to an active route toggles router
/// discovery on the inbound VIF.
#[doc(alias = "mroute_v4")]
pub fn mroute4<S, D>(
    sock: Option<&S>,
    action: RouteAction,
    route: &MulticastRoute,
    notify: bool,
    discovery: &mut D,
) -> Result<RouteOutcome>
where
    S: SetSockOpt + ?Sized,
    D: RouterDiscovery + ?Sized,
{
    let Some(sock) = sock else {
        report::no_transport(Family::V4);
        return Ok(RouteOutcome::NoTransport);
    };

    let opt = build_mfc(action, route)?;
    let outcome = issue(sock, Family::V4, action, route, &opt)?;

    if outcome == RouteOutcome::Applied && notify {
        notify_discovery(discovery, action, route);
    }
    Ok(outcome)
}

/// Add or delete an IPv6 forwarding entry. Never touches router discovery.
#[doc(alias = "mroute_v6")]
pub fn mroute6<S>(sock: Option<&S>, action: RouteAction, route: &MulticastRoute) -> Result<RouteOutcome>
where
    S: SetSockOpt + ?Sized,
{
    let Some(sock) = sock else {
        report::no_transport(Family::V6);
        return Ok(RouteOutcome::NoTransport);
    };

    let opt = build_mf6c(action, route)?;
    issue(sock, Family::V6, action, route, &opt)
}

/// Post-success hook: enable or disable discovery on the inbound VIF of an
/// active route. Routes without outbound VIFs leave discovery untouched.
pub fn notify_discovery<D>(discovery: &mut D, action: RouteAction, route: &MulticastRoute)
where
    D: RouterDiscovery + ?Sized,
{
    if !route.is_active() {
        return;
    }

    log::debug!(
        "[MROUTE] {} {} -> {} from VIF {}",
        match action {
            RouteAction::Add => "Add",
            RouteAction::Delete => "Del",
        },
        route.source,
        route.group,
        route.inbound
    );

    match action {
        RouteAction::Add => discovery.enable(route.inbound),
        RouteAction::Delete => discovery.disable(route.inbound),
    }
}

fn issue<S>(
    sock: &S,
    family: Family,
    action: RouteAction,
    route: &MulticastRoute,
    opt: &SockOpt,
) -> Result<RouteOutcome>
where
    S: SetSockOpt + ?Sized,
{
    let fd = sock.descriptor();
    log::debug!(
        "[MROUTE] {} ({},{}) parent VIF {} on sd {} ...",
        opt.name,
        route.source,
        addr::display_group(&route.group, 0),
        route.inbound,
        fd
    );

    match sock.set_opt(opt) {
        Ok(()) => Ok(RouteOutcome::Applied),
        Err(err) => match report::route_failure(family, action, route, fd, &err) {
            Disposition::EntryAbsent => Ok(RouteOutcome::EntryAbsent),
            Disposition::Rejected => Err(KernelError::Rejected {
                op: opt.name,
                fd,
                err,
            }),
        },
    }
}
