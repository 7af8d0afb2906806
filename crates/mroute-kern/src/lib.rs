// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # mroute-kern - kernel forwarding layer for static multicast routing
//!
//! Turns control-plane decisions ("join this group", "forward this
//! (source,group) from VIF X to these VIFs") into the exact socket-option
//! calls the kernel expects, for IPv4 and IPv6 and for both the RFC 3678 and
//! the legacy membership APIs.
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |                   Control plane (daemon)                      |
//! |   join_leave()        mroute4()              mroute6()        |
//! +-------------+-----------------+-------------------+-----------+
//!               |                 |                   |
//! +-------------v-----+  +--------v-------------------v-----------+
//! |    membership     |  |                route                   |
//! | group_req / mreq  |  |  mfcctl (TTLs)  |  mf6cctl (if_set)    |
//! +-------------+-----+  +--------+--------+-------------+--------+
//!               |                 |   post-success hook |
//!               |                 |   RouterDiscovery   |
//! +-------------v-----------------v---------------------v--------+
//! |   sockopt: SockOpt -> raw struct -> SetSockOpt::set_opt()    |
//! |   addr (raw addresses)   caps (API generation)   report      |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::net::{IpAddr, Ipv4Addr};
//! use mroute_kern::{
//!     join_leave, mroute4, GroupAction, Interface, KernelCaps, MulticastGroupRequest,
//!     MulticastRoute, NullDiscovery, RouteAction,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let caps = KernelCaps::from_env();
//! let sock = std::net::UdpSocket::bind("0.0.0.0:0")?;
//! let eth0 = Interface::new("eth0", 2, Ipv4Addr::new(192, 168, 1, 1));
//!
//! let req = MulticastGroupRequest::any_source(IpAddr::V4(Ipv4Addr::new(239, 1, 1, 1)), &eth0);
//! join_leave(&sock, &caps, GroupAction::Join, &req)?;
//!
//! let mut route = MulticastRoute::new(
//!     IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
//!     IpAddr::V4(Ipv4Addr::new(239, 1, 1, 1)),
//!     0,
//! );
//! route.add_outbound(1, 1);
//! let mroute_sock: Option<&socket2::Socket> = None;
//! mroute4(mroute_sock, RouteAction::Add, &route, true, &mut NullDiscovery)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Every call is synchronous and issues at most one `setsockopt()`. The
//! routing sockets are owned by the caller and only borrowed here; callers
//! sharing a socket across threads must serialize calls on it.

pub mod addr;
pub mod caps;
pub mod discovery;
pub mod error;
pub mod membership;
pub mod report;
pub mod route;
pub mod sockopt;
pub mod sys;

#[cfg(test)]
mod testing;

pub use addr::{Family, Interface};
pub use caps::{GroupApi, KernelCaps};
pub use discovery::{NullDiscovery, RouterDiscovery, VifActivity};
pub use error::{KernelError, Result};
pub use membership::{build_membership, join_leave, GroupAction, MulticastGroupRequest};
pub use report::Disposition;
pub use route::{
    build_mf6c, build_mfc, mroute4, mroute6, notify_discovery, IfSet, Mf6cCtl, MfcCtl,
    MulticastRoute, RouteAction, RouteOutcome, MAX_VIFS,
};
pub use sockopt::{setsockopt_fd, OptName, OptValue, SetSockOpt, SockOpt};
