// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! FreeBSD multicast ABI (`<netinet/in.h>`, `<netinet/ip_mroute.h>`, `<netinet6/ip6_mroute.h>`).

use libc::c_int;

use super::vifi_t;

pub const MCAST_JOIN_GROUP: c_int = 80;
pub const MCAST_LEAVE_GROUP: c_int = 81;
pub const MCAST_JOIN_SOURCE_GROUP: c_int = 82;
pub const MCAST_LEAVE_SOURCE_GROUP: c_int = 83;

pub const IP_ADD_MEMBERSHIP: c_int = 12;
pub const IP_DROP_MEMBERSHIP: c_int = 13;
pub const IPV6_JOIN_GROUP: c_int = 12;
pub const IPV6_LEAVE_GROUP: c_int = 13;

pub const MRT_ADD_MFC: c_int = 104;
pub const MRT_DEL_MFC: c_int = 105;
pub const MRT6_ADD_MFC: c_int = 104;
pub const MRT6_DEL_MFC: c_int = 105;

pub const MAXVIFS: usize = 32;
pub const MAXMIFS: usize = 64;
pub const IF_SETSIZE: usize = 256;

/// `struct ip_mreqn`, present since FreeBSD 7.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ip_mreqn {
    pub imr_multiaddr: libc::in_addr,
    pub imr_address: libc::in_addr,
    pub imr_ifindex: c_int,
}

/// IPv4 forwarding-cache control (`struct mfcctl`).
#[repr(C)]
#[derive(Clone, Copy)]
pub struct mfcctl {
    pub mfcc_origin: libc::in_addr,
    pub mfcc_mcastgrp: libc::in_addr,
    pub mfcc_parent: vifi_t,
    pub mfcc_ttls: [u8; MAXVIFS],
}

impl mfcctl {
    pub(crate) fn new(origin: libc::in_addr, group: libc::in_addr, parent: vifi_t) -> Self {
        Self {
            mfcc_origin: origin,
            mfcc_mcastgrp: group,
            mfcc_parent: parent,
            mfcc_ttls: [0; MAXVIFS],
        }
    }
}
