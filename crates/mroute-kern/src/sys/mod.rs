// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Kernel ABI for multicast membership and forwarding-cache socket options.
//!
//! Everything in here mirrors the target's C headers bit-for-bit:
//! `<netinet/in.h>` for `group_req`/`group_source_req`/`ip_mreqn` and
//! `<linux/mroute.h>`, `<linux/mroute6.h>` (or the BSD `ip_mroute.h`,
//! `ip6_mroute.h`) for `mfcctl`/`mf6cctl`. libc does not export most of
//! these, so they are declared here per platform.

#![allow(non_camel_case_types)]

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::*;

#[cfg(target_os = "freebsd")]
mod freebsd;
#[cfg(target_os = "freebsd")]
pub use freebsd::*;

#[cfg(not(any(target_os = "linux", target_os = "freebsd")))]
compile_error!("mroute-kern supports the Linux and FreeBSD multicast routing APIs only");

/// Bits per `if_mask` word in an `if_set`.
pub const NIFBITS: usize = u32::BITS as usize;

/// Number of `if_mask` words in an `if_set`.
pub const IF_SET_WORDS: usize = IF_SETSIZE.div_ceil(NIFBITS);

/// IPv6 interface-set bitmap (`struct if_set`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct if_set {
    pub ifs_bits: [u32; IF_SET_WORDS],
}

/// RFC 3678 any-source request (`struct group_req`).
#[repr(C)]
#[derive(Clone, Copy)]
pub struct group_req {
    pub gr_interface: u32,
    pub gr_group: libc::sockaddr_storage,
}

/// RFC 3678 source-specific request (`struct group_source_req`).
#[repr(C)]
#[derive(Clone, Copy)]
pub struct group_source_req {
    pub gsr_interface: u32,
    pub gsr_group: libc::sockaddr_storage,
    pub gsr_source: libc::sockaddr_storage,
}

/// IPv6 forwarding-cache control (`struct mf6cctl`).
#[repr(C)]
#[derive(Clone, Copy)]
pub struct mf6cctl {
    pub mf6cc_origin: libc::sockaddr_in6,
    pub mf6cc_mcastgrp: libc::sockaddr_in6,
    pub mf6cc_parent: mifi_t,
    pub mf6cc_ifset: if_set,
}

/// Virtual interface index as the IPv4 forwarding cache sees it.
pub type vifi_t = libc::c_ushort;

/// Multicast interface index as the IPv6 forwarding cache sees it.
pub type mifi_t = libc::c_ushort;
