// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Address and interface conversion to the raw forms the kernel expects.
//!
//! All functions here are pure. `std::net` addresses are already validated,
//! so none of the conversions can fail.

use std::fmt;
use std::mem;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Address family of a request or route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Family of an address.
    #[must_use]
    pub const fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => Self::V4,
            IpAddr::V6(_) => Self::V6,
        }
    }

    /// Prefix length covering a single host.
    #[must_use]
    pub const fn full_prefix_len(self) -> u8 {
        match self {
            Self::V4 => 32,
            Self::V6 => 128,
        }
    }

    /// Socket-option protocol level.
    #[must_use]
    pub const fn proto(self) -> libc::c_int {
        match self {
            Self::V4 => libc::IPPROTO_IP,
            Self::V6 => libc::IPPROTO_IPV6,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
        }
    }
}

/// A network interface, as resolved by the daemon's interface registry.
///
/// Only borrowed by this crate for the duration of a single kernel call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// Interface name, for diagnostics only.
    pub name: String,
    /// Kernel interface index.
    pub ifindex: u32,
    /// Local IPv4 address, used by the legacy `ip_mreq` API.
    pub inaddr: Ipv4Addr,
}

impl Interface {
    pub fn new(name: impl Into<String>, ifindex: u32, inaddr: Ipv4Addr) -> Self {
        Self {
            name: name.into(),
            ifindex,
            inaddr,
        }
    }
}

/// True for the wildcard source (`0.0.0.0` or `::`), i.e. any-source multicast.
#[must_use]
pub fn is_any(addr: &IpAddr) -> bool {
    addr.is_unspecified()
}

/// Network-order `in_addr`.
#[must_use]
pub fn to_raw_v4(addr: Ipv4Addr) -> libc::in_addr {
    libc::in_addr {
        s_addr: u32::from_ne_bytes(addr.octets()),
    }
}

/// Network-order `in6_addr`.
#[must_use]
pub fn to_raw_v6(addr: Ipv6Addr) -> libc::in6_addr {
    libc::in6_addr {
        s6_addr: addr.octets(),
    }
}

/// `sockaddr_in` with port zero.
#[must_use]
pub fn to_sockaddr_in(addr: Ipv4Addr) -> libc::sockaddr_in {
    // SAFETY: sockaddr_in is a plain C struct of integers; all-zero is valid
    let mut sin: libc::sockaddr_in = unsafe { mem::zeroed() };
    sin.sin_family = libc::AF_INET as libc::sa_family_t;
    sin.sin_addr = to_raw_v4(addr);
    #[cfg(target_os = "freebsd")]
    {
        sin.sin_len = mem::size_of::<libc::sockaddr_in>() as u8;
    }
    sin
}

/// `sockaddr_in6` with port, flow info and scope zero.
#[must_use]
pub fn to_sockaddr_in6(addr: Ipv6Addr) -> libc::sockaddr_in6 {
    // SAFETY: sockaddr_in6 is a plain C struct of integers; all-zero is valid
    let mut sin6: libc::sockaddr_in6 = unsafe { mem::zeroed() };
    sin6.sin6_family = libc::AF_INET6 as libc::sa_family_t;
    sin6.sin6_addr = to_raw_v6(addr);
    #[cfg(target_os = "freebsd")]
    {
        sin6.sin6_len = mem::size_of::<libc::sockaddr_in6>() as u8;
    }
    sin6
}

/// `sockaddr_storage` holding either family, as RFC 3678 requests carry them.
#[must_use]
pub fn to_sockaddr_storage(addr: IpAddr) -> libc::sockaddr_storage {
    // SAFETY: sockaddr_storage is a plain C struct; all-zero is AF_UNSPEC
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
    match addr {
        IpAddr::V4(v4) => {
            let sin = to_sockaddr_in(v4);
            // SAFETY:
            // - sockaddr_storage is sized and aligned for every sockaddr type
            // - the write covers exactly size_of::<sockaddr_in>() bytes of storage
            unsafe {
                std::ptr::write(
                    (&mut storage as *mut libc::sockaddr_storage).cast::<libc::sockaddr_in>(),
                    sin,
                );
            }
        }
        IpAddr::V6(v6) => {
            let sin6 = to_sockaddr_in6(v6);
            // SAFETY:
            // - sockaddr_storage is sized and aligned for every sockaddr type
            // - the write covers exactly size_of::<sockaddr_in6>() bytes of storage
            unsafe {
                std::ptr::write(
                    (&mut storage as *mut libc::sockaddr_storage).cast::<libc::sockaddr_in6>(),
                    sin6,
                );
            }
        }
    }
    storage
}

/// Source column of a `(source,group)` pair: `*` for any-source.
#[must_use]
pub fn display_source(addr: &IpAddr) -> String {
    if is_any(addr) {
        "*".to_string()
    } else {
        addr.to_string()
    }
}

/// Group with its prefix length; zero means a host-length prefix.
#[must_use]
pub fn display_group(addr: &IpAddr, prefix_len: u8) -> String {
    let len = if prefix_len == 0 {
        Family::of(addr).full_prefix_len()
    } else {
        prefix_len
    };
    format!("{}/{}", addr, len)
}
