// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed socket options and the kernel transport seam.
//!
//! Every kernel effect of this crate is one `setsockopt()` call. Requests are
//! built as a typed [`SockOpt`] (which tests can inspect), then lowered to
//! the exact C structure only at the moment the call is issued.
//!
//! ```text
//! MulticastGroupRequest / MulticastRoute
//!            |  build_*()
//!            v
//!        SockOpt { family, name, value }      <- recorded by fake sockets
//!            |  lower()
//!            v
//!   group_req | group_source_req | ip_mreqn | ip_mreq | ipv6_mreq | mfcctl | mf6cctl
//!            |  libc::setsockopt()
//!            v
//!          kernel
//! ```

use std::fmt;
use std::io;
use std::mem;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, UdpSocket};
use std::os::unix::io::{AsRawFd, BorrowedFd, RawFd};

use crate::addr::{self, Family};
use crate::route::{Mf6cCtl, MfcCtl};
use crate::sys;

/// Socket option names this crate issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptName {
    McastJoinGroup,
    McastLeaveGroup,
    McastJoinSourceGroup,
    McastLeaveSourceGroup,
    IpAddMembership,
    IpDropMembership,
    Ipv6JoinGroup,
    Ipv6LeaveGroup,
    MrtAddMfc,
    MrtDelMfc,
    Mrt6AddMfc,
    Mrt6DelMfc,
}

impl OptName {
    /// Platform option number.
    #[must_use]
    pub const fn raw(self) -> libc::c_int {
        match self {
            Self::McastJoinGroup => sys::MCAST_JOIN_GROUP,
            Self::McastLeaveGroup => sys::MCAST_LEAVE_GROUP,
            Self::McastJoinSourceGroup => sys::MCAST_JOIN_SOURCE_GROUP,
            Self::McastLeaveSourceGroup => sys::MCAST_LEAVE_SOURCE_GROUP,
            Self::IpAddMembership => sys::IP_ADD_MEMBERSHIP,
            Self::IpDropMembership => sys::IP_DROP_MEMBERSHIP,
            Self::Ipv6JoinGroup => sys::IPV6_JOIN_GROUP,
            Self::Ipv6LeaveGroup => sys::IPV6_LEAVE_GROUP,
            Self::MrtAddMfc => sys::MRT_ADD_MFC,
            Self::MrtDelMfc => sys::MRT_DEL_MFC,
            Self::Mrt6AddMfc => sys::MRT6_ADD_MFC,
            Self::Mrt6DelMfc => sys::MRT6_DEL_MFC,
        }
    }

    /// C macro name, for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::McastJoinGroup => "MCAST_JOIN_GROUP",
            Self::McastLeaveGroup => "MCAST_LEAVE_GROUP",
            Self::McastJoinSourceGroup => "MCAST_JOIN_SOURCE_GROUP",
            Self::McastLeaveSourceGroup => "MCAST_LEAVE_SOURCE_GROUP",
            Self::IpAddMembership => "IP_ADD_MEMBERSHIP",
            Self::IpDropMembership => "IP_DROP_MEMBERSHIP",
            Self::Ipv6JoinGroup => "IPV6_JOIN_GROUP",
            Self::Ipv6LeaveGroup => "IPV6_LEAVE_GROUP",
            Self::MrtAddMfc => "MRT_ADD_MFC",
            Self::MrtDelMfc => "MRT_DEL_MFC",
            Self::Mrt6AddMfc => "MRT6_ADD_MFC",
            Self::Mrt6DelMfc => "MRT6_DEL_MFC",
        }
    }
}

impl fmt::Display for OptName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Option value, one variant per kernel structure shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptValue {
    /// `group_req`
    Group { interface: u32, group: IpAddr },
    /// `group_source_req`
    SourceGroup {
        interface: u32,
        source: IpAddr,
        group: IpAddr,
    },
    /// `ip_mreqn`
    MreqnV4 { group: Ipv4Addr, ifindex: u32 },
    /// `ip_mreq`
    MreqV4 { group: Ipv4Addr, local: Ipv4Addr },
    /// `ipv6_mreq`
    MreqV6 { group: Ipv6Addr, ifindex: u32 },
    /// `mfcctl`
    Mfc(MfcCtl),
    /// `mf6cctl`
    Mf6c(Mf6cCtl),
}

/// A fully built socket option: protocol level, name and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SockOpt {
    pub family: Family,
    pub name: OptName,
    pub value: OptValue,
}

impl SockOpt {
    #[must_use]
    pub const fn new(family: Family, name: OptName, value: OptValue) -> Self {
        Self {
            family,
            name,
            value,
        }
    }

    /// Protocol level (`IPPROTO_IP` or `IPPROTO_IPV6`).
    #[must_use]
    pub const fn level(&self) -> libc::c_int {
        self.family.proto()
    }
}

/// Raw C structure backing an [`OptValue`].
#[derive(Clone, Copy)]
pub(crate) enum RawOpt {
    GroupReq(sys::group_req),
    GroupSourceReq(sys::group_source_req),
    IpMreqn(sys::ip_mreqn),
    IpMreq(libc::ip_mreq),
    Ipv6Mreq(libc::ipv6_mreq),
    Mfc(sys::mfcctl),
    Mf6c(sys::mf6cctl),
}

impl RawOpt {
    fn as_parts(&self) -> (*const libc::c_void, libc::socklen_t) {
        match self {
            Self::GroupReq(v) => parts(v),
            Self::GroupSourceReq(v) => parts(v),
            Self::IpMreqn(v) => parts(v),
            Self::IpMreq(v) => parts(v),
            Self::Ipv6Mreq(v) => parts(v),
            Self::Mfc(v) => parts(v),
            Self::Mf6c(v) => parts(v),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.as_parts().1 as usize
    }
}

fn parts<T>(v: &T) -> (*const libc::c_void, libc::socklen_t) {
    (
        (v as *const T).cast::<libc::c_void>(),
        mem::size_of::<T>() as libc::socklen_t,
    )
}

impl OptValue {
    /// Lower to the platform structure.
    pub(crate) fn lower(&self) -> RawOpt {
        match *self {
            Self::Group { interface, group } => RawOpt::GroupReq(sys::group_req {
                gr_interface: interface,
                gr_group: addr::to_sockaddr_storage(group),
            }),
            Self::SourceGroup {
                interface,
                source,
                group,
            } => RawOpt::GroupSourceReq(sys::group_source_req {
                gsr_interface: interface,
                gsr_group: addr::to_sockaddr_storage(group),
                gsr_source: addr::to_sockaddr_storage(source),
            }),
            Self::MreqnV4 { group, ifindex } => RawOpt::IpMreqn(sys::ip_mreqn {
                imr_multiaddr: addr::to_raw_v4(group),
                imr_address: addr::to_raw_v4(Ipv4Addr::UNSPECIFIED),
                imr_ifindex: ifindex as libc::c_int,
            }),
            Self::MreqV4 { group, local } => RawOpt::IpMreq(libc::ip_mreq {
                imr_multiaddr: addr::to_raw_v4(group),
                imr_interface: addr::to_raw_v4(local),
            }),
            Self::MreqV6 { group, ifindex } => RawOpt::Ipv6Mreq(libc::ipv6_mreq {
                ipv6mr_multiaddr: addr::to_raw_v6(group),
                ipv6mr_interface: ifindex as _,
            }),
            Self::Mfc(ctl) => {
                let mut mc = sys::mfcctl::new(
                    addr::to_raw_v4(ctl.origin),
                    addr::to_raw_v4(ctl.group),
                    ctl.parent,
                );
                mc.mfcc_ttls = ctl.ttls;
                RawOpt::Mfc(mc)
            }
            Self::Mf6c(ctl) => RawOpt::Mf6c(sys::mf6cctl {
                mf6cc_origin: addr::to_sockaddr_in6(ctl.origin),
                mf6cc_mcastgrp: addr::to_sockaddr_in6(ctl.group),
                mf6cc_parent: ctl.parent,
                mf6cc_ifset: sys::if_set {
                    ifs_bits: ctl.ifset.words(),
                },
            }),
        }
    }
}

/// Kernel transport: something that accepts socket options.
///
/// Implemented by:
/// - `socket2::Socket`, `UdpSocket`, `BorrowedFd`: real kernel sockets
/// - Recording fakes in tests
pub trait SetSockOpt {
    /// Descriptor reported in diagnostics.
    fn descriptor(&self) -> RawFd;

    /// Issue one `setsockopt()` call.
    fn set_opt(&self, opt: &SockOpt) -> io::Result<()>;
}

impl SetSockOpt for socket2::Socket {
    fn descriptor(&self) -> RawFd {
        self.as_raw_fd()
    }

    fn set_opt(&self, opt: &SockOpt) -> io::Result<()> {
        setsockopt_fd(self.as_raw_fd(), opt)
    }
}

impl SetSockOpt for UdpSocket {
    fn descriptor(&self) -> RawFd {
        self.as_raw_fd()
    }

    fn set_opt(&self, opt: &SockOpt) -> io::Result<()> {
        setsockopt_fd(self.as_raw_fd(), opt)
    }
}

impl SetSockOpt for BorrowedFd<'_> {
    fn descriptor(&self) -> RawFd {
        self.as_raw_fd()
    }

    fn set_opt(&self, opt: &SockOpt) -> io::Result<()> {
        setsockopt_fd(self.as_raw_fd(), opt)
    }
}

/// Lower `opt` and issue it on a raw descriptor.
pub fn setsockopt_fd(fd: RawFd, opt: &SockOpt) -> io::Result<()> {
    let raw = opt.value.lower();
    let (ptr, len) = raw.as_parts();

    // SAFETY:
    // - fd is a socket descriptor borrowed from a live socket owner
    // - ptr points at `raw`, a repr(C) structure matching the platform header
    //   for this option, alive until setsockopt returns
    // - len is exactly size_of that structure
    let ret = unsafe { libc::setsockopt(fd, opt.level(), opt.name.raw(), ptr, len) };

    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
