// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Linux multicast ABI (`<netinet/in.h>`, `<linux/mroute.h>`, `<linux/mroute6.h>`).

use libc::c_int;

use super::vifi_t;

// RFC 3678 protocol-independent options, shared by IPPROTO_IP and IPPROTO_IPV6
pub const MCAST_JOIN_GROUP: c_int = 42;
pub const MCAST_LEAVE_GROUP: c_int = 45;
pub const MCAST_JOIN_SOURCE_GROUP: c_int = 46;
pub const MCAST_LEAVE_SOURCE_GROUP: c_int = 47;

pub const IP_ADD_MEMBERSHIP: c_int = libc::IP_ADD_MEMBERSHIP;
pub const IP_DROP_MEMBERSHIP: c_int = libc::IP_DROP_MEMBERSHIP;
pub const IPV6_JOIN_GROUP: c_int = libc::IPV6_ADD_MEMBERSHIP;
pub const IPV6_LEAVE_GROUP: c_int = libc::IPV6_DROP_MEMBERSHIP;

const MRT_BASE: c_int = 200;
pub const MRT_ADD_MFC: c_int = MRT_BASE + 4;
pub const MRT_DEL_MFC: c_int = MRT_BASE + 5;

const MRT6_BASE: c_int = 200;
pub const MRT6_ADD_MFC: c_int = MRT6_BASE + 4;
pub const MRT6_DEL_MFC: c_int = MRT6_BASE + 5;

pub const MAXVIFS: usize = 32;
pub const MAXMIFS: usize = 32;
pub const IF_SETSIZE: usize = 256;

pub use libc::ip_mreqn;

/// IPv4 forwarding-cache control (`struct mfcctl`).
#[repr(C)]
#[derive(Clone, Copy)]
pub struct mfcctl {
    pub mfcc_origin: libc::in_addr,
    pub mfcc_mcastgrp: libc::in_addr,
    pub mfcc_parent: vifi_t,
    pub mfcc_ttls: [u8; MAXVIFS],
    pub mfcc_pkt_cnt: libc::c_uint,
    pub mfcc_byte_cnt: libc::c_uint,
    pub mfcc_wrong_if: libc::c_uint,
    pub mfcc_expire: c_int,
}

impl mfcctl {
    pub(crate) fn new(origin: libc::in_addr, group: libc::in_addr, parent: vifi_t) -> Self {
        Self {
            mfcc_origin: origin,
            mfcc_mcastgrp: group,
            mfcc_parent: parent,
            mfcc_ttls: [0; MAXVIFS],
            mfcc_pkt_cnt: 0,
            mfcc_byte_cnt: 0,
            mfcc_wrong_if: 0,
            mfcc_expire: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{group_req, group_source_req, if_set, mf6cctl};
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_mfcctl_layout() {
        assert_eq!(offset_of!(mfcctl, mfcc_origin), 0);
        assert_eq!(offset_of!(mfcctl, mfcc_mcastgrp), 4);
        assert_eq!(offset_of!(mfcctl, mfcc_parent), 8);
        assert_eq!(offset_of!(mfcctl, mfcc_ttls), 10);
        assert_eq!(offset_of!(mfcctl, mfcc_pkt_cnt), 44);
        assert_eq!(size_of::<mfcctl>(), 60);
    }

    #[test]
    fn test_mf6cctl_layout() {
        assert_eq!(size_of::<if_set>(), 32);
        assert_eq!(offset_of!(mf6cctl, mf6cc_mcastgrp), 28);
        assert_eq!(offset_of!(mf6cctl, mf6cc_parent), 56);
        assert_eq!(offset_of!(mf6cctl, mf6cc_ifset), 60);
        assert_eq!(size_of::<mf6cctl>(), 92);
    }

    #[test]
    fn test_group_req_layout() {
        let align = std::mem::align_of::<libc::sockaddr_storage>();
        assert_eq!(offset_of!(group_req, gr_group), align.max(4));
        assert_eq!(
            offset_of!(group_source_req, gsr_source),
            offset_of!(group_source_req, gsr_group) + size_of::<libc::sockaddr_storage>()
        );
    }

    #[test]
    fn test_option_numbers() {
        assert_eq!(MRT_ADD_MFC, 204);
        assert_eq!(MRT_DEL_MFC, 205);
        assert_eq!(MRT6_ADD_MFC, 204);
        assert_eq!(IP_ADD_MEMBERSHIP, 35);
        assert_eq!(IPV6_JOIN_GROUP, 20);
    }
}
