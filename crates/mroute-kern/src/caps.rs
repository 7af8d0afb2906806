// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Kernel capability selection.
//!
//! The group-membership API generation is resolved once, at startup, into a
//! [`KernelCaps`] value that every call reads. Platform identity is consulted
//! only by `sys`, which limits the build to targets with the RFC 3678 API.
//!
//! # Environment Variables
//!
//! `MROUTE_GROUP_API=<rfc3678|mreqn|mreq>` - Force a group-membership API
//! `MROUTE_IPV6=<on|off>` - Enable or disable IPv6 multicast membership

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Group-membership socket-option API generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GroupApi {
    /// RFC 3678 `group_req`/`group_source_req`, with ASM and SSM.
    Rfc3678,
    /// Legacy `ip_mreqn` (by ifindex) and `ipv6_mreq`, ASM only.
    Mreqn,
    /// Legacy `ip_mreq` (by local address) and `ipv6_mreq`, ASM only.
    Mreq,
}

impl GroupApi {
    /// Whether source-specific joins can be expressed at all.
    #[must_use]
    pub const fn supports_source_filter(self) -> bool {
        matches!(self, Self::Rfc3678)
    }
}

impl fmt::Display for GroupApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rfc3678 => write!(f, "rfc3678"),
            Self::Mreqn => write!(f, "mreqn"),
            Self::Mreq => write!(f, "mreq"),
        }
    }
}

/// Kernel capabilities the forwarding layer is allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KernelCaps {
    /// Group-membership API generation.
    pub group_api: GroupApi,
    /// IPv6 multicast host support (MLD joins on IPPROTO_IPV6).
    pub ipv6: bool,
}

impl Default for KernelCaps {
    fn default() -> Self {
        Self::detect()
    }
}

impl KernelCaps {
    /// Capabilities of the target platform. Every supported target has the
    /// RFC 3678 API, so it is always the default.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            group_api: GroupApi::Rfc3678,
            ipv6: true,
        }
    }

    /// Capabilities with an explicit API generation.
    #[must_use]
    pub const fn with_group_api(mut self, group_api: GroupApi) -> Self {
        self.group_api = group_api;
        self
    }

    /// Enable or disable IPv6 membership.
    #[must_use]
    pub const fn with_ipv6(mut self, ipv6: bool) -> Self {
        self.ipv6 = ipv6;
        self
    }

    /// Detected capabilities, overridden by the environment.
    ///
    /// Checks:
    /// - `MROUTE_GROUP_API` - `rfc3678`, `mreqn` or `mreq`
    /// - `MROUTE_IPV6` - `on`/`off`, `true`/`false`, `1`/`0`
    #[must_use]
    pub fn from_env() -> Self {
        let mut caps = Self::detect();

        if let Ok(val) = std::env::var("MROUTE_GROUP_API") {
            match Self::parse_group_api(&val) {
                Some(api) => caps.group_api = api,
                None => log::debug!(
                    "[CAPS] Ignoring invalid MROUTE_GROUP_API='{}', keeping {}",
                    val,
                    caps.group_api
                ),
            }
        }

        if let Ok(val) = std::env::var("MROUTE_IPV6") {
            match Self::parse_switch(&val) {
                Some(on) => caps.ipv6 = on,
                None => log::debug!("[CAPS] Ignoring invalid MROUTE_IPV6='{}'", val),
            }
        }

        log::debug!(
            "[CAPS] group API {}, IPv6 membership {}",
            caps.group_api,
            if caps.ipv6 { "on" } else { "off" }
        );
        caps
    }

    /// Parse a group-API name (case-insensitive).
    #[must_use]
    pub fn parse_group_api(s: &str) -> Option<GroupApi> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rfc3678" | "group_req" => Some(GroupApi::Rfc3678),
            "mreqn" | "ip_mreqn" => Some(GroupApi::Mreqn),
            "mreq" | "ip_mreq" => Some(GroupApi::Mreq),
            _ => None,
        }
    }

    fn parse_switch(s: &str) -> Option<bool> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "on" | "true" | "yes" => Some(true),
            "0" | "off" | "false" | "no" => Some(false),
            _ => None,
        }
    }
}
