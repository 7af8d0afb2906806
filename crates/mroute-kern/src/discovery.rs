// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Router-discovery collaborator (RFC 4286 advertisements).
//!
//! The advertiser itself lives outside this crate. Route installation only
//! calls its enable/disable entry points after a successful change to an
//! active IPv4 route.

use std::collections::BTreeMap;

/// Enable/disable entry points of a router-discovery advertiser.
///
/// Fire-and-forget: nothing is returned to the route installer.
pub trait RouterDiscovery {
    /// Start (or keep) advertising on an inbound VIF.
    fn enable(&mut self, vif: u16);

    /// Stop advertising on an inbound VIF.
    fn disable(&mut self, vif: u16);
}

/// Discovery sink for hosts that do not advertise.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDiscovery;

impl RouterDiscovery for NullDiscovery {
    fn enable(&mut self, _vif: u16) {}

    fn disable(&mut self, _vif: u16) {}
}

/// Per-VIF activity counter in front of an advertiser.
///
/// Every active route on a VIF holds one reference; the inner advertiser only
/// sees the first enable and the last disable for each VIF.
#[derive(Debug, Default)]
pub struct VifActivity<D> {
    inner: D,
    refs: BTreeMap<u16, usize>,
}

impl<D: RouterDiscovery> VifActivity<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            refs: BTreeMap::new(),
        }
    }

    /// Whether any active route uses `vif` as inbound.
    #[must_use]
    pub fn is_active(&self, vif: u16) -> bool {
        self.refs.contains_key(&vif)
    }

    /// Number of active routes with `vif` as inbound.
    #[must_use]
    pub fn route_count(&self, vif: u16) -> usize {
        self.refs.get(&vif).copied().unwrap_or(0)
    }

    /// VIFs currently advertised, in ascending order.
    pub fn active_vifs(&self) -> impl Iterator<Item = u16> + '_ {
        self.refs.keys().copied()
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: RouterDiscovery> RouterDiscovery for VifActivity<D> {
    fn enable(&mut self, vif: u16) {
        let count = self.refs.entry(vif).or_insert(0);
        *count += 1;
        if *count == 1 {
            log::debug!("[MRDISC] Enable on VIF {}", vif);
            self.inner.enable(vif);
        }
    }

    fn disable(&mut self, vif: u16) {
        match self.refs.get_mut(&vif) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                self.refs.remove(&vif);
                log::debug!("[MRDISC] Disable on VIF {}", vif);
                self.inner.disable(vif);
            }
            None => log::debug!("[MRDISC] Disable on idle VIF {}, ignoring", vif),
        }
    }
}
