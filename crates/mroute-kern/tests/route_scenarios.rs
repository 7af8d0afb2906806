// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Forwarding-cache add/delete scenarios with a fake kernel.

mod common;

use std::net::{IpAddr, Ipv4Addr};

use common::{init_logging, DiscoveryCall, RecordingDiscovery, RecordingSocket};
use mroute_kern::{
    build_mf6c, mroute4, mroute6, IfSet, KernelError, MulticastRoute, OptName, OptValue,
    RouteAction, RouteOutcome, VifActivity, MAX_VIFS,
};

fn v4_route(inbound: u16, ttls: &[u8]) -> MulticastRoute {
    let mut route = MulticastRoute::new(
        IpAddr::V4(Ipv4Addr::new(192, 168, 2, 10)),
        IpAddr::V4(Ipv4Addr::new(225, 1, 2, 3)),
        inbound,
    );
    for (vif, ttl) in ttls.iter().enumerate() {
        route.add_outbound(vif, *ttl);
    }
    route
}

fn v6_route(ttls: &[u8]) -> MulticastRoute {
    let mut route = MulticastRoute::new(
        "2001:db8::a".parse().expect("valid v6"),
        "ff0e::1:3".parse().expect("valid v6"),
        1,
    );
    for (vif, ttl) in ttls.iter().enumerate() {
        route.add_outbound(vif, *ttl);
    }
    route
}

#[test]
fn test_v4_add_then_delete_round_trip() {
    init_logging();
    let sock = RecordingSocket::new(5);
    let mut disc = RecordingDiscovery::default();
    let route = v4_route(2, &[0, 0, 5, 0]);

    let added = mroute4(Some(&sock), RouteAction::Add, &route, true, &mut disc).expect("add");
    assert_eq!(added, RouteOutcome::Applied);
    assert_eq!(disc.calls, vec![DiscoveryCall::Enable(2)]);

    let removed = mroute4(Some(&sock), RouteAction::Delete, &route, true, &mut disc).expect("del");
    assert_eq!(removed, RouteOutcome::Applied);
    assert_eq!(
        disc.calls,
        vec![DiscoveryCall::Enable(2), DiscoveryCall::Disable(2)]
    );

    let calls = sock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].name, OptName::MrtAddMfc);
    assert_eq!(calls[1].name, OptName::MrtDelMfc);
    assert_eq!(calls[0].value, calls[1].value);
    match calls[0].value {
        OptValue::Mfc(ctl) => {
            assert_eq!(ctl.origin, Ipv4Addr::new(192, 168, 2, 10));
            assert_eq!(ctl.group, Ipv4Addr::new(225, 1, 2, 3));
            assert_eq!(ctl.parent, 2);
            assert_eq!(&ctl.ttls[..4], &[0, 0, 5, 0]);
            assert!(ctl.ttls[4..].iter().all(|t| *t == 0));
        }
        other => panic!("unexpected value {:?}", other),
    }
}

#[test]
fn test_v4_delete_of_absent_entry() {
    init_logging();
    let sock = RecordingSocket::new(5).then(Some(libc::ENOENT));
    let mut disc = RecordingDiscovery::default();
    let route = v4_route(2, &[0, 0, 5, 0]);

    let outcome = mroute4(Some(&sock), RouteAction::Delete, &route, true, &mut disc)
        .expect("absent entry is not an error");
    assert_eq!(outcome, RouteOutcome::EntryAbsent);
    assert_eq!(sock.attempts(), 1);
    // nothing was removed, so discovery state is left alone
    assert!(disc.calls.is_empty());
}

#[test]
fn test_v4_failure_skips_discovery() {
    init_logging();
    let sock = RecordingSocket::new(5).then(Some(libc::EEXIST));
    let mut disc = RecordingDiscovery::default();
    let route = v4_route(1, &[0, 3]);

    let err = mroute4(Some(&sock), RouteAction::Add, &route, true, &mut disc).expect_err("EEXIST");
    assert!(matches!(err, KernelError::Rejected { op: OptName::MrtAddMfc, fd: 5, .. }));
    assert!(disc.calls.is_empty());
}

#[test]
fn test_v4_inactive_route_skips_discovery() {
    let sock = RecordingSocket::new(5);
    let mut disc = RecordingDiscovery::default();
    let route = v4_route(3, &[]);

    mroute4(Some(&sock), RouteAction::Add, &route, true, &mut disc).expect("add");
    mroute4(Some(&sock), RouteAction::Delete, &route, true, &mut disc).expect("del");
    assert_eq!(sock.attempts(), 2);
    assert!(disc.calls.is_empty());
}

#[test]
fn test_v4_missing_socket() {
    let mut disc = RecordingDiscovery::default();
    let route = v4_route(2, &[0, 0, 5]);

    let outcome = mroute4::<RecordingSocket, _>(None, RouteAction::Add, &route, true, &mut disc)
        .expect("disabled family is benign");
    assert_eq!(outcome, RouteOutcome::NoTransport);
    assert!(disc.calls.is_empty());
}

#[test]
fn test_v4_discovery_refcount_across_routes() {
    let sock = RecordingSocket::new(5);
    let mut activity = VifActivity::new(RecordingDiscovery::default());
    let a = v4_route(2, &[0, 1]);
    let mut b = v4_route(2, &[0, 0, 1]);
    b.group = IpAddr::V4(Ipv4Addr::new(225, 1, 2, 4));

    mroute4(Some(&sock), RouteAction::Add, &a, true, &mut activity).expect("add a");
    mroute4(Some(&sock), RouteAction::Add, &b, true, &mut activity).expect("add b");
    mroute4(Some(&sock), RouteAction::Delete, &a, true, &mut activity).expect("del a");
    assert!(activity.is_active(2));

    mroute4(Some(&sock), RouteAction::Delete, &b, true, &mut activity).expect("del b");
    assert!(!activity.is_active(2));
    assert_eq!(
        activity.into_inner().calls,
        vec![DiscoveryCall::Enable(2), DiscoveryCall::Disable(2)]
    );
}

#[test]
fn test_v6_add_delete_and_absent() {
    init_logging();
    let sock = RecordingSocket::new(6).then(None).then(Some(libc::ENOENT));
    let route = v6_route(&[0, 2, 0, 9]);

    let added = mroute6(Some(&sock), RouteAction::Add, &route).expect("add");
    assert_eq!(added, RouteOutcome::Applied);
    let removed = mroute6(Some(&sock), RouteAction::Delete, &route).expect("absent");
    assert_eq!(removed, RouteOutcome::EntryAbsent);

    let calls = sock.calls();
    assert_eq!(calls[0].name, OptName::Mrt6AddMfc);
    assert_eq!(calls[1].name, OptName::Mrt6DelMfc);
    match calls[0].value {
        OptValue::Mf6c(ctl) => {
            assert_eq!(ctl.parent, 1);
            assert!(ctl.ifset.is_set(1));
            assert!(ctl.ifset.is_set(3));
            assert!(!ctl.ifset.is_set(0));
            assert!(!ctl.ifset.is_set(2));
        }
        other => panic!("unexpected value {:?}", other),
    }
}

#[test]
fn test_v6_failure_and_missing_socket() {
    init_logging();
    let sock = RecordingSocket::new(6).then(Some(libc::EINVAL));
    let route = v6_route(&[1]);

    let err = mroute6(Some(&sock), RouteAction::Delete, &route).expect_err("EINVAL");
    assert_eq!(err.errno(), Some(libc::EINVAL));

    let outcome = mroute6::<RecordingSocket>(None, RouteAction::Add, &route).expect("benign");
    assert_eq!(outcome, RouteOutcome::NoTransport);
}

#[test]
fn test_family_mismatch_never_reaches_kernel() {
    let sock = RecordingSocket::new(5);
    let mut disc = RecordingDiscovery::default();

    let err = mroute4(Some(&sock), RouteAction::Add, &v6_route(&[1]), true, &mut disc)
        .expect_err("v6 route on v4 socket");
    assert!(matches!(err, KernelError::FamilyMismatch { .. }));
    let err = mroute6(Some(&sock), RouteAction::Add, &v4_route(0, &[0, 1])).expect_err("v4 on v6");
    assert!(matches!(err, KernelError::FamilyMismatch { .. }));
    assert_eq!(sock.attempts(), 0);
}

#[test]
fn test_ifset_matches_ttl_presence() {
    for _ in 0..200 {
        let mut route = v6_route(&[]);
        for slot in route.ttl.iter_mut() {
            *slot = if fastrand::bool() { fastrand::u8(1..) } else { 0 };
        }

        let opt = build_mf6c(RouteAction::Add, &route).expect("v6 route");
        let ifset = match opt.value {
            OptValue::Mf6c(ctl) => ctl.ifset,
            other => panic!("unexpected value {:?}", other),
        };

        for i in 0..MAX_VIFS {
            assert_eq!(ifset.is_set(i), route.ttl[i] != 0, "bit {}", i);
        }
        for i in MAX_VIFS..IfSet::CAPACITY {
            assert!(!ifset.is_set(i), "bit {} beyond VIF range", i);
        }
    }
}

#[test]
fn test_unrepresentable_vif_is_dropped() {
    let mut route = v4_route(0, &[]);
    assert!(!route.add_outbound(MAX_VIFS, 8));
    assert!(!route.is_active());
    assert!(route.add_outbound(MAX_VIFS - 1, 8));
    assert_eq!(route.outbound().collect::<Vec<_>>(), vec![(MAX_VIFS - 1, 8)]);
}
