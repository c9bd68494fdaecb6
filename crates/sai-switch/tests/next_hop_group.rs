//! Next-hop-group scenarios: add, ref, deref, delete, and neighbor
//! resolution in every order.

mod common;

use common::{hop, ip, neighbor, set_of, Fixture, INTF_1, INTF_2};
use pretty_assertions::assert_eq;
use sai_api::{SaiObjectType, SaiStatus};
use sai_fake::FakeSaiConfig;
use sai_switch::{
    HwSwitchEvent, InterfaceId, ManagerError, ManagerTableConfig, NeighborKey, NextHopGroupManagerConfig,
    ResourceKind,
};

#[test]
fn test_add_next_hop_group() {
    let mut fx = Fixture::new();
    let key = set_of(&[hop("10.0.0.1", INTF_1), hop("10.0.0.2", INTF_2)]);

    let handle = fx.table.inc_ref_or_add_next_hop_group(key.clone()).unwrap();

    assert_eq!(handle.use_count(), 1);
    assert_eq!(handle.key(), &key);
    assert_eq!(fx.table.next_hop_group_manager().group_handle(&key), Some(handle.id()));
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHopGroup), 1);
    assert!(fx.hw_members(&handle).is_empty());
}

#[test]
fn test_equal_sets_share_one_group() {
    let mut fx = Fixture::new();
    let a = hop("10.0.0.1", INTF_1);
    let b = hop("10.0.0.2", INTF_2);

    let first = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a, b])).unwrap();
    let second = fx.table.inc_ref_or_add_next_hop_group(set_of(&[b, a])).unwrap();

    assert_eq!(first.id(), second.id());
    assert_eq!(first.use_count(), 2);
    assert_eq!(fx.table.next_hop_group_manager().group_count(), 1);
    assert_eq!(fx.table.next_hop_group_manager().ref_count(&set_of(&[a, b])), Some(2));
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHopGroup), 1);
}

#[test]
fn test_ref_and_deref() {
    let mut fx = Fixture::new();
    let key = set_of(&[hop("10.0.0.1", INTF_1)]);

    let handle = fx.table.inc_ref_or_add_next_hop_group(key.clone()).unwrap();
    let copy = handle.clone();
    assert_eq!(handle.use_count(), 2);

    drop(copy);
    assert_eq!(handle.use_count(), 1);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHopGroup), 1);

    handle.release().unwrap();
    assert_eq!(fx.table.next_hop_group_manager().ref_count(&key), None);
}

#[test]
fn test_weak_reference_expires_at_zero() {
    let mut fx = Fixture::new();
    fx.resolve("10.0.0.1", INTF_1);
    let key = set_of(&[hop("10.0.0.1", INTF_1)]);

    let first = fx.table.inc_ref_or_add_next_hop_group(key.clone()).unwrap();
    let second = fx.table.inc_ref_or_add_next_hop_group(key.clone()).unwrap();
    let weak = first.downgrade();

    drop(first);
    assert!(!weak.is_expired());
    assert_eq!(weak.use_count(), 1);

    drop(second);
    assert!(weak.is_expired());
    assert_eq!(weak.use_count(), 0);
    assert!(weak.upgrade().is_none());
    assert_eq!(fx.table.next_hop_group_manager().group_count(), 0);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHopGroup), 0);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHopGroupMember), 0);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHop), 0);
}

#[test]
fn test_weak_upgrade_adds_reference() {
    let mut fx = Fixture::new();
    let handle = fx
        .table
        .inc_ref_or_add_next_hop_group(set_of(&[hop("10.0.0.1", INTF_1)]))
        .unwrap();
    let weak = handle.downgrade();

    let upgraded = weak.upgrade().unwrap();
    assert_eq!(upgraded.id(), handle.id());
    assert_eq!(handle.use_count(), 2);
}

#[test]
fn test_resolve_after_group_creation() {
    let mut fx = Fixture::new();
    let a = hop("10.0.0.1", INTF_1);
    let b = hop("10.0.0.2", INTF_2);
    let handle = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a, b])).unwrap();
    assert!(handle.members().is_empty());

    fx.resolve("10.0.0.1", INTF_1);
    assert_eq!(handle.members(), vec![a]);
    assert_eq!(fx.hw_members(&handle).len(), 1);

    fx.resolve("10.0.0.2", INTF_2);
    assert_eq!(handle.members(), vec![a, b]);
    assert_eq!(fx.hw_members(&handle).len(), 2);

    fx.unresolve("10.0.0.1", INTF_1);
    assert_eq!(handle.members(), vec![b]);
    assert_eq!(fx.hw_members(&handle).len(), 1);
}

#[test]
fn test_resolution_order_does_not_matter() {
    let a = hop("10.0.0.1", INTF_1);
    let b = hop("10.0.0.2", INTF_2);

    let mut forward = Fixture::new();
    let fwd = forward.table.inc_ref_or_add_next_hop_group(set_of(&[a, b])).unwrap();
    forward.resolve("10.0.0.1", INTF_1);
    forward.resolve("10.0.0.2", INTF_2);

    let mut reverse = Fixture::new();
    let rev = reverse.table.inc_ref_or_add_next_hop_group(set_of(&[a, b])).unwrap();
    reverse.resolve("10.0.0.2", INTF_2);
    reverse.resolve("10.0.0.1", INTF_1);

    assert_eq!(fwd.members(), rev.members());
    assert_eq!(forward.hw_members(&fwd).len(), reverse.hw_members(&rev).len());
}

#[test]
fn test_resolve_before_group_creation() {
    let a = hop("10.0.0.1", INTF_1);
    let b = hop("10.0.0.2", INTF_2);

    let mut before = Fixture::new();
    before.resolve("10.0.0.1", INTF_1);
    before.resolve("10.0.0.2", INTF_2);
    let early = before.table.inc_ref_or_add_next_hop_group(set_of(&[a, b])).unwrap();

    let mut after = Fixture::new();
    let late = after.table.inc_ref_or_add_next_hop_group(set_of(&[a, b])).unwrap();
    after.resolve("10.0.0.1", INTF_1);
    after.resolve("10.0.0.2", INTF_2);

    assert_eq!(early.members(), vec![a, b]);
    assert_eq!(early.members(), late.members());
    assert_eq!(before.hw_members(&early).len(), 2);
}

#[test]
fn test_partial_resolution_before_creation() {
    let mut fx = Fixture::new();
    let a = hop("10.0.0.1", INTF_1);
    let b = hop("10.0.0.2", INTF_2);
    fx.resolve("10.0.0.2", INTF_2);

    let handle = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a, b])).unwrap();
    assert_eq!(handle.members(), vec![b]);

    fx.resolve("10.0.0.1", INTF_1);
    assert_eq!(handle.members(), vec![a, b]);
}

#[test]
fn test_unrelated_neighbor_leaves_group_alone() {
    let mut fx = Fixture::new();
    let handle = fx
        .table
        .inc_ref_or_add_next_hop_group(set_of(&[hop("10.0.0.1", INTF_1)]))
        .unwrap();

    fx.resolve("10.0.0.1", INTF_2);
    fx.resolve("10.0.0.9", INTF_1);
    assert!(handle.members().is_empty());
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHopGroupMember), 0);
}

#[test]
fn test_groups_share_next_hop_objects() {
    let mut fx = Fixture::new();
    let a = hop("10.0.0.1", INTF_1);
    let b = hop("10.0.0.2", INTF_2);
    fx.resolve("10.0.0.1", INTF_1);

    let only_a = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a])).unwrap();
    let both = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a, b])).unwrap();
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHop), 1);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHopGroupMember), 2);
    assert_eq!(fx.table.next_hop_group_manager().next_hop_count(), 1);

    drop(only_a);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHop), 1);
    assert_eq!(both.members(), vec![a]);

    fx.unresolve("10.0.0.1", INTF_1);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHop), 0);
    assert!(both.members().is_empty());
}

#[test]
fn test_weighted_members() {
    let mut fx = Fixture::new();
    let a = hop("10.0.0.1", INTF_1).with_weight(3);
    let plain = hop("10.0.0.1", INTF_1);
    fx.resolve("10.0.0.1", INTF_1);

    let weighted = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a])).unwrap();
    let ecmp = fx.table.inc_ref_or_add_next_hop_group(set_of(&[plain])).unwrap();
    assert_ne!(weighted.id(), ecmp.id());
    assert_eq!(weighted.members(), vec![a]);
    assert_eq!(ecmp.members(), vec![plain]);
}

#[test]
fn test_empty_set_is_invalid() {
    let mut fx = Fixture::new();
    let err = fx.table.inc_ref_or_add_next_hop_group(set_of(&[])).unwrap_err();
    assert!(matches!(err, ManagerError::InvalidParameter { .. }));
}

#[test]
fn test_failed_initial_member_rolls_back() {
    let fake_config = FakeSaiConfig {
        max_next_hop_group_members: Some(1),
        ..FakeSaiConfig::default()
    };
    let mut fx = Fixture::with_configs(fake_config, ManagerTableConfig::default());
    fx.resolve("10.0.0.1", INTF_1);
    fx.resolve("10.0.0.2", INTF_2);

    let key = set_of(&[hop("10.0.0.1", INTF_1), hop("10.0.0.2", INTF_2)]);
    let err = fx.table.inc_ref_or_add_next_hop_group(key.clone()).unwrap_err();

    assert!(matches!(err, ManagerError::ResourceExhausted { .. }));
    assert_eq!(fx.table.next_hop_group_manager().ref_count(&key), None);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHopGroup), 0);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHopGroupMember), 0);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHop), 0);
}

#[test]
fn test_member_add_failure_on_resolution_is_surfaced() {
    let fake_config = FakeSaiConfig {
        max_next_hop_group_members: Some(1),
        ..FakeSaiConfig::default()
    };
    let mut fx = Fixture::with_configs(fake_config, ManagerTableConfig::default());
    let a = hop("10.0.0.1", INTF_1);
    let b = hop("10.0.0.2", INTF_2);
    let handle = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a, b])).unwrap();

    fx.resolve("10.0.0.1", INTF_1);
    let err = fx.table.add_neighbor(&common::neighbor("10.0.0.2", INTF_2)).unwrap_err();
    assert!(matches!(err, ManagerError::ResourceExhausted { .. }));

    // The neighbor itself is programmed; only the member is missing.
    assert_eq!(fx.fake.neighbor_count(), 2);
    assert_eq!(handle.members(), vec![a]);
    assert_eq!(handle.use_count(), 1);
}

#[test]
fn test_group_limit_from_config() {
    let config = ManagerTableConfig {
        next_hop_group: NextHopGroupManagerConfig { max_groups: Some(1) },
        ..ManagerTableConfig::default()
    };
    let mut fx = Fixture::with_configs(FakeSaiConfig::default(), config);

    let _first = fx
        .table
        .inc_ref_or_add_next_hop_group(set_of(&[hop("10.0.0.1", INTF_1)]))
        .unwrap();
    let err = fx
        .table
        .inc_ref_or_add_next_hop_group(set_of(&[hop("10.0.0.2", INTF_2)]))
        .unwrap_err();
    assert!(matches!(err, ManagerError::ResourceExhausted { .. }));
}

#[test]
fn test_hardware_table_full_on_group_create() {
    let fake_config = FakeSaiConfig {
        max_next_hop_groups: Some(0),
        ..FakeSaiConfig::default()
    };
    let mut fx = Fixture::with_configs(fake_config, ManagerTableConfig::default());

    let err = fx
        .table
        .inc_ref_or_add_next_hop_group(set_of(&[hop("10.0.0.1", INTF_1)]))
        .unwrap_err();
    assert!(matches!(err, ManagerError::ResourceExhausted { .. }));
    assert_eq!(fx.table.next_hop_group_manager().group_count(), 0);
}

#[test]
fn test_unresolve_neighbor() {
    let mut fx = Fixture::new();
    let a = hop("10.0.0.1", INTF_1);
    let b = hop("10.0.0.2", INTF_2);
    fx.resolve("10.0.0.1", INTF_1);
    fx.resolve("10.0.0.2", INTF_2);
    let handle = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a, b])).unwrap();
    assert_eq!(fx.hw_members(&handle).len(), 2);

    fx.unresolve("10.0.0.2", INTF_2);
    assert_eq!(handle.members(), vec![a]);
    assert_eq!(fx.hw_members(&handle).len(), 1);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHop), 1);

    fx.unresolve("10.0.0.1", INTF_1);
    assert!(handle.members().is_empty());
    assert!(fx.hw_members(&handle).is_empty());
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHop), 0);
    assert_eq!(handle.use_count(), 1);
}

#[test]
fn test_deref_then_resolve() {
    let mut fx = Fixture::new();
    let a = hop("10.0.0.1", INTF_1);
    let b = hop("10.0.0.2", INTF_2);
    let handle = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a, b])).unwrap();
    {
        let second = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a, b])).unwrap();
        assert_eq!(second.use_count(), 2);
    }
    assert_eq!(handle.use_count(), 1);

    fx.resolve("10.0.0.1", INTF_1);
    fx.resolve("10.0.0.2", INTF_2);
    assert_eq!(handle.members(), vec![a, b]);
    assert_eq!(fx.hw_members(&handle).len(), 2);
    assert_eq!(handle.use_count(), 1);
}

#[test]
fn test_delete_then_resolve() {
    let mut fx = Fixture::new();
    let key = set_of(&[hop("10.0.0.1", INTF_1), hop("10.0.0.2", INTF_2)]);
    let weak = {
        let handle = fx.table.inc_ref_or_add_next_hop_group(key.clone()).unwrap();
        handle.downgrade()
    };
    assert!(weak.is_expired());

    fx.resolve("10.0.0.1", INTF_1);
    fx.resolve("10.0.0.2", INTF_2);

    assert_eq!(fx.fake.neighbor_count(), 2);
    assert_eq!(fx.table.next_hop_group_manager().ref_count(&key), None);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHopGroup), 0);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHopGroupMember), 0);
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHop), 0);
}

#[test]
fn test_next_hop_on_interface_without_router_interface() {
    let mut fx = Fixture::new();
    let orphan = hop("10.0.0.1", InterfaceId(9));
    let handle = fx.table.inc_ref_or_add_next_hop_group(set_of(&[orphan])).unwrap();
    assert!(handle.members().is_empty());

    let err = fx.table.add_neighbor(&neighbor("10.0.0.1", InterfaceId(9))).unwrap_err();
    assert!(matches!(err, ManagerError::NotFound { kind: ResourceKind::RouterInterface, .. }));
    assert!(handle.members().is_empty());
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHop), 0);
}

#[test]
fn test_resolve_retry_adds_member_that_failed() {
    let fake_config = FakeSaiConfig {
        max_next_hop_group_members: Some(1),
        ..FakeSaiConfig::default()
    };
    let mut fx = Fixture::with_configs(fake_config, ManagerTableConfig::default());
    let a = hop("10.0.0.1", INTF_1);
    let first = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a])).unwrap();
    let second = fx
        .table
        .inc_ref_or_add_next_hop_group(set_of(&[a, hop("10.0.0.2", INTF_2)]))
        .unwrap();

    let event = HwSwitchEvent::NeighborResolved(neighbor("10.0.0.1", INTF_1));
    let err = fx.table.handle_event(event.clone()).unwrap_err();
    assert!(matches!(err, ManagerError::ResourceExhausted { .. }));

    // One group took the only member slot; free it and retry.
    let (filled, starved) = if first.members().is_empty() {
        (second, first)
    } else {
        (first, second)
    };
    assert!(starved.members().is_empty());
    drop(filled);

    fx.table.handle_event(event).unwrap();
    assert_eq!(starved.members(), vec![a]);
    assert_eq!(fx.hw_members(&starved).len(), 1);
    assert_eq!(fx.fake.neighbor_count(), 1);
}

#[test]
fn test_unresolve_retry_removes_member_that_failed() {
    let mut fx = Fixture::new();
    let a = hop("10.0.0.1", INTF_1);
    fx.resolve("10.0.0.1", INTF_1);
    let handle = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a])).unwrap();
    assert_eq!(handle.members(), vec![a]);

    fx.fake.fail_next_remove(SaiObjectType::NextHopGroupMember, SaiStatus::Failure);
    let event = HwSwitchEvent::NeighborUnresolved(NeighborKey::new(ip("10.0.0.1"), INTF_1));
    assert!(fx.table.handle_event(event.clone()).is_err());
    assert_eq!(fx.fake.neighbor_count(), 0);
    assert_eq!(handle.members(), vec![a]);
    assert_eq!(fx.hw_members(&handle).len(), 1);

    fx.table.handle_event(event).unwrap();
    assert!(handle.members().is_empty());
    assert!(fx.hw_members(&handle).is_empty());
    assert_eq!(fx.fake.object_count(SaiObjectType::NextHop), 0);
}
