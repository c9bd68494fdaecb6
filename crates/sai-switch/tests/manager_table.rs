//! Manager table wiring, hardware events and teardown.

mod common;

use common::{hop, ip, mac, neighbor, port_config, set_of, Fixture, INTF_1, INTF_2};
use pretty_assertions::assert_eq;
use sai_api::api::neighbor::{NeighborAttrId, NeighborAttribute};
use sai_api::SaiObjectType;
use sai_fake::FakeSaiConfig;
use sai_switch::{
    HwSwitchEvent, HwSwitchEventObserver, ManagerError, ManagerTableConfig, NeighborKey, PortId,
    ResourceKind, VlanId,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Seen {
    Link(PortId, bool),
    Packet(PortId, Vec<u8>),
}

struct Recorder(Rc<RefCell<Vec<Seen>>>);

impl HwSwitchEventObserver for Recorder {
    fn link_state_changed(&mut self, port: PortId, up: bool) {
        self.0.borrow_mut().push(Seen::Link(port, up));
    }

    fn packet_received(&mut self, port: PortId, frame: &[u8]) {
        self.0.borrow_mut().push(Seen::Packet(port, frame.to_vec()));
    }
}

/// Observer relying on the default no-op methods.
struct Silent;

impl HwSwitchEventObserver for Silent {}

#[test]
fn test_port_add_twice_keeps_original_mapping() {
    let mut fx = Fixture::new();
    let ports = fx.table.port_manager_mut();
    let handle = ports.port_handle(PortId(1)).unwrap();

    let err = ports.add(&port_config(PortId(1))).unwrap_err();
    assert!(matches!(
        err,
        ManagerError::DuplicateResource {
            kind: ResourceKind::Port,
            ..
        }
    ));
    assert_eq!(ports.port_handle(PortId(1)), Some(handle));
    assert_eq!(ports.get_port_id(handle), Some(PortId(1)));
    assert_eq!(fx.fake.object_count(SaiObjectType::Port), 2);
}

#[test]
fn test_port_remove_unknown_leaves_mappings() {
    let mut fx = Fixture::new();
    let ports = fx.table.port_manager_mut();
    let before: Vec<_> = [PortId(1), PortId(2)]
        .iter()
        .map(|id| ports.port_handle(*id))
        .collect();

    let err = ports.remove(PortId(42)).unwrap_err();
    assert!(matches!(err, ManagerError::NotFound { .. }));

    let after: Vec<_> = [PortId(1), PortId(2)]
        .iter()
        .map(|id| ports.port_handle(*id))
        .collect();
    assert_eq!(before, after);
    assert_eq!(ports.len(), 2);
}

#[test]
fn test_port_in_use_keeps_bridge_port() {
    let mut fx = Fixture::new();
    assert_eq!(fx.fake.object_count(SaiObjectType::BridgePort), 2);

    // The router interface on the port still references it.
    let ports = fx.table.port_manager_mut();
    assert!(ports.remove(PortId(1)).is_err());
    assert!(ports.port_handle(PortId(1)).is_some());
    assert!(ports.get_port(PortId(1)).and_then(|port| port.bridge_port()).is_some());
    assert_eq!(fx.fake.object_count(SaiObjectType::BridgePort), 2);
}

#[test]
fn test_port_vlan_through_table() {
    let mut fx = Fixture::new();
    let ports = fx.table.port_manager_mut();

    ports.set_port_vlan(PortId(2), VlanId(20)).unwrap();
    assert_eq!(ports.port_vlan(PortId(2)), Some(VlanId(20)));
    assert_eq!(ports.port_vlan(PortId(1)), None);
    assert!(matches!(
        ports.set_port_vlan(PortId(2), VlanId(0)),
        Err(ManagerError::InvalidParameter { .. })
    ));
}

#[test]
fn test_duplicate_resolution_event_is_noop() {
    let mut fx = Fixture::new();
    let a = hop("10.0.0.1", INTF_1);
    let handle = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a])).unwrap();

    let event = HwSwitchEvent::NeighborResolved(neighbor("10.0.0.1", INTF_1));
    fx.table.handle_event(event.clone()).unwrap();
    let calls = fx.fake.set_attribute_calls();
    fx.table.handle_event(event).unwrap();

    assert_eq!(handle.members(), vec![a]);
    assert_eq!(fx.hw_members(&handle).len(), 1);
    assert_eq!(fx.fake.set_attribute_calls(), calls);
    assert_eq!(fx.fake.neighbor_count(), 1);
}

#[test]
fn test_direct_duplicate_neighbor_add_fails() {
    let mut fx = Fixture::new();
    fx.resolve("10.0.0.1", INTF_1);

    let err = fx.table.add_neighbor(&neighbor("10.0.0.1", INTF_1)).unwrap_err();
    assert!(matches!(
        err,
        ManagerError::DuplicateResource {
            kind: ResourceKind::Neighbor,
            ..
        }
    ));
}

#[test]
fn test_resolution_with_new_mac_changes_neighbor() {
    let mut fx = Fixture::new();
    let a = hop("10.0.0.1", INTF_1);
    let handle = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a])).unwrap();
    fx.resolve("10.0.0.1", INTF_1);
    let members = fx.hw_members(&handle);

    let mut moved = neighbor("10.0.0.1", INTF_1);
    moved.mac = mac(0x77);
    fx.table.handle_event(HwSwitchEvent::NeighborResolved(moved)).unwrap();

    let key = moved.key();
    let entry = *fx.table.neighbor_manager().get_neighbor(&key).unwrap().entry();
    let got = fx
        .table
        .api()
        .neighbor_api()
        .get_attribute(&entry, NeighborAttrId::DstMacAddress)
        .unwrap();
    assert_eq!(got, NeighborAttribute::DstMacAddress(mac(0x77)));
    assert_eq!(fx.hw_members(&handle), members);
}

#[test]
fn test_unresolve_event() {
    let mut fx = Fixture::new();
    let a = hop("10.0.0.1", INTF_1);
    let handle = fx.table.inc_ref_or_add_next_hop_group(set_of(&[a])).unwrap();
    fx.resolve("10.0.0.1", INTF_1);

    let key = NeighborKey::new(ip("10.0.0.1"), INTF_1);
    fx.table.handle_event(HwSwitchEvent::NeighborUnresolved(key)).unwrap();
    assert!(handle.members().is_empty());
    assert_eq!(fx.fake.neighbor_count(), 0);

    // Already gone.
    fx.table.handle_event(HwSwitchEvent::NeighborUnresolved(key)).unwrap();
    let err = fx.table.remove_neighbor(&key).unwrap_err();
    assert!(matches!(err, ManagerError::NotFound { .. }));
}

#[test]
fn test_link_state_reaches_observers() {
    let mut fx = Fixture::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    fx.table.add_event_observer(Box::new(Recorder(seen.clone())));
    fx.table.add_event_observer(Box::new(Silent));
    let port = fx.table.port_manager().port_handle(PortId(2)).unwrap();

    fx.table
        .handle_event(HwSwitchEvent::LinkStateChanged { port, up: true })
        .unwrap();

    assert_eq!(*seen.borrow(), vec![Seen::Link(PortId(2), true)]);
    assert!(fx.table.port_manager().get_port(PortId(2)).unwrap().oper_up());
}

#[test]
fn test_packet_reaches_observers() {
    let mut fx = Fixture::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let id = fx.table.add_event_observer(Box::new(Recorder(seen.clone())));
    let port = fx.table.port_manager().port_handle(PortId(1)).unwrap();

    fx.table
        .handle_event(HwSwitchEvent::PacketReceived {
            port,
            frame: vec![0xde, 0xad],
        })
        .unwrap();
    assert_eq!(*seen.borrow(), vec![Seen::Packet(PortId(1), vec![0xde, 0xad])]);

    assert!(fx.table.remove_event_observer(id));
    assert!(!fx.table.remove_event_observer(id));
    fx.table
        .handle_event(HwSwitchEvent::PacketReceived { port, frame: vec![1] })
        .unwrap();
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_event_for_unknown_port() {
    let mut fx = Fixture::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    fx.table.add_event_observer(Box::new(Recorder(seen.clone())));

    let err = fx
        .table
        .handle_event(HwSwitchEvent::LinkStateChanged {
            port: sai_api::PortOid::NULL,
            up: true,
        })
        .unwrap_err();
    assert!(matches!(err, ManagerError::NotFound { .. }));
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_reset_removes_everything() {
    let mut fx = Fixture::new();
    fx.resolve("10.0.0.1", INTF_1);
    fx.resolve("10.0.0.2", INTF_2);
    let handle = fx
        .table
        .inc_ref_or_add_next_hop_group(set_of(&[hop("10.0.0.1", INTF_1), hop("10.0.0.2", INTF_2)]))
        .unwrap();
    let weak = handle.downgrade();

    fx.table.reset().unwrap();
    assert!(weak.is_expired());
    for object_type in [
        SaiObjectType::Port,
        SaiObjectType::BridgePort,
        SaiObjectType::RouterInterface,
        SaiObjectType::NextHop,
        SaiObjectType::NextHopGroup,
        SaiObjectType::NextHopGroupMember,
    ] {
        assert_eq!(fx.fake.object_count(object_type), 0, "{}", object_type);
    }
    assert_eq!(fx.fake.neighbor_count(), 0);

    // The group is gone, so releasing the stale handle is reported.
    assert!(matches!(handle.release(), Err(ManagerError::InvalidState { .. })));
}

#[test]
fn test_drop_tears_down_when_configured() {
    let fx = Fixture::new();
    let fake = fx.fake.clone();
    assert_eq!(fake.object_count(SaiObjectType::Port), 2);

    drop(fx);
    assert_eq!(fake.object_count(SaiObjectType::Port), 0);
    assert_eq!(fake.object_count(SaiObjectType::BridgePort), 0);
    assert_eq!(fake.object_count(SaiObjectType::RouterInterface), 0);
}

#[test]
fn test_drop_keeps_objects_when_disabled() {
    let config = ManagerTableConfig {
        teardown_on_drop: false,
        ..ManagerTableConfig::default()
    };
    let fx = Fixture::with_configs(FakeSaiConfig::default(), config);
    let fake = fx.fake.clone();

    drop(fx);
    assert_eq!(fake.object_count(SaiObjectType::Port), 2);
}

#[test]
fn test_router_interface_wiring() {
    let mut fx = Fixture::new();
    let mut intf = sai_switch::SwInterface::new(sai_switch::InterfaceId(3), PortId(9));

    let err = fx.table.add_router_interface(&intf).unwrap_err();
    assert!(matches!(
        err,
        ManagerError::NotFound {
            kind: ResourceKind::Port,
            ..
        }
    ));

    intf.port = PortId(1);
    fx.table.add_router_interface(&intf).unwrap();
    intf.mtu = 1500;
    fx.table.change_router_interface(&intf).unwrap();
    assert_eq!(
        fx.table
            .router_interface_manager()
            .get_interface(sai_switch::InterfaceId(3))
            .unwrap()
            .attributes()
            .mtu,
        1500
    );
}
