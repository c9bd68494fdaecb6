//! Shared fixture: a manager table over the fake SAI with two ports and a
//! routed interface on each.

#![allow(dead_code)]

use sai_api::{MacAddress, NextHopGroupMemberOid, SaiApiTable};
use sai_fake::{FakeSai, FakeSaiConfig};
use sai_switch::{
    InterfaceId, ManagerTableConfig, NeighborKey, NextHopGroupHandle, NextHopSet, PortId,
    ResolvedNextHop, SaiManagerTable, SwInterface, SwNeighbor, SwPort,
};
use std::net::IpAddr;
use std::sync::Arc;

pub const INTF_1: InterfaceId = InterfaceId(1);
pub const INTF_2: InterfaceId = InterfaceId(2);

pub struct Fixture {
    pub fake: Arc<FakeSai>,
    pub table: SaiManagerTable,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_configs(FakeSaiConfig::default(), ManagerTableConfig::default())
    }

    pub fn with_configs(fake_config: FakeSaiConfig, config: ManagerTableConfig) -> Self {
        let fake = Arc::new(FakeSai::with_config(fake_config));
        let api = Arc::new(SaiApiTable::new(fake.clone(), fake.switch_id()).unwrap());
        let mut table = SaiManagerTable::new(api, config);

        for (port, intf) in [(PortId(1), INTF_1), (PortId(2), INTF_2)] {
            table.port_manager_mut().add(&port_config(port)).unwrap();
            table.add_router_interface(&SwInterface::new(intf, port)).unwrap();
        }
        Self { fake, table }
    }

    /// Member handles hardware reports for the group.
    pub fn hw_members(&self, handle: &NextHopGroupHandle) -> Vec<NextHopGroupMemberOid> {
        self.table
            .api()
            .next_hop_group_api()
            .member_list(handle.id())
            .unwrap()
    }

    pub fn resolve(&mut self, addr: &str, intf: InterfaceId) {
        self.table.add_neighbor(&neighbor(addr, intf)).unwrap();
    }

    pub fn unresolve(&mut self, addr: &str, intf: InterfaceId) {
        self.table.remove_neighbor(&NeighborKey::new(ip(addr), intf)).unwrap();
    }
}

pub fn port_config(id: PortId) -> SwPort {
    let first = id.0 * 4;
    SwPort::new(id, format!("Ethernet{}", first), (first..first + 4).collect(), 100_000)
}

pub fn ip(addr: &str) -> IpAddr {
    addr.parse().unwrap()
}

pub fn mac(last: u8) -> MacAddress {
    MacAddress::new([0x02, 0, 0, 0, 0, last])
}

pub fn neighbor(addr: &str, intf: InterfaceId) -> SwNeighbor {
    let last = match ip(addr) {
        IpAddr::V4(v4) => v4.octets()[3],
        IpAddr::V6(v6) => v6.octets()[15],
    };
    SwNeighbor::new(ip(addr), intf, mac(last))
}

pub fn hop(addr: &str, intf: InterfaceId) -> ResolvedNextHop {
    ResolvedNextHop::new(ip(addr), intf)
}

pub fn set_of(hops: &[ResolvedNextHop]) -> NextHopSet {
    hops.iter().copied().collect()
}
