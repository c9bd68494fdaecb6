//! The in-memory driver.

use crate::bridge_port::FakeBridgePort;
use crate::config::FakeSaiConfig;
use crate::neighbor::FakeNeighbor;
use crate::next_hop::FakeNextHop;
use crate::next_hop_group::{FakeNextHopGroup, FakeNextHopGroupMember};
use crate::objects::{decode, decode_ids, encode, handle_for, FakeObjectTable};
use crate::port::FakePort;
use crate::router_interface::FakeRouterInterface;
use log::{debug, info};
use sai_api::api::bridge_port::BridgePortAttribute;
use sai_api::api::neighbor::{NeighborAttribute, NeighborEntry};
use sai_api::api::next_hop::NextHopAttribute;
use sai_api::api::next_hop_group::{
    NextHopGroupAttrId, NextHopGroupAttribute, NextHopGroupMemberAttribute,
};
use sai_api::api::port::{PortAttribute, PortOperStatus};
use sai_api::api::router_interface::RouterInterfaceAttribute;
use sai_api::api::switch::{SwitchAttrId, SwitchAttribute};
use sai_api::{
    MacAddress, NextHopGroupMemberOid, PortOid, RawSaiObjectId, SaiAttrId, SaiAttribute,
    SaiDriver, SaiObjectType, SaiStatus, SwitchOid, VirtualRouterOid,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

const DEFAULT_SWITCH_MAC: MacAddress = MacAddress::new([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);

/// Simulated SAI driver.
///
/// Starts with one switch and its default virtual router. Objects live in
/// per-category tables keyed by sequentially allocated handles.
///
/// ```
/// use std::sync::Arc;
/// use sai_api::SaiApiTable;
/// use sai_fake::FakeSai;
///
/// let fake = Arc::new(FakeSai::new());
/// let table = SaiApiTable::new(fake.clone(), fake.switch_id()).unwrap();
/// assert_eq!(table.default_virtual_router_id(), fake.default_virtual_router_id());
/// ```
#[derive(Debug)]
pub struct FakeSai {
    switch_id: SwitchOid,
    default_virtual_router_id: VirtualRouterOid,
    state: Mutex<FakeSaiState>,
}

#[derive(Debug)]
struct FakeSaiState {
    src_mac: MacAddress,
    ports: FakeObjectTable<FakePort>,
    bridge_ports: FakeObjectTable<FakeBridgePort>,
    router_interfaces: FakeObjectTable<FakeRouterInterface>,
    next_hops: FakeObjectTable<FakeNextHop>,
    next_hop_groups: FakeObjectTable<FakeNextHopGroup>,
    next_hop_group_members: FakeObjectTable<FakeNextHopGroupMember>,
    neighbors: HashMap<NeighborEntry, FakeNeighbor>,
    max_neighbors: Option<usize>,
    set_attribute_calls: u64,
    remove_failures: HashMap<SaiObjectType, SaiStatus>,
}

impl FakeSai {
    pub fn new() -> Self {
        Self::with_config(FakeSaiConfig::default())
    }

    pub fn with_config(config: FakeSaiConfig) -> Self {
        let switch_id = SwitchOid::from_raw_unchecked(handle_for(SaiObjectType::Switch, 1));
        let default_virtual_router_id =
            VirtualRouterOid::from_raw_unchecked(handle_for(SaiObjectType::VirtualRouter, 1));
        info!(
            "fake SAI switch {:?} with default virtual router {:?}",
            switch_id, default_virtual_router_id
        );

        Self {
            switch_id,
            default_virtual_router_id,
            state: Mutex::new(FakeSaiState {
                src_mac: DEFAULT_SWITCH_MAC,
                ports: FakeObjectTable::new(SaiObjectType::Port, config.max_ports),
                bridge_ports: FakeObjectTable::new(SaiObjectType::BridgePort, config.max_bridge_ports),
                router_interfaces: FakeObjectTable::new(
                    SaiObjectType::RouterInterface,
                    config.max_router_interfaces,
                ),
                next_hops: FakeObjectTable::new(SaiObjectType::NextHop, config.max_next_hops),
                next_hop_groups: FakeObjectTable::new(
                    SaiObjectType::NextHopGroup,
                    config.max_next_hop_groups,
                ),
                next_hop_group_members: FakeObjectTable::new(
                    SaiObjectType::NextHopGroupMember,
                    config.max_next_hop_group_members,
                ),
                neighbors: HashMap::new(),
                max_neighbors: config.max_neighbors,
                set_attribute_calls: 0,
                remove_failures: HashMap::new(),
            }),
        }
    }

    pub fn switch_id(&self) -> SwitchOid {
        self.switch_id
    }

    pub fn default_virtual_router_id(&self) -> VirtualRouterOid {
        self.default_virtual_router_id
    }

    /// Number of live objects of one OID-keyed category.
    pub fn object_count(&self, object_type: SaiObjectType) -> usize {
        let state = self.state();
        match object_type {
            SaiObjectType::Switch | SaiObjectType::VirtualRouter => 1,
            SaiObjectType::Port => state.ports.len(),
            SaiObjectType::BridgePort => state.bridge_ports.len(),
            SaiObjectType::RouterInterface => state.router_interfaces.len(),
            SaiObjectType::NextHop => state.next_hops.len(),
            SaiObjectType::NextHopGroup => state.next_hop_groups.len(),
            SaiObjectType::NextHopGroupMember => state.next_hop_group_members.len(),
            SaiObjectType::NeighborEntry => state.neighbors.len(),
            SaiObjectType::Null => 0,
        }
    }

    pub fn neighbor_count(&self) -> usize {
        self.state().neighbors.len()
    }

    /// Number of set-attribute calls received, including rejected ones.
    pub fn set_attribute_calls(&self) -> u64 {
        self.state().set_attribute_calls
    }

    /// Simulates a link state change on a port.
    pub fn set_port_oper_status(&self, port: PortOid, status: PortOperStatus) -> Result<(), SaiStatus> {
        let mut state = self.state();
        state.ports.get_mut(port.as_raw())?.oper_status = status;
        Ok(())
    }

    /// Makes the next removal of an object of `object_type` fail with
    /// `status`. The object is left in place.
    pub fn fail_next_remove(&self, object_type: SaiObjectType, status: SaiStatus) {
        self.state().remove_failures.insert(object_type, status);
    }

    fn state(&self) -> MutexGuard<'_, FakeSaiState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_switch(&self, switch_id: RawSaiObjectId) -> Result<(), SaiStatus> {
        if switch_id != self.switch_id.as_raw() {
            debug!("unknown switch 0x{:x}", switch_id);
            return Err(SaiStatus::InvalidObjectId);
        }
        Ok(())
    }
}

impl Default for FakeSai {
    fn default() -> Self {
        Self::new()
    }
}

fn to_status(result: Result<(), SaiStatus>) -> SaiStatus {
    match result {
        Ok(()) => SaiStatus::Success,
        Err(status) => status,
    }
}

impl FakeSaiState {
    fn create_router_interface(
        &mut self,
        raw: &[SaiAttribute],
        default_virtual_router_id: VirtualRouterOid,
    ) -> Result<RawSaiObjectId, SaiStatus> {
        let rif = FakeRouterInterface::create(decode(raw)?, self.src_mac)?;
        if rif.virtual_router_id != default_virtual_router_id {
            return Err(SaiStatus::InvalidParameter);
        }
        if let Some(port) = rif.port_id {
            if !self.ports.contains(port.as_raw()) {
                return Err(SaiStatus::InvalidParameter);
            }
        }
        self.router_interfaces.insert(rif)
    }

    fn create_bridge_port(&mut self, raw: &[SaiAttribute]) -> Result<RawSaiObjectId, SaiStatus> {
        let bridge_port = FakeBridgePort::create(decode(raw)?)?;
        if !self.ports.contains(bridge_port.port_id.as_raw()) {
            return Err(SaiStatus::InvalidParameter);
        }
        if self.bridge_ports.values().any(|bp| bp.port_id == bridge_port.port_id) {
            return Err(SaiStatus::ItemAlreadyExists);
        }
        self.bridge_ports.insert(bridge_port)
    }

    fn create_next_hop(&mut self, raw: &[SaiAttribute]) -> Result<RawSaiObjectId, SaiStatus> {
        let next_hop = FakeNextHop::create(decode(raw)?)?;
        if !self
            .router_interfaces
            .contains(next_hop.router_interface_id.as_raw())
        {
            return Err(SaiStatus::InvalidParameter);
        }
        self.next_hops.insert(next_hop)
    }

    fn create_next_hop_group_member(&mut self, raw: &[SaiAttribute]) -> Result<RawSaiObjectId, SaiStatus> {
        let member = FakeNextHopGroupMember::create(decode(raw)?)?;
        if !self.next_hop_groups.contains(member.group_id.as_raw())
            || !self.next_hops.contains(member.next_hop_id.as_raw())
        {
            return Err(SaiStatus::InvalidParameter);
        }
        let duplicate = self
            .next_hop_group_members
            .values()
            .any(|m| m.group_id == member.group_id && m.next_hop_id == member.next_hop_id);
        if duplicate {
            return Err(SaiStatus::ItemAlreadyExists);
        }
        self.next_hop_group_members.insert(member)
    }

    fn members_of(&self, group: RawSaiObjectId) -> Vec<NextHopGroupMemberOid> {
        self.next_hop_group_members
            .iter()
            .filter(|(_, member)| member.group_id.as_raw() == group)
            .map(|(handle, _)| NextHopGroupMemberOid::from_raw_unchecked(*handle))
            .collect()
    }

    /// Objects referenced by others cannot be removed.
    fn check_unreferenced(&self, object_type: SaiObjectType, handle: RawSaiObjectId) -> Result<(), SaiStatus> {
        let in_use = match object_type {
            SaiObjectType::Port => {
                self.router_interfaces
                    .values()
                    .any(|rif| rif.port_id.map(|p| p.as_raw()) == Some(handle))
                    || self.bridge_ports.values().any(|bp| bp.port_id.as_raw() == handle)
            }
            SaiObjectType::RouterInterface => {
                self.neighbors
                    .keys()
                    .any(|entry| entry.router_interface_id.as_raw() == handle)
                    || self
                        .next_hops
                        .values()
                        .any(|nh| nh.router_interface_id.as_raw() == handle)
            }
            SaiObjectType::NextHop => self
                .next_hop_group_members
                .values()
                .any(|m| m.next_hop_id.as_raw() == handle),
            SaiObjectType::NextHopGroup => !self.members_of(handle).is_empty(),
            _ => false,
        };
        if in_use {
            debug!("{} 0x{:x} is still referenced", object_type, handle);
            return Err(SaiStatus::ObjectInUse);
        }
        Ok(())
    }

    fn get_next_hop_group(
        &self,
        handle: RawSaiObjectId,
        id: NextHopGroupAttrId,
    ) -> Result<NextHopGroupAttribute, SaiStatus> {
        let group = self.next_hop_groups.get(handle)?;
        Ok(match id {
            NextHopGroupAttrId::Type => NextHopGroupAttribute::Type(group.group_type),
            NextHopGroupAttrId::NextHopMemberList => {
                NextHopGroupAttribute::NextHopMemberList(self.members_of(handle))
            }
            NextHopGroupAttrId::NextHopCount => {
                let count = self.members_of(handle).len();
                NextHopGroupAttribute::NextHopCount(
                    u32::try_from(count).map_err(|_| SaiStatus::BufferOverflow)?,
                )
            }
        })
    }
}

impl SaiDriver for FakeSai {
    fn create_object(
        &self,
        object_type: SaiObjectType,
        switch_id: RawSaiObjectId,
        attributes: &[SaiAttribute],
    ) -> Result<RawSaiObjectId, SaiStatus> {
        self.check_switch(switch_id)?;
        let mut state = self.state();
        let result = match object_type {
            SaiObjectType::Port => {
                let port = FakePort::create(decode(attributes)?)?;
                state.ports.insert(port)
            }
            SaiObjectType::BridgePort => state.create_bridge_port(attributes),
            SaiObjectType::RouterInterface => {
                state.create_router_interface(attributes, self.default_virtual_router_id)
            }
            SaiObjectType::NextHop => state.create_next_hop(attributes),
            SaiObjectType::NextHopGroup => {
                let group = FakeNextHopGroup::create(decode(attributes)?)?;
                state.next_hop_groups.insert(group)
            }
            SaiObjectType::NextHopGroupMember => state.create_next_hop_group_member(attributes),
            SaiObjectType::Switch | SaiObjectType::VirtualRouter => Err(SaiStatus::NotSupported),
            SaiObjectType::NeighborEntry | SaiObjectType::Null => Err(SaiStatus::InvalidObjectType),
        };
        match result {
            Ok(handle) => debug!("fake create {} -> 0x{:x}", object_type, handle),
            Err(status) => debug!("fake create {} -> {}", object_type, status),
        }
        result
    }

    fn remove_object(&self, object_type: SaiObjectType, object_id: RawSaiObjectId) -> SaiStatus {
        let mut state = self.state();
        let exists = match object_type {
            SaiObjectType::Port => state.ports.contains(object_id),
            SaiObjectType::BridgePort => state.bridge_ports.contains(object_id),
            SaiObjectType::RouterInterface => state.router_interfaces.contains(object_id),
            SaiObjectType::NextHop => state.next_hops.contains(object_id),
            SaiObjectType::NextHopGroup => state.next_hop_groups.contains(object_id),
            SaiObjectType::NextHopGroupMember => state.next_hop_group_members.contains(object_id),
            SaiObjectType::Switch | SaiObjectType::VirtualRouter => return SaiStatus::NotSupported,
            SaiObjectType::NeighborEntry | SaiObjectType::Null => {
                return SaiStatus::InvalidObjectType
            }
        };
        if !exists {
            return SaiStatus::ItemNotFound;
        }
        if let Some(status) = state.remove_failures.remove(&object_type) {
            debug!("fake remove {} 0x{:x} -> injected {}", object_type, object_id, status);
            return status;
        }
        if let Err(status) = state.check_unreferenced(object_type, object_id) {
            return status;
        }

        let removed = match object_type {
            SaiObjectType::Port => state.ports.remove(object_id).map(drop),
            SaiObjectType::BridgePort => state.bridge_ports.remove(object_id).map(drop),
            SaiObjectType::RouterInterface => state.router_interfaces.remove(object_id).map(drop),
            SaiObjectType::NextHop => state.next_hops.remove(object_id).map(drop),
            SaiObjectType::NextHopGroup => state.next_hop_groups.remove(object_id).map(drop),
            SaiObjectType::NextHopGroupMember => {
                state.next_hop_group_members.remove(object_id).map(drop)
            }
            _ => Err(SaiStatus::InvalidObjectType),
        };
        debug!("fake remove {} 0x{:x}", object_type, object_id);
        to_status(removed)
    }

    fn set_attribute(
        &self,
        object_type: SaiObjectType,
        object_id: RawSaiObjectId,
        attribute: &SaiAttribute,
    ) -> SaiStatus {
        let mut state = self.state();
        state.set_attribute_calls += 1;
        let attribute = std::slice::from_ref(attribute);
        let result = match object_type {
            SaiObjectType::Switch if object_id == self.switch_id.as_raw() => {
                match decode::<SwitchAttribute>(attribute).map(|mut a| a.remove(0)) {
                    Ok(SwitchAttribute::SrcMacAddress(mac)) => {
                        state.src_mac = mac;
                        Ok(())
                    }
                    Ok(SwitchAttribute::DefaultVirtualRouterId(_)) => Err(SaiStatus::InvalidParameter),
                    Err(status) => Err(status),
                }
            }
            SaiObjectType::Port => decode::<PortAttribute>(attribute).and_then(|mut a| {
                state.ports.get_mut(object_id)?.set(a.remove(0))
            }),
            SaiObjectType::BridgePort => decode::<BridgePortAttribute>(attribute).and_then(|mut a| {
                state.bridge_ports.get_mut(object_id)?.set(a.remove(0))
            }),
            SaiObjectType::RouterInterface => {
                decode::<RouterInterfaceAttribute>(attribute).and_then(|mut a| {
                    state.router_interfaces.get_mut(object_id)?.set(a.remove(0))
                })
            }
            SaiObjectType::NextHop => decode::<NextHopAttribute>(attribute).and_then(|_| {
                state.next_hops.get(object_id)?;
                Err(SaiStatus::InvalidParameter)
            }),
            SaiObjectType::NextHopGroup => decode::<NextHopGroupAttribute>(attribute).and_then(|_| {
                state.next_hop_groups.get(object_id)?;
                Err(SaiStatus::InvalidParameter)
            }),
            SaiObjectType::NextHopGroupMember => {
                decode::<NextHopGroupMemberAttribute>(attribute).and_then(|mut a| {
                    state
                        .next_hop_group_members
                        .get_mut(object_id)?
                        .set(a.remove(0))
                })
            }
            SaiObjectType::Switch | SaiObjectType::VirtualRouter => Err(SaiStatus::ItemNotFound),
            SaiObjectType::NeighborEntry | SaiObjectType::Null => Err(SaiStatus::InvalidObjectType),
        };
        to_status(result)
    }

    fn get_attributes(
        &self,
        object_type: SaiObjectType,
        object_id: RawSaiObjectId,
        ids: &[SaiAttrId],
    ) -> Result<Vec<SaiAttribute>, SaiStatus> {
        let state = self.state();
        match object_type {
            SaiObjectType::Switch if object_id == self.switch_id.as_raw() => {
                let attributes = decode_ids::<SwitchAttribute>(ids)?
                    .into_iter()
                    .map(|id| match id {
                        SwitchAttrId::SrcMacAddress => SwitchAttribute::SrcMacAddress(state.src_mac),
                        SwitchAttrId::DefaultVirtualRouterId => {
                            SwitchAttribute::DefaultVirtualRouterId(self.default_virtual_router_id)
                        }
                    })
                    .collect();
                Ok(encode(attributes))
            }
            SaiObjectType::Port => {
                let port = state.ports.get(object_id)?;
                let ids = decode_ids::<PortAttribute>(ids)?;
                Ok(encode(ids.into_iter().map(|id| port.get(id)).collect()))
            }
            SaiObjectType::BridgePort => {
                let bridge_port = state.bridge_ports.get(object_id)?;
                let ids = decode_ids::<BridgePortAttribute>(ids)?;
                Ok(encode(ids.into_iter().map(|id| bridge_port.get(id)).collect()))
            }
            SaiObjectType::RouterInterface => {
                let rif = state.router_interfaces.get(object_id)?;
                let attributes = decode_ids::<RouterInterfaceAttribute>(ids)?
                    .into_iter()
                    .map(|id| rif.get(id))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(encode(attributes))
            }
            SaiObjectType::NextHop => {
                let next_hop = state.next_hops.get(object_id)?;
                let ids = decode_ids::<NextHopAttribute>(ids)?;
                Ok(encode(ids.into_iter().map(|id| next_hop.get(id)).collect()))
            }
            SaiObjectType::NextHopGroup => {
                let attributes = decode_ids::<NextHopGroupAttribute>(ids)?
                    .into_iter()
                    .map(|id| state.get_next_hop_group(object_id, id))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(encode(attributes))
            }
            SaiObjectType::NextHopGroupMember => {
                let member = state.next_hop_group_members.get(object_id)?;
                let ids = decode_ids::<NextHopGroupMemberAttribute>(ids)?;
                Ok(encode(ids.into_iter().map(|id| member.get(id)).collect()))
            }
            SaiObjectType::Switch | SaiObjectType::VirtualRouter => Err(SaiStatus::ItemNotFound),
            SaiObjectType::NeighborEntry | SaiObjectType::Null => Err(SaiStatus::InvalidObjectType),
        }
    }

    fn create_neighbor_entry(&self, entry: &NeighborEntry, attributes: &[SaiAttribute]) -> SaiStatus {
        if let Err(status) = self.check_switch(entry.switch_id.as_raw()) {
            return status;
        }
        let mut state = self.state();
        let result = (|| {
            let neighbor = FakeNeighbor::create(decode::<NeighborAttribute>(attributes)?)?;
            if !state
                .router_interfaces
                .contains(entry.router_interface_id.as_raw())
            {
                return Err(SaiStatus::InvalidParameter);
            }
            if state.neighbors.contains_key(entry) {
                return Err(SaiStatus::ItemAlreadyExists);
            }
            if state.max_neighbors.is_some_and(|max| state.neighbors.len() >= max) {
                return Err(SaiStatus::TableFull);
            }
            state.neighbors.insert(*entry, neighbor);
            Ok(())
        })();
        debug!("fake create {} -> {:?}", entry, result);
        to_status(result)
    }

    fn remove_neighbor_entry(&self, entry: &NeighborEntry) -> SaiStatus {
        match self.state().neighbors.remove(entry) {
            Some(_) => SaiStatus::Success,
            None => SaiStatus::ItemNotFound,
        }
    }

    fn set_neighbor_entry_attribute(&self, entry: &NeighborEntry, attribute: &SaiAttribute) -> SaiStatus {
        let mut state = self.state();
        state.set_attribute_calls += 1;
        let result = decode::<NeighborAttribute>(std::slice::from_ref(attribute)).and_then(|mut a| {
            state
                .neighbors
                .get_mut(entry)
                .ok_or(SaiStatus::ItemNotFound)?
                .set(a.remove(0))
        });
        to_status(result)
    }

    fn get_neighbor_entry_attributes(
        &self,
        entry: &NeighborEntry,
        ids: &[SaiAttrId],
    ) -> Result<Vec<SaiAttribute>, SaiStatus> {
        let state = self.state();
        let neighbor = state.neighbors.get(entry).ok_or(SaiStatus::ItemNotFound)?;
        let ids = decode_ids::<NeighborAttribute>(ids)?;
        Ok(encode(ids.into_iter().map(|id| neighbor.get(id)).collect()))
    }
}
