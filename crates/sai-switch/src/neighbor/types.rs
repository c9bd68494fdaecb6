//! Neighbor types and the narrow interfaces the next-hop-group manager
//! uses to follow neighbor state.

use crate::error::ManagerResult;
use crate::types::InterfaceId;
use sai_api::api::neighbor::NeighborEntry;
use sai_api::{MacAddress, RouterInterfaceOid};
use std::fmt;
use std::net::IpAddr;

/// Identity of a neighbor: an address on an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NeighborKey {
    pub ip: IpAddr,
    pub interface: InterfaceId,
}

impl NeighborKey {
    pub fn new(ip: IpAddr, interface: InterfaceId) -> Self {
        Self { ip, interface }
    }
}

impl fmt::Display for NeighborKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.ip, self.interface)
    }
}

/// A resolved neighbor as reported by the apply pipeline or hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwNeighbor {
    pub ip: IpAddr,
    pub interface: InterfaceId,
    pub mac: MacAddress,
}

impl SwNeighbor {
    pub fn new(ip: IpAddr, interface: InterfaceId, mac: MacAddress) -> Self {
        Self { ip, interface, mac }
    }

    pub fn key(&self) -> NeighborKey {
        NeighborKey::new(self.ip, self.interface)
    }
}

/// A programmed neighbor entry.
#[derive(Debug)]
pub struct SaiNeighbor {
    entry: NeighborEntry,
    mac: MacAddress,
}

impl SaiNeighbor {
    pub(crate) fn new(entry: NeighborEntry, mac: MacAddress) -> Self {
        Self { entry, mac }
    }

    pub fn entry(&self) -> &NeighborEntry {
        &self.entry
    }

    pub fn router_interface(&self) -> RouterInterfaceOid {
        self.entry.router_interface_id
    }

    pub fn mac(&self) -> MacAddress {
        self.mac
    }

    pub(crate) fn set_mac(&mut self, mac: MacAddress) {
        self.mac = mac;
    }
}

/// Payload of a resolution notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedNeighbor {
    pub key: NeighborKey,
    pub router_interface: RouterInterfaceOid,
}

/// Receives neighbor resolution changes.
pub trait NeighborObserver {
    fn on_neighbor_resolved(&mut self, neighbor: &ResolvedNeighbor) -> ManagerResult<()>;

    fn on_neighbor_unresolved(&mut self, key: &NeighborKey) -> ManagerResult<()>;
}

/// Read access to current resolution state.
pub trait NeighborLookup {
    /// Router interface of the neighbor if it is currently resolved.
    fn resolved_router_interface(&self, key: &NeighborKey) -> Option<RouterInterfaceOid>;
}
