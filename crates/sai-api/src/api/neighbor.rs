//! Neighbor entries.
//!
//! Neighbor entries have no object handle: the driver keys them by
//! `(switch, router interface, IP address)`.

use super::check_status;
use crate::attribute::{
    sai_attr_id, sai_enum_value, unknown_attribute, SaiAttrId, SaiAttribute, SaiAttributeSet,
    SaiAttributeValue,
};
use crate::driver::SaiDriver;
use crate::error::{SaiError, SaiResult};
use crate::mac::MacAddress;
use crate::types::{RouterInterfaceOid, SwitchOid};
use log::debug;
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

/// Hardware key of a neighbor entry (`sai_neighbor_entry_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NeighborEntry {
    pub switch_id: SwitchOid,
    pub router_interface_id: RouterInterfaceOid,
    pub ip_address: IpAddr,
}

impl fmt::Display for NeighborEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "neighbor {} on rif {}", self.ip_address, self.router_interface_id)
    }
}

sai_attr_id! {
    /// Neighbor entry attribute ids.
    NeighborAttrId {
        DstMacAddress = 0,
        PacketAction = 1,
    }
}

sai_enum_value! {
    /// Packet action applied to traffic hitting the neighbor.
    PacketAction, "packet action" {
        Drop = 0,
        Forward = 1,
        Trap = 4,
        Log = 5,
    }
}

/// Neighbor entry attributes. `DstMacAddress` is mandatory on create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NeighborAttribute {
    DstMacAddress(MacAddress),
    PacketAction(PacketAction),
}

impl SaiAttributeSet for NeighborAttribute {
    type Id = NeighborAttrId;

    fn id(&self) -> NeighborAttrId {
        match self {
            Self::DstMacAddress(_) => NeighborAttrId::DstMacAddress,
            Self::PacketAction(_) => NeighborAttrId::PacketAction,
        }
    }

    fn to_raw(&self) -> SaiAttribute {
        let value = match self {
            Self::DstMacAddress(mac) => SaiAttributeValue::Mac(*mac),
            Self::PacketAction(action) => action.to_value(),
        };
        SaiAttribute::new(self.id(), value)
    }

    fn from_raw(raw: &SaiAttribute) -> SaiResult<Self> {
        let id = NeighborAttrId::from_raw(raw.id).ok_or_else(|| unknown_attribute("neighbor", raw.id))?;
        Ok(match id {
            NeighborAttrId::DstMacAddress => Self::DstMacAddress(raw.value.as_mac()?),
            NeighborAttrId::PacketAction => Self::PacketAction(PacketAction::from_value(&raw.value)?),
        })
    }
}

/// Function table for neighbor entries.
pub struct NeighborApi {
    driver: Arc<dyn SaiDriver>,
    switch_id: SwitchOid,
}

impl NeighborApi {
    pub fn new(driver: Arc<dyn SaiDriver>, switch_id: SwitchOid) -> Self {
        Self { driver, switch_id }
    }

    /// Builds the entry key for a neighbor on this switch.
    pub fn entry(&self, router_interface_id: RouterInterfaceOid, ip_address: IpAddr) -> NeighborEntry {
        NeighborEntry {
            switch_id: self.switch_id,
            router_interface_id,
            ip_address,
        }
    }

    pub fn create(&self, entry: &NeighborEntry, attributes: &[NeighborAttribute]) -> SaiResult<()> {
        require_entry(entry)?;
        let raw: Vec<SaiAttribute> = attributes.iter().map(SaiAttributeSet::to_raw).collect();
        let status = self.driver.create_neighbor_entry(entry, &raw);
        check_status(status, "create", entry)?;
        debug!("created {}", entry);
        Ok(())
    }

    pub fn remove(&self, entry: &NeighborEntry) -> SaiResult<()> {
        require_entry(entry)?;
        let status = self.driver.remove_neighbor_entry(entry);
        check_status(status, "remove", entry)?;
        debug!("removed {}", entry);
        Ok(())
    }

    pub fn set_attribute(&self, entry: &NeighborEntry, attribute: &NeighborAttribute) -> SaiResult<()> {
        require_entry(entry)?;
        let status = self
            .driver
            .set_neighbor_entry_attribute(entry, &attribute.to_raw());
        check_status(status, "set attribute on", entry)
    }

    pub fn get_attribute(
        &self,
        entry: &NeighborEntry,
        attr_id: NeighborAttrId,
    ) -> SaiResult<NeighborAttribute> {
        require_entry(entry)?;
        let ids = [SaiAttrId::from(attr_id)];
        let raw = self
            .driver
            .get_neighbor_entry_attributes(entry, &ids)
            .map_err(|status| SaiError::from_status(status, format_args!("get attribute on {}", entry)))?;
        let first = raw
            .first()
            .ok_or_else(|| SaiError::internal(format!("no value for {:?} on {}", attr_id, entry)))?;
        NeighborAttribute::from_raw(first)
    }
}

fn require_entry(entry: &NeighborEntry) -> SaiResult<()> {
    if entry.router_interface_id.is_null() {
        return Err(SaiError::invalid_parameter(format!(
            "{} has a null router interface",
            entry
        )));
    }
    Ok(())
}
