//! Fake neighbor entries.

use sai_api::api::neighbor::{NeighborAttrId, NeighborAttribute, PacketAction};
use sai_api::{MacAddress, SaiStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeNeighbor {
    pub(crate) dst_mac: MacAddress,
    pub(crate) packet_action: PacketAction,
}

impl FakeNeighbor {
    pub(crate) fn create(attributes: Vec<NeighborAttribute>) -> Result<Self, SaiStatus> {
        let mut dst_mac = None;
        let mut packet_action = PacketAction::Forward;
        for attribute in attributes {
            match attribute {
                NeighborAttribute::DstMacAddress(mac) => dst_mac = Some(mac),
                NeighborAttribute::PacketAction(action) => packet_action = action,
            }
        }

        let dst_mac = dst_mac.ok_or(SaiStatus::MandatoryAttributeMissing)?;
        validate_mac(dst_mac)?;
        Ok(Self {
            dst_mac,
            packet_action,
        })
    }

    pub(crate) fn set(&mut self, attribute: NeighborAttribute) -> Result<(), SaiStatus> {
        match attribute {
            NeighborAttribute::DstMacAddress(mac) => {
                validate_mac(mac)?;
                self.dst_mac = mac;
            }
            NeighborAttribute::PacketAction(action) => self.packet_action = action,
        }
        Ok(())
    }

    pub(crate) fn get(&self, id: NeighborAttrId) -> NeighborAttribute {
        match id {
            NeighborAttrId::DstMacAddress => NeighborAttribute::DstMacAddress(self.dst_mac),
            NeighborAttrId::PacketAction => NeighborAttribute::PacketAction(self.packet_action),
        }
    }
}

fn validate_mac(mac: MacAddress) -> Result<(), SaiStatus> {
    if mac.is_zero() || mac.is_multicast() {
        return Err(SaiStatus::InvalidParameter);
    }
    Ok(())
}
