//! Fake bridge ports. Only port-type bridge ports are modelled.

use sai_api::api::bridge_port::{BridgePortAttrId, BridgePortAttribute, BridgePortType};
use sai_api::{PortOid, SaiStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeBridgePort {
    pub(crate) port_id: PortOid,
    pub(crate) admin_state: bool,
}

impl FakeBridgePort {
    pub(crate) fn create(attributes: Vec<BridgePortAttribute>) -> Result<Self, SaiStatus> {
        let mut bridge_port_type = None;
        let mut port_id = None;
        let mut admin_state = false;
        for attribute in attributes {
            match attribute {
                BridgePortAttribute::Type(t) => bridge_port_type = Some(t),
                BridgePortAttribute::PortId(port) => port_id = Some(port),
                BridgePortAttribute::AdminState(up) => admin_state = up,
            }
        }

        match bridge_port_type.ok_or(SaiStatus::MandatoryAttributeMissing)? {
            BridgePortType::Port => {}
            BridgePortType::SubPort | BridgePortType::Router => return Err(SaiStatus::NotSupported),
        }
        Ok(Self {
            port_id: port_id.ok_or(SaiStatus::MandatoryAttributeMissing)?,
            admin_state,
        })
    }

    pub(crate) fn set(&mut self, attribute: BridgePortAttribute) -> Result<(), SaiStatus> {
        match attribute {
            BridgePortAttribute::AdminState(up) => self.admin_state = up,
            BridgePortAttribute::Type(_) | BridgePortAttribute::PortId(_) => {
                return Err(SaiStatus::InvalidParameter)
            }
        }
        Ok(())
    }

    pub(crate) fn get(&self, id: BridgePortAttrId) -> BridgePortAttribute {
        match id {
            BridgePortAttrId::Type => BridgePortAttribute::Type(BridgePortType::Port),
            BridgePortAttrId::PortId => BridgePortAttribute::PortId(self.port_id),
            BridgePortAttrId::AdminState => BridgePortAttribute::AdminState(self.admin_state),
        }
    }
}
