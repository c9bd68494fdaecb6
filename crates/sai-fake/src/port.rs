//! Fake ports.

use sai_api::api::port::{FecMode, PortAttrId, PortAttribute, PortOperStatus};
use sai_api::SaiStatus;

const DEFAULT_MTU: u32 = 1514;
const DEFAULT_PORT_VLAN: u16 = 1;
const MAX_VLAN: u16 = 4094;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakePort {
    pub(crate) lanes: Vec<u32>,
    pub(crate) speed: u32,
    pub(crate) admin_state: bool,
    pub(crate) mtu: u32,
    pub(crate) fec_mode: FecMode,
    pub(crate) oper_status: PortOperStatus,
    pub(crate) port_vlan_id: u16,
}

impl FakePort {
    pub(crate) fn create(attributes: Vec<PortAttribute>) -> Result<Self, SaiStatus> {
        let mut lanes = None;
        let mut speed = None;
        let mut port = FakePort {
            lanes: Vec::new(),
            speed: 0,
            admin_state: false,
            mtu: DEFAULT_MTU,
            fec_mode: FecMode::None,
            oper_status: PortOperStatus::Down,
            port_vlan_id: DEFAULT_PORT_VLAN,
        };

        for attribute in attributes {
            match attribute {
                PortAttribute::HwLaneList(list) => lanes = Some(list),
                PortAttribute::Speed(value) => speed = Some(value),
                PortAttribute::OperStatus(_) => return Err(SaiStatus::InvalidParameter),
                other => port.set(other)?,
            }
        }

        port.lanes = lanes.ok_or(SaiStatus::MandatoryAttributeMissing)?;
        if port.lanes.is_empty() {
            return Err(SaiStatus::InvalidParameter);
        }
        port.set(PortAttribute::Speed(
            speed.ok_or(SaiStatus::MandatoryAttributeMissing)?,
        ))?;
        Ok(port)
    }

    pub(crate) fn set(&mut self, attribute: PortAttribute) -> Result<(), SaiStatus> {
        match attribute {
            PortAttribute::Speed(0) => return Err(SaiStatus::InvalidParameter),
            PortAttribute::Speed(speed) => self.speed = speed,
            PortAttribute::AdminState(up) => self.admin_state = up,
            PortAttribute::Mtu(mtu) => self.mtu = mtu,
            PortAttribute::FecMode(fec) => self.fec_mode = fec,
            PortAttribute::PortVlanId(vlan) if vlan == 0 || vlan > MAX_VLAN => {
                return Err(SaiStatus::InvalidParameter)
            }
            PortAttribute::PortVlanId(vlan) => self.port_vlan_id = vlan,
            // Lanes are create-only and oper status is read-only.
            PortAttribute::HwLaneList(_) | PortAttribute::OperStatus(_) => {
                return Err(SaiStatus::InvalidParameter)
            }
        }
        Ok(())
    }

    pub(crate) fn get(&self, id: PortAttrId) -> PortAttribute {
        match id {
            PortAttrId::HwLaneList => PortAttribute::HwLaneList(self.lanes.clone()),
            PortAttrId::Speed => PortAttribute::Speed(self.speed),
            PortAttrId::AdminState => PortAttribute::AdminState(self.admin_state),
            PortAttrId::Mtu => PortAttribute::Mtu(self.mtu),
            PortAttrId::FecMode => PortAttribute::FecMode(self.fec_mode),
            PortAttrId::OperStatus => PortAttribute::OperStatus(self.oper_status),
            PortAttrId::PortVlanId => PortAttribute::PortVlanId(self.port_vlan_id),
        }
    }
}
