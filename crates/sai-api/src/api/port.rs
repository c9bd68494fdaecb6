//! Port attributes.
//!
//! `HwLaneList` and `Speed` are mandatory on create, lanes are create-only,
//! and `OperStatus` is read-only. `PortVlanId` is the VLAN untagged ingress
//! traffic is classified into.

use super::{SaiApiKind, SaiObjectApi};
use crate::attribute::{
    sai_attr_id, sai_enum_value, unknown_attribute, SaiAttribute, SaiAttributeSet,
    SaiAttributeValue,
};
use crate::error::{SaiError, SaiResult};
use crate::types::PortKind;

sai_attr_id! {
    /// Port attribute ids.
    PortAttrId {
        HwLaneList = 0,
        Speed = 1,
        AdminState = 2,
        Mtu = 3,
        FecMode = 4,
        OperStatus = 5,
        PortVlanId = 6,
    }
}

sai_enum_value! {
    /// Forward Error Correction (FEC) mode.
    FecMode, "fec mode" {
        None = 0,
        /// Reed-Solomon FEC
        Rs = 1,
        /// Fire Code FEC
        Fc = 2,
    }
}

impl Default for FecMode {
    fn default() -> Self {
        FecMode::None
    }
}

sai_enum_value! {
    /// Port operational status.
    PortOperStatus, "port oper status" {
        Unknown = 0,
        Up = 1,
        Down = 2,
        Testing = 3,
        NotPresent = 4,
    }
}

/// Port attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortAttribute {
    HwLaneList(Vec<u32>),
    /// Speed in Mbps.
    Speed(u32),
    AdminState(bool),
    Mtu(u32),
    FecMode(FecMode),
    OperStatus(PortOperStatus),
    PortVlanId(u16),
}

impl SaiAttributeSet for PortAttribute {
    type Id = PortAttrId;

    fn id(&self) -> PortAttrId {
        match self {
            Self::HwLaneList(_) => PortAttrId::HwLaneList,
            Self::Speed(_) => PortAttrId::Speed,
            Self::AdminState(_) => PortAttrId::AdminState,
            Self::Mtu(_) => PortAttrId::Mtu,
            Self::FecMode(_) => PortAttrId::FecMode,
            Self::OperStatus(_) => PortAttrId::OperStatus,
            Self::PortVlanId(_) => PortAttrId::PortVlanId,
        }
    }

    fn to_raw(&self) -> SaiAttribute {
        let value = match self {
            Self::HwLaneList(lanes) => SaiAttributeValue::U32List(lanes.clone()),
            Self::Speed(speed) => SaiAttributeValue::U32(*speed),
            Self::AdminState(up) => SaiAttributeValue::Bool(*up),
            Self::Mtu(mtu) => SaiAttributeValue::U32(*mtu),
            Self::FecMode(fec) => fec.to_value(),
            Self::OperStatus(status) => status.to_value(),
            Self::PortVlanId(vlan) => SaiAttributeValue::U32(u32::from(*vlan)),
        };
        SaiAttribute::new(self.id(), value)
    }

    fn from_raw(raw: &SaiAttribute) -> SaiResult<Self> {
        let id = PortAttrId::from_raw(raw.id).ok_or_else(|| unknown_attribute("port", raw.id))?;
        let value = &raw.value;
        Ok(match id {
            PortAttrId::HwLaneList => Self::HwLaneList(value.as_u32_list()?.to_vec()),
            PortAttrId::Speed => Self::Speed(value.as_u32()?),
            PortAttrId::AdminState => Self::AdminState(value.as_bool()?),
            PortAttrId::Mtu => Self::Mtu(value.as_u32()?),
            PortAttrId::FecMode => Self::FecMode(FecMode::from_value(value)?),
            PortAttrId::OperStatus => Self::OperStatus(PortOperStatus::from_value(value)?),
            PortAttrId::PortVlanId => {
                let raw = value.as_u32()?;
                let vlan = u16::try_from(raw)
                    .map_err(|_| SaiError::invalid_parameter(format!("port VLAN {} out of range", raw)))?;
                Self::PortVlanId(vlan)
            }
        })
    }
}

impl SaiApiKind for PortKind {
    type Attribute = PortAttribute;
}

pub type PortApi = SaiObjectApi<PortKind>;
