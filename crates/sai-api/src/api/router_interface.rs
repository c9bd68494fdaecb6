//! Router interface attributes.

use super::{SaiApiKind, SaiObjectApi};
use crate::attribute::{
    sai_attr_id, sai_enum_value, unknown_attribute, SaiAttribute, SaiAttributeSet,
    SaiAttributeValue,
};
use crate::error::SaiResult;
use crate::mac::MacAddress;
use crate::types::{PortOid, RouterInterfaceKind, VirtualRouterOid};

sai_attr_id! {
    /// Router interface attribute ids.
    RouterInterfaceAttrId {
        VirtualRouterId = 0,
        Type = 1,
        PortId = 2,
        SrcMacAddress = 3,
        Mtu = 4,
    }
}

sai_enum_value! {
    /// Router interface type.
    RouterInterfaceType, "router interface type" {
        Port = 0,
        Loopback = 1,
    }
}

/// Router interface attributes.
///
/// `VirtualRouterId`, `Type` and `PortId` are create-only. `PortId` is
/// mandatory for port interfaces and forbidden for loopbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterInterfaceAttribute {
    VirtualRouterId(VirtualRouterOid),
    Type(RouterInterfaceType),
    PortId(PortOid),
    SrcMacAddress(MacAddress),
    Mtu(u32),
}

impl SaiAttributeSet for RouterInterfaceAttribute {
    type Id = RouterInterfaceAttrId;

    fn id(&self) -> RouterInterfaceAttrId {
        match self {
            Self::VirtualRouterId(_) => RouterInterfaceAttrId::VirtualRouterId,
            Self::Type(_) => RouterInterfaceAttrId::Type,
            Self::PortId(_) => RouterInterfaceAttrId::PortId,
            Self::SrcMacAddress(_) => RouterInterfaceAttrId::SrcMacAddress,
            Self::Mtu(_) => RouterInterfaceAttrId::Mtu,
        }
    }

    fn to_raw(&self) -> SaiAttribute {
        let value = match self {
            Self::VirtualRouterId(vr) => SaiAttributeValue::Oid(vr.as_raw()),
            Self::Type(rif_type) => rif_type.to_value(),
            Self::PortId(port) => SaiAttributeValue::Oid(port.as_raw()),
            Self::SrcMacAddress(mac) => SaiAttributeValue::Mac(*mac),
            Self::Mtu(mtu) => SaiAttributeValue::U32(*mtu),
        };
        SaiAttribute::new(self.id(), value)
    }

    fn from_raw(raw: &SaiAttribute) -> SaiResult<Self> {
        let id = RouterInterfaceAttrId::from_raw(raw.id)
            .ok_or_else(|| unknown_attribute("router interface", raw.id))?;
        let value = &raw.value;
        Ok(match id {
            RouterInterfaceAttrId::VirtualRouterId => Self::VirtualRouterId(value.as_object_id()?),
            RouterInterfaceAttrId::Type => Self::Type(RouterInterfaceType::from_value(value)?),
            RouterInterfaceAttrId::PortId => Self::PortId(value.as_object_id()?),
            RouterInterfaceAttrId::SrcMacAddress => Self::SrcMacAddress(value.as_mac()?),
            RouterInterfaceAttrId::Mtu => Self::Mtu(value.as_u32()?),
        })
    }
}

impl SaiApiKind for RouterInterfaceKind {
    type Attribute = RouterInterfaceAttribute;
}

pub type RouterInterfaceApi = SaiObjectApi<RouterInterfaceKind>;
