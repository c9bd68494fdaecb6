//! Bridge port attributes.
//!
//! A port joins the switch's default 802.1Q bridge through a bridge port of
//! type `Port`. `Type` and `PortId` are create-only; `PortId` is mandatory
//! for port-type bridge ports.

use super::{SaiApiKind, SaiObjectApi};
use crate::attribute::{
    sai_attr_id, sai_enum_value, unknown_attribute, SaiAttribute, SaiAttributeSet,
    SaiAttributeValue,
};
use crate::error::SaiResult;
use crate::types::{BridgePortKind, PortOid};

sai_attr_id! {
    /// Bridge port attribute ids.
    BridgePortAttrId {
        Type = 0,
        PortId = 1,
        AdminState = 2,
    }
}

sai_enum_value! {
    /// Bridge port type.
    BridgePortType, "bridge port type" {
        Port = 0,
        SubPort = 1,
        Router = 2,
    }
}

/// Bridge port attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgePortAttribute {
    Type(BridgePortType),
    PortId(PortOid),
    AdminState(bool),
}

impl SaiAttributeSet for BridgePortAttribute {
    type Id = BridgePortAttrId;

    fn id(&self) -> BridgePortAttrId {
        match self {
            Self::Type(_) => BridgePortAttrId::Type,
            Self::PortId(_) => BridgePortAttrId::PortId,
            Self::AdminState(_) => BridgePortAttrId::AdminState,
        }
    }

    fn to_raw(&self) -> SaiAttribute {
        let value = match self {
            Self::Type(bridge_port_type) => bridge_port_type.to_value(),
            Self::PortId(port) => SaiAttributeValue::Oid(port.as_raw()),
            Self::AdminState(up) => SaiAttributeValue::Bool(*up),
        };
        SaiAttribute::new(self.id(), value)
    }

    fn from_raw(raw: &SaiAttribute) -> SaiResult<Self> {
        let id = BridgePortAttrId::from_raw(raw.id)
            .ok_or_else(|| unknown_attribute("bridge port", raw.id))?;
        let value = &raw.value;
        Ok(match id {
            BridgePortAttrId::Type => Self::Type(BridgePortType::from_value(value)?),
            BridgePortAttrId::PortId => Self::PortId(value.as_object_id()?),
            BridgePortAttrId::AdminState => Self::AdminState(value.as_bool()?),
        })
    }
}

impl SaiApiKind for BridgePortKind {
    type Attribute = BridgePortAttribute;
}

pub type BridgePortApi = SaiObjectApi<BridgePortKind>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_port_id_encoding() {
        let port = PortOid::from_raw_unchecked(0x1_0000_0000_0003);
        let raw = BridgePortAttribute::PortId(port).to_raw();
        assert_eq!(raw, SaiAttribute::new(BridgePortAttrId::PortId, SaiAttributeValue::Oid(port.as_raw())));
        assert_eq!(BridgePortAttribute::from_raw(&raw).unwrap(), BridgePortAttribute::PortId(port));
    }

    #[test]
    fn test_invalid_type_rejected() {
        let raw = SaiAttribute::new(BridgePortAttrId::Type, SaiAttributeValue::S32(9));
        assert!(BridgePortAttribute::from_raw(&raw).is_err());
    }
}
