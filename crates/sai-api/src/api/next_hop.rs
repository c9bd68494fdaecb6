//! Next hop attributes. All three are mandatory and create-only.

use super::{SaiApiKind, SaiObjectApi};
use crate::attribute::{
    sai_attr_id, sai_enum_value, unknown_attribute, SaiAttribute, SaiAttributeSet,
    SaiAttributeValue,
};
use crate::error::SaiResult;
use crate::types::{NextHopKind, RouterInterfaceOid};
use std::net::IpAddr;

sai_attr_id! {
    /// Next hop attribute ids.
    NextHopAttrId {
        Type = 0,
        Ip = 1,
        RouterInterfaceId = 2,
    }
}

sai_enum_value! {
    /// Next hop type.
    NextHopType, "next hop type" {
        Ip = 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextHopAttribute {
    Type(NextHopType),
    Ip(IpAddr),
    RouterInterfaceId(RouterInterfaceOid),
}

impl SaiAttributeSet for NextHopAttribute {
    type Id = NextHopAttrId;

    fn id(&self) -> NextHopAttrId {
        match self {
            Self::Type(_) => NextHopAttrId::Type,
            Self::Ip(_) => NextHopAttrId::Ip,
            Self::RouterInterfaceId(_) => NextHopAttrId::RouterInterfaceId,
        }
    }

    fn to_raw(&self) -> SaiAttribute {
        let value = match self {
            Self::Type(nh_type) => nh_type.to_value(),
            Self::Ip(ip) => SaiAttributeValue::Ip(*ip),
            Self::RouterInterfaceId(rif) => SaiAttributeValue::Oid(rif.as_raw()),
        };
        SaiAttribute::new(self.id(), value)
    }

    fn from_raw(raw: &SaiAttribute) -> SaiResult<Self> {
        let id = NextHopAttrId::from_raw(raw.id).ok_or_else(|| unknown_attribute("next hop", raw.id))?;
        Ok(match id {
            NextHopAttrId::Type => Self::Type(NextHopType::from_value(&raw.value)?),
            NextHopAttrId::Ip => Self::Ip(raw.value.as_ip()?),
            NextHopAttrId::RouterInterfaceId => Self::RouterInterfaceId(raw.value.as_object_id()?),
        })
    }
}

impl SaiApiKind for NextHopKind {
    type Attribute = NextHopAttribute;
}

pub type NextHopApi = SaiObjectApi<NextHopKind>;
