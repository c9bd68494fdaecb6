//! Switch attributes.

use super::{SaiApiKind, SaiObjectApi};
use crate::attribute::{sai_attr_id, unknown_attribute, SaiAttribute, SaiAttributeSet, SaiAttributeValue};
use crate::error::SaiResult;
use crate::mac::MacAddress;
use crate::types::{SwitchKind, VirtualRouterOid};

sai_attr_id! {
    /// Switch attribute ids.
    SwitchAttrId {
        SrcMacAddress = 0,
        DefaultVirtualRouterId = 1,
    }
}

/// Switch attributes. `DefaultVirtualRouterId` is read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchAttribute {
    SrcMacAddress(MacAddress),
    DefaultVirtualRouterId(VirtualRouterOid),
}

impl SaiAttributeSet for SwitchAttribute {
    type Id = SwitchAttrId;

    fn id(&self) -> SwitchAttrId {
        match self {
            Self::SrcMacAddress(_) => SwitchAttrId::SrcMacAddress,
            Self::DefaultVirtualRouterId(_) => SwitchAttrId::DefaultVirtualRouterId,
        }
    }

    fn to_raw(&self) -> SaiAttribute {
        let value = match self {
            Self::SrcMacAddress(mac) => SaiAttributeValue::Mac(*mac),
            Self::DefaultVirtualRouterId(vr) => SaiAttributeValue::Oid(vr.as_raw()),
        };
        SaiAttribute::new(self.id(), value)
    }

    fn from_raw(raw: &SaiAttribute) -> SaiResult<Self> {
        let id = SwitchAttrId::from_raw(raw.id).ok_or_else(|| unknown_attribute("switch", raw.id))?;
        Ok(match id {
            SwitchAttrId::SrcMacAddress => Self::SrcMacAddress(raw.value.as_mac()?),
            SwitchAttrId::DefaultVirtualRouterId => {
                Self::DefaultVirtualRouterId(raw.value.as_object_id()?)
            }
        })
    }
}

impl SaiApiKind for SwitchKind {
    type Attribute = SwitchAttribute;
}

pub type SwitchApi = SaiObjectApi<SwitchKind>;
