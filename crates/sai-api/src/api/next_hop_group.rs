//! Next hop groups and group members.
//!
//! Members are separate objects that point at a group and a next hop. The
//! group's member list and count are read-only views the driver maintains.

use super::{SaiApiKind, SaiObjectApi};
use crate::attribute::{
    sai_attr_id, sai_enum_value, unknown_attribute, SaiAttribute, SaiAttributeSet,
    SaiAttributeValue,
};
use crate::driver::SaiDriver;
use crate::error::{SaiError, SaiResult};
use crate::types::{
    NextHopGroupKind, NextHopGroupMemberKind, NextHopGroupMemberOid, NextHopGroupOid, NextHopOid,
    SwitchOid,
};
use std::sync::Arc;

sai_attr_id! {
    /// Next hop group attribute ids.
    NextHopGroupAttrId {
        NextHopCount = 0,
        NextHopMemberList = 1,
        Type = 2,
    }
}

sai_enum_value! {
    /// Next hop group type.
    NextHopGroupType, "next hop group type" {
        Ecmp = 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextHopGroupAttribute {
    NextHopCount(u32),
    NextHopMemberList(Vec<NextHopGroupMemberOid>),
    Type(NextHopGroupType),
}

impl SaiAttributeSet for NextHopGroupAttribute {
    type Id = NextHopGroupAttrId;

    fn id(&self) -> NextHopGroupAttrId {
        match self {
            Self::NextHopCount(_) => NextHopGroupAttrId::NextHopCount,
            Self::NextHopMemberList(_) => NextHopGroupAttrId::NextHopMemberList,
            Self::Type(_) => NextHopGroupAttrId::Type,
        }
    }

    fn to_raw(&self) -> SaiAttribute {
        let value = match self {
            Self::NextHopCount(count) => SaiAttributeValue::U32(*count),
            Self::NextHopMemberList(members) => {
                SaiAttributeValue::OidList(members.iter().map(|m| m.as_raw()).collect())
            }
            Self::Type(group_type) => group_type.to_value(),
        };
        SaiAttribute::new(self.id(), value)
    }

    fn from_raw(raw: &SaiAttribute) -> SaiResult<Self> {
        let id = NextHopGroupAttrId::from_raw(raw.id)
            .ok_or_else(|| unknown_attribute("next hop group", raw.id))?;
        Ok(match id {
            NextHopGroupAttrId::NextHopCount => Self::NextHopCount(raw.value.as_u32()?),
            NextHopGroupAttrId::NextHopMemberList => Self::NextHopMemberList(
                raw.value
                    .as_oid_list()?
                    .iter()
                    .map(|oid| NextHopGroupMemberOid::from_raw_unchecked(*oid))
                    .collect(),
            ),
            NextHopGroupAttrId::Type => Self::Type(NextHopGroupType::from_value(&raw.value)?),
        })
    }
}

sai_attr_id! {
    /// Next hop group member attribute ids.
    NextHopGroupMemberAttrId {
        NextHopGroupId = 0,
        NextHopId = 1,
        Weight = 2,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextHopGroupMemberAttribute {
    NextHopGroupId(NextHopGroupOid),
    NextHopId(NextHopOid),
    Weight(u32),
}

impl SaiAttributeSet for NextHopGroupMemberAttribute {
    type Id = NextHopGroupMemberAttrId;

    fn id(&self) -> NextHopGroupMemberAttrId {
        match self {
            Self::NextHopGroupId(_) => NextHopGroupMemberAttrId::NextHopGroupId,
            Self::NextHopId(_) => NextHopGroupMemberAttrId::NextHopId,
            Self::Weight(_) => NextHopGroupMemberAttrId::Weight,
        }
    }

    fn to_raw(&self) -> SaiAttribute {
        let value = match self {
            Self::NextHopGroupId(group) => SaiAttributeValue::Oid(group.as_raw()),
            Self::NextHopId(next_hop) => SaiAttributeValue::Oid(next_hop.as_raw()),
            Self::Weight(weight) => SaiAttributeValue::U32(*weight),
        };
        SaiAttribute::new(self.id(), value)
    }

    fn from_raw(raw: &SaiAttribute) -> SaiResult<Self> {
        let id = NextHopGroupMemberAttrId::from_raw(raw.id)
            .ok_or_else(|| unknown_attribute("next hop group member", raw.id))?;
        Ok(match id {
            NextHopGroupMemberAttrId::NextHopGroupId => Self::NextHopGroupId(raw.value.as_object_id()?),
            NextHopGroupMemberAttrId::NextHopId => Self::NextHopId(raw.value.as_object_id()?),
            NextHopGroupMemberAttrId::Weight => Self::Weight(raw.value.as_u32()?),
        })
    }
}

impl SaiApiKind for NextHopGroupKind {
    type Attribute = NextHopGroupAttribute;
}

impl SaiApiKind for NextHopGroupMemberKind {
    type Attribute = NextHopGroupMemberAttribute;
}

/// Function table for next hop groups and their members.
pub struct NextHopGroupApi {
    groups: SaiObjectApi<NextHopGroupKind>,
    members: SaiObjectApi<NextHopGroupMemberKind>,
}

impl NextHopGroupApi {
    pub fn new(driver: Arc<dyn SaiDriver>, switch_id: SwitchOid) -> Self {
        Self {
            groups: SaiObjectApi::new(Arc::clone(&driver), switch_id),
            members: SaiObjectApi::new(driver, switch_id),
        }
    }

    /// Creates an empty group.
    pub fn create_group(&self, group_type: NextHopGroupType) -> SaiResult<NextHopGroupOid> {
        self.groups.create(&[NextHopGroupAttribute::Type(group_type)])
    }

    pub fn remove_group(&self, group: NextHopGroupOid) -> SaiResult<()> {
        self.groups.remove(group)
    }

    pub fn get_group_attribute(
        &self,
        group: NextHopGroupOid,
        attr_id: NextHopGroupAttrId,
    ) -> SaiResult<NextHopGroupAttribute> {
        self.groups.get_attribute(group, attr_id)
    }

    /// Reads the group's hardware member list.
    pub fn member_list(&self, group: NextHopGroupOid) -> SaiResult<Vec<NextHopGroupMemberOid>> {
        match self.get_group_attribute(group, NextHopGroupAttrId::NextHopMemberList)? {
            NextHopGroupAttribute::NextHopMemberList(members) => Ok(members),
            other => Err(SaiError::internal(format!(
                "member list query on {:?} returned {:?}",
                group, other
            ))),
        }
    }

    /// Adds `next_hop` to `group`. A `weight` of 0 leaves the driver's
    /// default (plain ECMP) in place.
    pub fn add_member(
        &self,
        group: NextHopGroupOid,
        next_hop: NextHopOid,
        weight: u32,
    ) -> SaiResult<NextHopGroupMemberOid> {
        if group.is_null() || next_hop.is_null() {
            return Err(SaiError::invalid_parameter(format!(
                "member of {:?} needs non-null group and next hop, got {:?}",
                group, next_hop
            )));
        }
        let mut attributes = vec![
            NextHopGroupMemberAttribute::NextHopGroupId(group),
            NextHopGroupMemberAttribute::NextHopId(next_hop),
        ];
        if weight > 0 {
            attributes.push(NextHopGroupMemberAttribute::Weight(weight));
        }
        self.members.create(&attributes)
    }

    pub fn remove_member(&self, member: NextHopGroupMemberOid) -> SaiResult<()> {
        self.members.remove(member)
    }

    pub fn get_member_attribute(
        &self,
        member: NextHopGroupMemberOid,
        attr_id: NextHopGroupMemberAttrId,
    ) -> SaiResult<NextHopGroupMemberAttribute> {
        self.members.get_attribute(member, attr_id)
    }

    pub fn set_member_attribute(
        &self,
        member: NextHopGroupMemberOid,
        attribute: &NextHopGroupMemberAttribute,
    ) -> SaiResult<()> {
        self.members.set_attribute(member, attribute)
    }
}
