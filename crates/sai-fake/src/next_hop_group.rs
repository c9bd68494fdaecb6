//! Fake next hop groups and members.
//!
//! A group's member list and count are derived from the member table by the
//! driver, so the group object itself only carries its type.

use sai_api::api::next_hop_group::{
    NextHopGroupAttribute, NextHopGroupMemberAttrId, NextHopGroupMemberAttribute,
    NextHopGroupType,
};
use sai_api::{NextHopGroupOid, NextHopOid, SaiStatus};

const DEFAULT_WEIGHT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeNextHopGroup {
    pub(crate) group_type: NextHopGroupType,
}

impl FakeNextHopGroup {
    pub(crate) fn create(attributes: Vec<NextHopGroupAttribute>) -> Result<Self, SaiStatus> {
        let mut group_type = None;
        for attribute in attributes {
            match attribute {
                NextHopGroupAttribute::Type(t) => group_type = Some(t),
                NextHopGroupAttribute::NextHopCount(_)
                | NextHopGroupAttribute::NextHopMemberList(_) => {
                    return Err(SaiStatus::InvalidParameter)
                }
            }
        }
        Ok(Self {
            group_type: group_type.ok_or(SaiStatus::MandatoryAttributeMissing)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeNextHopGroupMember {
    pub(crate) group_id: NextHopGroupOid,
    pub(crate) next_hop_id: NextHopOid,
    pub(crate) weight: u32,
}

impl FakeNextHopGroupMember {
    pub(crate) fn create(attributes: Vec<NextHopGroupMemberAttribute>) -> Result<Self, SaiStatus> {
        let mut group_id = None;
        let mut next_hop_id = None;
        let mut weight = DEFAULT_WEIGHT;
        for attribute in attributes {
            match attribute {
                NextHopGroupMemberAttribute::NextHopGroupId(group) => group_id = Some(group),
                NextHopGroupMemberAttribute::NextHopId(next_hop) => next_hop_id = Some(next_hop),
                NextHopGroupMemberAttribute::Weight(0) => return Err(SaiStatus::InvalidParameter),
                NextHopGroupMemberAttribute::Weight(value) => weight = value,
            }
        }
        Ok(Self {
            group_id: group_id.ok_or(SaiStatus::MandatoryAttributeMissing)?,
            next_hop_id: next_hop_id.ok_or(SaiStatus::MandatoryAttributeMissing)?,
            weight,
        })
    }

    pub(crate) fn set(&mut self, attribute: NextHopGroupMemberAttribute) -> Result<(), SaiStatus> {
        match attribute {
            NextHopGroupMemberAttribute::Weight(weight) if weight > 0 => {
                self.weight = weight;
                Ok(())
            }
            _ => Err(SaiStatus::InvalidParameter),
        }
    }

    pub(crate) fn get(&self, id: NextHopGroupMemberAttrId) -> NextHopGroupMemberAttribute {
        match id {
            NextHopGroupMemberAttrId::NextHopGroupId => {
                NextHopGroupMemberAttribute::NextHopGroupId(self.group_id)
            }
            NextHopGroupMemberAttrId::NextHopId => {
                NextHopGroupMemberAttribute::NextHopId(self.next_hop_id)
            }
            NextHopGroupMemberAttrId::Weight => NextHopGroupMemberAttribute::Weight(self.weight),
        }
    }
}
