//! Fake next hops. Every attribute is mandatory and create-only.

use sai_api::api::next_hop::{NextHopAttrId, NextHopAttribute, NextHopType};
use sai_api::{RouterInterfaceOid, SaiStatus};
use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeNextHop {
    pub(crate) next_hop_type: NextHopType,
    pub(crate) ip: IpAddr,
    pub(crate) router_interface_id: RouterInterfaceOid,
}

impl FakeNextHop {
    pub(crate) fn create(attributes: Vec<NextHopAttribute>) -> Result<Self, SaiStatus> {
        let mut next_hop_type = None;
        let mut ip = None;
        let mut router_interface_id = None;
        for attribute in attributes {
            match attribute {
                NextHopAttribute::Type(t) => next_hop_type = Some(t),
                NextHopAttribute::Ip(addr) => ip = Some(addr),
                NextHopAttribute::RouterInterfaceId(rif) => router_interface_id = Some(rif),
            }
        }

        Ok(Self {
            next_hop_type: next_hop_type.ok_or(SaiStatus::MandatoryAttributeMissing)?,
            ip: ip.ok_or(SaiStatus::MandatoryAttributeMissing)?,
            router_interface_id: router_interface_id.ok_or(SaiStatus::MandatoryAttributeMissing)?,
        })
    }

    pub(crate) fn get(&self, id: NextHopAttrId) -> NextHopAttribute {
        match id {
            NextHopAttrId::Type => NextHopAttribute::Type(self.next_hop_type),
            NextHopAttrId::Ip => NextHopAttribute::Ip(self.ip),
            NextHopAttrId::RouterInterfaceId => {
                NextHopAttribute::RouterInterfaceId(self.router_interface_id)
            }
        }
    }
}
