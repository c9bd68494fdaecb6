//! Fake router interfaces.
//!
//! Cross-object checks (virtual router and port existence) live in the
//! driver; this module only validates the attribute combination.

use sai_api::api::router_interface::{
    RouterInterfaceAttrId, RouterInterfaceAttribute, RouterInterfaceType,
};
use sai_api::{MacAddress, PortOid, SaiStatus, VirtualRouterOid};

const DEFAULT_MTU: u32 = 1500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeRouterInterface {
    pub(crate) virtual_router_id: VirtualRouterOid,
    pub(crate) rif_type: RouterInterfaceType,
    pub(crate) port_id: Option<PortOid>,
    pub(crate) src_mac: MacAddress,
    pub(crate) mtu: u32,
}

impl FakeRouterInterface {
    pub(crate) fn create(
        attributes: Vec<RouterInterfaceAttribute>,
        default_mac: MacAddress,
    ) -> Result<Self, SaiStatus> {
        let mut virtual_router_id = None;
        let mut rif_type = None;
        let mut port_id = None;
        let mut src_mac = default_mac;
        let mut mtu = DEFAULT_MTU;

        for attribute in attributes {
            match attribute {
                RouterInterfaceAttribute::VirtualRouterId(vr) => virtual_router_id = Some(vr),
                RouterInterfaceAttribute::Type(t) => rif_type = Some(t),
                RouterInterfaceAttribute::PortId(port) => port_id = Some(port),
                RouterInterfaceAttribute::SrcMacAddress(mac) => src_mac = mac,
                RouterInterfaceAttribute::Mtu(value) => mtu = value,
            }
        }

        let virtual_router_id = virtual_router_id.ok_or(SaiStatus::MandatoryAttributeMissing)?;
        let rif_type = rif_type.ok_or(SaiStatus::MandatoryAttributeMissing)?;
        match (rif_type, port_id) {
            (RouterInterfaceType::Port, None) => return Err(SaiStatus::MandatoryAttributeMissing),
            (RouterInterfaceType::Loopback, Some(_)) => return Err(SaiStatus::InvalidParameter),
            _ => {}
        }

        Ok(Self {
            virtual_router_id,
            rif_type,
            port_id,
            src_mac,
            mtu,
        })
    }

    pub(crate) fn set(&mut self, attribute: RouterInterfaceAttribute) -> Result<(), SaiStatus> {
        match attribute {
            RouterInterfaceAttribute::SrcMacAddress(mac) => self.src_mac = mac,
            RouterInterfaceAttribute::Mtu(mtu) => self.mtu = mtu,
            RouterInterfaceAttribute::VirtualRouterId(_)
            | RouterInterfaceAttribute::Type(_)
            | RouterInterfaceAttribute::PortId(_) => return Err(SaiStatus::InvalidParameter),
        }
        Ok(())
    }

    pub(crate) fn get(&self, id: RouterInterfaceAttrId) -> Result<RouterInterfaceAttribute, SaiStatus> {
        Ok(match id {
            RouterInterfaceAttrId::VirtualRouterId => {
                RouterInterfaceAttribute::VirtualRouterId(self.virtual_router_id)
            }
            RouterInterfaceAttrId::Type => RouterInterfaceAttribute::Type(self.rif_type),
            RouterInterfaceAttrId::PortId => {
                RouterInterfaceAttribute::PortId(self.port_id.ok_or(SaiStatus::InvalidParameter)?)
            }
            RouterInterfaceAttrId::SrcMacAddress => RouterInterfaceAttribute::SrcMacAddress(self.src_mac),
            RouterInterfaceAttrId::Mtu => RouterInterfaceAttribute::Mtu(self.mtu),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vr() -> VirtualRouterOid {
        VirtualRouterOid::from_raw_unchecked(0x3_0000_0000_0001)
    }

    #[test]
    fn test_port_type_requires_port() {
        let result = FakeRouterInterface::create(
            vec![
                RouterInterfaceAttribute::VirtualRouterId(vr()),
                RouterInterfaceAttribute::Type(RouterInterfaceType::Port),
            ],
            MacAddress::ZERO,
        );
        assert_eq!(result, Err(SaiStatus::MandatoryAttributeMissing));
    }

    #[test]
    fn test_loopback_rejects_port() {
        let result = FakeRouterInterface::create(
            vec![
                RouterInterfaceAttribute::VirtualRouterId(vr()),
                RouterInterfaceAttribute::Type(RouterInterfaceType::Loopback),
                RouterInterfaceAttribute::PortId(PortOid::from_raw_unchecked(0x1_0000_0000_0001)),
            ],
            MacAddress::ZERO,
        );
        assert_eq!(result, Err(SaiStatus::InvalidParameter));
    }

    #[test]
    fn test_set_only_mutable_attributes() {
        let mut rif = FakeRouterInterface::create(
            vec![
                RouterInterfaceAttribute::VirtualRouterId(vr()),
                RouterInterfaceAttribute::Type(RouterInterfaceType::Loopback),
            ],
            MacAddress::new([2, 0, 0, 0, 0, 1]),
        )
        .unwrap();
        assert_eq!(rif.src_mac, MacAddress::new([2, 0, 0, 0, 0, 1]));
        assert_eq!(rif.set(RouterInterfaceAttribute::Mtu(9100)), Ok(()));
        assert_eq!(
            rif.set(RouterInterfaceAttribute::Type(RouterInterfaceType::Port)),
            Err(SaiStatus::InvalidParameter)
        );
        assert_eq!(
            rif.get(RouterInterfaceAttrId::PortId),
            Err(SaiStatus::InvalidParameter)
        );
    }
}
