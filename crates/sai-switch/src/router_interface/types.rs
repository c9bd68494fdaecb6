use crate::types::{InterfaceId, PortId};
use sai_api::{MacAddress, RouterInterfaceOid};

/// Desired state of a routed interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwInterface {
    pub id: InterfaceId,
    pub port: PortId,
    /// Source MAC; `None` uses the switch MAC.
    pub mac: Option<MacAddress>,
    pub mtu: u32,
}

impl SwInterface {
    pub fn new(id: InterfaceId, port: PortId) -> Self {
        Self {
            id,
            port,
            mac: None,
            mtu: 9100,
        }
    }
}

/// A programmed router interface. Exposed by reference only.
#[derive(Debug)]
pub struct SaiRouterInterface {
    handle: RouterInterfaceOid,
    attributes: SwInterface,
}

impl SaiRouterInterface {
    pub(crate) fn new(handle: RouterInterfaceOid, attributes: SwInterface) -> Self {
        Self { handle, attributes }
    }

    pub fn handle(&self) -> RouterInterfaceOid {
        self.handle
    }

    pub fn attributes(&self) -> &SwInterface {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut SwInterface {
        &mut self.attributes
    }
}
