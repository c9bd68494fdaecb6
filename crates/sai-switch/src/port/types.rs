//! Port value types.

use crate::types::{PortId, VlanId};
use sai_api::api::port::{FecMode, PortAttribute};
use sai_api::{BridgePortOid, PortOid};

/// Desired state of a port as the apply pipeline sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwPort {
    pub id: PortId,
    pub name: String,
    pub lanes: Vec<u32>,
    /// Speed in Mbps.
    pub speed: u32,
    pub admin_up: bool,
    pub mtu: u32,
    pub fec: FecMode,
}

impl SwPort {
    pub fn new(id: PortId, name: impl Into<String>, lanes: Vec<u32>, speed: u32) -> Self {
        Self {
            id,
            name: name.into(),
            lanes,
            speed,
            admin_up: false,
            mtu: 9100,
            fec: FecMode::None,
        }
    }

    pub(crate) fn create_attributes(&self) -> Vec<PortAttribute> {
        vec![
            PortAttribute::HwLaneList(self.lanes.clone()),
            PortAttribute::Speed(self.speed),
            PortAttribute::AdminState(self.admin_up),
            PortAttribute::Mtu(self.mtu),
            PortAttribute::FecMode(self.fec),
        ]
    }
}

/// A programmed port.
///
/// Owns its hardware handle one-to-one, so it is neither `Clone` nor handed
/// out by value. The manager exposes it by reference only. A port also owns
/// the bridge port that attaches it to the default bridge.
#[derive(Debug)]
pub struct SaiPort {
    handle: PortOid,
    bridge_port: Option<BridgePortOid>,
    attributes: SwPort,
    port_vlan: Option<VlanId>,
    oper_up: bool,
}

impl SaiPort {
    pub(crate) fn new(handle: PortOid, bridge_port: BridgePortOid, attributes: SwPort) -> Self {
        Self {
            handle,
            bridge_port: Some(bridge_port),
            attributes,
            port_vlan: None,
            oper_up: false,
        }
    }

    pub fn handle(&self) -> PortOid {
        self.handle
    }

    pub fn id(&self) -> PortId {
        self.attributes.id
    }

    /// The bridge port, or `None` if a failed removal left the port detached.
    pub fn bridge_port(&self) -> Option<BridgePortOid> {
        self.bridge_port
    }

    pub(crate) fn set_bridge_port(&mut self, bridge_port: Option<BridgePortOid>) {
        self.bridge_port = bridge_port;
    }

    /// VLAN assigned to untagged ingress traffic, once one has been set.
    pub fn port_vlan(&self) -> Option<VlanId> {
        self.port_vlan
    }

    pub(crate) fn set_port_vlan(&mut self, vlan: VlanId) {
        self.port_vlan = Some(vlan);
    }

    /// Attribute values hardware has accepted.
    pub fn attributes(&self) -> &SwPort {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut SwPort {
        &mut self.attributes
    }

    /// Last link state reported by hardware.
    pub fn oper_up(&self) -> bool {
        self.oper_up
    }

    pub(crate) fn set_oper_up(&mut self, up: bool) {
        self.oper_up = up;
    }
}
