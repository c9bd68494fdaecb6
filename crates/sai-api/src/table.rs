//! The API dispatch table shared by every manager.

use crate::api::switch::{SwitchAttrId, SwitchAttribute};
use crate::api::{
    BridgePortApi, NeighborApi, NextHopApi, NextHopGroupApi, PortApi, RouterInterfaceApi,
    SwitchApi,
};
use crate::driver::SaiDriver;
use crate::error::{SaiError, SaiResult};
use crate::types::{SwitchOid, VirtualRouterOid};
use log::info;
use std::fmt;
use std::sync::Arc;

/// One function table per object category, all bound to the same driver
/// and switch.
pub struct SaiApiTable {
    switch_id: SwitchOid,
    default_virtual_router_id: VirtualRouterOid,
    switch: SwitchApi,
    port: PortApi,
    bridge_port: BridgePortApi,
    router_interface: RouterInterfaceApi,
    neighbor: NeighborApi,
    next_hop: NextHopApi,
    next_hop_group: NextHopGroupApi,
}

impl SaiApiTable {
    /// Binds the tables to `switch_id` and reads its default virtual router.
    pub fn new(driver: Arc<dyn SaiDriver>, switch_id: SwitchOid) -> SaiResult<Self> {
        if switch_id.is_null() {
            return Err(SaiError::invalid_parameter("switch OID is null"));
        }

        let switch = SwitchApi::new(Arc::clone(&driver), switch_id);
        let default_virtual_router_id =
            match switch.get_attribute(switch_id, SwitchAttrId::DefaultVirtualRouterId)? {
                SwitchAttribute::DefaultVirtualRouterId(vr) if vr.is_valid() => vr,
                other => {
                    return Err(SaiError::internal(format!(
                        "switch {:?} reported no default virtual router: {:?}",
                        switch_id, other
                    )))
                }
            };
        info!(
            "SAI API table bound to switch {:?}, default virtual router {:?}",
            switch_id, default_virtual_router_id
        );

        Ok(Self {
            switch_id,
            default_virtual_router_id,
            switch,
            port: PortApi::new(Arc::clone(&driver), switch_id),
            bridge_port: BridgePortApi::new(Arc::clone(&driver), switch_id),
            router_interface: RouterInterfaceApi::new(Arc::clone(&driver), switch_id),
            neighbor: NeighborApi::new(Arc::clone(&driver), switch_id),
            next_hop: NextHopApi::new(Arc::clone(&driver), switch_id),
            next_hop_group: NextHopGroupApi::new(driver, switch_id),
        })
    }

    pub fn switch_id(&self) -> SwitchOid {
        self.switch_id
    }

    pub fn default_virtual_router_id(&self) -> VirtualRouterOid {
        self.default_virtual_router_id
    }

    pub fn switch_api(&self) -> &SwitchApi {
        &self.switch
    }

    pub fn port_api(&self) -> &PortApi {
        &self.port
    }

    pub fn bridge_port_api(&self) -> &BridgePortApi {
        &self.bridge_port
    }

    pub fn router_interface_api(&self) -> &RouterInterfaceApi {
        &self.router_interface
    }

    pub fn neighbor_api(&self) -> &NeighborApi {
        &self.neighbor
    }

    pub fn next_hop_api(&self) -> &NextHopApi {
        &self.next_hop
    }

    pub fn next_hop_group_api(&self) -> &NextHopGroupApi {
        &self.next_hop_group
    }
}

impl fmt::Debug for SaiApiTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaiApiTable")
            .field("switch_id", &self.switch_id)
            .field("default_virtual_router_id", &self.default_virtual_router_id)
            .finish_non_exhaustive()
    }
}
