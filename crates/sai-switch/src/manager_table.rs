//! Composition root for the resource managers.
//!
//! Every manager is bound to the same [`SaiApiTable`]. Operations that span
//! managers go through the table, which hands each manager the sibling it
//! needs for that one call. Hardware events are serialized onto the same
//! `&mut self` context as the apply pipeline.

use crate::audit::{AuditCategory, AuditOutcome, AuditRecord};
use crate::config::ManagerTableConfig;
use crate::error::{ManagerError, ManagerResult, ResourceKind};
use crate::events::{HwSwitchEvent, HwSwitchEventObserver, ObserverId};
use crate::neighbor::{
    NeighborKey, NeighborLookup, NeighborManager, NeighborObserver, ResolvedNeighbor, SwNeighbor,
};
use crate::next_hop_group::{NextHopGroupHandle, NextHopGroupManager, NextHopSet};
use crate::port::PortManager;
use crate::router_interface::{RouterInterfaceManager, SwInterface};
use crate::types::PortId;
use crate::{audit_log, debug_log, error_log};
use sai_api::{PortOid, RouterInterfaceOid, SaiApiTable};
use std::sync::Arc;

pub struct SaiManagerTable {
    api: Arc<SaiApiTable>,
    config: ManagerTableConfig,
    port_manager: PortManager,
    router_interface_manager: RouterInterfaceManager,
    neighbor_manager: NeighborManager,
    next_hop_group_manager: NextHopGroupManager,
    observers: Vec<(ObserverId, Box<dyn HwSwitchEventObserver>)>,
    next_observer_id: u64,
}

impl SaiManagerTable {
    pub fn new(api: Arc<SaiApiTable>, config: ManagerTableConfig) -> Self {
        audit_log!(
            AuditRecord::new(AuditCategory::SystemLifecycle, "SaiManagerTable", "create")
                .with_outcome(AuditOutcome::Success)
                .with_object_id(format!("{}", api.switch_id()))
                .with_object_type("switch")
        );
        Self {
            port_manager: PortManager::new(Arc::clone(&api)),
            router_interface_manager: RouterInterfaceManager::new(Arc::clone(&api)),
            neighbor_manager: NeighborManager::new(Arc::clone(&api)),
            next_hop_group_manager: NextHopGroupManager::new(
                Arc::clone(&api),
                config.next_hop_group.clone(),
            ),
            api,
            config,
            observers: Vec::new(),
            next_observer_id: 0,
        }
    }

    pub fn api(&self) -> &SaiApiTable {
        &self.api
    }

    pub fn config(&self) -> &ManagerTableConfig {
        &self.config
    }

    pub fn port_manager(&self) -> &PortManager {
        &self.port_manager
    }

    pub fn port_manager_mut(&mut self) -> &mut PortManager {
        &mut self.port_manager
    }

    pub fn router_interface_manager(&self) -> &RouterInterfaceManager {
        &self.router_interface_manager
    }

    pub fn router_interface_manager_mut(&mut self) -> &mut RouterInterfaceManager {
        &mut self.router_interface_manager
    }

    pub fn neighbor_manager(&self) -> &NeighborManager {
        &self.neighbor_manager
    }

    pub fn neighbor_manager_mut(&mut self) -> &mut NeighborManager {
        &mut self.neighbor_manager
    }

    pub fn next_hop_group_manager(&self) -> &NextHopGroupManager {
        &self.next_hop_group_manager
    }

    pub fn next_hop_group_manager_mut(&mut self) -> &mut NextHopGroupManager {
        &mut self.next_hop_group_manager
    }

    pub fn add_router_interface(&mut self, intf: &SwInterface) -> ManagerResult<RouterInterfaceOid> {
        self.router_interface_manager.add(intf, &self.port_manager)
    }

    pub fn change_router_interface(&mut self, intf: &SwInterface) -> ManagerResult<()> {
        self.router_interface_manager.change(intf, &self.port_manager)
    }

    /// Programs a neighbor and brings every group that uses it up to date.
    pub fn add_neighbor(&mut self, neighbor: &SwNeighbor) -> ManagerResult<()> {
        self.neighbor_manager.add_neighbor(
            neighbor,
            &self.router_interface_manager,
            &mut self.next_hop_group_manager,
        )
    }

    pub fn remove_neighbor(&mut self, key: &NeighborKey) -> ManagerResult<()> {
        self.neighbor_manager
            .remove_neighbor(key, &mut self.next_hop_group_manager)
    }

    pub fn change_neighbor(&mut self, neighbor: &SwNeighbor) -> ManagerResult<()> {
        self.neighbor_manager.change_neighbor(neighbor)
    }

    pub fn inc_ref_or_add_next_hop_group(&mut self, key: NextHopSet) -> ManagerResult<NextHopGroupHandle> {
        self.next_hop_group_manager
            .inc_ref_or_add_next_hop_group(key, &self.neighbor_manager)
    }

    pub fn add_event_observer(&mut self, observer: Box<dyn HwSwitchEventObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn remove_event_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Applies one hardware event.
    ///
    /// Neighbor events are idempotent and can be retried after a failure.
    /// Resolving a neighbor that is already programmed, or unresolving one
    /// that is already gone, leaves the neighbor table alone but still
    /// re-syncs group membership, so a member add or removal that failed the
    /// first time is attempted again.
    pub fn handle_event(&mut self, event: HwSwitchEvent) -> ManagerResult<()> {
        match event {
            HwSwitchEvent::LinkStateChanged { port, up } => {
                let id = self.port_manager.set_oper_state(port, up)?;
                audit_log!(
                    AuditRecord::new(AuditCategory::LinkEvent, "SaiManagerTable", "link_state_changed")
                        .with_outcome(AuditOutcome::Success)
                        .with_object_id(id.to_string())
                        .with_object_type("port")
                        .with_details(serde_json::json!({ "up": up }))
                );
                for (_, observer) in self.observers.iter_mut() {
                    observer.link_state_changed(id, up);
                }
                Ok(())
            }
            HwSwitchEvent::NeighborResolved(neighbor) => {
                let known_mac = self
                    .neighbor_manager
                    .get_neighbor(&neighbor.key())
                    .map(|existing| existing.mac());
                match known_mac {
                    None => self.add_neighbor(&neighbor),
                    Some(mac) => {
                        if mac != neighbor.mac {
                            self.change_neighbor(&neighbor)?;
                        } else {
                            debug_log!("SaiManagerTable", neighbor = %neighbor.key(), "neighbor already resolved");
                        }
                        self.resync_resolved(&neighbor.key())
                    }
                }
            }
            HwSwitchEvent::NeighborUnresolved(key) => {
                if self.neighbor_manager.contains(&key) {
                    return self.remove_neighbor(&key);
                }
                debug_log!("SaiManagerTable", neighbor = %key, "neighbor already unresolved");
                self.next_hop_group_manager.on_neighbor_unresolved(&key)
            }
            HwSwitchEvent::PacketReceived { port, frame } => {
                let id = self.port_id(port)?;
                for (_, observer) in self.observers.iter_mut() {
                    observer.packet_received(id, &frame);
                }
                Ok(())
            }
        }
    }

    fn resync_resolved(&mut self, key: &NeighborKey) -> ManagerResult<()> {
        let router_interface = self
            .neighbor_manager
            .resolved_router_interface(key)
            .ok_or_else(|| ManagerError::not_found(ResourceKind::Neighbor, key))?;
        self.next_hop_group_manager.on_neighbor_resolved(&ResolvedNeighbor {
            key: *key,
            router_interface,
        })
    }

    fn port_id(&self, port: PortOid) -> ManagerResult<PortId> {
        self.port_manager
            .get_port_id(port)
            .ok_or_else(|| ManagerError::not_found(ResourceKind::Port, port))
    }

    /// Removes everything programmed through this table: groups first,
    /// then neighbors, router interfaces and ports. Continues past failures
    /// and returns the first one.
    pub fn reset(&mut self) -> ManagerResult<()> {
        let results = [
            self.next_hop_group_manager.clear(),
            self.neighbor_manager.clear(),
            self.router_interface_manager.clear(),
            self.port_manager.clear(),
        ];
        let first_error = results.into_iter().find_map(Result::err);

        let record = AuditRecord::new(AuditCategory::SystemLifecycle, "SaiManagerTable", "reset")
            .with_object_id(format!("{}", self.api.switch_id()))
            .with_object_type("switch");
        match &first_error {
            Some(err) => {
                audit_log!(record.with_error(err.to_string()));
            }
            None => {
                audit_log!(record.with_outcome(AuditOutcome::Success));
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for SaiManagerTable {
    fn drop(&mut self) {
        if !self.config.teardown_on_drop {
            return;
        }
        if let Err(e) = self.reset() {
            error_log!("SaiManagerTable", error = %e, "teardown failed");
        }
    }
}
