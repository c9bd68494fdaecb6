//! Port lifecycle against the SAI port API.

use super::types::{SaiPort, SwPort};
use crate::audit::{AuditCategory, AuditOutcome, AuditRecord};
use crate::error::{ManagerError, ManagerResult, ResourceKind};
use crate::id_map::IdMap;
use crate::types::{PortId, VlanId};
use crate::{audit_log, debug_log, error_log, warn_log};
use sai_api::api::bridge_port::{BridgePortAttribute, BridgePortType};
use sai_api::api::port::{PortApi, PortAttribute};
use sai_api::{BridgePortOid, PortOid, SaiApiTable};
use std::sync::Arc;

pub struct PortManager {
    api: Arc<SaiApiTable>,
    ports: IdMap<PortId, PortOid, SaiPort>,
}

impl PortManager {
    pub fn new(api: Arc<SaiApiTable>) -> Self {
        Self {
            api,
            ports: IdMap::new(),
        }
    }

    /// Creates the hardware port and its bridge port, then records both
    /// mappings. If the bridge port cannot be created the port is removed
    /// again.
    pub fn add(&mut self, port: &SwPort) -> ManagerResult<PortOid> {
        if self.ports.contains_key(&port.id) {
            let err = ManagerError::duplicate(ResourceKind::Port, port.id);
            audit_log!(
                AuditRecord::new(AuditCategory::ResourceCreate, "PortManager", "create_port")
                    .with_object_id(port.name.clone())
                    .with_object_type("port")
                    .with_error(err.to_string())
            );
            return Err(err);
        }

        let handle = match self.api.port_api().create(&port.create_attributes()) {
            Ok(handle) => handle,
            Err(e) => {
                let err = ManagerError::sai(ResourceKind::Port, e);
                audit_log!(
                    AuditRecord::new(AuditCategory::ResourceCreate, "PortManager", "create_port")
                        .with_object_id(port.name.clone())
                        .with_object_type("port")
                        .with_error(err.to_string())
                );
                return Err(err);
            }
        };

        let bridge_port = match self.create_bridge_port(handle) {
            Ok(bridge_port) => bridge_port,
            Err(err) => {
                self.undo_create(port.id, handle, None);
                audit_log!(
                    AuditRecord::new(AuditCategory::ResourceCreate, "PortManager", "create_port")
                        .with_object_id(port.name.clone())
                        .with_object_type("port")
                        .with_error(err.to_string())
                );
                return Err(err);
            }
        };

        let sai_port = SaiPort::new(handle, bridge_port, port.clone());
        if let Err(e) = self.ports.insert(port.id, handle, sai_port) {
            // Driver handed out a handle we still map; undo the create.
            self.undo_create(port.id, handle, Some(bridge_port));
            return Err(ManagerError::invalid_state(e.to_string()));
        }

        audit_log!(
            AuditRecord::new(AuditCategory::ResourceCreate, "PortManager", "create_port")
                .with_outcome(AuditOutcome::Success)
                .with_object_id(format!("{}", handle))
                .with_object_type("port")
                .with_details(serde_json::json!({
                    "name": port.name,
                    "lanes": port.lanes,
                    "speed": port.speed,
                    "bridge_port": format!("{}", bridge_port),
                }))
        );
        Ok(handle)
    }

    fn create_bridge_port(&self, port: PortOid) -> ManagerResult<BridgePortOid> {
        self.api
            .bridge_port_api()
            .create(&[
                BridgePortAttribute::Type(BridgePortType::Port),
                BridgePortAttribute::PortId(port),
                BridgePortAttribute::AdminState(true),
            ])
            .map_err(ManagerError::sai_for(ResourceKind::BridgePort))
    }

    fn undo_create(&self, id: PortId, handle: PortOid, bridge_port: Option<BridgePortOid>) {
        if let Some(bridge_port) = bridge_port {
            if let Err(e) = self.api.bridge_port_api().remove(bridge_port) {
                warn_log!("PortManager", port = %id, error = %e, "failed to undo bridge port create");
            }
        }
        if let Err(e) = self.api.port_api().remove(handle) {
            warn_log!("PortManager", port = %id, error = %e, "failed to undo port create");
        }
    }

    /// Pushes only the attributes that differ from the stored snapshot.
    ///
    /// Attributes are applied in order: speed, admin state, MTU, FEC, lanes.
    /// On failure the snapshot keeps every attribute set before the failing
    /// one, matching what hardware actually holds.
    pub fn change(&mut self, port: &SwPort) -> ManagerResult<()> {
        let api = self.api.port_api();
        let current = self
            .ports
            .get_mut(&port.id)
            .ok_or_else(|| ManagerError::not_found(ResourceKind::Port, port.id))?;
        let handle = current.handle();
        let mut applied = 0usize;
        let result = apply_delta(api, handle, current.attributes_mut(), port, &mut applied);

        match &result {
            Ok(()) => {
                if applied > 0 {
                    audit_log!(
                        AuditRecord::new(AuditCategory::ResourceModify, "PortManager", "set_port_attributes")
                            .with_outcome(AuditOutcome::Success)
                            .with_object_id(format!("{}", handle))
                            .with_object_type("port")
                            .with_details(serde_json::json!({ "applied": applied }))
                    );
                } else {
                    debug_log!("PortManager", port = %port.id, "no attribute changes");
                }
            }
            Err(err) => {
                audit_log!(
                    AuditRecord::new(AuditCategory::ResourceModify, "PortManager", "set_port_attributes")
                        .with_object_id(format!("{}", handle))
                        .with_object_type("port")
                        .with_error(err.to_string())
                        .with_details(serde_json::json!({ "applied": applied }))
                );
            }
        }
        result
    }

    /// Removes the bridge port and then the hardware port. On failure both
    /// mappings stay in place. If the port itself cannot be removed its
    /// bridge port is recreated so the port stays attached.
    pub fn remove(&mut self, id: PortId) -> ManagerResult<()> {
        let (handle, bridge_port) = self
            .ports
            .get(&id)
            .map(|port| (port.handle(), port.bridge_port()))
            .ok_or_else(|| ManagerError::not_found(ResourceKind::Port, id))?;

        if let Some(bridge_port) = bridge_port {
            if let Err(e) = self.api.bridge_port_api().remove(bridge_port) {
                let err = ManagerError::sai(ResourceKind::BridgePort, e);
                audit_log!(
                    AuditRecord::new(AuditCategory::ResourceDelete, "PortManager", "remove_bridge_port")
                        .with_object_id(format!("{}", bridge_port))
                        .with_object_type("bridge_port")
                        .with_error(err.to_string())
                );
                return Err(err);
            }
        }

        if let Err(e) = self.api.port_api().remove(handle) {
            let err = ManagerError::sai(ResourceKind::Port, e);
            audit_log!(
                AuditRecord::new(AuditCategory::ResourceDelete, "PortManager", "remove_port")
                    .with_object_id(format!("{}", handle))
                    .with_object_type("port")
                    .with_error(err.to_string())
            );
            let restored = match bridge_port {
                Some(_) => match self.create_bridge_port(handle) {
                    Ok(bridge_port) => Some(bridge_port),
                    Err(restore_err) => {
                        error_log!("PortManager", port = %id, error = %restore_err,
                            "port left without a bridge port");
                        None
                    }
                },
                None => None,
            };
            if let Some(port) = self.ports.get_mut(&id) {
                port.set_bridge_port(restored);
            }
            return Err(err);
        }
        self.ports.remove(&id);

        audit_log!(
            AuditRecord::new(AuditCategory::ResourceDelete, "PortManager", "remove_port")
                .with_outcome(AuditOutcome::Success)
                .with_object_id(format!("{}", handle))
                .with_object_type("port")
        );
        Ok(())
    }

    /// Assigns the VLAN untagged ingress traffic on the port is classified
    /// into. Setting the current VLAN again is a no-op.
    pub fn set_port_vlan(&mut self, id: PortId, vlan: VlanId) -> ManagerResult<()> {
        if !vlan.is_assignable() {
            return Err(ManagerError::invalid_parameter(
                ResourceKind::Port,
                format!("{} is outside {}-{}", vlan, VlanId::MIN, VlanId::MAX),
            ));
        }
        let port = self
            .ports
            .get_mut(&id)
            .ok_or_else(|| ManagerError::not_found(ResourceKind::Port, id))?;
        if port.port_vlan() == Some(vlan) {
            return Ok(());
        }

        let handle = port.handle();
        if let Err(e) = self
            .api
            .port_api()
            .set_attribute(handle, &PortAttribute::PortVlanId(vlan.0))
        {
            let err = ManagerError::sai(ResourceKind::Port, e);
            audit_log!(
                AuditRecord::new(AuditCategory::ResourceModify, "PortManager", "set_port_vlan")
                    .with_object_id(format!("{}", handle))
                    .with_object_type("port")
                    .with_error(err.to_string())
            );
            return Err(err);
        }
        port.set_port_vlan(vlan);

        audit_log!(
            AuditRecord::new(AuditCategory::ResourceModify, "PortManager", "set_port_vlan")
                .with_outcome(AuditOutcome::Success)
                .with_object_id(format!("{}", handle))
                .with_object_type("port")
                .with_details(serde_json::json!({ "vlan": vlan.0 }))
        );
        Ok(())
    }

    pub fn port_vlan(&self, id: PortId) -> Option<VlanId> {
        self.ports.get(&id).and_then(SaiPort::port_vlan)
    }

    /// Records a link-state report and returns the software port it maps to.
    pub fn set_oper_state(&mut self, handle: PortOid, up: bool) -> ManagerResult<PortId> {
        let port = self
            .ports
            .get_by_handle_mut(&handle)
            .ok_or_else(|| ManagerError::not_found(ResourceKind::Port, handle))?;
        port.set_oper_up(up);
        Ok(port.id())
    }

    pub fn get_port(&self, id: PortId) -> Option<&SaiPort> {
        self.ports.get(&id)
    }

    pub fn get_port_by_handle(&self, handle: PortOid) -> Option<&SaiPort> {
        self.ports.get_by_handle(&handle)
    }

    pub fn get_port_id(&self, handle: PortOid) -> Option<PortId> {
        self.ports.key_by_handle(&handle).copied()
    }

    pub fn port_handle(&self, id: PortId) -> Option<PortOid> {
        self.ports.handle(&id)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Removes every port, continuing past failures. Returns the first error.
    pub fn clear(&mut self) -> ManagerResult<()> {
        let ids: Vec<PortId> = self.ports.keys().copied().collect();
        let mut first_error = None;
        for id in ids {
            if let Err(e) = self.remove(id) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn apply_delta(
    api: &PortApi,
    handle: PortOid,
    snapshot: &mut SwPort,
    port: &SwPort,
    applied: &mut usize,
) -> ManagerResult<()> {
    let mut set = |attribute: PortAttribute| -> ManagerResult<()> {
        api.set_attribute(handle, &attribute)
            .map_err(ManagerError::sai_for(ResourceKind::Port))?;
        *applied += 1;
        Ok(())
    };

    if snapshot.speed != port.speed {
        set(PortAttribute::Speed(port.speed))?;
        snapshot.speed = port.speed;
    }
    if snapshot.admin_up != port.admin_up {
        set(PortAttribute::AdminState(port.admin_up))?;
        snapshot.admin_up = port.admin_up;
    }
    if snapshot.mtu != port.mtu {
        set(PortAttribute::Mtu(port.mtu))?;
        snapshot.mtu = port.mtu;
    }
    if snapshot.fec != port.fec {
        set(PortAttribute::FecMode(port.fec))?;
        snapshot.fec = port.fec;
    }
    if snapshot.lanes != port.lanes {
        set(PortAttribute::HwLaneList(port.lanes.clone()))?;
        snapshot.lanes = port.lanes.clone();
    }
    snapshot.name = port.name.clone();
    Ok(())
}
