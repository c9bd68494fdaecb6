use super::types::{SaiRouterInterface, SwInterface};
use crate::audit::{AuditCategory, AuditOutcome, AuditRecord};
use crate::error::{ManagerError, ManagerResult, ResourceKind};
use crate::id_map::IdMap;
use crate::port::PortManager;
use crate::types::InterfaceId;
use crate::{audit_log, warn_log};
use sai_api::api::router_interface::{RouterInterfaceAttribute, RouterInterfaceType};
use sai_api::{RouterInterfaceOid, SaiApiTable};
use std::sync::Arc;

pub struct RouterInterfaceManager {
    api: Arc<SaiApiTable>,
    interfaces: IdMap<InterfaceId, RouterInterfaceOid, SaiRouterInterface>,
}

impl RouterInterfaceManager {
    pub fn new(api: Arc<SaiApiTable>) -> Self {
        Self {
            api,
            interfaces: IdMap::new(),
        }
    }

    pub fn add(&mut self, intf: &SwInterface, ports: &PortManager) -> ManagerResult<RouterInterfaceOid> {
        if self.interfaces.contains_key(&intf.id) {
            return Err(ManagerError::duplicate(ResourceKind::RouterInterface, intf.id));
        }
        let port = ports
            .port_handle(intf.port)
            .ok_or_else(|| ManagerError::not_found(ResourceKind::Port, intf.port))?;

        let mut attributes = vec![
            RouterInterfaceAttribute::VirtualRouterId(self.api.default_virtual_router_id()),
            RouterInterfaceAttribute::Type(RouterInterfaceType::Port),
            RouterInterfaceAttribute::PortId(port),
            RouterInterfaceAttribute::Mtu(intf.mtu),
        ];
        if let Some(mac) = intf.mac {
            attributes.push(RouterInterfaceAttribute::SrcMacAddress(mac));
        }

        let handle = match self.api.router_interface_api().create(&attributes) {
            Ok(handle) => handle,
            Err(e) => {
                let err = ManagerError::sai(ResourceKind::RouterInterface, e);
                audit_log!(
                    AuditRecord::new(
                        AuditCategory::ResourceCreate,
                        "RouterInterfaceManager",
                        "create_router_interface"
                    )
                    .with_object_id(intf.id.to_string())
                    .with_object_type("router_interface")
                    .with_error(err.to_string())
                );
                return Err(err);
            }
        };

        if let Err(e) = self
            .interfaces
            .insert(intf.id, handle, SaiRouterInterface::new(handle, intf.clone()))
        {
            if let Err(remove_err) = self.api.router_interface_api().remove(handle) {
                warn_log!("RouterInterfaceManager", interface = %intf.id, error = %remove_err,
                    "failed to undo router interface create");
            }
            return Err(ManagerError::invalid_state(e.to_string()));
        }

        audit_log!(
            AuditRecord::new(
                AuditCategory::ResourceCreate,
                "RouterInterfaceManager",
                "create_router_interface"
            )
            .with_outcome(AuditOutcome::Success)
            .with_object_id(format!("{}", handle))
            .with_object_type("router_interface")
            .with_details(serde_json::json!({
                "interface": intf.id.to_string(),
                "port": format!("{}", port),
            }))
        );
        Ok(handle)
    }

    /// Applies changed MAC and MTU in place. A new port binding is pushed as
    /// well and hardware rejects it, since the binding is create-only.
    pub fn change(&mut self, intf: &SwInterface, ports: &PortManager) -> ManagerResult<()> {
        let api = self.api.router_interface_api();
        let current = self
            .interfaces
            .get_mut(&intf.id)
            .ok_or_else(|| ManagerError::not_found(ResourceKind::RouterInterface, intf.id))?;
        let handle = current.handle();
        let snapshot = current.attributes_mut();

        if snapshot.mac != intf.mac {
            let mac = intf.mac.ok_or_else(|| {
                ManagerError::invalid_parameter(
                    ResourceKind::RouterInterface,
                    format!("source MAC of {} cannot be unset", intf.id),
                )
            })?;
            api.set_attribute(handle, &RouterInterfaceAttribute::SrcMacAddress(mac))
                .map_err(ManagerError::sai_for(ResourceKind::RouterInterface))?;
            snapshot.mac = intf.mac;
        }
        if snapshot.mtu != intf.mtu {
            api.set_attribute(handle, &RouterInterfaceAttribute::Mtu(intf.mtu))
                .map_err(ManagerError::sai_for(ResourceKind::RouterInterface))?;
            snapshot.mtu = intf.mtu;
        }
        if snapshot.port != intf.port {
            let port = ports
                .port_handle(intf.port)
                .ok_or_else(|| ManagerError::not_found(ResourceKind::Port, intf.port))?;
            api.set_attribute(handle, &RouterInterfaceAttribute::PortId(port))
                .map_err(ManagerError::sai_for(ResourceKind::RouterInterface))?;
            snapshot.port = intf.port;
        }
        Ok(())
    }

    pub fn remove(&mut self, id: InterfaceId) -> ManagerResult<()> {
        let handle = self
            .interfaces
            .handle(&id)
            .ok_or_else(|| ManagerError::not_found(ResourceKind::RouterInterface, id))?;

        if let Err(e) = self.api.router_interface_api().remove(handle) {
            let err = ManagerError::sai(ResourceKind::RouterInterface, e);
            audit_log!(
                AuditRecord::new(
                    AuditCategory::ResourceDelete,
                    "RouterInterfaceManager",
                    "remove_router_interface"
                )
                .with_object_id(format!("{}", handle))
                .with_object_type("router_interface")
                .with_error(err.to_string())
            );
            return Err(err);
        }
        self.interfaces.remove(&id);

        audit_log!(
            AuditRecord::new(
                AuditCategory::ResourceDelete,
                "RouterInterfaceManager",
                "remove_router_interface"
            )
            .with_outcome(AuditOutcome::Success)
            .with_object_id(format!("{}", handle))
            .with_object_type("router_interface")
        );
        Ok(())
    }

    pub fn get_interface(&self, id: InterfaceId) -> Option<&SaiRouterInterface> {
        self.interfaces.get(&id)
    }

    pub fn router_interface_handle(&self, id: InterfaceId) -> Option<RouterInterfaceOid> {
        self.interfaces.handle(&id)
    }

    pub fn get_interface_id(&self, handle: RouterInterfaceOid) -> Option<InterfaceId> {
        self.interfaces.key_by_handle(&handle).copied()
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Removes every router interface, continuing past failures.
    pub fn clear(&mut self) -> ManagerResult<()> {
        let ids: Vec<InterfaceId> = self.interfaces.keys().copied().collect();
        let mut first_error = None;
        for id in ids {
            if let Err(e) = self.remove(id) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{api_table, sample_port};
    use crate::types::PortId;
    use pretty_assertions::assert_eq;
    use sai_api::api::router_interface::RouterInterfaceAttrId;
    use sai_api::{MacAddress, SaiObjectType};

    fn setup() -> (Arc<sai_fake::FakeSai>, Arc<SaiApiTable>, PortManager) {
        let (fake, api) = api_table();
        let mut ports = PortManager::new(api.clone());
        ports.add(&sample_port(1)).unwrap();
        ports.add(&sample_port(2)).unwrap();
        (fake, api, ports)
    }

    #[test]
    fn test_add_and_lookup() {
        let (fake, api, ports) = setup();
        let mut rifs = RouterInterfaceManager::new(api);

        let handle = rifs.add(&SwInterface::new(InterfaceId(10), PortId(1)), &ports).unwrap();
        assert_eq!(rifs.router_interface_handle(InterfaceId(10)), Some(handle));
        assert_eq!(rifs.get_interface_id(handle), Some(InterfaceId(10)));
        assert_eq!(fake.object_count(SaiObjectType::RouterInterface), 1);
    }

    #[test]
    fn test_add_requires_known_port() {
        let (fake, api, ports) = setup();
        let mut rifs = RouterInterfaceManager::new(api);

        let err = rifs.add(&SwInterface::new(InterfaceId(10), PortId(7)), &ports).unwrap_err();
        assert!(matches!(err, ManagerError::NotFound { kind: ResourceKind::Port, .. }));
        assert!(rifs.is_empty());
        assert_eq!(fake.object_count(SaiObjectType::RouterInterface), 0);
    }

    #[test]
    fn test_add_twice_is_duplicate() {
        let (_fake, api, ports) = setup();
        let mut rifs = RouterInterfaceManager::new(api);
        let intf = SwInterface::new(InterfaceId(10), PortId(1));

        rifs.add(&intf, &ports).unwrap();
        assert!(matches!(
            rifs.add(&intf, &ports),
            Err(ManagerError::DuplicateResource { .. })
        ));
    }

    #[test]
    fn test_change_mac_and_mtu() {
        let (_fake, api, ports) = setup();
        let mut rifs = RouterInterfaceManager::new(api.clone());
        let mut intf = SwInterface::new(InterfaceId(10), PortId(1));
        let handle = rifs.add(&intf, &ports).unwrap();

        let mac: MacAddress = "02:00:00:00:00:0a".parse().unwrap();
        intf.mac = Some(mac);
        intf.mtu = 1500;
        rifs.change(&intf, &ports).unwrap();

        let got = api
            .router_interface_api()
            .get_attribute(handle, RouterInterfaceAttrId::SrcMacAddress)
            .unwrap();
        assert_eq!(got, RouterInterfaceAttribute::SrcMacAddress(mac));
        assert_eq!(rifs.get_interface(InterfaceId(10)).unwrap().attributes(), &intf);
    }

    #[test]
    fn test_port_rebind_is_rejected() {
        let (_fake, api, ports) = setup();
        let mut rifs = RouterInterfaceManager::new(api);
        let mut intf = SwInterface::new(InterfaceId(10), PortId(1));
        rifs.add(&intf, &ports).unwrap();

        intf.port = PortId(2);
        let err = rifs.change(&intf, &ports).unwrap_err();
        assert!(matches!(err, ManagerError::InvalidParameter { .. }));
        assert_eq!(
            rifs.get_interface(InterfaceId(10)).unwrap().attributes().port,
            PortId(1)
        );
    }

    #[test]
    fn test_port_with_interface_cannot_be_removed() {
        let (_fake, api, mut ports) = setup();
        let mut rifs = RouterInterfaceManager::new(api);
        rifs.add(&SwInterface::new(InterfaceId(10), PortId(1)), &ports).unwrap();

        assert!(ports.remove(PortId(1)).is_err());
        assert!(ports.port_handle(PortId(1)).is_some());

        rifs.remove(InterfaceId(10)).unwrap();
        ports.remove(PortId(1)).unwrap();
    }
}
