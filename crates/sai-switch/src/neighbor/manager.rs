use super::types::{NeighborKey, NeighborLookup, NeighborObserver, ResolvedNeighbor, SaiNeighbor, SwNeighbor};
use crate::audit::{AuditCategory, AuditOutcome, AuditRecord};
use crate::error::{ManagerError, ManagerResult, ResourceKind};
use crate::id_map::IdMap;
use crate::router_interface::RouterInterfaceManager;
use crate::{audit_log, warn_log};
use sai_api::api::neighbor::{NeighborAttribute, NeighborEntry, PacketAction};
use sai_api::{RouterInterfaceOid, SaiApiTable};
use std::sync::Arc;

pub struct NeighborManager {
    api: Arc<SaiApiTable>,
    neighbors: IdMap<NeighborKey, NeighborEntry, SaiNeighbor>,
}

impl NeighborManager {
    pub fn new(api: Arc<SaiApiTable>) -> Self {
        Self {
            api,
            neighbors: IdMap::new(),
        }
    }

    /// Programs the neighbor, then reports it resolved to `observer`.
    ///
    /// An observer failure is returned after the neighbor has been recorded;
    /// the entry stays programmed.
    pub fn add_neighbor(
        &mut self,
        neighbor: &SwNeighbor,
        rifs: &RouterInterfaceManager,
        observer: &mut dyn NeighborObserver,
    ) -> ManagerResult<()> {
        let key = neighbor.key();
        if self.neighbors.contains_key(&key) {
            return Err(ManagerError::duplicate(ResourceKind::Neighbor, key));
        }
        let rif = rifs
            .router_interface_handle(neighbor.interface)
            .ok_or_else(|| ManagerError::not_found(ResourceKind::RouterInterface, neighbor.interface))?;

        let api = self.api.neighbor_api();
        let entry = api.entry(rif, neighbor.ip);
        let attributes = [
            NeighborAttribute::DstMacAddress(neighbor.mac),
            NeighborAttribute::PacketAction(PacketAction::Forward),
        ];
        if let Err(e) = api.create(&entry, &attributes) {
            let err = ManagerError::sai(ResourceKind::Neighbor, e);
            audit_log!(
                AuditRecord::new(AuditCategory::ResourceCreate, "NeighborManager", "create_neighbor")
                    .with_object_id(key.to_string())
                    .with_object_type("neighbor")
                    .with_error(err.to_string())
            );
            return Err(err);
        }

        if let Err(e) = self.neighbors.insert(key, entry, SaiNeighbor::new(entry, neighbor.mac)) {
            if let Err(remove_err) = api.remove(&entry) {
                warn_log!("NeighborManager", neighbor = %key, error = %remove_err, "failed to undo neighbor create");
            }
            return Err(ManagerError::invalid_state(e.to_string()));
        }

        audit_log!(
            AuditRecord::new(AuditCategory::ResourceCreate, "NeighborManager", "create_neighbor")
                .with_outcome(AuditOutcome::Success)
                .with_object_id(key.to_string())
                .with_object_type("neighbor")
                .with_details(serde_json::json!({
                    "mac": neighbor.mac.to_string(),
                    "router_interface": format!("{}", rif),
                }))
        );

        observer.on_neighbor_resolved(&ResolvedNeighbor {
            key,
            router_interface: rif,
        })
    }

    /// Removes the neighbor, then reports it unresolved to `observer`.
    pub fn remove_neighbor(
        &mut self,
        key: &NeighborKey,
        observer: &mut dyn NeighborObserver,
    ) -> ManagerResult<()> {
        self.remove_entry(key)?;
        observer.on_neighbor_unresolved(key)
    }

    /// Moves an existing neighbor to a new MAC in place.
    pub fn change_neighbor(&mut self, neighbor: &SwNeighbor) -> ManagerResult<()> {
        let key = neighbor.key();
        let api = self.api.neighbor_api();
        let current = self
            .neighbors
            .get_mut(&key)
            .ok_or_else(|| ManagerError::not_found(ResourceKind::Neighbor, key))?;
        if current.mac() == neighbor.mac {
            return Ok(());
        }

        if let Err(e) = api.set_attribute(current.entry(), &NeighborAttribute::DstMacAddress(neighbor.mac)) {
            let err = ManagerError::sai(ResourceKind::Neighbor, e);
            audit_log!(
                AuditRecord::new(AuditCategory::ResourceModify, "NeighborManager", "set_neighbor_mac")
                    .with_object_id(key.to_string())
                    .with_object_type("neighbor")
                    .with_error(err.to_string())
            );
            return Err(err);
        }
        let previous = current.mac();
        current.set_mac(neighbor.mac);

        audit_log!(
            AuditRecord::new(AuditCategory::ResourceModify, "NeighborManager", "set_neighbor_mac")
                .with_outcome(AuditOutcome::Success)
                .with_object_id(key.to_string())
                .with_object_type("neighbor")
                .with_details(serde_json::json!({
                    "from": previous.to_string(),
                    "to": neighbor.mac.to_string(),
                }))
        );
        Ok(())
    }

    fn remove_entry(&mut self, key: &NeighborKey) -> ManagerResult<()> {
        let entry = self
            .neighbors
            .handle(key)
            .ok_or_else(|| ManagerError::not_found(ResourceKind::Neighbor, key))?;

        if let Err(e) = self.api.neighbor_api().remove(&entry) {
            let err = ManagerError::sai(ResourceKind::Neighbor, e);
            audit_log!(
                AuditRecord::new(AuditCategory::ResourceDelete, "NeighborManager", "remove_neighbor")
                    .with_object_id(key.to_string())
                    .with_object_type("neighbor")
                    .with_error(err.to_string())
            );
            return Err(err);
        }
        self.neighbors.remove(key);

        audit_log!(
            AuditRecord::new(AuditCategory::ResourceDelete, "NeighborManager", "remove_neighbor")
                .with_outcome(AuditOutcome::Success)
                .with_object_id(key.to_string())
                .with_object_type("neighbor")
        );
        Ok(())
    }

    pub fn get_neighbor(&self, key: &NeighborKey) -> Option<&SaiNeighbor> {
        self.neighbors.get(key)
    }

    pub fn contains(&self, key: &NeighborKey) -> bool {
        self.neighbors.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Removes every neighbor without notifying observers. Dependent
    /// next-hop groups must already be gone.
    pub fn clear(&mut self) -> ManagerResult<()> {
        let keys: Vec<NeighborKey> = self.neighbors.keys().copied().collect();
        let mut first_error = None;
        for key in keys {
            if let Err(e) = self.remove_entry(&key) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl NeighborLookup for NeighborManager {
    fn resolved_router_interface(&self, key: &NeighborKey) -> Option<RouterInterfaceOid> {
        self.neighbors.get(key).map(SaiNeighbor::router_interface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router_interface::SwInterface;
    use crate::test_utils::{api_table, ip, mac, sample_port};
    use crate::port::PortManager;
    use crate::types::{InterfaceId, PortId};
    use pretty_assertions::assert_eq;
    use sai_api::api::neighbor::NeighborAttrId;
    use sai_fake::FakeSai;

    #[derive(Default)]
    struct RecordingObserver {
        resolved: Vec<ResolvedNeighbor>,
        unresolved: Vec<NeighborKey>,
    }

    impl NeighborObserver for RecordingObserver {
        fn on_neighbor_resolved(&mut self, neighbor: &ResolvedNeighbor) -> ManagerResult<()> {
            self.resolved.push(*neighbor);
            Ok(())
        }

        fn on_neighbor_unresolved(&mut self, key: &NeighborKey) -> ManagerResult<()> {
            self.unresolved.push(*key);
            Ok(())
        }
    }

    fn setup() -> (Arc<FakeSai>, Arc<SaiApiTable>, RouterInterfaceManager) {
        let (fake, api) = api_table();
        let mut ports = PortManager::new(api.clone());
        ports.add(&sample_port(1)).unwrap();
        let mut rifs = RouterInterfaceManager::new(api.clone());
        rifs.add(&SwInterface::new(InterfaceId(1), PortId(1)), &ports).unwrap();
        (fake, api, rifs)
    }

    #[test]
    fn test_add_notifies_after_programming() {
        let (fake, api, rifs) = setup();
        let mut neighbors = NeighborManager::new(api);
        let mut observer = RecordingObserver::default();
        let neighbor = SwNeighbor::new(ip("10.0.0.1"), InterfaceId(1), mac(1));

        neighbors.add_neighbor(&neighbor, &rifs, &mut observer).unwrap();

        assert_eq!(fake.neighbor_count(), 1);
        assert_eq!(observer.resolved.len(), 1);
        assert_eq!(observer.resolved[0].key, neighbor.key());
        assert_eq!(
            Some(observer.resolved[0].router_interface),
            rifs.router_interface_handle(InterfaceId(1))
        );
        assert_eq!(
            neighbors.resolved_router_interface(&neighbor.key()),
            rifs.router_interface_handle(InterfaceId(1))
        );
    }

    #[test]
    fn test_duplicate_and_missing() {
        let (_fake, api, rifs) = setup();
        let mut neighbors = NeighborManager::new(api);
        let mut observer = RecordingObserver::default();
        let neighbor = SwNeighbor::new(ip("10.0.0.1"), InterfaceId(1), mac(1));

        neighbors.add_neighbor(&neighbor, &rifs, &mut observer).unwrap();
        assert!(matches!(
            neighbors.add_neighbor(&neighbor, &rifs, &mut observer),
            Err(ManagerError::DuplicateResource { .. })
        ));
        assert_eq!(observer.resolved.len(), 1);

        let missing = NeighborKey::new(ip("10.0.0.9"), InterfaceId(1));
        assert!(matches!(
            neighbors.remove_neighbor(&missing, &mut observer),
            Err(ManagerError::NotFound { .. })
        ));
        assert!(observer.unresolved.is_empty());
    }

    #[test]
    fn test_unknown_interface() {
        let (_fake, api, rifs) = setup();
        let mut neighbors = NeighborManager::new(api);
        let mut observer = RecordingObserver::default();
        let neighbor = SwNeighbor::new(ip("10.0.0.1"), InterfaceId(5), mac(1));

        let err = neighbors.add_neighbor(&neighbor, &rifs, &mut observer).unwrap_err();
        assert!(matches!(err, ManagerError::NotFound { kind: ResourceKind::RouterInterface, .. }));
        assert!(observer.resolved.is_empty());
    }

    #[test]
    fn test_remove_notifies() {
        let (fake, api, rifs) = setup();
        let mut neighbors = NeighborManager::new(api);
        let mut observer = RecordingObserver::default();
        let neighbor = SwNeighbor::new(ip("10.0.0.1"), InterfaceId(1), mac(1));
        neighbors.add_neighbor(&neighbor, &rifs, &mut observer).unwrap();

        neighbors.remove_neighbor(&neighbor.key(), &mut observer).unwrap();
        assert_eq!(observer.unresolved, vec![neighbor.key()]);
        assert_eq!(fake.neighbor_count(), 0);
        assert!(neighbors.resolved_router_interface(&neighbor.key()).is_none());
    }

    #[test]
    fn test_change_mac_in_place() {
        let (_fake, api, rifs) = setup();
        let mut neighbors = NeighborManager::new(api.clone());
        let mut observer = RecordingObserver::default();
        let mut neighbor = SwNeighbor::new(ip("10.0.0.1"), InterfaceId(1), mac(1));
        neighbors.add_neighbor(&neighbor, &rifs, &mut observer).unwrap();

        neighbor.mac = mac(2);
        neighbors.change_neighbor(&neighbor).unwrap();

        let entry = *neighbors.get_neighbor(&neighbor.key()).unwrap().entry();
        let got = api.neighbor_api().get_attribute(&entry, NeighborAttrId::DstMacAddress).unwrap();
        assert_eq!(got, NeighborAttribute::DstMacAddress(mac(2)));
        assert_eq!(observer.resolved.len(), 1);
    }
}
