//! Content-addressed group cache and neighbor-driven membership.

use super::group::{NextHopTable, SaiNextHopGroup};
use super::handle::NextHopGroupHandle;
use super::types::{NextHopSet, ResolvedNextHop};
use crate::audit::{AuditCategory, AuditOutcome, AuditRecord};
use crate::config::NextHopGroupManagerConfig;
use crate::error::{ManagerError, ManagerResult, ResourceKind};
use crate::neighbor::{NeighborKey, NeighborLookup, NeighborObserver, ResolvedNeighbor};
use crate::{audit_log, debug_log, warn_log};
use sai_api::api::next_hop_group::NextHopGroupType;
use sai_api::{NextHopGroupOid, SaiApiTable};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug)]
struct CacheEntry {
    group: SaiNextHopGroup,
    ref_count: usize,
}

/// Arena of live groups keyed by their next-hop set.
#[derive(Debug)]
pub(crate) struct NextHopGroupCache {
    api: Arc<SaiApiTable>,
    config: NextHopGroupManagerConfig,
    groups: HashMap<NextHopSet, CacheEntry>,
    group_keys: HashMap<NextHopGroupOid, NextHopSet>,
    next_hops: NextHopTable,
}

impl NextHopGroupCache {
    fn new(api: Arc<SaiApiTable>, config: NextHopGroupManagerConfig) -> Self {
        Self {
            api,
            config,
            groups: HashMap::new(),
            group_keys: HashMap::new(),
            next_hops: NextHopTable::default(),
        }
    }

    fn inc_ref_or_add(
        &mut self,
        key: &NextHopSet,
        lookup: &dyn NeighborLookup,
    ) -> ManagerResult<NextHopGroupOid> {
        if key.is_empty() {
            return Err(ManagerError::invalid_parameter(
                ResourceKind::NextHopGroup,
                "next hop set is empty",
            ));
        }
        if let Some(neighbor) = key.repeated_neighbor() {
            return Err(ManagerError::invalid_parameter(
                ResourceKind::NextHopGroup,
                format!("{} appears with more than one weight in {}", neighbor, key),
            ));
        }

        if let Some(entry) = self.groups.get_mut(key) {
            entry.ref_count += 1;
            debug_log!("NextHopGroupManager", group = %entry.group.id(), ref_count = entry.ref_count,
                "reusing next hop group");
            return Ok(entry.group.id());
        }

        if let Some(max) = self.config.max_groups {
            if self.groups.len() >= max {
                let err = ManagerError::ResourceExhausted {
                    kind: ResourceKind::NextHopGroup,
                    message: format!("limit of {} groups reached", max),
                };
                audit_log!(
                    AuditRecord::new(AuditCategory::ResourceCreate, "NextHopGroupManager", "create_group")
                        .with_object_id(key.to_string())
                        .with_object_type("next_hop_group")
                        .with_error(err.to_string())
                );
                return Err(err);
            }
        }

        let api = Arc::clone(&self.api);
        let id = match api.next_hop_group_api().create_group(NextHopGroupType::Ecmp) {
            Ok(id) => id,
            Err(e) => {
                let err = ManagerError::sai(ResourceKind::NextHopGroup, e);
                audit_log!(
                    AuditRecord::new(AuditCategory::ResourceCreate, "NextHopGroupManager", "create_group")
                        .with_object_id(key.to_string())
                        .with_object_type("next_hop_group")
                        .with_error(err.to_string())
                );
                return Err(err);
            }
        };

        let mut group = SaiNextHopGroup::new(id, key.clone());
        for hop in key {
            let Some(rif) = lookup.resolved_router_interface(&hop.neighbor_key()) else {
                continue;
            };
            if let Err(err) = group.add_member(&api, &mut self.next_hops, hop, rif) {
                if let Err(destroy_err) = group.destroy(&api, &mut self.next_hops) {
                    warn_log!("NextHopGroupManager", group = %id, error = %destroy_err,
                        "failed to tear down partially built group");
                }
                audit_log!(
                    AuditRecord::new(AuditCategory::ResourceCreate, "NextHopGroupManager", "create_group")
                        .with_object_id(format!("{}", id))
                        .with_object_type("next_hop_group")
                        .with_error(err.to_string())
                );
                return Err(err);
            }
        }

        audit_log!(
            AuditRecord::new(AuditCategory::ResourceCreate, "NextHopGroupManager", "create_group")
                .with_outcome(AuditOutcome::Success)
                .with_object_id(format!("{}", id))
                .with_object_type("next_hop_group")
                .with_details(serde_json::json!({
                    "key": key.to_string(),
                    "resolved_members": group.members().len(),
                }))
        );
        self.group_keys.insert(id, key.clone());
        self.groups.insert(key.clone(), CacheEntry { group, ref_count: 1 });
        Ok(id)
    }

    fn entry(&self, id: NextHopGroupOid) -> Option<&CacheEntry> {
        let key = self.group_keys.get(&id)?;
        self.groups.get(key).filter(|entry| entry.group.id() == id)
    }

    pub(crate) fn ref_count_of(&self, id: NextHopGroupOid) -> usize {
        self.entry(id).map_or(0, |entry| entry.ref_count)
    }

    pub(crate) fn members_of(&self, id: NextHopGroupOid) -> Vec<ResolvedNextHop> {
        self.entry(id).map(|entry| entry.group.members()).unwrap_or_default()
    }

    pub(crate) fn add_ref(&mut self, id: NextHopGroupOid) -> ManagerResult<usize> {
        let entry = self
            .group_keys
            .get(&id)
            .and_then(|key| self.groups.get_mut(key))
            .filter(|entry| entry.ref_count > 0)
            .ok_or_else(|| ManagerError::invalid_state(format!("next hop group {} is not live", id)))?;
        entry.ref_count += 1;
        Ok(entry.ref_count)
    }

    /// Drops one reference. The last one destroys the group and evicts it,
    /// even if hardware removal reports an error.
    pub(crate) fn release(&mut self, id: NextHopGroupOid) -> ManagerResult<()> {
        let key = self
            .group_keys
            .get(&id)
            .cloned()
            .ok_or_else(|| ManagerError::invalid_state(format!("release of unknown next hop group {}", id)))?;
        let entry = self
            .groups
            .get_mut(&key)
            .ok_or_else(|| ManagerError::invalid_state(format!("next hop group {} missing from cache", id)))?;
        if entry.ref_count == 0 {
            return Err(ManagerError::invalid_state(format!(
                "release of next hop group {} with zero references",
                id
            )));
        }

        entry.ref_count -= 1;
        if entry.ref_count > 0 {
            debug_log!("NextHopGroupManager", group = %id, ref_count = entry.ref_count,
                "released next hop group reference");
            return Ok(());
        }

        self.group_keys.remove(&id);
        match self.groups.remove(&key) {
            Some(entry) => {
                let api = Arc::clone(&self.api);
                entry.group.destroy(&api, &mut self.next_hops)
            }
            None => Ok(()),
        }
    }

    fn sync_resolved(&mut self, neighbor: &ResolvedNeighbor) -> ManagerResult<()> {
        let api = Arc::clone(&self.api);
        let mut first_error = None;
        let mut added = 0usize;

        for entry in self.groups.values_mut() {
            let hops: Vec<ResolvedNextHop> = entry.group.key().hops_for(&neighbor.key).copied().collect();
            for hop in hops {
                match entry
                    .group
                    .add_member(&api, &mut self.next_hops, &hop, neighbor.router_interface)
                {
                    Ok(true) => added += 1,
                    Ok(false) => {}
                    Err(e) => {
                        first_error.get_or_insert(e);
                    }
                }
            }
        }

        self.audit_sync("neighbor_resolved", &neighbor.key, added, first_error.as_ref());
        first_error.map_or(Ok(()), Err)
    }

    fn sync_unresolved(&mut self, key: &NeighborKey) -> ManagerResult<()> {
        let api = Arc::clone(&self.api);
        let mut first_error = None;
        let mut removed = 0usize;

        for entry in self.groups.values_mut() {
            let hops: Vec<ResolvedNextHop> = entry.group.key().hops_for(key).copied().collect();
            for hop in hops {
                match entry.group.remove_member(&api, &mut self.next_hops, &hop) {
                    Ok(true) => removed += 1,
                    Ok(false) => {}
                    Err(e) => {
                        first_error.get_or_insert(e);
                    }
                }
            }
        }

        self.audit_sync("neighbor_unresolved", key, removed, first_error.as_ref());
        first_error.map_or(Ok(()), Err)
    }

    fn audit_sync(&self, action: &str, key: &NeighborKey, changed: usize, error: Option<&ManagerError>) {
        let record = AuditRecord::new(AuditCategory::NeighborEvent, "NextHopGroupManager", action)
            .with_object_id(key.to_string())
            .with_object_type("neighbor")
            .with_details(serde_json::json!({ "members_changed": changed }));
        match error {
            Some(err) => {
                audit_log!(record.with_error(err.to_string()));
            }
            None if changed > 0 => {
                audit_log!(record.with_outcome(AuditOutcome::Success));
            }
            None => {}
        }
    }

    fn clear(&mut self) -> ManagerResult<()> {
        let api = Arc::clone(&self.api);
        let entries: Vec<CacheEntry> = self.groups.drain().map(|(_, entry)| entry).collect();
        self.group_keys.clear();

        let mut first_error = None;
        for entry in entries {
            if entry.ref_count > 0 {
                debug_log!("NextHopGroupManager", group = %entry.group.id(), ref_count = entry.ref_count,
                    "force destroying referenced group");
            }
            if let Err(e) = entry.group.destroy(&api, &mut self.next_hops) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Read access for introspection.
///
/// The cache is only mutably borrowed for the span of one manager call, so
/// a conflict here means a caller re-entered the cache mid-update. That is
/// logged and the reading is skipped.
pub(crate) fn read_cache(cache: &RefCell<NextHopGroupCache>) -> Option<Ref<'_, NextHopGroupCache>> {
    match cache.try_borrow() {
        Ok(cache) => Some(cache),
        Err(_) => {
            debug_log!("NextHopGroupManager", "next hop group cache is busy, skipping introspection");
            None
        }
    }
}

/// Owns the group cache and hands out [`NextHopGroupHandle`]s.
///
/// The introspection methods (`group_count`, `ref_count`, `members`, ...)
/// are best effort: called while the cache is in the middle of an update
/// they log at debug level and report nothing.
pub struct NextHopGroupManager {
    cache: Rc<RefCell<NextHopGroupCache>>,
}

impl NextHopGroupManager {
    pub fn new(api: Arc<SaiApiTable>, config: NextHopGroupManagerConfig) -> Self {
        Self {
            cache: Rc::new(RefCell::new(NextHopGroupCache::new(api, config))),
        }
    }

    fn cache_mut(&self) -> ManagerResult<RefMut<'_, NextHopGroupCache>> {
        self.cache
            .try_borrow_mut()
            .map_err(|_| ManagerError::invalid_state("next hop group cache is already borrowed"))
    }

    /// Returns a reference to the group for `key`, creating it on first use.
    ///
    /// A new group starts with the hops `lookup` reports resolved. If any of
    /// those member adds fails the group is torn down again and nothing is
    /// cached.
    pub fn inc_ref_or_add_next_hop_group(
        &mut self,
        key: NextHopSet,
        lookup: &dyn NeighborLookup,
    ) -> ManagerResult<NextHopGroupHandle> {
        let id = self.cache_mut()?.inc_ref_or_add(&key, lookup)?;
        Ok(NextHopGroupHandle::new(Rc::clone(&self.cache), id, key))
    }

    pub fn group_count(&self) -> usize {
        read_cache(&self.cache).map_or(0, |cache| cache.groups.len())
    }

    /// Live shared next-hop objects.
    pub fn next_hop_count(&self) -> usize {
        read_cache(&self.cache).map_or(0, |cache| cache.next_hops.len())
    }

    pub fn ref_count(&self, key: &NextHopSet) -> Option<usize> {
        let cache = read_cache(&self.cache)?;
        cache.groups.get(key).map(|entry| entry.ref_count)
    }

    pub fn members(&self, key: &NextHopSet) -> Option<Vec<ResolvedNextHop>> {
        let cache = read_cache(&self.cache)?;
        cache.groups.get(key).map(|entry| entry.group.members())
    }

    pub fn group_handle(&self, key: &NextHopSet) -> Option<NextHopGroupOid> {
        let cache = read_cache(&self.cache)?;
        cache.groups.get(key).map(|entry| entry.group.id())
    }

    /// Destroys every group regardless of outstanding references. Handles
    /// released afterwards report `InvalidState`.
    pub fn clear(&mut self) -> ManagerResult<()> {
        self.cache_mut()?.clear()
    }
}

impl NeighborObserver for NextHopGroupManager {
    fn on_neighbor_resolved(&mut self, neighbor: &ResolvedNeighbor) -> ManagerResult<()> {
        self.cache_mut()?.sync_resolved(neighbor)
    }

    fn on_neighbor_unresolved(&mut self, key: &NeighborKey) -> ManagerResult<()> {
        self.cache_mut()?.sync_unresolved(key)
    }
}
