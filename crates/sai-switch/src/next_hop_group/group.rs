//! Hardware group state and shared next-hop objects.

use super::types::{NextHopSet, ResolvedNextHop};
use crate::audit::{AuditCategory, AuditOutcome, AuditRecord};
use crate::error::{ManagerError, ManagerResult, ResourceKind};
use crate::neighbor::NeighborKey;
use crate::{audit_log, debug_log, warn_log};
use sai_api::api::next_hop::{NextHopAttribute, NextHopType};
use sai_api::{NextHopGroupMemberOid, NextHopGroupOid, NextHopOid, RouterInterfaceOid, SaiApiTable};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug)]
struct SharedNextHop {
    id: NextHopOid,
    ref_count: usize,
}

/// One hardware next hop per neighbor, shared by every group member that
/// forwards through it.
#[derive(Debug, Default)]
pub(crate) struct NextHopTable {
    entries: HashMap<NeighborKey, SharedNextHop>,
}

impl NextHopTable {
    fn acquire(
        &mut self,
        api: &SaiApiTable,
        key: NeighborKey,
        rif: RouterInterfaceOid,
    ) -> ManagerResult<NextHopOid> {
        if let Some(shared) = self.entries.get_mut(&key) {
            shared.ref_count += 1;
            return Ok(shared.id);
        }

        let id = api
            .next_hop_api()
            .create(&[
                NextHopAttribute::Type(NextHopType::Ip),
                NextHopAttribute::Ip(key.ip),
                NextHopAttribute::RouterInterfaceId(rif),
            ])
            .map_err(ManagerError::sai_for(ResourceKind::NextHop))?;
        debug_log!("NextHopGroupManager", next_hop = %id, neighbor = %key, "created next hop");
        self.entries.insert(key, SharedNextHop { id, ref_count: 1 });
        Ok(id)
    }

    fn release(&mut self, api: &SaiApiTable, key: &NeighborKey) -> ManagerResult<()> {
        let shared = self
            .entries
            .get_mut(key)
            .ok_or_else(|| ManagerError::invalid_state(format!("next hop for {} not held", key)))?;
        shared.ref_count = shared.ref_count.saturating_sub(1);
        if shared.ref_count > 0 {
            return Ok(());
        }

        let id = shared.id;
        api.next_hop_api()
            .remove(id)
            .map_err(ManagerError::sai_for(ResourceKind::NextHop))?;
        self.entries.remove(key);
        debug_log!("NextHopGroupManager", next_hop = %id, neighbor = %key, "removed next hop");
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct GroupMember {
    id: NextHopGroupMemberOid,
    next_hop: NextHopOid,
}

/// A hardware next-hop group and its active members.
///
/// Members are always the subset of the key whose neighbors are resolved.
#[derive(Debug)]
pub(crate) struct SaiNextHopGroup {
    id: NextHopGroupOid,
    key: NextHopSet,
    members: BTreeMap<ResolvedNextHop, GroupMember>,
}

impl SaiNextHopGroup {
    pub(crate) fn new(id: NextHopGroupOid, key: NextHopSet) -> Self {
        Self {
            id,
            key,
            members: BTreeMap::new(),
        }
    }

    pub(crate) fn id(&self) -> NextHopGroupOid {
        self.id
    }

    pub(crate) fn key(&self) -> &NextHopSet {
        &self.key
    }

    pub(crate) fn members(&self) -> Vec<ResolvedNextHop> {
        self.members.keys().copied().collect()
    }

    /// Adds `hop` as a hardware member. Returns false when it already is one.
    pub(crate) fn add_member(
        &mut self,
        api: &SaiApiTable,
        next_hops: &mut NextHopTable,
        hop: &ResolvedNextHop,
        rif: RouterInterfaceOid,
    ) -> ManagerResult<bool> {
        if self.members.contains_key(hop) {
            return Ok(false);
        }
        let neighbor = hop.neighbor_key();
        let next_hop = next_hops.acquire(api, neighbor, rif)?;

        match api.next_hop_group_api().add_member(self.id, next_hop, hop.weight) {
            Ok(id) => {
                self.members.insert(*hop, GroupMember { id, next_hop });
                audit_log!(
                    AuditRecord::new(AuditCategory::ResourceCreate, "NextHopGroupManager", "add_member")
                        .with_outcome(AuditOutcome::Success)
                        .with_object_id(format!("{}", id))
                        .with_object_type("next_hop_group_member")
                        .with_details(serde_json::json!({
                            "group": format!("{}", self.id),
                            "next_hop": hop.to_string(),
                        }))
                );
                Ok(true)
            }
            Err(e) => {
                let err = ManagerError::sai(ResourceKind::NextHopGroupMember, e);
                audit_log!(
                    AuditRecord::new(AuditCategory::ResourceCreate, "NextHopGroupManager", "add_member")
                        .with_object_id(hop.to_string())
                        .with_object_type("next_hop_group_member")
                        .with_error(err.to_string())
                );
                if let Err(release_err) = next_hops.release(api, &neighbor) {
                    warn_log!("NextHopGroupManager", neighbor = %neighbor, error = %release_err,
                        "failed to release next hop after member add failure");
                }
                Err(err)
            }
        }
    }

    /// Removes `hop` from hardware. Returns false when it was not a member.
    ///
    /// If hardware refuses the removal the member is kept.
    pub(crate) fn remove_member(
        &mut self,
        api: &SaiApiTable,
        next_hops: &mut NextHopTable,
        hop: &ResolvedNextHop,
    ) -> ManagerResult<bool> {
        let Some(member) = self.members.get(hop).copied() else {
            return Ok(false);
        };

        if let Err(e) = api.next_hop_group_api().remove_member(member.id) {
            let err = ManagerError::sai(ResourceKind::NextHopGroupMember, e);
            audit_log!(
                AuditRecord::new(AuditCategory::ResourceDelete, "NextHopGroupManager", "remove_member")
                    .with_object_id(format!("{}", member.id))
                    .with_object_type("next_hop_group_member")
                    .with_error(err.to_string())
            );
            return Err(err);
        }
        self.members.remove(hop);

        audit_log!(
            AuditRecord::new(AuditCategory::ResourceDelete, "NextHopGroupManager", "remove_member")
                .with_outcome(AuditOutcome::Success)
                .with_object_id(format!("{}", member.id))
                .with_object_type("next_hop_group_member")
                .with_details(serde_json::json!({
                    "group": format!("{}", self.id),
                    "next_hop": format!("{}", member.next_hop),
                }))
        );
        next_hops.release(api, &hop.neighbor_key())?;
        Ok(true)
    }

    /// Removes every member and then the group itself. Keeps going after a
    /// failure and returns the first one.
    pub(crate) fn destroy(mut self, api: &SaiApiTable, next_hops: &mut NextHopTable) -> ManagerResult<()> {
        let mut first_error = None;
        let hops: Vec<ResolvedNextHop> = self.members.keys().copied().collect();
        for hop in hops {
            if let Err(e) = self.remove_member(api, next_hops, &hop) {
                first_error.get_or_insert(e);
            }
        }

        match api.next_hop_group_api().remove_group(self.id) {
            Ok(()) => {
                audit_log!(
                    AuditRecord::new(AuditCategory::ResourceDelete, "NextHopGroupManager", "remove_group")
                        .with_outcome(AuditOutcome::Success)
                        .with_object_id(format!("{}", self.id))
                        .with_object_type("next_hop_group")
                        .with_details(serde_json::json!({ "key": self.key.to_string() }))
                );
            }
            Err(e) => {
                let err = ManagerError::sai(ResourceKind::NextHopGroup, e);
                audit_log!(
                    AuditRecord::new(AuditCategory::ResourceDelete, "NextHopGroupManager", "remove_group")
                        .with_object_id(format!("{}", self.id))
                        .with_object_type("next_hop_group")
                        .with_error(err.to_string())
                );
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
