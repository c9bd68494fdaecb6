//! The raw driver boundary.
//!
//! A [`SaiDriver`] is what the vendor SAI library (or a simulation of it)
//! provides: untyped object calls that return a status per call. Everything
//! above this trait works with typed handles and attributes.

use crate::api::neighbor::NeighborEntry;
use crate::attribute::{SaiAttrId, SaiAttribute};
use crate::error::SaiStatus;
use crate::types::{RawSaiObjectId, SaiObjectType};

/// Raw SAI object and neighbor-entry calls.
///
/// Calls are synchronous round trips to the ASIC driver. Implementations
/// must be shareable across threads even though callers drive them from a
/// single control-plane context.
pub trait SaiDriver: Send + Sync {
    /// Creates an object and returns its handle.
    fn create_object(
        &self,
        object_type: SaiObjectType,
        switch_id: RawSaiObjectId,
        attributes: &[SaiAttribute],
    ) -> Result<RawSaiObjectId, SaiStatus>;

    fn remove_object(&self, object_type: SaiObjectType, object_id: RawSaiObjectId) -> SaiStatus;

    fn set_attribute(
        &self,
        object_type: SaiObjectType,
        object_id: RawSaiObjectId,
        attribute: &SaiAttribute,
    ) -> SaiStatus;

    /// Reads the requested attributes, in request order.
    fn get_attributes(
        &self,
        object_type: SaiObjectType,
        object_id: RawSaiObjectId,
        ids: &[SaiAttrId],
    ) -> Result<Vec<SaiAttribute>, SaiStatus>;

    fn create_neighbor_entry(&self, entry: &NeighborEntry, attributes: &[SaiAttribute])
        -> SaiStatus;

    fn remove_neighbor_entry(&self, entry: &NeighborEntry) -> SaiStatus;

    fn set_neighbor_entry_attribute(
        &self,
        entry: &NeighborEntry,
        attribute: &SaiAttribute,
    ) -> SaiStatus;

    fn get_neighbor_entry_attributes(
        &self,
        entry: &NeighborEntry,
        ids: &[SaiAttrId],
    ) -> Result<Vec<SaiAttribute>, SaiStatus>;
}
