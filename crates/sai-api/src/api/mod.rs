//! Typed per-category function tables.
//!
//! Each OID-keyed category is served by [`SaiObjectApi`] specialised on its
//! object kind; neighbor entries and next hop groups get dedicated wrappers
//! because their call shapes differ.
//!
//! - [`switch`]: switch-level attributes
//! - [`port`]: port configuration
//! - [`bridge_port`]: bridge ports binding ports to the default bridge
//! - [`router_interface`]: router interfaces
//! - [`neighbor`]: neighbor entries
//! - [`next_hop`]: next hops
//! - [`next_hop_group`]: next hop groups and their members

pub mod bridge_port;
pub mod neighbor;
pub mod next_hop;
pub mod next_hop_group;
pub mod port;
pub mod router_interface;
pub mod switch;

use crate::attribute::{SaiAttrId, SaiAttribute, SaiAttributeSet};
use crate::driver::SaiDriver;
use crate::error::{SaiError, SaiResult, SaiStatus};
use crate::types::{SaiObjectId, SaiObjectKind, SwitchOid};
use log::{debug, trace, warn};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

pub use bridge_port::BridgePortApi;
pub use neighbor::{NeighborApi, NeighborEntry};
pub use next_hop::NextHopApi;
pub use next_hop_group::NextHopGroupApi;
pub use port::PortApi;
pub use router_interface::RouterInterfaceApi;
pub use switch::SwitchApi;

/// An object kind that has a typed attribute set.
pub trait SaiApiKind: SaiObjectKind {
    type Attribute: SaiAttributeSet;
}

/// Attribute id type of an object kind.
pub type AttrIdOf<K> = <<K as SaiApiKind>::Attribute as SaiAttributeSet>::Id;

/// Function table for one OID-keyed object category.
pub struct SaiObjectApi<K: SaiApiKind> {
    driver: Arc<dyn SaiDriver>,
    switch_id: SwitchOid,
    _kind: PhantomData<K>,
}

impl<K: SaiApiKind> SaiObjectApi<K> {
    pub fn new(driver: Arc<dyn SaiDriver>, switch_id: SwitchOid) -> Self {
        Self {
            driver,
            switch_id,
            _kind: PhantomData,
        }
    }

    /// Returns the switch ID this API is associated with.
    pub fn switch_id(&self) -> SwitchOid {
        self.switch_id
    }

    /// Creates an object from typed attributes.
    pub fn create(&self, attributes: &[K::Attribute]) -> SaiResult<SaiObjectId<K>> {
        let raw: Vec<SaiAttribute> = attributes.iter().map(SaiAttributeSet::to_raw).collect();

        match self
            .driver
            .create_object(K::object_type(), self.switch_id.as_raw(), &raw)
        {
            Ok(oid) => {
                let id = SaiObjectId::<K>::from_raw(oid).ok_or_else(|| {
                    SaiError::internal(format!("driver returned a null {} handle", K::type_name()))
                })?;
                debug!("created {:?} with {} attributes", id, raw.len());
                Ok(id)
            }
            Err(status) => {
                warn!("create {} failed: {}", K::type_name(), status);
                Err(SaiError::from_status(
                    status,
                    format_args!("create {}", K::type_name()),
                ))
            }
        }
    }

    /// Removes an object.
    pub fn remove(&self, id: SaiObjectId<K>) -> SaiResult<()> {
        require_handle(id)?;
        let status = self.driver.remove_object(K::object_type(), id.as_raw());
        check_status(status, "remove", &id)?;
        debug!("removed {:?}", id);
        Ok(())
    }

    pub fn set_attribute(&self, id: SaiObjectId<K>, attribute: &K::Attribute) -> SaiResult<()> {
        require_handle(id)?;
        let status = self
            .driver
            .set_attribute(K::object_type(), id.as_raw(), &attribute.to_raw());
        check_status(status, "set attribute on", &id)?;
        trace!("set {:?} on {:?}", attribute, id);
        Ok(())
    }

    pub fn get_attribute(&self, id: SaiObjectId<K>, attr_id: AttrIdOf<K>) -> SaiResult<K::Attribute> {
        self.get_attributes(id, &[attr_id])?
            .into_iter()
            .next()
            .ok_or_else(|| SaiError::internal(format!("no value for {:?} on {:?}", attr_id, id)))
    }

    /// Reads several attributes in one driver call.
    pub fn get_attributes(
        &self,
        id: SaiObjectId<K>,
        attr_ids: &[AttrIdOf<K>],
    ) -> SaiResult<Vec<K::Attribute>> {
        require_handle(id)?;
        let ids: Vec<SaiAttrId> = attr_ids.iter().map(|attr_id| (*attr_id).into()).collect();
        let raw = self
            .driver
            .get_attributes(K::object_type(), id.as_raw(), &ids)
            .map_err(|status| {
                warn!("get attributes on {:?} failed: {}", id, status);
                SaiError::from_status(status, format_args!("get attribute on {:?}", id))
            })?;
        raw.iter().map(K::Attribute::from_raw).collect()
    }
}

fn require_handle<K: SaiObjectKind>(id: SaiObjectId<K>) -> SaiResult<()> {
    if id.is_null() {
        return Err(SaiError::invalid_parameter(format!(
            "{} OID is null",
            K::type_name()
        )));
    }
    Ok(())
}

pub(crate) fn check_status(
    status: SaiStatus,
    operation: &str,
    object: &dyn fmt::Debug,
) -> SaiResult<()> {
    if status.is_success() {
        return Ok(());
    }
    warn!("{} {:?} failed: {}", operation, object, status);
    Err(SaiError::from_status(
        status,
        format_args!("{} {:?}", operation, object),
    ))
}
