//! Object tables and attribute decoding shared by every fake category.

use log::debug;
use sai_api::{RawSaiObjectId, SaiAttribute, SaiAttributeSet, SaiObjectType, SaiStatus};
use std::collections::BTreeMap;

/// Bits reserved for the per-category sequence number in a handle.
const SEQUENCE_BITS: u32 = 48;

/// Handles of one object category.
///
/// Handles embed the object type above the sequence number and are never
/// reused, even after removal.
#[derive(Debug)]
pub(crate) struct FakeObjectTable<T> {
    object_type: SaiObjectType,
    objects: BTreeMap<RawSaiObjectId, T>,
    next_sequence: u64,
    capacity: Option<usize>,
}

impl<T> FakeObjectTable<T> {
    pub(crate) fn new(object_type: SaiObjectType, capacity: Option<usize>) -> Self {
        Self {
            object_type,
            objects: BTreeMap::new(),
            next_sequence: 1,
            capacity,
        }
    }

    pub(crate) fn insert(&mut self, object: T) -> Result<RawSaiObjectId, SaiStatus> {
        if self.capacity.is_some_and(|max| self.objects.len() >= max) {
            debug!("{} table full", self.object_type);
            return Err(SaiStatus::TableFull);
        }
        let handle = handle_for(self.object_type, self.next_sequence);
        self.next_sequence += 1;
        self.objects.insert(handle, object);
        Ok(handle)
    }

    pub(crate) fn get(&self, handle: RawSaiObjectId) -> Result<&T, SaiStatus> {
        self.objects.get(&handle).ok_or(SaiStatus::ItemNotFound)
    }

    pub(crate) fn get_mut(&mut self, handle: RawSaiObjectId) -> Result<&mut T, SaiStatus> {
        self.objects.get_mut(&handle).ok_or(SaiStatus::ItemNotFound)
    }

    pub(crate) fn contains(&self, handle: RawSaiObjectId) -> bool {
        self.objects.contains_key(&handle)
    }

    pub(crate) fn remove(&mut self, handle: RawSaiObjectId) -> Result<T, SaiStatus> {
        self.objects.remove(&handle).ok_or(SaiStatus::ItemNotFound)
    }

    pub(crate) fn len(&self) -> usize {
        self.objects.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&RawSaiObjectId, &T)> {
        self.objects.iter()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.objects.values()
    }
}

pub(crate) fn handle_for(object_type: SaiObjectType, sequence: u64) -> RawSaiObjectId {
    ((object_type.as_raw() as u64) << SEQUENCE_BITS) | sequence
}

/// Decodes a create or set attribute list.
///
/// Unknown ids, mismatched values and repeated ids are all
/// `InvalidParameter`.
pub(crate) fn decode<A: SaiAttributeSet>(raw: &[SaiAttribute]) -> Result<Vec<A>, SaiStatus> {
    let mut decoded: Vec<A> = Vec::with_capacity(raw.len());
    for attribute in raw {
        let typed = A::from_raw(attribute).map_err(|err| {
            debug!("rejecting attribute {:?}: {}", attribute, err);
            SaiStatus::InvalidParameter
        })?;
        if decoded.iter().any(|seen| seen.id() == typed.id()) {
            debug!("attribute {:?} given twice", typed.id());
            return Err(SaiStatus::InvalidParameter);
        }
        decoded.push(typed);
    }
    Ok(decoded)
}

/// Decodes attribute ids for a get call.
pub(crate) fn decode_ids<A: SaiAttributeSet>(ids: &[u32]) -> Result<Vec<A::Id>, SaiStatus> {
    ids.iter()
        .map(|raw| A::Id::try_from(*raw).map_err(|_| SaiStatus::InvalidParameter))
        .collect()
}

/// Encodes the result of a get call.
pub(crate) fn encode<A: SaiAttributeSet>(attributes: Vec<A>) -> Vec<SaiAttribute> {
    attributes.iter().map(SaiAttributeSet::to_raw).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sai_api::api::port::{PortAttrId, PortAttribute};
    use sai_api::SaiAttributeValue;

    #[test]
    fn test_handles_are_sequential_and_typed() {
        let mut table = FakeObjectTable::new(SaiObjectType::NextHop, None);
        let first = table.insert("a").unwrap();
        let second = table.insert("b").unwrap();
        assert_eq!(first, 0x0004_0000_0000_0001);
        assert_eq!(second, first + 1);
    }

    #[test]
    fn test_handles_not_reused_after_remove() {
        let mut table = FakeObjectTable::new(SaiObjectType::Port, None);
        let first = table.insert(()).unwrap();
        table.remove(first).unwrap();
        let second = table.insert(()).unwrap();
        assert_ne!(first, second);
        assert_eq!(table.remove(first), Err(SaiStatus::ItemNotFound));
    }

    #[test]
    fn test_capacity() {
        let mut table = FakeObjectTable::new(SaiObjectType::NextHopGroup, Some(1));
        table.insert(()).unwrap();
        assert_eq!(table.insert(()), Err(SaiStatus::TableFull));
    }

    #[test]
    fn test_decode_rejects_repeated_id() {
        let raw = vec![
            SaiAttribute::new(PortAttrId::Mtu, SaiAttributeValue::U32(9100)),
            SaiAttribute::new(PortAttrId::Mtu, SaiAttributeValue::U32(1500)),
        ];
        assert_eq!(
            decode::<PortAttribute>(&raw),
            Err(SaiStatus::InvalidParameter)
        );
    }
}
