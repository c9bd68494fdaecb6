//! Bidirectional software-ID to hardware-handle map.
//!
//! Every manager keeps two lookups for its objects: software identifier to
//! object, and hardware handle back to software identifier. [`IdMap`] owns
//! both so they can only be updated together. Like a plain `HashMap` lookup
//! it never creates entries implicitly.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdMapError {
    #[error("Key already mapped: {0}")]
    DuplicateKey(String),

    #[error("Handle already mapped: {0}")]
    DuplicateHandle(String),
}

#[derive(Debug)]
struct Entry<H, V> {
    handle: H,
    value: V,
}

/// Two synchronized maps: `key -> (handle, value)` and `handle -> key`.
#[derive(Debug)]
pub struct IdMap<K, H, V> {
    by_key: HashMap<K, Entry<H, V>>,
    by_handle: HashMap<H, K>,
}

impl<K, H, V> IdMap<K, H, V>
where
    K: Eq + Hash + Clone + Debug,
    H: Eq + Hash + Copy + Debug,
{
    pub fn new() -> Self {
        Self {
            by_key: HashMap::new(),
            by_handle: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn contains_handle(&self, handle: &H) -> bool {
        self.by_handle.contains_key(handle)
    }

    /// Inserts both directions, or neither.
    pub fn insert(&mut self, key: K, handle: H, value: V) -> Result<(), IdMapError> {
        if self.by_key.contains_key(&key) {
            return Err(IdMapError::DuplicateKey(format!("{:?}", key)));
        }
        if self.by_handle.contains_key(&handle) {
            return Err(IdMapError::DuplicateHandle(format!("{:?}", handle)));
        }
        self.by_handle.insert(handle, key.clone());
        self.by_key.insert(key, Entry { handle, value });
        Ok(())
    }

    /// Removes both directions and returns the handle and value.
    pub fn remove(&mut self, key: &K) -> Option<(H, V)> {
        let entry = self.by_key.remove(key)?;
        self.by_handle.remove(&entry.handle);
        Some((entry.handle, entry.value))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.by_key.get(key).map(|e| &e.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.by_key.get_mut(key).map(|e| &mut e.value)
    }

    pub fn handle(&self, key: &K) -> Option<H> {
        self.by_key.get(key).map(|e| e.handle)
    }

    pub fn key_by_handle(&self, handle: &H) -> Option<&K> {
        self.by_handle.get(handle)
    }

    pub fn get_by_handle(&self, handle: &H) -> Option<&V> {
        let key = self.by_handle.get(handle)?;
        self.get(key)
    }

    pub fn get_by_handle_mut(&mut self, handle: &H) -> Option<&mut V> {
        let key = self.by_handle.get(handle)?;
        self.by_key.get_mut(key).map(|e| &mut e.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.by_key.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, H, &V)> {
        self.by_key.iter().map(|(k, e)| (k, e.handle, &e.value))
    }
}

impl<K, H, V> Default for IdMap<K, H, V>
where
    K: Eq + Hash + Clone + Debug,
    H: Eq + Hash + Copy + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
