//! Owning and observing references to cached groups.

use super::manager::{read_cache, NextHopGroupCache};
use super::types::{NextHopSet, ResolvedNextHop};
use crate::error::{ManagerError, ManagerResult};
use crate::error_log;
use sai_api::NextHopGroupOid;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// An owning reference to a cached next-hop group.
///
/// Cloning adds a reference and dropping releases one. The last release
/// removes the hardware group. Use [`NextHopGroupHandle::release`] to see
/// the outcome of a release instead of having it logged.
pub struct NextHopGroupHandle {
    cache: Rc<RefCell<NextHopGroupCache>>,
    id: NextHopGroupOid,
    key: NextHopSet,
    released: bool,
}

impl NextHopGroupHandle {
    pub(crate) fn new(cache: Rc<RefCell<NextHopGroupCache>>, id: NextHopGroupOid, key: NextHopSet) -> Self {
        Self {
            cache,
            id,
            key,
            released: false,
        }
    }

    pub fn id(&self) -> NextHopGroupOid {
        self.id
    }

    pub fn key(&self) -> &NextHopSet {
        &self.key
    }

    /// Outstanding owning references, including this one. Best effort, see
    /// [`NextHopGroupManager`](super::NextHopGroupManager).
    pub fn use_count(&self) -> usize {
        read_cache(&self.cache).map_or(0, |cache| cache.ref_count_of(self.id))
    }

    /// Hops currently programmed as hardware members.
    pub fn members(&self) -> Vec<ResolvedNextHop> {
        read_cache(&self.cache)
            .map(|cache| cache.members_of(self.id))
            .unwrap_or_default()
    }

    pub fn downgrade(&self) -> WeakNextHopGroup {
        WeakNextHopGroup {
            cache: Rc::downgrade(&self.cache),
            id: self.id,
            key: self.key.clone(),
        }
    }

    /// Releases this reference and reports the result.
    pub fn release(mut self) -> ManagerResult<()> {
        self.released = true;
        self.release_inner()
    }

    fn release_inner(&self) -> ManagerResult<()> {
        self.cache
            .try_borrow_mut()
            .map_err(|_| ManagerError::invalid_state("next hop group cache is already borrowed"))?
            .release(self.id)
    }
}

impl Clone for NextHopGroupHandle {
    fn clone(&self) -> Self {
        let added = match self.cache.try_borrow_mut() {
            Ok(mut cache) => cache.add_ref(self.id),
            Err(_) => Err(ManagerError::invalid_state("next hop group cache is already borrowed")),
        };
        // A clone that holds no reference must not release one.
        let released = match added {
            Ok(_) => false,
            Err(e) => {
                error_log!("NextHopGroupManager", group = %self.id, error = %e, "failed to clone group reference");
                true
            }
        };
        Self {
            cache: Rc::clone(&self.cache),
            id: self.id,
            key: self.key.clone(),
            released,
        }
    }
}

impl Drop for NextHopGroupHandle {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.release_inner() {
            error_log!("NextHopGroupManager", group = %self.id, error = %e, "failed to release group reference");
        }
    }
}

impl fmt::Debug for NextHopGroupHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NextHopGroupHandle")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("released", &self.released)
            .finish()
    }
}

/// A non-owning reference that observes whether a group is still live.
#[derive(Clone)]
pub struct WeakNextHopGroup {
    cache: Weak<RefCell<NextHopGroupCache>>,
    id: NextHopGroupOid,
    key: NextHopSet,
}

impl WeakNextHopGroup {
    pub fn id(&self) -> NextHopGroupOid {
        self.id
    }

    pub fn key(&self) -> &NextHopSet {
        &self.key
    }

    /// Owning references left; 0 once the group is gone.
    pub fn use_count(&self) -> usize {
        let Some(cache) = self.cache.upgrade() else {
            return 0;
        };
        let count = read_cache(&cache).map_or(0, |c| c.ref_count_of(self.id));
        count
    }

    pub fn is_expired(&self) -> bool {
        self.use_count() == 0
    }

    /// Takes a new owning reference if the group is still live.
    pub fn upgrade(&self) -> Option<NextHopGroupHandle> {
        let cache = self.cache.upgrade()?;
        cache.try_borrow_mut().ok()?.add_ref(self.id).ok()?;
        Some(NextHopGroupHandle::new(cache, self.id, self.key.clone()))
    }
}

impl fmt::Debug for WeakNextHopGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakNextHopGroup")
            .field("id", &self.id)
            .field("key", &self.key)
            .finish()
    }
}
