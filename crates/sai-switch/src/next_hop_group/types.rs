//! Next-hop value types.

use crate::neighbor::NeighborKey;
use crate::types::InterfaceId;
use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;

/// One forwarding path of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResolvedNextHop {
    pub ip: IpAddr,
    pub interface: InterfaceId,
    /// Member weight. 0 means plain ECMP.
    pub weight: u32,
}

impl ResolvedNextHop {
    pub fn new(ip: IpAddr, interface: InterfaceId) -> Self {
        Self {
            ip,
            interface,
            weight: 0,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// The neighbor this hop needs before it can be a hardware member.
    pub fn neighbor_key(&self) -> NeighborKey {
        NeighborKey::new(self.ip, self.interface)
    }
}

impl fmt::Display for ResolvedNextHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.ip, self.interface)?;
        if self.weight > 0 {
            write!(f, "/w{}", self.weight)?;
        }
        Ok(())
    }
}

/// Cache key of a group. Equality and hashing ignore insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NextHopSet(BTreeSet<ResolvedNextHop>);

impl NextHopSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn insert(&mut self, hop: ResolvedNextHop) -> bool {
        self.0.insert(hop)
    }

    pub fn contains(&self, hop: &ResolvedNextHop) -> bool {
        self.0.contains(hop)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedNextHop> {
        self.0.iter()
    }

    /// Hops that depend on the given neighbor.
    pub fn hops_for<'a>(&'a self, key: &'a NeighborKey) -> impl Iterator<Item = &'a ResolvedNextHop> + 'a {
        self.0.iter().filter(move |hop| hop.ip == key.ip && hop.interface == key.interface)
    }

    /// First neighbor that appears more than once (with different weights).
    pub(crate) fn repeated_neighbor(&self) -> Option<NeighborKey> {
        let mut prev: Option<NeighborKey> = None;
        for hop in &self.0 {
            let key = hop.neighbor_key();
            if prev == Some(key) {
                return Some(key);
            }
            prev = Some(key);
        }
        None
    }
}

impl FromIterator<ResolvedNextHop> for NextHopSet {
    fn from_iter<I: IntoIterator<Item = ResolvedNextHop>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a NextHopSet {
    type Item = &'a ResolvedNextHop;
    type IntoIter = std::collections::btree_set::Iter<'a, ResolvedNextHop>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for NextHopSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, hop) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", hop)?;
        }
        f.write_str("}")
    }
}
