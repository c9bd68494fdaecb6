//! Neighbor manager.
//!
//! Programs link-layer reachability entries and notifies a
//! [`NeighborObserver`] synchronously after each add and remove, so callers
//! see every dependent next-hop group already updated when the call returns.

mod manager;
mod types;

pub use manager::NeighborManager;
pub use types::{NeighborKey, NeighborLookup, NeighborObserver, ResolvedNeighbor, SaiNeighbor, SwNeighbor};
