//! Next-hop-group manager.
//!
//! Groups are content-addressed: every caller asking for an equal
//! [`NextHopSet`] shares one hardware group through a reference-counted
//! [`NextHopGroupHandle`]. Membership follows neighbor resolution in place,
//! so the group handle routes point at never changes while the group lives.
//!
//! ```text
//! inc_ref_or_add_next_hop_group(set) ──> cache hit?  ── yes ──> ref_count += 1
//!                                          │ no
//!                                          ▼
//!                               create group, add resolved members
//!
//! NeighborManager ──on_neighbor_resolved──>   add member to every group containing the hop
//!                 ──on_neighbor_unresolved──> remove it again
//! ```

mod group;
mod handle;
mod manager;
mod types;

pub use handle::{NextHopGroupHandle, WeakNextHopGroup};
pub use manager::NextHopGroupManager;
pub use types::{NextHopSet, ResolvedNextHop};
