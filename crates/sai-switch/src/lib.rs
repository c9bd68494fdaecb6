//! Switch resource managers.
//!
//! Keeps hardware objects programmed through SAI consistent with the
//! software model of desired switch state.
//!
//! # Architecture
//!
//! ```text
//! [apply pipeline] ──add/change/remove──> [SaiManagerTable] <──HwSwitchEvent── [hardware]
//!                                             │
//!            ┌───────────────┬────────────────┼──────────────────┐
//!            ▼               ▼                ▼                  ▼
//!      PortManager  RouterInterfaceMgr  NeighborManager ──> NextHopGroupManager
//!            │               │                │    (NeighborObserver)   │
//!            └───────────────┴────────────────┴─────────────────────────┘
//!                                      [SaiApiTable]
//! ```
//!
//! # Key Components
//!
//! - [`port`], [`router_interface`], [`neighbor`]: one manager per object
//!   category, each holding a bidirectional [`id_map::IdMap`]
//! - [`next_hop_group`]: shared, reference-counted groups whose membership
//!   follows neighbor resolution
//! - [`manager_table::SaiManagerTable`]: composition root and event entry
//!
//! All manager state is single-writer. Managers do no locking, and
//! next-hop-group handles are `!Send`.

pub mod audit;
pub mod config;
pub mod error;
pub mod events;
pub mod id_map;
pub mod manager_table;
pub mod neighbor;
pub mod next_hop_group;
pub mod port;
pub mod router_interface;
pub mod types;

pub use config::{ManagerTableConfig, NextHopGroupManagerConfig};
pub use error::{ManagerError, ManagerResult, ResourceKind};
pub use events::{HwSwitchEvent, HwSwitchEventObserver, ObserverId};
pub use id_map::{IdMap, IdMapError};
pub use manager_table::SaiManagerTable;
pub use neighbor::{NeighborKey, NeighborLookup, NeighborManager, NeighborObserver, SwNeighbor};
pub use next_hop_group::{
    NextHopGroupHandle, NextHopGroupManager, NextHopSet, ResolvedNextHop, WeakNextHopGroup,
};
pub use port::{PortManager, SwPort};
pub use router_interface::{RouterInterfaceManager, SwInterface};
pub use types::{InterfaceId, PortId, VlanId};
