//! Router-interface manager.
//!
//! Each routed software interface becomes a port-type router interface in
//! the switch's default virtual router.

mod manager;
mod types;

pub use manager::RouterInterfaceManager;
pub use types::{SaiRouterInterface, SwInterface};
