//! Port manager.
//!
//! Owns one SAI port object per software port, together with the bridge
//! port that joins it to the default bridge, and keeps the software
//! identifier and hardware handle mappings in lockstep.

mod manager;
mod types;

pub use manager::PortManager;
pub use types::{SaiPort, SwPort};
