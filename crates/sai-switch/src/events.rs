//! Hardware-originated events and their observers.

use crate::neighbor::{NeighborKey, SwNeighbor};
use crate::types::PortId;
use sai_api::PortOid;

/// An event reported by the switch, in hardware terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwSwitchEvent {
    LinkStateChanged { port: PortOid, up: bool },
    NeighborResolved(SwNeighbor),
    NeighborUnresolved(NeighborKey),
    PacketReceived { port: PortOid, frame: Vec<u8> },
}

/// Receives port-level events after the managers have processed them.
/// Ports are reported by their software identifier.
pub trait HwSwitchEventObserver {
    fn link_state_changed(&mut self, _port: PortId, _up: bool) {}

    fn packet_received(&mut self, _port: PortId, _frame: &[u8]) {}
}

/// Registration token returned by `add_event_observer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub(crate) u64);
