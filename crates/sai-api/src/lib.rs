//! Typed dispatch layer over the SAI (Switch Abstraction Interface).
//!
//! - [`types`]: type-safe object IDs and object type codes
//! - [`error`]: status codes and error classification
//! - [`attribute`]: raw attribute values and the typed attribute contract
//! - [`driver`]: the raw [`SaiDriver`] boundary a vendor library implements
//! - [`api`]: per-category typed function tables
//! - [`table`]: [`SaiApiTable`], the set of tables bound to one switch
//!
//! ```ignore
//! use sai_api::{SaiApiTable, SaiResult};
//! use sai_api::api::port::PortAttribute;
//!
//! fn bring_up(table: &SaiApiTable) -> SaiResult<()> {
//!     let port = table.port_api().create(&[
//!         PortAttribute::HwLaneList(vec![0, 1, 2, 3]),
//!         PortAttribute::Speed(100_000),
//!     ])?;
//!     table.port_api().set_attribute(port, &PortAttribute::AdminState(true))
//! }
//! ```

pub mod api;
pub mod attribute;
pub mod driver;
pub mod error;
pub mod mac;
pub mod table;
pub mod types;

pub use attribute::{SaiAttrId, SaiAttribute, SaiAttributeSet, SaiAttributeValue};
pub use driver::SaiDriver;
pub use error::{SaiError, SaiResult, SaiStatus};
pub use mac::MacAddress;
pub use table::SaiApiTable;
pub use types::{
    BridgePortKind, BridgePortOid, NextHopGroupKind, NextHopGroupMemberKind, NextHopGroupMemberOid, NextHopGroupOid,
    NextHopKind, NextHopOid, PortKind, PortOid, RawSaiObjectId, RouterInterfaceKind,
    RouterInterfaceOid, SaiObjectId, SaiObjectKind, SaiObjectType, SwitchKind, SwitchOid,
    VirtualRouterKind, VirtualRouterOid,
};
