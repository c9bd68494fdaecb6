//! In-memory SAI driver.
//!
//! [`FakeSai`] implements [`sai_api::SaiDriver`] with per-category object
//! tables and sequential handle allocation. It rejects the attribute
//! combinations a real driver rejects (missing mandatory attributes,
//! writes to create-only or read-only attributes, dangling references,
//! removal of referenced objects) and any access to an unknown handle.

mod bridge_port;
mod config;
mod fake;
mod neighbor;
mod next_hop;
mod next_hop_group;
mod objects;
mod port;
mod router_interface;

pub use config::FakeSaiConfig;
pub use fake::FakeSai;
