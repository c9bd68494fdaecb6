//! Capacity limits for the fake driver.

use serde::{Deserialize, Serialize};

/// Per-category object limits. `None` means unbounded.
///
/// ```
/// let config: sai_fake::FakeSaiConfig =
///     serde_json::from_str(r#"{ "max_next_hop_groups": 2 }"#).unwrap();
/// assert_eq!(config.max_next_hop_groups, Some(2));
/// assert_eq!(config.max_ports, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FakeSaiConfig {
    pub max_ports: Option<usize>,
    pub max_bridge_ports: Option<usize>,
    pub max_router_interfaces: Option<usize>,
    pub max_neighbors: Option<usize>,
    pub max_next_hops: Option<usize>,
    pub max_next_hop_groups: Option<usize>,
    pub max_next_hop_group_members: Option<usize>,
}
