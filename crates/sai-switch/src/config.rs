//! Manager configuration.

use serde::{Deserialize, Serialize};

/// Next-hop-group manager settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NextHopGroupManagerConfig {
    /// Upper bound on live groups. `None` leaves the limit to hardware.
    pub max_groups: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerTableConfig {
    pub next_hop_group: NextHopGroupManagerConfig,

    /// Remove every programmed object when the table is dropped.
    pub teardown_on_drop: bool,
}

impl Default for ManagerTableConfig {
    fn default() -> Self {
        Self {
            next_hop_group: NextHopGroupManagerConfig::default(),
            teardown_on_drop: true,
        }
    }
}

impl ManagerTableConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
