//! Agent fixture loader.

use std::collections::BTreeSet;
use std::path::Path;

use loadout_core::AgentProfile;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Agent roster structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRoster {
    pub agents: Vec<AgentProfile>,
}

/// Loader for agent profiles from RON files.
pub struct AgentLoader;

impl AgentLoader {
    /// Load agents from a RON file, rejecting duplicate ids.
    pub fn load(path: &Path) -> LoadResult<Vec<AgentProfile>> {
        let content = read_file(path)?;
        let roster: AgentRoster = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse agent roster RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for agent in &roster.agents {
            if !seen.insert(agent.id) {
                anyhow::bail!("Duplicate agent id {} ('{}')", agent.id, agent.name);
            }
        }

        Ok(roster.agents)
    }
}
