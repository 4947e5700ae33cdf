//! Active optional-module list loader.

use std::path::Path;

use loadout_core::ModuleSet;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Module list structure for TOML files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModulesFile {
    #[serde(default)]
    pub active: Vec<String>,
}

/// Loader for the set of active modules.
pub struct ModulesLoader;

impl ModulesLoader {
    pub fn load(path: &Path) -> LoadResult<ModuleSet> {
        let content = read_file(path)?;
        let file: ModulesFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse modules TOML: {}", e))?;

        tracing::debug!("{} active modules", file.active.len());
        Ok(file.active.into_iter().collect())
    }
}
