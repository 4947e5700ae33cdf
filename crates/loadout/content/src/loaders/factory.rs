//! Content factory for building engine inputs from data files.

use std::path::{Path, PathBuf};

use loadout_core::{AgentProfile, CatalogSnapshot, LoadoutConfig, ModuleSet};

use crate::loaders::{
    AgentLoader, CatalogLoader, ConfigLoader, LoadResult, ModulesLoader, ProfileStore,
};

/// Content factory that loads all loadout content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── modules.toml
/// ├── catalog.ron
/// ├── agents.ron
/// └── profiles/
///     ├── default.ron
///     └── hardcore.bin
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`, or defaults if absent.
    pub fn load_config(&self) -> LoadResult<LoadoutConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!("{} not found, using default config", path.display());
            return Ok(LoadoutConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load active modules from `modules.toml`, or none if absent.
    pub fn load_modules(&self) -> LoadResult<ModuleSet> {
        let path = self.data_dir.join("modules.toml");
        if !path.exists() {
            return Ok(ModuleSet::new());
        }
        ModulesLoader::load(&path)
    }

    /// Load the item catalog from `catalog.ron`.
    pub fn load_catalog(&self) -> LoadResult<CatalogSnapshot> {
        let path = self.data_dir.join("catalog.ron");
        CatalogLoader::load(&path)
    }

    /// Load agent fixtures from `agents.ron`.
    pub fn load_agents(&self) -> LoadResult<Vec<AgentProfile>> {
        let path = self.data_dir.join("agents.ron");
        AgentLoader::load(&path)
    }

    /// Profile store rooted at `profiles/`.
    pub fn profiles(&self) -> LoadResult<ProfileStore> {
        ProfileStore::new(self.data_dir.join("profiles"))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_optional_files_fall_back() {
        let factory = ContentFactory::new("/nonexistent/loadout-data");
        assert_eq!(factory.load_config().unwrap(), LoadoutConfig::default());
        assert_eq!(factory.load_modules().unwrap(), ModuleSet::new());
        assert!(factory.load_catalog().is_err());
    }
}
