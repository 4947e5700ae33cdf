//! Content loaders for reading loadout data from files.
//!
//! Each loader turns one RON/TOML file into the `loadout-core` type it
//! describes. [`ContentFactory`] ties them to a data directory.

pub mod agents;
pub mod catalog;
pub mod config;
pub mod factory;
pub mod modules;
pub mod profile;

pub use agents::AgentLoader;
pub use catalog::CatalogLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use modules::ModulesLoader;
pub use profile::{ProfileFormat, ProfileStore};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
