//! Item catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use loadout_core::{CatalogSnapshot, ItemDefinition, MaterialDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub materials: Vec<MaterialDefinition>,
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load an item catalog from a RON file.
    ///
    /// Kinds and materials must be unique and every material an item lists
    /// must be defined in the same file.
    pub fn load(path: &Path) -> LoadResult<CatalogSnapshot> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CatalogSnapshot> {
        let file: CatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        Self::validate(&file)?;

        tracing::debug!(
            "loaded {} items and {} materials",
            file.items.len(),
            file.materials.len()
        );
        Ok(CatalogSnapshot::from_parts(file.materials, file.items))
    }

    fn validate(file: &CatalogFile) -> LoadResult<()> {
        let mut materials = BTreeSet::new();
        for material in &file.materials {
            if !materials.insert(material.id) {
                anyhow::bail!("Duplicate material {:?} ('{}')", material.id, material.label);
            }
        }

        let mut kinds = BTreeSet::new();
        for item in &file.items {
            if !kinds.insert(item.kind) {
                anyhow::bail!("Duplicate item kind {:?} ('{}')", item.kind, item.label);
            }
            if let Some(missing) = item.materials.iter().find(|id| !materials.contains(*id)) {
                anyhow::bail!("Item '{}' lists unknown material {:?}", item.label, missing);
            }
            if item.made_from_material() && item.materials.is_empty() {
                tracing::warn!("Item '{}' is made from material but lists none", item.label);
            }
        }
        Ok(())
    }
}
