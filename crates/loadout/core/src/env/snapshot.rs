//! In-memory catalog oracle.
//!
//! Backs [`ItemCatalog`] with plain maps so tests and tools can substitute a
//! fixture catalog for the game's definition database.

use std::collections::BTreeMap;

use super::{ItemCatalog, ItemDefinition, ItemKindId, MaterialDefinition, MaterialId};

/// Serializable catalog snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogSnapshot {
    #[cfg_attr(feature = "serde", serde(default))]
    materials: BTreeMap<MaterialId, MaterialDefinition>,
    #[cfg_attr(feature = "serde", serde(default))]
    items: BTreeMap<ItemKindId, ItemDefinition>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        materials: impl IntoIterator<Item = MaterialDefinition>,
        items: impl IntoIterator<Item = ItemDefinition>,
    ) -> Self {
        let mut snapshot = Self::new();
        for material in materials {
            snapshot.add_material(material);
        }
        for item in items {
            snapshot.add_definition(item);
        }
        snapshot
    }

    /// Adds an item definition, replacing any previous one for the same kind.
    pub fn add_definition(&mut self, def: ItemDefinition) {
        self.items.insert(def.kind, def);
    }

    pub fn add_material(&mut self, material: MaterialDefinition) {
        self.materials.insert(material.id, material);
    }

    /// Finds a definition by its label (case-insensitive).
    pub fn find_by_label(&self, label: &str) -> Option<&ItemDefinition> {
        self.items
            .values()
            .find(|def| def.label.eq_ignore_ascii_case(label))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemCatalog for CatalogSnapshot {
    fn definition(&self, kind: ItemKindId) -> Option<&ItemDefinition> {
        self.items.get(&kind)
    }

    fn material(&self, id: MaterialId) -> Option<&MaterialDefinition> {
        self.materials.get(&id)
    }

    fn all_definitions(&self) -> Vec<&ItemDefinition> {
        self.items.values().collect()
    }
}
