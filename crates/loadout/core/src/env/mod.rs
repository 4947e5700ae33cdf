//! Traits describing read-only game data.
//!
//! Oracles expose the item catalog and optional-module detection. The [`Env`]
//! aggregate bundles them so the def-list cache and calculator can reach
//! everything they need without hard coupling to concrete implementations.
mod error;
mod items;
mod modules;
mod snapshot;

pub use error::OracleError;
pub use items::{
    ItemCatalog, ItemCategory, ItemDefinition, ItemFlags, ItemKindId, ItemStat,
    MaterialDefinition, MaterialId,
};
pub use modules::{ModuleOracle, ModuleSet};
pub use snapshot::CatalogSnapshot;

/// Aggregates the read-only oracles consumed by the engine.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    catalog: Option<&'a dyn ItemCatalog>,
    modules: Option<&'a dyn ModuleOracle>,
}

impl<'a> Env<'a> {
    pub fn new(
        catalog: Option<&'a dyn ItemCatalog>,
        modules: Option<&'a dyn ModuleOracle>,
    ) -> Self {
        Self { catalog, modules }
    }

    pub fn with_all(catalog: &'a dyn ItemCatalog, modules: &'a dyn ModuleOracle) -> Self {
        Self::new(Some(catalog), Some(modules))
    }

    pub fn empty() -> Self {
        Self {
            catalog: None,
            modules: None,
        }
    }

    /// Returns the ItemCatalog, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::CatalogNotAvailable` if no catalog was provided.
    pub fn catalog(&self) -> Result<&'a dyn ItemCatalog, OracleError> {
        self.catalog.ok_or(OracleError::CatalogNotAvailable)
    }

    /// Returns the ModuleOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ModulesNotAvailable` if no module oracle was provided.
    pub fn modules(&self) -> Result<&'a dyn ModuleOracle, OracleError> {
        self.modules.ok_or(OracleError::ModulesNotAvailable)
    }
}

impl core::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Env")
            .field("catalog", &self.catalog.is_some())
            .field("modules", &self.modules.is_some())
            .finish()
    }
}
