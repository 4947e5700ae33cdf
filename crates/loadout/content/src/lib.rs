//! Data-driven loadout content and persistence.
//!
//! This crate reads the files that feed `loadout-core`:
//! - Item and material catalogs (RON)
//! - Engine configuration (TOML)
//! - Active optional modules (TOML)
//! - Agent fixtures (RON)
//!
//! and persists the player's tags, states and loadouts as RON or bincode
//! profiles through [`ProfileStore`].

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AgentLoader, CatalogLoader, ConfigLoader, ContentFactory, ModulesLoader, ProfileFormat,
    ProfileStore,
};
