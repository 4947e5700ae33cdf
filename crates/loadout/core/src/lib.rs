//! Deterministic loadout resolution shared by every consumer of loadout data.
//!
//! `loadout-core` defines the canonical rules for equipment requirement
//! profiles: per-kind item [`Filter`]s, [`Tag`]s grouping required items, the
//! ordered and stateful [`Loadout`], and the [`capacity`] calculator that turns
//! a hypothetical item set into encumbrance ratios. The game's item database
//! and agents are consumed read-only through the traits in [`env`] and
//! [`agent`].
pub mod agent;
pub mod capacity;
pub mod config;
pub mod deflist;
pub mod env;
pub mod error;
pub mod filter;
pub mod item;
pub mod loadout;
pub mod manager;
pub mod tag;

pub use agent::{Agent, AgentId, AgentProfile, AgentTraits};
pub use capacity::{
    AlternateFormula, BudgetReport, CapacityCalculator, CapacityFormula, EncumbranceReport,
    FormulaFamily, VanillaFormula,
};
pub use config::LoadoutConfig;
pub use deflist::{CapacityBoost, DefListCache, DefLists};
pub use env::{
    CatalogSnapshot, Env, ItemCatalog, ItemCategory, ItemDefinition, ItemFlags, ItemKindId, ItemStat,
    MaterialDefinition, MaterialId, ModuleOracle, ModuleSet, OracleError,
};
pub use error::{ErrorSeverity, LoadoutFault};
pub use filter::{Filter, FilterError};
pub use item::{FloatRange, ItemInstance, Quality, QualityRange};
pub use loadout::{
    ActiveState, Loadout, LoadoutElement, LoadoutError, LoadoutItem, LoadoutState, StateId,
    StateRegistry,
};
pub use manager::{LoadoutManager, ManagerError};
pub use tag::{RequiredItem, Tag, TagError, TagId, TagRegistry};
