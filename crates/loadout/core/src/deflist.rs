//! Memoized classification of the item catalog.
//!
//! [`DefLists`] sorts every loadout-eligible kind into the buckets editors
//! offer (apparel, melee, ranged, medicinal) and records which apparel boosts
//! carrying capacity. It also fixes the [`FormulaFamily`] for the rest of the
//! process, based on which optional modules are active.
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::capacity::FormulaFamily;
use crate::config::LoadoutConfig;
use crate::env::{Env, ItemCategory, ItemDefinition, ItemFlags, ItemKindId, OracleError};
use crate::item::ItemInstance;

/// Carrying-capacity bonus granted by wearing an item kind.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapacityBoost {
    pub base: f32,
}

impl CapacityBoost {
    pub const fn new(base: f32) -> Self {
        Self { base }
    }

    /// Boost for a concrete instance, scaled by its quality when it has one.
    pub fn evaluate(&self, instance: &ItemInstance) -> f32 {
        match instance.inner_if_minified().quality {
            Some(quality) => self.base * quality.multiplier(),
            None => self.base,
        }
    }
}

/// Classified view of the catalog, built once per process.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefLists {
    pub items: Vec<ItemKindId>,
    pub apparel: Vec<ItemKindId>,
    pub melee_weapons: Vec<ItemKindId>,
    pub ranged_weapons: Vec<ItemKindId>,
    pub medicinal: Vec<ItemKindId>,
    pub mass_boosts: BTreeMap<ItemKindId, CapacityBoost>,
    /// Always empty: the alternate family never registers bulk boosts.
    pub bulk_boosts: BTreeMap<ItemKindId, CapacityBoost>,
    pub family: FormulaFamily,
}

impl DefLists {
    /// Classifies the catalog reachable through `env`.
    ///
    /// # Errors
    ///
    /// Returns an [`OracleError`] if the catalog or module oracle is missing.
    pub fn build(env: &Env<'_>, config: &LoadoutConfig) -> Result<Self, OracleError> {
        let catalog = env.catalog()?;
        let modules = env.modules()?;

        let candidates: Vec<&ItemDefinition> = catalog
            .all_definitions()
            .into_iter()
            .filter(|def| def.is_loadout_candidate())
            .collect();

        let mut lists = DefLists {
            items: kinds_where(&candidates, |_| true),
            apparel: kinds_where(&candidates, |def| def.category == ItemCategory::Apparel),
            melee_weapons: kinds_where(&candidates, |def| {
                def.category == ItemCategory::MeleeWeapon
            }),
            ranged_weapons: kinds_where(&candidates, |def| {
                def.category == ItemCategory::RangedWeapon
                    && !def.flags.contains(ItemFlags::BUILDING)
            }),
            medicinal: kinds_where(&candidates, |def| {
                matches!(def.category, ItemCategory::Medicine | ItemCategory::Drug)
            }),
            ..DefLists::default()
        };

        if modules.is_active(&config.alternate_capacity_module) {
            lists.family = FormulaFamily::Alternate;
            tracing::warn!(
                "'{}' detected; capacity boosts are not applied under the alternate formula",
                config.alternate_capacity_module
            );
        } else if modules.is_active(&config.capacity_apparel_module) {
            for def in &candidates {
                if def.category != ItemCategory::Apparel {
                    continue;
                }
                if let Some(capacity) = def.carrying_capacity {
                    lists.mass_boosts.insert(def.kind, CapacityBoost::new(capacity));
                }
            }
        }

        tracing::debug!(
            "classified {} items ({} apparel, {} melee, {} ranged, {} medicinal, {} boosting), family {}",
            lists.items.len(),
            lists.apparel.len(),
            lists.melee_weapons.len(),
            lists.ranged_weapons.len(),
            lists.medicinal.len(),
            lists.mass_boosts.len(),
            lists.family,
        );
        Ok(lists)
    }

    pub fn is_boosting(&self, kind: ItemKindId) -> bool {
        self.mass_boosts.contains_key(&kind)
    }
}

fn kinds_where(
    candidates: &[&ItemDefinition],
    pred: impl Fn(&ItemDefinition) -> bool,
) -> Vec<ItemKindId> {
    candidates
        .iter()
        .filter(|def| pred(**def))
        .map(|def| def.kind)
        .collect()
}

/// Lazily built, never invalidated [`DefLists`].
///
/// Pass one cache by reference to every consumer; tests build their own
/// against fixture catalogs.
#[derive(Debug, Default)]
pub struct DefListCache {
    lists: OnceLock<DefLists>,
}

impl DefListCache {
    pub const fn new() -> Self {
        Self {
            lists: OnceLock::new(),
        }
    }

    /// Returns the cached lists, building them on first access.
    ///
    /// A failed build leaves the cache empty so a later call can retry.
    pub fn get_or_build(
        &self,
        env: &Env<'_>,
        config: &LoadoutConfig,
    ) -> Result<&DefLists, OracleError> {
        if let Some(lists) = self.lists.get() {
            return Ok(lists);
        }
        let built = DefLists::build(env, config)?;
        Ok(self.lists.get_or_init(|| built))
    }

    pub fn get(&self) -> Option<&DefLists> {
        self.lists.get()
    }

    pub fn is_built(&self) -> bool {
        self.lists.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{CatalogSnapshot, ModuleSet};
    use crate::item::Quality;

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::from_parts(
            [],
            [
                ItemDefinition::new(ItemKindId(1), "Knife", 0.5)
                    .with_category(ItemCategory::MeleeWeapon),
                ItemDefinition::new(ItemKindId(2), "Rifle", 3.5)
                    .with_category(ItemCategory::RangedWeapon),
                ItemDefinition::new(ItemKindId(3), "Turret gun", 20.0)
                    .with_category(ItemCategory::RangedWeapon)
                    .with_flags(ItemFlags::BUILDING),
                ItemDefinition::new(ItemKindId(4), "Medicine", 0.5)
                    .with_category(ItemCategory::Medicine),
                ItemDefinition::new(ItemKindId(5), "Beer", 0.3).with_category(ItemCategory::Drug),
                ItemDefinition::new(ItemKindId(6), "Backpack", 2.0)
                    .with_category(ItemCategory::Apparel)
                    .with_quality()
                    .with_carrying_capacity(25.0),
                ItemDefinition::new(ItemKindId(7), "Parka", 3.0)
                    .with_category(ItemCategory::Apparel),
                ItemDefinition::new(ItemKindId(8), "Corpse", 60.0).with_flags(ItemFlags::CORPSE),
            ],
        )
    }

    #[test]
    fn buckets_skip_ineligible_kinds() {
        let catalog = catalog();
        let modules = ModuleSet::new();
        let lists = DefLists::build(&Env::with_all(&catalog, &modules), &LoadoutConfig::default())
            .unwrap();

        assert_eq!(lists.items.len(), 7);
        assert_eq!(lists.melee_weapons, vec![ItemKindId(1)]);
        assert_eq!(lists.ranged_weapons, vec![ItemKindId(2)]);
        assert_eq!(lists.medicinal, vec![ItemKindId(4), ItemKindId(5)]);
        assert_eq!(lists.apparel, vec![ItemKindId(6), ItemKindId(7)]);
        assert!(lists.mass_boosts.is_empty());
        assert_eq!(lists.family, FormulaFamily::Vanilla);
    }

    #[test]
    fn boosts_need_the_apparel_module() {
        let catalog = catalog();
        let config = LoadoutConfig::default();
        let modules = ModuleSet::new().with(config.capacity_apparel_module.clone());
        let lists = DefLists::build(&Env::with_all(&catalog, &modules), &config).unwrap();

        assert!(lists.is_boosting(ItemKindId(6)));
        assert!(!lists.is_boosting(ItemKindId(7)));
    }

    #[test]
    fn alternate_module_wins_and_registers_no_boosts() {
        let catalog = catalog();
        let config = LoadoutConfig::default();
        let modules = ModuleSet::new()
            .with(config.capacity_apparel_module.clone())
            .with(config.alternate_capacity_module.clone());
        let lists = DefLists::build(&Env::with_all(&catalog, &modules), &config).unwrap();

        assert_eq!(lists.family, FormulaFamily::Alternate);
        assert!(lists.mass_boosts.is_empty());
        assert!(lists.bulk_boosts.is_empty());
    }

    #[test]
    fn boost_scales_with_quality() {
        let boost = CapacityBoost::new(10.0);
        let plain = ItemInstance::new(ItemKindId(6));
        assert_eq!(boost.evaluate(&plain), 10.0);
        assert_eq!(boost.evaluate(&plain.clone().with_quality(Quality::Awful)), 5.0);
        assert_eq!(boost.evaluate(&plain.with_quality(Quality::Legendary)), 20.0);
    }

    #[test]
    fn cache_builds_once() {
        let catalog = catalog();
        let modules = ModuleSet::new();
        let cache = DefListCache::new();
        let config = LoadoutConfig::default();

        assert!(matches!(
            cache.get_or_build(&Env::empty(), &config),
            Err(OracleError::CatalogNotAvailable)
        ));
        assert!(!cache.is_built());

        let first = cache
            .get_or_build(&Env::with_all(&catalog, &modules), &config)
            .unwrap();
        let second = cache.get_or_build(&Env::empty(), &config).unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
