use bitflags::bitflags;

use super::OracleError;
use crate::item::{ItemInstance, Quality};

/// Reference to an item kind stored in the external catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemKindId(pub u32);

/// Reference to a material ("stuff") an item kind may be made from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialId(pub u32);

bitflags! {
    /// Capabilities and catalog classification bits of an item kind.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ItemFlags: u16 {
        const HAULABLE = 1 << 0;
        const PLAYER_ACQUIRABLE = 1 << 1;
        const DESTROY_ON_DROP = 1 << 2;
        const FRAME = 1 << 3;
        const UNFINISHED = 1 << 4;
        const MINIFIED = 1 << 5;
        const CORPSE = 1 << 6;
        const BUILDING = 1 << 7;
        const MADE_FROM_MATERIAL = 1 << 8;
        const HAS_QUALITY = 1 << 9;
        const USES_HIT_POINTS = 1 << 10;
    }
}

/// Broad catalog bucket of an item kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemCategory {
    Apparel,
    MeleeWeapon,
    RangedWeapon,
    Medicine,
    Drug,
    #[default]
    Other,
}

/// Statistic looked up on an item instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemStat {
    Mass,
    /// Bulk while worn or carried.
    WornBulk,
}

/// Item kind definition as exposed by the game's definition database.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub kind: ItemKindId,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: ItemCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: ItemFlags,
    pub mass: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub worn_bulk: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_hit_points: u32,
    /// Materials this kind can be built from; empty unless made from material.
    #[cfg_attr(feature = "serde", serde(default))]
    pub materials: Vec<MaterialId>,
    /// Extra carrying capacity granted while worn (capacity apparel only).
    #[cfg_attr(feature = "serde", serde(default))]
    pub carrying_capacity: Option<f32>,
}

impl ItemDefinition {
    pub fn new(kind: ItemKindId, label: impl Into<String>, mass: f32) -> Self {
        Self {
            kind,
            label: label.into(),
            category: ItemCategory::Other,
            flags: ItemFlags::HAULABLE | ItemFlags::PLAYER_ACQUIRABLE,
            mass,
            worn_bulk: 0.0,
            max_hit_points: 0,
            materials: Vec::new(),
            carrying_capacity: None,
        }
    }

    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_flags(mut self, flags: ItemFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_materials(mut self, materials: impl IntoIterator<Item = MaterialId>) -> Self {
        self.flags |= ItemFlags::MADE_FROM_MATERIAL;
        self.materials = materials.into_iter().collect();
        self
    }

    pub fn with_quality(mut self) -> Self {
        self.flags |= ItemFlags::HAS_QUALITY;
        self
    }

    pub fn with_hit_points(mut self, max_hit_points: u32) -> Self {
        self.flags |= ItemFlags::USES_HIT_POINTS;
        self.max_hit_points = max_hit_points;
        self
    }

    pub fn with_worn_bulk(mut self, worn_bulk: f32) -> Self {
        self.worn_bulk = worn_bulk;
        self
    }

    pub fn with_carrying_capacity(mut self, capacity: f32) -> Self {
        self.carrying_capacity = Some(capacity);
        self
    }

    pub fn made_from_material(&self) -> bool {
        self.flags.contains(ItemFlags::MADE_FROM_MATERIAL)
    }

    pub fn has_quality(&self) -> bool {
        self.flags.contains(ItemFlags::HAS_QUALITY)
    }

    pub fn uses_hit_points(&self) -> bool {
        self.flags.contains(ItemFlags::USES_HIT_POINTS)
    }

    /// Whether a player could ever hold this kind as a loose item.
    ///
    /// Frames, unfinished work, packaged furniture, corpses and anything that
    /// vanishes when dropped never appear in requirement pickers.
    pub fn is_loadout_candidate(&self) -> bool {
        self.flags.contains(ItemFlags::HAULABLE | ItemFlags::PLAYER_ACQUIRABLE)
            && !self.flags.intersects(
                ItemFlags::FRAME
                    | ItemFlags::DESTROY_ON_DROP
                    | ItemFlags::UNFINISHED
                    | ItemFlags::MINIFIED
                    | ItemFlags::CORPSE,
            )
    }
}

/// A material an item can be made from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialDefinition {
    pub id: MaterialId,
    pub label: String,
    /// Multiplier applied to the base mass of items built from this material.
    pub mass_factor: f32,
}

impl MaterialDefinition {
    pub fn new(id: MaterialId, label: impl Into<String>, mass_factor: f32) -> Self {
        Self {
            id,
            label: label.into(),
            mass_factor,
        }
    }
}

/// Read-only view of the game's item definition database.
pub trait ItemCatalog: Send + Sync {
    fn definition(&self, kind: ItemKindId) -> Option<&ItemDefinition>;

    fn material(&self, id: MaterialId) -> Option<&MaterialDefinition>;

    /// Returns all item definitions, ordered by kind.
    fn all_definitions(&self) -> Vec<&ItemDefinition>;

    /// Looks up a definition, turning a dangling reference into an error.
    fn require(&self, kind: ItemKindId) -> Result<&ItemDefinition, OracleError> {
        self.definition(kind).ok_or(OracleError::ItemKindNotFound(kind))
    }

    /// Materials valid for `kind` (empty if the kind is not made from material).
    fn valid_materials(&self, kind: ItemKindId) -> Vec<MaterialId> {
        self.definition(kind)
            .filter(|def| def.made_from_material())
            .map(|def| def.materials.clone())
            .unwrap_or_default()
    }

    /// Evaluates `stat` on a concrete instance.
    fn stat_value(&self, instance: &ItemInstance, stat: ItemStat) -> Result<f32, OracleError> {
        let instance = instance.inner_if_minified();
        let def = self.require(instance.kind)?;
        let value = match stat {
            ItemStat::Mass => {
                let factor = match instance.material {
                    Some(id) if def.made_from_material() => {
                        self.material(id)
                            .ok_or(OracleError::MaterialNotFound(id))?
                            .mass_factor
                    }
                    _ => 1.0,
                };
                def.mass * factor
            }
            ItemStat::WornBulk => def.worn_bulk,
        };
        Ok(value)
    }

    /// Builds a throwaway instance for hypothetical calculations.
    ///
    /// The material is only applied to kinds made from material, hit points
    /// start at maximum, and quality is only set on kinds that track it.
    fn make_disposable(
        &self,
        kind: ItemKindId,
        material: Option<MaterialId>,
        quality: Quality,
    ) -> Result<ItemInstance, OracleError> {
        let def = self.require(kind)?;
        let mut instance = ItemInstance::new(kind);
        if def.made_from_material() {
            instance.material = material.or_else(|| def.materials.first().copied());
        }
        if def.uses_hit_points() {
            instance.hit_points = def.max_hit_points;
            instance.max_hit_points = def.max_hit_points;
        }
        if def.has_quality() {
            instance.quality = Some(quality);
        }
        Ok(instance)
    }
}
