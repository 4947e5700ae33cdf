//! Item-level value types shared by filters and the capacity calculator.
//!
//! - [`Quality`]: ordered 7-step craftsmanship tier
//! - [`QualityRange`] / [`FloatRange`]: inclusive ranges used by filters
//! - [`ItemInstance`]: a concrete (or disposable) item as seen by the engine

use crate::env::{ItemKindId, MaterialId};

/// Craftsmanship tier of an item, from worst to best.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum Quality {
    Awful,
    Poor,
    #[default]
    Normal,
    Good,
    Excellent,
    Masterwork,
    Legendary,
}

impl Quality {
    pub const ALL: [Quality; 7] = [
        Quality::Awful,
        Quality::Poor,
        Quality::Normal,
        Quality::Good,
        Quality::Excellent,
        Quality::Masterwork,
        Quality::Legendary,
    ];

    /// Multiplier applied to quality-scaled stats such as apparel carrying capacity.
    pub const fn multiplier(self) -> f32 {
        match self {
            Quality::Awful => 0.5,
            Quality::Poor => 0.8,
            Quality::Normal => 1.0,
            Quality::Good => 1.2,
            Quality::Excellent => 1.5,
            Quality::Masterwork => 1.7,
            Quality::Legendary => 2.0,
        }
    }

    /// One tier up, saturating at `Legendary`.
    pub fn next(self) -> Self {
        let idx = (self as usize + 1).min(Quality::Legendary as usize);
        Self::ALL[idx]
    }

    /// One tier down, saturating at `Awful`.
    pub fn previous(self) -> Self {
        let idx = (self as usize).saturating_sub(1);
        Self::ALL[idx]
    }
}

/// Inclusive range over [`Quality`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityRange {
    pub min: Quality,
    pub max: Quality,
}

impl QualityRange {
    /// Every quality accepted.
    pub const ALL: QualityRange = QualityRange {
        min: Quality::Awful,
        max: Quality::Legendary,
    };

    pub const fn new(min: Quality, max: Quality) -> Self {
        Self { min, max }
    }

    pub fn includes(&self, quality: Quality) -> bool {
        quality >= self.min && quality <= self.max
    }

    pub fn is_all(&self) -> bool {
        *self == Self::ALL
    }
}

impl Default for QualityRange {
    fn default() -> Self {
        Self::ALL
    }
}

/// Inclusive float range, used for hit-point fractions.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    /// Tolerance applied to both ends by [`FloatRange::includes_epsilon`].
    pub const EPSILON: f32 = 1e-5;

    pub const ZERO_TO_ONE: FloatRange = FloatRange { min: 0.0, max: 1.0 };

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Inclusive test widened by [`FloatRange::EPSILON`] so that values landing
    /// on an endpoint after float division still count as inside.
    pub fn includes_epsilon(&self, value: f32) -> bool {
        value >= self.min - Self::EPSILON && value <= self.max + Self::EPSILON
    }

    /// True when both ends lie in `[0, 1]` and `min <= max`.
    pub fn is_unit_subrange(&self) -> bool {
        (0.0..=1.0).contains(&self.min) && (0.0..=1.0).contains(&self.max) && self.min <= self.max
    }
}

impl Default for FloatRange {
    fn default() -> Self {
        Self::ZERO_TO_ONE
    }
}

/// A concrete item as seen by the engine.
///
/// Hypothetical calculations use disposable instances built by
/// [`crate::env::ItemCatalog::make_disposable`]; real carried items come from
/// [`crate::agent::Agent::carried_items`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInstance {
    pub kind: ItemKindId,
    pub material: Option<MaterialId>,
    pub hit_points: u32,
    pub max_hit_points: u32,
    /// `None` when the kind has no quality capability.
    pub quality: Option<Quality>,
    pub stack_count: u32,
    /// Packaged ("minified") wrappers carry the real item here.
    pub inner: Option<Box<ItemInstance>>,
}

impl ItemInstance {
    pub fn new(kind: ItemKindId) -> Self {
        Self {
            kind,
            material: None,
            hit_points: 0,
            max_hit_points: 0,
            quality: None,
            stack_count: 1,
            inner: None,
        }
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_hit_points(mut self, hit_points: u32, max_hit_points: u32) -> Self {
        self.hit_points = hit_points;
        self.max_hit_points = max_hit_points;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_stack_count(mut self, stack_count: u32) -> Self {
        self.stack_count = stack_count;
        self
    }

    /// Wraps `inner` in a packaged instance of kind `wrapper`.
    pub fn packaged(wrapper: ItemKindId, inner: ItemInstance) -> Self {
        Self {
            inner: Some(Box::new(inner)),
            ..Self::new(wrapper)
        }
    }

    /// Resolves packaged wrappers down to the real item.
    pub fn inner_if_minified(&self) -> &ItemInstance {
        let mut current = self;
        while let Some(inner) = current.inner.as_deref() {
            current = inner;
        }
        current
    }

    /// Current hit points over maximum, clamped to `[0, 1]`.
    ///
    /// Items without hit points (max of zero) count as fully intact.
    pub fn hit_point_fraction(&self) -> f32 {
        if self.max_hit_points == 0 {
            return 1.0;
        }
        (self.hit_points as f32 / self.max_hit_points as f32).clamp(0.0, 1.0)
    }

    /// Quality of the item, `Normal` when the kind has no quality capability.
    pub fn quality_or_normal(&self) -> Quality {
        self.quality.unwrap_or(Quality::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_steps_saturate() {
        assert_eq!(Quality::Awful.previous(), Quality::Awful);
        assert_eq!(Quality::Awful.next(), Quality::Poor);
        assert_eq!(Quality::Legendary.next(), Quality::Legendary);
        assert_eq!(Quality::Masterwork.next(), Quality::Legendary);
        assert_eq!(Quality::Normal.previous(), Quality::Poor);
    }

    #[test]
    fn quality_multiplier_table() {
        let table: Vec<f32> = Quality::ALL.iter().map(|q| q.multiplier()).collect();
        assert_eq!(table, vec![0.5, 0.8, 1.0, 1.2, 1.5, 1.7, 2.0]);
    }

    #[test]
    fn quality_parses_case_insensitive() {
        assert_eq!("masterwork".parse::<Quality>(), Ok(Quality::Masterwork));
        assert_eq!(Quality::Good.to_string(), "Good");
    }

    #[test]
    fn float_range_endpoints_are_inclusive() {
        let range = FloatRange::new(0.5, 1.0);
        assert!(range.includes_epsilon(0.5));
        assert!(range.includes_epsilon(1.0));
        assert!(range.includes_epsilon(0.5 - FloatRange::EPSILON / 2.0));
        assert!(!range.includes_epsilon(0.4));
    }

    #[test]
    fn unwrap_nested_packaging() {
        let table = ItemInstance::new(ItemKindId(7)).with_hit_points(50, 100);
        let packaged = ItemInstance::packaged(ItemKindId(1), table.clone());
        assert_eq!(packaged.inner_if_minified(), &table);
        assert_eq!(table.inner_if_minified(), &table);
    }

    #[test]
    fn hit_point_fraction_clamps() {
        let over = ItemInstance::new(ItemKindId(1)).with_hit_points(120, 100);
        assert_eq!(over.hit_point_fraction(), 1.0);
        let none = ItemInstance::new(ItemKindId(1));
        assert_eq!(none.hit_point_fraction(), 1.0);
    }
}
