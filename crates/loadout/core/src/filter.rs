//! Single-kind item constraint.
//!
//! A [`Filter`] decides whether a concrete item satisfies one required item of
//! a tag: same kind, allowed material, hit points within range, quality within
//! range. Filters can also be copied across kinds, carrying over only the
//! constraints both kinds understand.

use std::collections::BTreeSet;

use crate::env::{ItemCatalog, ItemKindId, MaterialId};
use crate::error::{ErrorSeverity, LoadoutFault};
use crate::item::{FloatRange, ItemInstance, QualityRange};

/// Errors raised when building or editing a filter.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FilterError {
    /// A filter referenced an item kind the catalog does not know.
    #[error("filter references unknown item kind {0:?}")]
    UnknownItemKind(ItemKindId),

    #[error("hit point range {min}..={max} is not inside 0..=1")]
    InvalidHpRange { min: f32, max: f32 },

    #[error("quality range is inverted")]
    InvalidQualityRange,
}

impl LoadoutFault for FilterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            FilterError::UnknownItemKind(_) => "FILTER_UNKNOWN_ITEM_KIND",
            FilterError::InvalidHpRange { .. } => "FILTER_INVALID_HP_RANGE",
            FilterError::InvalidQualityRange => "FILTER_INVALID_QUALITY_RANGE",
        }
    }
}

/// Constraint on a single item kind.
///
/// An empty material set means every material is accepted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Filter {
    kind: ItemKindId,
    materials: BTreeSet<MaterialId>,
    hp_range: FloatRange,
    quality_range: QualityRange,
}

impl Filter {
    /// Unrestricted filter for `kind`.
    pub fn new(kind: ItemKindId) -> Self {
        Self {
            kind,
            materials: BTreeSet::new(),
            hp_range: FloatRange::ZERO_TO_ONE,
            quality_range: QualityRange::ALL,
        }
    }

    pub fn kind(&self) -> ItemKindId {
        self.kind
    }

    pub fn allowed_materials(&self) -> &BTreeSet<MaterialId> {
        &self.materials
    }

    pub fn hp_range(&self) -> FloatRange {
        self.hp_range
    }

    pub fn quality_range(&self) -> QualityRange {
        self.quality_range
    }

    /// Restricts the hit-point fraction; both ends must lie in `[0, 1]`.
    pub fn set_hp_range(&mut self, range: FloatRange) -> Result<(), FilterError> {
        if !range.is_unit_subrange() {
            return Err(FilterError::InvalidHpRange {
                min: range.min,
                max: range.max,
            });
        }
        self.hp_range = range;
        Ok(())
    }

    pub fn set_quality_range(&mut self, range: QualityRange) -> Result<(), FilterError> {
        if range.min > range.max {
            return Err(FilterError::InvalidQualityRange);
        }
        self.quality_range = range;
        Ok(())
    }

    /// Re-checks the range invariants the setters enforce.
    pub fn validate(&self) -> Result<(), FilterError> {
        if !self.hp_range.is_unit_subrange() {
            return Err(FilterError::InvalidHpRange {
                min: self.hp_range.min,
                max: self.hp_range.max,
            });
        }
        if self.quality_range.min > self.quality_range.max {
            return Err(FilterError::InvalidQualityRange);
        }
        Ok(())
    }

    /// Adds `material` to the allowed set. Returns false if already present.
    pub fn allow_material(&mut self, material: MaterialId) -> bool {
        self.materials.insert(material)
    }

    /// Removes `material` from the allowed set. Returns false if absent.
    ///
    /// Removing the last material makes the filter unrestricted again.
    pub fn disallow_material(&mut self, material: MaterialId) -> bool {
        self.materials.remove(&material)
    }

    pub fn clear_materials(&mut self) {
        self.materials.clear();
    }

    /// Whether `candidate` satisfies every constraint of this filter.
    ///
    /// Packaged items are judged by what is inside them.
    pub fn allows(&self, candidate: &ItemInstance) -> bool {
        let candidate = candidate.inner_if_minified();

        if candidate.kind != self.kind {
            return false;
        }
        if !self.materials.is_empty() {
            match candidate.material {
                Some(material) if self.materials.contains(&material) => {}
                _ => return false,
            }
        }
        if !self.hp_range.includes_epsilon(candidate.hit_point_fraction()) {
            return false;
        }
        if !self.quality_range.is_all()
            && !self.quality_range.includes(candidate.quality_or_normal())
        {
            return false;
        }

        true
    }

    /// Builds a filter for `target`'s kind seeded from `source`.
    ///
    /// Each constraint is copied only when both kinds support it; otherwise
    /// the fresh default is kept. Materials are intersected with what the
    /// target kind can be made from, falling back to `target`'s own set when
    /// the intersection is empty so the copy never silently becomes
    /// unrestricted.
    pub fn copy_from(
        source: &Filter,
        target: &Filter,
        catalog: &dyn ItemCatalog,
    ) -> Result<Filter, FilterError> {
        let from = catalog
            .definition(source.kind)
            .ok_or(FilterError::UnknownItemKind(source.kind))?;
        let to = catalog
            .definition(target.kind)
            .ok_or(FilterError::UnknownItemKind(target.kind))?;

        tracing::debug!("copying filter from {} to {}", from.label, to.label);

        let mut copy = Filter::new(target.kind);

        if to.made_from_material() && from.made_from_material() {
            let valid: BTreeSet<MaterialId> = to.materials.iter().copied().collect();
            let shared: BTreeSet<MaterialId> =
                source.materials.intersection(&valid).copied().collect();
            copy.materials = if shared.is_empty() {
                target.materials.clone()
            } else {
                shared
            };
        }
        if to.has_quality() && from.has_quality() {
            copy.quality_range = source.quality_range;
        }
        if to.uses_hit_points() && from.uses_hit_points() {
            copy.hp_range = source.hp_range;
        }

        Ok(copy)
    }

    /// Builds a filter for `target_kind` seeded from `source`.
    ///
    /// The target's previous material set is taken to be every material the
    /// kind can be made from.
    pub fn copy_compatible(
        source: &Filter,
        target_kind: ItemKindId,
        catalog: &dyn ItemCatalog,
    ) -> Result<Filter, FilterError> {
        let mut prior = Filter::new(target_kind);
        prior.materials = catalog.valid_materials(target_kind).into_iter().collect();
        Self::copy_from(source, &prior, catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{CatalogSnapshot, ItemDefinition, MaterialDefinition};
    use crate::item::Quality;

    const KNIFE: ItemKindId = ItemKindId(1);
    const SPEAR: ItemKindId = ItemKindId(2);
    const PILL: ItemKindId = ItemKindId(3);
    const STEEL: MaterialId = MaterialId(1);
    const WOOD: MaterialId = MaterialId(2);
    const JADE: MaterialId = MaterialId(3);

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::from_parts(
            [
                MaterialDefinition::new(STEEL, "Steel", 1.0),
                MaterialDefinition::new(WOOD, "Wood", 0.5),
                MaterialDefinition::new(JADE, "Jade", 1.5),
            ],
            [
                ItemDefinition::new(KNIFE, "Knife", 0.5)
                    .with_materials([STEEL, JADE])
                    .with_quality()
                    .with_hit_points(80),
                ItemDefinition::new(SPEAR, "Spear", 2.0)
                    .with_materials([STEEL, WOOD])
                    .with_quality()
                    .with_hit_points(120),
                ItemDefinition::new(PILL, "Pill", 0.01),
            ],
        )
    }

    fn knife(material: MaterialId, hp: u32, quality: Quality) -> ItemInstance {
        ItemInstance::new(KNIFE)
            .with_material(material)
            .with_hit_points(hp, 80)
            .with_quality(quality)
    }

    #[test]
    fn validate_catches_ranges_set_without_the_setters() {
        let mut filter = Filter::new(KNIFE);
        assert_eq!(filter.validate(), Ok(()));

        filter.hp_range = FloatRange::new(0.9, 0.1);
        assert!(matches!(
            filter.validate(),
            Err(FilterError::InvalidHpRange { .. })
        ));

        filter.hp_range = FloatRange::ZERO_TO_ONE;
        filter.quality_range = QualityRange::new(Quality::Legendary, Quality::Awful);
        assert_eq!(filter.validate(), Err(FilterError::InvalidQualityRange));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let filter = Filter::new(SPEAR);
        assert!(!filter.allows(&knife(STEEL, 80, Quality::Normal)));
    }

    #[test]
    fn material_must_be_listed_when_restricted() {
        let mut filter = Filter::new(KNIFE);
        assert!(filter.allows(&knife(JADE, 80, Quality::Normal)));
        filter.allow_material(STEEL);
        assert!(filter.allows(&knife(STEEL, 80, Quality::Normal)));
        assert!(!filter.allows(&knife(JADE, 80, Quality::Normal)));
        filter.disallow_material(STEEL);
        assert!(filter.allows(&knife(JADE, 80, Quality::Normal)));
    }

    #[test]
    fn hp_range_endpoints_pass() {
        let mut filter = Filter::new(KNIFE);
        filter.set_hp_range(FloatRange::new(0.5, 1.0)).unwrap();
        assert!(filter.allows(&knife(STEEL, 40, Quality::Normal)));
        assert!(filter.allows(&knife(STEEL, 80, Quality::Normal)));
        assert!(!filter.allows(&knife(STEEL, 39, Quality::Normal)));
    }

    #[test]
    fn quality_outside_range_is_rejected() {
        let mut filter = Filter::new(KNIFE);
        filter
            .set_quality_range(QualityRange::new(Quality::Good, Quality::Legendary))
            .unwrap();
        assert!(filter.allows(&knife(STEEL, 80, Quality::Excellent)));
        assert!(!filter.allows(&knife(STEEL, 80, Quality::Poor)));
    }

    #[test]
    fn missing_quality_counts_as_normal() {
        let mut filter = Filter::new(PILL);
        filter
            .set_quality_range(QualityRange::new(Quality::Awful, Quality::Normal))
            .unwrap();
        assert!(filter.allows(&ItemInstance::new(PILL)));
        filter
            .set_quality_range(QualityRange::new(Quality::Good, Quality::Legendary))
            .unwrap();
        assert!(!filter.allows(&ItemInstance::new(PILL)));
    }

    #[test]
    fn packaged_item_is_judged_by_contents() {
        let filter = Filter::new(KNIFE);
        let packaged = ItemInstance::packaged(ItemKindId(99), knife(STEEL, 80, Quality::Normal));
        assert!(filter.allows(&packaged));
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        let mut filter = Filter::new(KNIFE);
        assert!(matches!(
            filter.set_hp_range(FloatRange::new(0.8, 0.2)),
            Err(FilterError::InvalidHpRange { .. })
        ));
        assert!(filter.set_hp_range(FloatRange::new(-0.1, 1.0)).is_err());
        assert_eq!(
            filter.set_quality_range(QualityRange::new(Quality::Legendary, Quality::Awful)),
            Err(FilterError::InvalidQualityRange)
        );
        assert_eq!(filter.hp_range(), FloatRange::ZERO_TO_ONE);
    }

    #[test]
    fn copy_intersects_materials_and_keeps_ranges() {
        let catalog = catalog();
        let mut source = Filter::new(KNIFE);
        source.allow_material(STEEL);
        source.allow_material(JADE);
        source.set_hp_range(FloatRange::new(0.3, 0.9)).unwrap();
        source
            .set_quality_range(QualityRange::new(Quality::Good, Quality::Masterwork))
            .unwrap();

        let copy = Filter::copy_compatible(&source, SPEAR, &catalog).unwrap();
        assert_eq!(copy.kind(), SPEAR);
        assert_eq!(copy.allowed_materials(), &BTreeSet::from([STEEL]));
        assert_eq!(copy.hp_range(), FloatRange::new(0.3, 0.9));
        assert_eq!(copy.quality_range(), source.quality_range());
    }

    #[test]
    fn empty_intersection_falls_back_to_target_set() {
        let catalog = catalog();
        let mut source = Filter::new(KNIFE);
        source.allow_material(JADE);

        let copy = Filter::copy_compatible(&source, SPEAR, &catalog).unwrap();
        assert_eq!(copy.allowed_materials(), &BTreeSet::from([STEEL, WOOD]));

        let mut target = Filter::new(SPEAR);
        target.allow_material(WOOD);
        let copy = Filter::copy_from(&source, &target, &catalog).unwrap();
        assert_eq!(copy.allowed_materials(), &BTreeSet::from([WOOD]));
    }

    #[test]
    fn capabilities_missing_on_either_side_keep_defaults() {
        let catalog = catalog();
        let mut source = Filter::new(KNIFE);
        source.allow_material(STEEL);
        source.set_hp_range(FloatRange::new(0.5, 1.0)).unwrap();
        source
            .set_quality_range(QualityRange::new(Quality::Good, Quality::Good))
            .unwrap();

        let copy = Filter::copy_compatible(&source, PILL, &catalog).unwrap();
        assert!(copy.allowed_materials().is_empty());
        assert_eq!(copy.hp_range(), FloatRange::ZERO_TO_ONE);
        assert_eq!(copy.quality_range(), QualityRange::ALL);

        let back = Filter::copy_compatible(&copy, KNIFE, &catalog).unwrap();
        assert!(back.allowed_materials().is_empty());
        assert_eq!(back.quality_range(), QualityRange::ALL);
    }

    #[test]
    fn copy_rejects_unknown_kinds() {
        let catalog = catalog();
        let source = Filter::new(ItemKindId(404));
        assert_eq!(
            Filter::copy_compatible(&source, KNIFE, &catalog),
            Err(FilterError::UnknownItemKind(ItemKindId(404)))
        );
        let source = Filter::new(KNIFE);
        assert_eq!(
            Filter::copy_compatible(&source, ItemKindId(405), &catalog),
            Err(FilterError::UnknownItemKind(ItemKindId(405)))
        );
    }
}
