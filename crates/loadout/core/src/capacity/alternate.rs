use super::{CapacityFormula, FormulaFamily};
use crate::item::ItemInstance;

/// Capacity under the alternate inventory system.
///
/// Mass and bulk are separate budgets, both scaled by body size. Apparel
/// boosts are never applied under this family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlternateFormula {
    mass_per_body_size: f32,
    bulk_per_body_size: f32,
}

impl AlternateFormula {
    pub const fn new(mass_per_body_size: f32, bulk_per_body_size: f32) -> Self {
        Self {
            mass_per_body_size,
            bulk_per_body_size,
        }
    }
}

impl CapacityFormula for AlternateFormula {
    fn family(&self) -> FormulaFamily {
        FormulaFamily::Alternate
    }

    fn base_mass_capacity(&self, body_size: f32) -> f32 {
        body_size * self.mass_per_body_size
    }

    fn mass_boost(&self, _instance: &ItemInstance) -> f32 {
        0.0
    }

    fn base_bulk_capacity(&self, body_size: f32) -> Option<f32> {
        Some(body_size * self.bulk_per_body_size)
    }
}
