use std::collections::BTreeMap;

use super::{CapacityFormula, FormulaFamily};
use crate::deflist::CapacityBoost;
use crate::env::ItemKindId;
use crate::item::ItemInstance;

/// Base-game capacity: body size times a mass constant, plus apparel boosts.
#[derive(Clone, Debug, PartialEq)]
pub struct VanillaFormula {
    mass_per_body_size: f32,
    boosts: BTreeMap<ItemKindId, CapacityBoost>,
}

impl VanillaFormula {
    pub fn new(mass_per_body_size: f32, boosts: BTreeMap<ItemKindId, CapacityBoost>) -> Self {
        Self {
            mass_per_body_size,
            boosts,
        }
    }
}

impl CapacityFormula for VanillaFormula {
    fn family(&self) -> FormulaFamily {
        FormulaFamily::Vanilla
    }

    fn base_mass_capacity(&self, body_size: f32) -> f32 {
        body_size * self.mass_per_body_size
    }

    fn mass_boost(&self, instance: &ItemInstance) -> f32 {
        let instance = instance.inner_if_minified();
        self.boosts
            .get(&instance.kind)
            .map_or(0.0, |boost| boost.evaluate(instance))
    }

    fn base_bulk_capacity(&self, _body_size: f32) -> Option<f32> {
        None
    }
}
