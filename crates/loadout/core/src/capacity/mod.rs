//! Carrying capacity and encumbrance.
//!
//! A [`CapacityCalculator`] evaluates mass (and, for the alternate family,
//! bulk) against capacity for a hypothetical [`LoadoutItem`] list or for what
//! an agent actually carries. The formula family is fixed when the calculator
//! is built and never branched on per call; the two budgets are reported side
//! by side and never combined.
//!
//! A capacity of zero yields ratios of `0.0` rather than a division fault.
mod alternate;
mod vanilla;

pub use alternate::AlternateFormula;
pub use vanilla::VanillaFormula;

use crate::agent::Agent;
use crate::config::LoadoutConfig;
use crate::deflist::DefLists;
use crate::env::{ItemCatalog, ItemStat, OracleError};
use crate::item::ItemInstance;
use crate::loadout::LoadoutItem;

/// Closed set of capacity formula families.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FormulaFamily {
    #[default]
    Vanilla,
    /// Heavier mass allowance plus a separate bulk budget.
    Alternate,
}

impl FormulaFamily {
    /// Instantiates the formula for this family.
    pub fn formula(self, config: &LoadoutConfig, lists: &DefLists) -> Box<dyn CapacityFormula> {
        match self {
            FormulaFamily::Vanilla => Box::new(VanillaFormula::new(
                config.mass_per_body_size,
                lists.mass_boosts.clone(),
            )),
            FormulaFamily::Alternate => Box::new(AlternateFormula::new(
                config.alternate_mass_per_body_size,
                config.bulk_per_body_size,
            )),
        }
    }
}

/// Capacity rules of one formula family.
pub trait CapacityFormula: Send + Sync + core::fmt::Debug {
    fn family(&self) -> FormulaFamily;

    /// Mass capacity from body size alone.
    fn base_mass_capacity(&self, body_size: f32) -> f32;

    /// Extra mass capacity granted by wearing `instance`; zero for most kinds.
    fn mass_boost(&self, instance: &ItemInstance) -> f32;

    /// Bulk capacity from body size, or `None` when the family has no bulk budget.
    fn base_bulk_capacity(&self, body_size: f32) -> Option<f32>;
}

/// Load against capacity for one budget.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BudgetReport {
    pub load: f32,
    pub capacity: f32,
}

impl BudgetReport {
    pub const fn new(load: f32, capacity: f32) -> Self {
        Self { load, capacity }
    }

    /// `load / capacity`, or `0.0` when capacity is not positive or the
    /// quotient is not a number.
    pub fn unbounded_ratio(&self) -> f32 {
        let ratio = self.load / self.capacity;
        if self.capacity > 0.0 && !ratio.is_nan() {
            ratio
        } else {
            0.0
        }
    }

    /// [`Self::unbounded_ratio`] clamped to `[0, 1]`.
    pub fn ratio(&self) -> f32 {
        self.unbounded_ratio().clamp(0.0, 1.0)
    }

    pub fn is_over_capacity(&self) -> bool {
        self.unbounded_ratio() > 1.0
    }
}

/// Everything a UI needs to draw encumbrance bars.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncumbranceReport {
    pub family: FormulaFamily,
    pub mass: BudgetReport,
    /// Present only for families with a bulk budget.
    pub bulk: Option<BudgetReport>,
}

impl EncumbranceReport {
    pub fn is_over_capacity(&self) -> bool {
        self.mass.is_over_capacity() || self.bulk.is_some_and(|bulk| bulk.is_over_capacity())
    }
}

/// Mass/bulk evaluation against a single catalog and formula family.
pub struct CapacityCalculator<'a> {
    catalog: &'a dyn ItemCatalog,
    formula: Box<dyn CapacityFormula>,
}

impl core::fmt::Debug for CapacityCalculator<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CapacityCalculator")
            .field("formula", &self.formula)
            .finish_non_exhaustive()
    }
}

impl<'a> CapacityCalculator<'a> {
    pub fn new(catalog: &'a dyn ItemCatalog, formula: Box<dyn CapacityFormula>) -> Self {
        Self { catalog, formula }
    }

    /// Uses the family and boost tables recorded in `lists`.
    pub fn from_lists(
        catalog: &'a dyn ItemCatalog,
        lists: &DefLists,
        config: &LoadoutConfig,
    ) -> Self {
        Self::new(catalog, lists.family.formula(config, lists))
    }

    pub fn family(&self) -> FormulaFamily {
        self.formula.family()
    }

    fn disposable(&self, item: &LoadoutItem) -> Result<ItemInstance, OracleError> {
        self.catalog
            .make_disposable(item.kind, item.material, item.quality)
    }

    fn hypothetical_stat(&self, items: &[LoadoutItem], stat: ItemStat) -> Result<f32, OracleError> {
        let mut total = 0.0;
        for item in items {
            let instance = self.disposable(item)?;
            total += self.catalog.stat_value(&instance, stat)? * item.quantity as f32;
        }
        Ok(total)
    }

    /// Total mass of `items`, each evaluated with its chosen material and quality.
    pub fn hypothetical_mass(&self, items: &[LoadoutItem]) -> Result<f32, OracleError> {
        self.hypothetical_stat(items, ItemStat::Mass)
    }

    /// Mass capacity of `agent` if it wore the boosting apparel in `items`.
    ///
    /// Zero for agents that cannot carry anything.
    pub fn hypothetical_capacity(
        &self,
        agent: &dyn Agent,
        items: &[LoadoutItem],
    ) -> Result<f32, OracleError> {
        if !agent.can_carry_anything() {
            return Ok(0.0);
        }
        let mut capacity = self.formula.base_mass_capacity(agent.body_size());
        for item in items {
            capacity += self.formula.mass_boost(&self.disposable(item)?);
        }
        Ok(capacity)
    }

    /// Mass over capacity, clamped to `[0, 1]`.
    pub fn encumbrance_ratio(
        &self,
        agent: &dyn Agent,
        items: &[LoadoutItem],
    ) -> Result<f32, OracleError> {
        Ok(self.mass_budget(agent, items)?.ratio())
    }

    /// Mass over capacity without clamping; above one means overloaded.
    pub fn unbounded_encumbrance_ratio(
        &self,
        agent: &dyn Agent,
        items: &[LoadoutItem],
    ) -> Result<f32, OracleError> {
        Ok(self.mass_budget(agent, items)?.unbounded_ratio())
    }

    /// Total worn bulk of `items`.
    pub fn hypothetical_bulk(&self, items: &[LoadoutItem]) -> Result<f32, OracleError> {
        self.hypothetical_stat(items, ItemStat::WornBulk)
    }

    /// Bulk capacity, or `None` when the family has no bulk budget.
    pub fn hypothetical_bulk_capacity(&self, agent: &dyn Agent) -> Option<f32> {
        let capacity = self.formula.base_bulk_capacity(agent.body_size())?;
        Some(if agent.can_carry_anything() { capacity } else { 0.0 })
    }

    pub fn mass_budget(
        &self,
        agent: &dyn Agent,
        items: &[LoadoutItem],
    ) -> Result<BudgetReport, OracleError> {
        Ok(BudgetReport::new(
            self.hypothetical_mass(items)?,
            self.hypothetical_capacity(agent, items)?,
        ))
    }

    pub fn bulk_budget(
        &self,
        agent: &dyn Agent,
        items: &[LoadoutItem],
    ) -> Result<Option<BudgetReport>, OracleError> {
        let Some(capacity) = self.hypothetical_bulk_capacity(agent) else {
            return Ok(None);
        };
        Ok(Some(BudgetReport::new(self.hypothetical_bulk(items)?, capacity)))
    }

    /// Both budgets for a hypothetical item list.
    pub fn report(
        &self,
        agent: &dyn Agent,
        items: &[LoadoutItem],
    ) -> Result<EncumbranceReport, OracleError> {
        Ok(EncumbranceReport {
            family: self.family(),
            mass: self.mass_budget(agent, items)?,
            bulk: self.bulk_budget(agent, items)?,
        })
    }

    /// Mass of everything `agent` currently wears and carries.
    pub fn actual_mass(&self, agent: &dyn Agent) -> Result<f32, OracleError> {
        let mut mass = 0.0;
        for item in agent.carried_items() {
            mass += self.catalog.stat_value(item, ItemStat::Mass)? * item.stack_count as f32;
        }
        Ok(mass)
    }

    /// Mass capacity from body size plus boosts of the apparel actually worn.
    pub fn actual_capacity(&self, agent: &dyn Agent) -> f32 {
        if !agent.can_carry_anything() {
            return 0.0;
        }
        let base = self.formula.base_mass_capacity(agent.body_size());
        base + agent
            .worn_items()
            .iter()
            .map(|item| self.formula.mass_boost(item))
            .sum::<f32>()
    }

    /// Both budgets for what `agent` actually carries.
    pub fn actual_report(&self, agent: &dyn Agent) -> Result<EncumbranceReport, OracleError> {
        let mass = BudgetReport::new(self.actual_mass(agent)?, self.actual_capacity(agent));
        let bulk = match self.hypothetical_bulk_capacity(agent) {
            Some(capacity) => {
                let mut load = 0.0;
                for item in agent.carried_items() {
                    load += self.catalog.stat_value(item, ItemStat::WornBulk)?
                        * item.stack_count as f32;
                }
                Some(BudgetReport::new(load, capacity))
            }
            None => None,
        };
        Ok(EncumbranceReport {
            family: self.family(),
            mass,
            bulk,
        })
    }
}
