/// Loadout engine configuration constants and tunable parameters.
///
/// Every field has a default matching the base game; content packs override
/// them through `config.toml` (see `loadout-content`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoadoutConfig {
    /// Mass capacity granted per unit of body size (vanilla family).
    pub mass_per_body_size: f32,
    /// Mass capacity granted per unit of body size (alternate family).
    pub alternate_mass_per_body_size: f32,
    /// Bulk capacity granted per unit of body size (alternate family only).
    pub bulk_per_body_size: f32,
    /// Module whose presence switches every evaluation to the alternate family.
    pub alternate_capacity_module: String,
    /// Module providing apparel that raises carrying capacity.
    pub capacity_apparel_module: String,
}

impl LoadoutConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MASS_PER_BODY_SIZE: f32 = 35.0;
    pub const DEFAULT_ALTERNATE_MASS_PER_BODY_SIZE: f32 = 40.0;
    pub const DEFAULT_BULK_PER_BODY_SIZE: f32 = 20.0;
    pub const DEFAULT_ALTERNATE_CAPACITY_MODULE: &'static str = "Combat Extended";
    pub const DEFAULT_CAPACITY_APPAREL_MODULE: &'static str =
        "Vanilla Apparel Expanded — Accessories";

    pub fn new() -> Self {
        Self {
            mass_per_body_size: Self::DEFAULT_MASS_PER_BODY_SIZE,
            alternate_mass_per_body_size: Self::DEFAULT_ALTERNATE_MASS_PER_BODY_SIZE,
            bulk_per_body_size: Self::DEFAULT_BULK_PER_BODY_SIZE,
            alternate_capacity_module: Self::DEFAULT_ALTERNATE_CAPACITY_MODULE.to_string(),
            capacity_apparel_module: Self::DEFAULT_CAPACITY_APPAREL_MODULE.to_string(),
        }
    }
}

impl Default for LoadoutConfig {
    fn default() -> Self {
        Self::new()
    }
}
