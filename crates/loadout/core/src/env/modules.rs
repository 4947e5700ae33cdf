use std::collections::BTreeSet;

/// Answers whether an optional compatibility module is loaded.
///
/// Consulted once, while the def-list cache is built.
pub trait ModuleOracle: Send + Sync {
    fn is_active(&self, name: &str) -> bool;
}

/// [`ModuleOracle`] backed by a fixed set of module names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleSet {
    active: BTreeSet<String>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>) -> Self {
        self.active.insert(name.into());
        self
    }
}

impl FromIterator<String> for ModuleSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            active: iter.into_iter().collect(),
        }
    }
}

impl ModuleOracle for ModuleSet {
    fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }
}
