//! Named activation overrides and the process-wide state registry.
use std::collections::{BTreeMap, BTreeSet};

use super::LoadoutError;
use crate::tag::TagId;

/// Identity of a [`LoadoutState`] inside a [`StateRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateId(pub u32);

/// Which state a loadout is currently evaluated under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActiveState {
    /// No state in effect; every element is active.
    #[default]
    Default,
    Named(StateId),
}

impl ActiveState {
    pub fn named(self) -> Option<StateId> {
        match self {
            ActiveState::Default => None,
            ActiveState::Named(id) => Some(id),
        }
    }

    pub fn is_default(self) -> bool {
        matches!(self, ActiveState::Default)
    }
}

impl From<StateId> for ActiveState {
    fn from(id: StateId) -> Self {
        ActiveState::Named(id)
    }
}

impl From<Option<StateId>> for ActiveState {
    fn from(id: Option<StateId>) -> Self {
        id.map_or(ActiveState::Default, ActiveState::Named)
    }
}

/// A user-created, named state such as "Combat" or "Hauling".
///
/// `overrides` records, per tag, whether the tag is active while this state is
/// in effect. Elements may still carry their own entry for the state, which
/// takes precedence. Rename through [`StateRegistry::rename`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadoutState {
    name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    overrides: BTreeMap<TagId, bool>,
}

impl LoadoutState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            overrides: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_override(mut self, tag: TagId, active: bool) -> Self {
        self.overrides.insert(tag, active);
        self
    }

    pub fn set_override(&mut self, tag: TagId, active: bool) {
        self.overrides.insert(tag, active);
    }

    pub fn clear_override(&mut self, tag: TagId) -> Option<bool> {
        self.overrides.remove(&tag)
    }

    pub fn override_for(&self, tag: TagId) -> Option<bool> {
        self.overrides.get(&tag).copied()
    }

    pub fn overrides(&self) -> impl Iterator<Item = (TagId, bool)> + '_ {
        self.overrides.iter().map(|(tag, active)| (*tag, *active))
    }

    pub(crate) fn forget_tag(&mut self, tag: TagId) {
        self.overrides.remove(&tag);
    }
}

/// Global registry of every [`LoadoutState`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateRegistry {
    next_id: u32,
    states: BTreeMap<StateId, LoadoutState>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: LoadoutState) -> Result<StateId, LoadoutError> {
        self.check_name(&state.name, None)?;
        let id = StateId(self.next_id);
        if self.states.contains_key(&id) {
            return Err(LoadoutError::StateIdTaken(id));
        }
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(LoadoutError::StateIdsExhausted)?;
        tracing::debug!("registered state '{}' as {:?}", state.name, id);
        self.states.insert(id, state);
        Ok(id)
    }

    pub fn create(&mut self, name: impl Into<String>) -> Result<StateId, LoadoutError> {
        self.insert(LoadoutState::new(name))
    }

    pub fn rename(&mut self, id: StateId, name: impl Into<String>) -> Result<(), LoadoutError> {
        let name = name.into();
        self.check_name(&name, Some(id))?;
        let state = self
            .states
            .get_mut(&id)
            .ok_or(LoadoutError::StateNotFound(id))?;
        state.name = name;
        Ok(())
    }

    pub fn get(&self, id: StateId) -> Option<&LoadoutState> {
        self.states.get(&id)
    }

    pub fn get_mut(&mut self, id: StateId) -> Option<&mut LoadoutState> {
        self.states.get_mut(&id)
    }

    /// Resolves the state a loadout points at. Unknown ids resolve to `None`.
    pub fn resolve(&self, active: ActiveState) -> Option<&LoadoutState> {
        active.named().and_then(|id| self.states.get(&id))
    }

    pub fn remove(&mut self, id: StateId) -> Option<LoadoutState> {
        self.states.remove(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .find(|(_, state)| state.name == name)
            .map(|(id, _)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &LoadoutState)> {
        self.states.iter().map(|(id, state)| (*id, state))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Choices offered when switching away from `shown`: the default state
    /// followed by every registered state, minus the one already shown.
    pub fn selectable(&self, shown: ActiveState) -> Vec<ActiveState> {
        std::iter::once(ActiveState::Default)
            .chain(self.states.keys().map(|id| ActiveState::Named(*id)))
            .filter(|candidate| *candidate != shown)
            .collect()
    }

    /// Display name for `active`.
    pub fn label(&self, active: ActiveState) -> &str {
        match active {
            ActiveState::Default => DEFAULT_STATE_LABEL,
            ActiveState::Named(_) => self
                .resolve(active)
                .map_or(UNKNOWN_STATE_LABEL, |state| state.name.as_str()),
        }
    }

    /// Every id lies below the next free id and names are non-empty and unique.
    pub fn validate(&self) -> Result<(), LoadoutError> {
        let mut names = BTreeSet::new();
        for (id, state) in &self.states {
            if id.0 >= self.next_id {
                return Err(LoadoutError::UnallocatedStateId(*id));
            }
            if state.name.trim().is_empty() {
                return Err(LoadoutError::EmptyStateName);
            }
            if !names.insert(state.name.as_str()) {
                return Err(LoadoutError::DuplicateStateName(state.name.clone()));
            }
        }
        Ok(())
    }

    fn check_name(&self, name: &str, except: Option<StateId>) -> Result<(), LoadoutError> {
        if name.trim().is_empty() {
            return Err(LoadoutError::EmptyStateName);
        }
        let taken = self
            .states
            .iter()
            .any(|(id, state)| Some(*id) != except && state.name == name);
        if taken {
            return Err(LoadoutError::DuplicateStateName(name.to_string()));
        }
        Ok(())
    }

    pub(crate) fn forget_tag(&mut self, tag: TagId) {
        for state in self.states.values_mut() {
            state.forget_tag(tag);
        }
    }
}

pub(crate) const DEFAULT_STATE_LABEL: &str = "Default";
pub(crate) const UNKNOWN_STATE_LABEL: &str = "Unknown state";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_names_are_unique() {
        let mut states = StateRegistry::new();
        states.create("Combat").unwrap();
        assert!(matches!(
            states.create("Combat"),
            Err(LoadoutError::DuplicateStateName(_))
        ));
        assert!(matches!(states.create(""), Err(LoadoutError::EmptyStateName)));
    }

    #[test]
    fn rename_keeps_names_unique() {
        let mut states = StateRegistry::new();
        let combat = states.create("Combat").unwrap();
        let hauling = states.create("Hauling").unwrap();

        assert_eq!(
            states.rename(hauling, "Combat"),
            Err(LoadoutError::DuplicateStateName("Combat".into()))
        );
        assert_eq!(states.rename(hauling, ""), Err(LoadoutError::EmptyStateName));
        states.rename(combat, "Combat").unwrap();
        states.rename(hauling, "Resting").unwrap();
        assert_eq!(states.find_by_name("Resting"), Some(hauling));
        assert_eq!(
            states.rename(StateId(9), "Sleeping"),
            Err(LoadoutError::StateNotFound(StateId(9)))
        );
    }

    #[test]
    fn insert_never_overwrites_an_existing_id() {
        let mut states = StateRegistry::new();
        let combat = states.create("Combat").unwrap();
        states.next_id = 0;
        assert_eq!(
            states.create("Hauling"),
            Err(LoadoutError::StateIdTaken(combat))
        );
        assert_eq!(states.get(combat).map(LoadoutState::name), Some("Combat"));

        states.next_id = u32::MAX;
        assert_eq!(
            states.create("Hauling"),
            Err(LoadoutError::StateIdsExhausted)
        );
        assert_eq!(states.len(), 1);
    }

    #[test]
    fn validate_rejects_unallocated_ids_and_twins() {
        let mut states = StateRegistry::new();
        states.create("Combat").unwrap();
        let hauling = states.create("Hauling").unwrap();
        assert_eq!(states.validate(), Ok(()));

        let mut stale = states.clone();
        stale.next_id = 0;
        assert!(matches!(
            stale.validate(),
            Err(LoadoutError::UnallocatedStateId(_))
        ));

        states.states.get_mut(&hauling).unwrap().name = "Combat".into();
        assert_eq!(
            states.validate(),
            Err(LoadoutError::DuplicateStateName("Combat".into()))
        );
    }

    #[test]
    fn overrides_can_be_set_and_cleared() {
        let mut state = LoadoutState::new("Combat");
        assert_eq!(state.override_for(TagId(1)), None);

        state.set_override(TagId(1), false);
        state.set_override(TagId(2), true);
        state.set_override(TagId(1), true);
        assert_eq!(state.override_for(TagId(1)), Some(true));
        assert_eq!(
            state.overrides().collect::<Vec<_>>(),
            vec![(TagId(1), true), (TagId(2), true)]
        );

        assert_eq!(state.clear_override(TagId(1)), Some(true));
        assert_eq!(state.clear_override(TagId(1)), None);
        assert_eq!(state.override_for(TagId(1)), None);
        assert_eq!(state.overrides().count(), 1);
    }

    #[test]
    fn selectable_excludes_shown_state() {
        let mut states = StateRegistry::new();
        let combat = states.create("Combat").unwrap();
        let hauling = states.create("Hauling").unwrap();

        assert_eq!(
            states.selectable(ActiveState::Default),
            vec![ActiveState::Named(combat), ActiveState::Named(hauling)]
        );
        assert_eq!(
            states.selectable(ActiveState::Named(combat)),
            vec![ActiveState::Default, ActiveState::Named(hauling)]
        );
    }

    #[test]
    fn labels_resolve_names() {
        let mut states = StateRegistry::new();
        let combat = states.create("Combat").unwrap();
        assert_eq!(states.label(ActiveState::Default), "Default");
        assert_eq!(states.label(combat.into()), "Combat");
        assert_eq!(states.label(StateId(42).into()), "Unknown state");
    }

    #[test]
    fn option_maps_to_active_state() {
        assert_eq!(ActiveState::from(None), ActiveState::Default);
        assert_eq!(
            ActiveState::from(Some(StateId(3))),
            ActiveState::Named(StateId(3))
        );
        assert_eq!(ActiveState::Named(StateId(3)).named(), Some(StateId(3)));
    }
}
