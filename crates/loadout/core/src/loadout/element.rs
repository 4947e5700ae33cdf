use std::collections::BTreeMap;

use super::state::{ActiveState, StateId, StateRegistry};
use crate::tag::TagId;

/// One tag bound into a loadout, with per-state activation entries.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadoutElement {
    tag: TagId,
    #[cfg_attr(feature = "serde", serde(default))]
    activation: BTreeMap<StateId, bool>,
}

impl LoadoutElement {
    pub fn new(tag: TagId) -> Self {
        Self {
            tag,
            activation: BTreeMap::new(),
        }
    }

    pub fn tag(&self) -> TagId {
        self.tag
    }

    pub fn set_active(&mut self, state: StateId, active: bool) {
        self.activation.insert(state, active);
    }

    pub fn clear_activation(&mut self, state: StateId) -> Option<bool> {
        self.activation.remove(&state)
    }

    pub fn activation_for(&self, state: StateId) -> Option<bool> {
        self.activation.get(&state).copied()
    }

    /// Whether this element contributes items under `current`.
    ///
    /// Precedence: this element's own entry for the state, then the state's
    /// override for the tag, then active. The default state activates
    /// everything.
    pub fn is_active(&self, current: ActiveState, states: &StateRegistry) -> bool {
        let Some(id) = current.named() else {
            return true;
        };
        if let Some(active) = self.activation_for(id) {
            return active;
        }
        states
            .get(id)
            .and_then(|state| state.override_for(self.tag))
            .unwrap_or(true)
    }

    /// Short label describing how `current` treats this element.
    pub fn state_label(&self, current: ActiveState, states: &StateRegistry) -> String {
        if current.is_default() {
            return states.label(current).to_string();
        }
        let verb = if self.is_active(current, states) {
            "Active"
        } else {
            "Inactive"
        };
        format!("{verb} while {}", states.label(current))
    }

    pub(crate) fn forget_state(&mut self, state: StateId) {
        self.activation.remove(&state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loadout::LoadoutState;

    fn registry() -> (StateRegistry, StateId, StateId) {
        let mut states = StateRegistry::new();
        let combat = states
            .insert(LoadoutState::new("Combat").with_override(TagId(1), false))
            .unwrap();
        let hauling = states.create("Hauling").unwrap();
        (states, combat, hauling)
    }

    #[test]
    fn default_state_activates_everything() {
        let (states, combat, _) = registry();
        let mut element = LoadoutElement::new(TagId(1));
        element.set_active(combat, false);
        assert!(element.is_active(ActiveState::Default, &states));
    }

    #[test]
    fn element_entry_beats_state_override() {
        let (states, combat, _) = registry();
        let mut element = LoadoutElement::new(TagId(1));
        assert!(!element.is_active(combat.into(), &states));

        element.set_active(combat, true);
        assert!(element.is_active(combat.into(), &states));

        element.clear_activation(combat);
        assert!(!element.is_active(combat.into(), &states));
    }

    #[test]
    fn unmatched_and_unknown_states_fall_back_to_active() {
        let (states, _, hauling) = registry();
        let element = LoadoutElement::new(TagId(1));
        assert!(element.is_active(hauling.into(), &states));
        assert!(element.is_active(StateId(99).into(), &states));
    }

    #[test]
    fn state_label_reflects_activation() {
        let (states, combat, hauling) = registry();
        let element = LoadoutElement::new(TagId(1));
        assert_eq!(element.state_label(ActiveState::Default, &states), "Default");
        assert_eq!(
            element.state_label(combat.into(), &states),
            "Inactive while Combat"
        );
        assert_eq!(
            element.state_label(hauling.into(), &states),
            "Active while Hauling"
        );
    }
}
