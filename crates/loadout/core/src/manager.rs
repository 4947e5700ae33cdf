//! Player-wide loadout bookkeeping.
//!
//! [`LoadoutManager`] owns the global tag and state registries together with
//! one [`Loadout`] per agent. Operations that cut across loadouts, like
//! deleting a tag or a state, live here so no loadout is left holding a
//! dangling reference.
use std::collections::BTreeMap;

use rand::Rng;

use crate::agent::{Agent, AgentId};
use crate::env::ItemCatalog;
use crate::error::{ErrorSeverity, LoadoutFault};
use crate::loadout::{
    ActiveState, Loadout, LoadoutError, LoadoutItem, LoadoutState, StateId, StateRegistry,
};
use crate::tag::{Tag, TagError, TagId, TagRegistry};

/// Errors raised by manager-level operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ManagerError {
    #[error("{0} cannot hold a loadout")]
    InvalidHolder(AgentId),

    #[error("{0} has no loadout")]
    NoLoadout(AgentId),

    #[error("tag {0:?} is not registered")]
    UnknownTag(TagId),

    #[error("state {0:?} is not registered")]
    UnknownState(StateId),

    #[error("loadout stored under {key} belongs to {owner}")]
    OwnerMismatch { key: AgentId, owner: AgentId },

    #[error(transparent)]
    Loadout(#[from] LoadoutError),

    #[error(transparent)]
    Tag(#[from] TagError),
}

impl LoadoutFault for ManagerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ManagerError::Loadout(e) => e.severity(),
            ManagerError::Tag(e) => e.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ManagerError::InvalidHolder(_) => "MANAGER_INVALID_HOLDER",
            ManagerError::NoLoadout(_) => "MANAGER_NO_LOADOUT",
            ManagerError::UnknownTag(_) => "MANAGER_UNKNOWN_TAG",
            ManagerError::UnknownState(_) => "MANAGER_UNKNOWN_STATE",
            ManagerError::OwnerMismatch { .. } => "MANAGER_OWNER_MISMATCH",
            ManagerError::Loadout(e) => e.error_code(),
            ManagerError::Tag(e) => e.error_code(),
        }
    }
}

/// Tags, states and every agent's loadout.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadoutManager {
    pub tags: TagRegistry,
    pub states: StateRegistry,
    #[cfg_attr(feature = "serde", serde(default))]
    loadouts: BTreeMap<AgentId, Loadout>,
}

impl LoadoutManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loadout(&self, agent: AgentId) -> Option<&Loadout> {
        self.loadouts.get(&agent)
    }

    pub fn loadout_mut(&mut self, agent: AgentId) -> Option<&mut Loadout> {
        self.loadouts.get_mut(&agent)
    }

    pub fn loadouts(&self) -> impl Iterator<Item = (AgentId, &Loadout)> {
        self.loadouts.iter().map(|(id, loadout)| (*id, loadout))
    }

    /// Returns the agent's loadout, creating an empty one on first use.
    ///
    /// # Errors
    ///
    /// Returns `ManagerError::InvalidHolder` for agents that may not hold a
    /// loadout (animals, guests, the dead, agents with locked apparel).
    pub fn ensure_loadout(&mut self, agent: &dyn Agent) -> Result<&mut Loadout, ManagerError> {
        if !agent.is_valid_loadout_holder() {
            return Err(ManagerError::InvalidHolder(agent.id()));
        }
        let id = agent.id();
        Ok(self.loadouts.entry(id).or_insert_with(|| {
            tracing::debug!("created loadout for {}", id);
            Loadout::new(id)
        }))
    }

    /// Adds a registered tag to an agent's loadout.
    pub fn add_tag(&mut self, agent: AgentId, tag: TagId) -> Result<usize, ManagerError> {
        if !self.tags.contains(tag) {
            return Err(ManagerError::UnknownTag(tag));
        }
        let loadout = self
            .loadouts
            .get_mut(&agent)
            .ok_or(ManagerError::NoLoadout(agent))?;
        Ok(loadout.add_tag(tag)?)
    }

    /// Points an agent's loadout at `state`.
    pub fn set_state(
        &mut self,
        agent: AgentId,
        state: impl Into<ActiveState>,
    ) -> Result<(), ManagerError> {
        let loadout = self
            .loadouts
            .get_mut(&agent)
            .ok_or(ManagerError::NoLoadout(agent))?;
        loadout.set_state(state);
        Ok(())
    }

    /// Effective items of an agent under its current state.
    pub fn current_items(&self, agent: AgentId) -> Result<Vec<LoadoutItem>, ManagerError> {
        let loadout = self
            .loadouts
            .get(&agent)
            .ok_or(ManagerError::NoLoadout(agent))?;
        Ok(loadout.current_items(&self.tags, &self.states))
    }

    /// Agents whose loadout references `tag`.
    pub fn loadouts_using(&self, tag: TagId) -> Vec<AgentId> {
        self.loadouts
            .iter()
            .filter(|(_, loadout)| loadout.contains(tag))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Detaches `tag` from every loadout and state, then unregisters it.
    pub fn delete_tag(&mut self, tag: TagId) -> Result<Tag, ManagerError> {
        if !self.tags.contains(tag) {
            return Err(ManagerError::UnknownTag(tag));
        }
        let mut detached = 0usize;
        for loadout in self.loadouts.values_mut() {
            if loadout.remove_tag(tag).is_ok() {
                detached += 1;
            }
        }
        self.states.forget_tag(tag);
        let removed = self.tags.remove(tag).ok_or(ManagerError::UnknownTag(tag))?;
        tracing::debug!("deleted tag '{}' from {} loadouts", removed.name(), detached);
        Ok(removed)
    }

    /// Unregisters `state`; loadouts pointing at it fall back to the default.
    pub fn delete_state(&mut self, state: StateId) -> Result<LoadoutState, ManagerError> {
        let removed = self
            .states
            .remove(state)
            .ok_or(ManagerError::UnknownState(state))?;
        for loadout in self.loadouts.values_mut() {
            loadout.forget_state(state);
        }
        tracing::debug!("deleted state '{}'", removed.name());
        Ok(removed)
    }

    /// Re-rolls the representative material of every randomized requirement.
    pub fn reroll_materials<R: Rng + ?Sized>(&mut self, catalog: &dyn ItemCatalog, rng: &mut R) {
        let ids: Vec<TagId> = self.tags.ids().collect();
        for id in ids {
            if let Some(tag) = self.tags.get_mut(id) {
                for item in &mut tag.required_items {
                    item.reroll_material(catalog, rng);
                }
            }
        }
    }

    /// Checks the invariants the editing API maintains, for managers built
    /// outside it (decoded profiles).
    ///
    /// Registries must validate, every loadout must be keyed by its owner,
    /// hold each tag once and reference registered tags only.
    pub fn validate(&self) -> Result<(), ManagerError> {
        self.tags.validate()?;
        self.states.validate()?;
        for (key, loadout) in &self.loadouts {
            if loadout.owner() != *key {
                return Err(ManagerError::OwnerMismatch {
                    key: *key,
                    owner: loadout.owner(),
                });
            }
            loadout.validate()?;
            if let Some(element) = loadout
                .all_elements()
                .iter()
                .find(|element| !self.tags.contains(element.tag()))
            {
                return Err(ManagerError::UnknownTag(element.tag()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentProfile, AgentTraits};
    use crate::env::{
        CatalogSnapshot, ItemDefinition, ItemKindId, MaterialDefinition, MaterialId,
    };
    use crate::filter::Filter;
    use crate::tag::RequiredItem;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup() -> (LoadoutManager, AgentProfile, TagId) {
        let mut manager = LoadoutManager::new();
        let tag = manager
            .tags
            .insert(Tag::new("Basics").with_item(RequiredItem::new(ItemKindId(1))))
            .unwrap();
        let ada = AgentProfile::colonist(AgentId(1), "Ada", 1.0);
        manager.ensure_loadout(&ada).unwrap();
        manager.add_tag(ada.id, tag).unwrap();
        (manager, ada, tag)
    }

    #[test]
    fn invalid_holders_get_no_loadout() {
        let mut manager = LoadoutManager::new();
        let dog = AgentProfile::colonist(AgentId(9), "Dog", 0.5).with_traits(AgentTraits::ANIMAL);
        assert_eq!(
            manager.ensure_loadout(&dog).map(|_| ()),
            Err(ManagerError::InvalidHolder(AgentId(9)))
        );
        assert!(manager.loadout(AgentId(9)).is_none());
    }

    #[test]
    fn add_tag_checks_registry_and_loadout() {
        let (mut manager, ada, tag) = setup();
        assert_eq!(
            manager.add_tag(ada.id, TagId(77)),
            Err(ManagerError::UnknownTag(TagId(77)))
        );
        assert_eq!(
            manager.add_tag(AgentId(5), tag),
            Err(ManagerError::NoLoadout(AgentId(5)))
        );
        let duplicate = manager.add_tag(ada.id, tag).unwrap_err();
        assert_eq!(duplicate.error_code(), "LOADOUT_TAG_ALREADY_PRESENT");
    }

    #[test]
    fn delete_tag_detaches_everywhere() {
        let (mut manager, ada, tag) = setup();
        let bob = AgentProfile::colonist(AgentId(2), "Bob", 1.0);
        manager.ensure_loadout(&bob).unwrap();
        manager.add_tag(bob.id, tag).unwrap();
        let combat = manager
            .states
            .insert(LoadoutState::new("Combat").with_override(tag, false))
            .unwrap();

        assert_eq!(manager.loadouts_using(tag), vec![ada.id, bob.id]);
        let removed = manager.delete_tag(tag).unwrap();
        assert_eq!(removed.name(), "Basics");
        assert!(manager.loadouts_using(tag).is_empty());
        assert!(!manager.tags.contains(tag));
        assert_eq!(
            manager.states.get(combat).and_then(|s| s.override_for(tag)),
            None
        );
        assert_eq!(manager.delete_tag(tag), Err(ManagerError::UnknownTag(tag)));
    }

    #[test]
    fn delete_state_resets_current_pointer() {
        let (mut manager, ada, _) = setup();
        let combat = manager.states.create("Combat").unwrap();
        manager.set_state(ada.id, combat).unwrap();

        manager.delete_state(combat).unwrap();
        assert_eq!(
            manager.loadout(ada.id).map(Loadout::current_state),
            Some(ActiveState::Default)
        );
        assert_eq!(manager.current_items(ada.id).map(|items| items.len()), Ok(1));
    }

    #[test]
    fn reroll_materials_covers_every_tag() {
        const STEEL: MaterialId = MaterialId(1);
        const WOOD: MaterialId = MaterialId(2);
        let catalog = CatalogSnapshot::from_parts(
            [
                MaterialDefinition::new(STEEL, "Steel", 1.0),
                MaterialDefinition::new(WOOD, "Wood", 0.5),
            ],
            [ItemDefinition::new(ItemKindId(1), "Club", 2.0).with_materials([STEEL, WOOD])],
        );
        let only = |material| {
            let mut filter = Filter::new(ItemKindId(1));
            filter.allow_material(material);
            RequiredItem::with_filter(filter, 1).randomized()
        };

        let mut manager = LoadoutManager::new();
        let steel = manager
            .tags
            .insert(Tag::new("Steel clubs").with_item(only(STEEL)))
            .unwrap();
        let wood = manager
            .tags
            .insert(
                Tag::new("Wood clubs")
                    .with_item(only(WOOD))
                    .with_item(RequiredItem::new(ItemKindId(1)).with_material(STEEL)),
            )
            .unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        manager.reroll_materials(&catalog, &mut rng);

        let materials = |id| -> Vec<Option<MaterialId>> {
            manager
                .tags
                .get(id)
                .unwrap()
                .required_items
                .iter()
                .map(RequiredItem::material)
                .collect()
        };
        assert_eq!(materials(steel), vec![Some(STEEL)]);
        assert_eq!(materials(wood), vec![Some(WOOD), Some(STEEL)]);
    }

    #[test]
    fn validate_accepts_edited_managers() {
        let (mut manager, ada, tag) = setup();
        let combat = manager.states.create("Combat").unwrap();
        manager.set_state(ada.id, combat).unwrap();
        assert_eq!(manager.validate(), Ok(()));

        manager.delete_tag(tag).unwrap();
        assert_eq!(manager.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_misfiled_and_dangling_loadouts() {
        let (manager, ada, tag) = setup();

        let mut misfiled = manager.clone();
        let loadout = misfiled.loadouts.remove(&ada.id).unwrap();
        misfiled.loadouts.insert(AgentId(3), loadout);
        assert_eq!(
            misfiled.validate(),
            Err(ManagerError::OwnerMismatch {
                key: AgentId(3),
                owner: ada.id
            })
        );

        let mut dangling = manager;
        dangling.tags.remove(tag);
        assert_eq!(dangling.validate(), Err(ManagerError::UnknownTag(tag)));
    }
}
