//! Ordered, stateful aggregation of tags bound to one agent.
//!
//! A [`Loadout`] holds [`LoadoutElement`]s in priority order. Element ordinals
//! are their positions in the backing vector, so they stay contiguous and
//! unique through every mutation. [`Loadout::items_with`] flattens the active
//! elements into the [`LoadoutItem`] list consumed by the capacity calculator.
mod element;
mod state;

pub use element::LoadoutElement;
pub use state::{ActiveState, LoadoutState, StateId, StateRegistry};

use crate::agent::AgentId;
use crate::env::{ItemKindId, MaterialId};
use crate::error::{ErrorSeverity, LoadoutFault};
use crate::filter::Filter;
use crate::item::Quality;
use crate::tag::{RequiredItem, TagId, TagRegistry};

/// Errors raised by loadout and state editing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadoutError {
    #[error("tag {0:?} is already part of this loadout")]
    AlreadyPresent(TagId),

    #[error("tag {0:?} is not part of this loadout")]
    TagNotPresent(TagId),

    #[error("element index {index} out of range (len: {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("a state named '{0}' already exists")]
    DuplicateStateName(String),

    #[error("state name must not be empty")]
    EmptyStateName,

    #[error("state id {0:?} is already in use")]
    StateIdTaken(StateId),

    #[error("state ids exhausted")]
    StateIdsExhausted,

    #[error("state id {0:?} was never allocated by this registry")]
    UnallocatedStateId(StateId),

    #[error("state {0:?} was not found")]
    StateNotFound(StateId),
}

impl LoadoutFault for LoadoutError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            LoadoutError::AlreadyPresent(_) => "LOADOUT_TAG_ALREADY_PRESENT",
            LoadoutError::TagNotPresent(_) => "LOADOUT_TAG_NOT_PRESENT",
            LoadoutError::OutOfRange { .. } => "LOADOUT_OUT_OF_RANGE",
            LoadoutError::DuplicateStateName(_) => "LOADOUT_DUPLICATE_STATE_NAME",
            LoadoutError::EmptyStateName => "LOADOUT_EMPTY_STATE_NAME",
            LoadoutError::StateIdTaken(_) => "LOADOUT_STATE_ID_TAKEN",
            LoadoutError::StateIdsExhausted => "LOADOUT_STATE_IDS_EXHAUSTED",
            LoadoutError::UnallocatedStateId(_) => "LOADOUT_UNALLOCATED_STATE_ID",
            LoadoutError::StateNotFound(_) => "LOADOUT_STATE_NOT_FOUND",
        }
    }
}

/// One effective requirement produced by flattening a loadout.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadoutItem {
    pub kind: ItemKindId,
    pub filter: Filter,
    pub quantity: u32,
    pub material: Option<MaterialId>,
    /// Quality assumed for hypothetical mass and capacity.
    pub quality: Quality,
}

impl From<&RequiredItem> for LoadoutItem {
    fn from(item: &RequiredItem) -> Self {
        Self {
            kind: item.kind(),
            filter: item.filter().clone(),
            quantity: item.quantity(),
            material: item.material(),
            quality: item.assumed_quality(),
        }
    }
}

/// Equipment requirement profile of a single agent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loadout {
    owner: AgentId,
    elements: Vec<LoadoutElement>,
    #[cfg_attr(feature = "serde", serde(default))]
    current: ActiveState,
}

impl Loadout {
    pub fn new(owner: AgentId) -> Self {
        Self {
            owner,
            elements: Vec::new(),
            current: ActiveState::Default,
        }
    }

    pub fn owner(&self) -> AgentId {
        self.owner
    }

    pub fn current_state(&self) -> ActiveState {
        self.current
    }

    /// Elements in ordinal order.
    pub fn all_elements(&self) -> &[LoadoutElement] {
        &self.elements
    }

    pub fn element_mut(&mut self, index: usize) -> Result<&mut LoadoutElement, LoadoutError> {
        let len = self.elements.len();
        self.elements
            .get_mut(index)
            .ok_or(LoadoutError::OutOfRange { index, len })
    }

    pub fn position(&self, tag: TagId) -> Option<usize> {
        self.elements.iter().position(|element| element.tag() == tag)
    }

    pub fn contains(&self, tag: TagId) -> bool {
        self.position(tag).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Appends a new element for `tag`, returning its ordinal.
    pub fn add_tag(&mut self, tag: TagId) -> Result<usize, LoadoutError> {
        if self.contains(tag) {
            return Err(LoadoutError::AlreadyPresent(tag));
        }
        self.elements.push(LoadoutElement::new(tag));
        Ok(self.elements.len() - 1)
    }

    /// Removes the element bound to `tag`. The tag itself is untouched.
    pub fn remove_tag(&mut self, tag: TagId) -> Result<LoadoutElement, LoadoutError> {
        let index = self.position(tag).ok_or(LoadoutError::TagNotPresent(tag))?;
        Ok(self.elements.remove(index))
    }

    pub fn remove_element(&mut self, index: usize) -> Result<LoadoutElement, LoadoutError> {
        let len = self.elements.len();
        if index >= len {
            return Err(LoadoutError::OutOfRange { index, len });
        }
        Ok(self.elements.remove(index))
    }

    /// Swaps the elements at `index` and `index + 1`.
    pub fn swap(&mut self, index: usize) -> Result<(), LoadoutError> {
        let len = self.elements.len();
        if index.checked_add(1).is_none_or(|next| next >= len) {
            return Err(LoadoutError::OutOfRange { index, len });
        }
        self.elements.swap(index, index + 1);
        Ok(())
    }

    pub fn move_up(&mut self, index: usize) -> Result<(), LoadoutError> {
        match index.checked_sub(1) {
            Some(above) if index < self.elements.len() => self.swap(above),
            _ => Err(LoadoutError::OutOfRange {
                index,
                len: self.elements.len(),
            }),
        }
    }

    pub fn move_down(&mut self, index: usize) -> Result<(), LoadoutError> {
        self.swap(index)
    }

    /// Points the loadout at `state`. Unknown states are accepted.
    pub fn set_state(&mut self, state: impl Into<ActiveState>) {
        self.current = state.into();
    }

    /// Elements contributing items under `state`.
    pub fn active_elements<'a>(
        &'a self,
        state: ActiveState,
        states: &'a StateRegistry,
    ) -> impl Iterator<Item = &'a LoadoutElement> + 'a {
        self.elements
            .iter()
            .filter(move |element| element.is_active(state, states))
    }

    /// Flattens every active element's required items under `state`.
    ///
    /// Elements whose tag is missing from `tags` contribute nothing.
    pub fn items_with(
        &self,
        state: ActiveState,
        tags: &TagRegistry,
        states: &StateRegistry,
    ) -> Vec<LoadoutItem> {
        let mut items = Vec::new();
        for element in self.active_elements(state, states) {
            let Some(tag) = tags.get(element.tag()) else {
                tracing::warn!("loadout references unknown tag {:?}", element.tag());
                continue;
            };
            items.extend(tag.required_items.iter().map(LoadoutItem::from));
        }
        items
    }

    /// [`Loadout::items_with`] under the loadout's current state.
    pub fn current_items(&self, tags: &TagRegistry, states: &StateRegistry) -> Vec<LoadoutItem> {
        self.items_with(self.current, tags, states)
    }

    /// Registered tags not yet referenced by this loadout.
    pub fn available_tags(&self, tags: &TagRegistry) -> Vec<TagId> {
        tags.ids().filter(|id| !self.contains(*id)).collect()
    }

    /// Fails with [`LoadoutError::AlreadyPresent`] if a tag appears twice.
    pub fn validate(&self) -> Result<(), LoadoutError> {
        for (index, element) in self.elements.iter().enumerate() {
            if self.position(element.tag()) != Some(index) {
                return Err(LoadoutError::AlreadyPresent(element.tag()));
            }
        }
        Ok(())
    }

    pub(crate) fn forget_state(&mut self, state: StateId) {
        for element in &mut self.elements {
            element.forget_state(state);
        }
        if self.current == ActiveState::Named(state) {
            self.current = ActiveState::Default;
        }
    }
}
