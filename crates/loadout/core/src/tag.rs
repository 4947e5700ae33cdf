//! Named groups of required items.
//!
//! A [`Tag`] is a reusable, user-named list of [`RequiredItem`]s. Tags live in
//! a [`TagRegistry`] and loadouts refer to them by [`TagId`], so editing a tag
//! is visible to every loadout using it.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::env::{ItemCatalog, ItemKindId, MaterialId};
use crate::error::{ErrorSeverity, LoadoutFault};
use crate::filter::{Filter, FilterError};
use crate::item::Quality;

/// Identity of a tag inside a [`TagRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagId(pub u32);

/// Errors raised by tag editing.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TagError {
    #[error("a tag named '{0}' already exists")]
    DuplicateName(String),

    #[error("tag name must not be empty")]
    EmptyName,

    #[error("tag {0:?} not found")]
    NotFound(TagId),

    #[error("required item index {index} out of range (len: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("tag id {0:?} is already in use")]
    IdTaken(TagId),

    #[error("tag ids exhausted")]
    IdsExhausted,

    #[error("tag id {0:?} was never allocated by this registry")]
    UnallocatedId(TagId),

    #[error("required item {index} of tag {tag:?} has zero quantity")]
    ZeroQuantity { tag: TagId, index: usize },

    #[error("required item {index} of tag {tag:?}: {source}")]
    InvalidFilter {
        tag: TagId,
        index: usize,
        #[source]
        source: FilterError,
    },
}

impl LoadoutFault for TagError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            TagError::DuplicateName(_) => "TAG_DUPLICATE_NAME",
            TagError::EmptyName => "TAG_EMPTY_NAME",
            TagError::NotFound(_) => "TAG_NOT_FOUND",
            TagError::IndexOutOfRange { .. } => "TAG_INDEX_OUT_OF_RANGE",
            TagError::IdTaken(_) => "TAG_ID_TAKEN",
            TagError::IdsExhausted => "TAG_IDS_EXHAUSTED",
            TagError::UnallocatedId(_) => "TAG_UNALLOCATED_ID",
            TagError::ZeroQuantity { .. } => "TAG_ZERO_QUANTITY",
            TagError::InvalidFilter { .. } => "TAG_INVALID_FILTER",
        }
    }
}

/// One item kind a tag asks for.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequiredItem {
    filter: Filter,
    quantity: u32,
    randomize_material: bool,
    /// Representative material used for icons and hypothetical mass.
    material: Option<MaterialId>,
}

impl RequiredItem {
    /// A single unrestricted item of `kind`.
    pub fn new(kind: ItemKindId) -> Self {
        Self::with_filter(Filter::new(kind), 1)
    }

    /// Quantity is raised to at least one.
    pub fn with_filter(filter: Filter, quantity: u32) -> Self {
        Self {
            filter,
            quantity: quantity.max(1),
            randomize_material: false,
            material: None,
        }
    }

    pub fn randomized(mut self) -> Self {
        self.randomize_material = true;
        self
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    pub fn kind(&self) -> ItemKindId {
        self.filter.kind()
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut Filter {
        &mut self.filter
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Sets the quantity, raising zero to one.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    pub fn randomize_material(&self) -> bool {
        self.randomize_material
    }

    pub fn set_randomize_material(&mut self, randomize: bool) {
        self.randomize_material = randomize;
    }

    pub fn material(&self) -> Option<MaterialId> {
        self.material
    }

    /// Quality assumed when evaluating this requirement hypothetically.
    pub fn assumed_quality(&self) -> Quality {
        self.filter.quality_range().min
    }

    /// Picks a fresh representative material when randomization is enabled.
    ///
    /// Draws from the filter's allowed materials, or from every material the
    /// kind can be made from when the filter is unrestricted. Returns the
    /// material now in effect.
    pub fn reroll_material<R: Rng + ?Sized>(
        &mut self,
        catalog: &dyn ItemCatalog,
        rng: &mut R,
    ) -> Option<MaterialId> {
        if !self.randomize_material {
            return self.material;
        }
        let pool: Vec<MaterialId> = if self.filter.allowed_materials().is_empty() {
            catalog.valid_materials(self.kind())
        } else {
            self.filter.allowed_materials().iter().copied().collect()
        };
        if let Some(choice) = pool.choose(rng) {
            self.material = Some(*choice);
        }
        self.material
    }
}

/// Named, ordered group of required items.
///
/// The name is fixed once registered; rename through [`TagRegistry::rename`]
/// so uniqueness holds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    name: String,
    pub required_items: Vec<RequiredItem>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_items: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_item(mut self, item: RequiredItem) -> Self {
        self.required_items.push(item);
        self
    }

    pub fn add_item(&mut self, item: RequiredItem) {
        self.required_items.push(item);
    }

    pub fn remove_item(&mut self, index: usize) -> Result<RequiredItem, TagError> {
        let len = self.required_items.len();
        if index >= len {
            return Err(TagError::IndexOutOfRange { index, len });
        }
        Ok(self.required_items.remove(index))
    }

    /// Whether this tag asks for `kind` at all.
    pub fn requires(&self, kind: ItemKindId) -> bool {
        self.required_items.iter().any(|item| item.kind() == kind)
    }
}

/// Registry of every tag known to the player.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagRegistry {
    next_id: u32,
    tags: BTreeMap<TagId, Tag>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tag` under a fresh id; names must be unique and non-empty.
    pub fn insert(&mut self, tag: Tag) -> Result<TagId, TagError> {
        self.check_name(&tag.name, None)?;
        let id = TagId(self.next_id);
        if self.tags.contains_key(&id) {
            return Err(TagError::IdTaken(id));
        }
        self.next_id = self.next_id.checked_add(1).ok_or(TagError::IdsExhausted)?;
        tracing::debug!("registered tag '{}' as {:?}", tag.name, id);
        self.tags.insert(id, tag);
        Ok(id)
    }

    pub fn create(&mut self, name: impl Into<String>) -> Result<TagId, TagError> {
        self.insert(Tag::new(name))
    }

    pub fn rename(&mut self, id: TagId, name: impl Into<String>) -> Result<(), TagError> {
        let name = name.into();
        self.check_name(&name, Some(id))?;
        let tag = self.tags.get_mut(&id).ok_or(TagError::NotFound(id))?;
        tag.name = name;
        Ok(())
    }

    pub fn get(&self, id: TagId) -> Option<&Tag> {
        self.tags.get(&id)
    }

    pub fn get_mut(&mut self, id: TagId) -> Option<&mut Tag> {
        self.tags.get_mut(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<TagId> {
        self.tags
            .iter()
            .find(|(_, tag)| tag.name == name)
            .map(|(id, _)| *id)
    }

    /// Removes the tag from the registry. Loadouts still holding the id
    /// resolve it to nothing; use the manager to detach it everywhere first.
    pub(crate) fn remove(&mut self, id: TagId) -> Option<Tag> {
        self.tags.remove(&id)
    }

    pub fn contains(&self, id: TagId) -> bool {
        self.tags.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TagId, &Tag)> {
        self.tags.iter().map(|(id, tag)| (*id, tag))
    }

    pub fn ids(&self) -> impl Iterator<Item = TagId> + '_ {
        self.tags.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Checks what the editing API guarantees, for registries that did not
    /// come through it (decoded profiles).
    ///
    /// Every id lies below the next free id, names are non-empty and unique,
    /// quantities are at least one and every filter range is well formed.
    pub fn validate(&self) -> Result<(), TagError> {
        let mut names = BTreeSet::new();
        for (id, tag) in &self.tags {
            if id.0 >= self.next_id {
                return Err(TagError::UnallocatedId(*id));
            }
            if tag.name.trim().is_empty() {
                return Err(TagError::EmptyName);
            }
            if !names.insert(tag.name.as_str()) {
                return Err(TagError::DuplicateName(tag.name.clone()));
            }
            for (index, item) in tag.required_items.iter().enumerate() {
                if item.quantity == 0 {
                    return Err(TagError::ZeroQuantity { tag: *id, index });
                }
                item.filter
                    .validate()
                    .map_err(|source| TagError::InvalidFilter {
                        tag: *id,
                        index,
                        source,
                    })?;
            }
        }
        Ok(())
    }

    fn check_name(&self, name: &str, except: Option<TagId>) -> Result<(), TagError> {
        if name.trim().is_empty() {
            return Err(TagError::EmptyName);
        }
        let taken = self
            .tags
            .iter()
            .any(|(id, tag)| Some(*id) != except && tag.name == name);
        if taken {
            return Err(TagError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{CatalogSnapshot, ItemDefinition, MaterialDefinition};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn quantity_is_at_least_one() {
        let mut item = RequiredItem::with_filter(Filter::new(ItemKindId(1)), 0);
        assert_eq!(item.quantity(), 1);
        item.set_quantity(4);
        assert_eq!(item.quantity(), 4);
        item.set_quantity(0);
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn tag_names_are_unique() {
        let mut registry = TagRegistry::new();
        let basics = registry.create("Basics").unwrap();
        assert_eq!(
            registry.create("Basics"),
            Err(TagError::DuplicateName("Basics".into()))
        );
        assert_eq!(registry.create("  "), Err(TagError::EmptyName));

        let medic = registry.create("Medic").unwrap();
        assert!(registry.rename(medic, "Basics").is_err());
        registry.rename(basics, "Basics").unwrap();
        registry.rename(medic, "Doctor").unwrap();
        assert_eq!(registry.find_by_name("Doctor"), Some(medic));
    }

    #[test]
    fn insert_never_overwrites_an_existing_id() {
        let mut registry = TagRegistry::new();
        let basics = registry.create("Basics").unwrap();
        registry.next_id = 0;
        assert_eq!(registry.create("Medic"), Err(TagError::IdTaken(basics)));
        assert_eq!(registry.get(basics).map(Tag::name), Some("Basics"));
        assert_eq!(registry.len(), 1);

        registry.next_id = u32::MAX;
        assert_eq!(registry.create("Medic"), Err(TagError::IdsExhausted));
        assert_eq!(registry.next_id, u32::MAX);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn validate_rejects_states_the_editors_cannot_reach() {
        let mut registry = TagRegistry::new();
        let basics = registry
            .insert(Tag::new("Basics").with_item(RequiredItem::new(ItemKindId(1))))
            .unwrap();
        let medic = registry.create("Medic").unwrap();
        assert_eq!(registry.validate(), Ok(()));

        let mut stale = registry.clone();
        stale.next_id = 1;
        assert_eq!(stale.validate(), Err(TagError::UnallocatedId(medic)));

        let mut zero = registry.clone();
        zero.get_mut(basics).unwrap().required_items[0].quantity = 0;
        assert_eq!(
            zero.validate(),
            Err(TagError::ZeroQuantity {
                tag: basics,
                index: 0
            })
        );

        let mut twins = registry.clone();
        twins.tags.get_mut(&medic).unwrap().name = "Basics".into();
        assert_eq!(
            twins.validate(),
            Err(TagError::DuplicateName("Basics".into()))
        );

        let mut blank = registry;
        blank.tags.get_mut(&medic).unwrap().name = " ".into();
        assert_eq!(blank.validate(), Err(TagError::EmptyName));
    }

    #[test]
    fn remove_item_checks_bounds() {
        let mut tag = Tag::new("Basics").with_item(RequiredItem::new(ItemKindId(1)));
        assert_eq!(
            tag.remove_item(3),
            Err(TagError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert!(tag.requires(ItemKindId(1)));
        tag.remove_item(0).unwrap();
        assert!(!tag.requires(ItemKindId(1)));
    }

    #[test]
    fn reroll_draws_from_allowed_materials() {
        let catalog = CatalogSnapshot::from_parts(
            [
                MaterialDefinition::new(MaterialId(1), "Steel", 1.0),
                MaterialDefinition::new(MaterialId(2), "Wood", 0.5),
            ],
            [ItemDefinition::new(ItemKindId(1), "Club", 2.0)
                .with_materials([MaterialId(1), MaterialId(2)])],
        );
        let mut rng = StdRng::seed_from_u64(7);

        let mut fixed = RequiredItem::new(ItemKindId(1)).with_material(MaterialId(1));
        assert_eq!(fixed.reroll_material(&catalog, &mut rng), Some(MaterialId(1)));

        let mut filter = Filter::new(ItemKindId(1));
        filter.allow_material(MaterialId(2));
        let mut restricted = RequiredItem::with_filter(filter, 1).randomized();
        for _ in 0..8 {
            assert_eq!(
                restricted.reroll_material(&catalog, &mut rng),
                Some(MaterialId(2))
            );
        }

        let mut open = RequiredItem::new(ItemKindId(1)).randomized();
        let picked = open.reroll_material(&catalog, &mut rng);
        assert!(matches!(picked, Some(MaterialId(1)) | Some(MaterialId(2))));
    }
}
