//! Agents governed by loadouts.
//!
//! The engine never owns agents; it reads them through [`Agent`]. [`AgentProfile`]
//! is a plain-data implementation used by tools, fixtures and saved profiles.
use bitflags::bitflags;

use crate::item::ItemInstance;

/// Stable identity of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u32);

impl core::fmt::Display for AgentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

bitflags! {
    /// Facts about an agent relevant to loadout eligibility.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct AgentTraits: u8 {
        const HUMANLIKE = 1 << 0;
        const ANIMAL = 1 << 1;
        const COLONIST = 1 << 2;
        const DEAD = 1 << 3;
        const QUEST_LODGER = 1 << 4;
        const LOCKED_APPAREL = 1 << 5;
        const CANNOT_CARRY = 1 << 6;
    }
}

/// Read-only view of an agent.
pub trait Agent {
    fn id(&self) -> AgentId;

    fn body_size(&self) -> f32;

    /// `false` for agents whose carrying capacity is forced to zero.
    fn can_carry_anything(&self) -> bool;

    fn worn_items(&self) -> &[ItemInstance];

    fn inventory_items(&self) -> &[ItemInstance];

    /// Whether a loadout may be attached to this agent at all.
    fn is_valid_loadout_holder(&self) -> bool;

    /// Worn apparel followed by inventory.
    fn carried_items(&self) -> Box<dyn Iterator<Item = &ItemInstance> + '_> {
        Box::new(self.worn_items().iter().chain(self.inventory_items()))
    }
}

/// Plain-data [`Agent`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentProfile {
    pub id: AgentId,
    pub name: String,
    pub body_size: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub traits: AgentTraits,
    #[cfg_attr(feature = "serde", serde(default))]
    pub worn: Vec<ItemInstance>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Vec<ItemInstance>,
}

impl AgentProfile {
    /// A living human colonist of the given body size.
    pub fn colonist(id: AgentId, name: impl Into<String>, body_size: f32) -> Self {
        Self {
            id,
            name: name.into(),
            body_size,
            traits: AgentTraits::HUMANLIKE | AgentTraits::COLONIST,
            worn: Vec::new(),
            inventory: Vec::new(),
        }
    }

    pub fn with_traits(mut self, traits: AgentTraits) -> Self {
        self.traits |= traits;
        self
    }

    pub fn wearing(mut self, item: ItemInstance) -> Self {
        self.worn.push(item);
        self
    }

    pub fn carrying(mut self, item: ItemInstance) -> Self {
        self.inventory.push(item);
        self
    }
}

impl Agent for AgentProfile {
    fn id(&self) -> AgentId {
        self.id
    }

    fn body_size(&self) -> f32 {
        self.body_size
    }

    fn can_carry_anything(&self) -> bool {
        !self.traits.contains(AgentTraits::CANNOT_CARRY)
    }

    fn worn_items(&self) -> &[ItemInstance] {
        &self.worn
    }

    fn inventory_items(&self) -> &[ItemInstance] {
        &self.inventory
    }

    fn is_valid_loadout_holder(&self) -> bool {
        self.traits
            .contains(AgentTraits::HUMANLIKE | AgentTraits::COLONIST)
            && !self.traits.intersects(
                AgentTraits::ANIMAL
                    | AgentTraits::DEAD
                    | AgentTraits::QUEST_LODGER
                    | AgentTraits::LOCKED_APPAREL,
            )
    }
}
