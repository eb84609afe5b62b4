//! Tile definition and actor bookkeeping layered over a grid.

use std::collections::{btree_map::Entry, BTreeMap};

use gridkit_core::{Actor, ActorId, TileType};
use thiserror::Error;

/// Reasons a tile definition or actor registration is refused.
///
/// These are expected outcomes; the grid is left exactly as it was.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// An actor with the same identifier is already registered.
    #[error("actor {} is already registered", .0.get())]
    DuplicateActor(ActorId),
    /// [`TileType::Undefined`] cannot be bound to a character.
    #[error("the undefined tile type cannot be bound to '{character}'")]
    UndefinedTileType {
        /// Character the caller tried to bind.
        character: char,
    },
    /// Another tile type already owns the character.
    #[error("character '{character}' is already claimed by {owner:?}")]
    CharacterClaimed {
        /// Contested character.
        character: char,
        /// Tile type that owns the character.
        owner: TileType,
    },
    /// The tile type already has a character; redefinition is not supported.
    #[error("{tile:?} is already bound to '{character}'")]
    TileTypeDefined {
        /// Tile type the caller tried to redefine.
        tile: TileType,
        /// Character currently bound to the tile type.
        character: char,
    },
}

/// Bidirectionally unique mapping between tile types and characters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TileRegistry {
    entries: BTreeMap<TileType, char>,
}

impl TileRegistry {
    /// Binds `tile` to `character` if neither is taken.
    pub(crate) fn define(&mut self, tile: TileType, character: char) -> Result<(), RegistrationError> {
        if !tile.is_definable() {
            return Err(RegistrationError::UndefinedTileType { character });
        }
        if let Some(&existing) = self.entries.get(&tile) {
            return Err(RegistrationError::TileTypeDefined {
                tile,
                character: existing,
            });
        }
        if let Some(owner) = self.owner_of(character) {
            return Err(RegistrationError::CharacterClaimed { character, owner });
        }

        let _ = self.entries.insert(tile, character);
        Ok(())
    }

    /// Tile type claiming `character`, if any.
    ///
    /// Linear in the number of definitions, which is bounded by the tile
    /// type count.
    pub(crate) fn owner_of(&self, character: char) -> Option<TileType> {
        self.entries
            .iter()
            .find(|(_, &claimed)| claimed == character)
            .map(|(&tile, _)| tile)
    }

    pub(crate) fn character_of(&self, tile: TileType) -> Option<char> {
        self.entries.get(&tile).copied()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (TileType, char)> + '_ {
        self.entries.iter().map(|(&tile, &character)| (tile, character))
    }
}

/// Actors keyed by identifier; the first registration of an id wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ActorRegistry {
    entries: BTreeMap<ActorId, Actor>,
}

impl ActorRegistry {
    pub(crate) fn register(&mut self, actor: Actor) -> Result<(), RegistrationError> {
        match self.entries.entry(actor.id()) {
            Entry::Occupied(_) => Err(RegistrationError::DuplicateActor(actor.id())),
            Entry::Vacant(slot) => {
                let _ = slot.insert(actor);
                Ok(())
            }
        }
    }

    pub(crate) fn contains(&self, id: ActorId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn get(&self, id: ActorId) -> Option<&Actor> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.entries.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
