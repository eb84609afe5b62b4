#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared primitives for the gridkit containers.
//!
//! This crate holds the small value types that sit on top of a grid: the
//! generic [`Position`] used to compute neighbour coordinates, the [`Actor`]
//! that can be registered into a grid under its [`ActorId`], and the
//! [`TileType`] categories a grid maps onto display characters.

use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

/// Two-dimensional coordinate pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position<T> {
    /// Horizontal component.
    pub x: T,
    /// Vertical component.
    pub y: T,
}

impl<T> Position<T> {
    /// Creates a new position from its components.
    #[must_use]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T> From<(T, T)> for Position<T> {
    fn from((x, y): (T, T)) -> Self {
        Self { x, y }
    }
}

impl<T: Add<Output = T>> Add for Position<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl<T: AddAssign> AddAssign for Position<T> {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl<T: Mul<Output = T> + Copy> Mul<T> for Position<T> {
    type Output = Self;

    fn mul(self, factor: T) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// Unique identifier assigned to an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(usize);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Movable object represented by a character that can be placed on a grid.
///
/// The identifier is fixed at construction. The display character and the
/// logical position may change freely; the grid never tracks positions on the
/// actor's behalf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: ActorId,
    character: char,
    position: Position<i64>,
}

impl Actor {
    /// Character shown for actors constructed without an explicit one.
    pub const DEFAULT_CHARACTER: char = '?';

    /// Creates an actor at the origin displayed with [`Actor::DEFAULT_CHARACTER`].
    #[must_use]
    pub const fn new(id: ActorId) -> Self {
        Self::with_character(id, Self::DEFAULT_CHARACTER)
    }

    /// Creates an actor at the origin displayed with `character`.
    #[must_use]
    pub const fn with_character(id: ActorId, character: char) -> Self {
        Self {
            id,
            character,
            position: Position::new(0, 0),
        }
    }

    /// Returns the actor moved to `position`.
    #[must_use]
    pub fn with_position(mut self, position: Position<i64>) -> Self {
        self.position = position;
        self
    }

    /// Identifier the actor was created with.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Character used to display the actor.
    #[must_use]
    pub const fn character(&self) -> char {
        self.character
    }

    /// Replaces the display character.
    pub fn set_character(&mut self, character: char) {
        self.character = character;
    }

    /// Logical position of the actor.
    #[must_use]
    pub const fn position(&self) -> Position<i64> {
        self.position
    }

    /// Moves the actor to `position`.
    pub fn set_position(&mut self, position: Position<i64>) {
        self.position = position;
    }

    /// Moves the actor by `delta`.
    pub fn translate(&mut self, delta: Position<i64>) {
        self.position += delta;
    }
}

/// Logical categories a grid tile can belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileType {
    /// Walkable, unoccupied ground.
    Empty,
    /// Impassable wall.
    Wall,
    /// Tree or other vegetation.
    Tree,
    /// No tile definition claims the character.
    Undefined,
}

impl TileType {
    /// Every tile type that may carry a character definition.
    pub const DEFINABLE: [TileType; 3] = [TileType::Empty, TileType::Wall, TileType::Tree];

    /// Reports whether the tile type may be bound to a character.
    #[must_use]
    pub const fn is_definable(self) -> bool {
        !matches!(self, Self::Undefined)
    }
}
