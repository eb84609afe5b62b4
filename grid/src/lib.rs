#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Character grid with tile definitions and registered actors.
//!
//! A [`Grid`] owns a [`Matrix<char>`] and layers two lookups over its
//! coordinate space: a mapping between [`TileType`] categories and the
//! characters that represent them, and a set of [`Actor`] values keyed by
//! identifier. A grid may also be switched to wrap-around addressing, where
//! out-of-range coordinates are reduced modulo the current dimensions.

mod manifest;
mod registry;

use std::io::BufRead;

use gridkit_core::{Actor, ActorId, TileType};
use gridkit_matrix::{Matrix, Result as MatrixResult};
use log::debug;

pub use manifest::{GridManifest, SUPPORTED_MANIFEST_VERSION};
pub use registry::RegistrationError;

use registry::{ActorRegistry, TileRegistry};

/// Character matrix extended with tile definitions and actors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Matrix<char>,
    tiles: TileRegistry,
    actors: ActorRegistry,
    infinite: bool,
}

impl Grid {
    /// Wraps `cells` in a grid with no tiles, no actors and bounded addressing.
    #[must_use]
    pub fn new(cells: Matrix<char>) -> Self {
        Self {
            cells,
            tiles: TileRegistry::default(),
            actors: ActorRegistry::default(),
            infinite: false,
        }
    }

    /// Builds a grid from explicit rows of characters.
    pub fn from_rows(rows: Vec<Vec<char>>) -> MatrixResult<Self> {
        Matrix::from_rows(rows).map(Self::new)
    }

    /// Reads a grid from text, one row per line and one cell per character.
    pub fn from_reader<R: BufRead>(reader: R) -> MatrixResult<Self> {
        Matrix::<char>::from_char_reader(reader).map(Self::new)
    }

    /// [`Grid::from_reader`] over an in-memory string.
    pub fn parse(text: &str) -> MatrixResult<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Enables or disables wrap-around addressing.
    pub fn set_infinite(&mut self, infinite: bool) {
        self.infinite = infinite;
    }

    /// Reports whether wrap-around addressing is enabled.
    #[must_use]
    pub const fn is_infinite(&self) -> bool {
        self.infinite
    }

    /// Number of rows.
    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.cells.n_rows()
    }

    /// Number of columns.
    #[must_use]
    pub const fn n_cols(&self) -> usize {
        self.cells.n_cols()
    }

    /// Underlying character matrix.
    #[must_use]
    pub fn matrix(&self) -> &Matrix<char> {
        &self.cells
    }

    /// Mutable access to the underlying matrix.
    ///
    /// Structural edits made here change the dimensions used for wrap-around
    /// addressing from the next access on.
    pub fn matrix_mut(&mut self) -> &mut Matrix<char> {
        &mut self.cells
    }

    /// Consumes the grid, returning its matrix.
    #[must_use]
    pub fn into_matrix(self) -> Matrix<char> {
        self.cells
    }

    /// Character at `(row, col)`.
    ///
    /// With wrap-around addressing, each out-of-range coordinate is reduced
    /// modulo the current dimension of its axis; otherwise out-of-range
    /// coordinates fail exactly as [`Matrix::get`] does.
    pub fn get(&self, row: usize, col: usize) -> MatrixResult<char> {
        let (row, col) = self.resolve(row, col);
        self.cells.get(row, col).copied()
    }

    /// Overwrites the character at `(row, col)`, honouring wrap-around addressing.
    pub fn set(&mut self, row: usize, col: usize, character: char) -> MatrixResult<()> {
        let (row, col) = self.resolve(row, col);
        self.cells.set(row, col, character)
    }

    /// Cuts a square window around `(row, col)`; see [`Matrix::cut_window`].
    pub fn cut_window(
        &self,
        row: usize,
        col: usize,
        width: usize,
        fill: char,
    ) -> MatrixResult<Matrix<char>> {
        self.cells.cut_window(row, col, width, fill)
    }

    /// Binds `tile` to `character`.
    ///
    /// Fails for [`TileType::Undefined`], for a character another tile type
    /// already owns, and for a tile type that already has a character.
    pub fn add_tile_type_definition(
        &mut self,
        tile: TileType,
        character: char,
    ) -> Result<(), RegistrationError> {
        self.tiles.define(tile, character).map_err(|error| {
            debug!("rejected tile definition: {error}");
            error
        })
    }

    /// Tile type of the cell at `(row, col)`.
    ///
    /// Reads through [`Grid::get`], so wrap-around addressing applies. Returns
    /// [`TileType::Undefined`] when no definition claims the character.
    pub fn tile_type(&self, row: usize, col: usize) -> MatrixResult<TileType> {
        let character = self.get(row, col)?;
        Ok(self
            .tiles
            .owner_of(character)
            .unwrap_or(TileType::Undefined))
    }

    /// Character bound to `tile`, if defined.
    #[must_use]
    pub fn tile_character(&self, tile: TileType) -> Option<char> {
        self.tiles.character_of(tile)
    }

    /// Every tile definition, ordered by tile type.
    pub fn tile_definitions(&self) -> impl Iterator<Item = (TileType, char)> + '_ {
        self.tiles.iter()
    }

    /// Registers `actor` under its identifier. An existing registration is
    /// never replaced.
    pub fn add_actor(&mut self, actor: Actor) -> Result<(), RegistrationError> {
        self.actors.register(actor).map_err(|error| {
            debug!("rejected actor: {error}");
            error
        })
    }

    /// Reports whether an actor is registered under `id`.
    #[must_use]
    pub fn actor_exists(&self, id: ActorId) -> bool {
        self.actors.contains(id)
    }

    /// Actor registered under `id`.
    #[must_use]
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    /// Mutable actor registered under `id`. The identifier itself cannot be
    /// changed through the returned reference.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    /// Registered actors in ascending identifier order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    /// Number of registered actors.
    #[must_use]
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    fn resolve(&self, row: usize, col: usize) -> (usize, usize) {
        let (rows, cols) = self.cells.shape();
        if self.infinite && (row >= rows || col >= cols) {
            (row % rows, col % cols)
        } else {
            (row, col)
        }
    }
}

impl From<Matrix<char>> for Grid {
    fn from(cells: Matrix<char>) -> Self {
        Self::new(cells)
    }
}
