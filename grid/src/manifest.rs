//! TOML manifests describing a grid, its tiles and its starting actors.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use gridkit_core::{Actor, ActorId, Position, TileType};
use log::debug;
use serde::Deserialize;

use crate::Grid;

/// Manifest format version understood by [`GridManifest::parse`].
pub const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Validated description of a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridManifest {
    /// Path of the character layout file.
    pub layout: PathBuf,
    /// Whether the grid uses wrap-around addressing.
    pub infinite: bool,
    /// Tile definitions, ordered by tile type.
    pub tiles: Vec<(TileType, char)>,
    /// Actors to register, in manifest order.
    pub actors: Vec<Actor>,
}

impl GridManifest {
    /// Parses manifest text. The layout path is kept exactly as written.
    pub fn parse(contents: &str) -> Result<Self> {
        let manifest: RawManifest =
            toml::from_str(contents).context("failed to parse grid manifest toml contents")?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported grid manifest version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }

        let mut tiles = Vec::with_capacity(manifest.tiles.len());
        for (name, symbol) in &manifest.tiles {
            let tile = parse_tile_type(name)?;
            let character = single_character(symbol)
                .with_context(|| format!("invalid character for tile `{name}`"))?;
            tiles.push((tile, character));
        }
        tiles.sort_by_key(|&(tile, _)| tile);

        let mut actors = Vec::with_capacity(manifest.actors.len());
        for entry in manifest.actors {
            let id = ActorId::new(entry.id);
            let character = match entry.character.as_deref() {
                Some(symbol) => single_character(symbol)
                    .with_context(|| format!("invalid character for actor {}", entry.id))?,
                None => Actor::DEFAULT_CHARACTER,
            };
            actors.push(
                Actor::with_character(id, character)
                    .with_position(entry.position.unwrap_or_default()),
            );
        }

        Ok(Self {
            layout: manifest.layout,
            infinite: manifest.infinite,
            tiles,
            actors,
        })
    }

    /// Reads and parses the manifest at `path`, resolving the layout path
    /// relative to the manifest's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read grid manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut manifest = Self::parse(&contents).with_context(|| {
            format!("invalid grid manifest at {}", manifest_path.display())
        })?;
        manifest.layout = base.join(&manifest.layout);
        Ok(manifest)
    }

    /// Reads the layout and assembles the grid it describes.
    ///
    /// Conflicting tile or actor entries are errors here, unlike on
    /// [`Grid`] itself, since a manifest is expected to be consistent.
    pub fn build(&self) -> Result<Grid> {
        let file = File::open(&self.layout).with_context(|| {
            format!("failed to open grid layout at {}", self.layout.display())
        })?;
        let mut grid = Grid::from_reader(BufReader::new(file)).with_context(|| {
            format!("failed to load grid layout at {}", self.layout.display())
        })?;
        grid.set_infinite(self.infinite);

        for &(tile, character) in &self.tiles {
            grid.add_tile_type_definition(tile, character)
                .with_context(|| format!("cannot define tile {tile:?} as '{character}'"))?;
        }
        for actor in &self.actors {
            grid.add_actor(*actor)
                .with_context(|| format!("cannot register actor {}", actor.id().get()))?;
        }

        debug!(
            "built {}x{} grid from {} with {} tiles and {} actors",
            grid.n_rows(),
            grid.n_cols(),
            self.layout.display(),
            self.tiles.len(),
            grid.actor_count()
        );
        Ok(grid)
    }
}

impl Grid {
    /// Loads the manifest at `path` and builds the grid it describes.
    pub fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        GridManifest::load(path)?.build()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    version: u32,
    layout: PathBuf,
    #[serde(default)]
    infinite: bool,
    #[serde(default)]
    tiles: BTreeMap<String, String>,
    #[serde(default)]
    actors: Vec<RawActor>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawActor {
    id: usize,
    character: Option<String>,
    position: Option<Position<i64>>,
}

fn parse_tile_type(name: &str) -> Result<TileType> {
    match name {
        "Empty" => Ok(TileType::Empty),
        "Wall" => Ok(TileType::Wall),
        "Tree" => Ok(TileType::Tree),
        "Undefined" => bail!("tile type `Undefined` cannot be given a character"),
        _ => bail!("unknown tile type `{name}`"),
    }
}

fn single_character(symbol: &str) -> Result<char> {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(character), None) => Ok(character),
        _ => bail!("expected exactly one character, found `{symbol}`"),
    }
}
