use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use cubeforge_shared::block::{BlockId, MAX_BLOCK_TYPES};
use cubeforge_shared::face::Face;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::templates::TILE_UV_SIZE;

const DEFAULT_TILES_PER_ROW: u32 = 16;
const MAX_TILES_PER_ROW: u32 = 256;

/// Row every built-in block samples from in the default atlas.
const DEFAULT_ROW: u32 = 15;

/// Tile origin of each `(block, face)` pair in normalized atlas space.
///
/// Read-only once built; workers share it behind an `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasTable {
    origins: [[[f32; 2]; Face::COUNT]; MAX_BLOCK_TYPES],
    tile_size: f32,
}

impl AtlasTable {
    /// A table where every face samples the tile at the atlas origin.
    pub fn blank(tiles_per_row: u32) -> Self {
        Self {
            origins: [[[0.0, 0.0]; Face::COUNT]; MAX_BLOCK_TYPES],
            tile_size: 1.0 / tiles_per_row as f32,
        }
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Origin for `block`'s `face`. Codes outside the table sample `(0, 0)`.
    pub fn origin(&self, block: BlockId, face: Face) -> [f32; 2] {
        self.origins
            .get(usize::from(block.0))
            .map_or([0.0, 0.0], |row| row[face.index()])
    }

    /// Overrides one entry. Codes outside the table are ignored.
    pub fn set_origin(&mut self, block: BlockId, face: Face, origin: [f32; 2]) {
        if let Some(row) = self.origins.get_mut(usize::from(block.0)) {
            row[face.index()] = origin;
        }
    }

    fn set_tile(&mut self, block: BlockId, face: Face, tile: [u32; 2]) {
        let origin = [
            tile[0] as f32 * self.tile_size,
            tile[1] as f32 * self.tile_size,
        ];
        self.set_origin(block, face, origin);
    }

    pub fn from_manifest(manifest: &AtlasManifest) -> Result<Self, AtlasError> {
        let tiles_per_row = manifest.tiles_per_row;
        if !(1..=MAX_TILES_PER_ROW).contains(&tiles_per_row) {
            return Err(AtlasError::InvalidTilesPerRow(tiles_per_row));
        }

        let mut table = Self::blank(tiles_per_row);
        for entry in &manifest.blocks {
            let block =
                BlockId::from_name(&entry.block).ok_or_else(|| AtlasError::UnknownBlock {
                    name: entry.block.clone(),
                })?;

            for face in Face::ALL {
                let Some(tile) = entry.tile_for(face) else {
                    continue;
                };
                if tile[0] >= tiles_per_row || tile[1] >= tiles_per_row {
                    return Err(AtlasError::TileOutOfRange {
                        block: entry.block.clone(),
                        tile,
                        tiles_per_row,
                    });
                }
                table.set_tile(block, face, tile);
            }
        }

        Ok(table)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, AtlasError> {
        let manifest = toml::from_str::<AtlasManifest>(contents).map_err(AtlasError::Parse)?;
        Self::from_manifest(&manifest)
    }

    pub fn load(path: &Path) -> Result<Self, AtlasError> {
        let contents = fs::read_to_string(path).map_err(|source| AtlasError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_toml_str(&contents)?;
        info!("Loaded atlas manifest from {}", path.display());
        Ok(table)
    }
}

impl Default for AtlasTable {
    /// The built-in 16 × 16 terrain atlas layout.
    fn default() -> Self {
        let mut table = Self::blank(DEFAULT_TILES_PER_ROW);
        debug_assert!((table.tile_size - TILE_UV_SIZE).abs() < f32::EPSILON);

        let uniform = [
            (BlockId::DIRT, 2),
            (BlockId::STONE, 3),
            (BlockId::SAND, 4),
            (BlockId::LEAF, 7),
        ];
        for (block, column) in uniform {
            for face in Face::ALL {
                table.set_tile(block, face, [column, DEFAULT_ROW]);
            }
        }

        for face in Face::ALL {
            let grass = match face {
                Face::Top => 0,
                Face::Bottom => 2,
                _ => 1,
            };
            table.set_tile(BlockId::GRASS, face, [grass, DEFAULT_ROW]);

            let log = match face {
                Face::Top | Face::Bottom => 5,
                _ => 6,
            };
            table.set_tile(BlockId::LOG, face, [log, DEFAULT_ROW]);
        }

        table
    }
}

/// TOML description of an atlas layout, in whole tiles.
///
/// ```toml
/// tiles_per_row = 16
///
/// [[blocks]]
/// block = "grass"
/// sides = [1, 15]
/// top = [0, 15]
/// bottom = [2, 15]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasManifest {
    #[serde(default = "default_tiles_per_row")]
    pub tiles_per_row: u32,
    #[serde(default)]
    pub blocks: Vec<AtlasEntry>,
}

/// Tile assignment for one block. Narrower keys win: a single side beats
/// `sides`, which beats `all`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasEntry {
    pub block: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<[u32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<[u32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<[u32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<[u32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back: Option<[u32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<[u32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<[u32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<[u32; 2]>,
}

impl AtlasEntry {
    fn tile_for(&self, face: Face) -> Option<[u32; 2]> {
        let specific = match face {
            Face::Back => self.back.or(self.sides),
            Face::Front => self.front.or(self.sides),
            Face::Right => self.right.or(self.sides),
            Face::Left => self.left.or(self.sides),
            Face::Bottom => self.bottom,
            Face::Top => self.top,
        };
        specific.or(self.all)
    }
}

fn default_tiles_per_row() -> u32 {
    DEFAULT_TILES_PER_ROW
}

#[derive(Debug)]
pub enum AtlasError {
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    InvalidTilesPerRow(u32),
    UnknownBlock {
        name: String,
    },
    TileOutOfRange {
        block: String,
        tile: [u32; 2],
        tiles_per_row: u32,
    },
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read atlas manifest {}: {source}", path.display())
            }
            Self::Parse(source) => write!(f, "failed to parse atlas manifest: {source}"),
            Self::InvalidTilesPerRow(count) => write!(
                f,
                "tiles_per_row must be between 1 and {MAX_TILES_PER_ROW}, got {count}"
            ),
            Self::UnknownBlock { name } => write!(f, "unknown block '{name}' in atlas manifest"),
            Self::TileOutOfRange {
                block,
                tile,
                tiles_per_row,
            } => write!(
                f,
                "tile [{}, {}] for block '{block}' lies outside a {tiles_per_row}-tile atlas",
                tile[0], tile[1]
            ),
        }
    }
}

impl std::error::Error for AtlasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::Parse(source) => Some(source),
            _ => None,
        }
    }
}
