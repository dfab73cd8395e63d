use cubeforge_shared::block::BlockId;
use cubeforge_shared::chunk::ChunkData;
use cubeforge_shared::coords::{LocalPos, CHUNK_HEIGHT, CHUNK_SIZE_X, CHUNK_SIZE_Z};
use noise::{NoiseFn, Perlin};

const SEA_LEVEL: i32 = 20;
const SURFACE_BASE: f64 = 24.0;
const MAX_SURFACE: i32 = CHUNK_HEIGHT as i32 - 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Preset {
    Empty,
    Single,
    Column,
    Solid,
    Checkerboard,
    Terrain,
}

impl Preset {
    pub const NAMES: &'static str = "empty|single|column|solid|checkerboard|terrain";

    pub fn parse(name: &str) -> Option<Self> {
        let preset = match name {
            "empty" => Self::Empty,
            "single" => Self::Single,
            "column" => Self::Column,
            "solid" => Self::Solid,
            "checkerboard" => Self::Checkerboard,
            "terrain" => Self::Terrain,
            _ => return None,
        };
        Some(preset)
    }

    pub fn build(self, seed: u64) -> ChunkData {
        match self {
            Self::Empty => ChunkData::new_empty(),
            Self::Single => {
                let mut grid = ChunkData::new_empty();
                grid.set(LocalPos::new(0, 0, 0), BlockId::STONE);
                grid
            }
            Self::Column => {
                let mut grid = ChunkData::new_empty();
                grid.fill_box(
                    LocalPos::new(0, 0, 0),
                    LocalPos::new(0, 1, 0),
                    BlockId::STONE,
                );
                grid
            }
            Self::Solid => ChunkData::new_filled(BlockId::STONE),
            Self::Checkerboard => checkerboard(),
            Self::Terrain => terrain(seed),
        }
    }
}

fn checkerboard() -> ChunkData {
    let mut grid = ChunkData::new_empty();
    for x in 0..CHUNK_SIZE_X as u8 {
        for y in 0..CHUNK_HEIGHT as u8 {
            for z in 0..CHUNK_SIZE_Z as u8 {
                if (x + y + z) % 2 == 0 {
                    grid.set(LocalPos::new(x, y, z), BlockId::STONE);
                }
            }
        }
    }
    grid
}

/// Rolling hills with grass over dirt over stone, sandy shores below sea
/// level, and the odd tree.
fn terrain(seed: u64) -> ChunkData {
    let height_noise = Perlin::new(seed as u32);
    let tree_noise = Perlin::new(seed.wrapping_add(1) as u32);
    let mut grid = ChunkData::new_empty();

    for x in 0..CHUNK_SIZE_X as u8 {
        for z in 0..CHUNK_SIZE_Z as u8 {
            let wx = f64::from(x);
            let wz = f64::from(z);
            let coarse = height_noise.get([wx * 0.05, wz * 0.05]) * 10.0;
            let detail = height_noise.get([wx * 0.2 + 101.3, wz * 0.2 - 73.7]) * 2.5;
            let surface = ((SURFACE_BASE + coarse + detail) as i32).clamp(1, MAX_SURFACE);

            for y in 0..=surface {
                let block = if y == surface {
                    if surface <= SEA_LEVEL {
                        BlockId::SAND
                    } else {
                        BlockId::GRASS
                    }
                } else if y + 3 >= surface {
                    BlockId::DIRT
                } else {
                    BlockId::STONE
                };
                grid.set(LocalPos::new(x, y as u8, z), block);
            }

            let inside = (2..CHUNK_SIZE_X as u8 - 2).contains(&x)
                && (2..CHUNK_SIZE_Z as u8 - 2).contains(&z);
            let wants_tree = tree_noise.get([wx * 0.9 + 17.0, wz * 0.9 - 5.0]) > 0.55;
            if inside && wants_tree && surface > SEA_LEVEL {
                plant_tree(&mut grid, x, surface as u8 + 1, z);
            }
        }
    }

    grid
}

fn plant_tree(grid: &mut ChunkData, x: u8, base: u8, z: u8) {
    let top = base + 3;
    grid.fill_box(
        LocalPos::new(x - 2, top - 1, z - 2),
        LocalPos::new(x + 2, top + 1, z + 2),
        BlockId::LEAF,
    );
    grid.fill_box(
        LocalPos::new(x, base, z),
        LocalPos::new(x, top, z),
        BlockId::LOG,
    );
}

#[cfg(test)]
mod tests {
    use super::Preset;
    use cubeforge_shared::block::BlockId;
    use cubeforge_shared::coords::{LocalPos, CHUNK_VOLUME};

    #[test]
    fn preset_names_parse() {
        for name in Preset::NAMES.split('|') {
            assert!(Preset::parse(name).is_some(), "{name}");
        }
        assert_eq!(Preset::parse("sphere"), None);
    }

    #[test]
    fn fixed_presets_have_expected_voxel_counts() {
        assert_eq!(Preset::Empty.build(0).solid_count(), 0);
        assert_eq!(Preset::Single.build(0).solid_count(), 1);
        assert_eq!(Preset::Column.build(0).solid_count(), 2);
        assert_eq!(Preset::Solid.build(0).solid_count(), CHUNK_VOLUME);
        assert_eq!(Preset::Checkerboard.build(0).solid_count(), CHUNK_VOLUME / 2);
    }

    #[test]
    fn terrain_is_deterministic_and_grounded() {
        let first = Preset::Terrain.build(42);
        let second = Preset::Terrain.build(42);
        assert_eq!(first, second);

        // Every column has a floor.
        for x in 0..16 {
            for z in 0..16 {
                assert_ne!(first.get(LocalPos::new(x, 0, z)), BlockId::AIR);
            }
        }
        assert_eq!(first.get(LocalPos::new(0, 63, 0)), BlockId::AIR);
    }
}
