use glam::IVec3;
use serde::{Deserialize, Serialize};

pub const CHUNK_SIZE_X: usize = 16;
pub const CHUNK_HEIGHT: usize = 64;
pub const CHUNK_SIZE_Z: usize = 16;
pub const CHUNK_VOLUME: usize = CHUNK_SIZE_X * CHUNK_HEIGHT * CHUNK_SIZE_Z;

/// Per-axis extents, indexable by axis (0 = x, 1 = y, 2 = z).
pub const CHUNK_DIMS: [usize; 3] = [CHUNK_SIZE_X, CHUNK_HEIGHT, CHUNK_SIZE_Z];

/// Chunk coordinate on the chunk grid. Streaming code owns the mapping to
/// disk and network; the mesher only carries it through.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Voxel coordinate inside one chunk. Every component is below its `CHUNK_DIMS` extent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalPos {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl LocalPos {
    pub const fn new(x: u8, y: u8, z: u8) -> Self {
        Self { x, y, z }
    }

    pub fn in_bounds(self) -> bool {
        usize::from(self.x) < CHUNK_SIZE_X
            && usize::from(self.y) < CHUNK_HEIGHT
            && usize::from(self.z) < CHUNK_SIZE_Z
    }

    /// Steps one voxel along `offset`, or `None` when the step leaves the chunk.
    pub fn checked_offset(self, offset: [i32; 3]) -> Option<LocalPos> {
        let coords = [self.x, self.y, self.z];
        let mut out = [0u8; 3];
        for axis in 0..3 {
            let stepped = i32::from(coords[axis]) + offset[axis];
            if !(0..CHUNK_DIMS[axis] as i32).contains(&stepped) {
                return None;
            }
            out[axis] = stepped as u8;
        }
        Some(LocalPos::new(out[0], out[1], out[2]))
    }
}

/// World-space block coordinate of the chunk's (0, 0, 0) voxel.
pub fn chunk_origin(chunk_pos: ChunkPos) -> IVec3 {
    IVec3::new(
        chunk_pos.x * CHUNK_SIZE_X as i32,
        chunk_pos.y * CHUNK_HEIGHT as i32,
        chunk_pos.z * CHUNK_SIZE_Z as i32,
    )
}

pub fn chunk_to_world(chunk_pos: ChunkPos, local: LocalPos) -> IVec3 {
    chunk_origin(chunk_pos)
        + IVec3::new(
            i32::from(local.x),
            i32::from(local.y),
            i32::from(local.z),
        )
}

/// Row-major over (x, y, z): z varies fastest, x slowest.
pub fn local_to_index(local: LocalPos) -> usize {
    debug_assert!(local.in_bounds(), "local position out of bounds: {local:?}");
    usize::from(local.x) * CHUNK_HEIGHT * CHUNK_SIZE_Z
        + usize::from(local.y) * CHUNK_SIZE_Z
        + usize::from(local.z)
}

pub fn index_to_local(index: usize) -> LocalPos {
    assert!(index < CHUNK_VOLUME, "chunk index out of bounds: {index}");

    let x = index / (CHUNK_HEIGHT * CHUNK_SIZE_Z);
    let y = (index / CHUNK_SIZE_Z) % CHUNK_HEIGHT;
    let z = index % CHUNK_SIZE_Z;

    LocalPos::new(x as u8, y as u8, z as u8)
}
