use cubeforge_shared::face::Face;

use crate::vertex::{pack_uv, PackedVertex};

/// Width of one atlas tile in UV space (a 16 × 16 tile grid).
pub const TILE_UV_SIZE: f32 = 1.0 / 16.0;

/// Corner positions of each face in doubled unit-cube space, indexed by `Face`.
///
/// Corners are listed counter-clockwise as seen from outside the cube.
const FACE_CORNERS: [[[u8; 3]; 4]; Face::COUNT] = [
    // Back (-Z)
    [[2, 0, 0], [0, 0, 0], [0, 2, 0], [2, 2, 0]],
    // Front (+Z)
    [[0, 0, 2], [2, 0, 2], [2, 2, 2], [0, 2, 2]],
    // Right (+X)
    [[2, 0, 2], [2, 0, 0], [2, 2, 0], [2, 2, 2]],
    // Left (-X)
    [[0, 0, 0], [0, 0, 2], [0, 2, 2], [0, 2, 0]],
    // Bottom (-Y)
    [[0, 0, 0], [2, 0, 0], [2, 0, 2], [0, 0, 2]],
    // Top (+Y)
    [[0, 2, 2], [2, 2, 2], [2, 2, 0], [0, 2, 0]],
];

/// UV of each quad corner inside its tile, before the atlas origin is added.
pub const BASE_UVS: [[f32; 2]; 4] = base_uvs(TILE_UV_SIZE);

pub const fn base_uvs(tile: f32) -> [[f32; 2]; 4] {
    [[0.0, 0.0], [tile, 0.0], [tile, tile], [0.0, tile]]
}

/// Unit-cube quad for every face: four vertices with normal tag and base UV.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceTemplates {
    quads: [[PackedVertex; 4]; Face::COUNT],
}

impl FaceTemplates {
    /// Templates for the default 16 × 16 atlas grid.
    pub fn unit_cube() -> Self {
        Self::with_tile_size(TILE_UV_SIZE)
    }

    /// Templates whose base UVs span one `tile`-wide square.
    pub fn with_tile_size(tile: f32) -> Self {
        let uvs = base_uvs(tile);
        let quads = Face::ALL.map(|face| {
            let corners = FACE_CORNERS[face.index()];
            std::array::from_fn(|corner| {
                let [u, v] = uvs[corner];
                PackedVertex::new(corners[corner], face.normal_flag(), pack_uv(u, v))
            })
        });
        Self { quads }
    }

    pub fn quad(&self, face: Face) -> &[PackedVertex; 4] {
        &self.quads[face.index()]
    }
}

impl Default for FaceTemplates {
    fn default() -> Self {
        Self::unit_cube()
    }
}
