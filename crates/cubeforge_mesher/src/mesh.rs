use std::sync::Arc;

use cubeforge_shared::block::{is_transparent, BlockId};
use cubeforge_shared::chunk::ChunkData;
use cubeforge_shared::coords::{index_to_local, LocalPos, CHUNK_VOLUME};
use cubeforge_shared::face::Face;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::atlas::AtlasTable;
use crate::error::{BufferKind, MeshError};
use crate::guard::BufferGuard;
use crate::templates::FaceTemplates;
use crate::vertex::{pack_uv, PackedVertex};

pub const VERTICES_PER_FACE: usize = 4;
pub const INDICES_PER_FACE: usize = 6;
pub const MAX_VERTICES_PER_VOXEL: usize = VERTICES_PER_FACE * Face::COUNT;
pub const MAX_INDICES_PER_VOXEL: usize = INDICES_PER_FACE * Face::COUNT;

/// Enough room for every face of every voxel.
pub const WORST_CASE_VERTICES: usize = CHUNK_VOLUME * MAX_VERTICES_PER_VOXEL;
pub const WORST_CASE_INDICES: usize = CHUNK_VOLUME * MAX_INDICES_PER_VOXEL;

/// Sparse-terrain budget: 512 fully exposed voxels.
pub const COMPACT_VERTICES: usize = 12_288;
pub const COMPACT_INDICES: usize = 18_432;

/// Two clockwise triangles over a counter-clockwise quad.
const QUAD_INDICES: [u32; INDICES_PER_FACE] = [0, 2, 1, 0, 3, 2];

/// How many vertex and index slots each mesh build reserves up front.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// Sized for a chunk where no face is culled; never overflows.
    #[default]
    WorstCase,
    /// Caller-chosen budget. Chunks that need more fail with `CapacityOverflow`.
    Fixed { vertices: usize, indices: usize },
}

impl CapacityPolicy {
    pub const fn compact() -> Self {
        Self::Fixed {
            vertices: COMPACT_VERTICES,
            indices: COMPACT_INDICES,
        }
    }

    /// `(vertices, indices)` reserved per build.
    pub fn limits(self) -> (usize, usize) {
        match self {
            Self::WorstCase => (WORST_CASE_VERTICES, WORST_CASE_INDICES),
            Self::Fixed { vertices, indices } => (vertices, indices),
        }
    }

    /// Keeps a fixed budget between one voxel's worth and the worst case.
    pub fn sanitize(self) -> Self {
        match self {
            Self::WorstCase => Self::WorstCase,
            Self::Fixed { vertices, indices } => Self::Fixed {
                vertices: vertices.clamp(MAX_VERTICES_PER_VOXEL, WORST_CASE_VERTICES),
                indices: indices.clamp(MAX_INDICES_PER_VOXEL, WORST_CASE_INDICES),
            },
        }
    }
}

/// Vertex and index buffers for one chunk, ready for upload.
///
/// An empty mesh reserves nothing. A non-empty mesh keeps the full reservation
/// it was built with, and so does every clone of it.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Mesh {
    vertices: Vec<PackedVertex>,
    indices: Vec<u32>,
    vertex_reserved: usize,
    index_reserved: usize,
}

impl Mesh {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[PackedVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / INDICES_PER_FACE
    }

    pub fn vertex_reserved(&self) -> usize {
        self.vertex_reserved
    }

    pub fn index_reserved(&self) -> usize {
        self.index_reserved
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

impl Clone for Mesh {
    fn clone(&self) -> Self {
        let mut vertices = Vec::with_capacity(self.vertex_reserved.max(self.vertices.len()));
        vertices.extend_from_slice(&self.vertices);
        let mut indices = Vec::with_capacity(self.index_reserved.max(self.indices.len()));
        indices.extend_from_slice(&self.indices);
        Self {
            vertices,
            indices,
            vertex_reserved: self.vertex_reserved,
            index_reserved: self.index_reserved,
        }
    }
}

/// One visible face waiting to be emitted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QuadDesc {
    pub pos: LocalPos,
    pub block: BlockId,
    pub face: Face,
}

/// Block on the far side of `face`. Anything outside the chunk reads as air,
/// so border faces are always drawn.
pub fn neighbor_block(grid: &ChunkData, pos: LocalPos, face: Face) -> BlockId {
    pos.checked_offset(face.offset())
        .map_or(BlockId::AIR, |neighbor| grid.get(neighbor))
}

/// Appends the four vertices and six indices of one quad.
///
/// The caller guarantees room for both without reallocating.
pub fn emit_face(
    templates: &FaceTemplates,
    atlas: &AtlasTable,
    quad: QuadDesc,
    vertices: &mut Vec<PackedVertex>,
    indices: &mut Vec<u32>,
) {
    debug_assert!(vertices.capacity() - vertices.len() >= VERTICES_PER_FACE);
    debug_assert!(indices.capacity() - indices.len() >= INDICES_PER_FACE);

    let base = vertices.len() as u32;
    let [origin_u, origin_v] = atlas.origin(quad.block, quad.face);

    for template in templates.quad(quad.face) {
        let [u, v] = template.uv();
        let mut vertex = template.translated(quad.pos);
        vertex.uv = pack_uv(u + origin_u, v + origin_v);
        vertices.push(vertex);
    }
    indices.extend(QUAD_INDICES.iter().map(|offset| base + offset));
}

fn reserve_buffer<T>(buffer: BufferKind, requested: usize) -> Result<Vec<T>, MeshError> {
    let mut data = Vec::new();
    data.try_reserve_exact(requested).map_err(|source| {
        error!("Failed to reserve {requested} {buffer} buffer entries: {source}");
        MeshError::AllocationFailed {
            buffer,
            requested,
            source,
        }
    })?;
    Ok(data)
}

/// Turns voxel grids into culled quad meshes.
///
/// Holds only read-only tables, so one builder can serve many threads.
#[derive(Clone, Debug)]
pub struct MeshBuilder {
    atlas: Arc<AtlasTable>,
    templates: FaceTemplates,
    capacity: CapacityPolicy,
}

impl MeshBuilder {
    pub fn new(atlas: Arc<AtlasTable>, capacity: CapacityPolicy) -> Self {
        let templates = FaceTemplates::with_tile_size(atlas.tile_size());
        Self {
            atlas,
            templates,
            capacity,
        }
    }

    pub fn atlas(&self) -> &AtlasTable {
        &self.atlas
    }

    pub fn capacity(&self) -> CapacityPolicy {
        self.capacity
    }

    pub fn generate_mesh(&self, grid: &ChunkData) -> Result<Mesh, MeshError> {
        let (vertex_reserved, index_reserved) = self.capacity.limits();
        let mut vertices = reserve_buffer::<PackedVertex>(BufferKind::Vertex, vertex_reserved)?;
        let mut indices = reserve_buffer::<u32>(BufferKind::Index, index_reserved)?;
        let guard = BufferGuard::arm(vertex_reserved, &vertices, index_reserved, &indices);

        let mut solid_voxels = 0usize;
        for (index, &block) in grid.blocks.iter().enumerate() {
            if block == BlockId::AIR {
                continue;
            }
            let pos = index_to_local(index);

            if !block.has_atlas_slot() {
                error!(
                    "Voxel ({}, {}, {}) holds unknown block code {}",
                    pos.x, pos.y, pos.z, block.0
                );
                return Err(MeshError::InvalidBlock { voxel: pos, block });
            }

            let vertices_left = vertex_reserved.saturating_sub(vertices.len());
            let indices_left = index_reserved.saturating_sub(indices.len());
            if vertices_left < MAX_VERTICES_PER_VOXEL || indices_left < MAX_INDICES_PER_VOXEL {
                error!(
                    "Mesh capacity exhausted at voxel ({}, {}, {}): {}/{} vertices, {}/{} indices",
                    pos.x,
                    pos.y,
                    pos.z,
                    vertices.len(),
                    vertex_reserved,
                    indices.len(),
                    index_reserved
                );
                return Err(MeshError::CapacityOverflow {
                    voxel: pos,
                    vertices_used: vertices.len(),
                    vertex_capacity: vertex_reserved,
                    indices_used: indices.len(),
                    index_capacity: index_reserved,
                });
            }

            solid_voxels += 1;
            for face in Face::ALL {
                if is_transparent(neighbor_block(grid, pos, face)) {
                    let quad = QuadDesc { pos, block, face };
                    emit_face(&self.templates, &self.atlas, quad, &mut vertices, &mut indices);
                }
            }
        }

        if let Err(fault) = guard.check(&vertices, &indices) {
            error!("Mesh buffer integrity check failed: {fault}");
            return Err(fault.into());
        }

        if indices.is_empty() {
            debug!("Chunk has no visible faces ({solid_voxels} solid voxels)");
            return Ok(Mesh::empty());
        }

        debug!(
            "Meshed {} solid voxels into {} faces ({} vertices, {} indices)",
            solid_voxels,
            indices.len() / INDICES_PER_FACE,
            vertices.len(),
            indices.len()
        );

        Ok(Mesh {
            vertices,
            indices,
            vertex_reserved,
            index_reserved,
        })
    }
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new(Arc::new(AtlasTable::default()), CapacityPolicy::default())
    }
}

/// Meshes `grid` with `atlas` and the worst-case capacity.
///
/// Meant for one-off use: every call copies `atlas` and rebuilds the face
/// templates. Keep a `MeshBuilder` around when meshing many chunks.
pub fn generate_mesh(grid: &ChunkData, atlas: &AtlasTable) -> Result<Mesh, MeshError> {
    MeshBuilder::new(Arc::new(atlas.clone()), CapacityPolicy::WorstCase).generate_mesh(grid)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{
        emit_face, generate_mesh, neighbor_block, CapacityPolicy, Mesh, MeshBuilder, QuadDesc,
        COMPACT_INDICES, COMPACT_VERTICES, INDICES_PER_FACE, WORST_CASE_INDICES,
        WORST_CASE_VERTICES,
    };
    use crate::atlas::AtlasTable;
    use crate::error::{BufferKind, MeshError};
    use crate::templates::FaceTemplates;
    use crate::vertex::PackedVertex;
    use cubeforge_shared::block::BlockId;
    use cubeforge_shared::chunk::ChunkData;
    use cubeforge_shared::coords::{LocalPos, CHUNK_HEIGHT, CHUNK_SIZE_X, CHUNK_SIZE_Z};
    use cubeforge_shared::face::{Face, NormalFlags};

    const UV_TOLERANCE: f32 = 2.0 / 65535.0;

    fn single(pos: LocalPos, block: BlockId) -> ChunkData {
        let mut grid = ChunkData::new_empty();
        grid.set(pos, block);
        grid
    }

    fn mesh_of(grid: &ChunkData) -> Mesh {
        generate_mesh(grid, &AtlasTable::default()).expect("mesh generation")
    }

    fn faces_with(mesh: &Mesh, flag: NormalFlags) -> usize {
        mesh.vertices()
            .iter()
            .filter(|vertex| vertex.normal_flags() == flag)
            .count()
            / 4
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

    fn position(vertex: &PackedVertex) -> [i32; 3] {
        vertex.position().map(i32::from)
    }

    #[test]
    fn all_air_chunk_yields_an_unreserved_empty_mesh() {
        let mesh = mesh_of(&ChunkData::new_empty());
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.index_count(), 0);
        assert_eq!(mesh.vertex_reserved(), 0);
        assert_eq!(mesh.index_reserved(), 0);
        assert_eq!(mesh, Mesh::empty());
    }

    #[test]
    fn lone_voxel_emits_all_six_faces() {
        for pos in [
            LocalPos::new(7, 30, 9),
            LocalPos::new(0, 0, 0),
            LocalPos::new(15, 63, 15),
            LocalPos::new(0, 63, 15),
        ] {
            let mesh = mesh_of(&single(pos, BlockId::DIRT));
            assert_eq!(mesh.vertex_count(), 24, "{pos:?}");
            assert_eq!(mesh.index_count(), 36, "{pos:?}");
            assert_eq!(mesh.face_count(), 6);
            for face in Face::ALL {
                assert_eq!(faces_with(&mesh, face.normal_flag()), 1, "{pos:?} {face:?}");
            }
            assert_eq!(mesh.vertex_reserved(), WORST_CASE_VERTICES);
            assert_eq!(mesh.index_reserved(), WORST_CASE_INDICES);
        }
    }

    #[test]
    fn stone_at_origin_matches_templates_plus_atlas_origin() {
        let atlas = AtlasTable::default();
        let templates = FaceTemplates::unit_cube();
        let mesh = mesh_of(&single(LocalPos::new(0, 0, 0), BlockId::STONE));

        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);

        for (face_index, quad) in mesh.vertices().chunks(4).enumerate() {
            let face = Face::from_index(face_index).expect("faces emitted in table order");
            let origin = atlas.origin(BlockId::STONE, face);
            for (vertex, template) in quad.iter().zip(templates.quad(face)) {
                assert_eq!(vertex.position(), template.position());
                assert_eq!(vertex.normal_flags(), face.normal_flag());

                let [u, v] = vertex.uv();
                let [tu, tv] = template.uv();
                assert!((u - origin[0] - tu).abs() <= UV_TOLERANCE, "{face:?} u");
                assert!((v - origin[1] - tv).abs() <= UV_TOLERANCE, "{face:?} v");
            }
        }

        let top = &mesh.vertices()[Face::Top.index() * 4..][..4];
        assert!(top.iter().all(|vertex| vertex.y == 2));
        let left = &mesh.vertices()[Face::Left.index() * 4..][..4];
        assert!(left.iter().all(|vertex| vertex.x == 0));
        let bottom = &mesh.vertices()[Face::Bottom.index() * 4..][..4];
        assert!(bottom.iter().all(|vertex| vertex.y == 0));
        let back = &mesh.vertices()[Face::Back.index() * 4..][..4];
        assert!(back.iter().all(|vertex| vertex.z == 0));
    }

    #[test]
    fn stacked_column_culls_the_shared_faces() {
        let mut grid = ChunkData::new_empty();
        grid.set(LocalPos::new(0, 0, 0), BlockId::STONE);
        grid.set(LocalPos::new(0, 1, 0), BlockId::STONE);

        let mesh = mesh_of(&grid);
        assert_eq!(mesh.face_count(), 10);
        assert_eq!(mesh.vertex_count(), 40);
        assert_eq!(faces_with(&mesh, NormalFlags::TOP), 1);
        assert_eq!(faces_with(&mesh, NormalFlags::BOTTOM), 1);
        assert_eq!(faces_with(&mesh, NormalFlags::LEFT), 2);
    }

    #[test]
    fn side_by_side_opaque_voxels_never_draw_the_shared_face() {
        let mut grid = ChunkData::new_empty();
        grid.set(LocalPos::new(5, 10, 5), BlockId::GRASS);
        grid.set(LocalPos::new(6, 10, 5), BlockId::SAND);

        let mesh = mesh_of(&grid);
        assert_eq!(mesh.face_count(), 10);
        assert_eq!(faces_with(&mesh, NormalFlags::RIGHT), 1);
        assert_eq!(faces_with(&mesh, NormalFlags::LEFT), 1);
        // Both voxels touch the plane x = 6 in voxel space; nothing may sit there.
        assert!(mesh.vertices().iter().all(|vertex| {
            let flags = vertex.normal_flags();
            !(flags == NormalFlags::RIGHT || flags == NormalFlags::LEFT) || vertex.x != 12
        }));
    }

    #[test]
    fn opaque_voxel_shows_its_face_to_a_leaf_but_not_the_reverse() {
        let mut grid = ChunkData::new_empty();
        grid.set(LocalPos::new(5, 5, 5), BlockId::STONE);
        grid.set(LocalPos::new(6, 5, 5), BlockId::LEAF);

        let mesh = mesh_of(&grid);
        assert_eq!(mesh.face_count(), 11);
        // Stone's +X face is present; the leaf's -X face facing the stone is not.
        assert_eq!(faces_with(&mesh, NormalFlags::RIGHT), 2);
        assert_eq!(faces_with(&mesh, NormalFlags::LEFT), 1);

        let mut leaves = ChunkData::new_empty();
        leaves.set(LocalPos::new(5, 5, 5), BlockId::LEAF);
        leaves.set(LocalPos::new(6, 5, 5), BlockId::LEAF);
        assert_eq!(mesh_of(&leaves).face_count(), 12);
    }

    #[test]
    fn fully_solid_chunk_draws_only_its_border() {
        let mesh = mesh_of(&ChunkData::new_filled(BlockId::STONE));
        let x_faces = 2 * CHUNK_HEIGHT * CHUNK_SIZE_Z;
        let z_faces = 2 * CHUNK_SIZE_X * CHUNK_HEIGHT;
        let y_faces = 2 * CHUNK_SIZE_X * CHUNK_SIZE_Z;
        assert_eq!(mesh.face_count(), x_faces + y_faces + z_faces);
        assert_eq!(faces_with(&mesh, NormalFlags::TOP), CHUNK_SIZE_X * CHUNK_SIZE_Z);
    }

    #[test]
    fn every_triangle_is_clockwise_seen_from_outside() {
        let mut grid = checkerboard();
        grid.fill_box(LocalPos::new(2, 2, 2), LocalPos::new(5, 8, 4), BlockId::LOG);
        let mesh = mesh_of(&grid);
        assert!(!mesh.is_empty());

        for triangle in mesh.indices().chunks(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]]
                .map(|index| position(&mesh.vertices()[index as usize]));
            let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let cross = [
                ab[1] * ac[2] - ab[2] * ac[1],
                ab[2] * ac[0] - ab[0] * ac[2],
                ab[0] * ac[1] - ab[1] * ac[0],
            ];

            let flags = mesh.vertices()[triangle[0] as usize].normal_flags();
            let face = Face::ALL
                .into_iter()
                .find(|face| face.normal_flag() == flags)
                .expect("single normal flag");
            let outward = face.offset();
            let facing = cross[0] * outward[0] + cross[1] * outward[1] + cross[2] * outward[2];
            assert!(facing < 0, "{face:?} triangle {triangle:?} is not clockwise");
        }
    }

    #[test]
    fn indices_reference_their_own_quad() {
        let mesh = mesh_of(&checkerboard());
        for (quad, indices) in mesh.indices().chunks(INDICES_PER_FACE).enumerate() {
            let base = (quad * 4) as u32;
            assert_eq!(indices, [base, base + 2, base + 1, base, base + 3, base + 2]);
        }
        assert_eq!(mesh.vertex_count() * 6, mesh.index_count() * 4);
    }

    #[test]
    fn meshing_the_same_grid_twice_is_bit_identical() {
        let mut grid = checkerboard();
        grid.fill_box(LocalPos::new(0, 0, 0), LocalPos::new(15, 3, 15), BlockId::DIRT);
        grid.set(LocalPos::new(8, 40, 8), BlockId::LEAF);

        let first = mesh_of(&grid);
        let second = mesh_of(&grid);
        assert_eq!(first.vertex_bytes(), second.vertex_bytes());
        assert_eq!(first.index_bytes(), second.index_bytes());
        assert_eq!(first.vertex_bytes().len(), first.vertex_count() * 8);
        assert_eq!(first.index_bytes().len(), first.index_count() * 4);
    }

    #[test]
    fn checkerboard_fits_worst_case_but_overflows_compact_budget() {
        let grid = checkerboard();
        let mesh = mesh_of(&grid);
        assert_eq!(mesh.face_count(), grid.solid_count() * 6);

        let compact = MeshBuilder::new(Arc::new(AtlasTable::default()), CapacityPolicy::compact());
        match compact.generate_mesh(&grid) {
            Err(MeshError::CapacityOverflow {
                vertices_used,
                vertex_capacity,
                index_capacity,
                ..
            }) => {
                assert_eq!(vertex_capacity, COMPACT_VERTICES);
                assert_eq!(index_capacity, COMPACT_INDICES);
                assert_eq!(vertices_used, COMPACT_VERTICES);
            }
            other => panic!("expected capacity overflow, got {other:?}"),
        }
    }

    #[test]
    fn compact_budget_still_meshes_sparse_chunks() {
        let compact = MeshBuilder::new(Arc::new(AtlasTable::default()), CapacityPolicy::compact());
        let mesh = compact
            .generate_mesh(&single(LocalPos::new(3, 3, 3), BlockId::SAND))
            .expect("single voxel fits");
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.vertex_reserved(), COMPACT_VERTICES);
        assert_eq!(mesh.index_reserved(), COMPACT_INDICES);
    }

    #[test]
    fn oversized_reservation_reports_allocation_failure() {
        let builder = MeshBuilder::new(
            Arc::new(AtlasTable::default()),
            CapacityPolicy::Fixed {
                vertices: usize::MAX / 4,
                indices: 36,
            },
        );
        let result = builder.generate_mesh(&single(LocalPos::new(0, 0, 0), BlockId::STONE));
        assert!(matches!(
            result,
            Err(MeshError::AllocationFailed {
                buffer: BufferKind::Vertex,
                requested,
                ..
            }) if requested == usize::MAX / 4
        ));
    }

    #[test]
    fn cloned_mesh_holds_the_same_reservation() {
        let mesh = mesh_of(&single(LocalPos::new(2, 2, 2), BlockId::GRASS));
        let copy = mesh.clone();
        assert_eq!(copy, mesh);
        assert_eq!(copy.vertex_reserved(), WORST_CASE_VERTICES);
        assert_eq!(copy.index_reserved(), WORST_CASE_INDICES);
        assert!(copy.vertices.capacity() >= WORST_CASE_VERTICES);
        assert!(copy.indices.capacity() >= WORST_CASE_INDICES);

        let empty = Mesh::empty().clone();
        assert_eq!(empty.vertices.capacity(), 0);
        assert_eq!(empty.indices.capacity(), 0);
    }

    #[test]
    fn one_off_meshing_matches_a_shared_builder() {
        let mut grid = ChunkData::new_empty();
        grid.fill_box(LocalPos::new(1, 0, 1), LocalPos::new(3, 2, 2), BlockId::DIRT);
        grid.set(LocalPos::new(2, 3, 1), BlockId::LEAF);
        let builder = MeshBuilder::default();
        assert_eq!(mesh_of(&grid), builder.generate_mesh(&grid).expect("mesh"));
    }

    #[test]
    fn codes_without_an_atlas_row_are_rejected() {
        let pos = LocalPos::new(1, 2, 3);
        let err = generate_mesh(&single(pos, BlockId(9)), &AtlasTable::default())
            .expect_err("unknown code");
        assert!(matches!(
            err,
            MeshError::InvalidBlock { voxel, block } if voxel == pos && block == BlockId(9)
        ));

        // Code 7 has a row but no assigned tile.
        let mesh = mesh_of(&single(pos, BlockId(7)));
        assert_eq!(mesh.vertex_count(), 24);
        assert!(mesh
            .vertices()
            .iter()
            .all(|vertex| vertex.uv()[0] <= 0.0625 + UV_TOLERANCE));
    }

    #[test]
    fn neighbor_outside_the_chunk_reads_as_air() {
        let grid = ChunkData::new_filled(BlockId::STONE);
        let corner = LocalPos::new(0, 0, 0);
        assert_eq!(neighbor_block(&grid, corner, Face::Left), BlockId::AIR);
        assert_eq!(neighbor_block(&grid, corner, Face::Bottom), BlockId::AIR);
        assert_eq!(neighbor_block(&grid, corner, Face::Back), BlockId::AIR);
        assert_eq!(neighbor_block(&grid, corner, Face::Right), BlockId::STONE);

        let far = LocalPos::new(15, 63, 15);
        assert_eq!(neighbor_block(&grid, far, Face::Top), BlockId::AIR);
        assert_eq!(neighbor_block(&grid, far, Face::Front), BlockId::AIR);
        assert_eq!(neighbor_block(&grid, far, Face::Bottom), BlockId::STONE);
    }

    #[test]
    fn emit_face_appends_one_quad_at_the_current_offset() {
        let atlas = AtlasTable::default();
        let templates = FaceTemplates::unit_cube();
        let mut vertices = Vec::with_capacity(8);
        let mut indices = Vec::with_capacity(12);
        vertices.push(PackedVertex::default());
        vertices.push(PackedVertex::default());

        let quad = QuadDesc {
            pos: LocalPos::new(2, 3, 4),
            block: BlockId::GRASS,
            face: Face::Top,
        };
        emit_face(&templates, &atlas, quad, &mut vertices, &mut indices);

        assert_eq!(vertices.len(), 6);
        assert_eq!(indices, [2, 4, 3, 2, 5, 4]);
        assert!(vertices[2..].iter().all(|vertex| vertex.y == 8));
        let [u, v] = vertices[2].uv();
        assert!((u - 0.0).abs() <= UV_TOLERANCE);
        assert!((v - 0.9375).abs() <= UV_TOLERANCE);
    }

    #[test]
    fn capacity_sanitize_clamps_fixed_budgets() {
        assert_eq!(
            CapacityPolicy::Fixed {
                vertices: 3,
                indices: 0
            }
            .sanitize(),
            CapacityPolicy::Fixed {
                vertices: 24,
                indices: 36
            }
        );
        assert_eq!(
            CapacityPolicy::Fixed {
                vertices: usize::MAX,
                indices: usize::MAX
            }
            .sanitize()
            .limits(),
            (WORST_CASE_VERTICES, WORST_CASE_INDICES)
        );
        assert_eq!(CapacityPolicy::WorstCase.sanitize(), CapacityPolicy::WorstCase);
    }
}
