use cubeforge_shared::block::BlockId;
use cubeforge_shared::chunk::ChunkData;
use cubeforge_shared::coords::{chunk_origin, chunk_to_world, ChunkPos, LocalPos};
use glam::IVec3;

use crate::error::MeshError;
use crate::mesh::{Mesh, MeshBuilder};

/// A chunk as the streaming layer sees it: voxels, their current mesh, and
/// bookkeeping flags the mesher itself never reads.
#[derive(Clone, Debug)]
pub struct Chunk {
    pub pos: ChunkPos,
    blocks: ChunkData,
    mesh: Mesh,
    version: u64,
    mesh_version: Option<u64>,
    pub staged: bool,
    pub visible: bool,
    pub age: u32,
}

impl Chunk {
    /// A chunk whose mesh still has to be built.
    pub fn new(pos: ChunkPos, blocks: ChunkData) -> Self {
        Self {
            pos,
            blocks,
            mesh: Mesh::empty(),
            version: 0,
            mesh_version: None,
            staged: false,
            visible: false,
            age: 0,
        }
    }

    pub fn origin(&self) -> IVec3 {
        chunk_origin(self.pos)
    }

    pub fn world_position(&self, local: LocalPos) -> IVec3 {
        chunk_to_world(self.pos, local)
    }

    pub fn blocks(&self) -> &ChunkData {
        &self.blocks
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Edit counter of the voxel grid. Tag background mesh requests with it
    /// and hand it back to `install_mesh`.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// True unless the installed mesh was built from the current grid.
    pub fn is_stale(&self) -> bool {
        self.mesh_version != Some(self.version)
    }

    pub fn block(&self, local: LocalPos) -> BlockId {
        self.blocks.get(local)
    }

    /// Writes one voxel. The mesh goes stale only when the value changes.
    pub fn set_block(&mut self, local: LocalPos, block: BlockId) {
        if self.blocks.get(local) != block {
            self.blocks.set(local, block);
            self.version += 1;
        }
    }

    /// Swaps in a whole new grid and marks the mesh stale.
    pub fn replace_blocks(&mut self, blocks: ChunkData) -> ChunkData {
        self.version += 1;
        std::mem::replace(&mut self.blocks, blocks)
    }

    /// Rebuilds the mesh and hands back the one it replaces.
    ///
    /// On error the current mesh stays installed and the chunk stays stale.
    pub fn remesh(&mut self, builder: &MeshBuilder) -> Result<Mesh, MeshError> {
        let mesh = builder.generate_mesh(&self.blocks)?;
        Ok(self.install_mesh(mesh, self.version))
    }

    /// Installs a mesh produced elsewhere, such as by a `MeshWorker`, and
    /// hands back the one it replaces.
    ///
    /// `built_from` is the `version` of the grid snapshot that was meshed. If
    /// the grid has been edited since, the mesh is still shown but the chunk
    /// stays stale.
    pub fn install_mesh(&mut self, mesh: Mesh, built_from: u64) -> Mesh {
        self.mesh_version = Some(built_from);
        std::mem::replace(&mut self.mesh, mesh)
    }
}
