//! Chunk meshing: turns a voxel grid into culled, atlas-textured quads packed
//! for GPU upload.

pub mod atlas;
pub mod chunk;
pub mod error;
pub mod guard;
pub mod mesh;
pub mod settings;
pub mod templates;
pub mod vertex;
pub mod worker;

pub use atlas::{AtlasError, AtlasTable};
pub use chunk::Chunk;
pub use error::MeshError;
pub use mesh::{generate_mesh, CapacityPolicy, Mesh, MeshBuilder};
pub use settings::{MesherSettings, SettingsError};
pub use vertex::PackedVertex;
pub use worker::{generate_meshes, MeshRequest, MeshResult, MeshWorker};
