//! Voxel data model shared by the mesher and its tools: block codes and their
//! classification, cube faces, chunk coordinates and the dense chunk grid.

pub mod block;
pub mod chunk;
pub mod coords;
pub mod face;
