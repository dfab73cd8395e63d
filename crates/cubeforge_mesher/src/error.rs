use std::collections::TryReserveError;
use std::fmt;

use cubeforge_shared::block::BlockId;
use cubeforge_shared::coords::LocalPos;

/// Which of the two mesh buffers a fault refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Index => f.write_str("index"),
        }
    }
}

/// Post-generation check that failed on the buffer guard.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntegrityFault {
    SentinelCorrupted {
        name: &'static str,
        expected: u32,
        found: u32,
    },
    Overrun {
        buffer: BufferKind,
        used: usize,
        reserved: usize,
    },
    Reallocated {
        buffer: BufferKind,
        reserved: usize,
        capacity: usize,
    },
}

impl fmt::Display for IntegrityFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SentinelCorrupted {
                name,
                expected,
                found,
            } => write!(
                f,
                "{name} sentinel corrupted: expected {expected:#010X}, found {found:#010X}"
            ),
            Self::Overrun {
                buffer,
                used,
                reserved,
            } => write!(
                f,
                "{buffer} buffer holds {used} entries but only {reserved} were reserved"
            ),
            Self::Reallocated {
                buffer,
                reserved,
                capacity,
            } => write!(
                f,
                "{buffer} buffer was reallocated: reserved {reserved}, capacity now {capacity}"
            ),
        }
    }
}

/// Fatal outcome of meshing one chunk. No partial mesh accompanies any of these.
#[derive(Debug)]
pub enum MeshError {
    AllocationFailed {
        buffer: BufferKind,
        requested: usize,
        source: TryReserveError,
    },
    CapacityOverflow {
        voxel: LocalPos,
        vertices_used: usize,
        vertex_capacity: usize,
        indices_used: usize,
        index_capacity: usize,
    },
    IntegrityViolation(IntegrityFault),
    InvalidBlock {
        voxel: LocalPos,
        block: BlockId,
    },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed {
                buffer,
                requested,
                source,
            } => write!(
                f,
                "failed to reserve {requested} {buffer} buffer entries: {source}"
            ),
            Self::CapacityOverflow {
                voxel,
                vertices_used,
                vertex_capacity,
                indices_used,
                index_capacity,
            } => write!(
                f,
                "mesh capacity exhausted at voxel ({}, {}, {}): {vertices_used}/{vertex_capacity} vertices, {indices_used}/{index_capacity} indices",
                voxel.x, voxel.y, voxel.z
            ),
            Self::IntegrityViolation(fault) => write!(f, "mesh buffer integrity violated: {fault}"),
            Self::InvalidBlock { voxel, block } => write!(
                f,
                "voxel ({}, {}, {}) holds {block}, which has no atlas entry",
                voxel.x, voxel.y, voxel.z
            ),
        }
    }
}

impl std::error::Error for MeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AllocationFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<IntegrityFault> for MeshError {
    fn from(fault: IntegrityFault) -> Self {
        Self::IntegrityViolation(fault)
    }
}
