use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Number of block codes the atlas table reserves rows for.
pub const MAX_BLOCK_TYPES: usize = 8;

#[repr(transparent)]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Pod,
    Zeroable,
)]
pub struct BlockId(pub u8);

impl BlockId {
    pub const AIR: Self = Self(0);
    pub const GRASS: Self = Self(1);
    pub const DIRT: Self = Self(2);
    pub const STONE: Self = Self(3);
    pub const SAND: Self = Self(4);
    pub const LOG: Self = Self(5);
    pub const LEAF: Self = Self(6);

    /// Every named block, in code order.
    pub const ALL: [Self; 7] = [
        Self::AIR,
        Self::GRASS,
        Self::DIRT,
        Self::STONE,
        Self::SAND,
        Self::LOG,
        Self::LEAF,
    ];

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::AIR => "air",
            Self::GRASS => "grass",
            Self::DIRT => "dirt",
            Self::STONE => "stone",
            Self::SAND => "sand",
            Self::LOG => "log",
            Self::LEAF => "leaf",
            _ => return None,
        };
        Some(name)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|block| block.name() == Some(name))
    }

    /// True when the code has a row in the atlas table.
    pub fn has_atlas_slot(self) -> bool {
        usize::from(self.0) < MAX_BLOCK_TYPES
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "block#{}", self.0),
        }
    }
}

/// Whether light (and the viewer) passes through `block`.
///
/// This is the only predicate face culling consults: a face is drawn when the
/// block in front of it is transparent.
pub fn is_transparent(block: BlockId) -> bool {
    matches!(block, BlockId::AIR | BlockId::LEAF)
}

pub fn is_opaque(block: BlockId) -> bool {
    !is_transparent(block)
}
