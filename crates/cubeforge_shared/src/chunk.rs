use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::block::BlockId;
use crate::coords::{local_to_index, LocalPos, CHUNK_VOLUME};

/// Dense voxel grid of one chunk, stored in `local_to_index` order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkData {
    pub blocks: Box<[BlockId; CHUNK_VOLUME]>,
}

impl ChunkData {
    pub fn new_empty() -> Self {
        Self::new_filled(BlockId::AIR)
    }

    pub fn new_filled(block: BlockId) -> Self {
        let blocks: Box<[BlockId; CHUNK_VOLUME]> = vec![block; CHUNK_VOLUME]
            .into_boxed_slice()
            .try_into()
            .unwrap_or_else(|_| unreachable!("vector has exactly CHUNK_VOLUME entries"));
        Self { blocks }
    }

    pub fn get(&self, local: LocalPos) -> BlockId {
        self.blocks[local_to_index(local)]
    }

    pub fn set(&mut self, local: LocalPos, block: BlockId) {
        let index = local_to_index(local);
        self.blocks[index] = block;
    }

    pub fn get_index(&self, index: usize) -> BlockId {
        self.blocks[index]
    }

    pub fn set_index(&mut self, index: usize, block: BlockId) {
        self.blocks[index] = block;
    }

    /// Fills the inclusive box spanned by `min` and `max`.
    pub fn fill_box(&mut self, min: LocalPos, max: LocalPos, block: BlockId) {
        for x in min.x.min(max.x)..=min.x.max(max.x) {
            for y in min.y.min(max.y)..=min.y.max(max.y) {
                for z in min.z.min(max.z)..=min.z.max(max.z) {
                    self.set(LocalPos::new(x, y, z), block);
                }
            }
        }
    }

    /// Number of voxels that are not air.
    pub fn solid_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|&&block| block != BlockId::AIR)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|&block| block == BlockId::AIR)
    }
}

impl Default for ChunkData {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl Serialize for ChunkData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.blocks.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ChunkData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let blocks = Box::<[BlockId]>::deserialize(deserializer)?;
        let len = blocks.len();
        let blocks = blocks
            .try_into()
            .map_err(|_| de::Error::invalid_length(len, &"one block per voxel of the chunk"))?;
        Ok(Self { blocks })
    }
}
