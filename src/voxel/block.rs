//! Block type identifiers and the block palette

use serde::{Deserialize, Serialize};

/// Block type identifier. Negative values are air.
pub type BlockId = i16;

/// Empty/air block
pub const AIR: BlockId = -1;

/// Ids of the blocks in the default palette
pub mod ids {
    use super::BlockId;

    pub const GRASS: BlockId = 0;
    pub const DIRT: BlockId = 1;
    pub const STONE: BlockId = 2;
    pub const WATER: BlockId = 3;
    pub const SNOW: BlockId = 4;
    pub const PURPLE: BlockId = 5;
    pub const SAND: BlockId = 6;
}

/// Check if a block id is air
#[inline]
pub fn is_air(id: BlockId) -> bool {
    id < 0
}

/// Display description of one block type
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockType {
    pub name: String,
    /// 0xRRGGBB display color
    pub color: u32,
}

impl BlockType {
    pub fn new(name: impl Into<String>, color: u32) -> Self {
        Self { name: name.into(), color }
    }

    /// Split the color into 8-bit channels
    pub fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.color >> 16) & 0xFF) as u8,
            ((self.color >> 8) & 0xFF) as u8,
            (self.color & 0xFF) as u8,
        )
    }
}

/// Ordered block palette, indexed by [`BlockId`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockTypeTable {
    types: Vec<BlockType>,
}

impl BlockTypeTable {
    pub fn new(types: Vec<BlockType>) -> Self {
        Self { types }
    }

    /// Look up a block type. `None` for air and for ids past the end.
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        if is_air(id) {
            return None;
        }
        self.types.get(id as usize)
    }

    /// Check if `id` names a real (non-air) entry of this table
    pub fn contains(&self, id: BlockId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.types.iter()
    }
}

impl std::ops::Index<BlockId> for BlockTypeTable {
    type Output = BlockType;

    /// Panics on air or unknown ids; callers validate ids on the way in.
    fn index(&self, id: BlockId) -> &BlockType {
        assert!(!is_air(id), "air has no block type entry");
        &self.types[id as usize]
    }
}

impl Default for BlockTypeTable {
    fn default() -> Self {
        Self::new(vec![
            BlockType::new("grass", 0x003300),
            BlockType::new("dirt", 0x8B4513),
            BlockType::new("stone", 0xA9A9A9),
            BlockType::new("water", 0x0000FF),
            BlockType::new("snow", 0xFFFFFF),
            BlockType::new("purple", 0xFF00FF),
            BlockType::new("sand", 0xDEBF90),
        ])
    }
}
