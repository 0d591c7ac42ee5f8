//! Voxel data structures and the chunk store

pub mod block;
pub mod chunk;
pub mod invalidator;
pub mod store;

pub use block::{BlockId, BlockType, BlockTypeTable, AIR};
pub use chunk::{Chunk, ChunkCoord, VoxelGrid, WORLD_LIMIT};
pub use invalidator::ChunkInvalidator;
pub use store::{ChunkStore, StreamingReport};
