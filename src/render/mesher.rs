//! Chunk meshing: one instanced draw batch per block type
//!
//! Every solid voxel becomes one unit-cube instance at its world-space
//! center. There is no face culling or quad merging, so buried voxels are
//! drawn too; greedy meshing would be the first optimisation to add here
//! and would not change the voxel contract.

use std::collections::BTreeMap;

use crate::core::types::{Mat4, Vec3};
use crate::voxel::block::{BlockId, BlockTypeTable};
use crate::voxel::chunk::{Chunk, ChunkCoord, VoxelGrid};

/// Lightweight description of a submitted batch, kept by the chunk so the
/// renderer can later be asked to release it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchHandle {
    pub block_type: BlockId,
    pub instance_count: usize,
}

/// What a chunk remembers about the geometry the renderer holds for it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeometryHandle {
    pub coord: ChunkCoord,
    /// Chunk generation the geometry was built from
    pub generation: u32,
    pub batches: Vec<BatchHandle>,
}

/// All instances of one block type within a chunk
#[derive(Clone, Debug, PartialEq)]
pub struct DrawBatch {
    pub block_type: BlockId,
    /// 0xRRGGBB color from the block table
    pub color: u32,
    /// World-space cube centers, one per voxel
    pub instances: Vec<Vec3>,
}

impl DrawBatch {
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Per-instance model matrices (unit cube translated to the voxel center)
    pub fn instance_transforms(&self) -> impl Iterator<Item = Mat4> + '_ {
        self.instances.iter().map(|&center| Mat4::from_translation(center))
    }

    /// Raw instance buffer contents (tightly packed `[f32; 3]` centers)
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn handle(&self) -> BatchHandle {
        BatchHandle {
            block_type: self.block_type,
            instance_count: self.instances.len(),
        }
    }
}

/// Geometry for a whole chunk, ready to hand to a renderer
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    pub generation: u32,
    /// Ordered by block type id
    pub batches: Vec<DrawBatch>,
}

impl ChunkMesh {
    pub fn handle(&self) -> GeometryHandle {
        GeometryHandle {
            coord: self.coord,
            generation: self.generation,
            batches: self.batches.iter().map(DrawBatch::handle).collect(),
        }
    }

    /// Total instances across all batches
    pub fn instance_count(&self) -> usize {
        self.batches.iter().map(DrawBatch::instance_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// Converts chunk voxels into draw batches
pub struct ChunkMesher;

impl ChunkMesher {
    /// Build the mesh for a loaded chunk
    pub fn build(chunk: &Chunk, table: &BlockTypeTable) -> ChunkMesh {
        Self::build_grid(chunk.coord, chunk.generation, &chunk.voxels, table)
    }

    /// Build a mesh straight from a voxel grid.
    ///
    /// Panics if the grid holds a block id missing from `table`.
    pub fn build_grid(
        coord: ChunkCoord,
        generation: u32,
        grid: &VoxelGrid,
        table: &BlockTypeTable,
    ) -> ChunkMesh {
        let (ox, oz) = coord.world_origin(grid.size());

        let mut by_type: BTreeMap<BlockId, Vec<Vec3>> = BTreeMap::new();
        for (x, y, z, id) in grid.solid_voxels() {
            by_type.entry(id).or_default().push(Vec3::new(
                (ox + x as i32) as f32 + 0.5,
                y as f32 + 0.5,
                (oz + z as i32) as f32 + 0.5,
            ));
        }

        let batches = by_type
            .into_iter()
            .map(|(block_type, mut instances)| {
                instances.shrink_to_fit();
                DrawBatch {
                    block_type,
                    color: table[block_type].color,
                    instances,
                }
            })
            .collect();

        ChunkMesh { coord, generation, batches }
    }
}
