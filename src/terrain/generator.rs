//! Noise-based procedural terrain generation

use serde::{Deserialize, Serialize};

use super::biome::{Biome, BiomeModel, BiomeParams, BiomeWeights};
use crate::voxel::block::{ids, BlockId};
use crate::voxel::chunk::{ChunkCoord, VoxelGrid};

/// Parameters controlling terrain generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub seed: u32,
    /// Frequency of the biome selection noise (very low = wide biomes)
    pub biome_frequency: f64,
    pub desert: BiomeParams,
    pub plains: BiomeParams,
    pub hills: BiomeParams,
    /// Block used below the subsurface layers
    pub stone_block: BlockId,
    /// Number of subsurface blocks under the surface block
    pub subsurface_depth: i32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            biome_frequency: 0.001,
            desert: BiomeParams::desert(),
            plains: BiomeParams::plains(),
            hills: BiomeParams::hills(),
            stone_block: ids::STONE,
            subsurface_depth: 3,
        }
    }
}

impl TerrainParams {
    /// Parameters of one biome
    pub fn biome(&self, biome: Biome) -> &BiomeParams {
        match biome {
            Biome::Desert => &self.desert,
            Biome::Plains => &self.plains,
            Biome::Hills => &self.hills,
        }
    }
}

/// Everything the generator needs to know about one world column
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSample {
    pub weights: BiomeWeights,
    pub biome: Biome,
    /// Rounded, unclamped terrain height
    pub height: i32,
}

/// Procedural terrain generator filling whole chunk columns
#[derive(Clone)]
pub struct TerrainGenerator {
    model: BiomeModel,
    chunk_size: usize,
    chunk_height: usize,
}

impl TerrainGenerator {
    /// Create a new terrain generator for chunks of the given dimensions
    pub fn new(params: TerrainParams, chunk_size: usize, chunk_height: usize) -> Self {
        Self {
            model: BiomeModel::new(params),
            chunk_size,
            chunk_height,
        }
    }

    /// Get the underlying biome model
    pub fn model(&self) -> &BiomeModel {
        &self.model
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_height(&self) -> usize {
        self.chunk_height
    }

    /// Sample biome weights, dominant biome and height for a world column
    pub fn column(&self, wx: i32, wz: i32) -> ColumnSample {
        let (x, z) = (wx as f64, wz as f64);
        let weights = self.model.biome_weights(x, z);
        let height = self.model.blended_height(&weights, x, z).round() as i32;
        ColumnSample {
            weights,
            biome: weights.dominant_biome(),
            height,
        }
    }

    /// Generate the voxels of one chunk.
    ///
    /// Depends only on the seed and `coord`, never on other chunks.
    pub fn generate(&self, coord: ChunkCoord) -> VoxelGrid {
        let mut grid = VoxelGrid::new(self.chunk_size, self.chunk_height);
        let (ox, oz) = coord.world_origin(self.chunk_size);
        let top = self.chunk_height as i32 - 1;

        for lx in 0..self.chunk_size {
            for lz in 0..self.chunk_size {
                let column = self.column(ox + lx as i32, oz + lz as i32);

                for y in 0..=column.height.min(top) {
                    let block = self.model.block_for_layer(column.biome, column.height - y);
                    grid.set(lx, y as usize, lz, block);
                }
            }
        }

        grid
    }
}
