//! World configuration
//!
//! Plain structs whose `Default` impls carry the stock world. Any subset of
//! fields can be overridden from a JSON file; missing fields keep defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::physics::PlayerConfig;
use crate::terrain::biome::Biome;
use crate::terrain::generator::TerrainParams;
use crate::voxel::block::BlockTypeTable;

/// When chunk geometry is rebuilt after a voxel edit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebuildPolicy {
    /// Rebuild and resubmit inside the edit call
    Immediate,
    /// Mark the chunk dirty; rebuild once on the next flush
    #[default]
    PerFrame,
}

/// Configuration for a voxel world
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Horizontal chunk edge length in blocks
    pub chunk_size: usize,
    /// World height in blocks
    pub chunk_height: usize,
    /// Chunks loaded around the player (Chebyshev radius, in chunks)
    pub streaming_radius: i32,
    /// Terrain generation parameters (includes the world seed)
    pub terrain: TerrainParams,
    /// Block palette
    pub blocks: BlockTypeTable,
    /// Player volume and movement tuning
    pub player: PlayerConfig,
    pub rebuild_policy: RebuildPolicy,
    /// Generate newly streamed chunks on the rayon pool
    pub parallel_generation: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            chunk_height: 64,
            streaming_radius: 6,
            terrain: TerrainParams::default(),
            blocks: BlockTypeTable::default(),
            player: PlayerConfig::default(),
            rebuild_policy: RebuildPolicy::default(),
            parallel_generation: true,
        }
    }
}

impl WorldConfig {
    /// Default world with a different seed
    pub fn with_seed(seed: u32) -> Self {
        let mut config = Self::default();
        config.terrain.seed = seed;
        config
    }

    pub fn seed(&self) -> u32 {
        self.terrain.seed
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded world config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Write this config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Reject configs the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be positive".into()));
        }
        if self.chunk_height == 0 || self.chunk_height > i32::MAX as usize {
            return Err(Error::Config(format!("chunk_height {} out of range", self.chunk_height)));
        }
        if self.streaming_radius < 0 {
            return Err(Error::Config("streaming_radius must not be negative".into()));
        }
        if self.blocks.is_empty() || self.blocks.len() > i16::MAX as usize {
            return Err(Error::Config(format!("block table has {} entries", self.blocks.len())));
        }

        let terrain = &self.terrain;
        for biome in Biome::ALL {
            let params = terrain.biome(biome);
            for id in [params.surface_block, params.subsurface_block] {
                if !self.blocks.contains(id) {
                    return Err(Error::UnknownBlockType(id));
                }
            }
        }
        if !self.blocks.contains(terrain.stone_block) {
            return Err(Error::UnknownBlockType(terrain.stone_block));
        }
        if terrain.subsurface_depth < 0 {
            return Err(Error::Config("subsurface_depth must not be negative".into()));
        }

        if self.player.radius <= 0.0 || self.player.height <= 0.0 {
            return Err(Error::Config("player dimensions must be positive".into()));
        }

        Ok(())
    }
}
