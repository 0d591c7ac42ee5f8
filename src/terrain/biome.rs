//! Biome system: a single low-frequency scalar blended across three biomes

use serde::{Deserialize, Serialize};

use super::generator::TerrainParams;
use super::noise_field::NoiseField;
use crate::voxel::block::{ids, BlockId};

/// Biome types, in tie-break priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Desert,
    Plains,
    Hills,
}

impl Biome {
    /// All biomes, in tie-break priority order
    pub const ALL: [Biome; 3] = [Biome::Desert, Biome::Plains, Biome::Hills];

    /// Position of this biome's center on the biome scalar axis
    pub fn center(&self) -> f64 {
        match self {
            Biome::Desert => 1.0 / 6.0,
            Biome::Plains => 0.5,
            Biome::Hills => 5.0 / 6.0,
        }
    }
}

/// Half-width of each biome's triangular weight window
pub const BIOME_BLEND_RADIUS: f64 = 1.0 / 6.0;

/// Raw window weights below this count as zero, so both window gaps behave alike
const WEIGHT_EPSILON: f64 = 1e-12;

/// Per-biome height field and layering parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeParams {
    /// Horizontal noise frequency
    pub frequency: f64,
    /// Height variation above/below the base
    pub amplitude: f64,
    /// Height the noise is centered on
    pub base_height: f64,
    /// Noise z-offset used to decorrelate biomes
    pub channel: f64,
    /// Top block of a column
    pub surface_block: BlockId,
    /// Blocks just under the surface
    pub subsurface_block: BlockId,
}

impl BiomeParams {
    /// Shallow sandy dunes
    pub fn desert() -> Self {
        Self {
            frequency: 0.03,
            amplitude: 4.0,
            base_height: 32.0,
            channel: 1.0,
            surface_block: ids::SAND,
            subsurface_block: ids::SAND,
        }
    }

    /// Large, gentle rolling grassland
    pub fn plains() -> Self {
        Self {
            frequency: 0.01,
            amplitude: 6.0,
            base_height: 30.0,
            channel: 2.0,
            surface_block: ids::GRASS,
            subsurface_block: ids::DIRT,
        }
    }

    /// Tall grassy hills
    pub fn hills() -> Self {
        Self {
            frequency: 0.015,
            amplitude: 20.0,
            base_height: 28.0,
            channel: 3.0,
            surface_block: ids::GRASS,
            subsurface_block: ids::DIRT,
        }
    }
}

/// Normalised blend weights of the three biomes for one column
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeWeights {
    pub desert: f64,
    pub plains: f64,
    pub hills: f64,
}

impl BiomeWeights {
    /// Weights for a biome scalar `b` (nominally in `[0, 1]`)
    pub fn from_scalar(b: f64) -> Self {
        let raw = |biome: Biome| {
            let w = 1.0 - (b - biome.center()).abs() / BIOME_BLEND_RADIUS;
            if w > WEIGHT_EPSILON { w } else { 0.0 }
        };
        let (desert, plains, hills) = (raw(Biome::Desert), raw(Biome::Plains), raw(Biome::Hills));

        let sum = desert + plains + hills;
        if sum > 0.0 {
            Self {
                desert: desert / sum,
                plains: plains / sum,
                hills: hills / sum,
            }
        } else {
            // Exactly between two windows (or b out of range): all desert
            Self::only(Biome::Desert)
        }
    }

    /// Weights fully committed to one biome
    pub fn only(biome: Biome) -> Self {
        let mut w = Self { desert: 0.0, plains: 0.0, hills: 0.0 };
        *w.get_mut(biome) = 1.0;
        w
    }

    pub fn get(&self, biome: Biome) -> f64 {
        match biome {
            Biome::Desert => self.desert,
            Biome::Plains => self.plains,
            Biome::Hills => self.hills,
        }
    }

    fn get_mut(&mut self, biome: Biome) -> &mut f64 {
        match biome {
            Biome::Desert => &mut self.desert,
            Biome::Plains => &mut self.plains,
            Biome::Hills => &mut self.hills,
        }
    }

    pub fn sum(&self) -> f64 {
        self.desert + self.plains + self.hills
    }

    /// Biome with the largest weight; ties go desert, then plains, then hills
    pub fn dominant_biome(&self) -> Biome {
        if self.desert >= self.plains && self.desert >= self.hills {
            Biome::Desert
        } else if self.plains >= self.hills {
            Biome::Plains
        } else {
            Biome::Hills
        }
    }
}

/// Column-level terrain model: biome weights, heights and block layering
#[derive(Clone)]
pub struct BiomeModel {
    noise: NoiseField,
    params: TerrainParams,
}

impl BiomeModel {
    /// Create a model from terrain parameters (seeded by `params.seed`)
    pub fn new(params: TerrainParams) -> Self {
        Self {
            noise: NoiseField::new(params.seed),
            params,
        }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Raw biome scalar in `[0, 1]`
    pub fn biome_scalar(&self, wx: f64, wz: f64) -> f64 {
        let f = self.params.biome_frequency;
        (self.noise.sample(wx * f, wz * f, 0.0) + 1.0) * 0.5
    }

    /// Blend weights for the column at (wx, wz)
    pub fn biome_weights(&self, wx: f64, wz: f64) -> BiomeWeights {
        BiomeWeights::from_scalar(self.biome_scalar(wx, wz))
    }

    /// Height this biome alone would give the column at (wx, wz)
    pub fn height_for(&self, biome: Biome, wx: f64, wz: f64) -> f64 {
        let p = self.params.biome(biome);
        let n = self.noise.sample(wx * p.frequency, wz * p.frequency, p.channel);
        n * p.amplitude + p.base_height
    }

    /// Weighted blend of the three biome heights
    pub fn blended_height(&self, weights: &BiomeWeights, wx: f64, wz: f64) -> f64 {
        Biome::ALL
            .iter()
            .map(|&biome| weights.get(biome) * self.height_for(biome, wx, wz))
            .sum()
    }

    /// Unrounded terrain height of the column at (wx, wz)
    pub fn terrain_height(&self, wx: f64, wz: f64) -> f64 {
        let weights = self.biome_weights(wx, wz);
        self.blended_height(&weights, wx, wz)
    }

    /// Rounded surface height clamped into `[0, chunk_height)`, for spawning
    pub fn surface_height(&self, wx: f64, wz: f64, chunk_height: usize) -> i32 {
        let top = chunk_height.saturating_sub(1) as i32;
        (self.terrain_height(wx, wz).round() as i32).clamp(0, top)
    }

    /// Block for a cell `depth` blocks under the column's surface
    pub fn block_for_layer(&self, biome: Biome, depth: i32) -> BlockId {
        let p = self.params.biome(biome);
        if depth <= 0 {
            p.surface_block
        } else if depth <= self.params.subsurface_depth {
            p.subsurface_block
        } else {
            self.params.stone_block
        }
    }
}
