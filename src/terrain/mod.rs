//! Procedural terrain generation

pub mod noise_field;
pub use noise_field::NoiseField;

pub mod generator;
pub use generator::{ColumnSample, TerrainGenerator, TerrainParams};

pub mod biome;
pub use biome::{Biome, BiomeModel, BiomeParams, BiomeWeights};
