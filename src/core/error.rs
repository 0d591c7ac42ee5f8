//! Error types for the voxel world

use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("y = {y} is outside the world height range [0, {height})")]
    OutOfHeightRange { y: i32, height: usize },

    #[error("({x}, {z}) is outside the world")]
    OutOfWorldBounds { x: i32, z: i32 },

    #[error("Unknown block type id {0}")]
    UnknownBlockType(i16),
}
