//! Blockfield - a chunked voxel world
//!
//! Procedural terrain is generated per chunk, streamed around the player,
//! turned into instanced draw batches for an external renderer and used for
//! axis-aligned player collision.

pub mod config;
pub mod core;
pub mod math;
pub mod physics;
pub mod render;
pub mod terrain;
pub mod voxel;

pub use config::{RebuildPolicy, WorldConfig};
pub use core::{Error, Result};
