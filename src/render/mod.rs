//! Geometry building and the renderer boundary
//!
//! The core never owns GPU resources. It builds [`ChunkMesh`]es, hands them
//! to a [`Renderer`], and later asks the renderer to release and remove them.

pub mod mesher;
pub mod recording;

pub use mesher::{BatchHandle, ChunkMesh, ChunkMesher, DrawBatch, GeometryHandle};
pub use recording::{RecordingRenderer, RenderEvent, RenderStats};

use crate::voxel::chunk::ChunkCoord;

/// Display backend the voxel core submits chunk geometry to
pub trait Renderer {
    /// Take ownership of a chunk's geometry and start drawing it
    fn submit_geometry(&mut self, mesh: ChunkMesh);

    /// Stop drawing a chunk's geometry
    fn remove_geometry(&mut self, coord: ChunkCoord);

    /// Free the GPU-side resources behind one batch of a chunk's geometry.
    ///
    /// Called for every batch before the chunk's geometry is removed or
    /// replaced.
    fn release_batch_resources(&mut self, coord: ChunkCoord, batch: &BatchHandle);
}
