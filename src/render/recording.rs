//! In-memory renderer that records the geometry traffic it receives
//!
//! Stands in for a real GPU backend in headless runs and tests. It keeps
//! the set of live chunk meshes and flags the two resource mistakes the
//! core must never make: submitting over geometry that was not removed,
//! and removing geometry whose batches were not released first.

use std::collections::HashMap;

use serde::Serialize;

use super::mesher::{BatchHandle, ChunkMesh};
use super::Renderer;
use crate::voxel::chunk::ChunkCoord;

/// One call received from the core
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderEvent {
    Submit { coord: ChunkCoord, generation: u32, batches: usize },
    Remove { coord: ChunkCoord },
    Release { coord: ChunkCoord, batch: BatchHandle },
}

/// Running totals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    pub submissions: usize,
    pub removals: usize,
    pub releases: usize,
    /// Submissions that landed on a coord whose old geometry was still live
    pub overwritten: usize,
    /// Batches still unreleased when their geometry was removed
    pub leaked_batches: usize,
}

struct LiveGeometry {
    generation: u32,
    mesh: ChunkMesh,
    released: usize,
}

/// Renderer that only keeps books
#[derive(Default)]
pub struct RecordingRenderer {
    live: HashMap<ChunkCoord, LiveGeometry>,
    stats: RenderStats,
    events: Vec<RenderEvent>,
    record_events: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also keep the full call log (tests); off by default to bound memory
    pub fn with_event_log() -> Self {
        Self {
            record_events: true,
            ..Self::default()
        }
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Check if a chunk currently has geometry on screen
    pub fn is_live(&self, coord: ChunkCoord) -> bool {
        self.live.contains_key(&coord)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Generation of the live geometry for a chunk
    pub fn live_generation(&self, coord: ChunkCoord) -> Option<u32> {
        self.live.get(&coord).map(|g| g.generation)
    }

    /// The mesh currently displayed for a chunk
    pub fn live_mesh(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.live.get(&coord).map(|g| &g.mesh)
    }

    /// Total cube instances across every live chunk
    pub fn live_instance_count(&self) -> usize {
        self.live.values().map(|g| g.mesh.instance_count()).sum()
    }

    /// Number of `Submit` events for one chunk in the event log
    pub fn submissions_for(&self, coord: ChunkCoord) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, RenderEvent::Submit { coord: c, .. } if *c == coord))
            .count()
    }

    fn push(&mut self, event: RenderEvent) {
        if self.record_events {
            self.events.push(event);
        }
    }
}

impl Renderer for RecordingRenderer {
    fn submit_geometry(&mut self, mesh: ChunkMesh) {
        let coord = mesh.coord;
        let generation = mesh.generation;
        self.stats.submissions += 1;
        self.push(RenderEvent::Submit { coord, generation, batches: mesh.batches.len() });

        let previous = self.live.insert(coord, LiveGeometry { generation, mesh, released: 0 });
        if previous.is_some() {
            log::warn!("Chunk {:?} resubmitted without removing its old geometry", coord);
            self.stats.overwritten += 1;
        }
    }

    fn remove_geometry(&mut self, coord: ChunkCoord) {
        self.stats.removals += 1;
        self.push(RenderEvent::Remove { coord });

        if let Some(geometry) = self.live.remove(&coord) {
            let leaked = geometry.mesh.batches.len().saturating_sub(geometry.released);
            if leaked > 0 {
                log::warn!("Chunk {:?} removed with {} unreleased batches", coord, leaked);
                self.stats.leaked_batches += leaked;
            }
        }
    }

    fn release_batch_resources(&mut self, coord: ChunkCoord, batch: &BatchHandle) {
        self.stats.releases += 1;
        self.push(RenderEvent::Release { coord, batch: *batch });

        if let Some(geometry) = self.live.get_mut(&coord) {
            geometry.released += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::mesher::DrawBatch;
    use glam::Vec3;

    fn mesh(coord: ChunkCoord, generation: u32, batches: usize) -> ChunkMesh {
        ChunkMesh {
            coord,
            generation,
            batches: (0..batches as i16)
                .map(|id| DrawBatch { block_type: id, color: 0, instances: vec![Vec3::ZERO] })
                .collect(),
        }
    }

    #[test]
    fn test_submit_and_remove_cleanly() {
        let mut renderer = RecordingRenderer::with_event_log();
        let coord = ChunkCoord::new(1, 1);
        let m = mesh(coord, 0, 2);
        let handles = m.handle().batches;

        renderer.submit_geometry(m);
        assert!(renderer.is_live(coord));
        assert_eq!(renderer.live_instance_count(), 2);

        for batch in &handles {
            renderer.release_batch_resources(coord, batch);
        }
        renderer.remove_geometry(coord);

        assert!(!renderer.is_live(coord));
        let stats = renderer.stats();
        assert_eq!(stats.submissions, 1);
        assert_eq!(stats.releases, 2);
        assert_eq!(stats.leaked_batches, 0);
        assert_eq!(stats.overwritten, 0);
        assert_eq!(renderer.events().len(), 4);
    }

    #[test]
    fn test_detects_leaks() {
        let mut renderer = RecordingRenderer::new();
        let coord = ChunkCoord::new(0, 0);

        renderer.submit_geometry(mesh(coord, 0, 3));
        renderer.submit_geometry(mesh(coord, 1, 3));
        assert_eq!(renderer.stats().overwritten, 1);
        assert_eq!(renderer.live_generation(coord), Some(1));

        renderer.remove_geometry(coord);
        assert_eq!(renderer.stats().leaked_batches, 3);
        // No log kept unless asked for
        assert!(renderer.events().is_empty());
    }

    #[test]
    fn test_submissions_for() {
        let mut renderer = RecordingRenderer::with_event_log();
        let a = ChunkCoord::new(0, 0);
        let b = ChunkCoord::new(0, 1);
        renderer.submit_geometry(mesh(a, 0, 1));
        renderer.submit_geometry(mesh(b, 0, 1));
        renderer.remove_geometry(a);
        renderer.submit_geometry(mesh(a, 1, 1));

        assert_eq!(renderer.submissions_for(a), 2);
        assert_eq!(renderer.submissions_for(b), 1);
    }
}
