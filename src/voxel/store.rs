//! Chunk store: the loaded part of the world, streamed around the player
//!
//! The store owns every loaded [`Chunk`] and is the only thing that mutates
//! them. Geometry lives in the [`Renderer`]; each chunk keeps a handle to what
//! it submitted so the store can ask for it to be released and removed.

use std::collections::HashMap;

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use super::block::{BlockId, BlockTypeTable, AIR};
use super::chunk::{Chunk, ChunkCoord};
use super::invalidator::ChunkInvalidator;
use crate::config::{RebuildPolicy, WorldConfig};
use crate::core::{Error, Result};
use crate::physics::{block_intersects_player, PlayerState, VoxelQuery};
use crate::render::{ChunkMesh, ChunkMesher, Renderer};
use crate::terrain::TerrainGenerator;

/// What one streaming update changed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StreamingReport {
    pub loaded: usize,
    pub unloaded: usize,
    pub rebuilt: usize,
}

impl StreamingReport {
    pub fn is_empty(&self) -> bool {
        self.loaded == 0 && self.unloaded == 0 && self.rebuilt == 0
    }
}

/// Sparse map of loaded chunks keyed by chunk coordinate
pub struct ChunkStore {
    chunks: HashMap<ChunkCoord, Chunk>,
    generator: TerrainGenerator,
    blocks: BlockTypeTable,
    streaming_radius: i32,
    rebuild_policy: RebuildPolicy,
    parallel_generation: bool,
    invalidator: ChunkInvalidator,
    /// Chunk the last full streaming pass was centered on
    player_chunk: Option<ChunkCoord>,
}

impl ChunkStore {
    /// Create an empty store for a validated config
    pub fn new(config: &WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            chunks: HashMap::new(),
            generator: TerrainGenerator::new(config.terrain.clone(), config.chunk_size, config.chunk_height),
            blocks: config.blocks.clone(),
            streaming_radius: config.streaming_radius,
            rebuild_policy: config.rebuild_policy,
            parallel_generation: config.parallel_generation,
            invalidator: ChunkInvalidator::new(),
            player_chunk: None,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.generator.chunk_size()
    }

    pub fn chunk_height(&self) -> usize {
        self.generator.chunk_height()
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    pub fn blocks(&self) -> &BlockTypeTable {
        &self.blocks
    }

    pub fn streaming_radius(&self) -> i32 {
        self.streaming_radius
    }

    pub fn rebuild_policy(&self) -> RebuildPolicy {
        self.rebuild_policy
    }

    /// Switch policy. Chunks already marked dirty stay dirty until the next flush.
    pub fn set_rebuild_policy(&mut self, policy: RebuildPolicy) {
        self.rebuild_policy = policy;
    }

    /// Get the number of loaded chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Loaded chunk coordinates in sorted order
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.chunks.keys().copied().collect();
        coords.sort();
        coords
    }

    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Split a world block position into chunk coordinate and local (x, z)
    pub fn world_to_chunk(&self, x: i32, z: i32) -> (ChunkCoord, usize, usize) {
        ChunkCoord::from_block(x, z, self.chunk_size())
    }

    /// Number of chunks waiting for a deferred rebuild
    pub fn dirty_chunk_count(&self) -> usize {
        self.invalidator.dirty_chunk_count()
    }

    /// Generate, mesh and submit a chunk unless it is already loaded.
    ///
    /// Returns true if the chunk was created by this call. Chunks outside the
    /// world are never created.
    pub fn ensure_chunk_exists(&mut self, coord: ChunkCoord, renderer: &mut impl Renderer) -> bool {
        if self.chunks.contains_key(&coord) {
            return false;
        }
        if !coord.is_within_world(self.chunk_size()) {
            debug!("Chunk ({}, {}) is outside the world", coord.x, coord.z);
            return false;
        }
        let grid = self.generator.generate(coord);
        let mesh = ChunkMesher::build_grid(coord, 0, &grid, &self.blocks);
        self.install(Chunk::new(coord, grid), mesh, renderer);
        true
    }

    fn install(&mut self, mut chunk: Chunk, mesh: ChunkMesh, renderer: &mut impl Renderer) {
        let coord = chunk.coord;
        debug!(
            "Loaded chunk ({}, {}): {} batches, {} instances",
            coord.x,
            coord.z,
            mesh.batches.len(),
            mesh.instance_count()
        );
        chunk.geometry = Some(mesh.handle());
        renderer.submit_geometry(mesh);
        self.chunks.insert(coord, chunk);
        // The new chunk may lie outside the last streaming square
        self.player_chunk = None;
    }

    /// Block at a world position. Air outside the height range and in unloaded chunks.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        if y < 0 || y as usize >= self.chunk_height() {
            return AIR;
        }
        let (coord, lx, lz) = self.world_to_chunk(x, z);
        self.chunks
            .get(&coord)
            .map_or(AIR, |chunk| chunk.voxels.get(lx, y as usize, lz))
    }

    /// Chunk and local (x, z) of an editable block position
    fn locate(&self, x: i32, z: i32) -> Result<(ChunkCoord, usize, usize)> {
        let (coord, lx, lz) = self.world_to_chunk(x, z);
        if !coord.is_within_world(self.chunk_size()) {
            return Err(Error::OutOfWorldBounds { x, z });
        }
        Ok((coord, lx, lz))
    }

    fn check_height(&self, y: i32) -> Result<usize> {
        let height = self.chunk_height();
        if y < 0 || y as usize >= height {
            return Err(Error::OutOfHeightRange { y, height });
        }
        Ok(y as usize)
    }

    /// Set a solid block, loading its chunk first if needed.
    ///
    /// Returns `Ok(false)` if the voxel already held `block`.
    pub fn add_block(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        block: BlockId,
        renderer: &mut impl Renderer,
    ) -> Result<bool> {
        let ly = self.check_height(y)?;
        if !self.blocks.contains(block) {
            return Err(Error::UnknownBlockType(block));
        }
        let (coord, lx, lz) = self.locate(x, z)?;
        self.ensure_chunk_exists(coord, renderer);
        Ok(self.write_voxel(coord, (lx, ly, lz), block, renderer))
    }

    /// Clear a voxel to air.
    ///
    /// Returns `Ok(false)` if the chunk is not loaded or the voxel was already air.
    pub fn remove_block(&mut self, x: i32, y: i32, z: i32, renderer: &mut impl Renderer) -> Result<bool> {
        let ly = self.check_height(y)?;
        let (coord, lx, lz) = self.locate(x, z)?;
        if !self.is_loaded(coord) {
            return Ok(false);
        }
        Ok(self.write_voxel(coord, (lx, ly, lz), AIR, renderer))
    }

    /// Place a block unless it would overlap the player
    pub fn place_block(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        block: BlockId,
        player: &PlayerState,
        renderer: &mut impl Renderer,
    ) -> Result<bool> {
        if block_intersects_player(x, y, z, player) {
            debug!("Refused to place block at ({}, {}, {}) inside the player", x, y, z);
            return Ok(false);
        }
        self.add_block(x, y, z, block, renderer)
    }

    fn write_voxel(
        &mut self,
        coord: ChunkCoord,
        (lx, ly, lz): (usize, usize, usize),
        block: BlockId,
        renderer: &mut impl Renderer,
    ) -> bool {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        let previous = chunk.voxels.set(lx, ly, lz, block);
        if previous.is_none_or(|old| old == block) {
            return false;
        }
        chunk.touch();

        match self.rebuild_policy {
            RebuildPolicy::Immediate => {
                self.rebuild_chunk(coord, renderer);
            }
            RebuildPolicy::PerFrame => self.invalidator.mark_chunk_dirty(coord),
        }
        true
    }

    /// Replace a chunk's geometry with a fresh build of its current voxels
    fn rebuild_chunk(&mut self, coord: ChunkCoord, renderer: &mut impl Renderer) -> bool {
        self.invalidator.forget(coord);
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        release_geometry(chunk, renderer);

        let mesh = ChunkMesher::build(chunk, &self.blocks);
        debug!(
            "Rebuilt chunk ({}, {}) at generation {}",
            coord.x, coord.z, mesh.generation
        );
        chunk.geometry = Some(mesh.handle());
        renderer.submit_geometry(mesh);
        true
    }

    /// Rebuild every chunk edited since the last flush, once each.
    ///
    /// Returns the number of chunks rebuilt.
    pub fn flush_rebuilds(&mut self, renderer: &mut impl Renderer) -> usize {
        let mut rebuilt = 0;
        for coord in self.invalidator.take_dirty_chunks() {
            if self.rebuild_chunk(coord, renderer) {
                rebuilt += 1;
            }
        }
        rebuilt
    }

    /// Release a chunk's geometry and drop its voxels
    pub fn unload_chunk(&mut self, coord: ChunkCoord, renderer: &mut impl Renderer) -> bool {
        let Some(mut chunk) = self.chunks.remove(&coord) else {
            return false;
        };
        release_geometry(&mut chunk, renderer);
        self.invalidator.forget(coord);
        // Force the next streaming pass to re-check the square
        self.player_chunk = None;
        debug!("Unloaded chunk ({}, {})", coord.x, coord.z);
        true
    }

    /// Unload everything; returns the number of chunks dropped
    pub fn unload_all(&mut self, renderer: &mut impl Renderer) -> usize {
        let coords = self.loaded_coords();
        let count = coords.len();
        for coord in coords {
            self.unload_chunk(coord, renderer);
        }
        count
    }

    /// Keep exactly the chunks within the streaming radius of the player loaded.
    ///
    /// Pending rebuilds are flushed first. When the player is still in the
    /// chunk of the previous pass and nothing is dirty this does nothing.
    /// Chunks that stay loaded are never regenerated or remeshed here.
    pub fn update_streaming(&mut self, px: f32, pz: f32, renderer: &mut impl Renderer) -> StreamingReport {
        let center = ChunkCoord::from_world_pos(px, pz, self.chunk_size());
        let mut report = StreamingReport::default();

        if self.player_chunk == Some(center) && !self.invalidator.has_dirty() {
            return report;
        }

        report.rebuilt = self.flush_rebuilds(renderer);
        if self.player_chunk == Some(center) {
            return report;
        }

        let radius = self.streaming_radius;
        let size = self.chunk_size();
        let mut stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .copied()
            .filter(|coord| coord.chebyshev_distance(center) > radius)
            .collect();
        stale.sort();
        for coord in stale {
            if self.unload_chunk(coord, renderer) {
                report.unloaded += 1;
            }
        }

        let missing: Vec<ChunkCoord> = center
            .square_around(radius)
            .filter(|coord| coord.is_within_world(size) && !self.chunks.contains_key(coord))
            .collect();
        report.loaded = self.load_many(&missing, renderer);
        self.player_chunk = Some(center);

        if report.loaded > 0 || report.unloaded > 0 {
            info!(
                "Streaming around chunk ({}, {}): +{} -{} chunks, {} loaded",
                center.x,
                center.z,
                report.loaded,
                report.unloaded,
                self.chunks.len()
            );
        }
        report
    }

    /// Generate and mesh a batch of chunks that are not loaded yet, then
    /// install them in coordinate order
    fn load_many(&mut self, coords: &[ChunkCoord], renderer: &mut impl Renderer) -> usize {
        let generator = &self.generator;
        let blocks = &self.blocks;
        let build = |coord: ChunkCoord| {
            let grid = generator.generate(coord);
            let mesh = ChunkMesher::build_grid(coord, 0, &grid, blocks);
            (Chunk::new(coord, grid), mesh)
        };

        let mut built: Vec<(Chunk, ChunkMesh)> = if self.parallel_generation && coords.len() > 1 {
            coords.par_iter().map(|&coord| build(coord)).collect()
        } else {
            coords.iter().map(|&coord| build(coord)).collect()
        };
        built.sort_by_key(|(chunk, _)| chunk.coord);

        let loaded = built.len();
        for (chunk, mesh) in built {
            self.install(chunk, mesh, renderer);
        }
        loaded
    }
}

impl VoxelQuery for ChunkStore {
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.get_block(x, y, z)
    }
}

/// Ask the renderer to free every batch of a chunk's geometry, then remove it
fn release_geometry(chunk: &mut Chunk, renderer: &mut impl Renderer) {
    if let Some(handle) = chunk.geometry.take() {
        for batch in &handle.batches {
            renderer.release_batch_resources(chunk.coord, batch);
        }
        renderer.remove_geometry(chunk.coord);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec3;
    use crate::physics::PlayerConfig;
    use crate::render::{RecordingRenderer, RenderEvent};
    use crate::voxel::block::ids;

    fn config(policy: RebuildPolicy, radius: i32) -> WorldConfig {
        WorldConfig {
            streaming_radius: radius,
            rebuild_policy: policy,
            ..WorldConfig::with_seed(42)
        }
    }

    fn store(policy: RebuildPolicy) -> ChunkStore {
        ChunkStore::new(&config(policy, 1)).unwrap()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = store(RebuildPolicy::PerFrame);
        assert_eq!(store.chunk_count(), 0);
        assert_eq!(store.chunk_size(), 16);
        assert_eq!(store.chunk_height(), 64);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = WorldConfig { chunk_size: 0, ..WorldConfig::default() };
        assert!(ChunkStore::new(&config).is_err());
    }

    #[test]
    fn test_ensure_chunk_exists_is_idempotent() {
        let mut store = store(RebuildPolicy::PerFrame);
        let mut renderer = RecordingRenderer::with_event_log();
        let coord = ChunkCoord::new(0, 0);

        assert!(store.ensure_chunk_exists(coord, &mut renderer));
        assert!(!store.ensure_chunk_exists(coord, &mut renderer));

        assert_eq!(store.chunk_count(), 1);
        assert_eq!(renderer.submissions_for(coord), 1);
        assert!(store.get_chunk(coord).unwrap().geometry.is_some());
    }

    #[test]
    fn test_reads_degrade_to_air() {
        let mut store = store(RebuildPolicy::PerFrame);
        let mut renderer = RecordingRenderer::new();
        store.ensure_chunk_exists(ChunkCoord::new(0, 0), &mut renderer);

        assert_eq!(store.get_block(0, -1, 0), AIR);
        assert_eq!(store.get_block(0, 64, 0), AIR);
        // Bedrock row is always solid in a loaded chunk
        assert_ne!(store.get_block(0, 0, 0), AIR);
        // Unloaded chunk
        assert_eq!(store.get_block(500, 0, 500), AIR);
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let mut store = store(RebuildPolicy::Immediate);
        let mut renderer = RecordingRenderer::new();

        assert_eq!(store.add_block(3, 60, 3, ids::PURPLE, &mut renderer).unwrap(), true);
        assert_eq!(store.get_block(3, 60, 3), ids::PURPLE);
        assert_eq!(store.remove_block(3, 60, 3, &mut renderer).unwrap(), true);
        assert_eq!(store.get_block(3, 60, 3), AIR);

        let stats = renderer.stats();
        assert_eq!(stats.submissions, 3);
        assert_eq!(stats.removals, 2);
        assert_eq!(stats.leaked_batches, 0);
        assert_eq!(stats.overwritten, 0);
    }

    #[test]
    fn test_edit_errors_and_no_ops() {
        let mut store = store(RebuildPolicy::Immediate);
        let mut renderer = RecordingRenderer::new();

        assert!(matches!(
            store.add_block(0, 64, 0, ids::STONE, &mut renderer),
            Err(Error::OutOfHeightRange { y: 64, height: 64 })
        ));
        assert!(matches!(
            store.remove_block(0, -1, 0, &mut renderer),
            Err(Error::OutOfHeightRange { y: -1, .. })
        ));
        assert!(matches!(
            store.add_block(0, 10, 0, 99, &mut renderer),
            Err(Error::UnknownBlockType(99))
        ));
        assert!(matches!(
            store.add_block(0, 10, 0, AIR, &mut renderer),
            Err(Error::UnknownBlockType(AIR))
        ));
        // Errors never load chunks
        assert_eq!(store.chunk_count(), 0);

        // Removing from an unloaded chunk does nothing
        assert_eq!(store.remove_block(0, 10, 0, &mut renderer).unwrap(), false);
        assert_eq!(store.chunk_count(), 0);

        // Writing the value already there is a no-op without a rebuild
        store.add_block(1, 62, 1, ids::SNOW, &mut renderer).unwrap();
        let submissions = renderer.stats().submissions;
        assert_eq!(store.add_block(1, 62, 1, ids::SNOW, &mut renderer).unwrap(), false);
        assert_eq!(store.remove_block(1, 63, 1, &mut renderer).unwrap(), false);
        assert_eq!(renderer.stats().submissions, submissions);
    }

    #[test]
    fn test_add_block_loads_chunk() {
        let mut store = store(RebuildPolicy::Immediate);
        let mut renderer = RecordingRenderer::new();

        store.add_block(-20, 60, 35, ids::WATER, &mut renderer).unwrap();
        let (coord, _, _) = store.world_to_chunk(-20, 35);
        assert_eq!(coord, ChunkCoord::new(-2, 2));
        assert!(store.is_loaded(coord));
        assert_eq!(store.get_block(-20, 60, 35), ids::WATER);
    }

    #[test]
    fn test_rebuild_releases_every_old_batch_first() {
        let mut store = store(RebuildPolicy::Immediate);
        let mut renderer = RecordingRenderer::with_event_log();
        let coord = ChunkCoord::new(0, 0);
        store.ensure_chunk_exists(coord, &mut renderer);
        let old_batches = store.get_chunk(coord).unwrap().geometry.as_ref().unwrap().batches.len();
        renderer.clear_events();

        store.add_block(5, 61, 5, ids::PURPLE, &mut renderer).unwrap();

        let events = renderer.events();
        assert_eq!(events.len(), old_batches + 2);
        assert!(events[..old_batches]
            .iter()
            .all(|e| matches!(e, RenderEvent::Release { coord: c, .. } if *c == coord)));
        assert!(matches!(events[old_batches], RenderEvent::Remove { coord: c } if c == coord));
        assert!(matches!(
            events[old_batches + 1],
            RenderEvent::Submit { coord: c, generation: 1, .. } if c == coord
        ));
        assert_eq!(renderer.stats().leaked_batches, 0);
    }

    #[test]
    fn test_per_frame_policy_coalesces_rebuilds() {
        let mut store = store(RebuildPolicy::PerFrame);
        let mut renderer = RecordingRenderer::with_event_log();
        let coord = ChunkCoord::new(0, 0);
        store.ensure_chunk_exists(coord, &mut renderer);
        renderer.clear_events();

        for x in 0..4 {
            store.add_block(x, 62, 0, ids::SNOW, &mut renderer).unwrap();
            // Reads see the write before geometry catches up
            assert_eq!(store.get_block(x, 62, 0), ids::SNOW);
        }
        assert!(renderer.events().is_empty());
        assert_eq!(store.dirty_chunk_count(), 1);

        assert_eq!(store.flush_rebuilds(&mut renderer), 1);
        assert_eq!(renderer.submissions_for(coord), 1);
        assert_eq!(renderer.live_generation(coord), Some(4));
        assert_eq!(store.dirty_chunk_count(), 0);
        assert_eq!(store.flush_rebuilds(&mut renderer), 0);
    }

    #[test]
    fn test_streaming_loads_square() {
        let mut store = store(RebuildPolicy::PerFrame);
        let mut renderer = RecordingRenderer::new();

        let report = store.update_streaming(8.0, 8.0, &mut renderer);
        assert_eq!(report.loaded, 9);
        assert_eq!(report.unloaded, 0);
        assert_eq!(store.loaded_coords().first(), Some(&ChunkCoord::new(-1, -1)));
        assert_eq!(store.loaded_coords().last(), Some(&ChunkCoord::new(1, 1)));
        assert_eq!(renderer.live_count(), 9);

        // Same chunk again: nothing to do
        let report = store.update_streaming(15.9, 0.1, &mut renderer);
        assert!(report.is_empty());
        assert_eq!(renderer.stats().submissions, 9);
    }

    #[test]
    fn test_streaming_step_keeps_overlap() {
        let mut store = store(RebuildPolicy::PerFrame);
        let mut renderer = RecordingRenderer::with_event_log();
        store.update_streaming(8.0, 8.0, &mut renderer);

        let report = store.update_streaming(24.0, 8.0, &mut renderer);
        assert_eq!(report.loaded, 3);
        assert_eq!(report.unloaded, 3);
        assert!(!store.is_loaded(ChunkCoord::new(-1, 0)));
        assert!(store.is_loaded(ChunkCoord::new(2, 0)));
        for coord in ChunkCoord::new(0, 0).square_around(1).filter(|c| c.x >= 0) {
            assert_eq!(renderer.submissions_for(coord), 1, "{:?} rebuilt", coord);
        }
        assert_eq!(renderer.stats().leaked_batches, 0);
    }

    #[test]
    fn test_streaming_flushes_dirty_chunks() {
        let mut store = store(RebuildPolicy::PerFrame);
        let mut renderer = RecordingRenderer::new();
        store.update_streaming(8.0, 8.0, &mut renderer);
        store.add_block(1, 63, 1, ids::PURPLE, &mut renderer).unwrap();

        let report = store.update_streaming(8.0, 8.0, &mut renderer);
        assert_eq!(report, StreamingReport { loaded: 0, unloaded: 0, rebuilt: 1 });
        assert_eq!(renderer.live_generation(ChunkCoord::new(0, 0)), Some(1));
    }

    #[test]
    fn test_streaming_unloads_chunks_loaded_by_edits() {
        let mut store = store(RebuildPolicy::Immediate);
        let mut renderer = RecordingRenderer::new();
        store.update_streaming(8.0, 8.0, &mut renderer);

        store.add_block(200, 60, 200, ids::STONE, &mut renderer).unwrap();
        assert!(store.ensure_chunk_exists(ChunkCoord::new(9, 9), &mut renderer));
        let far = store.world_to_chunk(200, 200).0;
        assert!(store.is_loaded(far));
        assert_eq!(store.chunk_count(), 11);

        // Player has not moved, but the far chunks must still go
        let report = store.update_streaming(8.0, 8.0, &mut renderer);
        assert_eq!(report.unloaded, 2);
        assert_eq!(report.loaded, 0);
        assert!(!store.is_loaded(far));
        assert!(!store.is_loaded(ChunkCoord::new(9, 9)));
        assert_eq!(store.chunk_count(), 9);
        assert_eq!(renderer.live_count(), 9);
        assert_eq!(renderer.stats().leaked_batches, 0);

        assert!(store.update_streaming(8.0, 8.0, &mut renderer).is_empty());
    }

    #[test]
    fn test_streaming_inside_radius_after_edit_changes_nothing() {
        let mut store = store(RebuildPolicy::Immediate);
        let mut renderer = RecordingRenderer::new();
        store.update_streaming(8.0, 8.0, &mut renderer);
        store.unload_chunk(ChunkCoord::new(1, 1), &mut renderer);
        store.add_block(20, 60, 20, ids::STONE, &mut renderer).unwrap();

        let report = store.update_streaming(8.0, 8.0, &mut renderer);
        assert!(report.is_empty());
        assert_eq!(store.get_block(20, 60, 20), ids::STONE);
        assert_eq!(store.chunk_count(), 9);
    }

    #[test]
    fn test_streamed_chunks_submit_once_at_generation_zero() {
        let mut store = store(RebuildPolicy::PerFrame);
        let mut renderer = RecordingRenderer::with_event_log();
        store.ensure_chunk_exists(ChunkCoord::new(0, 0), &mut renderer);
        renderer.clear_events();

        let report = store.update_streaming(8.0, 8.0, &mut renderer);
        assert_eq!(report.loaded, 8);
        let submits: Vec<_> = renderer
            .events()
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Submit { coord, generation, .. } => Some((*coord, *generation)),
                _ => None,
            })
            .collect();
        assert_eq!(submits.len(), 8);
        assert!(submits.iter().all(|&(coord, generation)| generation == 0 && coord != ChunkCoord::new(0, 0)));
        assert!(submits.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_far_positions_do_not_overflow() {
        let mut store = store(RebuildPolicy::Immediate);
        let mut renderer = RecordingRenderer::new();

        let report = store.update_streaming(1.0e10, 0.0, &mut renderer);
        // The square is cut off at the world edge
        assert_eq!(report.loaded, 6);
        assert!(store.loaded_coords().iter().all(|c| c.is_within_world(16)));

        let report = store.update_streaming(-1.0e10, -1.0e10, &mut renderer);
        assert_eq!(report.loaded, 4);
        assert_eq!(report.unloaded, 6);
        assert_eq!(renderer.stats().leaked_batches, 0);
    }

    #[test]
    fn test_edits_outside_the_world_are_rejected() {
        let mut store = store(RebuildPolicy::Immediate);
        let mut renderer = RecordingRenderer::new();

        assert!(matches!(
            store.add_block(i32::MAX, 10, 0, ids::STONE, &mut renderer),
            Err(Error::OutOfWorldBounds { x: i32::MAX, z: 0 })
        ));
        assert!(matches!(
            store.remove_block(0, 10, i32::MIN, &mut renderer),
            Err(Error::OutOfWorldBounds { .. })
        ));
        assert!(!store.ensure_chunk_exists(ChunkCoord::new(i32::MAX, 0), &mut renderer));
        assert_eq!(store.chunk_count(), 0);
        assert_eq!(store.get_block(i32::MAX, 10, i32::MIN), AIR);

        // Last block row inside the edge is still editable
        let edge = crate::voxel::chunk::WORLD_LIMIT - 1;
        assert!(store.add_block(edge, 60, 0, ids::STONE, &mut renderer).unwrap());
        assert_eq!(store.get_block(edge, 60, 0), ids::STONE);
    }

    #[test]
    fn test_unloading_drops_dirty_state() {
        let mut store = store(RebuildPolicy::PerFrame);
        let mut renderer = RecordingRenderer::new();
        store.add_block(1, 63, 1, ids::PURPLE, &mut renderer).unwrap();
        assert_eq!(store.dirty_chunk_count(), 1);

        assert!(store.unload_chunk(ChunkCoord::new(0, 0), &mut renderer));
        assert!(!store.unload_chunk(ChunkCoord::new(0, 0), &mut renderer));
        assert_eq!(store.dirty_chunk_count(), 0);
        assert_eq!(store.get_block(1, 63, 1), AIR);
        assert_eq!(renderer.live_count(), 0);
        assert_eq!(renderer.stats().leaked_batches, 0);
    }

    #[test]
    fn test_parallel_and_serial_streaming_agree() {
        let mut serial = ChunkStore::new(&WorldConfig {
            parallel_generation: false,
            ..config(RebuildPolicy::PerFrame, 1)
        })
        .unwrap();
        let mut parallel = store(RebuildPolicy::PerFrame);
        let mut r1 = RecordingRenderer::with_event_log();
        let mut r2 = RecordingRenderer::with_event_log();

        serial.update_streaming(-30.0, 40.0, &mut r1);
        parallel.update_streaming(-30.0, 40.0, &mut r2);

        assert_eq!(serial.loaded_coords(), parallel.loaded_coords());
        assert_eq!(r1.events(), r2.events());
        for coord in serial.loaded_coords() {
            assert_eq!(
                serial.get_chunk(coord).unwrap().voxels,
                parallel.get_chunk(coord).unwrap().voxels
            );
        }
    }

    #[test]
    fn test_place_block_refuses_player_overlap() {
        let mut store = store(RebuildPolicy::Immediate);
        let mut renderer = RecordingRenderer::new();
        let player = PlayerState::new(Vec3::new(0.5, 60.0, 0.5), &PlayerConfig::default());

        assert_eq!(store.place_block(0, 60, 0, ids::STONE, &player, &mut renderer).unwrap(), false);
        assert_eq!(store.get_block(0, 60, 0), AIR);

        assert_eq!(store.place_block(3, 60, 3, ids::STONE, &player, &mut renderer).unwrap(), true);
        assert_eq!(store.get_block(3, 60, 3), ids::STONE);
    }

    #[test]
    fn test_store_answers_collision_queries() {
        let mut store = store(RebuildPolicy::PerFrame);
        let mut renderer = RecordingRenderer::new();
        store.ensure_chunk_exists(ChunkCoord::new(0, 0), &mut renderer);
        assert_eq!(store.block_at(2, 0, 2), store.get_block(2, 0, 2));
        assert_eq!(store.block_at(2, 70, 2), AIR);
    }
}
