//! Dirty-chunk tracking for deferred geometry rebuilds

use std::collections::BTreeSet;

use super::chunk::ChunkCoord;

/// Tracks which loaded chunks need their geometry rebuilt after edits.
///
/// Marking is idempotent, so any number of edits to one chunk between two
/// flushes cost a single rebuild. Coordinates come back in sorted order.
#[derive(Debug, Default)]
pub struct ChunkInvalidator {
    dirty_chunks: BTreeSet<ChunkCoord>,
}

impl ChunkInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a chunk as needing a rebuild
    pub fn mark_chunk_dirty(&mut self, coord: ChunkCoord) {
        self.dirty_chunks.insert(coord);
    }

    /// Drop a chunk from the dirty set (it was unloaded or rebuilt early)
    pub fn forget(&mut self, coord: ChunkCoord) {
        self.dirty_chunks.remove(&coord);
    }

    /// Take all dirty chunks and clear the dirty set
    pub fn take_dirty_chunks(&mut self) -> Vec<ChunkCoord> {
        std::mem::take(&mut self.dirty_chunks).into_iter().collect()
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty_chunks.is_empty()
    }

    pub fn is_chunk_dirty(&self, coord: ChunkCoord) -> bool {
        self.dirty_chunks.contains(&coord)
    }

    /// Get count of dirty chunks (for diagnostics)
    pub fn dirty_chunk_count(&self) -> usize {
        self.dirty_chunks.len()
    }

    pub fn clear(&mut self) {
        self.dirty_chunks.clear();
    }
}
