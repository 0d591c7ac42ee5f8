//! Chunk system for managing column regions of voxel space

use super::block::{is_air, BlockId, AIR};
use crate::render::GeometryHandle;

/// Horizontal extent of the world in blocks: x and z stay in `[-WORLD_LIMIT, WORLD_LIMIT)`
pub const WORLD_LIMIT: i32 = 1 << 24;

/// Integer coordinate identifying a chunk column in the XZ world grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Convert a continuous world position to the containing chunk.
    ///
    /// Positions beyond the world edge map to the chunk at the edge.
    pub fn from_world_pos(x: f32, z: f32, chunk_size: usize) -> Self {
        let size = chunk_size as f32;
        let (lo, hi) = (-WORLD_LIMIT as f32, (WORLD_LIMIT - 1) as f32);
        Self {
            x: (x.clamp(lo, hi) / size).floor() as i32,
            z: (z.clamp(lo, hi) / size).floor() as i32,
        }
    }

    /// Split an integer block coordinate into chunk coordinate and local offsets.
    ///
    /// Local offsets are always in `[0, chunk_size)`, including for negative
    /// world coordinates.
    pub fn from_block(x: i32, z: i32, chunk_size: usize) -> (Self, usize, usize) {
        let size = chunk_size as i32;
        let coord = Self {
            x: x.div_euclid(size),
            z: z.div_euclid(size),
        };
        (coord, x.rem_euclid(size) as usize, z.rem_euclid(size) as usize)
    }

    /// Whether every block of this chunk lies inside [`WORLD_LIMIT`]
    pub fn is_within_world(&self, chunk_size: usize) -> bool {
        let size = chunk_size as i64;
        let limit = WORLD_LIMIT as i64;
        [self.x, self.z].iter().all(|&c| {
            let lo = c as i64 * size;
            lo >= -limit && lo + size <= limit
        })
    }

    /// World-space block coordinate of this chunk's minimum corner (x, z).
    ///
    /// Only meaningful for chunks that are [`within the world`](Self::is_within_world).
    pub fn world_origin(&self, chunk_size: usize) -> (i32, i32) {
        let size = chunk_size as i32;
        (self.x * size, self.z * size)
    }

    /// Chebyshev (chessboard) distance in chunk units
    pub fn chebyshev_distance(&self, other: ChunkCoord) -> i32 {
        let d = self.x.abs_diff(other.x).max(self.z.abs_diff(other.z));
        i32::try_from(d).unwrap_or(i32::MAX)
    }

    /// Every coordinate within `radius` (Chebyshev) of this one, row by row.
    ///
    /// Coordinates that would overflow `i32` are skipped.
    pub fn square_around(&self, radius: i32) -> impl Iterator<Item = ChunkCoord> + '_ {
        (-radius..=radius).filter_map(move |dx| self.x.checked_add(dx)).flat_map(move |x| {
            (-radius..=radius)
                .filter_map(move |dz| self.z.checked_add(dz))
                .map(move |z| ChunkCoord::new(x, z))
        })
    }
}

/// Dense voxel storage for one chunk, indexed `[x][y][z]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    size: usize,
    height: usize,
    voxels: Vec<BlockId>,
}

impl VoxelGrid {
    /// Create a grid filled with air
    pub fn new(size: usize, height: usize) -> Self {
        Self {
            size,
            height,
            voxels: vec![AIR; size * height * size],
        }
    }

    /// Horizontal edge length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Vertical extent
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.height + y) * self.size + z
    }

    fn in_bounds(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.size && y < self.height && z < self.size
    }

    /// Block at local coordinates; air outside the grid
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        if !self.in_bounds(x, y, z) {
            return AIR;
        }
        self.voxels[self.index(x, y, z)]
    }

    /// Store a block and return the previous value.
    ///
    /// Returns `None` (and stores nothing) outside the grid.
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: BlockId) -> Option<BlockId> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        let idx = self.index(x, y, z);
        Some(std::mem::replace(&mut self.voxels[idx], block))
    }

    /// Visit every non-air voxel in `[x][y][z]` order
    pub fn solid_voxels(&self) -> impl Iterator<Item = (usize, usize, usize, BlockId)> + '_ {
        let (size, height) = (self.size, self.height);
        self.voxels.iter().enumerate().filter_map(move |(i, &id)| {
            if is_air(id) {
                return None;
            }
            let z = i % size;
            let y = (i / size) % height;
            let x = i / (size * height);
            Some((x, y, z, id))
        })
    }

    /// Number of non-air voxels
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|&&id| !is_air(id)).count()
    }
}

/// A loaded chunk: its voxels and the geometry currently submitted for it
pub struct Chunk {
    /// Coordinate of this chunk in the world grid
    pub coord: ChunkCoord,
    /// Voxel data, exclusively owned
    pub voxels: VoxelGrid,
    /// Handle to the geometry the renderer holds for this chunk
    pub geometry: Option<GeometryHandle>,
    /// Bumped on every voxel edit; meshes record the generation they were built from
    pub generation: u32,
}

impl Chunk {
    /// Create a chunk from generated voxels
    pub fn new(coord: ChunkCoord, voxels: VoxelGrid) -> Self {
        Self {
            coord,
            voxels,
            geometry: None,
            generation: 0,
        }
    }

    /// Record an edit
    pub fn touch(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }
}
