//! Axis-aligned collision between the player box and solid voxels

use super::player::PlayerState;
use crate::core::types::{IVec3, Vec3};
use crate::math::Aabb;
use crate::voxel::block::{is_air, BlockId};

/// Read-only voxel lookup used by collision queries.
///
/// Implementations must be total: anything outside the loaded world is air.
pub trait VoxelQuery {
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId;
}

impl<F> VoxelQuery for F
where
    F: Fn(i32, i32, i32) -> BlockId,
{
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        self(x, y, z)
    }
}

/// Check if any voxel cell touched by `aabb` holds a solid block
pub fn aabb_hits_solid(aabb: &Aabb, world: &impl VoxelQuery) -> bool {
    let (min, max) = aabb.voxel_range();
    for x in min.x..=max.x {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                if !is_air(world.block_at(x, y, z)) {
                    return true;
                }
            }
        }
    }
    false
}

/// Check if the player's box, with feet at (px, py, pz), overlaps a solid block
pub fn is_colliding_with_block(px: f32, py: f32, pz: f32, player: &PlayerState, world: &impl VoxelQuery) -> bool {
    aabb_hits_solid(&player.aabb_at(Vec3::new(px, py, pz)), world)
}

/// Check if a block placed at (bx, by, bz) would overlap the player's current box.
///
/// The block is a unit cube centered on the integer coordinates; touching
/// faces count as overlap.
pub fn block_intersects_player(bx: i32, by: i32, bz: i32, player: &PlayerState) -> bool {
    Aabb::unit_block(IVec3::new(bx, by, bz)).intersects(&player.aabb())
}
