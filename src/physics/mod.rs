//! Player physics: collision queries and movement

pub mod collision;
pub mod movement;
pub mod player;

pub use collision::{aabb_hits_solid, block_intersects_player, is_colliding_with_block, VoxelQuery};
pub use movement::{forward_vector, right_vector, MoveIntent, MovementController, StepReport};
pub use player::{PlayerState, PlayerConfig};
