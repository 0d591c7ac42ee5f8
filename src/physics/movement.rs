//! Walking, jumping and falling with per-axis collision resolution

use super::collision::{is_colliding_with_block, VoxelQuery};
use super::player::{PlayerState, PlayerConfig};
use crate::core::types::Vec3;

/// Movement keys held for one step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl MoveIntent {
    pub fn forward() -> Self {
        Self { forward: true, ..Self::default() }
    }
}

/// Which axes were blocked during a step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub blocked_x: bool,
    pub blocked_y: bool,
    pub blocked_z: bool,
}

/// Horizontal facing for a yaw angle in radians; yaw 0 looks down -Z
pub fn forward_vector(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Horizontal right-hand vector for a yaw angle (forward x up)
pub fn right_vector(yaw: f32) -> Vec3 {
    forward_vector(yaw).cross(Vec3::Y)
}

/// Fixed-step player controller
pub struct MovementController {
    config: PlayerConfig,
}

impl MovementController {
    pub fn new(config: PlayerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Advance the player by one step.
    ///
    /// Axes resolve in X, Z, Y order. A move that would overlap a solid
    /// block reverts that axis only, so the player slides along walls.
    pub fn step(
        &self,
        player: &mut PlayerState,
        intent: MoveIntent,
        yaw: f32,
        world: &impl VoxelQuery,
    ) -> StepReport {
        let forward = forward_vector(yaw);
        let right = right_vector(yaw);

        let mut wish = Vec3::ZERO;
        if intent.forward {
            wish += forward * self.config.speed;
        }
        if intent.backward {
            wish -= forward * self.config.speed;
        }
        if intent.left {
            wish -= right * self.config.speed;
        }
        if intent.right {
            wish += right * self.config.speed;
        }

        if intent.jump && player.on_ground {
            player.velocity.y = self.config.jump_strength;
            player.on_ground = false;
        }
        player.velocity.y -= self.config.gravity;

        let mut report = StepReport::default();
        let p = player.position;

        if is_colliding_with_block(p.x + wish.x, p.y, p.z, player, world) {
            report.blocked_x = true;
        } else {
            player.position.x += wish.x;
        }

        let p = player.position;
        if is_colliding_with_block(p.x, p.y, p.z + wish.z, player, world) {
            report.blocked_z = true;
        } else {
            player.position.z += wish.z;
        }

        let p = player.position;
        let vy = player.velocity.y;
        if is_colliding_with_block(p.x, p.y + vy, p.z, player, world) {
            report.blocked_y = true;
            if vy < 0.0 {
                player.on_ground = true;
            }
            player.velocity.y = 0.0;
        } else {
            player.position.y += vy;
            player.on_ground = false;
        }

        report
    }
}
