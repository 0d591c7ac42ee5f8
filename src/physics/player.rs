//! Player body: dimensions, movement tuning and per-frame state

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;
use crate::math::Aabb;

/// Player volume and movement tuning, in blocks and blocks per step
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal half-width of the collision box
    pub radius: f32,
    /// Height of the collision box above the feet
    pub height: f32,
    /// Horizontal distance covered per step per pressed direction
    pub speed: f32,
    /// Upward velocity given by a jump
    pub jump_strength: f32,
    /// Downward acceleration per step
    pub gravity: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            height: 1.8,
            speed: 0.09,
            jump_strength: 0.08,
            gravity: 0.0019,
        }
    }
}

/// Mutable player state; `position` is the center of the feet
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub on_ground: bool,
    pub radius: f32,
    pub height: f32,
}

impl PlayerState {
    /// Create a player standing (or falling) at `position`
    pub fn new(position: Vec3, config: &PlayerConfig) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            on_ground: false,
            radius: config.radius,
            height: config.height,
        }
    }

    /// Collision box if the feet were at `feet`
    pub fn aabb_at(&self, feet: Vec3) -> Aabb {
        Aabb::from_feet(feet, self.radius, self.height)
    }

    /// Current collision box
    pub fn aabb(&self) -> Aabb {
        self.aabb_at(self.position)
    }

    /// Camera position (top of the collision box)
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.height, 0.0)
    }
}
