//! Axis-aligned bounding box

use crate::core::types::{IVec3, Vec3};

/// Axis-aligned bounding box defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create AABB from center and half-extents
    pub fn from_center_half_extent(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Upright box whose bottom face is centered on `feet`.
    ///
    /// This is the shape of the player volume: `radius` out from the feet
    /// on X and Z, `height` up on Y.
    pub fn from_feet(feet: Vec3, radius: f32, height: f32) -> Self {
        Self {
            min: Vec3::new(feet.x - radius, feet.y, feet.z - radius),
            max: Vec3::new(feet.x + radius, feet.y + height, feet.z + radius),
        }
    }

    /// Unit cube centered on an integer block coordinate
    pub fn unit_block(center: IVec3) -> Self {
        Self::from_center_half_extent(center.as_vec3(), Vec3::splat(0.5))
    }

    /// Get center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if point is inside AABB
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }

    /// Check if two AABBs intersect (touching faces count)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Inclusive range of integer voxel cells touched by this box.
    ///
    /// Both corners are floored, so a box ending exactly on a cell boundary
    /// still reports the cell on the far side.
    pub fn voxel_range(&self) -> (IVec3, IVec3) {
        (self.min.floor().as_ivec3(), self.max.floor().as_ivec3())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.center(), Vec3::splat(0.5));
        assert_eq!(aabb.size(), Vec3::ONE);
    }

    #[test]
    fn test_contains_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::splat(0.5)));
        assert!(!aabb.contains_point(Vec3::splat(2.0)));
    }

    #[test]
    fn test_intersects() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(0.5), Vec3::splat(1.5));
        let c = Aabb::new(Vec3::splat(2.0), Vec3::splat(3.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_touching_faces_intersect() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_from_feet() {
        let aabb = Aabb::from_feet(Vec3::new(1.0, 2.0, 3.0), 0.3, 1.8);
        assert!((aabb.min.x - 0.7).abs() < 1e-6);
        assert_eq!(aabb.min.y, 2.0);
        assert!((aabb.max.y - 3.8).abs() < 1e-6);
        assert!((aabb.max.z - 3.3).abs() < 1e-6);
    }

    #[test]
    fn test_unit_block() {
        let aabb = Aabb::unit_block(IVec3::new(0, 1, 0));
        assert_eq!(aabb.min, Vec3::new(-0.5, 0.5, -0.5));
        assert_eq!(aabb.max, Vec3::new(0.5, 1.5, 0.5));
    }

    #[test]
    fn test_voxel_range_negative_side() {
        let aabb = Aabb::from_feet(Vec3::ZERO, 0.3, 1.8);
        let (min, max) = aabb.voxel_range();
        assert_eq!(min, IVec3::new(-1, 0, -1));
        assert_eq!(max, IVec3::new(0, 1, 0));
    }
}
