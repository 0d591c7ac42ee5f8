//! Seeded 3D gradient noise
//!
//! A thin wrapper over [`noise::Perlin`]: each field owns its own permutation
//! table built from the world seed, so two fields with the same seed sample
//! identically and fields with different seeds are independent.

use noise::{NoiseFn, Perlin, Seedable};

/// Deterministic, seedable continuous 3D noise in `[-1, 1]`
#[derive(Clone)]
pub struct NoiseField {
    perlin: Perlin,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// Seed this field was built from
    pub fn seed(&self) -> u32 {
        self.perlin.seed()
    }

    /// Sample the field at (x, y, z)
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self.perlin.get([x, y, z]).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let a = NoiseField::new(12345);
        let b = NoiseField::new(12345);
        for i in 0..200 {
            let (x, y, z) = (i as f64 * 0.173, i as f64 * -0.311, i as f64 * 0.057);
            assert_eq!(a.sample(x, y, z).to_bits(), b.sample(x, y, z).to_bits());
            assert_eq!(a.sample(x, y, z).to_bits(), a.sample(x, y, z).to_bits());
        }
        assert_eq!(a.seed(), 12345);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..50).any(|i| {
            let x = i as f64 * 0.37 + 0.1;
            a.sample(x, 0.5, 0.25) != b.sample(x, 0.5, 0.25)
        });
        assert!(differs);
    }

    #[test]
    fn test_zero_at_lattice_points() {
        let field = NoiseField::new(99);
        for (x, y, z) in [(0.0, 0.0, 0.0), (3.0, -2.0, 7.0), (-100.0, 4.0, 1.0)] {
            assert!(field.sample(x, y, z).abs() < 1e-9);
        }
    }

    #[test]
    fn test_range() {
        let field = NoiseField::new(42);
        let mut max_abs: f64 = 0.0;
        for i in 0..40 {
            for j in 0..40 {
                let v = field.sample(i as f64 * 0.13, j as f64 * 0.29, 0.5);
                assert!((-1.0..=1.0).contains(&v), "sample {} out of range", v);
                max_abs = max_abs.max(v.abs());
            }
        }
        // Not degenerate
        assert!(max_abs > 0.1);
    }

    #[test]
    fn test_continuity() {
        let field = NoiseField::new(3);
        let base = field.sample(10.3, 2.7, 5.1);
        let near = field.sample(10.3001, 2.7, 5.1);
        assert!((base - near).abs() < 0.01);
    }

    #[test]
    fn test_far_coordinates() {
        let field = NoiseField::new(8);
        let v = field.sample(1.6e7, 12.5, -1.6e7);
        assert!(v.is_finite() && (-1.0..=1.0).contains(&v));
    }
}
