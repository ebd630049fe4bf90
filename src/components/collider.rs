//! Static blocking volumes and walkable floor surfaces.
//!
//! A [`Collider`] only ever blocks and a [`Floor`] only ever supports; the
//! movement resolver consults them separately.

use bevy_ecs::prelude::Component;
use glam::{Vec2, Vec3};

use crate::math::Aabb;

/// A precomputed world-space box that blocks the player.
///
/// Whether it is *currently* blocking is decided by membership in
/// [`ColliderSet`](crate::resources::colliderset::ColliderSet).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub aabb: Aabb,
}

impl Collider {
    pub fn new(aabb: Aabb) -> Self {
        Self { aabb }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        Self::new(Aabb::from_center_size(center, size))
    }
}

/// Height profile of a floor surface over its footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloorShape {
    Flat(f32),
    /// Linear ramp from `low` at the footprint's min Z edge to `high` at its
    /// max Z edge (or X when `along_x`).
    Ramp { low: f32, high: f32, along_x: bool },
}

/// A walkable surface over a rectangular XZ footprint.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Floor {
    pub min: Vec2,
    pub max: Vec2,
    pub shape: FloorShape,
}

impl Floor {
    pub fn flat(min: Vec2, max: Vec2, height: f32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            shape: FloorShape::Flat(height),
        }
    }

    pub fn ramp(min: Vec2, max: Vec2, low: f32, high: f32, along_x: bool) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            shape: FloorShape::Ramp { low, high, along_x },
        }
    }

    /// Surface height under `(x, z)`, or `None` outside the footprint.
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        if x < self.min.x || x > self.max.x || z < self.min.y || z > self.max.y {
            return None;
        }
        match self.shape {
            FloorShape::Flat(h) => Some(h),
            FloorShape::Ramp { low, high, along_x } => {
                let (v, lo, hi) = if along_x {
                    (x, self.min.x, self.max.x)
                } else {
                    (z, self.min.y, self.max.y)
                };
                let span = hi - lo;
                let t = if span > 0.0 { (v - lo) / span } else { 0.0 };
                Some(low + (high - low) * t)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_floor_height() {
        let f = Floor::flat(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0), 0.5);
        assert_eq!(f.height_at(0.0, 0.0), Some(0.5));
        assert_eq!(f.height_at(2.0, 0.0), None);
    }

    #[test]
    fn test_ramp_interpolates() {
        let f = Floor::ramp(Vec2::new(0.0, 0.0), Vec2::new(1.0, 4.0), 0.0, 2.0, false);
        assert_eq!(f.height_at(0.5, 0.0), Some(0.0));
        assert_eq!(f.height_at(0.5, 2.0), Some(1.0));
        assert_eq!(f.height_at(0.5, 4.0), Some(2.0));
    }
}
