//! Small geometric helpers shared by the simulation.
//!
//! - [`Aabb`] – axis-aligned bounding box used for blocking and picking
//! - [`smoothstep`] – the easing curve used by door swings
//! - [`lerp_f32`] / [`lerp_vec3`] – linear interpolation helpers

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Build a box from its center and full size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box of a `size`-sized slab centered at `center` and rotated by `yaw`
    /// about the Y axis. Only quarter turns are exact; other angles get the
    /// enclosing box of the rotated footprint.
    pub fn from_center_size_yaw(center: Vec3, size: Vec3, yaw: f32) -> Self {
        let (s, c) = yaw.sin_cos();
        let hx = size.x.abs() * 0.5;
        let hz = size.z.abs() * 0.5;
        let ex = (hx * c).abs() + (hz * s).abs();
        let ez = (hx * s).abs() + (hz * c).abs();
        let half = Vec3::new(ex, size.y.abs() * 0.5, ez);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap test. Touching faces do not count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Slab-method ray test. Returns the entry distance along `dir` when the
    /// ray hits the box within `max_dist`.
    pub fn ray_hit(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_dist;
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            if d.abs() < 1e-8 {
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (self.min[axis] - o) * inv;
            let mut t1 = (self.max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

/// Hermite smoothstep on a normalized `t`, clamped to [0, 1].
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linearly interpolate between two floats.
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two points.
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    // ==================== AABB TESTS ====================

    #[test]
    fn test_from_center_size() {
        let b = Aabb::from_center_size(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_new_orders_corners() {
        let b = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(b.min, Vec3::splat(-1.0));
        assert_eq!(b.max, Vec3::splat(1.0));
    }

    #[test]
    fn test_intersects_overlap() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_size(Vec3::new(0.5, 0.0, 0.0), Vec3::ONE);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_faces_do_not_intersect() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_size(Vec3::new(1.0, 0.0, 0.0), Vec3::ONE);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_quarter_turn_swaps_footprint() {
        let b = Aabb::from_center_size_yaw(
            Vec3::ZERO,
            Vec3::new(10.0, 2.0, 0.2),
            std::f32::consts::FRAC_PI_2,
        );
        assert!(approx_eq(b.size().x, 0.2));
        assert!((b.size().z - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_hit_front_face() {
        let b = Aabb::from_center_size(Vec3::new(0.0, 0.0, -5.0), Vec3::splat(2.0));
        let t = b.ray_hit(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 10.0);
        assert!(approx_eq(t.unwrap(), 4.0));
    }

    #[test]
    fn test_ray_miss_beyond_range() {
        let b = Aabb::from_center_size(Vec3::new(0.0, 0.0, -5.0), Vec3::splat(2.0));
        assert!(b.ray_hit(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 3.0).is_none());
        assert!(b.ray_hit(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 10.0).is_none());
    }

    // ==================== EASING TESTS ====================

    #[test]
    fn test_smoothstep_endpoints_and_midpoint() {
        assert!(approx_eq(smoothstep(0.0), 0.0));
        assert!(approx_eq(smoothstep(1.0), 1.0));
        assert!(approx_eq(smoothstep(0.5), 0.5));
        assert!(approx_eq(smoothstep(2.0), 1.0));
        assert!(approx_eq(smoothstep(-1.0), 0.0));
    }

    #[test]
    fn test_smoothstep_is_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = smoothstep(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_lerp() {
        assert!(approx_eq(lerp_f32(2.0, 4.0, 0.25), 2.5));
        let v = lerp_vec3(Vec3::ZERO, Vec3::new(2.0, 4.0, -2.0), 0.5);
        assert_eq!(v, Vec3::new(1.0, 2.0, -1.0));
    }
}
