//! World-space placement and visibility of simulated objects.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Position and Euler rotation (radians, XYZ order) of an entity.
///
/// Only the rotation channels the simulation animates are meaningful:
/// yaw (`rotation.y`) for doors and vehicles, pitch (`rotation.x`) for
/// the falling portrait.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Vec3::ZERO,
        }
    }

    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.rotation.y = yaw;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }
}

/// Render visibility of a plain visual (child meshes, effects, props that
/// are not themselves interactive).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility(pub bool);

impl Default for Visibility {
    fn default() -> Self {
        Visibility(true)
    }
}

impl Visibility {
    pub const VISIBLE: Visibility = Visibility(true);
    pub const HIDDEN: Visibility = Visibility(false);

    pub fn is_visible(&self) -> bool {
        self.0
    }
}
