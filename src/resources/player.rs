//! Player-related resources.

use bevy_ecs::prelude::Resource;
use glam::Vec3;

/// Player position as seen by the tick in progress. `None` when the frame
/// driver did not report one; proximity triggers are skipped then.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerProbe {
    pub position: Option<Vec3>,
}

/// Movement tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSettings {
    /// Eye height above the feet.
    pub height: f32,
    /// Full size of the collision box.
    pub size: Vec3,
    pub speed: f32,
    pub jump_force: f32,
    pub gravity: f32,
    /// Reach for aiming at interactive objects.
    pub interact_distance: f32,
    /// Consecutive frames without a floor hit before falling freely.
    pub floor_miss_frames: u32,
    /// Height above the feet the ground ray starts from.
    pub probe_height: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            height: 1.6,
            size: Vec3::new(0.6, 2.0, 0.6),
            speed: 3.0,
            jump_force: 6.0,
            gravity: 30.0,
            interact_distance: 2.8,
            floor_miss_frames: 10,
            probe_height: 2.0,
        }
    }
}
