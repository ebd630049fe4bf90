//! One-off scripted props.
//!
//! - [`Webs`] – cobwebs burned with the lighter, dropping the key they hide
//! - [`Tap`] – sink taps and the shower valve
//! - [`Portrait`] – picture that falls when the player first walks past
//! - [`GlassShard`] – debris left by the portrait
//! - [`Mirror`] / [`Apparition`] – the bathroom mirror and its one-shot scare
//! - [`WallReveal`] – hallway wall swapped for a doorway once
//! - [`Car`] – getaway car driven by the win sequence

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec3;
use smallvec::SmallVec;
use std::f32::consts::PI;

/// Seconds the webs take to burn away.
pub const WEBS_BURN_DURATION: f32 = 1.5;
/// Burn progress at which the hidden key drops.
pub const WEBS_KEY_DROP_PROGRESS: f32 = 0.3;
/// Gravity applied to the dropping key.
pub const KEY_DROP_GRAVITY: f32 = 9.8;
/// Height at which the dropped key comes to rest.
pub const KEY_FLOOR_Y: f32 = 0.12;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Webs {
    /// Item entity hidden in the webs.
    pub key: Entity,
    pub burning: bool,
    /// Burn progress in [0, 1].
    pub progress: f32,
}

impl Webs {
    pub fn new(key: Entity) -> Self {
        Self {
            key,
            burning: false,
            progress: 0.0,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tap {
    pub is_open: bool,
    /// Shower water driven by this valve.
    pub shower: Option<Entity>,
}

impl Tap {
    pub fn new() -> Self {
        Self {
            is_open: false,
            shower: None,
        }
    }

    pub fn with_shower(mut self, shower: Entity) -> Self {
        self.shower = Some(shower);
        self
    }

    pub fn prompt(&self) -> &'static str {
        if self.is_open { "Turn Off" } else { "Turn On" }
    }
}

impl Default for Tap {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Portrait {
    pub triggered: bool,
    /// Glass shards have been spawned.
    pub shattered: bool,
    pub trigger_radius: f32,
    pub fall_duration: f32,
    /// Height of the frame once on the floor.
    pub floor_y: f32,
    /// Pitch of the frame once on the floor.
    pub fallen_tilt: f32,
    pub shards: u32,
}

impl Default for Portrait {
    fn default() -> Self {
        Self {
            triggered: false,
            shattered: false,
            trigger_radius: 2.5,
            fall_duration: 0.4,
            floor_y: 0.5,
            fallen_tilt: PI / 2.5,
            shards: 8,
        }
    }
}

/// Broken glass lying on the floor.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct GlassShard;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Mirror {
    /// Seconds the player has kept looking at the mirror.
    pub stare: f32,
    /// Staring this long triggers the scare.
    pub stare_threshold: f32,
    pub apparition: Option<Entity>,
}

impl Default for Mirror {
    fn default() -> Self {
        Self {
            stare: 0.0,
            stare_threshold: 2.0,
            apparition: None,
        }
    }
}

/// Seconds the apparition stays visible.
pub const APPARITION_DURATION: f32 = 0.8;

/// The face in the mirror.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Apparition;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct WallReveal {
    pub revealed: bool,
    /// Fires when the player goes past this Z (towards negative Z).
    pub trigger_z: f32,
    /// Collider used while the wall is still solid.
    pub solid: Entity,
    /// Colliders framing the doorway once revealed.
    pub doorway: SmallVec<[Entity; 3]>,
    /// Door placed in the new doorway.
    pub door: Entity,
}

/// Seconds the engine cranks before the car moves.
pub const CAR_CRANK_TIME: f32 = 1.5;
pub const CAR_ACCELERATION: f32 = 8.0;
pub const CAR_TOP_SPEED: f32 = 25.0;

#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Car {
    pub driving: bool,
    pub timer: f32,
    pub speed: f32,
    pub wheel_angle: f32,
}

impl Car {
    /// Direction the car drives away in.
    pub const HEADING: Vec3 = Vec3::new(0.0, 0.0, -1.0);
}
