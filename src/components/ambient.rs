//! Ambient particle effects and the ceiling fan.
//!
//! - [`DustMotes`] – slow drifting specks confined to a box
//! - [`ShowerWater`] – falling drops under the shower head, faded in and out
//! - [`Fan`] – spinning ceiling fan blades
//!
//! Particle positions are local to the entity's
//! [`Transform`](crate::components::transform::Transform).

use bevy_ecs::prelude::Component;
use glam::Vec3;
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mote {
    pub position: Vec3,
    pub velocity: Vec3,
}

#[derive(Component, Debug, Clone)]
pub struct DustMotes {
    /// Full size of the box the motes drift in, centered on the origin.
    pub volume: Vec3,
    pub motes: Vec<Mote>,
}

impl DustMotes {
    pub fn new(volume: Vec3, count: usize, rng: &mut fastrand::Rng) -> Self {
        let motes = (0..count)
            .map(|_| Mote {
                position: Vec3::new(
                    (rng.f32() - 0.5) * volume.x,
                    (rng.f32() - 0.5) * volume.y,
                    (rng.f32() - 0.5) * volume.z,
                ),
                velocity: Vec3::new(
                    (rng.f32() - 0.5) * 0.01,
                    (rng.f32() - 0.5) * 0.01,
                    (rng.f32() - 0.5) * 0.01,
                ),
            })
            .collect();
        Self { volume, motes }
    }
}

/// Opacity the water fades towards while running.
pub const SHOWER_OPACITY: f32 = 0.4;
/// Drops below this local height respawn at the head.
pub const SHOWER_FLOOR: f32 = -2.1;
const SHOWER_HEAD_RADIUS: f32 = 0.12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drop {
    pub position: Vec3,
    pub speed: f32,
}

#[derive(Component, Debug, Clone)]
pub struct ShowerWater {
    pub active: bool,
    pub opacity: f32,
    /// Whether anything is drawn at all.
    pub visible: bool,
    pub drops: Vec<Drop>,
}

impl ShowerWater {
    pub fn new(count: usize, rng: &mut fastrand::Rng) -> Self {
        let drops = (0..count).map(|_| Self::spawn_drop(rng)).collect();
        Self {
            active: false,
            opacity: 0.0,
            visible: false,
            drops,
        }
    }

    /// A new drop just under the head, spread over its disc.
    pub fn spawn_drop(rng: &mut fastrand::Rng) -> Drop {
        let angle = rng.f32() * TAU;
        let r = rng.f32().sqrt() * SHOWER_HEAD_RADIUS;
        Drop {
            position: Vec3::new(angle.cos() * r, -rng.f32() * 0.1, angle.sin() * r),
            speed: 1.5 + rng.f32() * 2.0,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Fan {
    /// Blade angle about Y in radians.
    pub angle: f32,
    /// Angular speed in radians per second while running.
    pub speed: f32,
}

impl Default for Fan {
    fn default() -> Self {
        Self {
            angle: 0.0,
            speed: 2.5,
        }
    }
}
