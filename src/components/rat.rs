//! The rat that bolts down the hallway.

use bevy_ecs::prelude::Component;
use glam::Vec3;
use smallvec::SmallVec;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Rat {
    pub waypoints: SmallVec<[Vec3; 8]>,
    pub current: usize,
    /// Meters per second.
    pub speed: f32,
    /// Distance at which a waypoint counts as reached.
    pub reach: f32,
    /// Running. Set shortly after `triggered`.
    pub active: bool,
    pub triggered: bool,
    pub despawned: bool,
    /// The run starts when the player comes within `trigger_radius` of this.
    pub trigger_point: Vec3,
    pub trigger_radius: f32,
    /// Seconds between trigger and the start of the run.
    pub start_delay: f32,
}

impl Rat {
    pub fn new(waypoints: impl IntoIterator<Item = Vec3>, trigger_point: Vec3) -> Self {
        Self {
            waypoints: waypoints.into_iter().collect(),
            current: 0,
            speed: 4.8,
            reach: 0.2,
            active: false,
            triggered: false,
            despawned: false,
            trigger_point,
            trigger_radius: 3.5,
            start_delay: 0.15,
        }
    }

    pub fn start(&self) -> Vec3 {
        self.waypoints.first().copied().unwrap_or(Vec3::ZERO)
    }

    /// Put the rat back in its hiding spot, untriggered.
    pub fn reset(&mut self) {
        self.current = 0;
        self.active = false;
        self.triggered = false;
        self.despawned = false;
    }

    /// Mark the run as already over.
    pub fn retire(&mut self) {
        self.triggered = true;
        self.active = false;
        self.despawned = true;
    }
}
