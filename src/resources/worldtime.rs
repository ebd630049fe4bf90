use bevy_ecs::prelude::Resource;

/// Simulation clock, advanced once per [`Simulation::update`](crate::simulation::Simulation::update).
///
/// `delta` is what every system and task sees for the current tick. It is
/// already clamped by the driver and scaled by `time_scale`.
#[derive(Resource, Debug, Clone, Copy)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Move the clock by `dt` unscaled seconds. Negative input counts as a
    /// zero-length tick.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.delta = dt.max(0.0) * self.time_scale.max(0.0);
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.delta
    }

    /// Seconds since `since`, in simulation time.
    pub fn since(&self, since: f32) -> f32 {
        (self.elapsed - since).max(0.0)
    }
}
