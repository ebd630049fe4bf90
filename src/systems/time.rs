//! Clock step run at the head of every simulation tick.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance [`WorldTime`] by the driver's (already clamped) delta and return
/// the scaled delta the rest of the tick runs with.
pub fn update_world_time(world: &mut World, dt: f32) -> f32 {
    let delta = world.resource_mut::<WorldTime>().advance(dt);
    log::trace!("tick {:.4}s", delta);
    delta
}
