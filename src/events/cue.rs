//! Audio/visual cues raised by the simulation.
//!
//! The core never synthesizes sound or draws effects. Whenever something the
//! player should hear or see happens (a door creaks, a ball drops into a
//! pocket), the responsible system writes a [`WorldCue`] into
//! `Messages<WorldCue>`. The outer layer drains them once per frame with
//! [`Simulation::drain_cues`](crate::simulation::Simulation::drain_cues).

use bevy_ecs::message::Message;
use bevy_ecs::prelude::*;
use glam::Vec3;

/// Something the presentation layer should play or show.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum WorldCue {
    /// A door or container started opening.
    DoorCreak { id: String },
    /// A door or container started closing.
    DoorClick { id: String },
    /// The player pushed through the bead curtain.
    CurtainBrushed { position: Vec3 },
    /// The cue ball was struck.
    BallStruck,
    /// Two balls collided hard enough to be heard.
    BallsClack { impulse: f32 },
    /// A ball fell into a pocket.
    BallPocketed { cue: bool },
    /// The portrait hit the floor.
    GlassBreak { position: Vec3 },
    /// The rat started running.
    RatSqueak,
    /// The mirror apparition appeared.
    Scream,
    KeypadTick,
    KeypadAccepted,
    KeypadRejected,
    FanToggled { on: bool },
    /// Running water started or stopped (shower valve, taps).
    Water { id: String, on: bool },
    WebsBurning,
    EngineStart,
}

/// Write a cue from exclusive code. Silently dropped when the world has no
/// cue queue (bare test worlds).
pub fn emit_cue(world: &mut World, cue: WorldCue) {
    if let Some(mut messages) = world.get_resource_mut::<Messages<WorldCue>>() {
        messages.write(cue);
    }
}

/// Advance the cue queue. Cues not drained within two ticks are dropped.
pub fn update_cue_messages(mut messages: ResMut<Messages<WorldCue>>) {
    messages.update();
}
