//! Keypad button presses and their effect on the linked door.

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::door::Door;
use crate::components::interactable::{InteractionContext, Outcome};
use crate::components::keypad::{KeyResponse, Keypad, KeypadKey};
use crate::events::cue::{WorldCue, emit_cue};
use crate::resources::scheduler::{TaskScheduler, after};

/// Seconds the "ERR" flash stays on the screen.
pub const ERROR_FLASH_SECONDS: f32 = 1.0;

pub const ACCEPTED_LINE: &str = "The keypad turned green. The door should be open now.";

/// Press one button on a keypad.
///
/// A correct code unlocks the linked door exactly once. A wrong code clears
/// the buffer, flashes "ERR" and queues a task that restores the display.
pub fn press_key(
    world: &mut World,
    keypad: Entity,
    key: KeypadKey,
    ctx: &mut dyn InteractionContext,
) -> Outcome {
    let Some(mut pad) = world.get_mut::<Keypad>(keypad) else {
        return Outcome::None;
    };
    let response = pad.press(key);
    let door = pad.door;
    debug!("Keypad {} -> {:?} [{}]", key, response, pad.display());

    match response {
        KeyResponse::Ignored => return Outcome::None,
        KeyResponse::Typed | KeyResponse::Cleared => emit_cue(world, WorldCue::KeypadTick),
        KeyResponse::Accepted => {
            emit_cue(world, WorldCue::KeypadAccepted);
            if let Some(mut door) = door.and_then(|d| world.get_mut::<Door>(d)) {
                door.is_locked = false;
            }
            info!("Keypad accepted the code");
            ctx.speak(ACCEPTED_LINE);
        }
        KeyResponse::Rejected => {
            emit_cue(world, WorldCue::KeypadRejected);
            world
                .resource_mut::<TaskScheduler>()
                .spawn(after(ERROR_FLASH_SECONDS, move |world: &mut World| {
                    if let Some(mut pad) = world.get_mut::<Keypad>(keypad) {
                        pad.reset_display();
                    }
                }));
        }
    }
    Outcome::None
}
