//! World snapshot: the flat record of persistent world flags.
//!
//! [`capture`] reads the flags out of a world, [`restore`] writes them back.
//! Restoring puts every object straight into its final state: no cues are
//! raised, no animation task is queued, and one-shot effects that already
//! happened (the portrait shattering, the wall reveal) are placed rather
//! than replayed. Applying the same snapshot twice leaves the world as
//! applying it once.

use bevy_ecs::prelude::*;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::components::door::Door;
use crate::components::interactable::Interactable;
use crate::components::keypad::Keypad;
use crate::components::props::{Portrait, WallReveal, Webs};
use crate::components::rat::Rat;
use crate::components::transform::Visibility;
use crate::resources::registry::InteractiveRegistry;
use crate::resources::worldflags::WorldFlags;
use crate::session::Inventory;
use crate::systems::door::set_door_resting;
use crate::systems::interaction::{apply_fan_state, place_revealed_key, set_item_present};
use crate::systems::triggers::{apply_wall_reveal, place_fallen_portrait};

/// Ids of the objects whose state the snapshot tracks.
pub mod ids {
    pub const WEBS: &str = "webs";
    pub const BATHROOM_DOOR: &str = "bathroom_door";
    pub const EXIT_DOOR: &str = "exit_door";
    pub const BASEMENT_DOOR: &str = "basement_door";
    pub const KEY: &str = "key";
    pub const HOUSE_KEY: &str = "house_key";
    pub const LIGHTER: &str = "lighter";
    pub const FLASHLIGHT: &str = "flashlight";
    pub const CAR_KEYS: &str = "car_keys";

    /// Items that are simply gone from the world once carried.
    pub const CARRIED_ITEMS: [&str; 4] = [HOUSE_KEY, LIGHTER, FLASHLIGHT, CAR_KEYS];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldSnapshot {
    pub webs_burned: bool,
    /// Bathroom door standing open.
    pub door_unlocked: bool,
    /// Front door standing open.
    pub exit_door_unlocked: bool,
    pub basement_door_unlocked: bool,
    pub key_revealed: bool,
    pub house_key_revealed: bool,
    pub bedroom_door_revealed: bool,
    pub portrait_triggered: bool,
    pub scare_triggered: bool,
    pub is_fan_on: bool,
    pub rat_triggered: bool,
}

impl Default for WorldSnapshot {
    /// State of a freshly built house.
    fn default() -> Self {
        Self {
            webs_burned: false,
            door_unlocked: false,
            exit_door_unlocked: false,
            basement_door_unlocked: false,
            key_revealed: false,
            house_key_revealed: true,
            bedroom_door_revealed: false,
            portrait_triggered: false,
            scare_triggered: false,
            is_fan_on: true,
            rat_triggered: false,
        }
    }
}

fn lookup(world: &World, id: &str) -> Option<Entity> {
    world.resource::<InteractiveRegistry>().get(id)
}

fn door_open(world: &World, id: &str) -> bool {
    lookup(world, id)
        .and_then(|e| world.get::<Door>(e))
        .is_some_and(|d| d.is_open)
}

fn object_visible(world: &World, id: &str) -> bool {
    lookup(world, id)
        .and_then(|e| world.get::<Interactable>(e))
        .is_some_and(|it| it.visible)
}

/// Read the persistent flags out of `world`.
pub fn capture(world: &mut World) -> WorldSnapshot {
    let flags = *world.resource::<WorldFlags>();
    let webs_burned = lookup(world, ids::WEBS)
        .and_then(|e| world.get::<Interactable>(e))
        .is_some_and(|it| !it.visible);
    let basement_door_unlocked = lookup(world, ids::BASEMENT_DOOR)
        .and_then(|e| world.get::<Door>(e))
        .is_some_and(|d| !d.is_locked);

    WorldSnapshot {
        webs_burned,
        door_unlocked: door_open(world, ids::BATHROOM_DOOR),
        exit_door_unlocked: door_open(world, ids::EXIT_DOOR),
        basement_door_unlocked,
        key_revealed: flags.key_revealed,
        house_key_revealed: object_visible(world, ids::HOUSE_KEY),
        bedroom_door_revealed: world
            .query::<&WallReveal>()
            .iter(world)
            .any(|w| w.revealed),
        portrait_triggered: world.query::<&Portrait>().iter(world).any(|p| p.triggered),
        scare_triggered: flags.scare_triggered,
        is_fan_on: flags.fan_on,
        rat_triggered: world.query::<&Rat>().iter(world).any(|r| r.triggered),
    }
}

/// Apply `snapshot` to `world`. Items the player carries stay out of the
/// world whatever the snapshot says.
pub fn restore(world: &mut World, snapshot: &WorldSnapshot, inventory: &Inventory) {
    debug!("Restoring world state: {:?}", snapshot);

    if snapshot.rat_triggered {
        let mut rats = world.query::<(&mut Rat, Option<&mut Visibility>)>();
        for (mut rat, vis) in rats.iter_mut(world) {
            rat.triggered = true;
            rat.retire();
            if let Some(mut vis) = vis {
                vis.0 = false;
            }
        }
    }

    apply_fan_state(world, snapshot.is_fan_on);

    if snapshot.scare_triggered {
        world.resource_mut::<WorldFlags>().scare_triggered = true;
    }

    if snapshot.portrait_triggered {
        let portraits: Vec<Entity> = world
            .query_filtered::<Entity, With<Portrait>>()
            .iter(world)
            .collect();
        for portrait in portraits {
            place_fallen_portrait(world, portrait);
        }
    }

    let walls: Vec<Entity> = world
        .query_filtered::<Entity, With<WallReveal>>()
        .iter(world)
        .collect();
    for wall in walls {
        apply_wall_reveal(world, wall, snapshot.bedroom_door_revealed);
    }

    if let Some(webs) = lookup(world, ids::WEBS) {
        set_item_present(world, webs, !snapshot.webs_burned);
        if let Some(mut w) = world.get_mut::<Webs>(webs) {
            w.burning = snapshot.webs_burned;
            w.progress = if snapshot.webs_burned { 1.0 } else { 0.0 };
        }
    }

    if let Some(basement) = lookup(world, ids::BASEMENT_DOOR) {
        let unlocked = snapshot.basement_door_unlocked;
        if let Some(mut door) = world.get_mut::<Door>(basement) {
            door.is_locked = !unlocked;
        }
        let mut keypads = world.query::<&mut Keypad>();
        for mut keypad in keypads.iter_mut(world) {
            if keypad.door == Some(basement) {
                keypad.force_unlocked(unlocked);
            }
        }
    }

    world.resource_mut::<WorldFlags>().key_revealed = snapshot.key_revealed;
    if let Some(key) = lookup(world, ids::KEY) {
        if snapshot.key_revealed && !inventory.has(ids::KEY) {
            place_revealed_key(world, key);
        } else {
            set_item_present(world, key, false);
        }
    }

    for id in ids::CARRIED_ITEMS {
        if let Some(item) = lookup(world, id) {
            set_item_present(world, item, !inventory.has(id));
        }
    }

    for (id, open) in [
        (ids::BATHROOM_DOOR, snapshot.door_unlocked),
        (ids::EXIT_DOOR, snapshot.exit_door_unlocked),
    ] {
        if let Some(door) = lookup(world, id) {
            set_door_resting(world, door, open);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_camel_case() {
        let json = serde_json::to_string(&WorldSnapshot::default()).unwrap();
        for key in [
            "websBurned",
            "doorUnlocked",
            "exitDoorUnlocked",
            "basementDoorUnlocked",
            "keyRevealed",
            "houseKeyRevealed",
            "bedroomDoorRevealed",
            "portraitTriggered",
            "scareTriggered",
            "isFanOn",
            "ratTriggered",
        ] {
            assert!(json.contains(key), "missing {}", key);
        }
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let s: WorldSnapshot = serde_json::from_str(r#"{"websBurned": true}"#).unwrap();
        assert!(s.webs_burned);
        assert!(s.is_fan_on);
        assert!(!s.portrait_triggered);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let s: WorldSnapshot =
            serde_json::from_str(r#"{"isFanOn": false, "somethingNew": 3}"#).unwrap();
        assert!(!s.is_fan_on);
    }
}
