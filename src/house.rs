//! The bundled house.
//!
//! [`House`] lays out the rooms, walls, floors and every interactive object
//! of the default world. Coordinates are in meters with Y up; the player
//! starts in the bathroom facing the door (negative Z).
//!
//! Room footprints (XZ):
//!
//! | room     | x            | z               | floor |
//! |----------|--------------|-----------------|-------|
//! | bathroom | -2.5 .. 2.5  | -2.5 .. 2.5     | 0.0   |
//! | hallway  | -1.5 .. 1.5  | -12.5 .. -2.5   | 0.0   |
//! | bedroom  | -6.5 .. -1.5 | -10.5 .. -4.5   | 0.0   |
//! | living   | -5 .. 5      | -24.5 .. -12.5  | 0.0   |
//! | kitchen  | 5 .. 13      | -23.5 .. -13.5  | 0.0   |
//! | basement | -20 .. -10   | -24.5 .. -12.5  | -3.5  |
//! | outside  | -25 .. 25    | -50 .. -24.5    | 0.0   |

use std::f32::consts::{FRAC_PI_2, PI};

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use smallvec::smallvec;

use crate::components::ambient::{DustMotes, Fan, ShowerWater};
use crate::components::collider::Floor;
use crate::components::curtain::BeadCurtain;
use crate::components::door::{Door, DoorAccess, Pose};
use crate::components::interactable::{Behavior, Interactable, Panel};
use crate::components::keypad::{Keypad, KeypadKey};
use crate::components::pooltable::PoolTable;
use crate::components::props::{Apparition, Car, Mirror, Portrait, Tap, WallReveal, Webs};
use crate::components::rat::Rat;
use crate::components::transform::{Transform, Visibility};
use crate::math::Aabb;
use crate::persistence::snapshot::ids;
use crate::resources::registry::RegisterError;
use crate::simulation::{ContentBuilder, WorldContent};
use crate::systems::interaction::apply_fan_state;
use crate::systems::triggers::apply_wall_reveal;

/// Feet position the player starts at.
pub const PLAYER_START: Vec3 = Vec3::new(0.0, 0.0, 1.0);

const DOOR_LEAF: Vec3 = Vec3::new(1.0, 2.2, 0.1);
const WALL: f32 = 0.2;
const ITEM_PICK: Vec3 = Vec3::splat(0.3);

const KITCHEN_NOTE: &str = "Sarah, \n\nI've hidden the house key in the base cabinet right under the sink. Use it to get out. I'm taking the car to the shop. If I'm not back, just... keep running. \n\n- Arthur";
const BEDROOM_NOTE: &str = "Day 42. The lights in the bathroom are flickering again. I can't shake the feeling that the hallway is getting longer. \n\nI've locked the basement. I don't want to hear those sounds anymore.";

/// The default world.
#[derive(Debug, Clone, Copy, Default)]
pub struct House;

impl WorldContent for House {
    fn build(&self, b: &mut ContentBuilder) -> Result<(), RegisterError> {
        floors(b);
        walls(b);
        bathroom(b)?;
        hallway(b)?;
        living_room(b)?;
        kitchen(b)?;
        bedroom(b)?;
        basement(b)?;
        outside(b)?;
        ambience(b);
        apply_fan_state(b.world(), true);
        Ok(())
    }
}

/// Wall spanning `min..max` on X and Z, from `y0` up `height`.
fn wall(b: &mut ContentBuilder, min: Vec2, max: Vec2, y0: f32, height: f32) -> Entity {
    b.collider(Aabb::new(
        Vec3::new(min.x, y0, min.y),
        Vec3::new(max.x, y0 + height, max.y),
    ))
}

/// Wall along X at `z`.
fn wall_x(b: &mut ContentBuilder, x0: f32, x1: f32, z: f32, height: f32) -> Entity {
    wall(
        b,
        Vec2::new(x0, z - WALL / 2.0),
        Vec2::new(x1, z + WALL / 2.0),
        0.0,
        height,
    )
}

/// Wall along Z at `x`.
fn wall_z(b: &mut ContentBuilder, x: f32, z0: f32, z1: f32, height: f32) -> Entity {
    wall(
        b,
        Vec2::new(x - WALL / 2.0, z0),
        Vec2::new(x + WALL / 2.0, z1),
        0.0,
        height,
    )
}

fn item(
    b: &mut ContentBuilder,
    id: &str,
    name: &str,
    at: Vec3,
) -> Result<Entity, RegisterError> {
    b.object(
        Interactable::item(id, name)
            .with_prompt(format!("Pick up {}", name))
            .with_pick_size(ITEM_PICK),
        Transform::from_translation(at),
        Visibility::VISIBLE,
    )
}

fn floors(b: &mut ContentBuilder) {
    for (min, max) in [
        (Vec2::new(-2.5, -2.5), Vec2::new(2.5, 2.5)),
        (Vec2::new(-1.5, -12.5), Vec2::new(1.5, -2.5)),
        (Vec2::new(-6.5, -10.5), Vec2::new(-1.5, -4.5)),
        (Vec2::new(-5.0, -24.5), Vec2::new(5.0, -12.5)),
        (Vec2::new(5.0, -23.5), Vec2::new(13.0, -13.5)),
        (Vec2::new(-25.0, -50.0), Vec2::new(25.0, -24.5)),
    ] {
        b.floor(Floor::flat(min, max, 0.0));
    }
    b.floor(Floor::flat(
        Vec2::new(-20.0, -24.5),
        Vec2::new(-10.0, -12.5),
        -3.5,
    ));
    // stairs down from the living room door
    b.floor(Floor::ramp(
        Vec2::new(-10.0, -19.1),
        Vec2::new(-5.0, -17.9),
        -3.5,
        0.0,
        true,
    ));
}

fn walls(b: &mut ContentBuilder) {
    // bathroom, with the door gap at x -0.5..0.5
    wall_x(b, -2.5, 2.5, 2.5, 3.5);
    wall_z(b, -2.5, -2.5, 2.5, 3.5);
    wall_z(b, 2.5, -2.5, 2.5, 3.5);
    wall_x(b, -2.5, -0.5, -2.5, 3.5);
    wall_x(b, 0.5, 2.5, -2.5, 3.5);

    // hallway right side; the left side belongs to the wall reveal
    wall_z(b, 1.5, -12.5, -2.5, 3.5);

    // living room front, opening onto the hallway
    wall_x(b, -5.0, -1.5, -12.5, 4.0);
    wall_x(b, 1.5, 5.0, -12.5, 4.0);
    // front wall of the house, exit door gap at x -0.5..0.5
    wall_x(b, -5.0, -0.5, -24.5, 4.0);
    wall_x(b, 0.5, 5.0, -24.5, 4.0);
    // left wall, basement door gap at z -19..-18
    wall_z(b, -5.0, -24.5, -19.0, 4.0);
    wall_z(b, -5.0, -18.0, -12.5, 4.0);
    wall(
        b,
        Vec2::new(-5.1, -19.0),
        Vec2::new(-4.9, -18.0),
        2.2,
        1.8,
    );
    // archway to the kitchen, curtain hangs in the gap
    wall_z(b, 5.0, -24.5, -19.75, 4.0);
    wall_z(b, 5.0, -17.25, -12.5, 4.0);

    // kitchen
    wall_z(b, 13.0, -23.5, -13.5, 4.0);
    wall_x(b, 5.0, 13.0, -13.5, 4.0);
    wall_x(b, 5.0, 13.0, -23.5, 4.0);

    // bedroom
    wall_z(b, -6.5, -10.5, -4.5, 3.5);
    wall_x(b, -6.5, -1.5, -4.5, 3.5);
    wall_x(b, -6.5, -1.5, -10.5, 3.5);

    // stairwell and basement
    wall(
        b,
        Vec2::new(-10.0, -19.3),
        Vec2::new(-5.0, -19.1),
        -3.5,
        7.5,
    );
    wall(
        b,
        Vec2::new(-10.0, -17.9),
        Vec2::new(-5.0, -17.7),
        -3.5,
        7.5,
    );
    for (min, max) in [
        (Vec2::new(-20.1, -24.5), Vec2::new(-19.9, -12.5)),
        (Vec2::new(-20.0, -24.6), Vec2::new(-10.0, -24.4)),
        (Vec2::new(-20.0, -12.6), Vec2::new(-10.0, -12.4)),
        (Vec2::new(-10.1, -24.5), Vec2::new(-9.9, -19.3)),
        (Vec2::new(-10.1, -17.7), Vec2::new(-9.9, -12.5)),
    ] {
        wall(b, min, max, -3.5, 4.0);
    }

    // world boundaries
    wall_x(b, -25.0, 25.0, -50.0, 5.0);
    wall_x(b, -25.0, 25.0, 10.0, 5.0);
    wall_z(b, -25.0, -50.0, 10.0, 5.0);
    wall_z(b, 25.0, -50.0, 10.0, 5.0);
}

// ==================== BATHROOM ====================

fn bathroom(b: &mut ContentBuilder) -> Result<(), RegisterError> {
    b.door(
        ids::BATHROOM_DOOR,
        "Bathroom Door",
        DoorAccess::EquippedItem {
            item: ids::KEY.to_string(),
            holding_hint: "I have the key, I just need to hold it.".to_string(),
            missing_hint: "Locked. I need a key... I think I see something in the spider webs."
                .to_string(),
        },
        Door::new(
            Pose::new(Vec3::new(0.0, 1.1, -2.5), 0.0),
            Pose::new(Vec3::new(-0.5, 1.1, -3.0), FRAC_PI_2),
        ),
        DOOR_LEAF,
    )?;

    item(b, ids::LIGHTER, "Lighter", Vec3::new(-1.4, 0.98, 2.1))?;

    let key = b.object(
        Interactable::item(ids::KEY, "Old Key")
            .with_prompt("Pick up Old Key")
            .with_pick_size(ITEM_PICK)
            .hidden(),
        Transform::from_xyz(-2.2, 1.0, -2.2),
        Visibility::HIDDEN,
    )?;
    b.object(
        Interactable::new(ids::WEBS, "Spiderwebs", Behavior::Webs)
            .with_prompt("Burn spiderwebs")
            .with_pick_size(Vec3::new(0.6, 0.8, 0.6)),
        Transform::from_xyz(-2.2, 0.75, -2.2),
        (Webs::new(key), Visibility::VISIBLE),
    )?;

    for (id, name, x) in [
        ("bath_handle_hot", "Hot Tap", -1.72),
        ("bath_handle_cold", "Cold Tap", -1.48),
    ] {
        b.object(
            Interactable::new(id, name, Behavior::Tap)
                .with_prompt("Turn Tap")
                .with_pick_size(Vec3::splat(0.1)),
            Transform::from_xyz(x, 0.98, 2.25),
            Tap::new(),
        )?;
    }

    let mut rng = fastrand::Rng::with_seed(0x5a0e);
    let shower = b.spawn((
        ShowerWater::new(600, &mut rng),
        Transform::from_xyz(1.75, 2.31, -1.6),
    ));
    b.object(
        Interactable::new("shower_valve", "Shower Valve", Behavior::Tap)
            .with_prompt("Turn On")
            .with_pick_size(Vec3::splat(0.15)),
        Transform::from_xyz(1.75, 1.35, -2.05),
        Tap::new().with_shower(shower),
    )?;

    let apparition = b.spawn((
        Apparition,
        Transform::from_xyz(-1.8, 1.8, 2.3).with_yaw(PI),
        Visibility::HIDDEN,
    ));
    b.object(
        Interactable::new("mirror", "Mirror", Behavior::Silent)
            .with_prompt("")
            .with_pick_size(Vec3::new(1.0, 1.4, 0.1)),
        Transform::from_xyz(-1.8, 2.0, 2.35).with_yaw(PI),
        Mirror {
            apparition: Some(apparition),
            ..Mirror::default()
        },
    )?;
    Ok(())
}

// ==================== HALLWAY ====================

fn hallway(b: &mut ContentBuilder) -> Result<(), RegisterError> {
    item(b, ids::FLASHLIGHT, "Flashlight", Vec3::new(0.0, 0.15, -7.5))?;

    b.spawn((
        Rat::new(
            [
                Vec3::new(1.2, 0.05, -5.5),
                Vec3::new(0.0, 0.05, -7.8),
                Vec3::new(-1.0, 0.05, -10.5),
                Vec3::new(0.1, 0.05, -13.5),
                Vec3::new(5.0, 0.05, -18.5),
                Vec3::new(12.0, 0.05, -18.5),
            ],
            Vec3::new(0.0, 0.15, -7.5),
        ),
        Transform::from_xyz(1.2, 0.05, -5.5),
        Visibility::HIDDEN,
    ));

    b.object(
        Interactable::new("fan_switch", "Light Switch", Behavior::FanSwitch)
            .with_prompt("Toggle Fan")
            .with_pick_size(Vec3::new(0.15, 0.2, 0.1)),
        Transform::from_xyz(-1.2, 1.4, -12.8).with_yaw(PI),
        (),
    )?;

    // Left hallway wall: solid until the player walks into the living room,
    // then a doorway to the bedroom.
    let solid = wall_z(b, -1.5, -12.5, -2.5, 3.5);
    let doorway = [
        b.dormant_collider(Aabb::new(
            Vec3::new(-1.6, 0.0, -12.5),
            Vec3::new(-1.4, 3.5, -8.0),
        )),
        b.dormant_collider(Aabb::new(
            Vec3::new(-1.6, 0.0, -7.0),
            Vec3::new(-1.4, 3.5, -2.5),
        )),
        b.dormant_collider(Aabb::new(
            Vec3::new(-1.6, 2.2, -8.0),
            Vec3::new(-1.4, 3.5, -7.0),
        )),
    ];
    b.world().entity_mut(solid).insert(Visibility::VISIBLE);
    for piece in doorway {
        b.world().entity_mut(piece).insert(Visibility::HIDDEN);
    }
    let door = b.door(
        "bedroom_door",
        "Bedroom Door",
        DoorAccess::Free,
        Door::new(
            Pose::new(Vec3::new(-1.5, 1.1, -7.5), FRAC_PI_2),
            Pose::new(Vec3::new(-2.0, 1.1, -7.0), PI),
        ),
        DOOR_LEAF,
    )?;
    let reveal = b.spawn(WallReveal {
        revealed: false,
        trigger_z: -13.5,
        solid,
        doorway: smallvec![doorway[0], doorway[1], doorway[2]],
        door,
    });
    apply_wall_reveal(b.world(), reveal, false);
    Ok(())
}

// ==================== LIVING ROOM ====================

fn living_room(b: &mut ContentBuilder) -> Result<(), RegisterError> {
    b.door(
        ids::EXIT_DOOR,
        "Front Door",
        DoorAccess::EquippedItem {
            item: ids::HOUSE_KEY.to_string(),
            holding_hint: "I found the house key, I just need to hold it.".to_string(),
            missing_hint: "Locked. That note on the island... it was for someone named Sarah. It mentioned a key.".to_string(),
        },
        Door::new(
            Pose::new(Vec3::new(0.0, 1.1, -24.5), 0.0),
            Pose::new(Vec3::new(-0.5, 1.1, -24.0), -FRAC_PI_2),
        ),
        DOOR_LEAF,
    )?;

    let basement = b.door(
        ids::BASEMENT_DOOR,
        "Basement Door",
        DoorAccess::Lockable {
            hint: "It won't budge. Looks like it's linked to this electronic keypad.".to_string(),
        },
        Door::new(
            Pose::new(Vec3::new(-5.0, 1.1, -18.5), FRAC_PI_2),
            Pose::new(Vec3::new(-4.5, 1.1, -18.0), 0.0),
        )
        .locked(),
        DOOR_LEAF,
    )?;

    // keypad faces +X from the left wall, buttons in a 3x4 grid
    let origin = Vec3::new(-4.85, 1.4, -19.3);
    let code = b.config().keypad_code.clone();
    let keypad = b.spawn((
        Keypad::new(&code).with_door(basement),
        Transform::from_translation(origin).with_yaw(FRAC_PI_2),
    ));
    for (i, key) in KeypadKey::LAYOUT.into_iter().enumerate() {
        let (row, col) = ((i / 3) as f32, (i % 3) as f32);
        let at = origin + Vec3::new(0.025, 0.01 - row * 0.04, -(col - 1.0) * 0.04);
        let id = format!("keypad_{}", key).to_lowercase();
        b.object(
            Interactable::new(id, format!("Keypad {}", key), Behavior::KeypadButton { keypad, key })
                .with_prompt(format!("Press {}", key))
                .with_pick_size(Vec3::splat(0.035)),
            Transform::from_translation(at),
            (),
        )?;
    }

    b.spawn((Fan::default(), Transform::from_xyz(0.0, 4.0, -18.5)));

    let settings = b.config().curtain.clone();
    let origin = Vec3::new(5.0, 2.5, -18.5);
    let curtain = b.spawn(BeadCurtain::new(origin, 0.0, settings));
    b.object(
        Interactable::new("bead_curtain", "Bead Curtain", Behavior::Curtain { curtain })
            .with_prompt("")
            .with_pick_size(Vec3::new(0.3, 2.3, 2.5)),
        Transform::from_xyz(5.0, 1.35, -18.5),
        (),
    )?;
    Ok(())
}

// ==================== KITCHEN ====================

fn kitchen(b: &mut ContentBuilder) -> Result<(), RegisterError> {
    item(b, ids::HOUSE_KEY, "House Key", Vec3::new(8.5, 0.15, -23.0))?;

    b.object(
        Interactable::new(
            "kitchen_note",
            "Scrawled Note",
            Behavior::Reader(Panel::Note(KITCHEN_NOTE.to_string())),
        )
        .with_prompt("Read Note"),
        Transform::from_xyz(9.5, 0.96, -18.2).with_yaw(0.5),
        (),
    )?;
    b.object(
        Interactable::new(
            "newspaper",
            "The County Sentinel",
            Behavior::Reader(Panel::Newspaper),
        )
        .with_prompt("Read Newspaper")
        .with_pick_size(Vec3::new(0.4, 0.1, 0.3)),
        Transform::from_xyz(8.5, 0.77, -14.5),
        (),
    )?;

    b.spawn((
        Portrait::default(),
        Transform::from_xyz(12.8, 2.0, -18.5).with_yaw(-FRAC_PI_2),
        Visibility::VISIBLE,
    ));
    Ok(())
}

// ==================== BEDROOM ====================

fn bedroom(b: &mut ContentBuilder) -> Result<(), RegisterError> {
    b.object(
        Interactable::new("laptop", "Laptop", Behavior::Reader(Panel::Laptop))
            .with_prompt("Use")
            .with_pick_size(Vec3::new(0.35, 0.25, 0.25)),
        Transform::from_xyz(-5.5, 0.75, -9.8),
        (),
    )?;
    b.object(
        Interactable::new(
            "bedroom_note",
            "Journal Entry",
            Behavior::Reader(Panel::Note(BEDROOM_NOTE.to_string())),
        )
        .with_prompt("Read Note"),
        Transform::from_xyz(-5.8, 0.77, -9.6).with_yaw(-0.2),
        (),
    )?;
    b.object(
        Interactable::new("wardrobe", "Wardrobe", Behavior::Door(DoorAccess::Free))
            .with_prompt("Open Door")
            .with_pick_size(Vec3::new(0.8, 2.0, 0.6)),
        Transform::from_xyz(-2.8, 1.0, -9.5),
        Door::new(
            Pose::new(Vec3::new(-2.8, 1.0, -9.5), 0.0),
            Pose::new(Vec3::new(-3.2, 1.0, -9.1), -FRAC_PI_2),
        ),
    )?;
    Ok(())
}

// ==================== BASEMENT ====================

fn basement(b: &mut ContentBuilder) -> Result<(), RegisterError> {
    let (base_x, end_y, start_z) = (-15.0, -3.5, -18.5);

    let settings = b.config().table.clone();
    let frame = Vec3::new(
        settings.half_extents.x * 2.0 + 0.3,
        0.9,
        settings.half_extents.y * 2.0 + 0.3,
    );
    let table = PoolTable::racked(Vec3::new(base_x, end_y + 0.94, start_z), settings);
    let cue_at = table
        .cue_ball()
        .map(|ball| table.to_world(ball.position))
        .unwrap_or(table.origin);
    b.collider(Aabb::from_center_size(
        Vec3::new(base_x, end_y + 0.45, start_z),
        frame,
    ));
    let table = b.spawn(table);
    b.object(
        Interactable::new("cue_ball", "Cue Ball", Behavior::CueBall { table })
            .with_prompt("Shoot (Aim with Camera)")
            .with_pick_size(Vec3::splat(0.15)),
        Transform::from_translation(cue_at),
        (),
    )?;

    // boxes stacked in the far corner
    for (size, x, y, z) in [
        (0.8, -4.2, 0.4, -4.2),
        (0.6, -4.2, 1.1, -4.2),
        (0.7, -3.2, 0.35, -4.5),
        (0.9, -4.5, 0.45, -3.0),
        (0.5, -3.5, 0.25, -3.5),
    ] {
        b.collider(Aabb::from_center_size(
            Vec3::new(base_x + x, end_y + y, start_z + z),
            Vec3::splat(size),
        ));
    }
    item(
        b,
        ids::CAR_KEYS,
        "Car Keys",
        Vec3::new(base_x - 3.5, end_y + 0.55, start_z - 3.5),
    )?;
    Ok(())
}

// ==================== OUTSIDE ====================

fn outside(b: &mut ContentBuilder) -> Result<(), RegisterError> {
    let car_at = Vec3::new(0.0, 0.0, -42.0);
    b.spawn((Car::default(), Transform::from_translation(car_at).with_yaw(PI)));
    b.collider(Aabb::from_center_size(
        car_at + Vec3::new(0.0, 0.6, 0.0),
        Vec3::new(1.9, 1.2, 4.4),
    ));
    b.object(
        Interactable::new(
            "ignition",
            "Ignition Slot",
            Behavior::Ignition {
                holding_hint: "I have the keys, I just need to hold them.".to_string(),
            },
        )
        .with_prompt("Insert Keys")
        .with_pick_size(ITEM_PICK),
        Transform::from_translation(car_at + Vec3::new(0.22, 1.0, 0.35)),
        (),
    )?;
    b.object(
        Interactable::new(
            "car",
            "Old Sedan",
            Behavior::Ignition {
                holding_hint: "I should get in and hold the keys to start it.".to_string(),
            },
        )
        .with_prompt("Use Keys")
        .with_pick_size(Vec3::new(2.5, 2.0, 5.0)),
        Transform::from_translation(car_at + Vec3::new(0.0, 1.0, 0.0)),
        (),
    )?;
    Ok(())
}

fn ambience(b: &mut ContentBuilder) {
    let mut rng = fastrand::Rng::with_seed(0xd057);
    for (center, volume, count) in [
        (Vec3::new(0.0, 1.75, 0.0), Vec3::new(5.0, 3.5, 5.0), 150),
        (Vec3::new(0.0, 1.75, -7.5), Vec3::new(3.0, 3.5, 10.0), 100),
        (Vec3::new(0.0, 2.0, -18.5), Vec3::new(10.0, 4.0, 12.0), 100),
        (Vec3::new(-15.0, -1.5, -18.5), Vec3::new(10.0, 4.0, 12.0), 200),
    ] {
        b.spawn((
            DustMotes::new(volume, count, &mut rng),
            Transform::from_translation(center),
        ));
    }
}
