//! Interaction dispatch.
//!
//! [`interact`] runs the [`Behavior`] of the targeted object against an
//! [`InteractionContext`]. Behaviours only touch their own object, plus the
//! shared registries and whatever entities they were explicitly wired to
//! (a keypad's door, the webs' key, a valve's shower).

use bevy_ecs::hierarchy::Children;
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::components::ambient::ShowerWater;
use crate::components::curtain::BeadCurtain;
use crate::components::door::{Door, DoorAccess};
use crate::components::interactable::{Behavior, InteractionContext, Interactable, Outcome};
use crate::components::pooltable::PoolTable;
use crate::components::props::{
    APPARITION_DURATION, Apparition, KEY_DROP_GRAVITY, KEY_FLOOR_Y, Mirror, Tap,
    WEBS_BURN_DURATION, WEBS_KEY_DROP_PROGRESS, Webs,
};
use crate::components::transform::{Transform, Visibility};
use crate::events::cue::{WorldCue, emit_cue};
use crate::resources::scheduler::{Task, TaskScheduler, TaskStatus, after};
use crate::resources::worldflags::WorldFlags;
use crate::systems::door::toggle_door;
use crate::systems::keypad::press_key;
use crate::systems::winsequence::start_win_sequence;

pub const LIGHTER: &str = "lighter";
pub const CAR_KEYS: &str = "car_keys";

const NO_KEYS_LINE: &str = "The car looks fine. But I need the keys.";
/// Handle pitch of an open tap or valve.
const HANDLE_OPEN_PITCH: f32 = -0.5;
const HANDLE_TURN_SECONDS: f32 = 0.2;
/// Pitch of the fan switch nub while the fan is off / on.
const SWITCH_OFF_PITCH: f32 = 0.3;
const SWITCH_ON_PITCH: f32 = -0.3;

/// Use an object. Objects that are hidden or not interactive do nothing.
pub fn interact(world: &mut World, entity: Entity, ctx: &mut dyn InteractionContext) -> Outcome {
    let Some(it) = world.get::<Interactable>(entity) else {
        return Outcome::None;
    };
    if !it.is_targetable() {
        debug!("Ignoring interaction with '{}': not targetable", it.id);
        return Outcome::None;
    }
    let behavior = it.behavior.clone();
    let (id, name) = (it.id.clone(), it.name.clone());
    debug!("Interact '{}' ({:?})", id, behavior);

    match behavior {
        Behavior::Pickup => pick_up(world, entity, &id, &name, ctx),
        Behavior::Door(access) => use_door(world, entity, &access, ctx),
        Behavior::KeypadButton { keypad, key } => press_key(world, keypad, key, ctx),
        Behavior::Webs => burn_webs(world, entity, ctx),
        Behavior::CueBall { table } => strike_cue_ball(world, table, ctx),
        Behavior::Curtain { curtain } => {
            if let Some(position) = world.get::<BeadCurtain>(curtain).map(|c| c.origin) {
                emit_cue(world, WorldCue::CurtainBrushed { position });
            }
            Outcome::None
        }
        Behavior::FanSwitch => {
            let on = !world.resource::<WorldFlags>().fan_on;
            apply_fan_state(world, on);
            emit_cue(world, WorldCue::FanToggled { on });
            Outcome::None
        }
        Behavior::Tap => toggle_tap(world, entity, &id),
        Behavior::Ignition { holding_hint } => {
            if ctx.is_equipped(CAR_KEYS) {
                ctx.win();
                start_win_sequence(world);
            } else if ctx.inventory_has(CAR_KEYS) {
                ctx.speak(&holding_hint);
            } else {
                ctx.speak(NO_KEYS_LINE);
            }
            Outcome::None
        }
        Behavior::Reader(panel) => {
            ctx.open_panel(panel);
            Outcome::None
        }
        Behavior::Remark(text) => Outcome::Message(text),
        Behavior::Speech(text) => {
            ctx.speak(&text);
            Outcome::None
        }
        Behavior::Silent => Outcome::None,
    }
}

// ==================== ITEMS ====================

fn pick_up(
    world: &mut World,
    entity: Entity,
    id: &str,
    name: &str,
    ctx: &mut dyn InteractionContext,
) -> Outcome {
    ctx.inventory_add(id, name);
    set_item_present(world, entity, false);
    info!("Picked up '{}'", id);
    Outcome::message(format!("Picked up {}", name))
}

/// Show or hide an item together with every visual attached below it.
pub fn set_item_present(world: &mut World, entity: Entity, present: bool) {
    if let Some(mut it) = world.get_mut::<Interactable>(entity) {
        it.set_present(present);
    }
    set_subtree_visibility(world, entity, present);
}

fn set_subtree_visibility(world: &mut World, entity: Entity, visible: bool) {
    let mut stack = vec![entity];
    while let Some(current) = stack.pop() {
        if let Some(mut vis) = world.get_mut::<Visibility>(current) {
            vis.0 = visible;
        }
        if let Some(children) = world.get::<Children>(current) {
            stack.extend(children.iter());
        }
    }
}

// ==================== DOORS ====================

fn use_door(
    world: &mut World,
    entity: Entity,
    access: &DoorAccess,
    ctx: &mut dyn InteractionContext,
) -> Outcome {
    match access {
        DoorAccess::Free => {
            toggle_door(world, entity, false);
        }
        DoorAccess::EquippedItem {
            item,
            holding_hint,
            missing_hint,
        } => {
            if ctx.is_equipped(item) {
                toggle_door(world, entity, false);
            } else if ctx.inventory_has(item) {
                ctx.speak(holding_hint);
            } else {
                ctx.speak(missing_hint);
            }
        }
        DoorAccess::Lockable { hint } => {
            let locked = world.get::<Door>(entity).is_some_and(|d| d.is_locked);
            if locked {
                ctx.speak(hint);
            } else {
                toggle_door(world, entity, false);
            }
        }
    }
    Outcome::None
}

// ==================== WEBS & KEY ====================

fn burn_webs(world: &mut World, entity: Entity, ctx: &mut dyn InteractionContext) -> Outcome {
    if !ctx.is_equipped(LIGHTER) {
        return if ctx.inventory_has(LIGHTER) {
            Outcome::message("Equip the lighter first.")
        } else {
            Outcome::message("You need something to burn these.")
        };
    }
    let Some(mut webs) = world.get_mut::<Webs>(entity) else {
        return Outcome::None;
    };
    if webs.burning {
        return Outcome::None;
    }
    webs.burning = true;
    let key = webs.key;
    if let Some(mut it) = world.get_mut::<Interactable>(entity) {
        it.interactive = false;
    }
    emit_cue(world, WorldCue::WebsBurning);
    world.resource_mut::<TaskScheduler>().spawn(WebsBurn {
        webs: entity,
        key,
        elapsed: 0.0,
        dropped: false,
    });
    Outcome::message("Burning webs...")
}

/// Dissolves the webs and drops the key early in the burn.
pub struct WebsBurn {
    pub webs: Entity,
    pub key: Entity,
    pub elapsed: f32,
    pub dropped: bool,
}

impl Task for WebsBurn {
    fn step(&mut self, world: &mut World, dt: f32) -> TaskStatus {
        self.elapsed += dt;
        let progress = (self.elapsed / WEBS_BURN_DURATION).min(1.0);
        match world.get_mut::<Webs>(self.webs) {
            Some(mut webs) => webs.progress = progress,
            None => return TaskStatus::Done,
        }
        if progress > WEBS_KEY_DROP_PROGRESS && !self.dropped {
            self.dropped = true;
            reveal_key(world, self.key);
        }
        if progress < 1.0 {
            return TaskStatus::Continue;
        }
        set_item_present(world, self.webs, false);
        if !self.dropped {
            reveal_key(world, self.key);
        }
        TaskStatus::Done
    }
}

/// Make the hidden key visible and let it fall to the floor. It becomes
/// usable once it lands.
pub fn reveal_key(world: &mut World, key: Entity) {
    world.resource_mut::<WorldFlags>().key_revealed = true;
    if let Some(mut it) = world.get_mut::<Interactable>(key) {
        it.visible = true;
        it.interactive = false;
    }
    set_subtree_visibility(world, key, true);
    world.resource_mut::<TaskScheduler>().spawn(KeyFall {
        key,
        velocity: 0.0,
    });
}

/// Put a revealed key on the floor, ready to pick up, without the fall.
pub fn place_revealed_key(world: &mut World, key: Entity) {
    set_item_present(world, key, true);
    if let Some(mut t) = world.get_mut::<Transform>(key) {
        t.translation.y = KEY_FLOOR_Y;
        t.rotation = key_resting_rotation();
    }
}

fn key_resting_rotation() -> Vec3 {
    Vec3::new(-FRAC_PI_2, 0.0, FRAC_PI_4)
}

pub struct KeyFall {
    pub key: Entity,
    pub velocity: f32,
}

impl Task for KeyFall {
    fn step(&mut self, world: &mut World, dt: f32) -> TaskStatus {
        self.velocity -= KEY_DROP_GRAVITY * dt;
        let Some(mut t) = world.get_mut::<Transform>(self.key) else {
            return TaskStatus::Done;
        };
        t.translation.y += self.velocity * dt;
        // tumble
        t.rotation.x -= 2.0 * dt;
        t.rotation.z += dt;
        if t.translation.y > KEY_FLOOR_Y {
            return TaskStatus::Continue;
        }
        t.translation.y = KEY_FLOOR_Y;
        t.rotation = key_resting_rotation();
        if let Some(mut it) = world.get_mut::<Interactable>(self.key) {
            it.interactive = true;
        }
        TaskStatus::Done
    }
}

// ==================== POOL TABLE ====================

fn strike_cue_ball(world: &mut World, table: Entity, ctx: &mut dyn InteractionContext) -> Outcome {
    let Some(direction) = ctx.look_direction() else {
        return Outcome::message("Look at the ball to aim!");
    };
    let struck = world
        .get_mut::<PoolTable>(table)
        .is_some_and(|mut t| t.shoot(direction));
    if struck {
        emit_cue(world, WorldCue::BallStruck);
    }
    Outcome::None
}

// ==================== FAN, TAPS, MIRROR ====================

/// Set the fan running state and move every fan switch to match.
pub fn apply_fan_state(world: &mut World, on: bool) {
    world.resource_mut::<WorldFlags>().fan_on = on;
    let pitch = if on { SWITCH_ON_PITCH } else { SWITCH_OFF_PITCH };
    let mut switches = world.query::<(&Interactable, &mut Transform)>();
    for (it, mut t) in switches.iter_mut(world) {
        if matches!(it.behavior, Behavior::FanSwitch) {
            t.rotation.x = pitch;
        }
    }
}

fn toggle_tap(world: &mut World, entity: Entity, id: &str) -> Outcome {
    let Some(mut tap) = world.get_mut::<Tap>(entity) else {
        return Outcome::None;
    };
    tap.is_open = !tap.is_open;
    let (open, shower, prompt) = (tap.is_open, tap.shower, tap.prompt());
    if let Some(mut it) = world.get_mut::<Interactable>(entity) {
        it.prompt = prompt.to_string();
    }
    if let Some(mut water) = shower.and_then(|s| world.get_mut::<ShowerWater>(s)) {
        water.active = open;
    }
    emit_cue(
        world,
        WorldCue::Water {
            id: id.to_string(),
            on: open,
        },
    );
    let from = world
        .get::<Transform>(entity)
        .map(|t| t.rotation.x)
        .unwrap_or(0.0);
    let to = if open { HANDLE_OPEN_PITCH } else { 0.0 };
    world.resource_mut::<TaskScheduler>().spawn(HandleTurn {
        handle: entity,
        from,
        to,
        elapsed: 0.0,
    });
    Outcome::None
}

/// Turns a tap handle to its new pitch.
pub struct HandleTurn {
    pub handle: Entity,
    pub from: f32,
    pub to: f32,
    pub elapsed: f32,
}

impl Task for HandleTurn {
    fn step(&mut self, world: &mut World, dt: f32) -> TaskStatus {
        self.elapsed += dt;
        let t = (self.elapsed / HANDLE_TURN_SECONDS).min(1.0);
        let Some(mut transform) = world.get_mut::<Transform>(self.handle) else {
            return TaskStatus::Done;
        };
        transform.rotation.x = self.from + (self.to - self.from) * t;
        if t < 1.0 {
            TaskStatus::Continue
        } else {
            TaskStatus::Done
        }
    }
}

/// Accumulate how long the player has been looking at each mirror.
/// Looking away resets the count; reaching the threshold fires the scare.
pub fn update_mirror_stare(world: &mut World, target: Option<Entity>, dt: f32) {
    let mut due = false;
    let mut mirrors = world.query::<(Entity, &mut Mirror)>();
    for (entity, mut mirror) in mirrors.iter_mut(world) {
        if target == Some(entity) {
            mirror.stare += dt;
            if mirror.stare >= mirror.stare_threshold {
                due = true;
            }
        } else {
            mirror.stare = 0.0;
        }
    }
    if due {
        trigger_mirror_scare(world);
    }
}

/// Show the apparition briefly. Fires at most once per world.
pub fn trigger_mirror_scare(world: &mut World) -> bool {
    if world.resource::<WorldFlags>().scare_triggered {
        return false;
    }
    world.resource_mut::<WorldFlags>().scare_triggered = true;
    info!("Mirror scare");
    emit_cue(world, WorldCue::Scream);

    let apparitions: Vec<Entity> = world
        .query_filtered::<Entity, With<Apparition>>()
        .iter(world)
        .collect();
    for entity in &apparitions {
        if let Some(mut vis) = world.get_mut::<Visibility>(*entity) {
            vis.0 = true;
        }
    }
    world
        .resource_mut::<TaskScheduler>()
        .spawn(after(APPARITION_DURATION, move |world: &mut World| {
            for entity in &apparitions {
                if let Some(mut vis) = world.get_mut::<Visibility>(*entity) {
                    vis.0 = false;
                }
            }
        }));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::interactable::Panel;
    use crate::resources::colliderset::ColliderSet;
    use crate::resources::worldtime::WorldTime;
    use crate::systems::tasks::run_scheduled_tasks;
    use bevy_ecs::hierarchy::ChildOf;

    #[derive(Default)]
    struct Ctx {
        items: Vec<String>,
        equipped: Option<String>,
        look: Option<Vec3>,
        spoken: Vec<String>,
        panels: Vec<Panel>,
        won: bool,
    }

    impl InteractionContext for Ctx {
        fn inventory_add(&mut self, id: &str, _name: &str) {
            self.items.push(id.to_string());
        }
        fn inventory_has(&self, id: &str) -> bool {
            self.items.iter().any(|i| i == id)
        }
        fn equipped(&self) -> Option<&str> {
            self.equipped.as_deref()
        }
        fn look_direction(&self) -> Option<Vec3> {
            self.look
        }
        fn win(&mut self) {
            self.won = true;
        }
        fn speak(&mut self, text: &str) {
            self.spoken.push(text.to_string());
        }
        fn open_panel(&mut self, panel: Panel) {
            self.panels.push(panel);
        }
    }

    fn make_world() -> World {
        let mut world = World::new();
        world.insert_resource(TaskScheduler::default());
        world.insert_resource(ColliderSet::default());
        world.insert_resource(WorldFlags::default());
        world.insert_resource(WorldTime::default());
        world.init_resource::<Messages<WorldCue>>();
        world
    }

    fn tick(world: &mut World, seconds: f32) {
        let dt = 1.0 / 60.0;
        let frames = (seconds / dt).ceil() as usize;
        for _ in 0..frames {
            world.resource_mut::<WorldTime>().delta = dt;
            run_scheduled_tasks(world);
        }
    }

    fn cues(world: &mut World) -> Vec<WorldCue> {
        world.resource_mut::<Messages<WorldCue>>().drain().collect()
    }

    // ==================== PICKUP TESTS ====================

    #[test]
    fn test_pickup_hides_item_and_children() {
        let mut world = make_world();
        let key = world
            .spawn((Interactable::item("key", "Old Key"), Visibility::VISIBLE))
            .id();
        let proxy = world.spawn((Visibility::VISIBLE, ChildOf(key))).id();
        let mut ctx = Ctx::default();

        let out = interact(&mut world, key, &mut ctx);
        assert_eq!(out.text(), Some("Picked up Old Key"));
        assert!(ctx.inventory_has("key"));
        let it = world.get::<Interactable>(key).unwrap();
        assert!(!it.visible && !it.interactive);
        assert_eq!(world.get::<Visibility>(proxy), Some(&Visibility::HIDDEN));

        // gone items cannot be picked up twice
        assert_eq!(interact(&mut world, key, &mut ctx), Outcome::None);
        assert_eq!(ctx.items.len(), 1);
    }

    // ==================== DOOR ACCESS TESTS ====================

    #[test]
    fn test_equipped_item_door_hints() {
        use crate::components::door::Pose;
        let mut world = make_world();
        let access = DoorAccess::EquippedItem {
            item: "key".into(),
            holding_hint: "hold it".into(),
            missing_hint: "locked".into(),
        };
        let door = world
            .spawn((
                Interactable::new("bathroom_door", "Bathroom Door", Behavior::Door(access)),
                Door::hinged(Pose::new(Vec3::new(0.0, 1.1, -2.5), 0.0)),
                Transform::from_xyz(0.0, 1.1, -2.5),
            ))
            .id();

        let mut ctx = Ctx::default();
        interact(&mut world, door, &mut ctx);
        assert_eq!(ctx.spoken, vec!["locked".to_string()]);

        ctx.items.push("key".into());
        interact(&mut world, door, &mut ctx);
        assert_eq!(ctx.spoken.last().map(String::as_str), Some("hold it"));
        assert!(!world.get::<Door>(door).unwrap().is_animating);

        ctx.equipped = Some("key".into());
        interact(&mut world, door, &mut ctx);
        assert!(world.get::<Door>(door).unwrap().is_animating);
    }

    #[test]
    fn test_lockable_door_speaks_hint_while_locked() {
        use crate::components::door::Pose;
        let mut world = make_world();
        let door = world
            .spawn((
                Interactable::new(
                    "basement_door",
                    "Basement Door",
                    Behavior::Door(DoorAccess::Lockable {
                        hint: "It won't budge.".into(),
                    }),
                ),
                Door::hinged(Pose::new(Vec3::ZERO, 0.0)).locked(),
                Transform::default(),
            ))
            .id();
        let mut ctx = Ctx::default();
        interact(&mut world, door, &mut ctx);
        assert_eq!(ctx.spoken, vec!["It won't budge.".to_string()]);
        assert!(!world.get::<Door>(door).unwrap().is_animating);
    }

    // ==================== WEBS TESTS ====================

    fn spawn_webs(world: &mut World) -> (Entity, Entity) {
        let key = world
            .spawn((
                Interactable::item("key", "Old Key").hidden(),
                Transform::from_xyz(-2.2, 1.0, -2.2),
            ))
            .id();
        let webs = world
            .spawn((
                Interactable::new("webs", "Spiderwebs", Behavior::Webs).with_prompt("Burn spiderwebs"),
                Webs::new(key),
                Visibility::VISIBLE,
            ))
            .id();
        (webs, key)
    }

    #[test]
    fn test_webs_need_equipped_lighter() {
        let mut world = make_world();
        let (webs, _) = spawn_webs(&mut world);
        let mut ctx = Ctx::default();
        assert_eq!(
            interact(&mut world, webs, &mut ctx).text(),
            Some("You need something to burn these.")
        );
        ctx.items.push(LIGHTER.into());
        assert_eq!(
            interact(&mut world, webs, &mut ctx).text(),
            Some("Equip the lighter first.")
        );
        assert!(!world.get::<Webs>(webs).unwrap().burning);
    }

    #[test]
    fn test_burning_webs_drops_key() {
        let mut world = make_world();
        let (webs, key) = spawn_webs(&mut world);
        let mut ctx = Ctx {
            equipped: Some(LIGHTER.into()),
            ..Default::default()
        };
        assert_eq!(interact(&mut world, webs, &mut ctx).text(), Some("Burning webs..."));
        assert!(!world.get::<Interactable>(webs).unwrap().interactive);
        assert!(cues(&mut world).contains(&WorldCue::WebsBurning));

        // a second use while burning does nothing
        assert_eq!(interact(&mut world, webs, &mut ctx), Outcome::None);

        tick(&mut world, 0.6);
        let k = world.get::<Interactable>(key).unwrap();
        assert!(k.visible);
        assert!(world.resource::<WorldFlags>().key_revealed);

        tick(&mut world, 1.5);
        assert!(!world.get::<Interactable>(webs).unwrap().visible);
        let k = world.get::<Interactable>(key).unwrap();
        assert!(k.is_targetable());
        let t = world.get::<Transform>(key).unwrap();
        assert_eq!(t.translation.y, KEY_FLOOR_Y);
        assert!(world.resource::<TaskScheduler>().is_empty());
    }

    // ==================== MISC BEHAVIOR TESTS ====================

    #[test]
    fn test_cue_ball_needs_look_direction() {
        use crate::components::pooltable::TableSettings;
        let mut world = make_world();
        let table = world
            .spawn(PoolTable::racked(Vec3::ZERO, TableSettings::default()))
            .id();
        let ball = world
            .spawn(Interactable::new("cue_ball", "Cue Ball", Behavior::CueBall { table }))
            .id();
        let mut ctx = Ctx::default();
        assert_eq!(
            interact(&mut world, ball, &mut ctx).text(),
            Some("Look at the ball to aim!")
        );
        ctx.look = Some(Vec3::new(0.0, -0.5, -1.0));
        interact(&mut world, ball, &mut ctx);
        let v = world.get::<PoolTable>(table).unwrap().cue_ball().unwrap().velocity;
        assert_eq!(v, Vec3::new(0.0, 0.0, -0.25));
        assert!(cues(&mut world).contains(&WorldCue::BallStruck));
    }

    #[test]
    fn test_fan_switch_toggles() {
        let mut world = make_world();
        let switch = world
            .spawn((
                Interactable::new("fan_switch", "Fan Switch", Behavior::FanSwitch),
                Transform::default(),
            ))
            .id();
        let mut ctx = Ctx::default();
        interact(&mut world, switch, &mut ctx);
        assert!(!world.resource::<WorldFlags>().fan_on);
        assert_eq!(world.get::<Transform>(switch).unwrap().rotation.x, SWITCH_OFF_PITCH);
        interact(&mut world, switch, &mut ctx);
        assert!(world.resource::<WorldFlags>().fan_on);
        assert_eq!(
            cues(&mut world),
            vec![WorldCue::FanToggled { on: false }, WorldCue::FanToggled { on: true }]
        );
    }

    #[test]
    fn test_valve_drives_shower() {
        let mut world = make_world();
        let mut rng = fastrand::Rng::with_seed(3);
        let shower = world.spawn(ShowerWater::new(10, &mut rng)).id();
        let valve = world
            .spawn((
                Interactable::new("shower_valve", "Shower Valve", Behavior::Tap).with_prompt("Turn On"),
                Tap::new().with_shower(shower),
                Transform::default(),
            ))
            .id();
        let mut ctx = Ctx::default();
        interact(&mut world, valve, &mut ctx);
        assert!(world.get::<ShowerWater>(shower).unwrap().active);
        assert_eq!(world.get::<Interactable>(valve).unwrap().prompt, "Turn Off");
        interact(&mut world, valve, &mut ctx);
        assert!(!world.get::<ShowerWater>(shower).unwrap().active);
        assert_eq!(world.get::<Interactable>(valve).unwrap().prompt, "Turn On");
    }

    #[test]
    fn test_ignition_wins_only_with_keys_held() {
        let mut world = make_world();
        let ignition = world
            .spawn(Interactable::new(
                "ignition",
                "Ignition Slot",
                Behavior::Ignition {
                    holding_hint: "hold them".into(),
                },
            ))
            .id();
        let mut ctx = Ctx::default();
        interact(&mut world, ignition, &mut ctx);
        assert_eq!(ctx.spoken, vec![NO_KEYS_LINE.to_string()]);
        ctx.items.push(CAR_KEYS.into());
        interact(&mut world, ignition, &mut ctx);
        assert!(!ctx.won);
        ctx.equipped = Some(CAR_KEYS.into());
        interact(&mut world, ignition, &mut ctx);
        assert!(ctx.won);
        assert!(world.resource::<WorldFlags>().won);
    }

    #[test]
    fn test_reader_and_remark() {
        let mut world = make_world();
        let laptop = world
            .spawn(Interactable::new("laptop", "Laptop", Behavior::Reader(Panel::Laptop)))
            .id();
        let sign = world
            .spawn(Interactable::new("sign", "Sign", Behavior::Remark("Nothing here.".into())))
            .id();
        let mut ctx = Ctx::default();
        assert_eq!(interact(&mut world, laptop, &mut ctx), Outcome::None);
        assert_eq!(ctx.panels, vec![Panel::Laptop]);
        assert_eq!(interact(&mut world, sign, &mut ctx).text(), Some("Nothing here."));
    }

    // ==================== MIRROR TESTS ====================

    #[test]
    fn test_mirror_scare_after_stare_fires_once() {
        let mut world = make_world();
        let ghost = world.spawn((Apparition, Visibility::HIDDEN)).id();
        let mirror = world.spawn(Mirror::default()).id();

        update_mirror_stare(&mut world, Some(mirror), 1.5);
        update_mirror_stare(&mut world, None, 1.0);
        update_mirror_stare(&mut world, Some(mirror), 1.5);
        assert!(!world.resource::<WorldFlags>().scare_triggered);

        update_mirror_stare(&mut world, Some(mirror), 0.6);
        assert!(world.resource::<WorldFlags>().scare_triggered);
        assert_eq!(world.get::<Visibility>(ghost), Some(&Visibility::VISIBLE));
        assert_eq!(cues(&mut world), vec![WorldCue::Scream]);

        tick(&mut world, 1.0);
        assert_eq!(world.get::<Visibility>(ghost), Some(&Visibility::HIDDEN));

        assert!(!trigger_mirror_scare(&mut world));
        assert!(cues(&mut world).is_empty());
    }
}
