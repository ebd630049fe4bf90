//! Save and restore of a played house.

use glam::Vec3;

use verbatim::components::door::DoorPhase;
use verbatim::house::{House, PLAYER_START};
use verbatim::persistence::save::{FileStore, MemoryStore, load_game, save_game};
use verbatim::persistence::snapshot::{WorldSnapshot, ids};
use verbatim::resources::simconfig::SimConfig;
use verbatim::session::{Inventory, Session};
use verbatim::simulation::Simulation;

fn house() -> Simulation {
    let mut sim = Simulation::new(SimConfig::new());
    sim.register(&House).unwrap();
    sim
}

fn run(sim: &mut Simulation, seconds: f32, player: Option<Vec3>) {
    for _ in 0..(seconds / 0.1).ceil() as u32 {
        sim.update(0.1, player);
    }
}

fn use_object(sim: &mut Simulation, session: &mut Session, id: &str) {
    let entity = sim.entity(id).unwrap();
    sim.interact(entity, session);
}

/// Burn the webs, take the key, open the bathroom, solve the keypad and
/// walk far enough to set off every trigger.
fn played_house() -> (Simulation, Session) {
    let mut sim = house();
    let mut session = Session::new(PLAYER_START);
    use_object(&mut sim, &mut session, ids::LIGHTER);
    session.inventory.equip(ids::LIGHTER);
    use_object(&mut sim, &mut session, ids::WEBS);
    run(&mut sim, 2.0, None);
    use_object(&mut sim, &mut session, ids::KEY);
    session.inventory.equip(ids::KEY);
    use_object(&mut sim, &mut session, ids::BATHROOM_DOOR);
    for key in ["keypad_1", "keypad_0", "keypad_3", "keypad_1", "keypad_ent"] {
        use_object(&mut sim, &mut session, key);
    }
    use_object(&mut sim, &mut session, "fan_switch");
    run(&mut sim, 0.5, Some(Vec3::new(0.0, 0.0, -6.0)));
    run(&mut sim, 0.5, Some(Vec3::new(11.5, 0.0, -18.5)));
    run(&mut sim, 2.0, Some(Vec3::new(0.0, 0.0, -14.0)));
    session.body.position = Vec3::new(0.0, 0.0, -14.0);
    session.update_story();
    (sim, session)
}

#[test]
fn test_played_house_snapshot() {
    let (mut sim, _) = played_house();
    let snap = sim.world_state();
    assert_eq!(
        snap,
        WorldSnapshot {
            webs_burned: true,
            door_unlocked: true,
            exit_door_unlocked: false,
            basement_door_unlocked: true,
            key_revealed: true,
            house_key_revealed: true,
            bedroom_door_revealed: true,
            portrait_triggered: true,
            scare_triggered: false,
            is_fan_on: false,
            rat_triggered: true,
        }
    );
}

#[test]
fn test_restore_into_fresh_house_matches() {
    let (mut played, session) = played_house();
    let snap = played.world_state();

    let mut fresh = house();
    fresh.restore_world_state(&snap, &session.inventory);
    assert_eq!(fresh.world_state(), snap);
    assert_eq!(fresh.door(ids::BATHROOM_DOOR).unwrap().phase(), DoorPhase::Open);
    assert!(!fresh.object(ids::KEY).unwrap().visible);
    assert!(!fresh.object(ids::LIGHTER).unwrap().visible);
    assert!(fresh.object(ids::HOUSE_KEY).unwrap().visible);
    assert!(fresh.drain_cues().is_empty());
    assert_eq!(fresh.pending_tasks(), 0);
}

#[test]
fn test_restore_twice_is_same_as_once() {
    let (mut played, session) = played_house();
    let snap = played.world_state();

    let mut once = house();
    once.restore_world_state(&snap, &session.inventory);
    let colliders_once = once.active_colliders().len();
    let objects_once = once.interactive_objects();

    once.restore_world_state(&snap, &session.inventory);
    assert_eq!(once.world_state(), snap);
    assert_eq!(once.active_colliders().len(), colliders_once);
    assert_eq!(once.interactive_objects(), objects_once);
}

#[test]
fn test_restore_during_door_swing_settles_door() {
    let mut sim = house();
    let mut session = Session::new(PLAYER_START);
    session.inventory.add(ids::KEY, "Old Key");
    session.inventory.equip(ids::KEY);
    use_object(&mut sim, &mut session, ids::BATHROOM_DOOR);
    run(&mut sim, 0.5, None);

    sim.restore_world_state(&WorldSnapshot::default(), &Inventory::new());
    assert_eq!(sim.door(ids::BATHROOM_DOOR).unwrap().phase(), DoorPhase::Closed);
    run(&mut sim, 2.0, None);
    assert_eq!(sim.door(ids::BATHROOM_DOOR).unwrap().phase(), DoorPhase::Closed);
}

#[test]
fn test_revealed_key_not_yet_taken_lies_on_floor() {
    let mut sim = house();
    let snap = WorldSnapshot {
        webs_burned: true,
        key_revealed: true,
        ..Default::default()
    };
    sim.restore_world_state(&snap, &Inventory::new());
    let key = sim.object(ids::KEY).unwrap();
    assert!(key.visible && key.interactive);
    assert!(!sim.object(ids::WEBS).unwrap().visible);
}

#[test]
fn test_session_round_trip_through_store() {
    let (mut sim, session) = played_house();
    let save = session.to_save(&mut sim);
    assert_eq!(save.inventory, vec![ids::LIGHTER.to_string(), ids::KEY.to_string()]);
    assert!(save.has_exited_bathroom);

    let mut store = MemoryStore::new();
    save_game(&mut store, &save).unwrap();
    let loaded = load_game(&store).unwrap();
    assert_eq!(loaded, save);

    let mut fresh = house();
    let resumed = Session::from_save(&loaded, &mut fresh);
    assert_eq!(resumed.body.position, session.body.position);
    assert!(resumed.has_exited_bathroom);
    assert_eq!(resumed.inventory.items()[1].name, "Old Key");
    assert_eq!(fresh.world_state(), save.world);
}

#[test]
fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let (mut sim, session) = played_house();
    {
        let mut store = FileStore::new(dir.path());
        save_game(&mut store, &session.to_save(&mut sim)).unwrap();
    }
    let store = FileStore::new(dir.path());
    let save = load_game(&store).unwrap();
    assert!(save.world.webs_burned);
    assert_eq!(save.player.position, Vec3::new(0.0, 0.0, -14.0));
}
