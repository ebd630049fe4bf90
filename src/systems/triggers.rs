//! One-shot proximity triggers.
//!
//! Each trigger fires at most once per world, guarded by its own flag:
//! - [`portrait_trigger_system`] – the portrait falls and shatters
//! - [`rat_trigger_system`] – the rat bolts
//! - [`wall_reveal_system`] – the hallway wall gains a doorway
//!
//! The same state can be applied without any effects through
//! [`place_fallen_portrait`] and [`apply_wall_reveal`], which restore uses.

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::info;

use crate::components::door::{Door, DoorPhase};
use crate::components::interactable::Interactable;
use crate::components::props::{GlassShard, Portrait, WallReveal};
use crate::components::rat::Rat;
use crate::components::transform::{Transform, Visibility};
use crate::events::cue::{WorldCue, emit_cue};
use crate::resources::colliderset::ColliderSet;
use crate::resources::player::PlayerProbe;
use crate::resources::scheduler::{Task, TaskScheduler, TaskStatus, after};

// ==================== PORTRAIT ====================

pub fn portrait_trigger_system(
    probe: Res<PlayerProbe>,
    mut scheduler: ResMut<TaskScheduler>,
    mut portraits: Query<(Entity, &mut Portrait, &Transform)>,
) {
    let Some(player) = probe.position else {
        return;
    };
    for (entity, mut portrait, transform) in portraits.iter_mut() {
        if portrait.triggered {
            continue;
        }
        if player.distance(transform.translation) < portrait.trigger_radius {
            portrait.triggered = true;
            info!("Portrait falls");
            scheduler.spawn(PortraitFall {
                portrait: entity,
                start_y: transform.translation.y,
                elapsed: 0.0,
            });
        }
    }
}

/// Drops the portrait with an accelerating fall and tilts it forward.
pub struct PortraitFall {
    pub portrait: Entity,
    pub start_y: f32,
    pub elapsed: f32,
}

impl Task for PortraitFall {
    fn step(&mut self, world: &mut World, dt: f32) -> TaskStatus {
        // gone, or already placed on the floor by a restore
        let Some(portrait) = world
            .get::<Portrait>(self.portrait)
            .copied()
            .filter(|p| !p.shattered)
        else {
            return TaskStatus::Done;
        };
        self.elapsed += dt;
        let duration = portrait.fall_duration.max(f32::EPSILON);
        let t = (self.elapsed / duration).min(1.0);
        if let Some(mut transform) = world.get_mut::<Transform>(self.portrait) {
            transform.translation.y = self.start_y - (self.start_y - portrait.floor_y) * t * t;
            transform.rotation.x = t * portrait.fallen_tilt;
        }
        if t < 1.0 {
            return TaskStatus::Continue;
        }
        let position = world
            .get::<Transform>(self.portrait)
            .map(|t| t.translation)
            .unwrap_or(Vec3::ZERO);
        emit_cue(world, WorldCue::GlassBreak { position });
        spawn_glass_shards(world, self.portrait);
        TaskStatus::Done
    }
}

/// Put the portrait on the floor, shattered, without playing the fall.
pub fn place_fallen_portrait(world: &mut World, entity: Entity) {
    let Some(mut portrait) = world.get_mut::<Portrait>(entity) else {
        return;
    };
    portrait.triggered = true;
    let (floor_y, tilt) = (portrait.floor_y, portrait.fallen_tilt);
    if let Some(mut transform) = world.get_mut::<Transform>(entity) {
        transform.translation.y = floor_y;
        transform.rotation.x = tilt;
    }
    spawn_glass_shards(world, entity);
}

/// Scatter shards around the portrait. Does nothing if already shattered.
pub fn spawn_glass_shards(world: &mut World, entity: Entity) {
    let (count, center) = match (world.get::<Portrait>(entity), world.get::<Transform>(entity)) {
        (Some(p), Some(t)) if !p.shattered => (p.shards, t.translation),
        _ => return,
    };
    if let Some(mut portrait) = world.get_mut::<Portrait>(entity) {
        portrait.shattered = true;
    }
    let mut rng = fastrand::Rng::with_seed(entity.to_bits());
    for _ in 0..count {
        let position = Vec3::new(
            center.x + (rng.f32() - 0.5) * 0.5,
            0.11,
            center.z + (rng.f32() - 0.5) * 0.5,
        );
        let rotation = Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, rng.f32() * std::f32::consts::PI);
        world.spawn((
            GlassShard,
            Transform::from_translation(position).with_rotation(rotation),
            Visibility::VISIBLE,
            ChildOf(entity),
        ));
    }
}

/// Number of shards lying around a portrait.
pub fn shard_count(world: &World, entity: Entity) -> usize {
    world
        .get::<Children>(entity)
        .map(|children| {
            children
                .iter()
                .filter(|c| world.get::<GlassShard>(*c).is_some())
                .count()
        })
        .unwrap_or(0)
}

// ==================== RAT ====================

pub fn rat_trigger_system(
    probe: Res<PlayerProbe>,
    mut scheduler: ResMut<TaskScheduler>,
    mut rats: Query<(Entity, &mut Rat, &mut Visibility)>,
    mut cues: MessageWriter<WorldCue>,
) {
    let Some(player) = probe.position else {
        return;
    };
    for (entity, mut rat, mut visibility) in rats.iter_mut() {
        if rat.triggered || rat.despawned {
            continue;
        }
        if player.distance(rat.trigger_point) < rat.trigger_radius {
            rat.triggered = true;
            visibility.0 = true;
            cues.write(WorldCue::RatSqueak);
            info!("Rat triggered");
            scheduler.spawn(after(rat.start_delay, move |world: &mut World| {
                if let Some(mut rat) = world.get_mut::<Rat>(entity) {
                    if !rat.despawned {
                        rat.active = true;
                    }
                }
            }));
        }
    }
}

// ==================== HALLWAY WALL ====================

pub fn wall_reveal_system(world: &mut World) {
    let Some(player) = world.resource::<PlayerProbe>().position else {
        return;
    };
    let due: Vec<Entity> = world
        .query::<(Entity, &WallReveal)>()
        .iter(world)
        .filter(|(_, w)| !w.revealed && player.z < w.trigger_z)
        .map(|(e, _)| e)
        .collect();
    for entity in due {
        info!("Hallway wall revealed");
        apply_wall_reveal(world, entity, true);
    }
}

/// Switch the hallway between the solid wall and the doorway with its door.
pub fn apply_wall_reveal(world: &mut World, entity: Entity, revealed: bool) {
    let Some(mut reveal) = world.get_mut::<WallReveal>(entity) else {
        return;
    };
    reveal.revealed = revealed;
    let reveal = reveal.clone();

    // the leaf blocks while closed or closing, never while opening or open
    let (door_blocks, door_collider) = world
        .get::<Door>(reveal.door)
        .map(|d| {
            let blocks = matches!(d.phase(), DoorPhase::Closed | DoorPhase::Closing);
            (blocks, d.collider)
        })
        .unwrap_or((true, None));

    {
        let mut set = world.resource_mut::<ColliderSet>();
        if revealed {
            set.remove(reveal.solid);
            for piece in &reveal.doorway {
                set.insert(*piece);
            }
        } else {
            set.insert(reveal.solid);
            for piece in &reveal.doorway {
                set.remove(*piece);
            }
        }
        if let Some(collider) = door_collider {
            if revealed && door_blocks {
                set.insert(collider);
            } else {
                set.remove(collider);
            }
        }
    }

    if let Some(mut door) = world.get_mut::<Interactable>(reveal.door) {
        door.set_present(revealed);
    }
    for piece in std::iter::once(reveal.solid).chain(reveal.doorway.iter().copied()) {
        if let Some(mut vis) = world.get_mut::<Visibility>(piece) {
            vis.0 = (piece == reveal.solid) != revealed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::door::{DoorAccess, Pose};
    use crate::components::interactable::Behavior;
    use crate::resources::worldtime::WorldTime;
    use crate::systems::tasks::run_scheduled_tasks;
    use smallvec::smallvec;

    const EPSILON: f32 = 1e-4;

    fn base_world() -> World {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            delta: 0.05,
            ..Default::default()
        });
        world.init_resource::<ColliderSet>();
        world.init_resource::<TaskScheduler>();
        world.init_resource::<PlayerProbe>();
        world.init_resource::<Messages<WorldCue>>();
        world
    }

    fn glass_breaks(world: &mut World) -> usize {
        world
            .resource_mut::<Messages<WorldCue>>()
            .drain()
            .filter(|c| matches!(c, WorldCue::GlassBreak { .. }))
            .count()
    }

    // ==================== PORTRAIT ====================

    fn falling_portrait(world: &mut World) -> Entity {
        let portrait = world
            .spawn((
                Portrait {
                    triggered: true,
                    ..Default::default()
                },
                Transform::from_xyz(12.8, 2.0, -18.5),
            ))
            .id();
        world.resource_mut::<TaskScheduler>().spawn(PortraitFall {
            portrait,
            start_y: 2.0,
            elapsed: 0.0,
        });
        portrait
    }

    #[test]
    fn test_fall_ends_on_floor_with_one_break() {
        let mut world = base_world();
        let portrait = falling_portrait(&mut world);
        for _ in 0..20 {
            run_scheduled_tasks(&mut world);
        }
        let t = world.get::<Transform>(portrait).unwrap();
        assert!((t.translation.y - 0.5).abs() < EPSILON);
        assert_eq!(shard_count(&world, portrait), 8);
        assert_eq!(glass_breaks(&mut world), 1);
        assert!(world.resource::<TaskScheduler>().is_empty());
    }

    #[test]
    fn test_placing_portrait_mid_fall_does_not_shatter_twice() {
        let mut world = base_world();
        let portrait = falling_portrait(&mut world);
        for _ in 0..3 {
            run_scheduled_tasks(&mut world);
        }
        assert_eq!(shard_count(&world, portrait), 0);

        place_fallen_portrait(&mut world, portrait);
        assert_eq!(shard_count(&world, portrait), 8);
        for _ in 0..20 {
            run_scheduled_tasks(&mut world);
        }
        place_fallen_portrait(&mut world, portrait);

        assert_eq!(shard_count(&world, portrait), 8);
        assert_eq!(glass_breaks(&mut world), 0);
        assert!(world.resource::<TaskScheduler>().is_empty());
        let t = world.get::<Transform>(portrait).unwrap();
        assert!((t.translation.y - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_portrait_trigger_fires_once() {
        let mut world = base_world();
        let portrait = world
            .spawn((Portrait::default(), Transform::from_xyz(0.0, 2.0, 0.0)))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(portrait_trigger_system);

        world.resource_mut::<PlayerProbe>().position = Some(Vec3::new(0.0, 0.0, 5.0));
        schedule.run(&mut world);
        assert!(!world.get::<Portrait>(portrait).unwrap().triggered);

        world.resource_mut::<PlayerProbe>().position = Some(Vec3::new(0.0, 1.5, 1.0));
        schedule.run(&mut world);
        schedule.run(&mut world);
        assert!(world.get::<Portrait>(portrait).unwrap().triggered);
        assert_eq!(world.resource::<TaskScheduler>().len(), 1);
    }

    // ==================== HALLWAY WALL ====================

    struct Hallway {
        reveal: Entity,
        solid: Entity,
        pieces: [Entity; 3],
        door: Entity,
        leaf: Entity,
    }

    fn hallway(world: &mut World) -> Hallway {
        let solid = world.spawn(Visibility::VISIBLE).id();
        let pieces = [
            world.spawn(Visibility::HIDDEN).id(),
            world.spawn(Visibility::HIDDEN).id(),
            world.spawn(Visibility::HIDDEN).id(),
        ];
        let leaf = world.spawn_empty().id();
        let door = world
            .spawn((
                Interactable::new("bedroom_door", "Bedroom Door", Behavior::Door(DoorAccess::Free))
                    .hidden(),
                Door::hinged(Pose::new(Vec3::new(-1.5, 1.1, -9.0), 0.0)).with_collider(leaf),
            ))
            .id();
        let reveal = world
            .spawn(WallReveal {
                revealed: false,
                trigger_z: -13.5,
                solid,
                doorway: smallvec![pieces[0], pieces[1], pieces[2]],
                door,
            })
            .id();
        world.resource_mut::<ColliderSet>().insert(solid);
        Hallway {
            reveal,
            solid,
            pieces,
            door,
            leaf,
        }
    }

    fn colliders(world: &World) -> Vec<Entity> {
        world.resource::<ColliderSet>().iter().collect()
    }

    #[test]
    fn test_reveal_applied_twice_is_same_as_once() {
        let mut world = base_world();
        let h = hallway(&mut world);
        apply_wall_reveal(&mut world, h.reveal, true);
        let once = colliders(&world);
        apply_wall_reveal(&mut world, h.reveal, true);

        assert_eq!(colliders(&world), once);
        assert_eq!(once.len(), 4);
        assert!(!once.contains(&h.solid));
        assert!(once.contains(&h.leaf));
        assert!(h.pieces.iter().all(|p| once.contains(p)));
        assert!(!world.get::<Visibility>(h.solid).unwrap().0);
        assert!(h.pieces.iter().all(|p| world.get::<Visibility>(*p).unwrap().0));
        assert!(world.get::<Interactable>(h.door).unwrap().is_targetable());
    }

    #[test]
    fn test_unreveal_restores_solid_wall() {
        let mut world = base_world();
        let h = hallway(&mut world);
        apply_wall_reveal(&mut world, h.reveal, true);
        apply_wall_reveal(&mut world, h.reveal, false);
        assert_eq!(colliders(&world), vec![h.solid]);
        assert!(!world.get::<Interactable>(h.door).unwrap().visible);
        assert!(!world.get::<WallReveal>(h.reveal).unwrap().revealed);
    }

    #[test]
    fn test_reveal_leaves_swinging_door_leaf_alone() {
        let mut world = base_world();
        let h = hallway(&mut world);
        apply_wall_reveal(&mut world, h.reveal, true);

        // opening: the leaf stays out of the set
        world.resource_mut::<ColliderSet>().remove(h.leaf);
        world.get_mut::<Door>(h.door).unwrap().is_animating = true;
        apply_wall_reveal(&mut world, h.reveal, true);
        assert!(!colliders(&world).contains(&h.leaf));

        // open at rest
        world.get_mut::<Door>(h.door).unwrap().is_animating = false;
        world.get_mut::<Door>(h.door).unwrap().is_open = true;
        apply_wall_reveal(&mut world, h.reveal, true);
        assert!(!colliders(&world).contains(&h.leaf));

        // closing: the leaf blocks again
        world.get_mut::<Door>(h.door).unwrap().is_animating = true;
        apply_wall_reveal(&mut world, h.reveal, true);
        assert!(colliders(&world).contains(&h.leaf));
    }

    #[test]
    fn test_wall_reveal_waits_for_player_past_trigger() {
        let mut world = base_world();
        let h = hallway(&mut world);
        world.resource_mut::<PlayerProbe>().position = Some(Vec3::new(0.0, 0.0, -10.0));
        wall_reveal_system(&mut world);
        assert!(!world.get::<WallReveal>(h.reveal).unwrap().revealed);

        world.resource_mut::<PlayerProbe>().position = Some(Vec3::new(0.0, 0.0, -14.0));
        wall_reveal_system(&mut world);
        assert!(world.get::<WallReveal>(h.reveal).unwrap().revealed);
        assert!(colliders(&world).contains(&h.leaf));
    }
}
