//! The simulation facade.
//!
//! [`Simulation`] owns the ECS [`World`] holding every simulated object and
//! the shared registries, plus the chained [`Schedule`] that advances them.
//! It is the only entry point the frame driver needs:
//!
//! 1. [`register`](Simulation::register) content built by a [`WorldContent`];
//! 2. each frame, [`step_player`](Simulation::step_player) then
//!    [`update`](Simulation::update);
//! 3. on save/load, [`world_state`](Simulation::world_state) and
//!    [`restore_world_state`](Simulation::restore_world_state).

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{info, warn};
use rustc_hash::FxHashSet;

use crate::components::collider::{Collider, Floor};
use crate::components::door::{Door, DoorAccess};
use crate::components::interactable::{Behavior, InteractionContext, Interactable, Outcome};
use crate::components::transform::Transform;
use crate::events::cue::{WorldCue, update_cue_messages};
use crate::math::Aabb;
use crate::persistence::snapshot::{self, WorldSnapshot};
use crate::resources::colliderset::ColliderSet;
use crate::resources::player::PlayerProbe;
use crate::resources::readiness::{Readiness, ReadinessGate};
use crate::resources::registry::{InteractiveRegistry, RegisterError};
use crate::resources::scheduler::TaskScheduler;
use crate::resources::simconfig::SimConfig;
use crate::resources::worldflags::WorldFlags;
use crate::resources::worldtime::WorldTime;
use crate::session::Inventory;
use crate::systems::ambient::{dust_motes_system, fan_system, shower_water_system};
use crate::systems::curtain::curtain_system;
use crate::systems::door::{ToggleResult, toggle_door};
use crate::systems::interaction::{interact, trigger_mirror_scare, update_mirror_stare};
use crate::systems::movement::{MoveInput, PlayerBody, step_player};
use crate::systems::pooltable::pool_table_system;
use crate::systems::rat::rat_system;
use crate::systems::tasks::run_scheduled_tasks;
use crate::systems::time::update_world_time;
use crate::systems::triggers::{portrait_trigger_system, rat_trigger_system, wall_reveal_system};
use crate::systems::winsequence::win_sequence_system;

/// Something that knows how to populate a world: colliders, floors,
/// interactive objects, particle systems, curtains, tables.
pub trait WorldContent {
    fn build(&self, builder: &mut ContentBuilder) -> Result<(), RegisterError>;
}

/// Spawns content into a simulation world and registers it.
pub struct ContentBuilder<'w> {
    world: &'w mut World,
    swing_duration: f32,
}

impl<'w> ContentBuilder<'w> {
    /// Blocking box, active from the start.
    pub fn collider(&mut self, aabb: Aabb) -> Entity {
        let entity = self.world.spawn(Collider::new(aabb)).id();
        self.world.resource_mut::<ColliderSet>().insert(entity);
        entity
    }

    /// Blocking box that only blocks once something adds it to the set.
    pub fn dormant_collider(&mut self, aabb: Aabb) -> Entity {
        self.world.spawn(Collider::new(aabb)).id()
    }

    pub fn floor(&mut self, floor: Floor) -> Entity {
        self.world.spawn(floor).id()
    }

    /// Spawn an interactive object and register its id.
    pub fn object<B: Bundle>(
        &mut self,
        interactable: Interactable,
        transform: Transform,
        extra: B,
    ) -> Result<Entity, RegisterError> {
        let id = interactable.id.clone();
        if self.world.resource::<InteractiveRegistry>().contains(&id) {
            return Err(RegisterError::DuplicateId(id));
        }
        let entity = self.world.spawn((interactable, transform, extra)).id();
        self.world
            .resource_mut::<InteractiveRegistry>()
            .register(&id, entity)?;
        Ok(entity)
    }

    /// Door or container with a blocking leaf. Starts closed with its
    /// collider active.
    pub fn door(
        &mut self,
        id: &str,
        name: &str,
        access: DoorAccess,
        door: Door,
        leaf_size: Vec3,
    ) -> Result<Entity, RegisterError> {
        if self.world.resource::<InteractiveRegistry>().contains(id) {
            return Err(RegisterError::DuplicateId(id.to_string()));
        }
        let closed = door.closed;
        let collider = self.collider(Aabb::from_center_size_yaw(
            closed.position,
            leaf_size,
            closed.yaw,
        ));
        let door = door
            .with_collider(collider)
            .with_swing_duration(self.swing_duration);
        let prompt = door.prompt();
        let interactable = Interactable::new(id, name, Behavior::Door(access))
            .with_prompt(prompt)
            .with_pick_size(leaf_size.max(Vec3::splat(0.3)));
        self.object(
            interactable,
            Transform::from_translation(closed.position).with_yaw(closed.yaw),
            door,
        )
    }

    /// Plain entity without an id (particles, curtains, tables, visuals).
    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> Entity {
        self.world.spawn(bundle).id()
    }

    pub fn child<B: Bundle>(&mut self, parent: Entity, bundle: B) -> Entity {
        self.world.spawn((bundle, ChildOf(parent))).id()
    }

    pub fn world(&mut self) -> &mut World {
        self.world
    }

    pub fn config(&self) -> &SimConfig {
        self.world.resource::<SimConfig>()
    }
}

/// One entry of the pick list handed to the input/highlight layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PickTarget {
    pub id: String,
    pub entity: Entity,
    pub aabb: Aabb,
    pub visible: bool,
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub entity: Entity,
    pub id: String,
    pub prompt: String,
    pub distance: f32,
}

/// Continuation run once the readiness gate settles.
pub type SettledHook = Box<dyn FnOnce(&mut World, Readiness) + Send + Sync>;

pub struct Simulation {
    world: World,
    schedule: Schedule,
    on_settled: Option<SettledHook>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(ReadinessGate::new(config.ready_timeout));
        world.insert_resource(config);
        world.insert_resource(WorldTime::default());
        world.insert_resource(PlayerProbe::default());
        world.insert_resource(WorldFlags::default());
        world.init_resource::<ColliderSet>();
        world.init_resource::<InteractiveRegistry>();
        world.init_resource::<TaskScheduler>();
        world.init_resource::<Messages<WorldCue>>();

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                run_scheduled_tasks,
                dust_motes_system,
                shower_water_system,
                fan_system,
                curtain_system,
                portrait_trigger_system,
                rat_trigger_system,
                wall_reveal_system,
                rat_system,
                pool_table_system,
                win_sequence_system,
                update_cue_messages,
            )
                .chain(),
        );

        Self {
            world,
            schedule,
            on_settled: None,
        }
    }

    /// Build `content` into the world.
    ///
    /// Registration is all or nothing: on a duplicate id every entity the
    /// build spawned is despawned again and the collider set and registry
    /// are put back as they were.
    pub fn register(&mut self, content: &dyn WorldContent) -> Result<(), RegisterError> {
        let swing_duration = self.config().door_swing_duration;
        let registry = self.world.resource::<InteractiveRegistry>().clone();
        let colliders = self.world.resource::<ColliderSet>().clone();
        let existing: FxHashSet<Entity> = self.world.query::<Entity>().iter(&self.world).collect();

        let mut builder = ContentBuilder {
            world: &mut self.world,
            swing_duration,
        };
        if let Err(e) = content.build(&mut builder) {
            let spawned: Vec<Entity> = self
                .world
                .query::<Entity>()
                .iter(&self.world)
                .filter(|entity| !existing.contains(entity))
                .collect();
            warn!("Registration failed ({}), rolling back {} entities", e, spawned.len());
            for entity in spawned {
                // children may already be gone with their parent
                if let Ok(entity) = self.world.get_entity_mut(entity) {
                    entity.despawn();
                }
            }
            self.world.insert_resource(registry);
            self.world.insert_resource(colliders);
            return Err(e);
        }
        info!(
            "Registered content: {} interactive objects, {} active colliders",
            self.world.resource::<InteractiveRegistry>().len(),
            self.world.resource::<ColliderSet>().len()
        );
        Ok(())
    }

    /// Advance the world by one frame. `dt` is clamped to the configured
    /// maximum; `player` is the position proximity triggers test against.
    pub fn update(&mut self, dt: f32, player: Option<Vec3>) {
        let dt = dt.clamp(0.0, self.config().max_delta);
        update_world_time(&mut self.world, dt);
        self.world.resource_mut::<PlayerProbe>().position = player;
        let readiness = {
            let mut gate = self.world.resource_mut::<ReadinessGate>();
            if gate.is_settled() { gate.state() } else { gate.tick(dt) }
        };
        if readiness != Readiness::Waiting {
            if let Some(hook) = self.on_settled.take() {
                info!("Content settled as {:?}", readiness);
                hook(&mut self.world, readiness);
            }
        }
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    /// Move the player one frame against the current floors and colliders.
    pub fn step_player(&mut self, body: &mut PlayerBody, input: MoveInput, dt: f32) -> Vec3 {
        let dt = dt.clamp(0.0, self.config().max_delta);
        let settings = self.config().player;
        let floors: Vec<Floor> = self.world.query::<&Floor>().iter(&self.world).copied().collect();
        let colliders = self.active_colliders();
        step_player(body, input, &floors, &colliders, &settings, dt)
    }

    /// Boxes of every collider currently blocking.
    pub fn active_colliders(&self) -> Vec<Aabb> {
        self.world
            .resource::<ColliderSet>()
            .iter()
            .filter_map(|e| self.world.get::<Collider>(e).map(|c| c.aabb))
            .collect()
    }

    pub fn is_blocking(&self, collider: Entity) -> bool {
        self.world.resource::<ColliderSet>().contains(collider)
    }

    /// Take every cue raised since the last drain.
    pub fn drain_cues(&mut self) -> Vec<WorldCue> {
        self.world
            .resource_mut::<Messages<WorldCue>>()
            .drain()
            .collect()
    }

    // ==================== PERSISTENCE ====================

    pub fn world_state(&mut self) -> WorldSnapshot {
        snapshot::capture(&mut self.world)
    }

    pub fn restore_world_state(&mut self, snapshot: &WorldSnapshot, inventory: &Inventory) {
        snapshot::restore(&mut self.world, snapshot, inventory);
        info!("World state restored");
    }

    // ==================== LOOKUPS ====================

    pub fn entity(&self, id: &str) -> Option<Entity> {
        self.world.resource::<InteractiveRegistry>().get(id)
    }

    pub fn object(&self, id: &str) -> Option<&Interactable> {
        self.entity(id).and_then(|e| self.world.get::<Interactable>(e))
    }

    pub fn object_name(&self, id: &str) -> Option<String> {
        self.object(id).map(|it| it.name.clone())
    }

    pub fn door(&self, id: &str) -> Option<&Door> {
        self.entity(id).and_then(|e| self.world.get::<Door>(e))
    }

    pub fn door_mut(&mut self, id: &str) -> Option<Mut<'_, Door>> {
        let entity = self.entity(id)?;
        self.world.get_mut::<Door>(entity)
    }

    /// Lock or unlock a door for external puzzle logic. Returns false if
    /// `id` is not a door.
    pub fn set_door_locked(&mut self, id: &str, locked: bool) -> bool {
        match self.door_mut(id) {
            Some(mut door) => {
                door.is_locked = locked;
                true
            }
            None => {
                warn!("set_door_locked: no door with id '{}'", id);
                false
            }
        }
    }

    pub fn toggle_door(&mut self, id: &str, instant: bool) -> ToggleResult {
        match self.entity(id) {
            Some(entity) => toggle_door(&mut self.world, entity, instant),
            None => ToggleResult::NotADoor,
        }
    }

    // ==================== INTERACTION ====================

    /// Pick list in registration order.
    pub fn interactive_objects(&self) -> Vec<PickTarget> {
        let registry = self.world.resource::<InteractiveRegistry>();
        registry
            .entities()
            .iter()
            .filter_map(|&entity| {
                let it = self.world.get::<Interactable>(entity)?;
                let center = self
                    .world
                    .get::<Transform>(entity)
                    .map(|t| t.translation)
                    .unwrap_or(Vec3::ZERO);
                Some(PickTarget {
                    id: it.id.clone(),
                    entity,
                    aabb: Aabb::from_center_size(center, it.pick_size),
                    visible: it.visible,
                    interactive: it.interactive,
                })
            })
            .collect()
    }

    /// Nearest targetable object along a ray, within `max_distance`.
    pub fn pick(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<PickHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        self.interactive_objects()
            .into_iter()
            .filter(|t| t.visible && t.interactive)
            .filter_map(|t| t.aabb.ray_hit(origin, dir, max_distance).map(|d| (t, d)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(t, distance)| PickHit {
                prompt: self
                    .world
                    .get::<Interactable>(t.entity)
                    .map(|it| it.prompt.clone())
                    .unwrap_or_default(),
                entity: t.entity,
                id: t.id,
                distance,
            })
    }

    pub fn interact(&mut self, entity: Entity, ctx: &mut dyn InteractionContext) -> Outcome {
        interact(&mut self.world, entity, ctx)
    }

    /// Feed what the player is looking at into the mirror stare timers.
    pub fn stare(&mut self, target: Option<Entity>, dt: f32) {
        update_mirror_stare(&mut self.world, target, dt);
    }

    pub fn trigger_mirror_scare(&mut self) -> bool {
        trigger_mirror_scare(&mut self.world)
    }

    // ==================== LIFECYCLE ====================

    pub fn readiness(&self) -> &ReadinessGate {
        self.world.resource::<ReadinessGate>()
    }

    pub fn readiness_mut(&mut self) -> Mut<'_, ReadinessGate> {
        self.world.resource_mut::<ReadinessGate>()
    }

    /// Run `hook` on the first [`update`](Self::update) that finds the
    /// readiness gate settled, with `Ready` or `TimedOut`. A timed out gate
    /// is where the driver continues with whatever content did arrive.
    /// Replaces any hook not yet run.
    pub fn on_settled(&mut self, hook: impl FnOnce(&mut World, Readiness) + Send + Sync + 'static) {
        self.on_settled = Some(Box::new(hook));
    }

    /// Drop every object and pending task, keeping configuration. The world
    /// is then ready for a fresh [`register`](Self::register).
    pub fn teardown(&mut self) {
        self.world.resource_mut::<TaskScheduler>().clear();
        let roots: Vec<Entity> = self
            .world
            .query_filtered::<Entity, Without<ChildOf>>()
            .iter(&self.world)
            .collect();
        for entity in roots {
            self.world.despawn(entity);
        }
        self.world.resource_mut::<ColliderSet>().clear();
        self.world.resource_mut::<InteractiveRegistry>().clear();
        *self.world.resource_mut::<WorldFlags>() = WorldFlags::default();
        self.world.resource_mut::<Messages<WorldCue>>().clear();
        info!("World torn down");
    }

    pub fn config(&self) -> &SimConfig {
        self.world.resource::<SimConfig>()
    }

    pub fn flags(&self) -> WorldFlags {
        *self.world.resource::<WorldFlags>()
    }

    pub fn time(&self) -> WorldTime {
        *self.world.resource::<WorldTime>()
    }

    pub fn pending_tasks(&self) -> usize {
        self.world.resource::<TaskScheduler>().len()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
