//! Door and container state machine.
//!
//! [`toggle_door`] drives a [`Door`] through
//! `Closed → Opening → Open → Closing → Closed`. Collider bookkeeping
//! happens at the *start* of a transition: opening removes the door's
//! collider from [`ColliderSet`] at once so the player can slip through
//! while it swings, closing puts it back at once so the doorway blocks
//! before the leaf arrives.
//!
//! The swing itself is a [`DoorSwing`] task on the [`TaskScheduler`].

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::door::{Door, Pose};
use crate::components::interactable::Interactable;
use crate::components::transform::Transform;
use crate::events::cue::{WorldCue, emit_cue};
use crate::math::{lerp_f32, lerp_vec3, smoothstep};
use crate::resources::colliderset::ColliderSet;
use crate::resources::scheduler::{Task, TaskScheduler, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleResult {
    /// A swing task was queued.
    Started,
    /// The door jumped straight to its new pose.
    Snapped,
    Locked,
    /// Already swinging.
    Busy,
    NotADoor,
}

/// Request the door to change state.
///
/// With `instant`, the door reaches its target pose within this call and no
/// cue is raised; restore uses this.
pub fn toggle_door(world: &mut World, entity: Entity, instant: bool) -> ToggleResult {
    let Some(door) = world.get::<Door>(entity) else {
        return ToggleResult::NotADoor;
    };
    if door.is_locked {
        return ToggleResult::Locked;
    }
    if door.is_animating {
        return ToggleResult::Busy;
    }

    let opening = !door.is_open;
    let target = if opening { door.open } else { door.closed };
    let duration = door.swing_duration;
    let collider = door.collider;
    let from = world
        .get::<Transform>(entity)
        .map(|t| Pose::new(t.translation, t.rotation.y))
        .unwrap_or(if opening { door.closed } else { door.open });

    if let Some(collider) = collider {
        let mut set = world.resource_mut::<ColliderSet>();
        if opening {
            set.remove(collider);
        } else {
            set.insert(collider);
        }
    }

    let id = world
        .get::<Interactable>(entity)
        .map(|i| i.id.clone())
        .unwrap_or_default();
    debug!(
        "Door '{}' {} ({})",
        id,
        if opening { "opening" } else { "closing" },
        if instant { "instant" } else { "animated" }
    );

    if instant || duration <= 0.0 {
        apply_pose(world, entity, target);
        finish_swing(world, entity, opening);
        return ToggleResult::Snapped;
    }

    let cue = if opening {
        WorldCue::DoorCreak { id }
    } else {
        WorldCue::DoorClick { id }
    };
    emit_cue(world, cue);

    if let Some(mut door) = world.get_mut::<Door>(entity) {
        door.is_animating = true;
    }
    world.resource_mut::<TaskScheduler>().spawn(DoorSwing {
        door: entity,
        from,
        to: target,
        opening,
        elapsed: 0.0,
        duration,
    });
    ToggleResult::Started
}

/// Force a door into a resting state without animation or cues.
///
/// Collider membership follows the resting state. Lock state is untouched.
pub fn set_door_resting(world: &mut World, entity: Entity, open: bool) {
    let Some(door) = world.get::<Door>(entity) else {
        return;
    };
    let pose = if open { door.open } else { door.closed };
    let collider = door.collider;
    if let Some(collider) = collider {
        let mut set = world.resource_mut::<ColliderSet>();
        if open {
            set.remove(collider);
        } else {
            set.insert(collider);
        }
    }
    apply_pose(world, entity, pose);
    finish_swing(world, entity, open);
}

fn apply_pose(world: &mut World, entity: Entity, pose: Pose) {
    if let Some(mut t) = world.get_mut::<Transform>(entity) {
        t.translation = pose.position;
        t.rotation.y = pose.yaw;
    }
}

fn finish_swing(world: &mut World, entity: Entity, open: bool) {
    let prompt = match world.get_mut::<Door>(entity) {
        Some(mut door) => {
            door.is_open = open;
            door.is_animating = false;
            door.prompt()
        }
        None => return,
    };
    if let Some(mut it) = world.get_mut::<Interactable>(entity) {
        it.prompt = prompt.to_string();
    }
}

/// Eases a door leaf from one pose to another.
pub struct DoorSwing {
    pub door: Entity,
    pub from: Pose,
    pub to: Pose,
    pub opening: bool,
    pub elapsed: f32,
    pub duration: f32,
}

impl Task for DoorSwing {
    fn step(&mut self, world: &mut World, dt: f32) -> TaskStatus {
        // gone, or forced to rest by a restore
        if !world.get::<Door>(self.door).is_some_and(|d| d.is_animating) {
            return TaskStatus::Done;
        }
        self.elapsed += dt;
        let t = (self.elapsed / self.duration).min(1.0);
        let e = smoothstep(t);
        apply_pose(
            world,
            self.door,
            Pose::new(
                lerp_vec3(self.from.position, self.to.position, e),
                lerp_f32(self.from.yaw, self.to.yaw, e),
            ),
        );
        if t >= 1.0 {
            finish_swing(world, self.door, self.opening);
            return TaskStatus::Done;
        }
        TaskStatus::Continue
    }
}
