//! Doors and containers.
//!
//! A [`Door`] is an [`Interactable`](crate::components::interactable::Interactable)
//! that swings between a closed and an open [`Pose`]. Its optional collider
//! entity is the one blocking volume registered in
//! [`ColliderSet`](crate::resources::colliderset::ColliderSet); whether that
//! entity is in the set is the only "is this a wall right now" fact.
//!
//! Swinging is driven by [`systems::door`](crate::systems::door).

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

/// Default swing duration in seconds.
pub const DEFAULT_SWING_DURATION: f32 = 1.5;

/// Position and yaw of a door leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub yaw: f32,
}

impl Pose {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }
}

/// Logical state derived from the `is_open`/`is_animating` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Who may operate a door.
#[derive(Debug, Clone, PartialEq)]
pub enum DoorAccess {
    /// Anyone. Cabinets, wardrobes, fridge.
    Free,
    /// Only while holding a specific item. Owning it without holding it
    /// speaks `holding_hint`; not owning it speaks `missing_hint`.
    EquippedItem {
        item: String,
        holding_hint: String,
        missing_hint: String,
    },
    /// Blocked while `is_locked`, speaking `hint`. Something else unlocks it.
    Lockable { hint: String },
}

#[derive(Component, Debug, Clone)]
pub struct Door {
    pub is_open: bool,
    pub is_animating: bool,
    pub is_locked: bool,
    pub closed: Pose,
    pub open: Pose,
    /// Entity carrying the blocking [`Collider`](crate::components::collider::Collider).
    pub collider: Option<Entity>,
    pub swing_duration: f32,
}

impl Door {
    pub fn new(closed: Pose, open: Pose) -> Self {
        Self {
            is_open: false,
            is_animating: false,
            is_locked: false,
            closed,
            open,
            collider: None,
            swing_duration: DEFAULT_SWING_DURATION,
        }
    }

    /// Door whose open pose is the default hinge swing: shifted half a
    /// meter back on X and Z and turned a quarter turn.
    pub fn hinged(closed: Pose) -> Self {
        let open = Pose::new(
            closed.position - Vec3::new(0.5, 0.0, 0.5),
            closed.yaw + FRAC_PI_2,
        );
        Self::new(closed, open)
    }

    pub fn with_collider(mut self, collider: Entity) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn locked(mut self) -> Self {
        self.is_locked = true;
        self
    }

    pub fn with_swing_duration(mut self, seconds: f32) -> Self {
        self.swing_duration = seconds.max(0.0);
        self
    }

    pub fn phase(&self) -> DoorPhase {
        match (self.is_open, self.is_animating) {
            (false, false) => DoorPhase::Closed,
            (false, true) => DoorPhase::Opening,
            (true, false) => DoorPhase::Open,
            (true, true) => DoorPhase::Closing,
        }
    }

    /// Prompt matching the resting state.
    pub fn prompt(&self) -> &'static str {
        if self.is_open { "Close Door" } else { "Open Door" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hinged_open_pose() {
        let d = Door::hinged(Pose::new(Vec3::new(0.0, 1.1, -2.5), 0.0));
        assert_eq!(d.open.position, Vec3::new(-0.5, 1.1, -3.0));
        assert!((d.open.yaw - FRAC_PI_2).abs() < 1e-6);
        assert!(!d.is_locked);
    }

    #[test]
    fn test_phase_cycle() {
        let mut d = Door::hinged(Pose::new(Vec3::ZERO, 0.0));
        assert_eq!(d.phase(), DoorPhase::Closed);
        d.is_animating = true;
        assert_eq!(d.phase(), DoorPhase::Opening);
        d.is_open = true;
        d.is_animating = false;
        assert_eq!(d.phase(), DoorPhase::Open);
        d.is_animating = true;
        assert_eq!(d.phase(), DoorPhase::Closing);
    }

    #[test]
    fn test_prompt_follows_state() {
        let mut d = Door::hinged(Pose::new(Vec3::ZERO, 0.0));
        assert_eq!(d.prompt(), "Open Door");
        d.is_open = true;
        assert_eq!(d.prompt(), "Close Door");
    }
}
