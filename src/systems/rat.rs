//! Rat scurry along its waypoints.

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::rat::Rat;
use crate::components::transform::{Transform, Visibility};
use crate::resources::worldtime::WorldTime;

/// Height of the rat's body above the floor.
const BODY_HEIGHT: f32 = 0.05;
const BOUNCE_HEIGHT: f32 = 0.02;
const BOUNCE_RATE: f32 = 60.0;

pub fn rat_system(
    time: Res<WorldTime>,
    mut rats: Query<(&mut Rat, &mut Transform, &mut Visibility)>,
) {
    for (mut rat, mut transform, mut visibility) in rats.iter_mut() {
        step_rat(&mut rat, &mut transform, time.delta, time.elapsed);
        if rat.despawned && visibility.0 {
            visibility.0 = false;
        }
    }
}

/// Move the rat towards its current waypoint.
pub fn step_rat(rat: &mut Rat, transform: &mut Transform, dt: f32, elapsed: f32) {
    if !rat.active || rat.despawned {
        return;
    }
    let Some(&target) = rat.waypoints.get(rat.current) else {
        rat.retire();
        return;
    };
    let to_target = target - transform.translation;
    if to_target.length() < rat.reach {
        rat.current += 1;
        if rat.current >= rat.waypoints.len() {
            rat.active = false;
            rat.despawned = true;
            return;
        }
    }

    let dir = to_target.normalize_or_zero();
    if dir == Vec3::ZERO {
        return;
    }
    transform.translation += dir * rat.speed * dt;
    transform.rotation.y = dir.x.atan2(dir.z);
    transform.translation.y = BODY_HEIGHT + (elapsed * BOUNCE_RATE).sin().abs() * BOUNCE_HEIGHT;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_rat() -> (Rat, Transform) {
        let mut rat = Rat::new(
            [
                Vec3::new(0.0, 0.05, 0.0),
                Vec3::new(0.0, 0.05, -2.0),
                Vec3::new(2.0, 0.05, -2.0),
            ],
            Vec3::ZERO,
        );
        rat.triggered = true;
        rat.active = true;
        let t = Transform::from_translation(rat.start());
        (rat, t)
    }

    #[test]
    fn test_inactive_rat_stays_put() {
        let (mut rat, mut t) = running_rat();
        rat.active = false;
        step_rat(&mut rat, &mut t, 0.1, 0.0);
        assert_eq!(t.translation, Vec3::new(0.0, 0.05, 0.0));
    }

    #[test]
    fn test_rat_runs_route_and_despawns() {
        let (mut rat, mut t) = running_rat();
        let mut frames = 0;
        while !rat.despawned && frames < 600 {
            step_rat(&mut rat, &mut t, 1.0 / 60.0, frames as f32 / 60.0);
            frames += 1;
        }
        assert!(rat.despawned);
        assert!(!rat.active);
        assert!(t.translation.distance(Vec3::new(2.0, 0.05, -2.0)) < 0.5);
        // four meters at 4.8 m/s is under a second of running
        assert!(frames < 90);
    }

    #[test]
    fn test_rat_faces_travel_direction() {
        let (mut rat, mut t) = running_rat();
        rat.current = 1;
        step_rat(&mut rat, &mut t, 1.0 / 60.0, 0.0);
        // heading towards -Z
        assert!((t.rotation.y.abs() - std::f32::consts::PI).abs() < 1e-3);
    }
}
