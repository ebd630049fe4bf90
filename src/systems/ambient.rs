//! Ambient effect systems: dust motes, shower water and the ceiling fan.

use bevy_ecs::prelude::*;

use crate::components::ambient::{DustMotes, Fan, SHOWER_FLOOR, SHOWER_OPACITY, ShowerWater};
use crate::resources::worldflags::WorldFlags;
use crate::resources::worldtime::WorldTime;

/// Motes drift ten times slower than their stored velocity suggests.
const MOTE_DRIFT_SCALE: f32 = 10.0;
/// Rate at which shower opacity eases towards its target.
const SHOWER_FADE_RATE: f32 = 5.0;
/// Below this opacity an inactive shower stops being drawn.
const SHOWER_HIDE_OPACITY: f32 = 0.01;

/// Drift dust motes; motes leaving the box reappear near the opposite side.
pub fn dust_motes_system(time: Res<WorldTime>, mut query: Query<&mut DustMotes>) {
    for mut dust in query.iter_mut() {
        step_dust(&mut dust, time.delta);
    }
}

pub fn step_dust(dust: &mut DustMotes, dt: f32) {
    let half = dust.volume * 0.5;
    for mote in dust.motes.iter_mut() {
        mote.position += mote.velocity * dt * MOTE_DRIFT_SCALE;
        for axis in 0..3 {
            if mote.position[axis].abs() > half[axis] {
                mote.position[axis] *= -0.95;
            }
        }
    }
}

/// Fade shower water in or out and let the drops fall.
pub fn shower_water_system(
    time: Res<WorldTime>,
    mut rng: Local<fastrand::Rng>,
    mut query: Query<&mut ShowerWater>,
) {
    for mut water in query.iter_mut() {
        step_shower(&mut water, time.delta, &mut rng);
    }
}

pub fn step_shower(water: &mut ShowerWater, dt: f32, rng: &mut fastrand::Rng) {
    if !water.active && water.opacity <= SHOWER_HIDE_OPACITY {
        water.visible = false;
        return;
    }
    water.visible = true;
    let target = if water.active { SHOWER_OPACITY } else { 0.0 };
    water.opacity += (target - water.opacity) * (SHOWER_FADE_RATE * dt).min(1.0);

    for drop in water.drops.iter_mut() {
        drop.position.y -= drop.speed * dt;
        if drop.position.y < SHOWER_FLOOR {
            *drop = ShowerWater::spawn_drop(rng);
        }
    }
}

/// Spin fan blades while the fan is on.
pub fn fan_system(time: Res<WorldTime>, flags: Res<WorldFlags>, mut query: Query<&mut Fan>) {
    if !flags.fan_on {
        return;
    }
    for mut fan in query.iter_mut() {
        fan.angle = (fan.angle - fan.speed * time.delta).rem_euclid(std::f32::consts::TAU);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_dust_stays_bounded() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut dust = DustMotes::new(Vec3::new(2.0, 1.0, 2.0), 50, &mut rng);
        for m in dust.motes.iter_mut() {
            m.velocity *= 100.0;
        }
        for _ in 0..1000 {
            step_dust(&mut dust, 1.0 / 60.0);
        }
        for m in &dust.motes {
            assert!(m.position.x.abs() <= 1.0 + 0.1);
            assert!(m.position.y.abs() <= 0.5 + 0.1);
            assert!(m.position.z.abs() <= 1.0 + 0.1);
        }
    }

    #[test]
    fn test_shower_fades_in_and_out() {
        let mut rng = fastrand::Rng::with_seed(1);
        let mut water = ShowerWater::new(20, &mut rng);
        step_shower(&mut water, 0.1, &mut rng);
        assert!(!water.visible);

        water.active = true;
        for _ in 0..120 {
            step_shower(&mut water, 1.0 / 60.0, &mut rng);
        }
        assert!(water.visible);
        assert!((water.opacity - SHOWER_OPACITY).abs() < 0.01);
        assert!(water.drops.iter().all(|d| d.position.y >= SHOWER_FLOOR));

        water.active = false;
        for _ in 0..240 {
            step_shower(&mut water, 1.0 / 60.0, &mut rng);
        }
        assert!(!water.visible);
    }
}
