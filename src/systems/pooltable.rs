//! Pool table physics.
//!
//! Balls are circles on the felt plane. Each step integrates position,
//! applies friction, drops balls into pockets, bounces them off the
//! cushions and finally resolves ball-ball contacts pairwise.
//!
//! Velocities are in table units per 1/60 s reference frame. A step of `dt`
//! covers `dt * 60` such frames: position moves by that many frames of
//! velocity and friction compounds as `friction^frames`.
//!
//! The contact response swaps the normal velocity components of two equal
//! balls that are approaching each other. There is no mass ratio and no spin.

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use crate::components::pooltable::{Ball, PoolTable, TableSettings};
use crate::events::cue::WorldCue;
use crate::resources::worldtime::WorldTime;

/// Things that happened during one table step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableEvents {
    /// Exchanged normal speed of each audible contact.
    pub clacks: SmallVec<[f32; 4]>,
    /// Number and cue flag of each pocketed ball.
    pub pocketed: SmallVec<[(u8, bool); 2]>,
}

pub fn pool_table_system(
    time: Res<WorldTime>,
    mut tables: Query<&mut PoolTable>,
    mut cues: MessageWriter<WorldCue>,
) {
    for mut table in tables.iter_mut() {
        if table.is_settled() {
            continue;
        }
        let events = step_table(&mut table, time.delta);
        for impulse in events.clacks {
            cues.write(WorldCue::BallsClack { impulse });
        }
        for (_, cue) in events.pocketed {
            cues.write(WorldCue::BallPocketed { cue });
        }
    }
}

/// Advance one table by `dt` seconds.
pub fn step_table(table: &mut PoolTable, dt: f32) -> TableEvents {
    let mut events = TableEvents::default();
    let frames = dt.max(0.0) * table.settings.reference_rate;
    let settings = &table.settings;

    for ball in table.balls.iter_mut().filter(|b| b.active) {
        ball.position += ball.velocity * frames;
        ball.velocity *= settings.friction.powf(frames);
        if ball.velocity.length_squared() < settings.rest_threshold {
            ball.velocity = Vec3::ZERO;
        }

        if in_pocket(ball, settings) {
            pocket(ball);
            events.pocketed.push((ball.number, ball.is_cue));
            continue;
        }
        bounce_off_cushions(ball, settings);
    }

    for i in 0..table.balls.len() {
        let (head, tail) = table.balls.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.active {
            continue;
        }
        for b in tail.iter_mut().filter(|b| b.active) {
            if let Some(impulse) = resolve_contact(a, b) {
                if impulse.abs() > settings.clack_threshold {
                    events.clacks.push(impulse.abs());
                }
            }
        }
    }
    events
}

fn in_pocket(ball: &Ball, settings: &TableSettings) -> bool {
    let p = Vec2::new(ball.position.x, ball.position.z);
    let r2 = settings.pocket_radius * settings.pocket_radius;
    settings.pockets.iter().any(|pocket| p.distance_squared(*pocket) < r2)
}

fn pocket(ball: &mut Ball) {
    ball.velocity = Vec3::ZERO;
    if ball.is_cue {
        ball.position = ball.spawn;
    } else {
        ball.active = false;
    }
}

fn bounce_off_cushions(ball: &mut Ball, settings: &TableSettings) {
    let limit_x = settings.half_extents.x - ball.radius;
    let limit_z = settings.half_extents.y - ball.radius;
    if ball.position.x.abs() > limit_x {
        ball.position.x = ball.position.x.clamp(-limit_x, limit_x);
        ball.velocity.x = -ball.velocity.x * settings.restitution;
    }
    if ball.position.z.abs() > limit_z {
        ball.position.z = ball.position.z.clamp(-limit_z, limit_z);
        ball.velocity.z = -ball.velocity.z * settings.restitution;
    }
}

/// Separate two overlapping balls and exchange their normal velocities if
/// they approach. Returns the exchanged normal speed, if any.
fn resolve_contact(a: &mut Ball, b: &mut Ball) -> Option<f32> {
    let delta = Vec3::new(b.position.x - a.position.x, 0.0, b.position.z - a.position.z);
    let dist = delta.length();
    let min_dist = a.radius + b.radius;
    if dist >= min_dist || dist < 1e-9 {
        return None;
    }
    let normal = delta / dist;
    let half_overlap = (min_dist - dist) * 0.5;
    a.position -= normal * half_overlap;
    b.position += normal * half_overlap;

    let approach = (b.velocity - a.velocity).dot(normal);
    if approach >= 0.0 {
        return None;
    }
    a.velocity += normal * approach;
    b.velocity -= normal * approach;
    Some(approach)
}
