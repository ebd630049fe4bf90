//! Pool table with rolling balls.
//!
//! Ball positions are expressed in table space: the XZ plane of the felt,
//! centered on the table origin, with `y` always zero. Velocities are in
//! table units per reference frame (see [`TableSettings::reference_rate`]).
//! Stepping happens in [`systems::pooltable`](crate::systems::pooltable).

use bevy_ecs::prelude::Component;
use glam::{Vec2, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub struct TableSettings {
    /// Inner half extents of the felt along X and Z.
    pub half_extents: Vec2,
    pub ball_radius: f32,
    pub pockets: Vec<Vec2>,
    pub pocket_radius: f32,
    /// Multiplicative velocity decay per step.
    pub friction: f32,
    /// Squared speed under which a ball is considered at rest.
    pub rest_threshold: f32,
    /// Fraction of speed kept when bouncing off a cushion.
    pub restitution: f32,
    /// Speed given to the cue ball by a shot.
    pub shot_power: f32,
    /// Frames per second the velocity units refer to.
    pub reference_rate: f32,
    /// Minimum exchanged speed for an audible clack.
    pub clack_threshold: f32,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            half_extents: Vec2::new(1.15, 0.55),
            ball_radius: 0.04,
            pockets: vec![
                Vec2::new(-1.2, -0.6),
                Vec2::new(1.2, -0.6),
                Vec2::new(-1.2, 0.6),
                Vec2::new(1.2, 0.6),
                Vec2::new(0.0, -0.65),
                Vec2::new(0.0, 0.65),
            ],
            pocket_radius: 0.15,
            friction: 0.98,
            rest_threshold: 1e-6,
            restitution: 0.8,
            shot_power: 0.25,
            reference_rate: 60.0,
            clack_threshold: 0.002,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub number: u8,
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub active: bool,
    pub is_cue: bool,
    pub spawn: Vec3,
}

impl Ball {
    pub fn new(number: u8, position: Vec3, radius: f32) -> Self {
        let position = Vec3::new(position.x, 0.0, position.z);
        Self {
            number,
            position,
            velocity: Vec3::ZERO,
            radius,
            active: true,
            is_cue: number == 0,
            spawn: position,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn is_moving(&self) -> bool {
        self.velocity != Vec3::ZERO
    }
}

#[derive(Component, Debug, Clone)]
pub struct PoolTable {
    /// World-space center of the felt.
    pub origin: Vec3,
    pub settings: TableSettings,
    pub balls: Vec<Ball>,
}

/// Where the triangle rack starts, in table space.
const RACK_APEX_X: f32 = 0.5;
const RACK_SPACING: f32 = 0.082;
const CUE_SPAWN: Vec3 = Vec3::new(-0.6, 0.0, 0.0);

impl PoolTable {
    pub fn new(origin: Vec3, settings: TableSettings) -> Self {
        Self {
            origin,
            settings,
            balls: Vec::new(),
        }
    }

    /// Table with a cue ball and fifteen balls racked in a triangle.
    pub fn racked(origin: Vec3, settings: TableSettings) -> Self {
        let r = settings.ball_radius;
        let mut balls = vec![Ball::new(0, CUE_SPAWN, r)];
        let mut number = 1u8;
        for row in 0..5 {
            for j in 0..=row {
                let x = RACK_APEX_X + row as f32 * RACK_SPACING * 0.866;
                let z = (j as f32 - row as f32 / 2.0) * RACK_SPACING;
                balls.push(Ball::new(number, Vec3::new(x, 0.0, z), r));
                number += 1;
            }
        }
        Self {
            origin,
            settings,
            balls,
        }
    }

    pub fn with_balls(mut self, balls: Vec<Ball>) -> Self {
        self.balls = balls;
        self
    }

    pub fn cue_ball(&self) -> Option<&Ball> {
        self.balls.iter().find(|b| b.is_cue)
    }

    pub fn cue_ball_mut(&mut self) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.is_cue)
    }

    /// Strike the cue ball along the horizontal part of `direction`.
    pub fn shoot(&mut self, direction: Vec3) -> bool {
        let power = self.settings.shot_power;
        match self.cue_ball_mut() {
            Some(ball) if ball.active => {
                ball.velocity = Vec3::new(direction.x * power, 0.0, direction.z * power);
                true
            }
            _ => false,
        }
    }

    pub fn to_world(&self, table_pos: Vec3) -> Vec3 {
        self.origin + table_pos
    }

    pub fn is_settled(&self) -> bool {
        self.balls.iter().all(|b| !b.active || !b.is_moving())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rack_has_sixteen_balls() {
        let t = PoolTable::racked(Vec3::ZERO, TableSettings::default());
        assert_eq!(t.balls.len(), 16);
        assert_eq!(t.balls.iter().filter(|b| b.is_cue).count(), 1);
        assert_eq!(t.cue_ball().unwrap().position, Vec3::new(-0.6, 0.0, 0.0));
        assert!(t.is_settled());
    }

    #[test]
    fn test_rack_balls_do_not_overlap() {
        let t = PoolTable::racked(Vec3::ZERO, TableSettings::default());
        for (i, a) in t.balls.iter().enumerate() {
            for b in &t.balls[i + 1..] {
                assert!(a.position.distance(b.position) >= a.radius + b.radius - 1e-4);
            }
        }
    }

    #[test]
    fn test_shoot_projects_direction() {
        let mut t = PoolTable::racked(Vec3::ZERO, TableSettings::default());
        assert!(t.shoot(Vec3::new(0.0, -0.5, -1.0)));
        assert_eq!(t.cue_ball().unwrap().velocity, Vec3::new(0.0, 0.0, -0.25));
    }
}
