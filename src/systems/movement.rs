//! Player movement and collision correction.
//!
//! Movement runs in the frame driver before
//! [`Simulation::update`](crate::simulation::Simulation::update):
//!
//! 1. [`probe_ground`] casts a ray down against the walkable [`Floor`]s;
//! 2. [`integrate`] applies gravity, jumping and the input-driven walk;
//! 3. [`resolve_collisions`] pulls the player out of blocking colliders,
//!    keeping whichever single-axis move stays clear so walls can be slid
//!    along.
//!
//! [`step_player`] chains the three.

use glam::Vec3;

use crate::components::collider::Floor;
use crate::math::Aabb;
use crate::resources::player::PlayerSettings;

/// Input axes for one frame. `forward`/`strafe` are in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    pub forward: f32,
    pub strafe: f32,
    pub jump: bool,
}

/// Kinematic state of the player. `position` is at the feet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerBody {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Camera yaw in radians; zero looks down -Z.
    pub yaw: f32,
    /// Camera pitch in radians, only used for the look direction.
    pub pitch: f32,
    pub on_ground: bool,
    pub can_jump: bool,
    /// Height of the floor below, `-inf` once it has been missing too long.
    pub ground_level: f32,
    pub missed_floor_frames: u32,
}

impl PlayerBody {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            on_ground: false,
            can_jump: false,
            ground_level: position.y,
            missed_floor_frames: 0,
        }
    }

    pub fn eye(&self, settings: &PlayerSettings) -> Vec3 {
        self.position + Vec3::Y * settings.height
    }

    /// Unit look direction from yaw and pitch.
    pub fn look_direction(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }
}

/// Collision box of a player standing at `feet`.
pub fn player_box(feet: Vec3, size: Vec3) -> Aabb {
    Aabb::from_center_size(feet + Vec3::Y * (size.y * 0.5), size)
}

/// Update the ground reference from the floors under the player.
pub fn probe_ground(body: &mut PlayerBody, floors: &[Floor], settings: &PlayerSettings) {
    let origin_y = body.position.y + settings.probe_height;
    let hit = floors
        .iter()
        .filter_map(|f| f.height_at(body.position.x, body.position.z))
        .filter(|h| *h <= origin_y)
        .fold(None, |best: Option<f32>, h| Some(best.map_or(h, |b| b.max(h))));

    match hit {
        Some(h) => {
            body.ground_level = h;
            body.missed_floor_frames = 0;
        }
        None => {
            body.missed_floor_frames += 1;
            if body.missed_floor_frames > settings.floor_miss_frames {
                body.ground_level = f32::NEG_INFINITY;
            }
        }
    }
}

/// Euler step of gravity, jump and walking.
pub fn integrate(body: &mut PlayerBody, input: MoveInput, settings: &PlayerSettings, dt: f32) {
    if body.position.y > body.ground_level {
        body.velocity.y -= settings.gravity * dt;
        body.on_ground = false;
    } else {
        body.velocity.y = body.velocity.y.max(0.0);
        body.position.y = body.ground_level;
        body.on_ground = true;
        body.can_jump = true;
    }

    if input.jump && body.on_ground && body.can_jump {
        body.velocity.y = settings.jump_force;
        body.on_ground = false;
        body.can_jump = false;
    }

    let (s, c) = body.yaw.sin_cos();
    let forward = Vec3::new(-s, 0.0, -c);
    let right = Vec3::new(c, 0.0, -s);
    let mut wish = forward * input.forward + right * input.strafe;
    if wish.length_squared() > 1.0 {
        wish = wish.normalize();
    }
    body.velocity.x = wish.x * settings.speed;
    body.velocity.z = wish.z * settings.speed;

    body.position += body.velocity * dt;
}

/// Correct a move from `old` to `new` against blocking boxes.
///
/// If the new box is clear it is kept. Otherwise the horizontal move is
/// undone and retried one axis at a time (X, then Z on top of an accepted X),
/// keeping each axis move that stays clear. Vertical motion is kept unless
/// it alone would cause an overlap.
pub fn resolve_collisions(old: Vec3, new: Vec3, size: Vec3, colliders: &[Aabb]) -> Vec3 {
    let blocked = |feet: Vec3| {
        let b = player_box(feet, size);
        colliders.iter().any(|c| b.intersects(c))
    };
    if !blocked(new) {
        return new;
    }

    let mut resolved = Vec3::new(old.x, new.y, old.z);
    let x_only = Vec3::new(new.x, resolved.y, resolved.z);
    if !blocked(x_only) {
        resolved = x_only;
    }
    let z_next = Vec3::new(resolved.x, resolved.y, new.z);
    if !blocked(z_next) {
        resolved = z_next;
    }
    if blocked(resolved) {
        return old;
    }
    resolved
}

/// One full movement frame. Returns the corrected feet position.
pub fn step_player(
    body: &mut PlayerBody,
    input: MoveInput,
    floors: &[Floor],
    colliders: &[Aabb],
    settings: &PlayerSettings,
    dt: f32,
) -> Vec3 {
    let old = body.position;
    probe_ground(body, floors, settings);
    integrate(body, input, settings, dt);
    body.position = resolve_collisions(old, body.position, settings.size, colliders);
    body.position
}
