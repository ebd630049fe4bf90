//! Bead curtain solver.
//!
//! Each awake strand is integrated with damped Verlet over a fixed number of
//! sub-steps. Every sub-step relaxes the segment lengths a few times and
//! pushes beads out of the player's cylinder. Strands far from the player
//! with no residual motion are snapped to rest and skipped.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use smallvec::SmallVec;

use crate::components::curtain::{BeadCurtain, CurtainSettings, Strand, anchor_orientation};
use crate::events::cue::WorldCue;
use crate::resources::player::PlayerProbe;
use crate::resources::worldtime::WorldTime;

/// Segments shorter than this are left alone by the length constraint.
const MIN_SEGMENT: f32 = 1e-4;

/// Advance every curtain by one frame.
pub fn curtain_system(
    time: Res<WorldTime>,
    probe: Res<PlayerProbe>,
    mut curtains: Query<&mut BeadCurtain>,
    mut cues: MessageWriter<WorldCue>,
) {
    for mut curtain in curtains.iter_mut() {
        let brushed = step_curtain(&mut curtain, time.delta, probe.position);
        if brushed && time.since(curtain.last_brush) >= curtain.settings.brush_cue_interval {
            curtain.last_brush = time.elapsed;
            if let Some(position) = probe.position {
                cues.write(WorldCue::CurtainBrushed { position });
            }
        }
    }
}

/// Step one curtain. Returns `true` if the player pushed any bead.
pub fn step_curtain(curtain: &mut BeadCurtain, dt: f32, player: Option<Vec3>) -> bool {
    let settings = curtain.settings;
    if let Some(p) = player {
        let cull = settings.cull_distance;
        if curtain.origin.distance_squared(p) > cull * cull {
            return false;
        }
    }

    let sub_dt = dt.clamp(0.0, settings.max_dt) / settings.substeps.max(1) as f32;
    let mut brushed = false;
    for strand in curtain.strands.iter_mut() {
        let near = player
            .map(|p| strand.free_end().distance_squared(p) < settings.wake_radius * settings.wake_radius)
            .unwrap_or(false);
        if !near && strand.energy <= settings.sleep_energy {
            if !strand.sleeping {
                snap_to_rest(strand);
            }
            continue;
        }
        strand.sleeping = false;
        brushed |= simulate_strand(strand, &settings, sub_dt, player);
    }
    brushed
}

fn snap_to_rest(strand: &mut Strand) {
    for bead in strand.beads.iter_mut() {
        bead.position = bead.rest;
        bead.previous = bead.rest;
        bead.orientation = anchor_orientation();
    }
    strand.energy = 0.0;
    strand.sleeping = true;
}

fn simulate_strand(
    strand: &mut Strand,
    settings: &CurtainSettings,
    sub_dt: f32,
    player: Option<Vec3>,
) -> bool {
    let start: SmallVec<[Vec3; 18]> = strand.beads.iter().map(|b| b.position).collect();
    let gravity_step = settings.gravity * sub_dt * sub_dt;
    let mut brushed = false;

    for _ in 0..settings.substeps.max(1) {
        for bead in strand.beads.iter_mut().filter(|b| !b.fixed) {
            let velocity = (bead.position - bead.previous) * settings.damping;
            bead.previous = bead.position;
            bead.position += velocity + gravity_step;
        }
        for _ in 0..settings.iterations {
            relax_lengths(strand);
            if let Some(p) = player {
                brushed |= push_out_of_player(strand, settings, p);
            }
        }
    }

    strand.energy = strand
        .beads
        .iter()
        .zip(start.iter())
        .map(|(b, s)| b.position.distance_squared(*s))
        .sum();
    orient(strand);
    brushed
}

fn relax_lengths(strand: &mut Strand) {
    let rest = strand.segment_length;
    for j in 0..strand.beads.len().saturating_sub(1) {
        let (head, tail) = strand.beads.split_at_mut(j + 1);
        let a = &mut head[j];
        let b = &mut tail[0];
        let delta = b.position - a.position;
        let len = delta.length();
        if len < MIN_SEGMENT {
            continue;
        }
        let correction = delta * ((len - rest) / len);
        if a.fixed {
            b.position -= correction;
        } else {
            a.position += correction * 0.5;
            b.position -= correction * 0.5;
        }
    }
}

fn push_out_of_player(strand: &mut Strand, settings: &CurtainSettings, player: Vec3) -> bool {
    let r = settings.player_radius;
    let (band_low, band_high) = settings.player_band;
    let mut pushed = false;
    for bead in strand.beads.iter_mut().filter(|b| !b.fixed) {
        let dy = bead.position.y - player.y;
        if dy <= band_low || dy >= band_high {
            continue;
        }
        let dx = bead.position.x - player.x;
        let dz = bead.position.z - player.z;
        let dist_sq = dx * dx + dz * dz;
        if dist_sq >= r * r || dist_sq < 1e-12 {
            continue;
        }
        let dist = dist_sq.sqrt();
        let push = (r - dist) / dist;
        bead.position.x += dx * push;
        bead.position.z += dz * push;
        pushed = true;
    }
    pushed
}

fn orient(strand: &mut Strand) {
    if let Some(anchor) = strand.beads.first_mut() {
        anchor.orientation = anchor_orientation();
    }
    for j in 1..strand.beads.len() {
        let dir = (strand.beads[j].position - strand.beads[j - 1].position).normalize_or_zero();
        if dir != Vec3::ZERO {
            strand.beads[j].orientation = Quat::from_rotation_arc(Vec3::X, dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::curtain::CurtainSettings;

    const DT: f32 = 1.0 / 60.0;

    fn small_curtain() -> BeadCurtain {
        BeadCurtain::new(
            Vec3::new(0.0, 2.5, 0.0),
            0.0,
            CurtainSettings {
                strands: 5,
                beads_per_strand: 10,
                width: 1.0,
                ..CurtainSettings::default()
            },
        )
    }

    fn max_stretch(strand: &Strand) -> f32 {
        strand
            .beads
            .windows(2)
            .map(|w| (w[0].position.distance(w[1].position) - strand.segment_length).abs())
            .fold(0.0, f32::max)
            / strand.segment_length
    }

    // ==================== SLEEP TESTS ====================

    #[test]
    fn test_far_player_leaves_curtain_asleep() {
        let mut c = small_curtain();
        let brushed = step_curtain(&mut c, DT, Some(Vec3::new(10.0, 0.0, 0.0)));
        assert!(!brushed);
        assert_eq!(c.awake_strands(), 0);
    }

    #[test]
    fn test_culled_curtain_is_untouched() {
        let mut c = small_curtain();
        c.strands[0].energy = 1.0;
        c.strands[0].beads[5].position.x += 0.3;
        let before = c.strands[0].beads[5].position;
        step_curtain(&mut c, DT, Some(Vec3::new(100.0, 0.0, 0.0)));
        assert_eq!(c.strands[0].beads[5].position, before);
    }

    #[test]
    fn test_strand_settles_and_snaps_to_rest() {
        let mut c = small_curtain();
        c.strands[2].energy = 1.0;
        c.strands[2].beads[9].position.x += 0.2;
        let far = Some(Vec3::new(10.0, 0.0, 0.0));
        let mut slept = false;
        for _ in 0..2000 {
            step_curtain(&mut c, DT, far);
            if c.strands[2].sleeping {
                slept = true;
                break;
            }
        }
        assert!(slept);
        for b in &c.strands[2].beads {
            assert_eq!(b.position, b.rest);
            assert_eq!(b.previous, b.rest);
        }
    }

    // ==================== CONSTRAINT TESTS ====================

    #[test]
    fn test_segment_lengths_stay_within_tolerance() {
        let mut c = small_curtain();
        for (i, s) in c.strands.iter_mut().enumerate() {
            s.energy = 1.0;
            for (j, b) in s.beads.iter_mut().enumerate().skip(1) {
                b.previous.x -= 0.01 * ((i + j) as f32).sin();
            }
        }
        for _ in 0..240 {
            step_curtain(&mut c, DT, None);
            for s in c.strands.iter().filter(|s| !s.sleeping) {
                assert!(max_stretch(s) < 0.05, "stretch {}", max_stretch(s));
            }
        }
    }

    #[test]
    fn test_anchor_never_moves() {
        let mut c = small_curtain();
        let anchors: Vec<Vec3> = c.strands.iter().map(|s| s.beads[0].position).collect();
        for _ in 0..60 {
            step_curtain(&mut c, DT, Some(Vec3::new(0.0, 0.0, 0.1)));
        }
        for (s, a) in c.strands.iter().zip(anchors) {
            assert_eq!(s.beads[0].position, a);
        }
    }

    // ==================== PLAYER COLLISION TESTS ====================

    #[test]
    fn test_player_pushes_beads_out() {
        let mut c = small_curtain();
        let player = Vec3::new(0.0, 0.0, 0.0);
        let mut brushed = false;
        for _ in 0..30 {
            brushed |= step_curtain(&mut c, DT, Some(player));
        }
        assert!(brushed);
        let r = c.settings.player_radius;
        for s in c.strands.iter().filter(|s| !s.sleeping) {
            for b in s.beads.iter().filter(|b| !b.fixed) {
                let dy = b.position.y - player.y;
                if dy > -0.2 && dy < 2.2 {
                    let d = ((b.position.x - player.x).powi(2) + (b.position.z - player.z).powi(2)).sqrt();
                    assert!(d > r * 0.8, "bead at {} inside player", d);
                }
            }
        }
    }

    #[test]
    fn test_orientation_follows_chain() {
        let mut c = small_curtain();
        c.strands[0].energy = 1.0;
        step_curtain(&mut c, DT, None);
        let s = &c.strands[0];
        for j in 1..s.beads.len() {
            let dir = (s.beads[j].position - s.beads[j - 1].position).normalize();
            let x = s.beads[j].orientation * Vec3::X;
            assert!(x.distance(dir) < 1e-3);
        }
        assert_eq!(s.beads[0].orientation, anchor_orientation());
    }
}
