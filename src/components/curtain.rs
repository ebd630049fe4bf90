//! Bead curtain made of hanging Verlet strands.
//!
//! A [`BeadCurtain`] is a row of [`Strand`]s hanging from a rail. Each strand
//! is a chain of [`Bead`] nodes whose first node is pinned to the rail. The
//! simulation itself lives in [`systems::curtain`](crate::systems::curtain).

use bevy_ecs::prelude::Component;
use glam::{Quat, Vec3};
use smallvec::SmallVec;
use std::f32::consts::FRAC_PI_2;

/// Tunables of the curtain solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurtainSettings {
    pub strands: usize,
    pub beads_per_strand: usize,
    pub width: f32,
    pub height: f32,
    pub damping: f32,
    pub substeps: u32,
    pub iterations: u32,
    pub gravity: Vec3,
    /// Largest frame delta fed to the solver.
    pub max_dt: f32,
    /// Radius of the player cylinder pushing beads aside.
    pub player_radius: f32,
    /// Beads react only when `bead.y - player.y` is inside this band.
    pub player_band: (f32, f32),
    /// A strand wakes when the player is this close to its free end.
    pub wake_radius: f32,
    /// A strand stays awake while its last-frame energy exceeds this.
    pub sleep_energy: f32,
    /// Beyond this distance from the rail the whole curtain is skipped.
    pub cull_distance: f32,
    /// Minimum seconds between two brush cues.
    pub brush_cue_interval: f32,
}

impl Default for CurtainSettings {
    fn default() -> Self {
        Self {
            strands: 35,
            beads_per_strand: 18,
            width: 2.5,
            height: 2.3,
            damping: 0.994,
            substeps: 8,
            iterations: 4,
            gravity: Vec3::new(0.0, -9.8, 0.0),
            max_dt: 0.032,
            player_radius: 0.55,
            player_band: (-0.2, 2.2),
            wake_radius: 2.0,
            sleep_energy: 1e-5,
            cull_distance: 40.0,
            brush_cue_interval: 0.08,
        }
    }
}

/// One node of a strand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bead {
    pub position: Vec3,
    pub previous: Vec3,
    pub rest: Vec3,
    /// Only the anchor node is fixed.
    pub fixed: bool,
    /// Visual orientation, derived from the direction to the previous node.
    pub orientation: Quat,
}

impl Bead {
    fn at_rest(rest: Vec3, fixed: bool) -> Self {
        Self {
            position: rest,
            previous: rest,
            rest,
            fixed,
            orientation: anchor_orientation(),
        }
    }
}

/// Orientation of a bead hanging straight down.
pub fn anchor_orientation() -> Quat {
    Quat::from_rotation_z(-FRAC_PI_2)
}

/// One hanging chain of beads.
#[derive(Debug, Clone, PartialEq)]
pub struct Strand {
    pub beads: SmallVec<[Bead; 18]>,
    pub segment_length: f32,
    /// Sum of squared per-node displacement over the last simulated frame.
    pub energy: f32,
    pub sleeping: bool,
}

impl Strand {
    pub fn free_end(&self) -> Vec3 {
        self.beads.last().map(|b| b.position).unwrap_or(Vec3::ZERO)
    }
}

#[derive(Component, Debug, Clone)]
pub struct BeadCurtain {
    /// Center of the rail.
    pub origin: Vec3,
    pub yaw: f32,
    pub settings: CurtainSettings,
    pub strands: Vec<Strand>,
    /// `WorldTime::elapsed` when the last brush cue was raised.
    pub last_brush: f32,
}

impl BeadCurtain {
    pub fn new(origin: Vec3, yaw: f32, settings: CurtainSettings) -> Self {
        let count = settings.strands.max(1);
        let beads = settings.beads_per_strand.max(2);
        let spacing = settings.width / count as f32;
        let segment_length = settings.height / beads as f32;
        let rot = Quat::from_rotation_y(yaw);

        let strands = (0..count)
            .map(|i| {
                let lateral = (i as f32 - count as f32 / 2.0) * spacing;
                let beads = (0..beads)
                    .map(|j| {
                        let local = Vec3::new(0.0, -(j as f32) * segment_length, lateral);
                        Bead::at_rest(origin + rot * local, j == 0)
                    })
                    .collect();
                Strand {
                    beads,
                    segment_length,
                    energy: 0.0,
                    sleeping: true,
                }
            })
            .collect();

        Self {
            origin,
            yaw,
            settings,
            strands,
            last_brush: f32::NEG_INFINITY,
        }
    }

    pub fn awake_strands(&self) -> usize {
        self.strands.iter().filter(|s| !s.sleeping).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_layout() {
        let c = BeadCurtain::new(Vec3::new(5.0, 2.5, -18.5), 0.0, CurtainSettings::default());
        assert_eq!(c.strands.len(), 35);
        let s = &c.strands[0];
        assert_eq!(s.beads.len(), 18);
        assert!(s.beads[0].fixed);
        assert!(s.beads[1..].iter().all(|b| !b.fixed));
        assert!((s.segment_length - 2.3 / 18.0).abs() < 1e-6);
        let gap = s.beads[0].rest.distance(s.beads[1].rest);
        assert!((gap - s.segment_length).abs() < 1e-5);
        assert!(c.strands.iter().all(|s| s.sleeping));
    }

    #[test]
    fn test_rail_is_rotated_by_yaw() {
        let c = BeadCurtain::new(Vec3::ZERO, FRAC_PI_2, CurtainSettings::default());
        let first = c.strands[0].beads[0].rest;
        // lateral offset along local Z ends up along world X after a quarter turn
        assert!(first.x.abs() > 1.0);
        assert!(first.z.abs() < 1e-5);
    }
}
