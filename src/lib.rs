//! Rockfield - field population core for a 3D rock-shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, steering, fragmentation)
//! - `config`: Session-scoped tuning surface
//!
//! Rendering, input dispatch, health/score UI, and scene management are
//! external collaborators: the host feeds destruction events and a target
//! point into [`sim::tick()`] and drains [`sim::SimEvent`]s back out.

pub mod config;
pub mod sim;

pub use config::{FragmentParams, ObstacleVariant, SimConfig, SpawnerConfig, SteeringConfig};

use glam::{Quat, Vec3};
use rand::Rng;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Largest size tier an obstacle can carry
    pub const MAX_TIER: u8 = 2;
    /// Mean-scale threshold at or above which an obstacle is tier 2
    pub const MEDIUM_SCALE_THRESHOLD: f32 = 0.9;
    /// Mean-scale threshold at or above which an obstacle is tier 1
    pub const SMALL_SCALE_THRESHOLD: f32 = 0.6;

    /// Fraction of the repel strength applied as a positional nudge
    pub const NUDGE_SCALE: f32 = 0.005;
    /// Squared distance below which a neighbor counts as coincident
    pub const COINCIDENT_EPSILON_SQ: f32 = 0.002;

    /// Radius of the jitter sphere for spawn retries around an anchor
    pub const ANCHOR_JITTER_RADIUS: f32 = 0.5;
    /// Radius of the jitter sphere for fragment reposition retries
    pub const REPOSITION_JITTER_RADIUS: f32 = 0.08;
    /// Distance from the parent at which fragment children materialize
    pub const CHILD_SPAWN_OFFSET: f32 = 0.15;
    /// Outward (along-normal) component mixed into the split directions
    pub const SPLIT_NORMAL_POP: f32 = 0.2;
    /// Mass floor for fragment children
    pub const MIN_CHILD_MASS: f32 = 0.1;

    /// Squared length below which a vector is treated as degenerate
    pub const DEGENERATE_EPSILON_SQ: f32 = 1e-4;
}

/// Uniformly sample a point on the unit sphere
pub fn sample_unit_vector<R: Rng>(rng: &mut R) -> Vec3 {
    let z = rng.random_range(-1.0_f32..1.0);
    let theta = rng.random_range(0.0_f32..std::f32::consts::TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Uniformly sample a point inside the unit sphere
pub fn sample_in_unit_sphere<R: Rng>(rng: &mut R) -> Vec3 {
    let u = rng.random_range(0.0_f32..1.0);
    sample_unit_vector(rng) * u.cbrt()
}

/// Uniformly sample a rotation (Shoemake's subgroup algorithm)
pub fn sample_rotation<R: Rng>(rng: &mut R) -> Quat {
    use std::f32::consts::TAU;
    let u1 = rng.random_range(0.0_f32..1.0);
    let u2 = rng.random_range(0.0_f32..TAU);
    let u3 = rng.random_range(0.0_f32..TAU);
    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();
    Quat::from_xyzw(a * u2.sin(), a * u2.cos(), b * u3.sin(), b * u3.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_sample_unit_vector_is_normalized() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let v = sample_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sample_in_unit_sphere_is_contained() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            assert!(sample_in_unit_sphere(&mut rng).length() <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn test_sample_rotation_is_unit() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let q = sample_rotation(&mut rng);
            assert!((q.length() - 1.0).abs() < 1e-4);
        }
    }
}
