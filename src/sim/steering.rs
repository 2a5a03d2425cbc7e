//! Steering behavior
//!
//! Steered obstacles creep toward the target point every tick at the speed
//! they were born with. If the sphere one probe-radius ahead is occupied by
//! another obstacle they sidestep upward instead; a deterministic evasion,
//! not path planning. Re-evaluated from scratch each tick, in id order.

use glam::Vec3;

use super::placement;
use super::state::{MotionProfile, SimState};
use crate::sample_unit_vector;

/// Advance every steered obstacle by one tick
pub fn step(state: &mut SimState, dt: f32) {
    if !state.steering_enabled {
        return;
    }
    let check_radius = state.config.steering.check_radius;
    let target = state.target;

    for i in 0..state.obstacles.len() {
        let MotionProfile::Steered { speed } = state.obstacles[i].motion else {
            continue;
        };
        let (id, pos) = (state.obstacles[i].id, state.obstacles[i].pos);

        let mut dir = (target - pos).normalize_or_zero();
        if dir == Vec3::ZERO {
            dir = sample_unit_vector(&mut state.rng);
        }

        let probe = pos + dir * check_radius;
        let blocked = !placement::is_clear_excluding(&state.obstacles, probe, check_radius, id);
        let step_dir = if blocked { Vec3::Y } else { dir };

        state.obstacles[i].pos += step_dir * speed * dt;
    }
}
