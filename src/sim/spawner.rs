//! Wave spawner
//!
//! A tick-driven scheduled task that continuously populates the field from
//! a fixed anchor set. The coroutine shape is explicit: the spawner sleeps
//! by storing the tick it resumes at, and each wake handles exactly one
//! wave item (placed or skipped) before sleeping the stagger interval.
//! Waves chain back-to-back with no cooldown beyond that stagger.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::placement;
use super::state::{tier_for_mean_scale, MotionProfile, Obstacle, SimEvent, SimState};
use crate::consts::{ANCHOR_JITTER_RADIUS, SIM_DT};
use crate::{sample_in_unit_sphere, sample_rotation, sample_unit_vector};

/// Spawner scheduling phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpawnerPhase {
    /// Not yet scheduled (fresh session or disabled)
    #[default]
    Idle,
    /// Sleeping out the pre-first-wave delay
    WaitingInitialDelay,
    /// Mid-wave, one item per wake
    PlacingWave,
}

/// Suspendable spawner state, owned by [`SimState`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnerState {
    /// Master switch; disabling drops any pending continuation
    pub enabled: bool,
    pub phase: SpawnerPhase,
    /// Completed-wave counter
    pub wave_index: u32,
    /// Tick at which the sleeping task wakes
    resume_at_tick: u64,
    /// Items still to place in the current wave
    items_left: u32,
}

impl Default for SpawnerState {
    fn default() -> Self {
        Self {
            enabled: true,
            phase: SpawnerPhase::Idle,
            wave_index: 0,
            resume_at_tick: 0,
            items_left: 0,
        }
    }
}

impl SpawnerState {
    /// Re-arm the spawner; it restarts from the initial delay
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Cancel the pending continuation with no other side effects
    pub fn disable(&mut self) {
        self.enabled = false;
        self.phase = SpawnerPhase::Idle;
        self.items_left = 0;
    }
}

fn seconds_to_ticks(seconds: f32) -> u64 {
    (seconds / SIM_DT).round().max(0.0) as u64
}

/// Advance the spawner by one scheduler tick
pub fn step(state: &mut SimState) {
    if !state.spawner.enabled {
        return;
    }

    if state.spawner.phase == SpawnerPhase::Idle {
        if state.config.spawner.anchors.is_empty()
            || state.config.variants.is_empty()
            || state.config.spawner.rocks_per_wave == 0
        {
            log::warn!("spawner disabled: no anchors, variants, or wave items configured");
            state.spawner.disable();
            return;
        }
        state.spawner.phase = SpawnerPhase::WaitingInitialDelay;
        state.spawner.resume_at_tick =
            state.time_ticks + seconds_to_ticks(state.config.spawner.initial_delay);
        return;
    }

    if state.time_ticks < state.spawner.resume_at_tick {
        return;
    }

    if state.spawner.phase == SpawnerPhase::WaitingInitialDelay {
        state.spawner.items_left = state.config.spawner.rocks_per_wave;
        state.spawner.phase = SpawnerPhase::PlacingWave;
    }

    place_wave_item(state);
}

/// Place (or skip) a single wave item, then sleep the stagger interval
fn place_wave_item(state: &mut SimState) {
    let max_attempts = state.config.spawner.max_spawn_attempts_per_point;
    let min_distance = state.config.spawner.min_distance_from_target;
    let check_radius = state.config.spawner.pre_spawn_check_radius;

    let idx = state.rng.random_range(0..state.config.spawner.anchors.len());
    let anchor = state.config.spawner.anchors[idx];
    let mut candidate = anchor;
    let mut spawned = false;

    for _ in 0..max_attempts {
        if is_far_from_target(state.target, candidate, min_distance)
            && placement::is_clear(&state.obstacles, candidate, check_radius)
        {
            spawn_obstacle(state, candidate);
            spawned = true;
            break;
        }
        // Try a nearby offset and re-check
        candidate = anchor + sample_in_unit_sphere(&mut state.rng) * ANCHOR_JITTER_RADIUS;
    }

    if !spawned {
        // Best-effort policy: a crowded anchor just yields a smaller wave
        log::debug!("wave item skipped: no clear spot near {anchor}");
        state.events.push(SimEvent::SpawnSkipped);
    }

    state.spawner.items_left = state.spawner.items_left.saturating_sub(1);
    if state.spawner.items_left == 0 {
        state.events.push(SimEvent::WaveCompleted {
            wave_index: state.spawner.wave_index,
        });
        state.session.waves_completed += 1;
        state.spawner.wave_index += 1;
        state.spawner.items_left = state.config.spawner.rocks_per_wave;
    }

    state.spawner.resume_at_tick =
        state.time_ticks + seconds_to_ticks(state.config.spawner.spawn_stagger).max(1);
}

fn is_far_from_target(target: Vec3, pos: Vec3, min_distance: f32) -> bool {
    pos.distance(target) >= min_distance
}

/// Materialize one obstacle at an accepted candidate position
fn spawn_obstacle(state: &mut SimState, candidate: Vec3) {
    let variant_idx = state.rng.random_range(0..state.config.variants.len());
    let variant = state.config.variants[variant_idx];

    let scale = variant.base_scale;
    let mean = (scale.x + scale.y + scale.z) / 3.0;
    let rot = sample_rotation(&mut state.rng);

    // Roll the drifter chance: drifters get a preset velocity toward the
    // target and coast under drag; everything else is steered per tick.
    let drift_roll = state.rng.random_range(0.0..1.0);
    let (motion, vel, drag) = if drift_roll < state.config.spawner.drift_chance {
        let mut dir = (state.target - candidate).normalize_or_zero();
        if dir == Vec3::ZERO {
            dir = sample_unit_vector(&mut state.rng);
        }
        let speed = state.rng.random_range(
            state.config.spawner.drift_speed_min..=state.config.spawner.drift_speed_max,
        );
        (MotionProfile::Drifter, dir * speed, state.config.spawner.drift_drag)
    } else {
        let steering = state.config.steering;
        let speed = state.rng.random_range(steering.speed_min..=steering.speed_max);
        (MotionProfile::Steered { speed }, Vec3::ZERO, 0.0)
    };

    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        pos: candidate,
        rot,
        scale,
        vel,
        mass: variant.base_mass,
        drag,
        radius: variant.base_radius * mean,
        tier: tier_for_mean_scale(mean),
        variant: variant_idx,
        motion,
        frag: state.config.fragment,
    });

    // Gentle separation nudge right after spawn
    placement::nudge(
        &mut state.obstacles,
        candidate,
        state.config.spawner.repel_radius,
        state.config.spawner.repel_strength,
        Some(id),
        &mut state.rng,
    );

    state.events.push(SimEvent::ObstacleSpawned { id });
}
