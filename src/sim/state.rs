//! Simulation state and core entity types
//!
//! The live obstacle pool, the session context, and everything needed to
//! replay a run deterministically live here.

use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawner::SpawnerState;
use crate::config::SimConfig;
use crate::consts::*;

/// Score awarded per destroyed obstacle
pub const SCORE_PER_ROCK: u64 = 10;

/// How an obstacle moves between ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionProfile {
    /// Preset velocity toward the target, bypassing per-tick steering
    Drifter,
    /// Advanced toward the target each tick at a fixed per-instance speed,
    /// sidestepping when the path ahead is occupied
    Steered { speed: f32 },
}

/// A destructible field obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec3,
    pub rot: Quat,
    /// Non-uniform local scale
    pub scale: Vec3,
    pub vel: Vec3,
    pub mass: f32,
    /// Linear damping (0 = coasts forever)
    pub drag: f32,
    /// Collision-sphere radius at current scale
    pub radius: f32,
    /// Discrete size class: 0 = smallest, never fragments further
    pub tier: u8,
    /// Variant (prefab) index this obstacle was built from
    pub variant: usize,
    pub motion: MotionProfile,
    /// Fragmentation tunables, inherited down the split chain
    pub frag: crate::config::FragmentParams,
}

impl Obstacle {
    /// Mean of the scale components, the basis for tier inference
    pub fn mean_scale(&self) -> f32 {
        (self.scale.x + self.scale.y + self.scale.z) / 3.0
    }

    /// Push the obstacle through its rigid body: `vel += impulse / mass`
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.vel += impulse / self.mass.max(MIN_CHILD_MASS);
    }
}

/// Infer a size tier from a mean scale, assuming 1.0 is the base size
pub fn tier_for_mean_scale(mean: f32) -> u8 {
    if mean >= MEDIUM_SCALE_THRESHOLD {
        2
    } else if mean >= SMALL_SCALE_THRESHOLD {
        1
    } else {
        0
    }
}

/// Per-session score/event reporting, passed explicitly instead of living
/// in process-wide singletons
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub score: u64,
    pub obstacles_destroyed: u64,
    pub waves_completed: u32,
}

impl SessionContext {
    pub fn add_score(&mut self, amount: u64) {
        self.score += amount;
    }
}

/// Notifications drained by the host after each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    ObstacleSpawned { id: u32 },
    /// A wave item exhausted its retry budget and was skipped
    SpawnSkipped,
    WaveCompleted { wave_index: u32 },
    ObstacleDestroyed { id: u32, tier: u8 },
    ObstacleFragmented {
        parent: u32,
        children: [u32; 2],
        /// Placement retries ran out and the children overlap something
        forced: bool,
    },
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// The point all obstacles converge on (the player/viewer)
    pub target: Vec3,
    pub config: SimConfig,
    /// Live obstacle pool (sorted by id for determinism)
    pub obstacles: Vec<Obstacle>,
    pub spawner: SpawnerState,
    /// When false, steered obstacles freeze in place
    pub steering_enabled: bool,
    pub session: SessionContext,
    /// Events produced since the last drain
    pub events: Vec<SimEvent>,
    /// Next entity ID
    next_id: u32,
}

impl SimState {
    /// Create a new simulation with the given seed and configuration
    pub fn new(seed: u64, config: SimConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            target: Vec3::ZERO,
            config,
            obstacles: Vec::new(),
            spawner: SpawnerState::default(),
            steering_enabled: true,
            session: SessionContext::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Look up a live obstacle by id
    pub fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    /// Remove an obstacle from the live pool, returning it
    pub fn remove_obstacle(&mut self, id: u32) -> Option<Obstacle> {
        let idx = self.obstacles.iter().position(|o| o.id == id)?;
        Some(self.obstacles.remove(idx))
    }

    /// Stop signal for game-over: halts the spawner's pending continuation
    /// and freezes steered obstacles in place (they are not removed).
    pub fn halt(&mut self) {
        self.spawner.disable();
        self.steering_enabled = false;
    }

    /// Take the events accumulated since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure obstacles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_for_mean_scale_thresholds() {
        assert_eq!(tier_for_mean_scale(1.2), 2);
        assert_eq!(tier_for_mean_scale(0.9), 2);
        assert_eq!(tier_for_mean_scale(0.75), 1);
        assert_eq!(tier_for_mean_scale(0.6), 1);
        assert_eq!(tier_for_mean_scale(0.3), 0);
    }

    #[test]
    fn test_entity_ids_are_unique_and_increasing() {
        let mut state = SimState::new(1, SimConfig::default());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_apply_impulse_scales_by_mass() {
        let mut obstacle = Obstacle {
            id: 1,
            pos: Vec3::ZERO,
            rot: Quat::IDENTITY,
            scale: Vec3::ONE,
            vel: Vec3::ZERO,
            mass: 2.0,
            drag: 0.0,
            radius: 0.5,
            tier: 2,
            variant: 0,
            motion: MotionProfile::Steered { speed: 0.3 },
            frag: crate::config::FragmentParams::default(),
        };
        obstacle.apply_impulse(Vec3::new(4.0, 0.0, 0.0));
        assert!((obstacle.vel.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_halt_freezes_without_removing() {
        let mut state = SimState::new(1, SimConfig::default());
        state.halt();
        assert!(!state.steering_enabled);
        assert!(!state.spawner.enabled);
    }
}
