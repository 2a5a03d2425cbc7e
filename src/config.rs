//! Session-scoped configuration
//!
//! Every tunable the spawning/fragmentation/steering core recognizes lives
//! here. Nothing is persisted; the host constructs a [`SimConfig`] per
//! session (defaults reproduce the reference tuning).

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A spawnable obstacle variant (stand-in for a prefab)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleVariant {
    /// Scale applied to a freshly spawned obstacle of this variant
    pub base_scale: Vec3,
    /// Collision-sphere radius at unit scale
    pub base_radius: f32,
    /// Rigid-body mass at unit scale
    pub base_mass: f32,
}

impl Default for ObstacleVariant {
    fn default() -> Self {
        Self {
            base_scale: Vec3::ONE,
            base_radius: 0.5,
            base_mass: 1.0,
        }
    }
}

/// Wave spawner tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnerConfig {
    /// Candidate spawn locations; read-only during a run
    pub anchors: Vec<Vec3>,

    // === Spawn safety ===
    /// No-spawn bubble around the target point
    pub min_distance_from_target: f32,
    /// Clearance radius checked before materializing
    pub pre_spawn_check_radius: f32,
    /// Retry budget per wave item
    pub max_spawn_attempts_per_point: u32,
    /// Seconds between placements within a wave
    pub spawn_stagger: f32,

    // === Repel on spawn ===
    /// Neighbor search radius for the separation nudge
    pub repel_radius: f32,
    /// Strength baseline, scaled down to a small positional correction
    pub repel_strength: f32,

    // === Drifters (toward the target) ===
    /// Fraction of spawns that drift toward the target
    pub drift_chance: f32,
    pub drift_speed_min: f32,
    pub drift_speed_max: f32,
    /// Linear damping so drifters coast
    pub drift_drag: f32,

    // === Wave settings ===
    /// Items per wave
    pub rocks_per_wave: u32,
    /// Seconds before the first wave
    pub initial_delay: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            anchors: Vec::new(),
            min_distance_from_target: 3.0,
            pre_spawn_check_radius: 0.6,
            max_spawn_attempts_per_point: 8,
            spawn_stagger: 0.12,
            repel_radius: 1.0,
            repel_strength: 1.5,
            drift_chance: 0.2,
            drift_speed_min: 0.08,
            drift_speed_max: 0.18,
            drift_drag: 0.2,
            rocks_per_wave: 7,
            initial_delay: 3.0,
        }
    }
}

/// Fragmentation tuning, inherited by every child so the behavior is
/// self-similar across generations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FragmentParams {
    /// Variant index used for split children; `None` disables splitting
    pub child_variant: Option<usize>,
    /// Scale applied to each child vs the parent
    pub child_scale_factor: f32,
    /// Impulse pushing the two children apart
    pub split_impulse: f32,
    /// Extra sideways spread mixed into the impulse
    pub lateral_spread: f32,
    /// Clearance radius checked before a child materializes
    pub spawn_clear_radius: f32,
    /// Reposition budget before a child is force-placed
    pub max_reposition_attempts: u32,
}

impl Default for FragmentParams {
    fn default() -> Self {
        Self {
            child_variant: Some(0),
            child_scale_factor: 0.6,
            split_impulse: 2.5,
            lateral_spread: 0.75,
            spawn_clear_radius: 0.3,
            max_reposition_attempts: 6,
        }
    }
}

/// Steering tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringConfig {
    /// Forward probe sphere radius (also the probe offset)
    pub check_radius: f32,
    /// Per-instance speed range, fixed at creation
    pub speed_min: f32,
    pub speed_max: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            check_radius: 0.5,
            speed_min: 0.2,
            speed_max: 0.5,
        }
    }
}

/// Complete core configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimConfig {
    /// Obstacle variants spawnable by the wave spawner
    pub variants: Vec<ObstacleVariant>,
    pub spawner: SpawnerConfig,
    pub fragment: FragmentParams,
    pub steering: SteeringConfig,
}

impl SimConfig {
    /// A minimal playable setup: one unit variant and a ring of anchors
    /// around the origin at the given radius.
    pub fn with_anchor_ring(radius: f32, count: usize) -> Self {
        let anchors = (0..count)
            .map(|i| {
                let theta = std::f32::consts::TAU * i as f32 / count.max(1) as f32;
                Vec3::new(radius * theta.cos(), 0.0, radius * theta.sin())
            })
            .collect();
        Self {
            variants: vec![ObstacleVariant::default()],
            spawner: SpawnerConfig {
                anchors,
                ..SpawnerConfig::default()
            },
            ..Self::default()
        }
    }
}
