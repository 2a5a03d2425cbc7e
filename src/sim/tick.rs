//! Fixed timestep simulation tick
//!
//! One call per simulation frame: destruction events fragment first, the
//! spawner wakes if its sleep expired, steered obstacles advance, and
//! finally velocities integrate under drag. All within a single thread, so
//! every placement query observes the obstacles created earlier in the same
//! tick.

use glam::Vec3;

use super::fragment::fragment;
use super::state::{SimEvent, SimState, SCORE_PER_ROCK};
use super::{spawner, steering};

/// A destruction notification from the external hit-detection collaborator
#[derive(Debug, Clone, Copy)]
pub struct DestroyedObstacle {
    pub id: u32,
    pub hit_point: Vec3,
    pub hit_normal: Vec3,
}

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest target-point position, if it moved this frame
    pub target: Option<Vec3>,
    /// Obstacles destroyed since the last tick
    pub destroyed: Vec<DestroyedObstacle>,
    /// Game-over stop signal: disables the spawner and freezes steering
    pub halt: bool,
}

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) {
    if input.halt {
        state.halt();
    }
    if let Some(target) = input.target {
        state.target = target;
    }

    state.time_ticks += 1;

    // Destruction first: fragments must exist before this tick's spawn and
    // steering queries run
    for hit in &input.destroyed {
        let Some(tier) = state.obstacle(hit.id).map(|o| o.tier) else {
            continue;
        };
        state.session.add_score(SCORE_PER_ROCK);
        state.session.obstacles_destroyed += 1;
        state.events.push(SimEvent::ObstacleDestroyed { id: hit.id, tier });
        fragment(state, hit.id, hit.hit_point, hit.hit_normal);
    }

    spawner::step(state);
    steering::step(state, dt);

    // Velocity integration with linear damping
    for obstacle in &mut state.obstacles {
        obstacle.pos += obstacle.vel * dt;
        obstacle.vel /= 1.0 + obstacle.drag * dt;
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::consts::{MAX_TIER, SIM_DT};

    fn test_config() -> SimConfig {
        let mut cfg = SimConfig::with_anchor_ring(6.0, 4);
        cfg.spawner.initial_delay = 0.1;
        cfg
    }

    fn run(state: &mut SimState, ticks: u64) {
        let input = TickInput::default();
        for _ in 0..ticks {
            tick(state, &input, SIM_DT);
        }
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed must evolve identically
        let mut a = SimState::new(99999, test_config());
        let mut b = SimState::new(99999, test_config());
        run(&mut a, 120);
        run(&mut b, 120);
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.obstacles, b.obstacles);

        // Including through a destruction event on the same obstacle
        let victim = a.obstacles[0].id;
        let input = TickInput {
            destroyed: vec![DestroyedObstacle {
                id: victim,
                hit_point: a.obstacles[0].pos,
                hit_normal: Vec3::Y,
            }],
            ..Default::default()
        };
        tick(&mut a, &input, SIM_DT);
        tick(&mut b, &input, SIM_DT);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.session, b.session);
    }

    #[test]
    fn test_destruction_scores_and_fragments() {
        let mut state = SimState::new(4, test_config());
        run(&mut state, 120);
        let victim = state
            .obstacles
            .iter()
            .find(|o| o.tier > 0)
            .expect("default variants spawn above tier 0");
        let (id, pos, tier) = (victim.id, victim.pos, victim.tier);
        let count_before = state.obstacles.len();

        state.drain_events();
        let input = TickInput {
            destroyed: vec![DestroyedObstacle {
                id,
                hit_point: pos,
                hit_normal: Vec3::Y,
            }],
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        assert_eq!(state.session.score, SCORE_PER_ROCK);
        assert_eq!(state.session.obstacles_destroyed, 1);
        assert!(state.obstacle(id).is_none());
        let events = state.drain_events();
        let frag = events
            .iter()
            .find_map(|e| match e {
                SimEvent::ObstacleFragmented { children, .. } => Some(*children),
                _ => None,
            })
            .expect("tier > 0 destruction must fragment");
        for child_id in frag {
            assert_eq!(state.obstacle(child_id).unwrap().tier, tier - 1);
        }
        // Exactly two children replace the one parent (minus any same-tick spawn)
        assert!(state.obstacles.len() >= count_before + 1);
    }

    #[test]
    fn test_tiers_stay_in_bounds_across_chained_splits() {
        let mut state = SimState::new(11, test_config());
        run(&mut state, 240);

        // Shoot everything repeatedly; tiers must only ever go down
        for _ in 0..6 {
            let targets: Vec<_> = state
                .obstacles
                .iter()
                .map(|o| DestroyedObstacle {
                    id: o.id,
                    hit_point: o.pos,
                    hit_normal: Vec3::Y,
                })
                .collect();
            let input = TickInput {
                destroyed: targets,
                ..Default::default()
            };
            tick(&mut state, &input, SIM_DT);
            for o in &state.obstacles {
                assert!(o.tier <= MAX_TIER);
            }
        }
    }

    #[test]
    fn test_halt_stops_spawner_and_freezes_steering() {
        let mut state = SimState::new(4, test_config());
        run(&mut state, 120);
        assert!(!state.obstacles.is_empty());

        let halt = TickInput {
            halt: true,
            ..Default::default()
        };
        tick(&mut state, &halt, SIM_DT);

        let count = state.obstacles.len();
        let positions: Vec<_> = state
            .obstacles
            .iter()
            .filter(|o| o.vel == Vec3::ZERO)
            .map(|o| (o.id, o.pos))
            .collect();
        run(&mut state, 120);

        assert_eq!(state.obstacles.len(), count, "no spawns after halt");
        for (id, pos) in positions {
            // Steered (velocity-free) obstacles are frozen, not removed
            assert_eq!(state.obstacle(id).unwrap().pos, pos);
        }
    }

    #[test]
    fn test_drifters_coast_under_drag() {
        let mut cfg = test_config();
        cfg.spawner.drift_chance = 1.0;
        let mut state = SimState::new(4, cfg);
        state.target = Vec3::new(0.0, 1.5, 0.0);
        run(&mut state, 120);

        let distances: Vec<_> = state
            .obstacles
            .iter()
            .map(|o| (o.id, o.pos.distance(state.target), o.vel.length()))
            .collect();
        run(&mut state, 60);
        for (id, dist, speed) in distances {
            let o = state.obstacle(id).unwrap();
            assert!(o.pos.distance(state.target) < dist, "drifter approaches");
            assert!(o.vel.length() < speed, "drag bleeds speed");
        }
    }

    #[test]
    fn test_target_update_flows_through() {
        let mut state = SimState::new(4, test_config());
        let input = TickInput {
            target: Some(Vec3::new(1.0, 2.0, 3.0)),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.target, Vec3::new(1.0, 2.0, 3.0));
    }
}
