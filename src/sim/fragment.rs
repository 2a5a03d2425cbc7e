//! Fragmentation engine
//!
//! On destruction an obstacle splits into exactly two half-scale children
//! thrown apart in the tangent plane of the hit. The parent leaves the pool
//! and the children enter it in one step, so no tick ever observes both as
//! live colliders. Unlike wave spawning, fragmentation never skips: if the
//! reposition budget runs out the children materialize anyway (flagged
//! `forced`) so destruction always has visible feedback.

use glam::Vec3;
use rand::Rng;

use super::placement;
use super::state::{MotionProfile, Obstacle, SimEvent, SimState};
use crate::config::ObstacleVariant;
use crate::consts::{
    CHILD_SPAWN_OFFSET, DEGENERATE_EPSILON_SQ, MIN_CHILD_MASS, REPOSITION_JITTER_RADIUS,
    SPLIT_NORMAL_POP,
};
use crate::{sample_in_unit_sphere, sample_unit_vector};

/// Outcome of a fragmentation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentResult {
    /// Parent removed (or already gone); nothing new entered the field
    NoChildren,
    /// Two children entered the live pool
    Children {
        ids: [u32; 2],
        /// At least one child exhausted its reposition budget and may
        /// overlap an existing obstacle
        forced: bool,
    },
}

/// The two opposite separation directions for a split, derived from the
/// hit normal: mostly tangential, with a small outward pop along the
/// normal so fragments leave the original travel line.
pub fn split_directions<R: Rng>(hit_normal: Vec3, rng: &mut R) -> (Vec3, Vec3) {
    let n = if hit_normal.length_squared() > DEGENERATE_EPSILON_SQ {
        hit_normal.normalize()
    } else {
        sample_unit_vector(rng)
    };
    let mut t1 = n.cross(Vec3::Y);
    if t1.length_squared() < DEGENERATE_EPSILON_SQ {
        t1 = n.cross(Vec3::X);
    }
    let t1 = t1.normalize();
    let dir_a = (t1 + n * SPLIT_NORMAL_POP).normalize();
    let dir_b = (-t1 + n * SPLIT_NORMAL_POP).normalize();
    (dir_a, dir_b)
}

/// Fragment the obstacle with the given id at a hit.
///
/// Removes the parent from the live pool and, if it is above tier 0 and a
/// child variant is configured, pushes two children built from the parent's
/// transform and inherited tunables. The hit point is accepted for
/// interface symmetry with the destruction event; only the normal shapes
/// the split.
pub fn fragment(
    state: &mut SimState,
    id: u32,
    _hit_point: Vec3,
    hit_normal: Vec3,
) -> FragmentResult {
    let Some(parent) = state.remove_obstacle(id) else {
        log::debug!("fragment request for unknown obstacle {id}");
        return FragmentResult::NoChildren;
    };

    if parent.tier == 0 {
        return FragmentResult::NoChildren;
    }
    let variant = parent
        .frag
        .child_variant
        .and_then(|i| state.config.variants.get(i).copied());
    let Some(variant) = variant else {
        log::warn!("obstacle {id} has no child variant configured; not splitting");
        return FragmentResult::NoChildren;
    };

    let (dir_a, dir_b) = split_directions(hit_normal, &mut state.rng);

    let (id_a, forced_a) = place_child(state, &parent, variant, dir_a);
    // The first child is already in the pool, so this clearance check sees it
    let (id_b, forced_b) = place_child(state, &parent, variant, dir_b);

    let result = FragmentResult::Children {
        ids: [id_a, id_b],
        forced: forced_a || forced_b,
    };
    state.events.push(SimEvent::ObstacleFragmented {
        parent: id,
        children: [id_a, id_b],
        forced: forced_a || forced_b,
    });
    result
}

/// Build one child offset from the parent along `dir` and push it into the
/// pool. Placement is best-effort: a handful of tiny nudges, then forced.
fn place_child(
    state: &mut SimState,
    parent: &Obstacle,
    variant: ObstacleVariant,
    dir: Vec3,
) -> (u32, bool) {
    let frag = parent.frag;

    // Start slightly offset so the pair doesn't stack on the parent's spot
    let mut pos = parent.pos + dir * CHILD_SPAWN_OFFSET;
    let mut forced = true;
    let mut tries = 0;
    loop {
        if placement::is_clear(&state.obstacles, pos, frag.spawn_clear_radius) {
            forced = false;
            break;
        }
        if tries >= frag.max_reposition_attempts {
            break;
        }
        pos += sample_in_unit_sphere(&mut state.rng) * REPOSITION_JITTER_RADIUS;
        tries += 1;
    }

    let scale = parent.scale * frag.child_scale_factor;
    let mean = (scale.x + scale.y + scale.z) / 3.0;
    let steering = state.config.steering;
    let speed = state.rng.random_range(steering.speed_min..=steering.speed_max);

    let id = state.next_entity_id();
    let mut child = Obstacle {
        id,
        pos,
        rot: parent.rot,
        scale,
        vel: Vec3::ZERO,
        mass: (parent.mass * frag.child_scale_factor).max(MIN_CHILD_MASS),
        drag: 0.0,
        radius: variant.base_radius * mean,
        tier: parent.tier.saturating_sub(1),
        variant: parent.frag.child_variant.unwrap_or(parent.variant),
        motion: MotionProfile::Steered { speed },
        frag,
    };

    let jitter = sample_in_unit_sphere(&mut state.rng) * frag.lateral_spread;
    child.apply_impulse((dir + jitter) * frag.split_impulse);

    state.obstacles.push(child);
    (id, forced)
}
