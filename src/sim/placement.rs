//! Spatial placement service
//!
//! Sphere-overlap queries against the live obstacle pool, used by spawning,
//! fragmentation, and steering to keep obstacles from materializing or
//! moving into each other. Queries are brute force over the pool: the field
//! holds tens of obstacles, not thousands, and a scan keeps the service
//! trivially consistent with same-tick insertions.

use glam::Vec3;
use rand::Rng;

use super::state::Obstacle;
use crate::consts::{COINCIDENT_EPSILON_SQ, NUDGE_SCALE};
use crate::sample_unit_vector;

/// IDs of all obstacles whose collision sphere intersects the query sphere
pub fn overlap_sphere(obstacles: &[Obstacle], center: Vec3, radius: f32) -> Vec<u32> {
    obstacles
        .iter()
        .filter(|o| o.pos.distance_squared(center) < (radius + o.radius) * (radius + o.radius))
        .map(|o| o.id)
        .collect()
}

/// True iff no obstacle's collision sphere intersects the query sphere
pub fn is_clear(obstacles: &[Obstacle], point: Vec3, radius: f32) -> bool {
    !obstacles
        .iter()
        .any(|o| o.pos.distance_squared(point) < (radius + o.radius) * (radius + o.radius))
}

/// Like [`is_clear`], ignoring one obstacle (so a mover never blocks itself)
pub fn is_clear_excluding(
    obstacles: &[Obstacle],
    point: Vec3,
    radius: f32,
    exclude_id: u32,
) -> bool {
    !obstacles.iter().any(|o| {
        o.id != exclude_id
            && o.pos.distance_squared(point) < (radius + o.radius) * (radius + o.radius)
    })
}

/// Gentle separation: displace every obstacle within `radius` of `center`
/// directly away from it by `strength * NUDGE_SCALE`.
///
/// This is a positional correction, not an impulse, so it stays
/// deterministic and does not fight velocity integration. The just-created
/// obstacle (if any) is excluded. A neighbor sitting exactly at `center`
/// gets a random outward direction instead of a zero vector.
pub fn nudge<R: Rng>(
    obstacles: &mut [Obstacle],
    center: Vec3,
    radius: f32,
    strength: f32,
    exclude_id: Option<u32>,
    rng: &mut R,
) {
    let push = strength * NUDGE_SCALE;
    for obstacle in obstacles.iter_mut() {
        if exclude_id == Some(obstacle.id) {
            continue;
        }
        let offset = obstacle.pos - center;
        if offset.length_squared() >= radius * radius {
            continue;
        }
        let dir = if offset.length_squared() < COINCIDENT_EPSILON_SQ {
            sample_unit_vector(rng)
        } else {
            offset.normalize()
        };
        obstacle.pos += dir * push;
    }
}
