//! Deterministic simulation module
//!
//! All field-population logic lives here. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by obstacle ID)
//! - No rendering or platform dependencies

pub mod fragment;
pub mod placement;
pub mod spawner;
pub mod state;
pub mod steering;
pub mod tick;

pub use fragment::{FragmentResult, fragment};
pub use placement::{is_clear, is_clear_excluding, nudge, overlap_sphere};
pub use spawner::{SpawnerPhase, SpawnerState};
pub use state::{MotionProfile, Obstacle, SessionContext, SimEvent, SimState, SCORE_PER_ROCK};
pub use tick::{DestroyedObstacle, TickInput, tick};
