//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time arrives as a parameter (clamped per-frame dt), never from a clock
//! - Seeded RNG only
//! - No rendering, network, or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod pipes;
pub mod state;
pub mod tick;

pub use collision::{Aabb, bird_box, bird_hits_pipe, hits_ceiling, hits_floor};
pub use pipes::{Pipe, PipeStream};
pub use state::{Bird, GameEvent, RunPhase, RunSnapshot, RunState, Viewport};
pub use tick::step;
