//! Cloud Hopper - simulation core of a Flappy-style browser arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (difficulty, pipe stream, physics, collision)
//! - `game`: Timestamp-driven game loop controller
//! - `session`: Fire-and-forget client for the leaderboard and commentary services
//! - `leaderboard`: Client-side model of the fetched leaderboard
//! - `settings`: Player preferences

pub mod game;
pub mod leaderboard;
pub mod session;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::Settings;

/// Game tuning constants
pub mod consts {
    /// Reference viewport height that gap scaling is normalized against
    pub const REFERENCE_HEIGHT: f32 = 900.0;
    /// Gap size at level 0 on a reference-height viewport
    pub const BASE_START_GAP: f32 = 220.0;
    /// Hard floor on gap size regardless of level
    pub const MIN_PIPE_GAP: f32 = 80.0;
    /// Horizontal pipe spacing at level 0
    pub const START_PIPE_SPACING: f32 = 420.0;
    /// Hard floor on pipe spacing
    pub const MIN_PIPE_SPACING: f32 = 90.0;
    /// Gap shrink per difficulty level
    pub const GAP_STEP: f32 = 12.0;
    /// Spacing shrink per difficulty level
    pub const SPACING_STEP: f32 = 20.0;

    /// Gravity at level 0 (velocity per reference frame)
    pub const BASE_GRAVITY: f32 = 0.25;
    pub const GRAVITY_STEP: f32 = 0.015;
    /// Gravity cap
    pub const MAX_GRAVITY: f32 = 0.7;
    /// Flap impulse at level 0 (negative = upward)
    pub const BASE_JUMP_IMPULSE: f32 = -5.5;
    pub const JUMP_IMPULSE_STEP: f32 = -0.15;
    /// Strongest flap impulse
    pub const MIN_JUMP_IMPULSE: f32 = -10.0;
    /// Scroll speed at level 0 (px per reference frame)
    pub const BASE_SCROLL_SPEED: f32 = 2.7;
    pub const SCROLL_SPEED_STEP: f32 = 0.12;

    /// Points per difficulty level
    pub const SCORE_PER_LEVEL: u32 = 500;

    /// Pipe body width in px
    pub const PIPE_WIDTH: f32 = 80.0;
    /// Horizontal lead of the first pipe ahead of the bird
    pub const FIRST_PIPE_OFFSET: f32 = 340.0;
    /// Gap centers stay this far from the top and bottom edges
    pub const GAP_EDGE_MARGIN: f32 = 80.0;
    /// Maximum gap-center jump between neighboring pipes on wide viewports
    pub const MAX_GAP_DELTA: f32 = 440.0;
    /// Viewports wider than this get the gap smoothness constraint
    pub const WIDE_VIEWPORT_WIDTH: f32 = 600.0;
    /// Gap draws before the smoothness constraint gives up
    pub const MAX_GAP_DRAWS: u32 = 10;

    /// Bird sprite nominal size
    pub const BIRD_WIDTH: f32 = 84.0;
    pub const BIRD_HEIGHT: f32 = 38.0;
    /// Collision box inset on every side of the sprite
    pub const COLLISION_MARGIN: f32 = 6.0;
    /// Ground band height at the bottom of the viewport
    pub const FLOOR_MARGIN: f32 = 30.0;

    /// Per-frame dt clamp in seconds (guards tab-suspend time jumps)
    pub const MAX_FRAME_DT: f32 = 0.04;
    /// Reference tick rate the physics constants are tuned for
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Countdown length in one-second ticks
    pub const COUNTDOWN_TICKS: u32 = 3;
    pub const COUNTDOWN_TICK_SECS: f32 = 1.0;
    /// Start-viewport shrink ratio below which a run is voided
    pub const SHRINK_THRESHOLD: f32 = 0.85;
}
