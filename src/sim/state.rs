//! Run state and core simulation types
//!
//! Everything the controller owns for one run lives here. No ambient
//! globals: the whole run is an explicit value.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use super::difficulty;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run in progress
    Idle,
    /// Start requested, counting down before physics begins
    Countdown,
    /// Active gameplay
    Running,
    /// Run ended (crash, floor/ceiling, or voided)
    Ended,
}

/// Bird kinematic state. Mutated once per frame by the physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Vertical position of the sprite center (px, down is positive)
    pub y: f32,
    /// Vertical velocity (px per reference frame)
    pub v: f32,
}

/// Viewport dimensions and pixel ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub w: f32,
    pub h: f32,
    pub dpr: f32,
}

impl Viewport {
    pub fn new(w: f32, h: f32, dpr: f32) -> Self {
        Self { w, h, dpr }
    }

    /// True when this viewport has shrunk below the void threshold
    /// relative to the one recorded at run start.
    pub fn violates(&self, start: &Viewport) -> bool {
        self.w < start.w * SHRINK_THRESHOLD
            || self.h < start.h * SHRINK_THRESHOLD
            || self.dpr < start.dpr * SHRINK_THRESHOLD
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Discrete simulation outputs. UI, haptics, and the session reporter
/// subscribe to these; the simulation itself never touches a platform API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Countdown second displayed (3, 2, 1)
    CountdownTick(u32),
    /// Countdown finished, physics is live
    RunStarted,
    /// A flap impulse was applied
    ImpulseApplied,
    /// Score total changed
    ScoreChanged(u32),
    /// Run terminated. `voided` runs must not submit a score.
    RunEnded { voided: bool },
}

/// Compact view of a run for UI glue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub score: u32,
    pub running: bool,
    pub ended: bool,
    pub voided: bool,
}

/// Complete state of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    pub score: u32,
    /// Set when viewport manipulation was detected; suppresses submission
    pub voided: bool,
    pub bird: Bird,
    /// Fixed horizontal position of the bird, set at run start
    pub bird_x: f32,
    /// Live viewport; floor and gap bounds follow resizes
    pub viewport: Viewport,
    /// Viewport recorded at run start, for the void check and submission
    pub start_viewport: Viewport,
    /// Fractional seconds not yet converted into points
    pub(crate) score_accum: f32,
    /// Whole countdown seconds remaining
    pub(crate) countdown_left: u32,
    /// Partial countdown second in progress
    pub(crate) countdown_accum: f32,
}

impl RunState {
    /// Idle state before the first run
    pub fn idle(viewport: Viewport) -> Self {
        Self {
            phase: RunPhase::Idle,
            score: 0,
            voided: false,
            bird: Bird::default(),
            bird_x: viewport.w / 4.0,
            viewport,
            start_viewport: viewport,
            score_accum: 0.0,
            countdown_left: 0,
            countdown_accum: 0.0,
        }
    }

    /// Reset for a fresh run: bird centered, score cleared, countdown armed.
    pub fn start(&mut self, viewport: Viewport) {
        self.phase = RunPhase::Countdown;
        self.score = 0;
        self.voided = false;
        self.bird = Bird {
            y: viewport.h / 2.0,
            v: 0.0,
        };
        self.bird_x = viewport.w / 4.0;
        self.viewport = viewport;
        self.start_viewport = viewport;
        self.score_accum = 0.0;
        self.countdown_left = COUNTDOWN_TICKS;
        self.countdown_accum = 0.0;
    }

    /// Difficulty level derived from the current score. Never stored.
    #[inline]
    pub fn level(&self) -> u32 {
        difficulty::level_for_score(self.score)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            score: self.score,
            running: self.phase == RunPhase::Running,
            ended: self.phase == RunPhase::Ended,
            voided: self.voided,
        }
    }
}
