//! Per-frame simulation step
//!
//! Advances one frame of active gameplay. Integration is normalized to a
//! 60 fps reference tick so real elapsed time, not frame count, drives
//! motion; dt is clamped to guard against tab-suspend time jumps.

use rand::Rng;

use crate::consts::*;
use super::collision;
use super::difficulty;
use super::pipes::PipeStream;
use super::state::{GameEvent, RunPhase, RunState};

/// Advance the run by one frame of `dt` seconds. No-op unless Running.
///
/// Difficulty parameters are recomputed from the score-derived level on
/// every call, never cached, so they tighten the moment a level boundary
/// is crossed.
pub fn step<R: Rng>(
    state: &mut RunState,
    pipes: &mut PipeStream,
    rng: &mut R,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    if state.phase != RunPhase::Running {
        return;
    }
    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    let frames = dt * REFERENCE_FPS;

    let level = state.level();
    let gravity = difficulty::gravity(level);
    let scroll = difficulty::scroll_speed(level);

    state.bird.v += gravity * frames;
    state.bird.y += state.bird.v * frames;

    pipes.advance(scroll * frames);
    if pipes.recycle(&state.viewport, level, rng) {
        log::trace!("pipe recycled at level {level}");
    }

    let bird = collision::bird_box(state.bird_x, state.bird.y);
    let dead = collision::hits_floor(state.bird.y, state.viewport.h)
        || collision::hits_ceiling(state.bird.y)
        || pipes
            .iter()
            .any(|p| collision::bird_hits_pipe(&bird, p, state.viewport.h));
    if dead {
        state.phase = RunPhase::Ended;
        events.push(GameEvent::RunEnded {
            voided: state.voided,
        });
        log::info!("run ended at score {}", state.score);
        return;
    }

    // One point per whole second survived; the fractional remainder
    // carries across frames.
    state.score_accum += dt;
    if state.score_accum >= 1.0 {
        let whole = state.score_accum.floor();
        state.score += whole as u32;
        state.score_accum -= whole;
        events.push(GameEvent::ScoreChanged(state.score));
    }
}
