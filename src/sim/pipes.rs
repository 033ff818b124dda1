//! Pipe stream generation and recycling
//!
//! Maintains an ordered sequence of pipes covering the visible width plus a
//! lookahead buffer. Gap centers are drawn uniformly, with a bounded-retry
//! smoothness constraint on wide viewports so consecutive gaps stay
//! reachable. The retry cap is an approximation policy, not an error: after
//! ten draws the last candidate is accepted as-is.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use super::difficulty;
use super::state::Viewport;

/// A pipe pair obstacle. Difficulty parameters are frozen at creation time;
/// new pipes pick up the level in effect when they are appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge x-position (px, scrolls toward negative)
    pub x: f32,
    /// Vertical center of the gap
    pub gap_y: f32,
    /// Gap size at creation
    pub gap: f32,
    /// Distance to the previous pipe at creation
    pub spacing: f32,
    /// Difficulty level at creation
    pub level: u32,
}

impl Pipe {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + PIPE_WIDTH
    }

    /// Top edge of the gap
    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.gap_y - self.gap / 2.0
    }

    /// Bottom edge of the gap
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_y + self.gap / 2.0
    }
}

/// Ordered pipe sequence: front = leftmost = oldest.
#[derive(Debug, Clone, Default)]
pub struct PipeStream {
    pipes: VecDeque<Pipe>,
}

impl PipeStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the stream for a fresh run.
    ///
    /// Covers the viewport width plus two pipes of lookahead. The first pipe
    /// sits a fixed lead ahead of the bird with its gap at the vertical
    /// center, so every run opens fair.
    pub fn reset<R: Rng>(&mut self, viewport: &Viewport, bird_x: f32, level: u32, rng: &mut R) {
        self.pipes.clear();
        let spacing = difficulty::spacing(level);
        let gap = difficulty::gap(level, viewport.h);
        let num_pipes = (viewport.w / spacing).ceil() as usize + 2;
        let first_x = bird_x + FIRST_PIPE_OFFSET;

        let mut last_gap_y = None;
        for i in 0..num_pipes {
            let gap_y = if i == 0 {
                viewport.h / 2.0
            } else {
                draw_gap_y(viewport, last_gap_y, rng)
            };
            last_gap_y = Some(gap_y);
            self.pipes.push_back(Pipe {
                x: first_x + i as f32 * spacing,
                gap_y,
                gap,
                spacing,
                level,
            });
        }
        log::debug!(
            "pipe stream reset: {} pipes, spacing {spacing}, gap {gap}",
            self.pipes.len()
        );
    }

    /// Scroll every pipe left by `dx`.
    pub fn advance(&mut self, dx: f32) {
        for pipe in &mut self.pipes {
            pipe.x -= dx;
        }
    }

    /// Drop the front pipe once it is fully off the trailing edge and append
    /// a replacement behind the back pipe, parameterized by the *current*
    /// level. At most one pipe is recycled per call. Returns whether a
    /// recycle happened.
    pub fn recycle<R: Rng>(&mut self, viewport: &Viewport, level: u32, rng: &mut R) -> bool {
        match self.pipes.front() {
            Some(front) if front.x < -PIPE_WIDTH => {}
            _ => return false,
        }
        self.pipes.pop_front();
        let Some(back) = self.pipes.back() else {
            return false;
        };
        let spacing = difficulty::spacing(level);
        let gap_y = draw_gap_y(viewport, Some(back.gap_y), rng);
        let pipe = Pipe {
            x: back.x + spacing,
            gap_y,
            gap: difficulty::gap(level, viewport.h),
            spacing,
            level,
        };
        self.pipes.push_back(pipe);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    pub fn front(&self) -> Option<&Pipe> {
        self.pipes.front()
    }

    pub fn back(&self) -> Option<&Pipe> {
        self.pipes.back()
    }
}

/// Draw a gap center in `[margin, viewport_h - margin]`.
///
/// On wide viewports the draw is rejected and retried while it lands more
/// than `MAX_GAP_DELTA` from the previous gap, up to `MAX_GAP_DRAWS` draws
/// total; the final draw is accepted unconditionally. Narrow viewports are
/// unconstrained (the delta bound equals the viewport height, which no two
/// in-range centers can exceed).
fn draw_gap_y<R: Rng>(viewport: &Viewport, last_gap_y: Option<f32>, rng: &mut R) -> f32 {
    let min_y = GAP_EDGE_MARGIN;
    let max_y = (viewport.h - GAP_EDGE_MARGIN).max(min_y);
    let max_delta = if viewport.w > WIDE_VIEWPORT_WIDTH {
        MAX_GAP_DELTA
    } else {
        viewport.h
    };

    let mut gap_y = rng.random_range(min_y..=max_y);
    if let Some(last) = last_gap_y {
        let mut draws = 1;
        while (gap_y - last).abs() > max_delta && draws < MAX_GAP_DRAWS {
            gap_y = rng.random_range(min_y..=max_y);
            draws += 1;
        }
    }
    gap_y
}
