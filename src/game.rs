//! Game loop controller
//!
//! Owns the run state, the pipe stream, and the RNG, and advances them
//! against caller-provided wall-clock timestamps. Ticks while not in
//! Countdown or Running never mutate state; clearing the phase is the sole
//! cancellation mechanism. The controller also applies the viewport void
//! override and drives the session reporter on run transitions.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::session::{LeaderboardApi, Reporter, ReporterEvent};
use crate::settings::Settings;
use crate::sim::difficulty;
use crate::sim::pipes::PipeStream;
use crate::sim::state::{GameEvent, RunPhase, RunSnapshot, RunState, Viewport};
use crate::sim::tick;

pub struct Game<A> {
    state: RunState,
    pipes: PipeStream,
    rng: Pcg32,
    reporter: Reporter<A>,
    settings: Settings,
    /// Timestamp of the previous tick; None means the next tick is a
    /// baseline and contributes dt = 0.
    last_time: Option<f64>,
    /// Events produced outside tick (impulses, void, countdown arm),
    /// delivered with the next tick's batch.
    pending: Vec<GameEvent>,
}

impl<A: LeaderboardApi + Clone + Send + 'static> Game<A> {
    pub fn new(settings: Settings, api: A, seed: u64) -> Self {
        log::info!("game created with seed {seed}");
        Self {
            state: RunState::idle(Viewport::default()),
            pipes: PipeStream::new(),
            rng: Pcg32::seed_from_u64(seed),
            reporter: Reporter::new(api),
            settings,
            last_time: None,
            pending: Vec::new(),
        }
    }

    /// Begin a run: reset state, rebuild the pipe stream, arm the
    /// countdown. Valid from Idle or Ended.
    pub fn start_run(&mut self, viewport: Viewport) {
        if self.state.phase == RunPhase::Countdown || self.state.phase == RunPhase::Running {
            log::warn!("start_run ignored: run already in progress");
            return;
        }
        self.state.start(viewport);
        self.pipes
            .reset(&viewport, self.state.bird_x, self.state.level(), &mut self.rng);
        self.reporter.reset_run();
        self.last_time = None;
        self.pending.clear();
        self.pending.push(GameEvent::CountdownTick(COUNTDOWN_TICKS));
        log::info!(
            "run starting: viewport {}x{} dpr {}",
            viewport.w,
            viewport.h,
            viewport.dpr
        );
    }

    /// Flap. Valid only while Running; uses the impulse of the level in
    /// effect at this instant.
    pub fn apply_impulse(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.state.bird.v = difficulty::jump_impulse(self.state.level());
        self.pending.push(GameEvent::ImpulseApplied);
    }

    /// Advance the game against a wall-clock timestamp in seconds.
    /// Returns the events this tick produced. A no-op (beyond delivering
    /// pending events) unless counting down or running.
    pub fn tick(&mut self, now_secs: f64) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut self.pending);
        if self.state.phase != RunPhase::Countdown && self.state.phase != RunPhase::Running {
            return events;
        }

        let dt = match self.last_time {
            Some(prev) => (now_secs - prev).max(0.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_secs);

        // Transitions already reported elsewhere (the void path) sit in the
        // pending prefix; only react to events generated this tick.
        let fresh = events.len();
        match self.state.phase {
            RunPhase::Countdown => self.tick_countdown(dt, &mut events),
            RunPhase::Running => {
                tick::step(&mut self.state, &mut self.pipes, &mut self.rng, dt, &mut events);
            }
            _ => {}
        }

        for event in &events[fresh..] {
            match *event {
                GameEvent::RunStarted => {
                    self.reporter.run_started(self.state.start_viewport);
                }
                GameEvent::RunEnded { voided } => {
                    let name = self.settings.display_name().to_string();
                    self.reporter
                        .run_ended(&name, self.state.score, self.state.viewport, voided);
                }
                _ => {}
            }
        }
        events
    }

    fn tick_countdown(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        self.state.countdown_accum += dt;
        while self.state.countdown_accum >= COUNTDOWN_TICK_SECS && self.state.countdown_left > 0 {
            self.state.countdown_accum -= COUNTDOWN_TICK_SECS;
            self.state.countdown_left -= 1;
            if self.state.countdown_left > 0 {
                events.push(GameEvent::CountdownTick(self.state.countdown_left));
            } else {
                self.state.phase = RunPhase::Running;
                events.push(GameEvent::RunStarted);
                break;
            }
        }
    }

    /// Report a viewport change. Shrinking any dimension or the pixel
    /// ratio below 85% of the start snapshot while running voids the run
    /// and suppresses score submission; any other change just updates the
    /// live bounds.
    pub fn notify_viewport(&mut self, viewport: Viewport) {
        if self.state.is_running() && viewport.violates(&self.state.start_viewport) {
            log::warn!("run voided: viewport shrink/zoom detected");
            self.state.voided = true;
            self.state.phase = RunPhase::Ended;
            self.pending.push(GameEvent::RunEnded { voided: true });
            let name = self.settings.display_name().to_string();
            self.reporter
                .run_ended(&name, self.state.score, viewport, true);
        } else {
            self.state.viewport = viewport;
        }
    }

    pub fn snapshot(&self) -> RunSnapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn pipes(&self) -> &PipeStream {
        &self.pipes
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Drain results from the session reporter. Non-blocking.
    pub fn poll_network(&mut self) -> Vec<ReporterEvent> {
        self.reporter.poll()
    }

    /// Wait for in-flight network calls. Shutdown paths only.
    pub fn shutdown(&mut self) {
        self.reporter.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ApiResult, ScoreSubmission, SubmitOutcome};
    use crate::leaderboard::LeaderboardEntry;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockApi {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockApi {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("mock lock").clone()
        }
    }

    impl LeaderboardApi for MockApi {
        fn start_session(&self, _viewport: &Viewport) -> ApiResult<String> {
            self.calls.lock().expect("mock lock").push("start".into());
            Ok("sess_1".to_string())
        }

        fn submit_score(&self, s: &ScoreSubmission) -> ApiResult<SubmitOutcome> {
            self.calls
                .lock()
                .expect("mock lock")
                .push(format!("submit:{}:{}", s.name, s.score));
            Ok(SubmitOutcome::Accepted)
        }

        fn fetch_leaderboard(&self) -> ApiResult<Vec<LeaderboardEntry>> {
            self.calls
                .lock()
                .expect("mock lock")
                .push("leaderboard".into());
            Ok(Vec::new())
        }

        fn request_commentary(&self, _prompt: &str) -> ApiResult<String> {
            self.calls.lock().expect("mock lock").push("ai".into());
            Ok(String::new())
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 720.0, 1.0)
    }

    fn game() -> (Game<MockApi>, MockApi) {
        let api = MockApi::default();
        (Game::new(Settings::default(), api.clone(), 99), api)
    }

    /// Tick through the countdown with 1s-spaced timestamps, returning the
    /// time of the last countdown tick.
    fn run_countdown(game: &mut Game<MockApi>) -> f64 {
        game.start_run(viewport());
        let mut now = 0.0;
        for _ in 0..=COUNTDOWN_TICKS {
            game.tick(now);
            now += 1.0;
        }
        assert!(game.snapshot().running);
        now - 1.0
    }

    #[test]
    fn countdown_counts_three_seconds() {
        let (mut game, _api) = game();
        game.start_run(viewport());

        let events = game.tick(10.0); // baseline, dt = 0
        assert_eq!(events, vec![GameEvent::CountdownTick(3)]);
        assert!(!game.snapshot().running);

        let events = game.tick(11.0);
        assert_eq!(events, vec![GameEvent::CountdownTick(2)]);
        let events = game.tick(12.0);
        assert_eq!(events, vec![GameEvent::CountdownTick(1)]);
        let events = game.tick(13.0);
        assert_eq!(events, vec![GameEvent::RunStarted]);
        assert!(game.snapshot().running);
    }

    #[test]
    fn idle_and_ended_ticks_are_noops() {
        let (mut game, _api) = game();
        assert!(game.tick(0.0).is_empty());
        assert!(game.tick(1.0).is_empty());
        assert_eq!(game.snapshot().score, 0);
    }

    #[test]
    fn first_tick_establishes_baseline() {
        let (mut game, _api) = game();
        game.start_run(viewport());
        // Huge first timestamp: it only establishes the baseline, dt = 0,
        // so the countdown does not advance.
        let events = game.tick(1.0e6);
        assert_eq!(events, vec![GameEvent::CountdownTick(3)]);
        let events = game.tick(1.0e6 + 1.0);
        assert_eq!(events, vec![GameEvent::CountdownTick(2)]);
    }

    #[test]
    fn impulse_only_while_running() {
        let (mut game, _api) = game();
        game.apply_impulse();
        assert!(game.tick(0.0).is_empty());

        run_countdown(&mut game);
        game.apply_impulse();
        assert_eq!(game.state().bird.v, difficulty::jump_impulse(0));
        let events = game.tick(100.0);
        assert!(events.contains(&GameEvent::ImpulseApplied));
    }

    #[test]
    fn floor_death_submits_exactly_once() {
        let (mut game, api) = game();
        let mut now = run_countdown(&mut game);

        // Let the bird fall to the floor
        let mut guard = 0;
        while !game.snapshot().ended {
            now += 1.0 / 60.0;
            game.tick(now);
            guard += 1;
            assert!(guard < 10_000, "bird never hit the floor");
        }
        game.shutdown();

        let calls = api.calls();
        let submits = calls.iter().filter(|c| c.starts_with("submit")).count();
        assert_eq!(submits, 1);
        assert!(calls.contains(&"leaderboard".to_string()));
        assert!(calls.contains(&"ai".to_string()));

        // Ticks after the end mutate nothing
        let score = game.snapshot().score;
        game.tick(now + 1.0);
        assert_eq!(game.snapshot().score, score);
    }

    #[test]
    fn shrink_voids_run_and_suppresses_submit() {
        let (mut game, api) = game();
        let mut now = run_countdown(&mut game);

        now += 1.0 / 60.0;
        game.tick(now);
        assert!(game.snapshot().running);

        // Shrink width below 85% of the start viewport
        game.notify_viewport(Viewport::new(1000.0, 720.0, 1.0));
        let snap = game.snapshot();
        assert!(snap.voided && snap.ended && !snap.running);

        let events = game.tick(now + 1.0 / 60.0);
        assert!(events.contains(&GameEvent::RunEnded { voided: true }));

        game.shutdown();
        let calls = api.calls();
        assert!(!calls.iter().any(|c| c.starts_with("submit")));
        assert!(calls.contains(&"leaderboard".to_string()));
        assert!(calls.contains(&"ai".to_string()));
    }

    #[test]
    fn growing_resize_updates_bounds_without_voiding() {
        let (mut game, _api) = game();
        run_countdown(&mut game);

        game.notify_viewport(Viewport::new(1920.0, 1080.0, 1.0));
        assert!(game.snapshot().running);
        assert_eq!(game.state().viewport.h, 1080.0);
        // The start snapshot and bird column are unchanged
        assert_eq!(game.state().start_viewport.w, 1280.0);
        assert_eq!(game.state().bird_x, 320.0);
    }

    #[test]
    fn session_opens_when_countdown_completes() {
        let (mut game, api) = game();
        run_countdown(&mut game);
        game.shutdown();
        assert!(api.calls().contains(&"start".to_string()));
    }

    #[test]
    fn restart_after_end_resets_state() {
        let (mut game, _api) = game();
        let mut now = run_countdown(&mut game);
        let mut guard = 0;
        while !game.snapshot().ended {
            now += 1.0 / 60.0;
            game.tick(now);
            guard += 1;
            assert!(guard < 10_000);
        }

        game.start_run(viewport());
        let snap = game.snapshot();
        assert!(!snap.ended && !snap.voided);
        assert_eq!(snap.score, 0);
        assert_eq!(game.state().phase, RunPhase::Countdown);
        assert_eq!(game.pipes().len(), (1280.0f32 / 420.0).ceil() as usize + 2);
    }

    #[test]
    fn start_run_ignored_mid_run() {
        let (mut game, _api) = game();
        run_countdown(&mut game);
        let bird = game.state().bird;
        game.start_run(Viewport::new(640.0, 480.0, 1.0));
        // Still the old run
        assert!(game.snapshot().running);
        assert_eq!(game.state().bird, bird);
        assert_eq!(game.state().start_viewport.w, 1280.0);
    }
}
