//! Cloud Hopper entry point
//!
//! Headless demo driver: exercises the full controller surface with
//! synthetic 60 fps timestamps and a naive autopilot. Run with
//! `RUST_LOG=info` for lifecycle logging; point `api_base` in
//! cloud-hopper.json at a server to submit the demo score.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use cloud_hopper::leaderboard::Leaderboard;
use cloud_hopper::session::{HttpApi, LeaderboardApi, NullApi, ReporterEvent};
use cloud_hopper::sim::state::{GameEvent, Viewport};
use cloud_hopper::{Game, Settings};

fn main() {
    env_logger::init();
    let settings_path = Path::new("cloud-hopper.json");
    let settings = Settings::load(settings_path);
    if !settings_path.exists() {
        settings.save(settings_path);
    }
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    log::info!("Cloud Hopper (headless demo) starting");
    match settings.api_base.clone() {
        Some(base) => run_demo(Game::new(settings, HttpApi::new(base), seed)),
        None => run_demo(Game::new(settings, NullApi, seed)),
    }
}

fn run_demo<A: LeaderboardApi + Clone + Send + 'static>(mut game: Game<A>) {
    let viewport = Viewport::new(1280.0, 720.0, 1.0);
    game.start_run(viewport);

    let dt = 1.0 / 60.0;
    let mut now = 0.0_f64;
    // The autopilot caps out after a few levels; ten minutes is plenty
    while now < 600.0 {
        for event in game.tick(now) {
            match event {
                GameEvent::CountdownTick(n) => println!("{n}..."),
                GameEvent::RunStarted => println!("go!"),
                GameEvent::ScoreChanged(score) if score % 10 == 0 => {
                    println!("score: {score}");
                }
                GameEvent::RunEnded { voided } => {
                    let tag = if voided { " (voided)" } else { "" };
                    println!("crashed at score {}{tag}", game.snapshot().score);
                }
                _ => {}
            }
        }
        drain_network(&mut game);
        if game.snapshot().ended {
            break;
        }
        if game.snapshot().running {
            autopilot(&mut game);
        }
        now += dt;
    }

    game.shutdown();
    drain_network(&mut game);
}

/// Flap whenever the bird is falling below the next gap center.
fn autopilot<A: LeaderboardApi + Clone + Send + 'static>(game: &mut Game<A>) {
    let (y, v, bird_x, center) = {
        let state = game.state();
        (
            state.bird.y,
            state.bird.v,
            state.bird_x,
            state.viewport.h / 2.0,
        )
    };
    let target = game
        .pipes()
        .iter()
        .find(|p| p.right() > bird_x - 36.0)
        .map(|p| p.gap_y)
        .unwrap_or(center);
    if y > target && v > 0.0 {
        game.apply_impulse();
    }
}

fn drain_network<A: LeaderboardApi + Clone + Send + 'static>(game: &mut Game<A>) {
    for event in game.poll_network() {
        match event {
            ReporterEvent::SessionStarted(id) => log::debug!("session {id}"),
            ReporterEvent::ScoreAccepted => println!("score accepted"),
            ReporterEvent::ScoreRejected(reason) => println!("score rejected: {reason}"),
            ReporterEvent::Leaderboard(entries) => {
                let board = Leaderboard::new(entries);
                if !board.is_empty() {
                    let rank = board.potential_rank(game.snapshot().score as i64);
                    println!("-- leaderboard (this run would rank #{rank}) --");
                    for (i, entry) in board.top(5).iter().enumerate() {
                        println!("{:>2}. {}  {}", i + 1, entry.name, entry.score);
                    }
                }
            }
            ReporterEvent::Commentary(text) => {
                if !text.is_empty() {
                    println!("\"{text}\"");
                }
            }
        }
    }
}
