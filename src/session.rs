//! Session and score reporting against the external services
//!
//! The simulation never waits on the network. Every call here runs on a
//! short-lived worker thread; results come back through a channel drained
//! by `Reporter::poll`, and failures are logged and absorbed. The game
//! state machine is unaffected by any outcome in this module.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::leaderboard::LeaderboardEntry;
use crate::sim::state::Viewport;

pub type ApiResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Score submission payload, mirroring `POST /api/score`
#[derive(Debug, Clone, Serialize)]
pub struct ScoreSubmission {
    pub name: String,
    pub score: u32,
    pub session_id: Option<String>,
    pub viewport_w: u32,
    pub viewport_h: u32,
    pub dpr: f64,
}

/// Server verdict on a submission. Rejection is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected(String),
}

/// Contract with the leaderboard and commentary services
pub trait LeaderboardApi {
    /// `POST /api/start`: open a play session. Called once per run, when
    /// the countdown completes.
    fn start_session(&self, viewport: &Viewport) -> ApiResult<String>;

    /// `POST /api/score`: submit a finished run. Called exactly once per
    /// non-voided run.
    fn submit_score(&self, submission: &ScoreSubmission) -> ApiResult<SubmitOutcome>;

    /// `GET /api/leaderboard`: fetch the top entries.
    fn fetch_leaderboard(&self) -> ApiResult<Vec<LeaderboardEntry>>;

    /// `POST /api/ai`: ask for post-game commentary.
    fn request_commentary(&self, prompt: &str) -> ApiResult<String>;
}

/// HTTP implementation of the service contract
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    agent: ureq::Agent,
}

#[derive(Debug, Deserialize)]
struct StartResponse {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct CommentaryResponse {
    result: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();
        Self { base_url, agent }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl LeaderboardApi for HttpApi {
    fn start_session(&self, viewport: &Viewport) -> ApiResult<String> {
        let body = serde_json::json!({
            "w": viewport.w as u32,
            "h": viewport.h as u32,
            "dpr": viewport.dpr as f64,
        });
        let resp: StartResponse = self
            .agent
            .post(&self.url("/api/start"))
            .send_json(body)?
            .into_json()?;
        Ok(resp.session_id)
    }

    fn submit_score(&self, submission: &ScoreSubmission) -> ApiResult<SubmitOutcome> {
        match self.agent.post(&self.url("/api/score")).send_json(submission) {
            Ok(_) => Ok(SubmitOutcome::Accepted),
            // 4xx carries a JSON body with the rejection reason
            Err(ureq::Error::Status(_, resp)) => {
                let reason = resp
                    .into_json::<serde_json::Value>()
                    .ok()
                    .and_then(|v| v.get("reason").and_then(|r| r.as_str()).map(String::from))
                    .unwrap_or_else(|| "rejected".to_string());
                Ok(SubmitOutcome::Rejected(reason))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn fetch_leaderboard(&self) -> ApiResult<Vec<LeaderboardEntry>> {
        let entries: Vec<LeaderboardEntry> = self
            .agent
            .get(&self.url("/api/leaderboard"))
            .call()?
            .into_json()?;
        Ok(entries)
    }

    fn request_commentary(&self, prompt: &str) -> ApiResult<String> {
        let resp: CommentaryResponse = self
            .agent
            .post(&self.url("/api/ai"))
            .send_json(serde_json::json!({ "prompt": prompt }))?
            .into_json()?;
        Ok(resp.result)
    }
}

/// Offline stand-in: every call succeeds with an empty result.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullApi;

impl LeaderboardApi for NullApi {
    fn start_session(&self, _viewport: &Viewport) -> ApiResult<String> {
        Ok("offline".to_string())
    }

    fn submit_score(&self, _submission: &ScoreSubmission) -> ApiResult<SubmitOutcome> {
        Ok(SubmitOutcome::Accepted)
    }

    fn fetch_leaderboard(&self) -> ApiResult<Vec<LeaderboardEntry>> {
        Ok(Vec::new())
    }

    fn request_commentary(&self, _prompt: &str) -> ApiResult<String> {
        Ok(String::new())
    }
}

/// Results delivered back from worker threads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReporterEvent {
    SessionStarted(String),
    ScoreAccepted,
    ScoreRejected(String),
    Leaderboard(Vec<LeaderboardEntry>),
    Commentary(String),
}

/// Prompt sent to the commentary service after a run.
pub fn commentary_prompt(name: &str, score: u32) -> String {
    format!(
        "Player {name} scored {score} points in a cloud-hopping arcade game. \
         Give a short, fun, and witty comment (max 15 words)."
    )
}

/// Fire-and-forget reporter driving the service contract on run
/// transitions. Owns the session id and the submit-once guard.
pub struct Reporter<A> {
    api: A,
    tx: Sender<ReporterEvent>,
    rx: Receiver<ReporterEvent>,
    queued: Vec<ReporterEvent>,
    session_id: Option<String>,
    submitted: bool,
    handles: Vec<JoinHandle<()>>,
}

impl<A: LeaderboardApi + Clone + Send + 'static> Reporter<A> {
    pub fn new(api: A) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            api,
            tx,
            rx,
            queued: Vec::new(),
            session_id: None,
            submitted: false,
            handles: Vec::new(),
        }
    }

    /// Forget the previous run's session and submission state.
    pub fn reset_run(&mut self) {
        self.session_id = None;
        self.submitted = false;
    }

    /// Countdown finished: open a session. Gameplay starts regardless of
    /// whether this ever succeeds.
    pub fn run_started(&mut self, viewport: Viewport) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.spawn(move || match api.start_session(&viewport) {
            Ok(id) => {
                log::debug!("session opened: {id}");
                let _ = tx.send(ReporterEvent::SessionStarted(id));
            }
            Err(e) => log::warn!("session create failed: {e}"),
        });
    }

    /// Run terminated: submit the score (unless voided or already
    /// submitted), then fetch the leaderboard and request commentary.
    /// The latter two fire on every termination path.
    pub fn run_ended(&mut self, name: &str, score: u32, viewport: Viewport, voided: bool) {
        // Pick up a session id that may have arrived since the last poll
        self.drain_channel();

        if voided {
            log::info!("voided run, score submission suppressed");
        } else if !self.submitted {
            self.submitted = true;
            let submission = ScoreSubmission {
                name: name.to_string(),
                score,
                session_id: self.session_id.clone(),
                viewport_w: viewport.w as u32,
                viewport_h: viewport.h as u32,
                dpr: viewport.dpr as f64,
            };
            let api = self.api.clone();
            let tx = self.tx.clone();
            self.spawn(move || match api.submit_score(&submission) {
                Ok(SubmitOutcome::Accepted) => {
                    let _ = tx.send(ReporterEvent::ScoreAccepted);
                }
                Ok(SubmitOutcome::Rejected(reason)) => {
                    log::warn!("score rejected: {reason}");
                    let _ = tx.send(ReporterEvent::ScoreRejected(reason));
                }
                Err(e) => log::warn!("score submit failed: {e}"),
            });
        }

        let api = self.api.clone();
        let tx = self.tx.clone();
        self.spawn(move || match api.fetch_leaderboard() {
            Ok(entries) => {
                let _ = tx.send(ReporterEvent::Leaderboard(entries));
            }
            Err(e) => log::warn!("leaderboard fetch failed: {e}"),
        });

        let prompt = commentary_prompt(name, score);
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.spawn(move || match api.request_commentary(&prompt) {
            Ok(text) => {
                let _ = tx.send(ReporterEvent::Commentary(text));
            }
            Err(e) => log::warn!("commentary request failed: {e}"),
        });
    }

    /// Drain results that have arrived since the last call. Non-blocking.
    pub fn poll(&mut self) -> Vec<ReporterEvent> {
        self.drain_channel();
        self.handles.retain(|h| !h.is_finished());
        std::mem::take(&mut self.queued)
    }

    /// Wait for in-flight calls to finish. For shutdown paths only; the
    /// game loop never calls this.
    pub fn flush(&mut self) {
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
        self.drain_channel();
    }

    fn drain_channel(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            if let ReporterEvent::SessionStarted(id) = &event {
                self.session_id = Some(id.clone());
            }
            self.queued.push(event);
        }
    }

    fn spawn(&mut self, job: impl FnOnce() + Send + 'static) {
        self.handles.push(thread::spawn(job));
    }
}
