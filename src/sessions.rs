//! Hosted practice sessions.
//!
//! Each session wraps one [`BowingSession`] behind an async mutex. The registry
//! keeps its own monotonic clock (`tokio::time::Instant`) for capture countdowns
//! and idle tracking, so paused-time tests drive both.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bowing_metrics::diagnostic::DiagnosticReport;
use bowing_metrics::session::SessionStatus;
use bowing_metrics::{BowingSession, EngineConfig, EngineError, FrameOutcome, PoseFrame};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(Uuid),
    #[error("session limit of {0} reached")]
    LimitReached(usize),
    #[error("no diagnostic capture is running")]
    NoActiveCapture,
    #[error("no diagnostic report available yet")]
    NoReport,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type SharedEntry = Arc<Mutex<SessionEntry>>;

pub struct SessionEntry {
    id: Uuid,
    session: BowingSession,
    capture_timer: Option<JoinHandle<()>>,
    last_report: Option<DiagnosticReport>,
    created_at: DateTime<Utc>,
    last_active: Instant,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub idle_secs: u64,
    pub has_report: bool,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureStarted {
    pub started_at_ms: f64,
    pub duration_ms: f64,
}

impl SessionEntry {
    fn new(id: Uuid, config: EngineConfig) -> Self {
        Self {
            id,
            session: BowingSession::new(config),
            capture_timer: None,
            last_report: None,
            created_at: Utc::now(),
            last_active: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn session(&self) -> &BowingSession {
        &self.session
    }

    pub fn last_report(&self) -> Option<&DiagnosticReport> {
        self.last_report.as_ref()
    }

    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn view(&self, now_ms: f64) -> SessionView {
        SessionView {
            id: self.id,
            created_at: self.created_at,
            idle_secs: self.idle_for().as_secs(),
            has_report: self.last_report.is_some(),
            status: self.session.status(now_ms),
        }
    }

    pub fn process_frame(&mut self, frame: &PoseFrame) -> FrameOutcome {
        self.touch();
        self.session.process_frame(frame)
    }

    pub fn calibrate(&mut self) -> Result<f64, SessionError> {
        self.touch();
        Ok(self.session.calibrate()?)
    }

    /// Resets engine state and drops any running capture. The last completed
    /// report survives.
    pub fn reset(&mut self) {
        self.touch();
        self.abort_timer();
        self.session.reset();
    }

    pub fn cancel_capture(&mut self) -> bool {
        self.touch();
        self.abort_timer();
        self.session.cancel_capture()
    }

    pub fn finish_capture(&mut self) -> Result<DiagnosticReport, SessionError> {
        self.touch();
        self.abort_timer();
        let report = self
            .session
            .finish_capture()
            .ok_or(SessionError::NoActiveCapture)?;
        self.last_report = Some(report.clone());
        Ok(report)
    }

    fn abort_timer(&mut self) {
        if let Some(timer) = self.capture_timer.take() {
            timer.abort();
        }
    }
}

impl Drop for SessionEntry {
    fn drop(&mut self) {
        self.abort_timer();
    }
}

/// Starts a capture and arms the expiry timer that finishes it.
pub async fn start_capture(
    entry: &SharedEntry,
    now_ms: f64,
    duration_ms: f64,
) -> Result<CaptureStarted, SessionError> {
    let mut guard = entry.lock().await;
    guard.touch();
    guard.session.start_capture(now_ms, duration_ms)?;

    let weak = Arc::downgrade(entry);
    let timer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs_f64(duration_ms / 1000.0)).await;
        let Some(entry) = weak.upgrade() else {
            return;
        };
        let mut guard = entry.lock().await;
        guard.capture_timer = None;
        if let Some(report) = guard.session.finish_capture() {
            tracing::info!(session_id = %guard.id, "Diagnostic capture completed on timer");
            guard.last_report = Some(report);
        }
    });
    guard.capture_timer = Some(timer);

    Ok(CaptureStarted {
        started_at_ms: now_ms,
        duration_ms,
    })
}

pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SharedEntry>>,
    max_sessions: usize,
    epoch: Instant,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            epoch: Instant::now(),
        }
    }

    /// Milliseconds since the registry was created; the wall clock for capture windows.
    pub fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    pub async fn create(&self, config: EngineConfig) -> Result<SharedEntry, SessionError> {
        config.validate()?;
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            return Err(SessionError::LimitReached(self.max_sessions));
        }
        let id = Uuid::new_v4();
        let entry = Arc::new(Mutex::new(SessionEntry::new(id, config)));
        sessions.insert(id, entry.clone());
        tracing::info!(session_id = %id, active = sessions.len(), "Session created");
        Ok(entry)
    }

    pub async fn get(&self, id: Uuid) -> Result<SharedEntry, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        let entry = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or(SessionError::NotFound(id))?;
        entry.lock().await.abort_timer();
        tracing::info!(session_id = %id, "Session removed");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn capturing(&self) -> usize {
        let entries: Vec<SharedEntry> = self.sessions.read().await.values().cloned().collect();
        let mut count = 0;
        for entry in entries {
            if entry.lock().await.session.is_capturing() {
                count += 1;
            }
        }
        count
    }

    /// Drops sessions idle for at least `idle_timeout`. Returns how many went.
    pub async fn reap_idle(&self, idle_timeout: Duration) -> usize {
        let entries: Vec<(Uuid, SharedEntry)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, entry)| (*id, entry.clone()))
            .collect();

        let mut stale = Vec::new();
        for (id, entry) in entries {
            let mut guard = entry.lock().await;
            if guard.idle_for() >= idle_timeout {
                guard.abort_timer();
                stale.push(id);
            }
        }

        if stale.is_empty() {
            return 0;
        }
        let mut sessions = self.sessions.write().await;
        for id in &stale {
            sessions.remove(id);
        }
        stale.len()
    }
}
