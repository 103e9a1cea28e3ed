pub mod session_reaper;
pub mod session_stats;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::WorkerConfig;
use crate::constants::SESSION_STATS_CRON;
use crate::sessions::SessionRegistry;

/// Timeout for individual worker invocations.
const WORKER_TIMEOUT: Duration = Duration::from_secs(60);

/// Drain period before scheduler shutdown to let in-flight jobs complete.
#[cfg(test)]
const DRAIN_TIMEOUT: Duration = Duration::from_millis(10);
#[cfg(not(test))]
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerName {
    SessionReaper,
    SessionStats,
}

impl WorkerName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionReaper => "session_reaper",
            Self::SessionStats => "session_stats",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub name: WorkerName,
    pub cron: String,
    pub enabled: bool,
}

pub struct WorkerManager {
    sessions: Arc<SessionRegistry>,
    shutdown_rx: broadcast::Receiver<()>,
    config: WorkerConfig,
    idle_timeout: Duration,
}

impl WorkerManager {
    pub fn new(
        sessions: Arc<SessionRegistry>,
        shutdown_rx: broadcast::Receiver<()>,
        config: &WorkerConfig,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            shutdown_rx,
            config: config.clone(),
            idle_timeout,
        }
    }

    /// Single source of truth for all planned jobs and their cron schedules.
    pub fn planned_jobs(&self) -> Vec<JobSpec> {
        if !self.config.enabled {
            return Vec::new();
        }

        vec![
            JobSpec {
                name: WorkerName::SessionReaper,
                cron: self.config.reaper_cron.clone(),
                enabled: true,
            },
            JobSpec {
                name: WorkerName::SessionStats,
                cron: SESSION_STATS_CRON.to_string(),
                enabled: true,
            },
        ]
    }

    /// Runs the scheduler until the shutdown broadcast fires.
    pub async fn start(mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.config.enabled {
            tracing::info!("Workers disabled; skipping worker startup");
            return Ok(());
        }

        let mut scheduler = JobScheduler::new().await?;
        self.register_jobs(&scheduler).await;
        scheduler.start().await?;

        tracing::info!("Worker manager started");
        let _ = self.shutdown_rx.recv().await;

        tracing::info!(
            drain_ms = DRAIN_TIMEOUT.as_millis() as u64,
            "Worker manager shutting down"
        );
        tokio::time::sleep(DRAIN_TIMEOUT).await;
        let _ = scheduler.shutdown().await;
        Ok(())
    }

    async fn register_jobs(&self, scheduler: &JobScheduler) {
        for spec in self.planned_jobs() {
            if !spec.enabled {
                tracing::info!(name = spec.name.as_str(), "Skipping disabled worker");
                continue;
            }

            let sessions = self.sessions.clone();
            let name_str = spec.name.as_str();

            match spec.name {
                WorkerName::SessionReaper => {
                    let idle_timeout = self.idle_timeout;
                    add_job(scheduler, &spec.cron, name_str, move || {
                        let sessions = sessions.clone();
                        async move {
                            session_reaper::run(&sessions, idle_timeout).await;
                        }
                    })
                    .await;
                }
                WorkerName::SessionStats => {
                    add_job(scheduler, &spec.cron, name_str, move || {
                        let sessions = sessions.clone();
                        async move {
                            session_stats::run(&sessions).await;
                        }
                    })
                    .await;
                }
            }
            tracing::info!(name = name_str, cron = %spec.cron, "Registered worker");
        }
    }
}

/// Add a job to the scheduler with an overlap guard and timeout wrapper.
async fn add_job<Fut, F>(scheduler: &JobScheduler, cron: &str, name: &'static str, mut run: F)
where
    F: FnMut() -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let running = Arc::new(AtomicBool::new(false));

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let guard = running.clone();

        if guard
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!(
                worker = name,
                "Skipping worker invocation: previous run still in progress"
            );
            return Box::pin(async {});
        }

        let fut = run();
        Box::pin(async move {
            if tokio::time::timeout(WORKER_TIMEOUT, fut).await.is_err() {
                tracing::error!(
                    worker = name,
                    timeout_secs = WORKER_TIMEOUT.as_secs(),
                    "Worker timed out"
                );
            }
            guard.store(false, Ordering::SeqCst);
        })
    });

    match job {
        Ok(job) => {
            if let Err(err) = scheduler.add(job).await {
                tracing::error!(error = %err, cron, worker = name, "Failed to add worker job");
            }
        }
        Err(err) => tracing::error!(error = %err, cron, worker = name, "Failed to create worker job"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(enabled: bool) -> (WorkerManager, broadcast::Sender<()>) {
        let (tx, _) = broadcast::channel(2);
        let config = WorkerConfig {
            enabled,
            ..WorkerConfig::default()
        };
        let manager = WorkerManager::new(
            Arc::new(SessionRegistry::new(4)),
            tx.subscribe(),
            &config,
            Duration::from_secs(60),
        );
        (manager, tx)
    }

    #[tokio::test]
    async fn disabled_workers_plan_nothing() {
        let (manager, _tx) = manager(false);
        assert!(manager.planned_jobs().is_empty());
        manager
            .start()
            .await
            .expect("disabled start should succeed");
    }

    #[tokio::test]
    async fn reaper_uses_configured_cron() {
        let (manager, _tx) = manager(true);
        let jobs = manager.planned_jobs();
        let reaper = jobs
            .iter()
            .find(|j| j.name == WorkerName::SessionReaper)
            .expect("reaper planned");
        assert_eq!(reaper.cron, crate::constants::DEFAULT_SESSION_REAPER_CRON);
        assert!(jobs.iter().all(|j| j.enabled));
    }

    #[test]
    fn all_worker_names_have_str() {
        for name in [WorkerName::SessionReaper, WorkerName::SessionStats] {
            assert!(!name.as_str().is_empty(), "{:?} has empty str", name);
        }
    }
}
