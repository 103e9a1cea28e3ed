use std::time::Duration;

use crate::sessions::SessionRegistry;

pub async fn run(registry: &SessionRegistry, idle_timeout: Duration) {
    tracing::debug!("session_reaper: start");
    let reaped = registry.reap_idle(idle_timeout).await;
    if reaped > 0 {
        tracing::info!(
            reaped,
            idle_timeout_secs = idle_timeout.as_secs(),
            "session_reaper: dropped idle sessions"
        );
    } else {
        tracing::debug!("session_reaper: nothing to reap");
    }
}
