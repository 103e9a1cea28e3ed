use crate::sessions::SessionRegistry;

pub async fn run(registry: &SessionRegistry) {
    let active = registry.len().await;
    let capturing = registry.capturing().await;
    tracing::info!(
        active,
        capturing,
        max = registry.max_sessions(),
        "session_stats"
    );
}
