use axum::Router;
use tokio::sync::broadcast;

use bowing_coach::config::{Config, EngineEnvConfig, SessionLimits, WorkerConfig};
use bowing_coach::routes::build_router;
use bowing_coach::state::AppState;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
}

// Config is built directly; set_var would race across parallel tests.
fn test_config(max_sessions: usize) -> Config {
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        sessions: SessionLimits {
            max_sessions,
            idle_timeout_secs: 60,
        },
        worker: WorkerConfig {
            enabled: false,
            ..WorkerConfig::default()
        },
        engine: EngineEnvConfig::default(),
    }
}

fn spawn_with_config(config: Config) -> TestApp {
    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let state = AppState::new(&config, shutdown_tx);
    let app = build_router(state.clone());
    TestApp { app, state, config }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_with_config(test_config(16))
}

pub async fn spawn_test_app_with_limit(max_sessions: usize) -> TestApp {
    spawn_with_config(test_config(max_sessions))
}
