use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{header, HeaderValue};
use bowing_coach::config::Config;
use bowing_coach::logging::{init_tracing, LogConfig};
use bowing_coach::routes::build_router;
use bowing_coach::state::AppState;
use bowing_coach::workers::WorkerManager;
use tokio::sync::broadcast;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&LogConfig::from(&config));
    tracing::info!(?config, "Starting bowing-coach");

    let engine_config = config.engine_config();
    if let Err(e) = engine_config.validate() {
        panic!("FATAL: invalid engine settings in environment: {e}");
    }

    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let state = AppState::new(&config, shutdown_tx.clone());

    let worker_manager = WorkerManager::new(
        state.sessions().clone(),
        shutdown_tx.subscribe(),
        &config.worker,
        Duration::from_secs(config.sessions.idle_timeout_secs),
    );
    let worker_handle = tokio::spawn(async move {
        if let Err(e) = worker_manager.start().await {
            tracing::error!(error = %e, "Worker manager failed");
        }
    });

    let app = build_router(state)
        .layer(build_cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(shutdown_tx));

    if let Err(e) = server.await {
        tracing::error!(error = %e, "HTTP server crashed");
    }

    match worker_handle.await {
        Err(e) => tracing::error!(error = %e, "Worker task panicked"),
        Ok(()) => tracing::info!("Worker manager exited"),
    }
    tracing::info!("Shutdown complete");
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origin.trim() == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_credentials(false)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_methods(Any);
    }

    match config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_methods(Any),
        Err(e) => panic!(
            "FATAL: Invalid CORS_ORIGIN '{}': {}. Fix the CORS_ORIGIN environment variable.",
            config.cors_origin, e
        ),
    }
}

async fn shutdown_signal(shutdown_tx: broadcast::Sender<()>) {
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = sigterm.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(());
}
