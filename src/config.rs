use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use bowing_metrics::EngineConfig;

use crate::constants::{
    DEFAULT_DIAGNOSTIC_DURATION_SECS, DEFAULT_DIAGNOSTIC_MAX_DURATION_SECS, DEFAULT_MAX_SESSIONS,
    DEFAULT_SESSION_IDLE_TIMEOUT_SECS, DEFAULT_SESSION_REAPER_CRON,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub sessions: SessionLimits,
    pub worker: WorkerConfig,
    pub engine: EngineEnvConfig,
}

#[derive(Debug, Clone)]
pub struct SessionLimits {
    pub max_sessions: usize,
    pub idle_timeout_secs: u64,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
            idle_timeout_secs: DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub enabled: bool,
    pub reaper_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reaper_cron: DEFAULT_SESSION_REAPER_CRON.to_string(),
        }
    }
}

/// Engine knobs exposed through the environment. Everything else keeps the
/// engine defaults and can be overridden per session in the create request.
#[derive(Debug, Clone)]
pub struct EngineEnvConfig {
    pub smoothing_alpha: f64,
    pub min_landmark_visibility: f64,
    pub diagnostic_duration_secs: f64,
    pub diagnostic_max_duration_secs: f64,
}

impl Default for EngineEnvConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            smoothing_alpha: engine.smoothing.alpha,
            min_landmark_visibility: engine.pose.min_visibility,
            diagnostic_duration_secs: DEFAULT_DIAGNOSTIC_DURATION_SECS,
            diagnostic_max_duration_secs: DEFAULT_DIAGNOSTIC_MAX_DURATION_SECS,
        }
    }
}

impl EngineEnvConfig {
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.smoothing.alpha = self.smoothing_alpha;
        config.pose.min_visibility = self.min_landmark_visibility;
        config.diagnostic.default_duration_ms = self.diagnostic_duration_secs * 1000.0;
        config.diagnostic.max_duration_ms = self.diagnostic_max_duration_secs * 1000.0;
        config
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = EngineEnvConfig::default();
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            sessions: SessionLimits {
                max_sessions: env_or_parse("MAX_SESSIONS", DEFAULT_MAX_SESSIONS),
                idle_timeout_secs: env_or_parse(
                    "SESSION_IDLE_TIMEOUT_SECS",
                    DEFAULT_SESSION_IDLE_TIMEOUT_SECS,
                ),
            },
            worker: WorkerConfig {
                enabled: env_or_bool("WORKER_ENABLED", true),
                reaper_cron: env_or("SESSION_REAPER_CRON", DEFAULT_SESSION_REAPER_CRON),
            },
            engine: EngineEnvConfig {
                smoothing_alpha: env_or_parse("SMOOTHING_ALPHA", defaults.smoothing_alpha),
                min_landmark_visibility: env_or_parse(
                    "MIN_LANDMARK_VISIBILITY",
                    defaults.min_landmark_visibility,
                ),
                diagnostic_duration_secs: env_or_parse(
                    "DIAGNOSTIC_DURATION_SECS",
                    defaults.diagnostic_duration_secs,
                ),
                diagnostic_max_duration_secs: env_or_parse(
                    "DIAGNOSTIC_MAX_DURATION_SECS",
                    defaults.diagnostic_max_duration_secs,
                ),
            },
        }
    }

    /// Engine config shared by sessions created without an override.
    pub fn engine_config(&self) -> EngineConfig {
        self.engine.engine_config()
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Failed to parse env var, using default");
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
