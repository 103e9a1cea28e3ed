/// Maximum request body size: 1 MiB. A full 33-landmark frame is well under 4 KiB.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Maximum frames accepted by one batch request
pub const MAX_BATCH_FRAMES: usize = 600;

/// Default cap on concurrently hosted sessions
pub const DEFAULT_MAX_SESSIONS: usize = 256;

/// Sessions untouched for this long are dropped by the reaper (30 minutes)
pub const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 1800;

/// Reaper schedule: every minute, on the minute
pub const DEFAULT_SESSION_REAPER_CRON: &str = "0 * * * * *";

/// Session stats log line: every five minutes
pub const SESSION_STATS_CRON: &str = "0 */5 * * * *";

/// Default diagnostic capture length
pub const DEFAULT_DIAGNOSTIC_DURATION_SECS: f64 = 15.0;

/// Longest diagnostic capture a client may request
pub const DEFAULT_DIAGNOSTIC_MAX_DURATION_SECS: f64 = 120.0;
