//! Bowing-motion metrics engine.
//!
//! Turns a stream of 2D body landmarks (one pose sample per video frame) into
//! smoothed bowing quality scores, a live coaching hint and, for fixed-length
//! diagnostic captures, an aggregated end-of-session report.
//!
//! ## Modules
//! - `geometry`: distance, three-point angle, EMA
//! - `straightness`: stroke segmentation and line-fit scoring
//! - `zone`: frog/middle/tip classification and usage distribution
//! - `elbow`: right elbow height relative to the shoulder
//! - `shoulder`: shoulder tension against a calibrated baseline
//! - `advice`: priority lookup of a single coaching hint
//! - `diagnostic`: capture log and aggregate report scoring
//! - `session`: the per-performer context object that owns all rolling state

pub mod advice;
pub mod config;
pub mod constants;
pub mod diagnostic;
pub mod elbow;
pub mod error;
pub mod geometry;
pub mod pose;
pub mod record;
pub mod session;
pub mod shoulder;
pub mod straightness;
pub mod trail;
pub mod zone;

pub use config::EngineConfig;
pub use diagnostic::{DiagnosticReport, SessionReport};
pub use error::EngineError;
pub use geometry::Point2D;
pub use pose::{Landmark, PoseFrame};
pub use record::{FrameOutcome, FrameOutput, MetricsRecord, SkipReason, Status};
pub use session::BowingSession;
