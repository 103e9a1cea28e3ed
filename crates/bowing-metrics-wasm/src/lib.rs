//! Browser bindings for the bowing-metrics engine.
//!
//! The pose detector runs in JavaScript; each video frame's landmarks are
//! handed over as one flat `Float64Array` and the metrics come back as plain
//! JS objects.
//!
//! ## Modules
//! - `landmarks`: flat array decoding
//! - `engine`: the `BowingEngine` wrapper exported to JS

pub mod engine;
pub mod landmarks;

pub use engine::BowingEngine;
pub use landmarks::{decode_frame, LANDMARK_STRIDE};
