//! `readalong`: the time-synchronized transcript playback core.
//!
//! This crate provides:
//! - Timing-index construction from raw word-timing payloads (with repair)
//! - Pure playback-time → (paragraph, word) resolution
//! - Scroll arbitration between playback-driven scrolling and user gestures
//! - Seek/scrub handling where explicit user intent always wins
//!
//! The library is UI-free: it consumes playback times and gesture events and
//! emits resolved locations plus scroll requests for the rendering layer to
//! apply. Everything runs on one logical thread of control, and nothing here
//! throws across the interface boundary: anomalies degrade to a safe,
//! visible-but-inert state.

// High-level API (most consumers should start here).
pub mod policy;
pub mod session;

// Timing data structures and resolution.
pub mod index;
pub mod raw;
pub mod resolver;

// Scroll arbitration and its time source.
pub mod arbiter;
pub mod clock;

// Seams toward the rendering layer.
pub mod update_sink;
pub mod viewport;

// Output sinks that serialize updates.
pub mod json_lines_sink;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

mod error;

pub use error::{Error, Result};
