//! Performance Telemetry for handwriting layout
//!
//! - RAII scope timers for catalog loading, layout passes, and SVG export
//! - A global collector for pass timings, break strategy usage, and glyph counts
//!
//! # Feature Flags
//!
//! - `telemetry` (default): Enables performance data collection
//!
//! # Example
//!
//! ```rust
//! use perf::{global_metrics, PerfTimer};
//!
//! fn lay_out_sheet() {
//!     let _timer = PerfTimer::layout("sheet");
//!     // ... place glyphs ...
//! }
//!
//! lay_out_sheet();
//! let summary = global_metrics().lock().unwrap().summary();
//! ```

mod timing;
mod metrics;

pub use timing::*;
pub use metrics::*;

/// Re-export for convenience
pub use std::time::{Duration, Instant};
