//! Timing utilities for performance measurement

use std::time::Instant;

/// A timer that measures elapsed time from creation to drop.
///
/// When the `telemetry` feature is enabled, the timer logs the elapsed time
/// and records it in the global metrics when dropped.
///
/// # Example
///
/// ```rust
/// use perf::PerfTimer;
///
/// fn load_fonts() {
///     let _timer = PerfTimer::load("fonts");
///     // ... read manifests ...
/// }
/// ```
pub struct PerfTimer {
    name: &'static str,
    start: Instant,
    #[cfg(feature = "telemetry")]
    category: TimerCategory,
}

/// Category of operation being timed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCategory {
    /// Reading glyph catalogs, rule files, and settings
    Load,
    /// One layout pass over a sheet
    Layout,
    /// Writing a sheet out as SVG
    Export,
    /// General/uncategorized timing
    General,
}

impl PerfTimer {
    /// Start an uncategorized timer
    #[inline]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
            #[cfg(feature = "telemetry")]
            category: TimerCategory::General,
        }
    }

    #[inline]
    #[cfg(feature = "telemetry")]
    pub fn with_category(name: &'static str, category: TimerCategory) -> Self {
        Self {
            name,
            start: Instant::now(),
            category,
        }
    }

    #[inline]
    #[cfg(not(feature = "telemetry"))]
    pub fn with_category(name: &'static str, _category: TimerCategory) -> Self {
        Self::new(name)
    }

    #[inline]
    pub fn load(name: &'static str) -> Self {
        Self::with_category(name, TimerCategory::Load)
    }

    #[inline]
    pub fn layout(name: &'static str) -> Self {
        Self::with_category(name, TimerCategory::Layout)
    }

    #[inline]
    pub fn export(name: &'static str) -> Self {
        Self::with_category(name, TimerCategory::Export)
    }

    /// Elapsed time in milliseconds
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    #[inline]
    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop the timer and return the elapsed milliseconds without recording.
    #[inline]
    pub fn stop(self) -> f64 {
        let elapsed = self.elapsed_ms();
        std::mem::forget(self);
        elapsed
    }
}

#[cfg(feature = "telemetry")]
impl Drop for PerfTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();

        tracing::trace!(
            target: "perf",
            name = self.name,
            elapsed_ms = elapsed_ms,
            "timer completed"
        );

        if let Ok(mut metrics) = crate::global_metrics().lock() {
            metrics.record_timing(self.name, elapsed_ms, self.category);
        }
    }
}

/// Time the rest of the enclosing scope.
///
/// ```rust
/// use perf::time_scope;
///
/// fn export_sheet() {
///     time_scope!("export");
///     // ... write svg ...
/// }
/// ```
#[macro_export]
macro_rules! time_scope {
    ($name:expr) => {
        let _timer = $crate::PerfTimer::new($name);
    };
    ($name:expr, $category:expr) => {
        let _timer = $crate::PerfTimer::with_category($name, $category);
    };
}
