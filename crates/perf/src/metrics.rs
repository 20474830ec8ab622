//! Metrics collection for layout passes

use crate::timing::TimerCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

static GLOBAL_METRICS: OnceLock<Mutex<PerfMetrics>> = OnceLock::new();

/// Process-wide metrics collector
pub fn global_metrics() -> &'static Mutex<PerfMetrics> {
    GLOBAL_METRICS.get_or_init(|| Mutex::new(PerfMetrics::new()))
}

pub fn reset_global_metrics() {
    if let Ok(mut metrics) = global_metrics().lock() {
        metrics.reset();
    }
}

/// Collected timings and layout counters
#[derive(Debug, Clone)]
pub struct PerfMetrics {
    load_times: Vec<f64>,
    layout_times: Vec<f64>,
    export_times: Vec<f64>,
    general_times: HashMap<String, Vec<f64>>,
    /// Applied breaks, keyed by strategy name
    break_counts: HashMap<String, u64>,
    passes: u64,
    glyphs_placed: u64,
    connectors_drawn: u64,
    /// Samples kept per series
    max_samples: usize,
    enabled: bool,
}

impl PerfMetrics {
    pub fn new() -> Self {
        Self {
            load_times: Vec::new(),
            layout_times: Vec::new(),
            export_times: Vec::new(),
            general_times: HashMap::new(),
            break_counts: HashMap::new(),
            passes: 0,
            glyphs_placed: 0,
            connectors_drawn: 0,
            max_samples: 1000,
            enabled: true,
        }
    }

    pub fn with_max_samples(mut self, max: usize) -> Self {
        self.max_samples = max;
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a timing under its category
    pub fn record_timing(&mut self, name: &str, duration_ms: f64, category: TimerCategory) {
        if !self.enabled {
            return;
        }

        let max = self.max_samples;
        let series = match category {
            TimerCategory::Load => &mut self.load_times,
            TimerCategory::Layout => &mut self.layout_times,
            TimerCategory::Export => &mut self.export_times,
            TimerCategory::General => self.general_times.entry(name.to_string()).or_default(),
        };
        push_bounded(series, duration_ms, max);
    }

    /// Count one applied line break
    pub fn record_break(&mut self, strategy: &str) {
        if !self.enabled {
            return;
        }
        *self.break_counts.entry(strategy.to_string()).or_insert(0) += 1;
        tracing::trace!(target: "perf::layout", strategy, "break applied");
    }

    /// Count one finished layout pass
    pub fn record_pass(&mut self, glyphs: usize, connectors: usize) {
        if !self.enabled {
            return;
        }
        self.passes += 1;
        self.glyphs_placed += glyphs as u64;
        self.connectors_drawn += connectors as u64;
    }

    pub fn break_count(&self, strategy: &str) -> u64 {
        self.break_counts.get(strategy).copied().unwrap_or(0)
    }

    pub fn layout_times(&self) -> &[f64] {
        &self.layout_times
    }

    pub fn summary(&self) -> PerfSummary {
        PerfSummary {
            load_stats: TimingStats::from_samples(&self.load_times),
            layout_stats: TimingStats::from_samples(&self.layout_times),
            export_stats: TimingStats::from_samples(&self.export_times),
            general_stats: self
                .general_times
                .iter()
                .map(|(name, times)| (name.clone(), TimingStats::from_samples(times)))
                .collect(),
            break_counts: self.break_counts.clone(),
            passes: self.passes,
            glyphs_placed: self.glyphs_placed,
            connectors_drawn: self.connectors_drawn,
        }
    }

    pub fn reset(&mut self) {
        self.load_times.clear();
        self.layout_times.clear();
        self.export_times.clear();
        self.general_times.clear();
        self.break_counts.clear();
        self.passes = 0;
        self.glyphs_placed = 0;
        self.connectors_drawn = 0;
    }
}

impl Default for PerfMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn push_bounded(series: &mut Vec<f64>, value: f64, max: usize) {
    if series.len() >= max && !series.is_empty() {
        series.remove(0);
    }
    series.push(value);
}

/// Snapshot of collected metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfSummary {
    pub load_stats: TimingStats,
    pub layout_stats: TimingStats,
    pub export_stats: TimingStats,
    pub general_stats: HashMap<String, TimingStats>,
    pub break_counts: HashMap<String, u64>,
    pub passes: u64,
    pub glyphs_placed: u64,
    pub connectors_drawn: u64,
}

impl PerfSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Statistical summary of timing data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingStats {
    pub count: usize,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub median_ms: f64,
    /// 95th percentile in milliseconds
    pub p95_ms: f64,
    pub total_ms: f64,
}

impl TimingStats {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let count = samples.len();
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let total_ms: f64 = samples.iter().sum();
        let median_ms = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Self {
            count,
            min_ms: sorted[0],
            max_ms: sorted[count - 1],
            mean_ms: total_ms / count as f64,
            median_ms,
            p95_ms: percentile(&sorted, 95.0),
            total_ms,
        }
    }
}

/// Linear-interpolated percentile of sorted samples
fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        len => {
            let rank = (p / 100.0) * (len - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = (rank.ceil() as usize).min(len - 1);
            sorted[lower] + (rank - lower as f64) * (sorted[upper] - sorted[lower])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_timing_stats_from_samples() {
        let stats = TimingStats::from_samples(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.min_ms, 1.0);
        assert_eq!(stats.max_ms, 4.0);
        assert_eq!(stats.median_ms, 2.5);
        assert_eq!(stats.total_ms, 10.0);
    }

    #[test]
    fn test_timing_stats_empty() {
        let stats = TimingStats::from_samples(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean_ms, 0.0);
    }

    #[test]
    fn test_break_counts() {
        let mut metrics = PerfMetrics::new();
        metrics.record_break("word_wrap");
        metrics.record_break("word_wrap");
        metrics.record_break("hyphenation");

        assert_eq!(metrics.break_count("word_wrap"), 2);
        assert_eq!(metrics.break_count("hard_break"), 0);
        assert_eq!(metrics.summary().break_counts.len(), 2);
    }

    #[test]
    fn test_record_pass_totals() {
        let mut metrics = PerfMetrics::new();
        metrics.record_pass(10, 6);
        metrics.record_pass(5, 3);

        let summary = metrics.summary();
        assert_eq!(summary.passes, 2);
        assert_eq!(summary.glyphs_placed, 15);
        assert_eq!(summary.connectors_drawn, 9);
    }

    #[test]
    fn test_max_samples() {
        let mut metrics = PerfMetrics::new().with_max_samples(3);
        for i in 0..5 {
            metrics.record_timing("pass", i as f64, TimerCategory::Layout);
        }
        assert_eq!(metrics.layout_times(), &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_disabled_collects_nothing() {
        let mut metrics = PerfMetrics::new();
        metrics.set_enabled(false);
        metrics.record_timing("pass", 1.0, TimerCategory::Layout);
        metrics.record_break("hard_break");
        metrics.record_pass(1, 0);

        let summary = metrics.summary();
        assert_eq!(summary.layout_stats.count, 0);
        assert_eq!(summary.passes, 0);
        assert!(summary.break_counts.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut metrics = PerfMetrics::new();
        metrics.record_timing("catalog", 2.0, TimerCategory::Load);
        metrics.record_pass(3, 2);
        metrics.reset();
        assert_eq!(metrics.summary().load_stats.count, 0);
        assert_eq!(metrics.summary().passes, 0);
    }

    proptest! {
        #[test]
        fn prop_percentile_within_range(samples in prop::collection::vec(0.0f64..1000.0, 1..50)) {
            let stats = TimingStats::from_samples(&samples);
            prop_assert!(stats.p95_ms >= stats.min_ms && stats.p95_ms <= stats.max_ms);
            prop_assert!(stats.median_ms >= stats.min_ms && stats.median_ms <= stats.max_ms);
        }
    }
}
