//! Lightweight timing and outcome counters for tracker cycles.
//!
//! Every cycle times its `scan` and `publish` sections and records how it
//! ended. The data is diagnostic only; nothing in the pipeline reads it back.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::info;

/// Statistics for a profiled section.
#[derive(Debug, Default, Clone)]
pub struct SectionStats {
    pub total_time: Duration,
    pub call_count: u64,
    pub min_time: Option<Duration>,
    pub max_time: Option<Duration>,
}

impl SectionStats {
    pub fn avg_time(&self) -> Duration {
        if self.call_count == 0 {
            Duration::ZERO
        } else {
            self.total_time / self.call_count as u32
        }
    }

    fn record(&mut self, elapsed: Duration) {
        self.total_time += elapsed;
        self.call_count += 1;
        self.min_time = Some(self.min_time.map_or(elapsed, |m| m.min(elapsed)));
        self.max_time = Some(self.max_time.map_or(elapsed, |m| m.max(elapsed)));
    }
}

/// How many cycles ended each way.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub published: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl OutcomeCounts {
    pub fn total(&self) -> u64 {
        self.published + self.skipped + self.failed
    }
}

#[derive(Debug, Default)]
pub struct CycleProfiler {
    sections: HashMap<&'static str, SectionStats>,
    outcomes: OutcomeCounts,
}

impl CycleProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time a section using a closure.
    pub fn time_section<F, R>(&mut self, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.sections.entry(name).or_default().record(start.elapsed());
        result
    }

    pub fn record_published(&mut self) {
        self.outcomes.published += 1;
    }

    pub fn record_skipped(&mut self) {
        self.outcomes.skipped += 1;
    }

    pub fn record_failed(&mut self) {
        self.outcomes.failed += 1;
    }

    pub fn outcomes(&self) -> OutcomeCounts {
        self.outcomes
    }

    pub fn get_section(&self, name: &str) -> Option<&SectionStats> {
        self.sections.get(name)
    }

    /// Emit one info event per section plus a totals line.
    pub fn log_summary(&self) {
        let mut sections: Vec<_> = self.sections.iter().collect();
        sections.sort_by(|a, b| b.1.total_time.cmp(&a.1.total_time));

        info!(
            cycles = self.outcomes.total(),
            published = self.outcomes.published,
            skipped = self.outcomes.skipped,
            failed = self.outcomes.failed,
            "tracker cycle summary"
        );
        for (name, stats) in sections {
            info!(
                section = *name,
                calls = stats.call_count,
                total = ?stats.total_time,
                avg = ?stats.avg_time(),
                min = ?stats.min_time.unwrap_or(Duration::ZERO),
                max = ?stats.max_time.unwrap_or(Duration::ZERO),
                "tracker section timing"
            );
        }
    }

    pub fn reset(&mut self) {
        self.sections.clear();
        self.outcomes = OutcomeCounts::default();
    }
}
