//! Lightweight performance timing utilities.
//!
//! Timing is off unless enabled programmatically or through the
//! `RO_TIMING` environment variable. Reports go to stderr so they never mix
//! with data written to stdout.

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable performance timing globally.
pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

/// Check if timing is enabled.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var("RO_TIMING").is_ok()
}

/// A simple timer that measures elapsed time.
pub struct Timer {
    label: &'static str,
    start: Instant,
    enabled: bool,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
            enabled: is_enabled(),
        }
    }

    /// Stop the timer and return elapsed time in seconds.
    /// If timing is disabled, returns None.
    pub fn stop(self) -> Option<f64> {
        if self.enabled {
            Some(self.start.elapsed().as_secs_f64())
        } else {
            None
        }
    }

    /// Stop the timer and report to stderr if enabled.
    pub fn stop_and_print(self) {
        // stderr write errors are ignored
        let _ = self.stop_and_write(&mut std::io::stderr());
    }

    /// Stop the timer and write a `[TIMING]` line to `out` if enabled.
    pub fn stop_and_write<W: Write>(self, out: &mut W) -> std::io::Result<()> {
        let label = self.label;
        match self.stop() {
            Some(elapsed) => writeln!(out, "[TIMING] {}: {:.3}s", label, elapsed),
            None => Ok(()),
        }
    }
}

/// Counter of calls with accumulated wall-clock time.
///
/// Calls are always counted; durations only when timing is enabled.
pub struct CallCounter {
    total_ns: AtomicU64,
    count: AtomicU64,
}

impl Default for CallCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl CallCounter {
    pub const fn new() -> Self {
        Self {
            total_ns: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Register one call, returning the running call count.
    pub fn hit(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Add a measured duration to the total.
    pub fn record(&self, duration_s: f64) {
        let nanos = (duration_s * 1e9) as u64;
        self.total_ns.fetch_add(nanos, Ordering::Relaxed);
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_ns.load(Ordering::Relaxed) as f64 / 1e9
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn average_seconds(&self) -> f64 {
        let count = self.count();
        if count > 0 {
            self.total_seconds() / count as f64
        } else {
            0.0
        }
    }

    pub fn reset(&self) {
        self.total_ns.store(0, Ordering::Relaxed);
        self.count.store(0, Ordering::Relaxed);
    }

    /// Print a one-line summary to stderr if timing is enabled.
    pub fn print_summary(&self, label: &str) {
        if !is_enabled() || self.count() == 0 {
            return;
        }
        eprintln!(
            "[TIMING] {}: {} calls, {:.3}s total, {:.4}ms avg",
            label,
            self.count(),
            self.total_seconds(),
            self.average_seconds() * 1000.0
        );
    }
}
