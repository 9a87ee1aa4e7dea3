//! Opt-in timing hooks for the screw pipeline.
//!
//! Timing is only collected when the `mesh_engine_metrics` feature is enabled
//! and the target is not WASM (`std::time::Instant` is unavailable there).
//! Otherwise every call compiles down to running the closure.
//!
//! # Usage
//!
//! ```ignore
//! use screw_engine::geom::{GeomMetrics, TimingBucket};
//!
//! let mut metrics = GeomMetrics::default();
//! metrics.begin();
//! let positions = metrics.time(TimingBucket::Sweep, || sweep_rings());
//! if let Some(report) = metrics.end() {
//!     println!("sweep: {} ns", report.sweep_ns);
//! }
//! ```

/// Pipeline stages that can be timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Winding profile sampling.
    Profile,
    /// Helix sweep (vertex generation and z-recentring).
    Sweep,
    /// Ring-to-ring face stitching.
    Stitch,
    /// N-gon and triangle caps.
    Caps,
    /// Coincident-vertex welding.
    Welding,
    /// Smooth flags and vertex normals.
    Shading,
    /// Topology counts for the diagnostics.
    Diagnostics,
}

/// Timing report with nanosecond precision per stage.
///
/// All fields are cumulative; repeated calls to the same bucket add up.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GeomTimingReport {
    pub profile_ns: u64,
    pub sweep_ns: u64,
    pub stitch_ns: u64,
    pub caps_ns: u64,
    pub welding_ns: u64,
    pub shading_ns: u64,
    pub diagnostics_ns: u64,
}

impl GeomTimingReport {
    /// Returns the total time across all buckets in nanoseconds.
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.profile_ns
            .saturating_add(self.sweep_ns)
            .saturating_add(self.stitch_ns)
            .saturating_add(self.caps_ns)
            .saturating_add(self.welding_ns)
            .saturating_add(self.shading_ns)
            .saturating_add(self.diagnostics_ns)
    }

    /// Returns the total time in milliseconds (for display purposes).
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for timing pipeline stages.
///
/// Call [`begin`](Self::begin) to reset, wrap stages with [`time`](Self::time)
/// and read the report with [`end`](Self::end).
#[derive(Debug, Default)]
pub struct GeomMetrics {
    #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
    report: GeomTimingReport,
}

impl GeomMetrics {
    /// Resets all timing counters to zero.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            self.report = GeomTimingReport::default();
        }
    }

    /// Returns the accumulated timing report, or `None` if metrics are disabled.
    #[must_use]
    pub fn end(&self) -> Option<GeomTimingReport> {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Times the execution of `f` and accumulates the elapsed time in `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos_u64 = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos_u64);
            result
        }

        #[cfg(not(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::Profile => &mut self.report.profile_ns,
            TimingBucket::Sweep => &mut self.report.sweep_ns,
            TimingBucket::Stitch => &mut self.report.stitch_ns,
            TimingBucket::Caps => &mut self.report.caps_ns,
            TimingBucket::Welding => &mut self.report.welding_ns,
            TimingBucket::Shading => &mut self.report.shading_ns,
            TimingBucket::Diagnostics => &mut self.report.diagnostics_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_report_total() {
        let report = GeomTimingReport {
            sweep_ns: 1000,
            stitch_ns: 2000,
            caps_ns: 3000,
            ..GeomTimingReport::default()
        };
        assert_eq!(report.total_ns(), 6000);
        assert!((report.total_ms() - 0.006).abs() < 1e-9);
    }

    #[test]
    fn test_time_returns_closure_result() {
        let mut metrics = GeomMetrics::default();
        metrics.begin();
        let result = metrics.time(TimingBucket::Sweep, || 42);
        assert_eq!(result, 42);
        let _ = metrics.end();
    }
}
