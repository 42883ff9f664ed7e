// ABOUTME: Statistics collaborator - monotonic counters and wait-time tallies.
// ABOUTME: Instance-owned atomics; renders the end-of-run summary on demand.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

/// Min/max/total tally for wait-time samples, in milliseconds.
struct WaitTally {
    total_ms: AtomicU64,
    min_ms: AtomicU64,
    max_ms: AtomicU64,
}

impl WaitTally {
    fn new() -> Self {
        Self {
            total_ms: AtomicU64::new(0),
            min_ms: AtomicU64::new(u64::MAX),
            max_ms: AtomicU64::new(0),
        }
    }

    fn record(&self, wait_ms: u64) {
        self.total_ms.fetch_add(wait_ms, Ordering::SeqCst);
        self.min_ms.fetch_min(wait_ms, Ordering::SeqCst);
        self.max_ms.fetch_max(wait_ms, Ordering::SeqCst);
    }
}

/// Run-wide counters shared by planes and passenger tasks.
///
/// Owned by the simulation and passed around behind an `Arc`; there is no
/// ambient global state.
pub struct Statistics {
    registered: AtomicU64,
    landed: AtomicU64,
    departed: AtomicU64,
    boarded: AtomicU64,
    disembarked: AtomicU64,
    landing_wait: WaitTally,
    takeoff_wait: WaitTally,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    pub fn new() -> Self {
        Self {
            registered: AtomicU64::new(0),
            landed: AtomicU64::new(0),
            departed: AtomicU64::new(0),
            boarded: AtomicU64::new(0),
            disembarked: AtomicU64::new(0),
            landing_wait: WaitTally::new(),
            takeoff_wait: WaitTally::new(),
        }
    }

    pub fn register_plane(&self) {
        self.registered.fetch_add(1, Ordering::SeqCst);
    }

    /// Record one landing along with how long the plane waited for it.
    pub fn record_landing_wait(&self, wait_ms: u64) {
        self.landed.fetch_add(1, Ordering::SeqCst);
        self.landing_wait.record(wait_ms);
    }

    /// Record one departure along with how long the plane waited for takeoff.
    pub fn record_takeoff_wait(&self, wait_ms: u64) {
        self.departed.fetch_add(1, Ordering::SeqCst);
        self.takeoff_wait.record(wait_ms);
    }

    pub fn record_passengers_boarded(&self, count: u32) {
        self.boarded.fetch_add(u64::from(count), Ordering::SeqCst);
    }

    pub fn record_passengers_disembarked(&self, count: u32) {
        self.disembarked.fetch_add(u64::from(count), Ordering::SeqCst);
    }

    pub fn planes_registered(&self) -> u64 {
        self.registered.load(Ordering::SeqCst)
    }

    pub fn planes_landed(&self) -> u64 {
        self.landed.load(Ordering::SeqCst)
    }

    pub fn planes_departed(&self) -> u64 {
        self.departed.load(Ordering::SeqCst)
    }

    /// Render the formatted end-of-run summary.
    pub fn summary(&self) -> String {
        let landed = self.landed.load(Ordering::SeqCst);
        let departed = self.departed.load(Ordering::SeqCst);

        let mut out = String::new();
        out.push_str("===== Airport Statistics =====\n");
        let _ = writeln!(
            out,
            "Total Planes Registered: {}",
            self.registered.load(Ordering::SeqCst)
        );
        let _ = writeln!(out, "Planes Landed: {}", landed);
        let _ = writeln!(out, "Planes Departed: {}", departed);
        let _ = writeln!(
            out,
            "Total Passengers Boarded: {}",
            self.boarded.load(Ordering::SeqCst)
        );
        let _ = writeln!(
            out,
            "Total Passengers Disembarked: {}",
            self.disembarked.load(Ordering::SeqCst)
        );

        if landed > 0 {
            out.push_str("\n--- Landing Wait Times (seconds) ---\n");
            Self::render_tally(&mut out, &self.landing_wait, landed);
        }
        if departed > 0 {
            out.push_str("\n--- Takeoff Wait Times (seconds) ---\n");
            Self::render_tally(&mut out, &self.takeoff_wait, departed);
        }

        out.push_str("==============================");
        out
    }

    fn render_tally(out: &mut String, tally: &WaitTally, samples: u64) {
        let total = tally.total_ms.load(Ordering::SeqCst);
        let min = tally.min_ms.load(Ordering::SeqCst);
        let max = tally.max_ms.load(Ordering::SeqCst);
        let avg = total as f64 / 1000.0 / samples as f64;
        let _ = writeln!(out, "Min: {:.2}", min as f64 / 1000.0);
        let _ = writeln!(out, "Max: {:.2}", max as f64 / 1000.0);
        let _ = writeln!(out, "Avg: {:.2}", avg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let stats = Statistics::new();
        stats.register_plane();
        stats.register_plane();
        stats.record_landing_wait(500);
        stats.record_passengers_boarded(12);
        stats.record_passengers_disembarked(7);

        assert_eq!(stats.planes_registered(), 2);
        assert_eq!(stats.planes_landed(), 1);
        assert_eq!(stats.planes_departed(), 0);
    }

    #[test]
    fn test_summary_reports_wait_extremes() {
        let stats = Statistics::new();
        stats.record_landing_wait(1000);
        stats.record_landing_wait(3000);

        let summary = stats.summary();
        assert!(summary.contains("Planes Landed: 2"));
        assert!(summary.contains("Min: 1.00"));
        assert!(summary.contains("Max: 3.00"));
        assert!(summary.contains("Avg: 2.00"));
        // No departures yet, so no takeoff section.
        assert!(!summary.contains("Takeoff Wait Times"));
    }
}
