// ABOUTME: Launch-time configuration for the simulation.
// ABOUTME: Fleet size, gate count, apron ceiling, and per-operation durations.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration supplied by the launcher at startup.
///
/// Nothing here changes at runtime. The apron ceiling caps how many planes
/// may hold a gate at once and may be smaller than the physical gate count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of gates in the pool.
    pub gates: u32,
    /// Number of planes in the fleet, numbered from 1.
    pub planes: u32,
    /// Maximum planes permitted on the ground simultaneously.
    pub apron_ceiling: usize,
    /// Delay between admission-loop ticks, in milliseconds.
    pub poll_interval_ms: u64,
    /// Bound on a plane's wait for the runway, in milliseconds.
    pub runway_timeout_ms: u64,
    /// Delay between consecutive plane starts, in milliseconds.
    pub arrival_stagger_ms: u64,
    /// Plane numbers that arrive as emergencies.
    pub emergency_planes: Vec<u32>,
    /// Fixed durations for each simulated operation.
    pub durations: OpDurations,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gates: 3,
            planes: 6,
            apron_ceiling: 3,
            poll_interval_ms: 100,
            runway_timeout_ms: 5000,
            arrival_stagger_ms: 1000,
            emergency_planes: Vec::new(),
            durations: OpDurations::default(),
        }
    }
}

impl SimConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn runway_timeout(&self) -> Duration {
        Duration::from_millis(self.runway_timeout_ms)
    }

    pub fn arrival_stagger(&self) -> Duration {
        Duration::from_millis(self.arrival_stagger_ms)
    }

    /// Whether the given plane number is designated an emergency arrival.
    pub fn is_emergency(&self, plane: u32) -> bool {
        self.emergency_planes.contains(&plane)
    }
}

/// Fixed operation durations, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct OpDurations {
    pub landing_ms: u64,
    pub coasting_ms: u64,
    pub docking_ms: u64,
    pub takeoff_ms: u64,
    pub disembark_ms: u64,
    pub embark_ms: u64,
    pub cleaning_ms: u64,
    pub resupply_ms: u64,
    pub refuelling_ms: u64,
}

impl Default for OpDurations {
    fn default() -> Self {
        Self {
            landing_ms: 1000,
            coasting_ms: 1000,
            docking_ms: 1000,
            takeoff_ms: 2000,
            disembark_ms: 3000,
            embark_ms: 3000,
            cleaning_ms: 3000,
            resupply_ms: 3000,
            refuelling_ms: 4000,
        }
    }
}

impl OpDurations {
    /// Every operation set to the same duration, handy for fast test profiles.
    pub fn uniform(ms: u64) -> Self {
        Self {
            landing_ms: ms,
            coasting_ms: ms,
            docking_ms: ms,
            takeoff_ms: ms,
            disembark_ms: ms,
            embark_ms: ms,
            cleaning_ms: ms,
            resupply_ms: ms,
            refuelling_ms: ms,
        }
    }

    pub fn landing(&self) -> Duration {
        Duration::from_millis(self.landing_ms)
    }

    pub fn coasting(&self) -> Duration {
        Duration::from_millis(self.coasting_ms)
    }

    pub fn docking(&self) -> Duration {
        Duration::from_millis(self.docking_ms)
    }

    pub fn takeoff(&self) -> Duration {
        Duration::from_millis(self.takeoff_ms)
    }

    pub fn disembark(&self) -> Duration {
        Duration::from_millis(self.disembark_ms)
    }

    pub fn embark(&self) -> Duration {
        Duration::from_millis(self.embark_ms)
    }

    pub fn cleaning(&self) -> Duration {
        Duration::from_millis(self.cleaning_ms)
    }

    pub fn resupply(&self) -> Duration {
        Duration::from_millis(self.resupply_ms)
    }

    pub fn refuelling(&self) -> Duration {
        Duration::from_millis(self.refuelling_ms)
    }
}
