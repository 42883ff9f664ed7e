// ABOUTME: The plane agent state machine: request landing, land, ground ops, depart.
// ABOUTME: Suspends on tower clearances, runway acquisition, and station completions.

use std::time::{Duration, Instant};

use rand::Rng;

use super::PlaneId;
use super::passengers;
use crate::config::{OpDurations, SimConfig};
use crate::error::{AerodromeError, GateError, RunwayError, StationError, TowerError};
use crate::runway::RunwayMode;
use crate::sim::Airport;
use crate::tower::PlaneLink;

/// Where a plane is in its fixed lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneState {
    ArrivingForLanding,
    RunwayLanding,
    GroundOps,
    RunwayTakeoff,
    Departed,
}

impl std::fmt::Display for PlaneState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaneState::ArrivingForLanding => write!(f, "arriving for landing"),
            PlaneState::RunwayLanding => write!(f, "runway landing"),
            PlaneState::GroundOps => write!(f, "ground ops"),
            PlaneState::RunwayTakeoff => write!(f, "runway takeoff"),
            PlaneState::Departed => write!(f, "departed"),
        }
    }
}

/// One plane agent.
///
/// Drives the sequence request-landing, land, ground operations,
/// request-takeoff, depart. Each step that needs a scarce resource suspends
/// until the tower grants it through the plane's own [`PlaneLink`].
pub struct Plane {
    id: PlaneId,
    emergency: bool,
    link: PlaneLink,
    airport: Airport,
    timings: OpDurations,
    runway_timeout: Duration,
    state: PlaneState,
}

impl Plane {
    pub fn new(id: PlaneId, emergency: bool, airport: Airport, config: &SimConfig) -> Self {
        airport.stats.register_plane();
        Self {
            id,
            emergency,
            link: PlaneLink::new(id),
            airport,
            timings: config.durations,
            runway_timeout: config.runway_timeout(),
            state: PlaneState::ArrivingForLanding,
        }
    }

    pub fn id(&self) -> PlaneId {
        self.id
    }

    pub fn state(&self) -> PlaneState {
        self.state
    }

    /// Run the whole lifecycle. An error terminates only this plane's run.
    pub async fn run(mut self) -> Result<(), AerodromeError> {
        let landing_requested = Instant::now();
        self.log("Requesting landing permission...");
        self.airport.tower.request_landing(&self.link, self.emergency);
        self.link.clearance.wait().await;

        self.advance(PlaneState::RunwayLanding);
        let gate = self.land(landing_requested).await?;

        self.advance(PlaneState::GroundOps);
        self.ground_ops(gate).await?;

        self.advance(PlaneState::RunwayTakeoff);
        self.takeoff().await?;

        self.advance(PlaneState::Departed);
        self.log("Successfully departed");
        Ok(())
    }

    /// Land, taxi to the assigned gate, dock, and free the runway.
    async fn land(&mut self, requested: Instant) -> Result<u32, AerodromeError> {
        if self.emergency {
            // Already approved by the tower; seize the runway ahead of the queue.
            self.airport.runway.force_acquire(self.id).await;
        } else if !self
            .airport
            .runway
            .acquire(self.id, RunwayMode::Landing, self.runway_timeout)
            .await
        {
            return Err(RunwayError::AcquireTimeout {
                plane: self.id,
                mode: RunwayMode::Landing,
            }
            .into());
        }

        self.log("Landing...");
        tokio::time::sleep(self.timings.landing()).await;
        self.log("Landed");
        self.airport
            .stats
            .record_landing_wait(requested.elapsed().as_millis() as u64);

        let gate = self
            .airport
            .tower
            .gate_of(self.id)
            .ok_or(TowerError::NotAtGate { plane: self.id })?;
        self.log(&format!("Coasting to Gate-{gate}"));
        tokio::time::sleep(self.timings.coasting()).await;
        self.log(&format!("Starting docking procedure at Gate-{gate}"));
        tokio::time::sleep(self.timings.docking()).await;
        self.log(&format!("Docked at Gate-{gate}"));

        self.airport.runway.release(self.id)?;
        Ok(gate)
    }

    /// Fork-join ground schedule: disembark and refuelling run concurrently;
    /// cleaning waits for disembark, embark waits for refuelling (and for the
    /// cabin being cleaned and resupplied).
    async fn ground_ops(&self, gate: u32) -> Result<(), AerodromeError> {
        let idx = gate as usize - 1;
        let cleaning = self
            .airport
            .cleaning
            .get(idx)
            .ok_or(GateError::Unknown { gate })?;
        let resupply = self
            .airport
            .resupply
            .get(idx)
            .ok_or(GateError::Unknown { gate })?;

        let leaving = rand::thread_rng().gen_range(0..=50);
        let boarding = rand::thread_rng().gen_range(0..=50);

        let cabin = async {
            passengers::disembark(
                self.id,
                leaving,
                self.timings.disembark(),
                &self.airport.stats,
                &*self.airport.log,
            )
            .await;
            cleaning.submit(self.id).await?;
            resupply.submit(self.id).await?;
            Ok::<(), StationError>(())
        };
        let fuel = async {
            self.log("Request for refuelling");
            self.airport.refuelling.submit(self.id).await
        };
        tokio::try_join!(cabin, fuel)?;

        passengers::embark(
            self.id,
            boarding,
            self.timings.embark(),
            &self.airport.stats,
            &*self.airport.log,
        )
        .await;
        Ok(())
    }

    /// Take off and report the departure.
    async fn takeoff(&mut self) -> Result<(), AerodromeError> {
        let requested = Instant::now();
        self.log("Requesting takeoff permission");
        self.airport.tower.request_takeoff(&self.link);
        self.link.clearance.wait().await;

        self.log("Starting takeoff procedure...");
        if !self
            .airport
            .runway
            .acquire(self.id, RunwayMode::Takeoff, self.runway_timeout)
            .await
        {
            return Err(RunwayError::AcquireTimeout {
                plane: self.id,
                mode: RunwayMode::Takeoff,
            }
            .into());
        }
        tokio::time::sleep(self.timings.takeoff()).await;
        self.airport.runway.release(self.id)?;

        self.airport
            .stats
            .record_takeoff_wait(requested.elapsed().as_millis() as u64);
        self.airport.tower.plane_departed();
        Ok(())
    }

    fn advance(&mut self, state: PlaneState) {
        tracing::debug!(plane = %self.id, from = %self.state, to = %state, "state change");
        self.state = state;
    }

    fn log(&self, message: &str) {
        self.airport.log.line(&self.id.to_string(), message);
    }
}
