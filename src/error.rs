// ABOUTME: Defines all error types for the aerodrome library using thiserror.
// ABOUTME: Each subsystem has its own error enum, unified under AerodromeError.

use crate::plane::PlaneId;
use crate::runway::RunwayMode;

/// Top-level error type for the aerodrome library.
#[derive(Debug, thiserror::Error)]
pub enum AerodromeError {
    #[error("runway error: {0}")]
    Runway(#[from] RunwayError),

    #[error("gate error: {0}")]
    Gate(#[from] GateError),

    #[error("tower error: {0}")]
    Tower(#[from] TowerError),

    #[error("station error: {0}")]
    Station(#[from] StationError),
}

/// Errors from runway operations.
///
/// A timeout terminates the affected plane's run; it is never silently
/// retried, since the tower has already serialized occupancy.
#[derive(Debug, thiserror::Error)]
pub enum RunwayError {
    #[error("{plane} timed out waiting for the runway ({mode})")]
    AcquireTimeout { plane: PlaneId, mode: RunwayMode },

    #[error("{plane} released the runway without holding it")]
    NotHolder { plane: PlaneId },
}

/// State-conflict errors from the gate pool.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Gate-{gate} is already occupied by {occupant}")]
    AlreadyOccupied { gate: u32, occupant: PlaneId },

    #[error("Gate-{gate} is not occupied")]
    Vacant { gate: u32 },

    #[error("Gate-{gate} does not exist")]
    Unknown { gate: u32 },
}

/// Errors raised inside the tower's admission step.
///
/// These indicate a violated invariant and abort the whole run.
#[derive(Debug, thiserror::Error)]
pub enum TowerError {
    #[error("gate conflict during admission: {0}")]
    Gate(#[from] GateError),

    #[error("{plane} was selected for landing but no gate is free")]
    NoGateFree { plane: PlaneId },

    #[error("{plane} was granted takeoff but occupies no gate")]
    NotAtGate { plane: PlaneId },
}

/// Errors from service-station jobs.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    #[error("station '{station}' is closed")]
    Closed { station: String },
}
