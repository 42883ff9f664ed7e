// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use aerodrome::prelude::*;` to get started quickly.

pub use crate::config::{OpDurations, SimConfig};
pub use crate::error::{AerodromeError, GateError, RunwayError, StationError, TowerError};
pub use crate::gate::{GatePool, GateStatus};
pub use crate::log::{EventLog, MemoryLog, StdoutLog};
pub use crate::plane::{Plane, PlaneId, PlaneState};
pub use crate::runway::{Runway, RunwayMode};
pub use crate::sim::{Airport, SimReport, Simulation};
pub use crate::station::ServiceStation;
pub use crate::stats::Statistics;
pub use crate::tower::{Clearance, GateStatusReport, PlaneLink, RequestKind, Tower};
