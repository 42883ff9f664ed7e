// ABOUTME: Traffic coordination module - admission loop, requests, clearances.
// ABOUTME: Serializes runway/gate grants; at most one request advances per tick.

mod request;
mod tower;

pub use request::{Clearance, DenialReason, PlaneLink, QueuedRequest, RequestKind};
pub use tower::{GateStatusReport, Tower};
