// ABOUTME: Pending-request types and the per-plane clearance rendezvous.
// ABOUTME: A Clearance wakes exactly one waiting plane; grants are never lost.

use std::sync::Arc;

use tokio::sync::Notify;

use crate::plane::PlaneId;

/// Kind of runway permission a plane is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Landing,
    Takeoff,
}

/// Per-plane rendezvous the tower grants permission through.
///
/// Each plane owns exactly one of these and hands the tower a reference at
/// submission time. If the grant arrives before the plane starts waiting,
/// the stored permit completes the next `wait()` immediately, so there is no
/// missed-wakeup window.
#[derive(Default)]
pub struct Clearance {
    notify: Notify,
}

impl Clearance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake the owning plane. Called by the tower, once per grant.
    pub fn grant(&self) {
        self.notify.notify_one();
    }

    /// Suspend until the tower grants.
    pub async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// What a plane submits to the tower: its identity plus the rendezvous to
/// wake it with. The rendezvous is owned by the plane and passed explicitly,
/// never derived from a shared name.
#[derive(Clone)]
pub struct PlaneLink {
    pub id: PlaneId,
    pub clearance: Arc<Clearance>,
}

impl PlaneLink {
    pub fn new(id: PlaneId) -> Self {
        Self {
            id,
            clearance: Arc::new(Clearance::new()),
        }
    }
}

/// Why a request could not be granted this tick. Used to deduplicate the
/// informational denial lines; denial is expected control flow, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialReason {
    RunwayBusy(RequestKind),
    ApronFull,
    NoGateFree,
}

/// A request sitting in the tower's queue.
pub(crate) struct PendingRequest {
    pub link: PlaneLink,
    pub kind: RequestKind,
    pub emergency: bool,
    /// Submission order; emergencies are re-stamped to 0 (top priority).
    pub seq: u64,
}

/// Monitoring snapshot of one queued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedRequest {
    pub plane: PlaneId,
    pub kind: RequestKind,
    pub emergency: bool,
    pub seq: u64,
}
