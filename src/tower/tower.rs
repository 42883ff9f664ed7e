// ABOUTME: The tower - single serialized admission authority for runway and gates.
// ABOUTME: Polls pending requests each tick and grants at most one per tick.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use super::request::{DenialReason, PendingRequest, PlaneLink, QueuedRequest, RequestKind};
use crate::error::TowerError;
use crate::gate::{GatePool, GateStatus};
use crate::log::EventLog;
use crate::plane::PlaneId;
use crate::runway::Runway;

/// Queue, sequence counter, and denial records — everything the admission
/// step mutates, behind one lock.
struct TowerState {
    queue: VecDeque<PendingRequest>,
    next_seq: u64,
    denials: HashSet<(PlaneId, DenialReason)>,
}

/// The traffic coordinator.
///
/// All admission decisions happen inside `tick()`, one grant per tick.
/// Planes submit requests and suspend on their [`Clearance`]; the tower
/// wakes exactly the plane it grants. Gate occupancy and the ground counter
/// are mutated only here.
///
/// # Request semantics
///
/// - **Idempotent submission:** a pending (plane, kind) pair is never
///   duplicated by resubmission.
/// - **Emergency override:** an emergency landing replaces any pending
///   request for that plane and joins the front of the queue.
/// - **Skip-blocked-head:** requests that cannot proceed yet are left in
///   place and the scan continues, so one stalled plane never starves
///   unrelated requests behind it.
///
/// [`Clearance`]: crate::tower::Clearance
pub struct Tower {
    runway: Arc<Runway>,
    gates: Arc<GatePool>,
    apron_ceiling: usize,
    on_ground: AtomicUsize,
    running: AtomicBool,
    state: Mutex<TowerState>,
    log: Arc<dyn EventLog>,
}

impl Tower {
    pub fn new(
        runway: Arc<Runway>,
        gates: Arc<GatePool>,
        apron_ceiling: usize,
        log: Arc<dyn EventLog>,
    ) -> Self {
        Self {
            runway,
            gates,
            apron_ceiling,
            on_ground: AtomicUsize::new(0),
            running: AtomicBool::new(true),
            state: Mutex::new(TowerState {
                queue: VecDeque::new(),
                next_seq: 1,
                denials: HashSet::new(),
            }),
            log,
        }
    }

    /// Submit a landing request.
    ///
    /// A non-emergency resubmission while an equivalent request is pending
    /// is a no-op. An emergency submission removes any pending request for
    /// the plane and inserts at the front with top priority.
    pub fn request_landing(&self, link: &PlaneLink, emergency: bool) {
        let mut state = self.state.lock().unwrap();
        if emergency {
            self.log
                .line("Tower", &format!("Emergency landing request from {}", link.id));
            state.queue.retain(|req| req.link.id != link.id);
            state.queue.push_front(PendingRequest {
                link: link.clone(),
                kind: RequestKind::Landing,
                emergency: true,
                seq: 0,
            });
            return;
        }

        let already_pending = state
            .queue
            .iter()
            .any(|req| req.link.id == link.id && req.kind == RequestKind::Landing);
        if !already_pending {
            let seq = state.next_seq;
            state.next_seq += 1;
            state.queue.push_back(PendingRequest {
                link: link.clone(),
                kind: RequestKind::Landing,
                emergency: false,
                seq,
            });
        }
    }

    /// Submit a takeoff request. Idempotent like non-emergency landings.
    pub fn request_takeoff(&self, link: &PlaneLink) {
        let mut state = self.state.lock().unwrap();
        let already_pending = state
            .queue
            .iter()
            .any(|req| req.link.id == link.id && req.kind == RequestKind::Takeoff);
        if !already_pending {
            let seq = state.next_seq;
            state.next_seq += 1;
            state.queue.push_back(PendingRequest {
                link: link.clone(),
                kind: RequestKind::Takeoff,
                emergency: false,
                seq,
            });
        }
    }

    /// One admission pass. Grants at most one request.
    ///
    /// Gate conflicts here mean a violated invariant; the error aborts the
    /// admission loop and with it the run.
    pub fn tick(&self) -> Result<(), TowerError> {
        let mut state = self.state.lock().unwrap();

        if self.runway.is_occupied() {
            // Nothing can be granted; surface (once) why the head is stuck.
            if let Some(head) = state.queue.front() {
                let plane = head.link.id;
                let kind = head.kind;
                let verb = match kind {
                    RequestKind::Landing => "Landing",
                    RequestKind::Takeoff => "Takeoff",
                };
                let message = format!("{verb} denied for {plane}, runway occupied.");
                self.note_denial(
                    &mut state.denials,
                    plane,
                    DenialReason::RunwayBusy(kind),
                    &message,
                );
            }
            return Ok(());
        }

        let mut selected = None;
        for idx in 0..state.queue.len() {
            let (plane, kind) = {
                let req = &state.queue[idx];
                (req.link.id, req.kind)
            };
            match kind {
                RequestKind::Landing => {
                    if self.on_ground.load(Ordering::SeqCst) >= self.apron_ceiling {
                        let message = format!("Landing denied for {plane}, airport full.");
                        self.note_denial(
                            &mut state.denials,
                            plane,
                            DenialReason::ApronFull,
                            &message,
                        );
                    } else if self.gates.find_available().is_none() {
                        let message = format!("Landing denied for {plane}, no gates available.");
                        self.note_denial(
                            &mut state.denials,
                            plane,
                            DenialReason::NoGateFree,
                            &message,
                        );
                    } else {
                        selected = Some(idx);
                        break;
                    }
                }
                RequestKind::Takeoff => {
                    // Satisfiable only once the plane actually holds a gate.
                    if self.gates.gate_of(plane).is_some() {
                        selected = Some(idx);
                        break;
                    }
                }
            }
        }

        if let Some(idx) = selected {
            if let Some(request) = state.queue.remove(idx) {
                self.grant(request)?;
            }
        }
        Ok(())
    }

    fn grant(&self, request: PendingRequest) -> Result<(), TowerError> {
        let plane = request.link.id;
        match request.kind {
            RequestKind::Landing => {
                let gate = self
                    .gates
                    .find_available()
                    .ok_or(TowerError::NoGateFree { plane })?;
                self.log
                    .line("Tower", &format!("Permission granted for {plane} to land."));
                self.log
                    .line("Tower", &format!("Gate-{gate} assigned for {plane}"));
                self.gates.occupy(gate, plane)?;
                self.on_ground.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(plane = %plane, gate, emergency = request.emergency, "landing granted");
            }
            RequestKind::Takeoff => {
                let gate = self
                    .gates
                    .gate_of(plane)
                    .ok_or(TowerError::NotAtGate { plane })?;
                self.log.line(
                    "Tower",
                    &format!("Permission granted for {plane} to take off."),
                );
                self.gates.release(gate)?;
                tracing::debug!(plane = %plane, gate, "takeoff granted");
            }
        }
        request.link.clearance.grant();
        Ok(())
    }

    fn note_denial(
        &self,
        denials: &mut HashSet<(PlaneId, DenialReason)>,
        plane: PlaneId,
        reason: DenialReason,
        message: &str,
    ) {
        if denials.insert((plane, reason)) {
            self.log.line("Tower", message);
        }
    }

    /// The admission loop: tick, sleep, repeat until shutdown.
    ///
    /// The fixed delay bounds CPU use; it does not express a deadline.
    pub async fn run(&self, poll_interval: Duration) -> Result<(), TowerError> {
        tracing::debug!("tower admission loop started");
        while self.running.load(Ordering::SeqCst) {
            self.tick()?;
            tokio::time::sleep(poll_interval).await;
        }
        tracing::debug!("tower admission loop stopped");
        Ok(())
    }

    /// Stop the admission loop after the current tick.
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// The gate `plane` currently occupies, if any.
    pub fn gate_of(&self, plane: PlaneId) -> Option<u32> {
        self.gates.gate_of(plane)
    }

    /// Called by a plane once its takeoff has fully completed (runway
    /// released), freeing its slot under the apron ceiling.
    pub fn plane_departed(&self) {
        let result = self
            .on_ground
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                count.checked_sub(1)
            });
        if result.is_err() {
            tracing::warn!("plane_departed called with nobody on the ground");
        }
    }

    /// Planes currently on the ground.
    pub fn on_ground(&self) -> usize {
        self.on_ground.load(Ordering::SeqCst)
    }

    /// Snapshot of the pending queue, front first. For monitoring and tests.
    pub fn pending_requests(&self) -> Vec<QueuedRequest> {
        let state = self.state.lock().unwrap();
        state
            .queue
            .iter()
            .map(|req| QueuedRequest {
                plane: req.link.id,
                kind: req.kind,
                emergency: req.emergency,
                seq: req.seq,
            })
            .collect()
    }

    /// Deterministic end-of-run gate dump plus sanity flag.
    pub fn status_report(&self) -> GateStatusReport {
        GateStatusReport {
            gates: self.gates.snapshot(),
        }
    }
}

/// End-of-run gate occupancy report.
///
/// The sanity check passes only when every gate is empty.
pub struct GateStatusReport {
    gates: Vec<GateStatus>,
}

impl GateStatusReport {
    pub fn all_clear(&self) -> bool {
        self.gates.iter().all(|gate| gate.occupant.is_none())
    }

    pub fn gates(&self) -> &[GateStatus] {
        &self.gates
    }
}

impl fmt::Display for GateStatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Gate Status Check =====")?;
        for gate in &self.gates {
            match gate.occupant {
                Some(plane) => writeln!(f, "Gate-{}: OCCUPIED by {}", gate.number, plane)?,
                None => writeln!(f, "Gate-{}: EMPTY", gate.number)?,
            }
        }
        writeln!(f)?;
        if self.all_clear() {
            writeln!(f, "Sanity Check Result: All gates are empty - PASSED")?;
        } else {
            writeln!(f, "Sanity Check Result: Some gates still occupied - FAILED")?;
        }
        write!(f, "==============================")
    }
}
