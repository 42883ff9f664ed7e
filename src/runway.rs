// ABOUTME: Single exclusive-use runway with a FIFO acquisition queue.
// ABOUTME: Bounded-timeout acquire, holder-validated release, emergency queue-jump.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;

use crate::error::RunwayError;
use crate::plane::PlaneId;

/// What the runway is currently being used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunwayMode {
    Landing,
    Takeoff,
}

impl std::fmt::Display for RunwayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunwayMode::Landing => write!(f, "landing"),
            RunwayMode::Takeoff => write!(f, "takeoff"),
        }
    }
}

/// One queued acquirer. `granted` is flipped under the runway lock when
/// ownership is handed to this waiter, so a timed-out caller can tell
/// whether the grant raced its deadline.
struct Waiter {
    plane: PlaneId,
    mode: RunwayMode,
    notify: Notify,
    granted: AtomicBool,
}

impl Waiter {
    fn new(plane: PlaneId, mode: RunwayMode) -> Arc<Self> {
        Arc::new(Self {
            plane,
            mode,
            notify: Notify::new(),
            granted: AtomicBool::new(false),
        })
    }
}

struct RunwayState {
    occupant: Option<(PlaneId, RunwayMode)>,
    queue: VecDeque<Arc<Waiter>>,
}

/// The single runway.
///
/// Exclusion and fairness live entirely here, independent of the tower's
/// critical section, so the timed occupy-and-operate phase never serializes
/// against admission decisions.
///
/// # Acquisition semantics
///
/// - **FIFO fairness:** waiters are granted in arrival order. The free-runway
///   fast path only applies when nobody is queued, so late arrivals cannot
///   barge past earlier ones.
/// - **Hand-off on release:** `release()` assigns occupancy to the next
///   waiter *before* waking it. A grant can therefore never be lost between
///   notify and wake.
/// - **Emergency bypass:** `force_acquire()` joins the *front* of the queue
///   and waits unbounded; it does not interrupt the current holder.
pub struct Runway {
    state: Mutex<RunwayState>,
}

impl Default for Runway {
    fn default() -> Self {
        Self::new()
    }
}

impl Runway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RunwayState {
                occupant: None,
                queue: VecDeque::new(),
            }),
        }
    }

    /// Acquire the runway for `mode`, waiting at most `timeout`.
    ///
    /// Returns `true` once the caller holds the runway. Returns `false` on
    /// timeout, in which case the caller owns nothing and must restart its
    /// whole request cycle with the tower.
    pub async fn acquire(&self, plane: PlaneId, mode: RunwayMode, timeout: Duration) -> bool {
        let waiter = {
            let mut state = self.state.lock().unwrap();
            if state.occupant.is_none() {
                debug_assert!(state.queue.is_empty());
                state.occupant = Some((plane, mode));
                return true;
            }
            let waiter = Waiter::new(plane, mode);
            state.queue.push_back(waiter.clone());
            waiter
        };

        match tokio::time::timeout(timeout, waiter.notify.notified()).await {
            Ok(()) => true,
            Err(_) => {
                let mut state = self.state.lock().unwrap();
                if waiter.granted.load(Ordering::SeqCst) {
                    // The grant raced the deadline: we hold the runway but the
                    // caller has already given up, so pass it straight on.
                    tracing::debug!(plane = %plane, "runway grant raced acquire timeout");
                    state.occupant = None;
                    Self::hand_off(&mut state);
                } else {
                    state.queue.retain(|w| !Arc::ptr_eq(w, &waiter));
                }
                false
            }
        }
    }

    /// Emergency acquisition: jump to the head of the queue and wait without
    /// a deadline. Only called for a tower-approved emergency landing.
    pub async fn force_acquire(&self, plane: PlaneId) {
        let waiter = {
            let mut state = self.state.lock().unwrap();
            if state.occupant.is_none() {
                debug_assert!(state.queue.is_empty());
                state.occupant = Some((plane, RunwayMode::Landing));
                return;
            }
            let waiter = Waiter::new(plane, RunwayMode::Landing);
            state.queue.push_front(waiter.clone());
            waiter
        };
        waiter.notify.notified().await;
    }

    /// Release the runway and hand it to the next waiter, if any.
    pub fn release(&self, plane: PlaneId) -> Result<(), RunwayError> {
        let mut state = self.state.lock().unwrap();
        match state.occupant {
            Some((holder, _)) if holder == plane => {
                state.occupant = None;
                Self::hand_off(&mut state);
                Ok(())
            }
            _ => Err(RunwayError::NotHolder { plane }),
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.state.lock().unwrap().occupant.is_some()
    }

    /// Current holder and mode, for the tower's occupancy check and the
    /// status surface.
    pub fn occupant(&self) -> Option<(PlaneId, RunwayMode)> {
        self.state.lock().unwrap().occupant
    }

    fn hand_off(state: &mut RunwayState) {
        if let Some(next) = state.queue.pop_front() {
            state.occupant = Some((next.plane, next.mode));
            next.granted.store(true, Ordering::SeqCst);
            next.notify.notify_one();
            tracing::trace!(plane = %next.plane, mode = %next.mode, "runway handed off");
        }
    }
}
