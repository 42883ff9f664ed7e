// ABOUTME: Generalized single-worker service station (cleaning, resupply, refuelling).
// ABOUTME: One FIFO worker; each caller blocks on its own per-job completion signal.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Notify, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::StationError;
use crate::log::EventLog;
use crate::plane::PlaneId;

struct Job {
    plane: PlaneId,
    done: oneshot::Sender<()>,
}

/// A single-worker ground-service resource.
///
/// Jobs queue FIFO and are processed one at a time. The submitting plane
/// blocks on a `oneshot` scoped to its own job, so completing one job never
/// wakes an unrelated caller. `shutdown()` stops the worker after the
/// in-flight job; anything still queued is abandoned and its submitter
/// unblocked with [`StationError::Closed`].
pub struct ServiceStation {
    name: String,
    intake: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    stop: Arc<Notify>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ServiceStation {
    /// Spawn a station worker.
    ///
    /// `action` and `action_ing` shape the event lines, e.g. `"clean"` /
    /// `"cleaning"` produces "Starting to clean Plane-1" and
    /// "Finished cleaning Plane-1".
    pub fn spawn(
        name: impl Into<String>,
        action: &str,
        action_ing: &str,
        duration: Duration,
        log: Arc<dyn EventLog>,
    ) -> Self {
        let name = name.into();
        let (intake_tx, mut intake_rx) = mpsc::unbounded_channel::<Job>();
        let stop = Arc::new(Notify::new());

        let worker = tokio::spawn({
            let name = name.clone();
            let action = action.to_string();
            let action_ing = action_ing.to_string();
            let stop = stop.clone();
            async move {
                loop {
                    let job = tokio::select! {
                        biased;
                        () = stop.notified() => break,
                        job = intake_rx.recv() => match job {
                            Some(job) => job,
                            None => break,
                        },
                    };
                    log.line(&name, &format!("Starting to {} {}", action, job.plane));
                    tokio::time::sleep(duration).await;
                    log.line(&name, &format!("Finished {} {}", action_ing, job.plane));
                    // The submitter may have unwound already; nothing to do then.
                    let _ = job.done.send(());
                }
                tracing::debug!(station = %name, "station worker stopped");
            }
        });

        Self {
            name,
            intake: Mutex::new(Some(intake_tx)),
            stop,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Shared refuelling truck: one FIFO across every plane.
    pub fn refuelling_truck(duration: Duration, log: Arc<dyn EventLog>) -> Self {
        Self::spawn("RefuellingTruck", "refuel", "refuelling", duration, log)
    }

    /// Cleaning crew dedicated to one gate.
    pub fn cleaning_crew(gate: u32, duration: Duration, log: Arc<dyn EventLog>) -> Self {
        Self::spawn(
            format!("CleaningCrew-Gate{gate}"),
            "clean",
            "cleaning",
            duration,
            log,
        )
    }

    /// Supply crew dedicated to one gate.
    pub fn supply_crew(gate: u32, duration: Duration, log: Arc<dyn EventLog>) -> Self {
        Self::spawn(
            format!("SupplyCrew-Gate{gate}"),
            "resupply",
            "resupplying",
            duration,
            log,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Submit a job and wait until this job (not merely some job) completes.
    pub async fn submit(&self, plane: PlaneId) -> Result<(), StationError> {
        let (done_tx, done_rx) = oneshot::channel();
        {
            let intake = self.intake.lock().unwrap();
            let Some(tx) = intake.as_ref() else {
                return Err(self.closed());
            };
            tx.send(Job {
                plane,
                done: done_tx,
            })
            .map_err(|_| self.closed())?;
        }
        done_rx.await.map_err(|_| self.closed())
    }

    /// Stop accepting jobs and stop the worker after any in-flight job.
    pub async fn shutdown(&self) {
        self.intake.lock().unwrap().take();
        self.stop.notify_one();
        let worker = self.worker.lock().unwrap().take();
        if let Some(handle) = worker {
            let _ = handle.await;
        }
    }

    fn closed(&self) -> StationError {
        StationError::Closed {
            station: self.name.clone(),
        }
    }
}
