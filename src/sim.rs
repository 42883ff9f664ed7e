// ABOUTME: Simulation driver - wires the airport together and runs the fleet.
// ABOUTME: Joins all planes while racing the tower loop; always renders a report.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;

use crate::config::SimConfig;
use crate::gate::GatePool;
use crate::log::{EventLog, StdoutLog};
use crate::plane::{Plane, PlaneId};
use crate::runway::Runway;
use crate::station::ServiceStation;
use crate::stats::Statistics;
use crate::tower::{GateStatusReport, Tower};

/// Shared infrastructure handed to every plane.
#[derive(Clone)]
pub struct Airport {
    pub tower: Arc<Tower>,
    pub runway: Arc<Runway>,
    pub refuelling: Arc<ServiceStation>,
    /// Cleaning crew per gate, index 0 serving Gate-1.
    pub cleaning: Vec<Arc<ServiceStation>>,
    /// Supply crew per gate, index 0 serving Gate-1.
    pub resupply: Vec<Arc<ServiceStation>>,
    pub stats: Arc<Statistics>,
    pub log: Arc<dyn EventLog>,
}

/// Outcome of one full run.
///
/// Produced even when the run aborted early, so partial statistics and the
/// gate status are always available.
pub struct SimReport {
    pub elapsed: Duration,
    pub statistics: String,
    pub gate_status: GateStatusReport,
    /// Planes whose runs ended in an error, with the rendered error.
    pub failures: Vec<(PlaneId, String)>,
    /// Set when the tower's admission loop aborted the run.
    pub aborted: Option<String>,
}

impl SimReport {
    /// True when every plane departed and every gate ended up empty.
    pub fn passed(&self) -> bool {
        self.aborted.is_none() && self.failures.is_empty() && self.gate_status.all_clear()
    }
}

/// Builds and runs the whole simulation from one configuration.
pub struct Simulation {
    config: SimConfig,
    log: Arc<dyn EventLog>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self::with_log(config, Arc::new(StdoutLog))
    }

    pub fn with_log(config: SimConfig, log: Arc<dyn EventLog>) -> Self {
        Self { config, log }
    }

    pub async fn run(&self) -> SimReport {
        let started = Instant::now();
        let config = &self.config;
        let durations = &config.durations;

        let stats = Arc::new(Statistics::new());
        let runway = Arc::new(Runway::new());
        let gates = Arc::new(GatePool::new(config.gates));
        let tower = Arc::new(Tower::new(
            runway.clone(),
            gates.clone(),
            config.apron_ceiling,
            self.log.clone(),
        ));

        let refuelling = Arc::new(ServiceStation::refuelling_truck(
            durations.refuelling(),
            self.log.clone(),
        ));
        let cleaning: Vec<Arc<ServiceStation>> = (1..=config.gates)
            .map(|gate| {
                Arc::new(ServiceStation::cleaning_crew(
                    gate,
                    durations.cleaning(),
                    self.log.clone(),
                ))
            })
            .collect();
        let resupply: Vec<Arc<ServiceStation>> = (1..=config.gates)
            .map(|gate| {
                Arc::new(ServiceStation::supply_crew(
                    gate,
                    durations.resupply(),
                    self.log.clone(),
                ))
            })
            .collect();

        let airport = Airport {
            tower: tower.clone(),
            runway,
            refuelling: refuelling.clone(),
            cleaning: cleaning.clone(),
            resupply: resupply.clone(),
            stats: stats.clone(),
            log: self.log.clone(),
        };

        let mut tower_task = tokio::spawn({
            let tower = tower.clone();
            let poll_interval = config.poll_interval();
            async move { tower.run(poll_interval).await }
        });

        let mut plane_tasks = Vec::new();
        for number in 1..=config.planes {
            let plane = Plane::new(
                PlaneId(number),
                config.is_emergency(number),
                airport.clone(),
                config,
            );
            plane_tasks.push(tokio::spawn(plane.run()));
            if number < config.planes {
                tokio::time::sleep(config.arrival_stagger()).await;
            }
        }

        let mut failures = Vec::new();
        let mut aborted = None;
        tokio::select! {
            results = join_all(plane_tasks) => {
                for (offset, result) in results.into_iter().enumerate() {
                    let id = PlaneId(offset as u32 + 1);
                    match result {
                        Ok(Ok(())) => {}
                        Ok(Err(err)) => {
                            self.log.line("Simulation", &format!("{id} aborted: {err}"));
                            failures.push((id, err.to_string()));
                        }
                        Err(join_err) => {
                            self.log.line("Simulation", &format!("{id} crashed: {join_err}"));
                            failures.push((id, join_err.to_string()));
                        }
                    }
                }
            }
            tower_result = &mut tower_task => {
                // The admission loop never returns on its own; reaching this
                // branch means an invariant was violated and the run is over.
                let rendered = match tower_result {
                    Ok(Err(err)) => err.to_string(),
                    Ok(Ok(())) => "tower loop stopped unexpectedly".to_string(),
                    Err(join_err) => join_err.to_string(),
                };
                self.log.line("Simulation", &format!("run aborted: {rendered}"));
                aborted = Some(rendered);
            }
        }

        if aborted.is_none() {
            tower.shutdown();
            if let Ok(Err(err)) = (&mut tower_task).await {
                aborted = Some(err.to_string());
            }
        }

        refuelling.shutdown().await;
        for station in cleaning.iter().chain(resupply.iter()) {
            station.shutdown().await;
        }

        SimReport {
            elapsed: started.elapsed(),
            statistics: stats.summary(),
            gate_status: tower.status_report(),
            failures,
            aborted,
        }
    }
}
