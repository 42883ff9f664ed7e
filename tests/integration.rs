// ABOUTME: Integration tests running whole simulations with fast timing profiles.
// ABOUTME: Verifies capacity ceilings, emergency priority, and the final report.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::join_all;

use aerodrome::prelude::*;

fn fast_config() -> SimConfig {
    SimConfig {
        gates: 3,
        planes: 6,
        apron_ceiling: 3,
        poll_interval_ms: 5,
        runway_timeout_ms: 2000,
        arrival_stagger_ms: 2,
        emergency_planes: Vec::new(),
        durations: OpDurations::uniform(10),
    }
}

#[tokio::test]
async fn test_full_run_all_planes_depart() {
    let log = Arc::new(MemoryLog::new());
    let sim = Simulation::with_log(fast_config(), log.clone());

    let report = tokio::time::timeout(Duration::from_secs(30), sim.run())
        .await
        .expect("simulation hung");

    assert!(
        report.passed(),
        "failures: {:?}, aborted: {:?}",
        report.failures,
        report.aborted
    );
    assert!(report.gate_status.all_clear());
    assert!(report.gate_status.to_string().contains("PASSED"));
    assert_eq!(log.count_containing("Successfully departed"), 6);
    assert!(report.statistics.contains("Total Planes Registered: 6"));
    assert!(report.statistics.contains("Planes Landed: 6"));
    assert!(report.statistics.contains("Planes Departed: 6"));
}

#[tokio::test]
async fn test_emergency_plane_is_prioritized_and_departs() {
    let mut config = fast_config();
    config.emergency_planes = vec![6];
    let log = Arc::new(MemoryLog::new());
    let sim = Simulation::with_log(config, log.clone());

    let report = tokio::time::timeout(Duration::from_secs(30), sim.run())
        .await
        .expect("simulation hung");

    assert!(
        report.passed(),
        "failures: {:?}, aborted: {:?}",
        report.failures,
        report.aborted
    );
    assert_eq!(
        log.count_containing("Emergency landing request from Plane-6"),
        1
    );
    assert_eq!(
        log.count_containing("Permission granted for Plane-6 to land."),
        1
    );
}

/// Wires the airport by hand so the test can watch the live ground counter
/// while six planes contend for three gates.
#[tokio::test]
async fn test_ground_occupancy_never_exceeds_ceiling() {
    let mut config = fast_config();
    // Ground operations dominate runway operations so the apron actually
    // fills up and later arrivals get turned away.
    config.durations = OpDurations {
        landing_ms: 5,
        coasting_ms: 5,
        docking_ms: 5,
        takeoff_ms: 5,
        disembark_ms: 30,
        embark_ms: 30,
        cleaning_ms: 40,
        resupply_ms: 40,
        refuelling_ms: 40,
    };

    let log = Arc::new(MemoryLog::new());
    let event_log: Arc<dyn EventLog> = log.clone();
    let stats = Arc::new(Statistics::new());
    let runway = Arc::new(Runway::new());
    let gates = Arc::new(GatePool::new(config.gates));
    let tower = Arc::new(Tower::new(
        runway.clone(),
        gates.clone(),
        config.apron_ceiling,
        event_log.clone(),
    ));
    let refuelling = Arc::new(ServiceStation::refuelling_truck(
        config.durations.refuelling(),
        event_log.clone(),
    ));
    let cleaning: Vec<Arc<ServiceStation>> = (1..=config.gates)
        .map(|g| {
            Arc::new(ServiceStation::cleaning_crew(
                g,
                config.durations.cleaning(),
                event_log.clone(),
            ))
        })
        .collect();
    let resupply: Vec<Arc<ServiceStation>> = (1..=config.gates)
        .map(|g| {
            Arc::new(ServiceStation::supply_crew(
                g,
                config.durations.resupply(),
                event_log.clone(),
            ))
        })
        .collect();
    let airport = Airport {
        tower: tower.clone(),
        runway,
        refuelling: refuelling.clone(),
        cleaning: cleaning.clone(),
        resupply: resupply.clone(),
        stats,
        log: event_log,
    };

    let tower_task = tokio::spawn({
        let tower = tower.clone();
        let poll = config.poll_interval();
        async move { tower.run(poll).await }
    });

    let max_on_ground = Arc::new(AtomicUsize::new(0));
    let sampler = tokio::spawn({
        let tower = tower.clone();
        let max_on_ground = max_on_ground.clone();
        async move {
            loop {
                max_on_ground.fetch_max(tower.on_ground(), Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }
    });

    let mut planes = Vec::new();
    for number in 1..=config.planes {
        let plane = Plane::new(PlaneId(number), false, airport.clone(), &config);
        planes.push(tokio::spawn(plane.run()));
        tokio::time::sleep(config.arrival_stagger()).await;
    }

    let results = tokio::time::timeout(Duration::from_secs(30), join_all(planes))
        .await
        .expect("fleet hung");
    for result in results {
        result.unwrap().unwrap();
    }

    sampler.abort();
    tower.shutdown();
    tower_task.await.unwrap().unwrap();
    refuelling.shutdown().await;
    for station in cleaning.iter().chain(resupply.iter()) {
        station.shutdown().await;
    }

    assert!(
        max_on_ground.load(Ordering::SeqCst) <= config.apron_ceiling,
        "apron ceiling exceeded: {}",
        max_on_ground.load(Ordering::SeqCst)
    );
    assert!(tower.status_report().all_clear());

    // With three gates taken, later arrivals were turned away - and each
    // (plane, reason) pair was logged at most once.
    assert!(log.count_containing("airport full") >= 1);
    for number in 1..=config.planes {
        assert!(
            log.count_containing(&format!("Landing denied for Plane-{number}, airport full."))
                <= 1
        );
    }
}
