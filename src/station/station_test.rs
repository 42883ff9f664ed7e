// ABOUTME: Tests for the service-station worker.
// ABOUTME: Covers FIFO order, per-job completion signals, and shutdown behavior.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::ServiceStation;
use crate::error::StationError;
use crate::log::MemoryLog;
use crate::plane::PlaneId;

fn station(duration_ms: u64, log: Arc<MemoryLog>) -> ServiceStation {
    ServiceStation::spawn(
        "TestStation",
        "service",
        "servicing",
        Duration::from_millis(duration_ms),
        log,
    )
}

#[tokio::test]
async fn test_job_completes_and_logs() {
    let log = Arc::new(MemoryLog::new());
    let station = station(5, log.clone());

    station.submit(PlaneId(1)).await.unwrap();

    let lines = log.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Starting to service Plane-1"));
    assert!(lines[1].contains("Finished servicing Plane-1"));

    station.shutdown().await;
}

#[tokio::test]
async fn test_jobs_run_in_submission_order() {
    let log = Arc::new(MemoryLog::new());
    let station = station(5, log.clone());

    // join! polls in order, so plane 1 enqueues before plane 2.
    let (first, second) = tokio::join!(station.submit(PlaneId(1)), station.submit(PlaneId(2)));
    first.unwrap();
    second.unwrap();

    let lines = log.lines();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("Starting to service Plane-1"));
    assert!(lines[1].contains("Finished servicing Plane-1"));
    assert!(lines[2].contains("Starting to service Plane-2"));
    assert!(lines[3].contains("Finished servicing Plane-2"));

    station.shutdown().await;
}

#[tokio::test]
async fn test_one_job_at_a_time() {
    let log = Arc::new(MemoryLog::new());
    let station = station(20, log.clone());

    let started = Instant::now();
    let (first, second) = tokio::join!(station.submit(PlaneId(1)), station.submit(PlaneId(2)));
    first.unwrap();
    second.unwrap();

    // Two 20ms jobs through a single worker cannot overlap.
    assert!(started.elapsed() >= Duration::from_millis(40));

    station.shutdown().await;
}

#[tokio::test]
async fn test_submit_after_shutdown_is_closed() {
    let log = Arc::new(MemoryLog::new());
    let station = station(5, log);

    station.shutdown().await;

    let err = station.submit(PlaneId(1)).await.unwrap_err();
    match err {
        StationError::Closed { station } => assert_eq!(station, "TestStation"),
    }
}

#[tokio::test]
async fn test_shutdown_finishes_in_flight_and_abandons_queued() {
    let log = Arc::new(MemoryLog::new());
    let station = Arc::new(station(50, log.clone()));

    let in_flight = tokio::spawn({
        let station = station.clone();
        async move { station.submit(PlaneId(1)).await }
    });
    // Let the worker pick up plane 1 before queueing plane 2.
    tokio::time::sleep(Duration::from_millis(10)).await;
    let queued = tokio::spawn({
        let station = station.clone();
        async move { station.submit(PlaneId(2)).await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    station.shutdown().await;

    assert!(in_flight.await.unwrap().is_ok(), "in-flight job completes");
    assert!(
        matches!(queued.await.unwrap(), Err(StationError::Closed { .. })),
        "queued job is abandoned"
    );
    assert_eq!(log.count_containing("Finished servicing Plane-1"), 1);
    assert_eq!(log.count_containing("Starting to service Plane-2"), 0);
}
