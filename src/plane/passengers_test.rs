// ABOUTME: Tests for the passenger timer helpers.
// ABOUTME: Verifies counters and event lines for disembark and embark.

use std::sync::Arc;
use std::time::Duration;

use super::PlaneId;
use super::passengers;
use crate::log::MemoryLog;
use crate::stats::Statistics;

#[tokio::test]
async fn test_disembark_records_headcount() {
    let stats = Statistics::new();
    let log = Arc::new(MemoryLog::new());

    passengers::disembark(PlaneId(2), 17, Duration::from_millis(5), &stats, &*log).await;

    assert_eq!(log.count_containing("Disembarking 17 passengers for Plane-2"), 1);
    assert_eq!(
        log.count_containing("All 17 passengers disembarked from Plane-2"),
        1
    );
    let summary = stats.summary();
    assert!(summary.contains("Total Passengers Disembarked: 17"));
}

#[tokio::test]
async fn test_embark_records_headcount() {
    let stats = Statistics::new();
    let log = Arc::new(MemoryLog::new());

    passengers::embark(PlaneId(3), 0, Duration::from_millis(5), &stats, &*log).await;

    assert_eq!(log.count_containing("Embarking 0 passengers for Plane-3"), 1);
    assert_eq!(
        log.count_containing("0 passengers successfully boarded Plane-3"),
        1
    );
    let summary = stats.summary();
    assert!(summary.contains("Total Passengers Boarded: 0"));
}
