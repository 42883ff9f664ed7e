// ABOUTME: Passenger disembark/embark timers with head-count statistics.
// ABOUTME: Stateless helpers; the plane awaits them at its schedule edges.

use std::time::Duration;

use crate::log::EventLog;
use crate::plane::PlaneId;
use crate::stats::Statistics;

/// Let `count` passengers off the plane.
pub async fn disembark(
    plane: PlaneId,
    count: u32,
    duration: Duration,
    stats: &Statistics,
    log: &dyn EventLog,
) {
    let source = format!("{plane}-Passenger");
    log.line(
        &source,
        &format!("Disembarking {count} passengers for {plane}"),
    );
    tokio::time::sleep(duration).await;
    stats.record_passengers_disembarked(count);
    log.line(
        &source,
        &format!("All {count} passengers disembarked from {plane}"),
    );
}

/// Board `count` new passengers.
pub async fn embark(
    plane: PlaneId,
    count: u32,
    duration: Duration,
    stats: &Statistics,
    log: &dyn EventLog,
) {
    let source = format!("New-{plane}-Passenger");
    log.line(&source, &format!("Embarking {count} passengers for {plane}"));
    tokio::time::sleep(duration).await;
    stats.record_passengers_boarded(count);
    log.line(
        &source,
        &format!("{count} passengers successfully boarded {plane}"),
    );
}
