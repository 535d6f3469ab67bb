use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::libraries::attendance_check::{AttendanceCheckResult, AttendanceChecker};
use crate::models::GeoPoint;
use crate::services::location_provider::{LocationError, SampleStream};

/// Latest state published by a [`GeofenceMonitor`]
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorState {
    Waiting,
    Evaluated(AttendanceCheckResult),
    Failed(LocationError),
}

/// Continuously evaluates a position subscription against one geofence.
///
/// The subscription is cancelled by [`GeofenceMonitor::stop`] or when the
/// monitor is dropped.
pub struct GeofenceMonitor {
    state: watch::Receiver<MonitorState>,
    task: JoinHandle<()>,
}

impl GeofenceMonitor {
    pub fn start(
        mut samples: SampleStream,
        checker: AttendanceChecker,
        target: GeoPoint,
        max_distance_meters: f64,
    ) -> Self {
        let (tx, rx) = watch::channel(MonitorState::Waiting);

        let task = tokio::spawn(async move {
            while let Some(reading) = samples.recv().await {
                match reading {
                    Ok(sample) => {
                        let result = checker.check(&sample, &target, max_distance_meters);
                        debug!(
                            "Monitor sample - passed: {}, accuracy: {:.1}m, age: {}ms",
                            result.passed, result.accuracy, result.sample_age_ms
                        );
                        if tx.send(MonitorState::Evaluated(result)).is_err() {
                            // Nobody is listening anymore
                            break;
                        }
                    }
                    Err(e) if e.is_terminal() => {
                        warn!("Location subscription ended: {}", e);
                        let _ = tx.send(MonitorState::Failed(e));
                        break;
                    }
                    Err(e) => {
                        debug!("Skipping transient location error: {}", e);
                    }
                }
            }
        });

        Self { state: rx, task }
    }

    /// Snapshot of the most recent state
    pub fn latest(&self) -> MonitorState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MonitorState> {
        self.state.clone()
    }

    /// Latest result, if a sample has been evaluated
    pub fn latest_result(&self) -> Option<AttendanceCheckResult> {
        match &*self.state.borrow() {
            MonitorState::Evaluated(result) => Some(result.clone()),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for GeofenceMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::distance::destination_point;
    use crate::models::GeoSample;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn shelter() -> GeoPoint {
        GeoPoint::new(-6.200000, 106.816666)
    }

    fn sample_at(distance: f64) -> GeoSample {
        GeoSample::new(destination_point(&shelter(), 90.0, distance), 10.0)
    }

    #[tokio::test]
    async fn test_reports_latest_evaluation() {
        let (tx, rx) = mpsc::channel(4);
        let monitor = GeofenceMonitor::start(rx, AttendanceChecker::new(), shelter(), 100.0);
        assert_eq!(monitor.latest(), MonitorState::Waiting);

        let mut state = monitor.subscribe();

        tx.send(Ok(sample_at(250.0))).await.unwrap();
        tokio::time::timeout(
            Duration::from_secs(1),
            state.wait_for(|s| matches!(s, MonitorState::Evaluated(r) if !r.passed)),
        )
        .await
        .unwrap()
        .unwrap();

        tx.send(Ok(sample_at(20.0))).await.unwrap();
        tokio::time::timeout(
            Duration::from_secs(1),
            state.wait_for(|s| matches!(s, MonitorState::Evaluated(r) if r.passed)),
        )
        .await
        .unwrap()
        .unwrap();

        let result = monitor.latest_result().unwrap();
        assert_eq!(result.geofence.unwrap().display_distance_meters(), 20.0);
    }

    #[tokio::test]
    async fn test_transient_errors_are_skipped() {
        let (tx, rx) = mpsc::channel(4);
        let monitor = GeofenceMonitor::start(rx, AttendanceChecker::new(), shelter(), 100.0);
        let mut state = monitor.subscribe();

        tx.send(Err(LocationError::Timeout)).await.unwrap();
        tx.send(Err(LocationError::Unavailable("weak signal".to_string())))
            .await
            .unwrap();
        tx.send(Ok(sample_at(5.0))).await.unwrap();

        let latest = tokio::time::timeout(
            Duration::from_secs(1),
            state.wait_for(|s| !matches!(s, MonitorState::Waiting)),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();

        assert!(matches!(latest, MonitorState::Evaluated(r) if r.passed));
        assert!(monitor.is_running());
    }

    #[tokio::test]
    async fn test_terminal_error_ends_subscription() {
        let (tx, rx) = mpsc::channel(4);
        let monitor = GeofenceMonitor::start(rx, AttendanceChecker::new(), shelter(), 100.0);
        let mut state = monitor.subscribe();

        tx.send(Err(LocationError::ServicesDisabled)).await.unwrap();
        tokio::time::timeout(
            Duration::from_secs(1),
            state.wait_for(|s| *s == MonitorState::Failed(LocationError::ServicesDisabled)),
        )
        .await
        .unwrap()
        .unwrap();

        // The receiving half is gone once the task exits
        tokio::time::timeout(Duration::from_secs(1), tx.closed())
            .await
            .unwrap();
        assert!(tx.send(Ok(sample_at(5.0))).await.is_err());
        assert_eq!(
            monitor.latest(),
            MonitorState::Failed(LocationError::ServicesDisabled)
        );
    }

    #[tokio::test]
    async fn test_stop_cancels_subscription() {
        let (tx, rx) = mpsc::channel(4);
        let monitor = GeofenceMonitor::start(rx, AttendanceChecker::new(), shelter(), 100.0);

        monitor.stop();
        tokio::time::timeout(Duration::from_secs(1), tx.closed())
            .await
            .unwrap();
        assert!(tx.is_closed());
        assert_eq!(monitor.latest(), MonitorState::Waiting);
    }

    #[tokio::test]
    async fn test_drop_cancels_subscription() {
        let (tx, rx) = mpsc::channel(4);
        let monitor = GeofenceMonitor::start(rx, AttendanceChecker::new(), shelter(), 100.0);

        drop(monitor);
        tokio::time::timeout(Duration::from_secs(1), tx.closed())
            .await
            .unwrap();
    }
}
