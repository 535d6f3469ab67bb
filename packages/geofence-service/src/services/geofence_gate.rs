use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::libraries::attendance_check::{AttendanceCheckResult, AttendanceChecker};
use crate::models::GeoPoint;
use crate::services::location_provider::{LocationError, LocationProvider, PermissionStatus};
use crate::services::monitor::GeofenceMonitor;

/// Default time allowed for a single position fix
pub const DEFAULT_FIX_TIMEOUT: Duration = Duration::from_secs(15);

/// Connects a [`LocationProvider`] to the attendance checker: handles
/// permissions and timeouts, then hands samples to the pure evaluator.
pub struct GeofenceGate<P> {
    provider: Arc<P>,
    checker: AttendanceChecker,
    fix_timeout: Duration,
}

impl<P: LocationProvider> GeofenceGate<P> {
    pub fn new(provider: Arc<P>, checker: AttendanceChecker) -> Self {
        Self {
            provider,
            checker,
            fix_timeout: DEFAULT_FIX_TIMEOUT,
        }
    }

    pub fn with_fix_timeout(mut self, fix_timeout: Duration) -> Self {
        self.fix_timeout = fix_timeout;
        self
    }

    /// Make sure location permission is granted, prompting once if it was never asked
    pub async fn ensure_permission(&self) -> Result<(), LocationError> {
        let status = match self.provider.permission_status().await {
            PermissionStatus::Undetermined => {
                debug!("Requesting location permission");
                self.provider.request_permission().await
            }
            status => status,
        };

        match status {
            PermissionStatus::Granted => Ok(()),
            _ => {
                warn!("Location permission denied");
                Err(LocationError::PermissionDenied)
            }
        }
    }

    /// Take one position fix and check it against `target`
    pub async fn check(
        &self,
        target: &GeoPoint,
        max_distance_meters: f64,
    ) -> Result<AttendanceCheckResult, LocationError> {
        self.ensure_permission().await?;

        let sample = tokio::time::timeout(self.fix_timeout, self.provider.current_position())
            .await
            .map_err(|_| LocationError::Timeout)??;

        let result = self.checker.check(&sample, target, max_distance_meters);

        info!(
            "Geofence check - passed: {}, accuracy: {:.1}m, distance: {}",
            result.passed,
            result.accuracy,
            result
                .geofence
                .map(|g| format!("{}m", g.display_distance_meters()))
                .unwrap_or_else(|| "n/a".to_string())
        );

        Ok(result)
    }

    /// Start continuous monitoring of `target`
    pub async fn watch(
        &self,
        target: GeoPoint,
        max_distance_meters: f64,
    ) -> Result<GeofenceMonitor, LocationError> {
        self.ensure_permission().await?;

        let samples = self.provider.watch_position()?;
        Ok(GeofenceMonitor::start(
            samples,
            self.checker.clone(),
            target,
            max_distance_meters,
        ))
    }
}
