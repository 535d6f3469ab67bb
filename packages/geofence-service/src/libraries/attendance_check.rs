use chrono::{DateTime, Utc};

use crate::libraries::distance::{evaluate_geofence, DEFAULT_MAX_ACCURACY_METERS};
use crate::models::{GeoPoint, GeoSample, GeofenceResult, LocationValidationError};

/// Configuration for attendance checks
#[derive(Debug, Clone)]
pub struct AttendanceCheckConfig {
    pub max_accuracy_meters: f64, // Worst GPS accuracy accepted
    pub max_sample_age_ms: i64,   // Oldest sample accepted
    pub max_clock_drift_ms: i64,  // Tolerated device clock skew into the future
}

impl Default for AttendanceCheckConfig {
    fn default() -> Self {
        Self {
            max_accuracy_meters: DEFAULT_MAX_ACCURACY_METERS,
            max_sample_age_ms: 30_000,
            max_clock_drift_ms: 5_000,
        }
    }
}

/// Result of an attendance check
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceCheckResult {
    pub passed: bool,
    pub geofence: Option<GeofenceResult>,
    pub accuracy: f64,
    pub sample_age_ms: i64,
    pub error: Option<LocationValidationError>,
}

impl AttendanceCheckResult {
    fn rejected(sample: &GeoSample, sample_age_ms: i64, error: LocationValidationError) -> Self {
        Self {
            passed: false,
            geofence: None,
            accuracy: sample.accuracy,
            sample_age_ms,
            error: Some(error),
        }
    }
}

/// Gates a location sample before it is allowed to count as presence at a shelter
#[derive(Debug, Clone, Default)]
pub struct AttendanceChecker {
    config: AttendanceCheckConfig,
}

impl AttendanceChecker {
    /// Create a new checker with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new checker with custom config
    pub fn with_config(config: AttendanceCheckConfig) -> Self {
        Self { config }
    }

    /// Check a sample against a target using the current time
    pub fn check(
        &self,
        sample: &GeoSample,
        target: &GeoPoint,
        max_distance_meters: f64,
    ) -> AttendanceCheckResult {
        self.check_at(sample, target, max_distance_meters, Utc::now())
    }

    /// Check a sample against a target as of `now`.
    ///
    /// Checks run in order (coordinates, freshness, accuracy, distance) and
    /// the first failure is reported.
    pub fn check_at(
        &self,
        sample: &GeoSample,
        target: &GeoPoint,
        max_distance_meters: f64,
        now: DateTime<Utc>,
    ) -> AttendanceCheckResult {
        let sample_age_ms = sample.age_ms(now.timestamp_millis());

        if let Err(e) = sample.coordinates.validate() {
            return AttendanceCheckResult::rejected(sample, sample_age_ms, e);
        }

        if let Err(e) = self.validate_freshness(sample_age_ms) {
            return AttendanceCheckResult::rejected(sample, sample_age_ms, e);
        }

        if let Err(e) = self.validate_accuracy(sample.accuracy) {
            return AttendanceCheckResult::rejected(sample, sample_age_ms, e);
        }

        let geofence = evaluate_geofence(&sample.coordinates, target, max_distance_meters);
        let error = (!geofence.within_radius).then(|| LocationValidationError::OutsideRadius {
            distance: geofence.distance_meters,
            max: geofence.max_distance_meters,
        });

        AttendanceCheckResult {
            passed: geofence.within_radius,
            geofence: Some(geofence),
            accuracy: sample.accuracy,
            sample_age_ms,
            error,
        }
    }

    /// Validate GPS accuracy meets requirements
    pub fn validate_accuracy(&self, accuracy: f64) -> Result<(), LocationValidationError> {
        if !accuracy.is_finite() || accuracy < 0.0 {
            Err(LocationValidationError::InvalidAccuracy { accuracy })
        } else if accuracy <= self.config.max_accuracy_meters {
            Ok(())
        } else {
            Err(LocationValidationError::AccuracyTooLow {
                accuracy,
                max: self.config.max_accuracy_meters,
            })
        }
    }

    /// Validate sample freshness
    pub fn validate_freshness(&self, sample_age_ms: i64) -> Result<(), LocationValidationError> {
        if sample_age_ms > self.config.max_sample_age_ms {
            Err(LocationValidationError::SampleExpired)
        } else if sample_age_ms < -self.config.max_clock_drift_ms {
            Err(LocationValidationError::InvalidTimestamp)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::distance::destination_point;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 7, 30, 0).unwrap()
    }

    fn shelter() -> GeoPoint {
        GeoPoint::new(-6.200000, 106.816666)
    }

    fn create_test_sample(point: GeoPoint, accuracy: f64, age_ms: i64) -> GeoSample {
        GeoSample::new(point, accuracy).at(now().timestamp_millis() - age_ms)
    }

    #[test]
    fn test_check_success() {
        let checker = AttendanceChecker::new();
        let sample = create_test_sample(destination_point(&shelter(), 10.0, 40.0), 15.0, 2_000);

        let result = checker.check_at(&sample, &shelter(), 100.0, now());
        assert!(result.passed);
        assert!(result.error.is_none());
        assert_eq!(result.sample_age_ms, 2_000);

        let geofence = result.geofence.unwrap();
        assert!(geofence.within_radius);
        assert_eq!(geofence.display_distance_meters(), 40.0);
    }

    #[test]
    fn test_check_too_far_keeps_distance() {
        let checker = AttendanceChecker::new();
        let sample = create_test_sample(destination_point(&shelter(), 200.0, 150.0), 10.0, 0);

        let result = checker.check_at(&sample, &shelter(), 100.0, now());
        assert!(!result.passed);

        let geofence = result.geofence.unwrap();
        assert!(!geofence.within_radius);
        assert!(matches!(
            result.error,
            Some(LocationValidationError::OutsideRadius { max, .. }) if max == 100.0
        ));
    }

    #[test]
    fn test_check_poor_accuracy() {
        let checker = AttendanceChecker::new();
        let sample = create_test_sample(shelter(), 80.0, 0);

        let result = checker.check_at(&sample, &shelter(), 100.0, now());
        assert!(!result.passed);
        assert!(result.geofence.is_none());
        assert!(matches!(
            result.error,
            Some(LocationValidationError::AccuracyTooLow { .. })
        ));
    }

    #[test]
    fn test_check_expired_sample() {
        let checker = AttendanceChecker::new();
        let sample = create_test_sample(shelter(), 10.0, 30_001);

        let result = checker.check_at(&sample, &shelter(), 100.0, now());
        assert_eq!(result.error, Some(LocationValidationError::SampleExpired));

        let sample = create_test_sample(shelter(), 10.0, 30_000);
        assert!(checker.check_at(&sample, &shelter(), 100.0, now()).passed);
    }

    #[test]
    fn test_check_future_sample() {
        let checker = AttendanceChecker::new();

        let sample = create_test_sample(shelter(), 10.0, -5_000);
        assert!(checker.check_at(&sample, &shelter(), 100.0, now()).passed);

        let sample = create_test_sample(shelter(), 10.0, -60_000);
        let result = checker.check_at(&sample, &shelter(), 100.0, now());
        assert_eq!(result.error, Some(LocationValidationError::InvalidTimestamp));
    }

    #[test]
    fn test_invalid_coordinates_reported_first() {
        let checker = AttendanceChecker::new();
        // Also stale and imprecise, but coordinates are checked first
        let sample = create_test_sample(GeoPoint::new(91.0, 0.0), 500.0, 600_000);

        let result = checker.check_at(&sample, &shelter(), 100.0, now());
        assert!(matches!(
            result.error,
            Some(LocationValidationError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_custom_config() {
        let checker = AttendanceChecker::with_config(AttendanceCheckConfig {
            max_accuracy_meters: 100.0,
            max_sample_age_ms: 120_000,
            max_clock_drift_ms: 0,
        });

        // 80m accuracy and 90s age would both fail the defaults
        let sample = create_test_sample(shelter(), 80.0, 90_000);
        assert!(checker.check_at(&sample, &shelter(), 25.0, now()).passed);

        let sample = create_test_sample(shelter(), 10.0, -1);
        assert_eq!(
            checker.check_at(&sample, &shelter(), 25.0, now()).error,
            Some(LocationValidationError::InvalidTimestamp)
        );
    }

    #[test]
    fn test_boundary_accuracy() {
        let checker = AttendanceChecker::new();
        assert!(checker.validate_accuracy(0.0).is_ok());
        assert!(checker.validate_accuracy(50.0).is_ok());
        assert!(checker.validate_accuracy(50.01).is_err());
    }

    #[test]
    fn test_negative_or_non_finite_accuracy() {
        let checker = AttendanceChecker::new();

        let sample = create_test_sample(shelter(), -500.0, 0);
        let result = checker.check_at(&sample, &shelter(), 100.0, now());
        assert!(!result.passed);
        assert!(result.geofence.is_none());
        assert_eq!(
            result.error,
            Some(LocationValidationError::InvalidAccuracy { accuracy: -500.0 })
        );

        assert!(matches!(
            checker.validate_accuracy(f64::NAN),
            Err(LocationValidationError::InvalidAccuracy { .. })
        ));
        assert!(matches!(
            checker.validate_accuracy(f64::INFINITY),
            Err(LocationValidationError::InvalidAccuracy { .. })
        ));
    }

    #[test]
    fn test_extreme_timestamps() {
        let checker = AttendanceChecker::new();

        let sample = GeoSample::new(shelter(), 10.0).at(i64::MIN);
        let result = checker.check_at(&sample, &shelter(), 100.0, now());
        assert_eq!(result.error, Some(LocationValidationError::SampleExpired));
        assert_eq!(result.sample_age_ms, i64::MAX);

        let sample = GeoSample::new(shelter(), 10.0).at(i64::MAX);
        let result = checker.check_at(&sample, &shelter(), 100.0, now());
        assert_eq!(result.error, Some(LocationValidationError::InvalidTimestamp));
    }
}
