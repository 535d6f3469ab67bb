use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point from WGS84 degrees
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Validate that coordinates are finite and within valid GPS ranges
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn validate(&self) -> Result<(), LocationValidationError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(LocationValidationError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Coarse geohash cell for this point, used instead of raw coordinates in logs.
    /// Precision 7 is roughly a 150m cell.
    pub fn geohash(&self, precision: usize) -> Result<String, LocationValidationError> {
        self.validate()?;
        geohash::encode(
            geohash::Coord {
                x: self.longitude,
                y: self.latitude,
            },
            precision,
        )
        .map_err(|_| LocationValidationError::InvalidCoordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoSample {
    pub coordinates: GeoPoint,
    pub accuracy: f64,  // Horizontal accuracy in meters
    pub timestamp: i64, // Unix epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>, // Altitude in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_accuracy: Option<f64>, // Vertical accuracy in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>, // Direction in degrees from north
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>, // Speed in meters/second
}

impl GeoSample {
    /// Create a sample taken now with only the required fields
    pub fn new(coordinates: GeoPoint, accuracy: f64) -> Self {
        Self {
            coordinates,
            accuracy,
            timestamp: Utc::now().timestamp_millis(),
            altitude: None,
            altitude_accuracy: None,
            heading: None,
            speed: None,
        }
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Create a sample taken now with all optional fields
    pub fn new_with_details(
        coordinates: GeoPoint,
        accuracy: f64,
        altitude: Option<f64>,
        altitude_accuracy: Option<f64>,
        heading: Option<f64>,
        speed: Option<f64>,
    ) -> Self {
        Self {
            altitude,
            altitude_accuracy,
            heading,
            speed,
            ..Self::new(coordinates, accuracy)
        }
    }

    /// Milliseconds elapsed between the sample and `now_ms`; negative when the
    /// sample claims to come from the future.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.timestamp)
    }

    pub fn is_accurate_enough(&self, max_accuracy_meters: f64) -> bool {
        self.accuracy <= max_accuracy_meters
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationValidationError {
    #[error("Invalid coordinates provided ({latitude}, {longitude}).")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("GPS accuracy too low ({accuracy:.0}m, need {max:.0}m or better). Please enable precise location.")]
    AccuracyTooLow { accuracy: f64, max: f64 },

    #[error("Invalid GPS accuracy ({accuracy}m).")]
    InvalidAccuracy { accuracy: f64 },

    #[error("Location sample expired. Please try again.")]
    SampleExpired,

    #[error("Invalid timestamp.")]
    InvalidTimestamp,

    #[error("You are {distance:.0}m away; allowed radius is {max:.0}m.")]
    OutsideRadius { distance: f64, max: f64 },
}

impl LocationValidationError {
    /// Stable machine-readable code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCoordinate { .. } => "INVALID_COORDINATE",
            Self::InvalidAccuracy { .. } => "INVALID_ACCURACY",
            Self::AccuracyTooLow { .. } => "ACCURACY_TOO_LOW",
            Self::SampleExpired => "SAMPLE_EXPIRED",
            Self::InvalidTimestamp => "INVALID_TIMESTAMP",
            Self::OutsideRadius { .. } => "OUTSIDE_RADIUS",
        }
    }
}
