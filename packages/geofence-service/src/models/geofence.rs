use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of comparing a position against a geofence.
///
/// `distance_meters` keeps the raw haversine distance; the verdict is computed
/// from it, so `within_radius == (distance_meters <= max_distance_meters)`
/// always holds. Rounding is for presentation only, see
/// [`GeofenceResult::display_distance_meters`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceResult {
    pub within_radius: bool,
    pub distance_meters: f64,
    pub max_distance_meters: f64,
}

impl GeofenceResult {
    pub fn new(distance_meters: f64, max_distance_meters: f64) -> Self {
        Self {
            within_radius: distance_meters <= max_distance_meters,
            distance_meters,
            max_distance_meters,
        }
    }

    /// Distance rounded to the nearest whole meter
    pub fn display_distance_meters(&self) -> f64 {
        self.distance_meters.round()
    }
}

impl fmt::Display for GeofenceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You are {}m away; allowed radius is {}m",
            self.display_distance_meters(),
            self.max_distance_meters.round()
        )
    }
}
